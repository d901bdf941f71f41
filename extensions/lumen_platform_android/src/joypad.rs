//! Gamepad and motion sensor forwarding

use lumen_core::{HatMask, InputSink, JoyAxis, JoyAxisValue, JoyButton, SensorKind, Vector3};

/// Kind of a [`JoypadEvent`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoypadEventKind {
    Button,
    Axis,
    Hat,
}

/// A joypad event as decoded from the platform
///
/// Only the fields relevant to `kind` are meaningful.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoypadEvent {
    pub kind: JoypadEventKind,
    pub device: i32,
    /// Button or axis index
    pub index: u32,
    pub pressed: bool,
    /// Axis value in `[-1, 1]`
    pub value: f32,
    pub hat: HatMask,
}

impl JoypadEvent {
    pub fn button(device: i32, button: JoyButton, pressed: bool) -> Self {
        Self {
            kind: JoypadEventKind::Button,
            device,
            index: button.0,
            pressed,
            value: 0.0,
            hat: HatMask::empty(),
        }
    }

    pub fn axis(device: i32, axis: JoyAxis, value: f32) -> Self {
        Self {
            kind: JoypadEventKind::Axis,
            device,
            index: axis.0,
            pressed: false,
            value,
            hat: HatMask::empty(),
        }
    }

    pub fn hat(device: i32, hat: HatMask) -> Self {
        Self {
            kind: JoypadEventKind::Hat,
            device,
            index: 0,
            pressed: false,
            value: 0.0,
            hat,
        }
    }
}

/// Push a joypad event into the sink
pub fn forward_joy_event(sink: &dyn InputSink, event: JoypadEvent) {
    match event.kind {
        JoypadEventKind::Button => {
            sink.joy_button(event.device, JoyButton(event.index), event.pressed)
        }
        JoypadEventKind::Axis => sink.joy_axis(
            event.device,
            JoyAxis(event.index),
            JoyAxisValue {
                min: -1.0,
                value: event.value,
            },
        ),
        JoypadEventKind::Hat => sink.joy_hat(event.device, event.hat),
    }
}

/// Push a motion sensor reading into the sink
pub fn forward_sensor(sink: &dyn InputSink, sensor: SensorKind, value: Vector3) {
    sink.set_sensor(sensor, value);
}

/// Hat directions from the `AXIS_HAT_X`/`AXIS_HAT_Y` pair
pub fn hat_from_axes(x: f32, y: f32) -> HatMask {
    let mut hat = HatMask::empty();
    if x < -0.5 {
        hat |= HatMask::LEFT;
    } else if x > 0.5 {
        hat |= HatMask::RIGHT;
    }
    if y < -0.5 {
        hat |= HatMask::UP;
    } else if y > 0.5 {
        hat |= HatMask::DOWN;
    }
    hat
}

/// Map an Android gamepad `KEYCODE_BUTTON_*` to a joypad button
pub fn joy_button_from_android(keycode: i32) -> Option<JoyButton> {
    let button = match keycode {
        96 => JoyButton::A,
        97 => JoyButton::B,
        99 => JoyButton::X,
        100 => JoyButton::Y,
        102 => JoyButton::LEFT_SHOULDER,
        103 => JoyButton::RIGHT_SHOULDER,
        106 => JoyButton::LEFT_STICK,
        107 => JoyButton::RIGHT_STICK,
        108 => JoyButton::START,
        109 => JoyButton::BACK,
        110 => JoyButton::GUIDE,
        _ => return None,
    };
    Some(button)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{InputBuffer, InputEvent};

    #[test]
    fn test_axis_is_forwarded_as_signed_range() {
        let buffer = InputBuffer::new();
        forward_joy_event(&buffer, JoypadEvent::axis(2, JoyAxis::LEFT_X, -0.25));

        match buffer.drain().as_slice() {
            [InputEvent::JoypadMotion(motion)] => {
                assert_eq!(motion.device, 2);
                assert_eq!(motion.axis, JoyAxis::LEFT_X);
                assert_eq!(motion.value, -0.25);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn test_hat_changes_emit_dpad_buttons() {
        let buffer = InputBuffer::new();
        forward_joy_event(&buffer, JoypadEvent::hat(0, HatMask::UP));
        forward_joy_event(&buffer, JoypadEvent::hat(0, HatMask::UP));

        let events = buffer.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(buffer.hat(0), HatMask::UP);
    }

    #[test]
    fn test_hat_from_axes() {
        assert_eq!(hat_from_axes(0.0, 0.0), HatMask::empty());
        assert_eq!(hat_from_axes(-1.0, -1.0), HatMask::LEFT | HatMask::UP);
        assert_eq!(hat_from_axes(1.0, 1.0), HatMask::RIGHT | HatMask::DOWN);
    }

    #[test]
    fn test_sensor_forwarding() {
        let buffer = InputBuffer::new();
        let gravity = Vector3::new(0.0, -9.8, 0.0);
        forward_sensor(&buffer, SensorKind::Gravity, gravity);
        assert_eq!(buffer.sensor(SensorKind::Gravity), gravity);
        assert_eq!(buffer.pending(), 0);
    }

    #[test]
    fn test_gamepad_keycodes() {
        assert_eq!(joy_button_from_android(96), Some(JoyButton::A));
        assert_eq!(joy_button_from_android(29), None);
    }
}
