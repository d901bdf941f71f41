//! Input accumulation
//!
//! Platform backends run on the platform's UI thread and push translated
//! events into an [`InputSink`]. The sink owns batching and thread-safety;
//! the engine drains it once per frame through
//! [`InputSink::flush_accumulated_events`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;

use crate::events::{
    HatMask, InputEvent, JoyAxis, JoyAxisValue, JoyButton, JoypadButton, JoypadMotion, SensorKind,
};
use crate::math::Vector3;

/// Destination for translated input
pub trait InputSink: Send + Sync {
    /// Queue an event for the next frame
    fn accumulate_input_event(&self, event: InputEvent);

    /// Drain queued events in arrival order
    fn flush_accumulated_events(&self, dispatch: &mut dyn FnMut(InputEvent));

    /// Record the latest reading of a motion sensor
    fn set_sensor(&self, sensor: SensorKind, value: Vector3);

    /// A joypad button changed state
    fn joy_button(&self, device: i32, button: JoyButton, pressed: bool);

    /// A joypad axis moved
    fn joy_axis(&self, device: i32, axis: JoyAxis, value: JoyAxisValue);

    /// A joypad hat switch changed
    fn joy_hat(&self, device: i32, hat: HatMask);
}

/// Shared handle to an input sink
pub type SharedInputSink = Arc<dyn InputSink>;

#[derive(Default)]
struct BufferState {
    events: VecDeque<InputEvent>,
    accelerometer: Vector3,
    gravity: Vector3,
    magnetometer: Vector3,
    gyroscope: Vector3,
    hats: FxHashMap<i32, HatMask>,
}

/// Reference accumulation buffer
///
/// A mutex-guarded FIFO of input events plus the latest sensor readings and
/// per-device hat state.
#[derive(Default)]
pub struct InputBuffer {
    state: Mutex<BufferState>,
}

impl InputBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer behind a shared handle
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn lock(&self) -> MutexGuard<'_, BufferState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.lock().events.len()
    }

    /// Remove and return every queued event
    pub fn drain(&self) -> Vec<InputEvent> {
        self.lock().events.drain(..).collect()
    }

    /// Latest reading for a sensor, zero if none was reported
    pub fn sensor(&self, sensor: SensorKind) -> Vector3 {
        let state = self.lock();
        match sensor {
            SensorKind::Accelerometer => state.accelerometer,
            SensorKind::Gravity => state.gravity,
            SensorKind::Magnetometer => state.magnetometer,
            SensorKind::Gyroscope => state.gyroscope,
        }
    }

    /// Current hat directions for a device
    pub fn hat(&self, device: i32) -> HatMask {
        self.lock().hats.get(&device).copied().unwrap_or_default()
    }
}

impl std::fmt::Debug for InputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBuffer")
            .field("pending", &self.pending())
            .finish()
    }
}

const HAT_BUTTONS: [(HatMask, JoyButton); 4] = [
    (HatMask::UP, JoyButton::DPAD_UP),
    (HatMask::RIGHT, JoyButton::DPAD_RIGHT),
    (HatMask::DOWN, JoyButton::DPAD_DOWN),
    (HatMask::LEFT, JoyButton::DPAD_LEFT),
];

impl InputSink for InputBuffer {
    fn accumulate_input_event(&self, event: InputEvent) {
        self.lock().events.push_back(event);
    }

    fn flush_accumulated_events(&self, dispatch: &mut dyn FnMut(InputEvent)) {
        // Release the lock before dispatching so handlers may accumulate again.
        let events: Vec<InputEvent> = self.lock().events.drain(..).collect();
        for event in events {
            dispatch(event);
        }
    }

    fn set_sensor(&self, sensor: SensorKind, value: Vector3) {
        let mut state = self.lock();
        match sensor {
            SensorKind::Accelerometer => state.accelerometer = value,
            SensorKind::Gravity => state.gravity = value,
            SensorKind::Magnetometer => state.magnetometer = value,
            SensorKind::Gyroscope => state.gyroscope = value,
        }
    }

    fn joy_button(&self, device: i32, button: JoyButton, pressed: bool) {
        self.accumulate_input_event(InputEvent::JoypadButton(JoypadButton {
            device,
            button,
            pressed,
        }));
    }

    fn joy_axis(&self, device: i32, axis: JoyAxis, value: JoyAxisValue) {
        let normalized = if value.min == 0.0 {
            value.value * 2.0 - 1.0
        } else {
            value.value
        };
        self.accumulate_input_event(InputEvent::JoypadMotion(JoypadMotion {
            device,
            axis,
            value: normalized.clamp(-1.0, 1.0),
        }));
    }

    fn joy_hat(&self, device: i32, hat: HatMask) {
        let mut state = self.lock();
        let previous = state.hats.insert(device, hat).unwrap_or_default();
        let changed = previous ^ hat;
        for (direction, button) in HAT_BUTTONS {
            if changed.contains(direction) {
                state.events.push_back(InputEvent::JoypadButton(JoypadButton {
                    device,
                    button,
                    pressed: hat.contains(direction),
                }));
            }
        }
    }
}
