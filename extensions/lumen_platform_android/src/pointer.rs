//! Android mouse, stylus-hover and trackpad input
//!
//! Tracks the held-button mask and the last hover/scroll positions, and turns
//! Android pointer actions into mouse button, motion, wheel and pan events.

use lumen_core::{
    ButtonMask, InputEvent, Modifiers, MouseButton, MouseButtonEvent, MouseMotion, PanGesture,
    SharedInputSink, Vector2,
};

use crate::input::{InputSource, MotionAction};

/// `MotionEvent` button-state bits (`AMOTION_EVENT_BUTTON_*`)
pub mod android_buttons {
    pub const PRIMARY: i32 = 1 << 0;
    pub const SECONDARY: i32 = 1 << 1;
    pub const TERTIARY: i32 = 1 << 2;
    pub const BACK: i32 = 1 << 3;
    pub const FORWARD: i32 = 1 << 4;
    pub const STYLUS_PRIMARY: i32 = 1 << 5;
    pub const STYLUS_SECONDARY: i32 = 1 << 6;
}

const ANDROID_BUTTONS: [(i32, ButtonMask); 5] = [
    (android_buttons::PRIMARY, ButtonMask::LEFT),
    (android_buttons::SECONDARY, ButtonMask::RIGHT),
    (android_buttons::TERTIARY, ButtonMask::MIDDLE),
    (android_buttons::BACK, ButtonMask::XBUTTON1),
    (android_buttons::FORWARD, ButtonMask::XBUTTON2),
];

/// Convert an Android button-state value into the engine's button mask
pub fn button_mask_from_android(android_mask: i32) -> ButtonMask {
    ANDROID_BUTTONS
        .iter()
        .filter(|(bit, _)| android_mask & bit != 0)
        .fold(ButtonMask::empty(), |mask, (_, button)| mask | *button)
}

/// Map a single-button mask to its button index; anything else is `None`
pub fn button_index_from_mask(mask: ButtonMask) -> MouseButton {
    const BUTTONS: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::XButton1,
        MouseButton::XButton2,
    ];
    BUTTONS
        .into_iter()
        .find(|button| button.mask() == mask)
        .unwrap_or(MouseButton::None)
}

/// Mouse/hover/pan state for the single Android pointer
pub struct PointerTracker {
    sink: SharedInputSink,
    buttons_state: ButtonMask,
    hover_prev_pos: Vector2,
    scroll_prev_pos: Vector2,
}

impl PointerTracker {
    pub fn new(sink: SharedInputSink) -> Self {
        Self {
            sink,
            buttons_state: ButtonMask::empty(),
            hover_prev_pos: Vector2::ZERO,
            scroll_prev_pos: Vector2::ZERO,
        }
    }

    /// Last known pointer position
    pub fn position(&self) -> Vector2 {
        self.hover_prev_pos
    }

    /// Buttons currently held
    pub fn button_state(&self) -> ButtonMask {
        self.buttons_state
    }

    /// Process a mouse-class `MotionEvent`
    ///
    /// For a true mouse `position` is absolute. For other sources (relative
    /// mice, trackballs, touch-as-pointer) events are pinned to the last hover
    /// position and a motion `position` is the relative delta.
    #[allow(clippy::too_many_arguments)]
    pub fn process_mouse_event(
        &mut self,
        source: InputSource,
        action: MotionAction,
        android_mask: i32,
        position: Vector2,
        vertical_factor: f32,
        horizontal_factor: f32,
        modifiers: Modifiers,
    ) {
        let event_mask = button_mask_from_android(android_mask);
        let is_mouse = source.is_mouse();

        match action {
            MotionAction::ButtonPress | MotionAction::ButtonRelease => {
                let event_pos = if is_mouse {
                    position
                } else {
                    self.hover_prev_pos
                };
                let changed = self.buttons_state ^ event_mask;
                self.buttons_state = event_mask;

                self.sink
                    .accumulate_input_event(InputEvent::MouseButton(MouseButtonEvent {
                        position: event_pos,
                        global_position: event_pos,
                        button_index: button_index_from_mask(changed),
                        button_mask: event_mask,
                        pressed: action == MotionAction::ButtonPress,
                        double_click: false,
                        factor: 1.0,
                        modifiers,
                    }));
            }

            MotionAction::Move => {
                let (event_pos, relative) = if is_mouse {
                    let relative = position - self.hover_prev_pos;
                    self.hover_prev_pos = position;
                    (position, relative)
                } else {
                    (self.hover_prev_pos, position)
                };

                self.sink
                    .accumulate_input_event(InputEvent::MouseMotion(MouseMotion {
                        position: event_pos,
                        global_position: event_pos,
                        relative,
                        button_mask: event_mask,
                        modifiers,
                    }));
            }

            MotionAction::Scroll => {
                let event_pos = if is_mouse {
                    position
                } else {
                    self.hover_prev_pos
                };
                self.buttons_state = event_mask;

                if vertical_factor > 0.0 {
                    self.wheel_click(
                        event_pos,
                        event_mask,
                        MouseButton::WheelUp,
                        vertical_factor,
                        modifiers,
                    );
                } else if vertical_factor < 0.0 {
                    self.wheel_click(
                        event_pos,
                        event_mask,
                        MouseButton::WheelDown,
                        -vertical_factor,
                        modifiers,
                    );
                }

                if horizontal_factor > 0.0 {
                    self.wheel_click(
                        event_pos,
                        event_mask,
                        MouseButton::WheelRight,
                        horizontal_factor,
                        modifiers,
                    );
                } else if horizontal_factor < 0.0 {
                    self.wheel_click(
                        event_pos,
                        event_mask,
                        MouseButton::WheelLeft,
                        -horizontal_factor,
                        modifiers,
                    );
                }
            }

            _ => {}
        }
    }

    /// Wheels have no release on Android; synthesize press then release
    fn wheel_click(
        &self,
        position: Vector2,
        event_mask: ButtonMask,
        wheel: MouseButton,
        factor: f32,
        modifiers: Modifiers,
    ) {
        let pressed = MouseButtonEvent {
            position,
            global_position: position,
            button_index: wheel,
            button_mask: event_mask ^ wheel.mask(),
            pressed: true,
            double_click: false,
            factor,
            modifiers,
        };
        self.sink
            .accumulate_input_event(InputEvent::MouseButton(pressed));
        self.sink
            .accumulate_input_event(InputEvent::MouseButton(MouseButtonEvent {
                pressed: false,
                button_mask: event_mask,
                ..pressed
            }));
    }

    /// Process a hover action from a stylus or mouse
    pub fn process_hover(&mut self, action: MotionAction, position: Vector2, modifiers: Modifiers) {
        match action {
            MotionAction::HoverMove | MotionAction::HoverEnter | MotionAction::HoverExit => {
                self.sink
                    .accumulate_input_event(InputEvent::MouseMotion(MouseMotion {
                        position,
                        global_position: position,
                        relative: position - self.hover_prev_pos,
                        button_mask: ButtonMask::empty(),
                        modifiers,
                    }));
                self.hover_prev_pos = position;
            }
            _ => {}
        }
    }

    /// Report a double tap as a double-click of the held buttons
    pub fn process_double_tap(&mut self, android_mask: i32, position: Vector2, modifiers: Modifiers) {
        let event_mask = button_mask_from_android(android_mask);
        self.sink
            .accumulate_input_event(InputEvent::MouseButton(MouseButtonEvent {
                position,
                global_position: position,
                button_index: button_index_from_mask(event_mask),
                button_mask: event_mask,
                pressed: !event_mask.is_empty(),
                double_click: true,
                factor: 1.0,
                modifiers,
            }));
    }

    /// Report a trackpad/two-finger scroll position as a pan delta
    pub fn process_pan(&mut self, position: Vector2, modifiers: Modifiers) {
        self.sink
            .accumulate_input_event(InputEvent::PanGesture(PanGesture {
                position,
                delta: position - self.scroll_prev_pos,
                modifiers,
            }));
        self.scroll_prev_pos = position;
    }
}

impl std::fmt::Debug for PointerTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerTracker")
            .field("buttons_state", &self.buttons_state)
            .field("hover_prev_pos", &self.hover_prev_pos)
            .field("scroll_prev_pos", &self.scroll_prev_pos)
            .finish()
    }
}
