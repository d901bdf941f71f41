//! Input event model
//!
//! Platform backends translate native input into these events and push them
//! into an [`InputSink`](crate::input::InputSink). The shapes mirror what the
//! engine's input accumulator consumes: discrete touch press/release/drag,
//! mouse buttons with a held-button mask, motion with relative deltas, pan
//! gestures, keys and joypad state.

use crate::math::Vector2;

bitflags::bitflags! {
    /// Currently held logical mouse buttons, one bit per [`MouseButton`] index
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ButtonMask: u32 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const MIDDLE = 1 << 2;
        const WHEEL_UP = 1 << 3;
        const WHEEL_DOWN = 1 << 4;
        const WHEEL_LEFT = 1 << 5;
        const WHEEL_RIGHT = 1 << 6;
        const XBUTTON1 = 1 << 7;
        const XBUTTON2 = 1 << 8;
    }
}

impl Default for ButtonMask {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags::bitflags! {
    /// Keyboard modifier flags
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL = 0b0010;
        const ALT = 0b0100;
        /// Cmd on macOS, Win on Windows
        const META = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

impl Modifiers {
    /// Create new modifiers from individual flags
    pub fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut modifiers = Self::empty();
        modifiers.set(Self::SHIFT, shift);
        modifiers.set(Self::CTRL, ctrl);
        modifiers.set(Self::ALT, alt);
        modifiers.set(Self::META, meta);
        modifiers
    }

    /// Check if shift is pressed
    pub const fn shift(&self) -> bool {
        self.contains(Self::SHIFT)
    }

    /// Check if ctrl is pressed
    pub const fn ctrl(&self) -> bool {
        self.contains(Self::CTRL)
    }

    /// Check if alt is pressed
    pub const fn alt(&self) -> bool {
        self.contains(Self::ALT)
    }

    /// Check if meta (Cmd/Win) is pressed
    pub const fn meta(&self) -> bool {
        self.contains(Self::META)
    }
}

/// Canonical mouse button index
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MouseButton {
    #[default]
    None = 0,
    Left = 1,
    Right = 2,
    Middle = 3,
    WheelUp = 4,
    WheelDown = 5,
    WheelLeft = 6,
    WheelRight = 7,
    XButton1 = 8,
    XButton2 = 9,
}

impl MouseButton {
    /// The mask bit for this button (`1 << (index - 1)`); empty for `None`
    pub const fn mask(self) -> ButtonMask {
        match self {
            MouseButton::None => ButtonMask::empty(),
            button => ButtonMask::from_bits_retain(1 << (button as u32 - 1)),
        }
    }
}

/// Virtual key codes (platform-agnostic)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct KeyCode(pub u32);

impl KeyCode {
    // Alphanumeric keys
    pub const A: KeyCode = KeyCode(0x41);
    pub const B: KeyCode = KeyCode(0x42);
    pub const C: KeyCode = KeyCode(0x43);
    pub const D: KeyCode = KeyCode(0x44);
    pub const E: KeyCode = KeyCode(0x45);
    pub const F: KeyCode = KeyCode(0x46);
    pub const G: KeyCode = KeyCode(0x47);
    pub const H: KeyCode = KeyCode(0x48);
    pub const I: KeyCode = KeyCode(0x49);
    pub const J: KeyCode = KeyCode(0x4A);
    pub const K: KeyCode = KeyCode(0x4B);
    pub const L: KeyCode = KeyCode(0x4C);
    pub const M: KeyCode = KeyCode(0x4D);
    pub const N: KeyCode = KeyCode(0x4E);
    pub const O: KeyCode = KeyCode(0x4F);
    pub const P: KeyCode = KeyCode(0x50);
    pub const Q: KeyCode = KeyCode(0x51);
    pub const R: KeyCode = KeyCode(0x52);
    pub const S: KeyCode = KeyCode(0x53);
    pub const T: KeyCode = KeyCode(0x54);
    pub const U: KeyCode = KeyCode(0x55);
    pub const V: KeyCode = KeyCode(0x56);
    pub const W: KeyCode = KeyCode(0x57);
    pub const X: KeyCode = KeyCode(0x58);
    pub const Y: KeyCode = KeyCode(0x59);
    pub const Z: KeyCode = KeyCode(0x5A);

    // Number keys
    pub const KEY_0: KeyCode = KeyCode(0x30);
    pub const KEY_1: KeyCode = KeyCode(0x31);
    pub const KEY_2: KeyCode = KeyCode(0x32);
    pub const KEY_3: KeyCode = KeyCode(0x33);
    pub const KEY_4: KeyCode = KeyCode(0x34);
    pub const KEY_5: KeyCode = KeyCode(0x35);
    pub const KEY_6: KeyCode = KeyCode(0x36);
    pub const KEY_7: KeyCode = KeyCode(0x37);
    pub const KEY_8: KeyCode = KeyCode(0x38);
    pub const KEY_9: KeyCode = KeyCode(0x39);

    // Special keys
    pub const BACKSPACE: KeyCode = KeyCode(0x08);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const PAUSE: KeyCode = KeyCode(0x13);
    pub const CAPS_LOCK: KeyCode = KeyCode(0x14);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const PRINT: KeyCode = KeyCode(0x2C);
    pub const INSERT: KeyCode = KeyCode(0x2D);
    pub const DELETE: KeyCode = KeyCode(0x7F);
    pub const NUM_LOCK: KeyCode = KeyCode(0x90);
    pub const SCROLL_LOCK: KeyCode = KeyCode(0x91);

    // Modifier keys
    pub const SHIFT: KeyCode = KeyCode(0x10);
    pub const CTRL: KeyCode = KeyCode(0x11);
    pub const ALT: KeyCode = KeyCode(0x12);
    pub const META: KeyCode = KeyCode(0x5B);
    pub const MENU: KeyCode = KeyCode(0x5D);

    // Arrow keys
    pub const LEFT: KeyCode = KeyCode(0x25);
    pub const UP: KeyCode = KeyCode(0x26);
    pub const RIGHT: KeyCode = KeyCode(0x27);
    pub const DOWN: KeyCode = KeyCode(0x28);

    // Navigation keys
    pub const HOME: KeyCode = KeyCode(0x24);
    pub const END: KeyCode = KeyCode(0x23);
    pub const PAGE_UP: KeyCode = KeyCode(0x21);
    pub const PAGE_DOWN: KeyCode = KeyCode(0x22);

    // Function keys
    pub const F1: KeyCode = KeyCode(0x70);
    pub const F2: KeyCode = KeyCode(0x71);
    pub const F3: KeyCode = KeyCode(0x72);
    pub const F4: KeyCode = KeyCode(0x73);
    pub const F5: KeyCode = KeyCode(0x74);
    pub const F6: KeyCode = KeyCode(0x75);
    pub const F7: KeyCode = KeyCode(0x76);
    pub const F8: KeyCode = KeyCode(0x77);
    pub const F9: KeyCode = KeyCode(0x78);
    pub const F10: KeyCode = KeyCode(0x79);
    pub const F11: KeyCode = KeyCode(0x7A);
    pub const F12: KeyCode = KeyCode(0x7B);

    // Keypad
    pub const KP_0: KeyCode = KeyCode(0x60);
    pub const KP_1: KeyCode = KeyCode(0x61);
    pub const KP_2: KeyCode = KeyCode(0x62);
    pub const KP_3: KeyCode = KeyCode(0x63);
    pub const KP_4: KeyCode = KeyCode(0x64);
    pub const KP_5: KeyCode = KeyCode(0x65);
    pub const KP_6: KeyCode = KeyCode(0x66);
    pub const KP_7: KeyCode = KeyCode(0x67);
    pub const KP_8: KeyCode = KeyCode(0x68);
    pub const KP_9: KeyCode = KeyCode(0x69);
    pub const KP_MULTIPLY: KeyCode = KeyCode(0x6A);
    pub const KP_ADD: KeyCode = KeyCode(0x6B);
    pub const KP_SUBTRACT: KeyCode = KeyCode(0x6D);
    pub const KP_PERIOD: KeyCode = KeyCode(0x6E);
    pub const KP_DIVIDE: KeyCode = KeyCode(0x6F);

    // Punctuation
    pub const SEMICOLON: KeyCode = KeyCode(0xBA);
    pub const EQUAL: KeyCode = KeyCode(0xBB);
    pub const COMMA: KeyCode = KeyCode(0xBC);
    pub const MINUS: KeyCode = KeyCode(0xBD);
    pub const PERIOD: KeyCode = KeyCode(0xBE);
    pub const SLASH: KeyCode = KeyCode(0xBF);
    pub const GRAVE: KeyCode = KeyCode(0xC0);
    pub const BRACKET_LEFT: KeyCode = KeyCode(0xDB);
    pub const BACKSLASH: KeyCode = KeyCode(0xDC);
    pub const BRACKET_RIGHT: KeyCode = KeyCode(0xDD);
    pub const APOSTROPHE: KeyCode = KeyCode(0xDE);

    // System and media keys
    pub const BACK: KeyCode = KeyCode(0xA6);
    pub const SEARCH: KeyCode = KeyCode(0xAA);
    pub const VOLUME_MUTE: KeyCode = KeyCode(0xAD);
    pub const VOLUME_DOWN: KeyCode = KeyCode(0xAE);
    pub const VOLUME_UP: KeyCode = KeyCode(0xAF);
    pub const MEDIA_NEXT: KeyCode = KeyCode(0xB0);
    pub const MEDIA_PREVIOUS: KeyCode = KeyCode(0xB1);
    pub const MEDIA_STOP: KeyCode = KeyCode(0xB2);
    pub const MEDIA_PLAY_PAUSE: KeyCode = KeyCode(0xB3);

    // Unknown/unmapped key
    pub const UNKNOWN: KeyCode = KeyCode(0);
}

/// Joypad button index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JoyButton(pub u32);

impl JoyButton {
    pub const A: JoyButton = JoyButton(0);
    pub const B: JoyButton = JoyButton(1);
    pub const X: JoyButton = JoyButton(2);
    pub const Y: JoyButton = JoyButton(3);
    pub const BACK: JoyButton = JoyButton(4);
    pub const GUIDE: JoyButton = JoyButton(5);
    pub const START: JoyButton = JoyButton(6);
    pub const LEFT_STICK: JoyButton = JoyButton(7);
    pub const RIGHT_STICK: JoyButton = JoyButton(8);
    pub const LEFT_SHOULDER: JoyButton = JoyButton(9);
    pub const RIGHT_SHOULDER: JoyButton = JoyButton(10);
    pub const DPAD_UP: JoyButton = JoyButton(11);
    pub const DPAD_DOWN: JoyButton = JoyButton(12);
    pub const DPAD_LEFT: JoyButton = JoyButton(13);
    pub const DPAD_RIGHT: JoyButton = JoyButton(14);
}

/// Joypad axis index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JoyAxis(pub u32);

impl JoyAxis {
    pub const LEFT_X: JoyAxis = JoyAxis(0);
    pub const LEFT_Y: JoyAxis = JoyAxis(1);
    pub const RIGHT_X: JoyAxis = JoyAxis(2);
    pub const RIGHT_Y: JoyAxis = JoyAxis(3);
    pub const TRIGGER_LEFT: JoyAxis = JoyAxis(4);
    pub const TRIGGER_RIGHT: JoyAxis = JoyAxis(5);
}

/// Raw axis reading together with the lower bound of its range
///
/// `min == -1.0` means the value is already in `[-1, 1]`; `min == 0.0` means
/// the value is in `[0, 1]` and gets rescaled on accumulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoyAxisValue {
    pub min: f32,
    pub value: f32,
}

bitflags::bitflags! {
    /// Directions held on a joypad hat switch
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct HatMask: u8 {
        const UP = 0b0001;
        const RIGHT = 0b0010;
        const DOWN = 0b0100;
        const LEFT = 0b1000;
    }
}

impl Default for HatMask {
    fn default() -> Self {
        Self::empty()
    }
}

/// Motion sensor channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Accelerometer,
    Gravity,
    Magnetometer,
    Gyroscope,
}

/// A touch contact was pressed or released
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenTouch {
    /// Contact identifier, stable for the lifetime of a physical contact
    pub index: i32,
    pub position: Vector2,
    pub pressed: bool,
}

/// A touch contact moved
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenDrag {
    pub index: i32,
    pub position: Vector2,
    /// New position minus the previously reported position
    pub relative: Vector2,
}

/// A mouse button changed state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseButtonEvent {
    pub position: Vector2,
    pub global_position: Vector2,
    /// The button that changed
    pub button_index: MouseButton,
    /// Buttons held after (or, for wheel presses, during) this event
    pub button_mask: ButtonMask,
    pub pressed: bool,
    pub double_click: bool,
    /// Wheel magnitude; 1.0 for real buttons
    pub factor: f32,
    pub modifiers: Modifiers,
}

/// The mouse moved
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseMotion {
    pub position: Vector2,
    pub global_position: Vector2,
    pub relative: Vector2,
    pub button_mask: ButtonMask,
    pub modifiers: Modifiers,
}

/// A two-finger pan or trackpad scroll
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanGesture {
    pub position: Vector2,
    pub delta: Vector2,
    pub modifiers: Modifiers,
}

/// A key changed state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyEvent {
    /// Layout-dependent key code
    pub keycode: KeyCode,
    /// Layout-independent (scan code) key code
    pub physical_keycode: KeyCode,
    /// Unicode scalar produced by the key, 0 when none
    pub unicode: u32,
    pub pressed: bool,
    pub modifiers: Modifiers,
}

/// A joypad button changed state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoypadButton {
    pub device: i32,
    pub button: JoyButton,
    pub pressed: bool,
}

/// A joypad axis moved
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JoypadMotion {
    pub device: i32,
    pub axis: JoyAxis,
    /// Normalized to `[-1, 1]`
    pub value: f32,
}

/// An engine-consumable input event
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    ScreenTouch(ScreenTouch),
    ScreenDrag(ScreenDrag),
    MouseButton(MouseButtonEvent),
    MouseMotion(MouseMotion),
    PanGesture(PanGesture),
    Key(KeyEvent),
    JoypadButton(JoypadButton),
    JoypadMotion(JoypadMotion),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_masks_follow_index() {
        assert_eq!(MouseButton::None.mask(), ButtonMask::empty());
        assert_eq!(MouseButton::Left.mask(), ButtonMask::LEFT);
        assert_eq!(MouseButton::Middle.mask(), ButtonMask::MIDDLE);
        assert_eq!(MouseButton::WheelUp.mask(), ButtonMask::WHEEL_UP);
        assert_eq!(MouseButton::WheelRight.mask(), ButtonMask::WHEEL_RIGHT);
        assert_eq!(MouseButton::XButton2.mask(), ButtonMask::XBUTTON2);
    }

    #[test]
    fn test_modifiers() {
        let mods = Modifiers::new(true, false, true, false);
        assert!(mods.shift());
        assert!(!mods.ctrl());
        assert!(mods.alt());
        assert!(!mods.meta());
        assert!(Modifiers::default().is_empty());
    }
}
