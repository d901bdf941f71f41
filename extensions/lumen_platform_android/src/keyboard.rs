//! Android key input
//!
//! Maps Android key codes to engine key codes, remembers modifier state and
//! reassembles UTF-16 surrogate pairs delivered one code unit per event.

use lumen_core::{InputEvent, KeyCode, KeyEvent, Modifiers, SharedInputSink};

/// Android `KEYCODE_BACK`
pub const ANDROID_KEYCODE_BACK: i32 = 4;

/// Private-use units some input methods send for editing keys
const IME_BACKSPACE: u32 = 0xF008;
const IME_ENTER: u32 = 0xF00D;

/// Result of feeding one UTF-16 code unit to a [`Utf16Decoder`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Utf16Step {
    /// A high surrogate is waiting for its low half
    Pending,
    /// A complete scalar value (0 when the event carries no text)
    Char(u32),
    /// The unit was malformed and dropped
    Dropped,
}

/// Reassembles surrogate pairs split across key events
#[derive(Clone, Debug, Default)]
pub struct Utf16Decoder {
    pending_high: Option<u32>,
    dropped_units: u64,
}

fn is_high_surrogate(unit: u32) -> bool {
    unit & 0xFFFF_FC00 == 0xD800
}

fn is_low_surrogate(unit: u32) -> bool {
    unit & 0xFFFF_FC00 == 0xDC00
}

impl Utf16Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of malformed units dropped so far
    pub fn dropped_units(&self) -> u64 {
        self.dropped_units
    }

    /// Feed one code unit
    pub fn push(&mut self, unit: u32) -> Utf16Step {
        if is_high_surrogate(unit) {
            if self.pending_high.replace(unit).is_some() {
                self.drop_unit("high surrogate followed by another high surrogate");
            }
            return Utf16Step::Pending;
        }

        if is_low_surrogate(unit) {
            let Some(high) = self.pending_high.take() else {
                self.drop_unit("low surrogate without a high surrogate");
                return Utf16Step::Dropped;
            };
            return Utf16Step::Char(((high - 0xD800) << 10) + (unit - 0xDC00) + 0x10000);
        }

        if self.pending_high.take().is_some() {
            self.drop_unit("high surrogate not followed by a low surrogate");
        }
        Utf16Step::Char(unit)
    }

    fn drop_unit(&mut self, reason: &str) {
        self.dropped_units += 1;
        tracing::error!("Invalid UTF-16 surrogate input: {}", reason);
    }
}

/// Map an Android `KEYCODE_*` value to an engine key code
pub fn keycode_from_android(code: i32) -> KeyCode {
    match code {
        // KEYCODE_0..=KEYCODE_9
        7..=16 => KeyCode(KeyCode::KEY_0.0 + (code - 7) as u32),
        // KEYCODE_A..=KEYCODE_Z
        29..=54 => KeyCode(KeyCode::A.0 + (code - 29) as u32),
        // KEYCODE_F1..=KEYCODE_F12
        131..=142 => KeyCode(KeyCode::F1.0 + (code - 131) as u32),
        // KEYCODE_NUMPAD_0..=KEYCODE_NUMPAD_9
        144..=153 => KeyCode(KeyCode::KP_0.0 + (code - 144) as u32),

        3 | 122 => KeyCode::HOME,
        4 => KeyCode::BACK,
        19 => KeyCode::UP,
        20 => KeyCode::DOWN,
        21 => KeyCode::LEFT,
        22 => KeyCode::RIGHT,
        23 | 66 | 160 => KeyCode::ENTER,
        24 => KeyCode::VOLUME_UP,
        25 => KeyCode::VOLUME_DOWN,
        55 => KeyCode::COMMA,
        56 => KeyCode::PERIOD,
        57 | 58 => KeyCode::ALT,
        59 | 60 => KeyCode::SHIFT,
        61 => KeyCode::TAB,
        62 => KeyCode::SPACE,
        67 => KeyCode::BACKSPACE,
        68 => KeyCode::GRAVE,
        69 => KeyCode::MINUS,
        70 => KeyCode::EQUAL,
        71 => KeyCode::BRACKET_LEFT,
        72 => KeyCode::BRACKET_RIGHT,
        73 => KeyCode::BACKSLASH,
        74 => KeyCode::SEMICOLON,
        75 => KeyCode::APOSTROPHE,
        76 => KeyCode::SLASH,
        82 => KeyCode::MENU,
        84 => KeyCode::SEARCH,
        85 => KeyCode::MEDIA_PLAY_PAUSE,
        86 => KeyCode::MEDIA_STOP,
        87 => KeyCode::MEDIA_NEXT,
        88 => KeyCode::MEDIA_PREVIOUS,
        92 => KeyCode::PAGE_UP,
        93 => KeyCode::PAGE_DOWN,
        111 => KeyCode::ESCAPE,
        112 => KeyCode::DELETE,
        113 | 114 => KeyCode::CTRL,
        115 => KeyCode::CAPS_LOCK,
        116 => KeyCode::SCROLL_LOCK,
        117 | 118 => KeyCode::META,
        120 => KeyCode::PRINT,
        121 => KeyCode::PAUSE,
        123 => KeyCode::END,
        124 => KeyCode::INSERT,
        143 => KeyCode::NUM_LOCK,
        154 => KeyCode::KP_DIVIDE,
        155 => KeyCode::KP_MULTIPLY,
        156 => KeyCode::KP_SUBTRACT,
        157 => KeyCode::KP_ADD,
        158 => KeyCode::KP_PERIOD,
        164 => KeyCode::VOLUME_MUTE,
        _ => KeyCode::UNKNOWN,
    }
}

/// What the translator did with a key event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Part of an incomplete or malformed surrogate pair; nothing was sent
    Skipped,
    /// A key event was accumulated
    Sent,
    /// A key event was accumulated and the system back action was pressed
    SentGoBack,
}

/// Converts Android key events into engine key events
pub struct KeyboardTranslator {
    sink: SharedInputSink,
    decoder: Utf16Decoder,
    modifiers: Modifiers,
}

impl KeyboardTranslator {
    pub fn new(sink: SharedInputSink) -> Self {
        Self {
            sink,
            decoder: Utf16Decoder::new(),
            modifiers: Modifiers::empty(),
        }
    }

    /// Modifier keys currently held
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Malformed surrogate units dropped so far
    pub fn dropped_units(&self) -> u64 {
        self.decoder.dropped_units()
    }

    /// Process one key event
    ///
    /// `unicode_unit` is the UTF-16 code unit the key produced, 0 for none.
    pub fn process_key_event(
        &mut self,
        keycode: i32,
        scancode: i32,
        unicode_unit: u32,
        pressed: bool,
    ) -> KeyOutcome {
        let unicode = match self.decoder.push(unicode_unit) {
            Utf16Step::Char(unicode) => unicode,
            Utf16Step::Pending | Utf16Step::Dropped => return KeyOutcome::Skipped,
        };

        let mut key = KeyEvent {
            keycode: keycode_from_android(keycode),
            physical_keycode: keycode_from_android(scancode),
            unicode,
            pressed,
            modifiers: Modifiers::empty(),
        };

        match key.keycode {
            KeyCode::SHIFT => self.modifiers.set(Modifiers::SHIFT, pressed),
            KeyCode::ALT => self.modifiers.set(Modifiers::ALT, pressed),
            KeyCode::CTRL => self.modifiers.set(Modifiers::CTRL, pressed),
            KeyCode::META => self.modifiers.set(Modifiers::META, pressed),
            _ => {}
        }
        key.modifiers = self.modifiers;

        let mut go_back = false;
        if unicode == u32::from('\n') {
            key.keycode = KeyCode::ENTER;
        } else if unicode == IME_BACKSPACE {
            key.keycode = KeyCode::BACKSPACE;
            key.unicode = 0;
        } else if unicode == IME_ENTER {
            key.keycode = KeyCode::ENTER;
            key.unicode = 0;
        } else if keycode == ANDROID_KEYCODE_BACK {
            go_back = pressed;
        }

        self.sink.accumulate_input_event(InputEvent::Key(key));

        if go_back {
            KeyOutcome::SentGoBack
        } else {
            KeyOutcome::Sent
        }
    }
}

impl std::fmt::Debug for KeyboardTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardTranslator")
            .field("decoder", &self.decoder)
            .field("modifiers", &self.modifiers)
            .finish()
    }
}
