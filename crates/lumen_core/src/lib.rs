//! Lumen Core
//!
//! Engine-side vocabulary shared by every Lumen platform backend:
//!
//! - **Geometry**: small vector and rectangle types used by windows and input
//! - **Input events**: touch, mouse, pan, key and joypad events in one tagged enum
//! - **Accumulation**: the [`InputSink`] contract platform backends push into,
//!   plus [`InputBuffer`], a reference accumulation buffer
//!
//! # Example
//!
//! ```rust
//! use lumen_core::{InputBuffer, InputEvent, InputSink, ScreenTouch, Vector2};
//!
//! let buffer = InputBuffer::new();
//! buffer.accumulate_input_event(InputEvent::ScreenTouch(ScreenTouch {
//!     index: 0,
//!     position: Vector2::new(10.0, 20.0),
//!     pressed: true,
//! }));
//!
//! let mut seen = Vec::new();
//! buffer.flush_accumulated_events(&mut |event| seen.push(event));
//! assert_eq!(seen.len(), 1);
//! ```

pub mod events;
pub mod input;
pub mod math;

pub use events::{
    ButtonMask, HatMask, InputEvent, JoyAxis, JoyAxisValue, JoyButton, JoypadButton,
    JoypadMotion, KeyCode, KeyEvent, Modifiers, MouseButton, MouseButtonEvent, MouseMotion,
    PanGesture, ScreenDrag, ScreenTouch, SensorKind,
};
pub use input::{InputBuffer, InputSink, SharedInputSink};
pub use math::{Point2i, Rect2, Rect2i, Size2i, Vector2, Vector3};
