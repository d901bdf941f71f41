//! Platform services
//!
//! Everything the display server needs from the Java side of the app
//! (clipboard, orientation, metrics, soft keyboard, pointer icon) goes
//! through [`PlatformServices`]. On device this is `JniPlatformServices`;
//! [`HeadlessServices`] is an in-process implementation for host builds.

use std::sync::{Mutex, MutexGuard, PoisonError};

use lumen_core::{Rect2i, Size2i};
use lumen_platform::{ScreenOrientation, VirtualKeyboardRequest};

/// Android `PointerIcon.TYPE_NULL`
pub const POINTER_ICON_NULL: i32 = 0;

/// Java-side services of the hosting activity
pub trait PlatformServices: Send + Sync {
    /// Clipboard text, `None` when the host cannot access the clipboard
    fn clipboard(&self) -> Option<String>;

    /// Replace the clipboard text, `false` when the host cannot access it
    fn set_clipboard(&self, text: &str) -> bool;

    fn set_keep_screen_on(&self, enable: bool);

    fn screen_orientation(&self) -> ScreenOrientation;
    fn set_screen_orientation(&self, orientation: ScreenOrientation);

    /// Size of the display surface in pixels
    fn display_size(&self) -> Size2i;
    fn screen_dpi(&self) -> i32;

    /// Display area not covered by system bars
    fn screen_usable_rect(&self) -> Rect2i;

    fn has_virtual_keyboard(&self) -> bool;
    fn show_virtual_keyboard(&self, request: &VirtualKeyboardRequest);
    fn hide_virtual_keyboard(&self);
    fn virtual_keyboard_height(&self) -> i32;

    /// Set the view's pointer icon to an Android `PointerIcon` type
    fn set_pointer_icon(&self, icon: i32);
    fn request_pointer_capture(&self);
    fn release_pointer_capture(&self);

    /// Show a blocking message to the user
    fn alert(&self, message: &str, title: &str);
}

/// Observable state of [`HeadlessServices`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeadlessState {
    /// `None` makes the clipboard unsupported
    pub clipboard: Option<String>,
    pub keep_screen_on: bool,
    pub orientation: ScreenOrientation,
    pub display_size: Size2i,
    pub dpi: i32,
    pub usable_rect: Rect2i,
    pub has_virtual_keyboard: bool,
    /// Request of the keyboard currently shown
    pub virtual_keyboard: Option<VirtualKeyboardRequest>,
    pub virtual_keyboard_height: i32,
    pub pointer_icon: i32,
    pub pointer_captured: bool,
    /// `(message, title)` of every alert shown
    pub alerts: Vec<(String, String)>,
}

/// In-process services for host builds and tests
#[derive(Debug, Default)]
pub struct HeadlessServices {
    state: Mutex<HeadlessState>,
}

impl HeadlessServices {
    pub fn new(state: HeadlessState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// A display of the given size with clipboard and soft keyboard support
    pub fn with_display(width: i32, height: i32) -> Self {
        Self::new(HeadlessState {
            clipboard: Some(String::new()),
            display_size: Size2i::new(width, height),
            dpi: 160,
            usable_rect: Rect2i::new(0, 0, width, height),
            has_virtual_keyboard: true,
            ..HeadlessState::default()
        })
    }

    /// Snapshot of the current state
    pub fn state(&self) -> HeadlessState {
        self.lock().clone()
    }

    /// Update the state in place
    pub fn update(&self, f: impl FnOnce(&mut HeadlessState)) {
        f(&mut self.lock());
    }

    fn lock(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlatformServices for HeadlessServices {
    fn clipboard(&self) -> Option<String> {
        self.lock().clipboard.clone()
    }

    fn set_clipboard(&self, text: &str) -> bool {
        match self.lock().clipboard.as_mut() {
            Some(clipboard) => {
                text.clone_into(clipboard);
                true
            }
            None => false,
        }
    }

    fn set_keep_screen_on(&self, enable: bool) {
        self.lock().keep_screen_on = enable;
    }

    fn screen_orientation(&self) -> ScreenOrientation {
        self.lock().orientation
    }

    fn set_screen_orientation(&self, orientation: ScreenOrientation) {
        self.lock().orientation = orientation;
    }

    fn display_size(&self) -> Size2i {
        self.lock().display_size
    }

    fn screen_dpi(&self) -> i32 {
        self.lock().dpi
    }

    fn screen_usable_rect(&self) -> Rect2i {
        self.lock().usable_rect
    }

    fn has_virtual_keyboard(&self) -> bool {
        self.lock().has_virtual_keyboard
    }

    fn show_virtual_keyboard(&self, request: &VirtualKeyboardRequest) {
        self.lock().virtual_keyboard = Some(request.clone());
    }

    fn hide_virtual_keyboard(&self) {
        self.lock().virtual_keyboard = None;
    }

    fn virtual_keyboard_height(&self) -> i32 {
        let state = self.lock();
        if state.virtual_keyboard.is_some() {
            state.virtual_keyboard_height
        } else {
            0
        }
    }

    fn set_pointer_icon(&self, icon: i32) {
        self.lock().pointer_icon = icon;
    }

    fn request_pointer_capture(&self) {
        self.lock().pointer_captured = true;
    }

    fn release_pointer_capture(&self) {
        self.lock().pointer_captured = false;
    }

    fn alert(&self, message: &str, title: &str) {
        tracing::error!("{}: {}", title, message);
        self.lock()
            .alerts
            .push((message.to_owned(), title.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_unsupported_when_absent() {
        let services = HeadlessServices::default();
        assert_eq!(services.clipboard(), None);
        assert!(!services.set_clipboard("text"));
    }

    #[test]
    fn test_clipboard_round_trip() {
        let services = HeadlessServices::with_display(800, 600);
        assert!(services.set_clipboard("copied"));
        assert_eq!(services.clipboard().as_deref(), Some("copied"));
    }

    #[test]
    fn test_keyboard_height_only_while_shown() {
        let services = HeadlessServices::with_display(800, 600);
        services.update(|state| state.virtual_keyboard_height = 300);
        assert_eq!(services.virtual_keyboard_height(), 0);

        services.show_virtual_keyboard(&VirtualKeyboardRequest::default());
        assert_eq!(services.virtual_keyboard_height(), 300);

        services.hide_virtual_keyboard();
        assert_eq!(services.virtual_keyboard_height(), 0);
    }
}
