//! Display server capability interface
//!
//! A display server abstracts a platform's windowing, screen metrics and
//! platform services for the engine core. Backends implement
//! [`DisplayServer`]; operations a platform cannot support either fall back
//! to a default or are silent no-ops, and are reported through
//! [`DisplayServer::has_feature`].

use lumen_core::{ButtonMask, Point2i, Rect2, Rect2i, Size2i};
use serde::{Deserialize, Serialize};

use crate::surface::VSyncMode;
use crate::window::{ListenerId, WindowListener};

/// Window identifier
pub type WindowId = u32;

/// The only window on single-window platforms
pub const MAIN_WINDOW_ID: WindowId = 0;

/// Pseudo screen index meaning "the screen the main window is on"
pub const SCREEN_OF_MAIN_WINDOW: i32 = -1;

/// Identifier of an engine object attached to a window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

/// Optional display server capabilities
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    GlobalMenu,
    Subwindows,
    TouchScreen,
    Mouse,
    MouseWarp,
    Clipboard,
    VirtualKeyboard,
    CursorShape,
    CustomCursorShape,
    NativeDialog,
    Ime,
    WindowTransparency,
    Hidpi,
    Icon,
    NativeIcon,
    Orientation,
    KeepScreenOn,
    ConsoleWindow,
}

/// Screen orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum ScreenOrientation {
    #[default]
    Landscape = 0,
    Portrait = 1,
    ReverseLandscape = 2,
    ReversePortrait = 3,
    SensorLandscape = 4,
    SensorPortrait = 5,
    Sensor = 6,
}

impl ScreenOrientation {
    /// Convert from the raw value used across the platform bridge
    pub const fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(ScreenOrientation::Landscape),
            1 => Some(ScreenOrientation::Portrait),
            2 => Some(ScreenOrientation::ReverseLandscape),
            3 => Some(ScreenOrientation::ReversePortrait),
            4 => Some(ScreenOrientation::SensorLandscape),
            5 => Some(ScreenOrientation::SensorPortrait),
            6 => Some(ScreenOrientation::Sensor),
            _ => None,
        }
    }

    pub const fn to_raw(self) -> i32 {
        self as i32
    }
}

/// Window presentation mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WindowMode {
    #[default]
    Windowed,
    Minimized,
    Maximized,
    Fullscreen,
}

/// Per-window boolean flags
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WindowFlag {
    ResizeDisabled,
    Borderless,
    AlwaysOnTop,
    Transparent,
    NoFocus,
}

/// How the mouse cursor behaves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MouseMode {
    #[default]
    Visible,
    Hidden,
    Captured,
    Confined,
    ConfinedHidden,
}

/// Cursor shapes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
    Text,
    Crosshair,
    Move,
    NotAllowed,
    ResizeNS,
    ResizeEW,
    ResizeNESW,
    ResizeNWSE,
    Grab,
    Grabbing,
    Wait,
    Progress,
    Help,
    None,
}

/// Parameters for showing the on-screen keyboard
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VirtualKeyboardRequest {
    /// Text already in the edited field
    pub existing_text: String,
    /// Area of the edited field, in window coordinates
    pub screen_rect: Rect2,
    pub multiline: bool,
    /// Maximum text length, -1 for unlimited
    pub max_length: i32,
    /// Selection start, -1 for none
    pub cursor_start: i32,
    /// Selection end, -1 for none
    pub cursor_end: i32,
}

/// Platform windowing, screen and services capabilities
pub trait DisplayServer {
    /// Backend name
    fn name(&self) -> &'static str;

    /// Whether the backend supports a capability
    fn has_feature(&self, feature: Feature) -> bool;

    // Clipboard

    fn clipboard_set(&mut self, text: &str);
    fn clipboard_get(&self) -> String;

    // Screens

    fn screen_set_keep_on(&mut self, enable: bool);
    fn screen_is_kept_on(&self) -> bool;
    fn screen_set_orientation(&mut self, orientation: ScreenOrientation, screen: i32);
    fn screen_get_orientation(&self, screen: i32) -> ScreenOrientation;
    fn screen_count(&self) -> i32;
    fn screen_position(&self, screen: i32) -> Point2i;
    fn screen_size(&self, screen: i32) -> Size2i;
    fn screen_usable_rect(&self, screen: i32) -> Rect2i;
    fn screen_dpi(&self, screen: i32) -> i32;
    fn screen_is_touchscreen(&self, screen: i32) -> bool;

    // Virtual keyboard

    fn virtual_keyboard_show(&mut self, request: &VirtualKeyboardRequest);
    fn virtual_keyboard_hide(&mut self);
    fn virtual_keyboard_height(&self) -> i32;

    // Windows

    fn window_list(&self) -> Vec<WindowId>;
    fn window_at_screen_position(&self, position: Point2i) -> WindowId;
    fn window_attach_instance_id(&mut self, instance: ObjectId, window: WindowId);
    fn window_attached_instance_id(&self, window: WindowId) -> ObjectId;
    fn window_set_title(&mut self, title: &str, window: WindowId);
    fn window_current_screen(&self, window: WindowId) -> i32;
    fn window_set_current_screen(&mut self, screen: i32, window: WindowId);
    fn window_position(&self, window: WindowId) -> Point2i;
    fn window_set_position(&mut self, position: Point2i, window: WindowId);
    fn window_set_transient(&mut self, window: WindowId, parent: WindowId);
    fn window_max_size(&self, window: WindowId) -> Size2i;
    fn window_set_max_size(&mut self, size: Size2i, window: WindowId);
    fn window_min_size(&self, window: WindowId) -> Size2i;
    fn window_set_min_size(&mut self, size: Size2i, window: WindowId);
    fn window_size(&self, window: WindowId) -> Size2i;
    fn window_set_size(&mut self, size: Size2i, window: WindowId);
    fn window_real_size(&self, window: WindowId) -> Size2i;
    fn window_mode(&self, window: WindowId) -> WindowMode;
    fn window_set_mode(&mut self, mode: WindowMode, window: WindowId);
    fn window_is_maximize_allowed(&self, window: WindowId) -> bool;
    fn window_flag(&self, flag: WindowFlag, window: WindowId) -> bool;
    fn window_set_flag(&mut self, flag: WindowFlag, enabled: bool, window: WindowId);
    fn window_request_attention(&mut self, window: WindowId);
    fn window_move_to_foreground(&mut self, window: WindowId);
    fn window_can_draw(&self, window: WindowId) -> bool;
    fn can_any_window_draw(&self) -> bool;
    fn window_vsync_mode(&self, window: WindowId) -> VSyncMode;
    fn window_set_vsync_mode(&mut self, mode: VSyncMode, window: WindowId);

    // Listeners

    fn add_window_listener(&mut self, listener: Box<dyn WindowListener>) -> ListenerId;
    fn remove_window_listener(&mut self, id: ListenerId) -> bool;

    // Mouse and cursor

    fn mouse_set_mode(&mut self, mode: MouseMode);
    fn mouse_mode(&self) -> MouseMode;
    fn mouse_position(&self) -> Point2i;
    fn mouse_button_state(&self) -> ButtonMask;
    fn cursor_set_shape(&mut self, shape: Cursor);
    fn cursor_shape(&self) -> Cursor;

    /// Flush accumulated input to the window listeners
    fn process_events(&mut self);
}
