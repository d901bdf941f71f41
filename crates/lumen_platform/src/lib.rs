//! Lumen Platform
//!
//! Platform abstraction layer shared by the Lumen backends:
//!
//! - [`DisplayServer`]: windowing, screen metrics and platform services
//! - [`WindowEvent`] and [`WindowListener`]: typed window notifications
//! - [`GraphicsSurfaceProvider`]: swapchain/surface creation strategy
//! - [`DisplayConfig`]: startup settings read from TOML

pub mod config;
pub mod display;
pub mod error;
pub mod surface;
pub mod window;

pub use config::DisplayConfig;
pub use display::{
    Cursor, DisplayServer, Feature, MouseMode, ObjectId, ScreenOrientation,
    VirtualKeyboardRequest, WindowFlag, WindowId, WindowMode, MAIN_WINDOW_ID,
    SCREEN_OF_MAIN_WINDOW,
};
pub use error::{PlatformError, Result};
pub use surface::{GraphicsSurfaceProvider, RenderingDriver, VSyncMode};
pub use window::{ListenerId, WindowEvent, WindowListener, WindowListeners};
