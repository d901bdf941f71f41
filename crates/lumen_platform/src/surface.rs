//! Graphics surface strategy
//!
//! The display server owns the swapchain/surface used by the rendering
//! backend, but not how it is made. A [`GraphicsSurfaceProvider`] is picked at
//! startup from the configured [`RenderingDriver`] and hides the graphics API
//! behind one contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::display::WindowId;
use crate::error::{PlatformError, Result};

/// Rendering driver requested by the application
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderingDriver {
    #[default]
    Vulkan,
    #[serde(rename = "opengl3")]
    OpenGl3,
}

impl RenderingDriver {
    /// Driver name as used in configuration
    pub const fn name(self) -> &'static str {
        match self {
            RenderingDriver::Vulkan => "vulkan",
            RenderingDriver::OpenGl3 => "opengl3",
        }
    }
}

impl fmt::Display for RenderingDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderingDriver {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vulkan" => Ok(RenderingDriver::Vulkan),
            "opengl3" | "opengl" | "gles" => Ok(RenderingDriver::OpenGl3),
            other => Err(PlatformError::Unsupported(format!(
                "Unknown rendering driver: {}",
                other
            ))),
        }
    }
}

/// Presentation synchronization mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VSyncMode {
    Disabled,
    #[default]
    Enabled,
    Adaptive,
    Mailbox,
}

/// Creates and tears down the presentation surface for a window
///
/// Calls are synchronous and never concurrent with rendering: the display
/// server only invokes them during construction, explicit reset and drop.
pub trait GraphicsSurfaceProvider {
    /// Driver this provider implements
    fn driver(&self) -> RenderingDriver;

    /// Initialize the graphics context (instance, loader)
    fn initialize(&mut self) -> Result<()>;

    /// Create the swapchain/surface for a window
    fn window_create(
        &mut self,
        window: WindowId,
        vsync_mode: VSyncMode,
        width: u32,
        height: u32,
    ) -> Result<()>;

    /// Destroy the surface of a window, if any
    fn window_destroy(&mut self, window: WindowId);

    /// Current vsync mode of a window's surface
    fn vsync_mode(&self, window: WindowId) -> VSyncMode;

    /// Change the vsync mode of a window's surface
    fn set_vsync_mode(&mut self, window: WindowId, mode: VSyncMode);

    /// Release every graphics resource
    fn finalize(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_names_round_trip() {
        for driver in [RenderingDriver::Vulkan, RenderingDriver::OpenGl3] {
            assert_eq!(driver.name().parse::<RenderingDriver>().ok(), Some(driver));
        }
        assert_eq!(
            "GLES".parse::<RenderingDriver>().ok(),
            Some(RenderingDriver::OpenGl3)
        );
        assert!("metal".parse::<RenderingDriver>().is_err());
    }
}
