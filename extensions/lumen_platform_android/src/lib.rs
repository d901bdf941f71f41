//! Lumen Android Platform
//!
//! Display server, input translation and graphics surface for Android
//! native activities.
//!
//! The platform-independent parts (touch reconciliation, pointer tracking,
//! key translation, the display server itself) build on any host so they can
//! be driven by tests with [`HeadlessServices`] and
//! [`HeadlessSurfaceProvider`]. NDK, JNI and wgpu code is Android-only.

pub mod display;
pub mod input;
pub mod joypad;
pub mod keyboard;
pub mod logging;
pub mod pointer;
pub mod services;
pub mod surface;

#[cfg(target_os = "android")]
pub mod activity;
#[cfg(target_os = "android")]
pub mod jni_services;

pub use display::{pointer_icon, AndroidDisplayServer};
pub use input::{InputSource, MotionAction, TouchPoint, TouchReconciler, TouchSet};
pub use joypad::{JoypadEvent, JoypadEventKind};
pub use keyboard::{keycode_from_android, KeyOutcome, KeyboardTranslator, Utf16Decoder, Utf16Step};
pub use logging::init_logging;
pub use pointer::{button_index_from_mask, button_mask_from_android, PointerTracker};
pub use services::{HeadlessServices, HeadlessState, PlatformServices};
pub use surface::HeadlessSurfaceProvider;

#[cfg(target_os = "android")]
pub use activity::AndroidHost;
#[cfg(target_os = "android")]
pub use jni_services::JniPlatformServices;
#[cfg(all(target_os = "android", feature = "gpu"))]
pub use surface::WgpuSurfaceProvider;
