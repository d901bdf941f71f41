//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Failed to initialize platform
    #[error("Platform initialization failed: {0}")]
    InitFailed(String),

    /// Platform not available
    #[error("Platform not available: {0}")]
    Unavailable(String),

    /// Platform not supported on this OS
    #[error("Platform not supported: {0}")]
    Unsupported(String),

    /// Failed to create or reset the graphics surface
    #[error("Graphics surface creation failed: {0}")]
    SurfaceCreation(String),

    /// The platform services provider is missing
    #[error("Platform services unavailable for {0}")]
    ServicesUnavailable(&'static str),

    /// Failed to read or parse configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A call across the Java bridge failed
    #[error("JNI call failed: {0}")]
    Jni(String),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
