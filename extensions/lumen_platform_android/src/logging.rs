//! Logging setup
//!
//! On device, `log` records go to logcat through `android_logger` and
//! `tracing` events through `tracing-android`. Host builds print to stderr.
//! `RUST_LOG` overrides the configured filter in both cases.

use tracing_subscriber::EnvFilter;

/// Logcat tag
pub const LOG_TAG: &str = "Lumen";

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global logger. Later calls are ignored.
#[cfg(target_os = "android")]
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::layer::SubscriberExt;

    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag(LOG_TAG),
    );

    match tracing_android::layer(LOG_TAG) {
        Ok(layer) => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter(default_filter))
                .with(layer);
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
        Err(e) => log::error!("Failed to create logcat tracing layer: {}", e),
    }
}

/// Install the global logger. Later calls are ignored.
#[cfg(not(target_os = "android"))]
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_writer(std::io::stderr)
        .try_init();
}
