use std::fs;
use std::path::PathBuf;

use lumen_platform::{DisplayConfig, PlatformError, RenderingDriver, VSyncMode};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("lumen_platform_{}_{}", std::process::id(), name))
}

#[test]
fn load_reads_display_toml_from_disk() {
    let path = scratch_path("display.toml");
    fs::write(
        &path,
        "keep_screen_on = false\nrendering_driver = \"opengl3\"\nvsync_mode = \"adaptive\"\n",
    )
    .unwrap();

    let config = DisplayConfig::load(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(!config.keep_screen_on);
    assert_eq!(config.rendering_driver, RenderingDriver::OpenGl3);
    assert_eq!(config.vsync_mode, VSyncMode::Adaptive);
    assert_eq!(config.log_filter, "info");
}

#[test]
fn saved_config_loads_back_unchanged() {
    let path = scratch_path("saved.toml");
    let config = DisplayConfig {
        vsync_mode: VSyncMode::Mailbox,
        log_filter: "lumen_platform_android=debug".to_string(),
        ..DisplayConfig::default()
    };
    fs::write(&path, config.to_toml_string().unwrap()).unwrap();

    let loaded = DisplayConfig::load(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_file_is_a_config_error() {
    let path = scratch_path("does_not_exist.toml");
    match DisplayConfig::load(&path) {
        Err(PlatformError::Config(message)) => assert!(message.contains("Failed to read")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn unknown_vsync_mode_is_rejected() {
    let result = DisplayConfig::from_toml_str("vsync_mode = \"sometimes\"");
    assert!(matches!(result, Err(PlatformError::Config(_))));
}
