use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::NamedTempFile;

use cmos_quicklook::config::{QuicklookConfig, CONFIG_ENV, FORMAT_ENV, REPORT_ENV, UI_ENV};
use cmos_quicklook::OutputFormat;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [CONFIG_ENV, FORMAT_ENV, UI_ENV, REPORT_ENV] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = QuicklookConfig::load().expect("load config");
    assert_eq!(cfg, QuicklookConfig::default());
    assert_eq!(cfg.format, OutputFormat::Pgm);
    assert_eq!(cfg.ui, "auto");
    assert!(cfg.report_path.is_none());
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "format": "raw",
        "ui": "plain",
        "report": { "path": "/tmp/quicklook_summary.json" }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var(CONFIG_ENV, file.path());
    std::env::set_var(UI_ENV, "Pretty");
    std::env::set_var(FORMAT_ENV, "  ");

    let cfg = QuicklookConfig::load().expect("load config");

    assert_eq!(cfg.format, OutputFormat::Raw);
    assert_eq!(cfg.ui, "pretty");
    assert_eq!(
        cfg.report_path,
        Some(PathBuf::from("/tmp/quicklook_summary.json"))
    );

    clear_env();
}

#[test]
fn invalid_values_are_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var(FORMAT_ENV, "tiff");
    assert!(QuicklookConfig::load().is_err());
    clear_env();

    std::env::set_var(UI_ENV, "fancy");
    assert!(QuicklookConfig::load().is_err());
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, b"{ not json").expect("write config");
    std::env::set_var(CONFIG_ENV, file.path());
    let err = QuicklookConfig::load().unwrap_err();
    assert!(err.to_string().contains("invalid config file"));
    clear_env();
}
