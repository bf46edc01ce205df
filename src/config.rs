use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::raster::OutputFormat;

pub const CONFIG_ENV: &str = "QUICKLOOK_CONFIG";
pub const FORMAT_ENV: &str = "QUICKLOOK_FORMAT";
pub const UI_ENV: &str = "QUICKLOOK_UI";
pub const REPORT_ENV: &str = "QUICKLOOK_REPORT";

const DEFAULT_UI: &str = "auto";
const UI_MODES: [&str; 3] = ["auto", "plain", "pretty"];

#[derive(Debug, Deserialize, Default)]
struct QuicklookConfigFile {
    format: Option<String>,
    ui: Option<String>,
    report: Option<ReportConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct ReportConfigFile {
    path: Option<PathBuf>,
}

/// Run settings that are not positional arguments.
///
/// Resolved as defaults, then the JSON file named by `QUICKLOOK_CONFIG`, then
/// `QUICKLOOK_*` environment variables. Command-line flags are applied last by
/// the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuicklookConfig {
    pub format: OutputFormat,
    pub ui: String,
    pub report_path: Option<PathBuf>,
}

impl Default for QuicklookConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            ui: DEFAULT_UI.to_string(),
            report_path: None,
        }
    }
}

impl QuicklookConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_ENV).ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: QuicklookConfigFile) -> Result<Self> {
        let format = match file.format.as_deref() {
            Some(format) => format.parse()?,
            None => OutputFormat::default(),
        };
        let ui = file.ui.unwrap_or_else(|| DEFAULT_UI.to_string());
        let report_path = file.report.and_then(|report| report.path);
        Ok(Self {
            format,
            ui,
            report_path,
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(format) = std::env::var(FORMAT_ENV) {
            if !format.trim().is_empty() {
                self.format = format
                    .parse()
                    .map_err(|e| anyhow!("{} is invalid: {}", FORMAT_ENV, e))?;
            }
        }
        if let Ok(ui) = std::env::var(UI_ENV) {
            if !ui.trim().is_empty() {
                self.ui = ui;
            }
        }
        if let Ok(path) = std::env::var(REPORT_ENV) {
            if !path.trim().is_empty() {
                self.report_path = Some(PathBuf::from(path));
            }
        }
        Ok(())
    }

    /// Checks the resolved settings. The binary calls this again after CLI overrides.
    pub fn validate(&mut self) -> Result<()> {
        self.ui = self.ui.trim().to_lowercase();
        if !UI_MODES.contains(&self.ui.as_str()) {
            return Err(anyhow!(
                "ui mode must be one of auto, plain, pretty (got '{}')",
                self.ui
            ));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<QuicklookConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
