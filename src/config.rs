use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::chart::ChartStyle;
use crate::page::PROFILES_SECTION;

/// User configuration for the dashboard renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Directory holding `data.json` and the rendered `index.html`.
    #[serde(default = "DashboardSettings::default_web_dir")]
    pub web_dir: PathBuf,
    /// Tab shown once rendering completes.
    #[serde(default = "DashboardSettings::default_tab")]
    pub default_tab: String,
    /// Address the `serve` command binds to.
    #[serde(default = "DashboardSettings::default_listen_addr")]
    pub listen_addr: String,
    /// Script URL for the Chart.js bundle.
    #[serde(default = "DashboardSettings::default_chart_js_url")]
    pub chart_js_url: String,
    #[serde(default = "DashboardSettings::default_title")]
    pub title: String,
    #[serde(default)]
    pub chart: ChartStyle,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl DashboardSettings {
    fn default_web_dir() -> PathBuf {
        PathBuf::from("web")
    }

    fn default_tab() -> String {
        PROFILES_SECTION.into()
    }

    fn default_listen_addr() -> String {
        "127.0.0.1:8080".into()
    }

    fn default_chart_js_url() -> String {
        "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js".into()
    }

    fn default_title() -> String {
        "Benchmark Dashboard".into()
    }

    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Unable to read config at {}", path.display()))?;
            let parsed: Self = serde_json::from_str(&raw)
                .with_context(|| format!("Malformed config at {}", path.display()))?;
            Ok(parsed)
        } else {
            let settings = Self::default();
            settings.save(path)?;
            Ok(settings)
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }
        let serialised = serde_json::to_string_pretty(self)?;
        fs::write(path, serialised)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            web_dir: Self::default_web_dir(),
            default_tab: Self::default_tab(),
            listen_addr: Self::default_listen_addr(),
            chart_js_url: Self::default_chart_js_url(),
            title: Self::default_title(),
            chart: ChartStyle::default(),
            telemetry: TelemetrySettings::default(),
        }
    }
}

/// Optional structured log export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetrySettings {
    /// Directory for JSON log files; console logging only when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

pub fn default_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("dev", "bee-pagoda", "Pagoda")
        .context("Unable to resolve platform config directory")?;
    Ok(dirs.config_dir().join("dashboard.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_or_default_writes_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested/dashboard.json");

        let settings = DashboardSettings::load_or_default(&path).unwrap();
        assert!(path.exists());
        assert_eq!(settings.default_tab, "profiles");
        assert_eq!(settings.web_dir, PathBuf::from("web"));

        let reloaded = DashboardSettings::load_or_default(&path).unwrap();
        assert_eq!(reloaded.listen_addr, settings.listen_addr);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("dashboard.json");
        fs::write(
            &path,
            r#"{ "default_tab": "graphics", "chart": { "bar_fill": "orange" } }"#,
        )
        .unwrap();

        let settings = DashboardSettings::load_or_default(&path).unwrap();
        assert_eq!(settings.default_tab, "graphics");
        assert_eq!(settings.chart.bar_fill, "orange");
        assert_eq!(settings.chart.line_border, "cyan");
        assert!(settings.telemetry.log_dir.is_none());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("dashboard.json");
        fs::write(&path, "{").unwrap();
        let err = DashboardSettings::load_or_default(&path).unwrap_err();
        assert!(err.to_string().contains("Malformed config"));
    }
}
