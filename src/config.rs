use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming an optional JSON settings file.
pub const CONFIG_ENV: &str = "SCORE_PANDA_CONFIG";

// ---------------------------------------------------------------------------
// Application settings
// ---------------------------------------------------------------------------

/// Tunable thresholds and names. Every field falls back to its default when
/// absent from the settings file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Scores at or above this pass.
    pub pass_threshold: f64,
    /// Scores at or above this are listed as high scorers.
    pub high_score_threshold: f64,
    /// Chart y-axis upper bound as a multiple of the top score.
    pub chart_headroom: f64,
    /// Suggested file name for the CSV export.
    pub export_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pass_threshold: 60.0,
            high_score_threshold: 80.0,
            chart_headroom: 1.1,
            export_file_name: "student_scores.csv".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Settings from `$SCORE_PANDA_CONFIG` if set, defaults otherwise.
    /// A broken settings file is logged and ignored.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded settings from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("Falling back to default settings: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "pass_threshold": 50 }}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.pass_threshold, 50.0);
        assert_eq!(config.high_score_threshold, 80.0);
        assert_eq!(config.export_file_name, "student_scores.csv");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "pass_treshold": 50 }}"#).unwrap();

        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::from_file(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
