use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::error::ConfigError;

const CONFIG_ENV_VAR: &str = "SIGNA_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "signa.json";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignaConfig {
    pub tick_interval_ms: u64,
    pub scroll_delay_ms: u64,
    pub camera_index: u32,
    pub camera_enabled: bool,
    pub detector: DetectorConfig,
}

impl Default for SignaConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 150,
            scroll_delay_ms: 50,
            camera_index: 0,
            camera_enabled: true,
            detector: DetectorConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    pub model_dir: PathBuf,
    pub palm_score_threshold: f32,
    pub palm_nms_threshold: f32,
    pub hand_score_threshold: f32,
    pub intra_threads: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            palm_score_threshold: 0.5,
            palm_nms_threshold: 0.3,
            hand_score_threshold: 0.5,
            intra_threads: 2,
        }
    }
}

impl SignaConfig {
    /// Loads the file named by `SIGNA_CONFIG`, else `signa.json` if present,
    /// else the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            return Self::from_file(fallback);
        }

        log::info!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        let thresholds = [
            ("detector.palm_score_threshold", self.detector.palm_score_threshold),
            ("detector.palm_nms_threshold", self.detector.palm_nms_threshold),
            ("detector.hand_score_threshold", self.detector.hand_score_threshold),
        ];
        for (field, value) in thresholds {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is not a finite number"),
                });
            }
        }
        if self.detector.intra_threads == 0 {
            return Err(ConfigError::Invalid {
                field: "detector.intra_threads",
                reason: "must be at least one".to_string(),
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_recognizer_constants() {
        let config = SignaConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(150));
        assert_eq!(config.scroll_delay(), Duration::from_millis(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: SignaConfig =
            serde_json::from_str(r#"{ "tick_interval_ms": 200, "detector": { "intra_threads": 4 } }"#)
                .expect("parse");
        assert_eq!(config.tick_interval_ms, 200);
        assert_eq!(config.detector.intra_threads, 4);
        assert_eq!(config.detector.model_dir, PathBuf::from("models"));
        assert_eq!(config.scroll_delay_ms, 50);
    }

    #[test]
    fn score_threshold_is_not_configurable() {
        let config: SignaConfig =
            serde_json::from_str(r#"{ "score_threshold": -1.0, "tick_interval_ms": 90 }"#)
                .expect("parse");
        assert_eq!(
            config,
            SignaConfig {
                tick_interval_ms: 90,
                ..SignaConfig::default()
            }
        );
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let config = SignaConfig {
            tick_interval_ms: 0,
            ..SignaConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "tick_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SignaConfig::from_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
