/// Player configuration
use crate::error::{RepriseError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tunables for the playback and persistence engine
///
/// Precedence when loaded (highest wins):
/// 1) Environment variables (prefix `REPRISE__`, `__` as nested separator)
/// 2) Config file (TOML, if present)
/// 3) Defaults
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Period of the autosave timer (seconds)
    #[serde(default = "default_autosave_interval_secs")]
    pub autosave_interval_secs: u64,

    /// Remaining time under which a periodic save stores position 0
    #[serde(default = "default_tick_completion_threshold_secs")]
    pub tick_completion_threshold_secs: f64,

    /// Remaining time under which a pause save stores position 0
    #[serde(default = "default_pause_completion_threshold_secs")]
    pub pause_completion_threshold_secs: f64,

    /// Small skip step (seconds)
    #[serde(default = "default_small_skip_secs")]
    pub small_skip_secs: f64,

    /// Large skip step (seconds)
    #[serde(default = "default_large_skip_secs")]
    pub large_skip_secs: f64,

    /// Playback rates cycled through, in order
    #[serde(default = "default_playback_rates")]
    pub playback_rates: Vec<f64>,

    /// JSON file used as the durable key-value store on desktop
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
}

impl PlayerConfig {
    /// Load configuration from an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path).required(false));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("REPRISE")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.autosave_interval_secs == 0 {
            return Err(RepriseError::config("autosave_interval_secs must be >= 1"));
        }

        if self.playback_rates.is_empty() {
            return Err(RepriseError::config("playback_rates must not be empty"));
        }

        if let Some(rate) = self
            .playback_rates
            .iter()
            .find(|r| !r.is_finite() || **r <= 0.0)
        {
            return Err(RepriseError::config(format!(
                "invalid playback rate {rate}"
            )));
        }

        for (name, value) in [
            ("tick_completion_threshold_secs", self.tick_completion_threshold_secs),
            ("pause_completion_threshold_secs", self.pause_completion_threshold_secs),
            ("small_skip_secs", self.small_skip_secs),
            ("large_skip_secs", self.large_skip_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RepriseError::config(format!("{name} must be >= 0")));
            }
        }

        Ok(())
    }

    /// Autosave period as a `Duration`
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: default_autosave_interval_secs(),
            tick_completion_threshold_secs: default_tick_completion_threshold_secs(),
            pause_completion_threshold_secs: default_pause_completion_threshold_secs(),
            small_skip_secs: default_small_skip_secs(),
            large_skip_secs: default_large_skip_secs(),
            playback_rates: default_playback_rates(),
            storage_path: default_storage_path(),
        }
    }
}

// Default values
fn default_autosave_interval_secs() -> u64 {
    30
}

fn default_tick_completion_threshold_secs() -> f64 {
    60.0
}

fn default_pause_completion_threshold_secs() -> f64 {
    30.0
}

fn default_small_skip_secs() -> f64 {
    9.0
}

fn default_large_skip_secs() -> f64 {
    45.0
}

fn default_playback_rates() -> Vec<f64> {
    vec![1.0, 1.15, 1.25, 1.35]
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("reprise-progress.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_player_behaviour() {
        let config = PlayerConfig::default();
        assert_eq!(config.autosave_interval(), Duration::from_secs(30));
        assert_eq!(config.tick_completion_threshold_secs, 60.0);
        assert_eq!(config.pause_completion_threshold_secs, 30.0);
        assert_eq!(config.small_skip_secs, 9.0);
        assert_eq!(config.large_skip_secs, 45.0);
        assert_eq!(config.playback_rates, vec![1.0, 1.15, 1.25, 1.35]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reprise.toml");
        std::fs::write(
            &path,
            r#"
autosave_interval_secs = 10
playback_rates = [1.0, 2.0]
storage_path = "/tmp/progress.json"
"#,
        )
        .unwrap();

        let config = PlayerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.autosave_interval_secs, 10);
        assert_eq!(config.playback_rates, vec![1.0, 2.0]);
        assert_eq!(config.storage_path, PathBuf::from("/tmp/progress.json"));
        // Untouched keys keep their defaults
        assert_eq!(config.large_skip_secs, 45.0);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let config = PlayerConfig::load(Some(&missing)).unwrap();
        assert_eq!(config.small_skip_secs, 9.0);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = PlayerConfig::default();
        config.playback_rates.clear();
        assert!(matches!(config.validate(), Err(RepriseError::Config(_))));

        let mut config = PlayerConfig::default();
        config.playback_rates = vec![1.0, 0.0];
        assert!(config.validate().is_err());

        let mut config = PlayerConfig::default();
        config.autosave_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = PlayerConfig::default();
        config.pause_completion_threshold_secs = -1.0;
        assert!(config.validate().is_err());
    }
}
