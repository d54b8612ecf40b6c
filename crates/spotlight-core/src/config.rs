use crate::error::{Result, SpotlightError};
use crate::paths;
use crate::store::Recurrence;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the daily schedule registration.
pub const DEFAULT_HOOK: &str = "spotlight_daily_rotation";

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds between scheduler wake-ups.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
}

fn default_port() -> u16 {
    3141
}

fn default_tick_interval() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            tick_interval_secs: default_tick_interval(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// How many products rotate out and in per run.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_hook")]
    pub hook: String,
    #[serde(default)]
    pub recurrence: Recurrence,
    /// Emit per-product rotation progress at debug level.
    #[serde(default)]
    pub debug: bool,
    /// Shared secret that grants the admin capability.
    #[serde(default)]
    pub admin_token: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_version() -> u32 {
    1
}

fn default_batch_size() -> usize {
    10
}

fn default_hook() -> String {
    DEFAULT_HOOK.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            batch_size: default_batch_size(),
            hook: default_hook(),
            recurrence: Recurrence::default(),
            debug: false,
            admin_token: None,
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Fresh config with a newly generated admin token.
    pub fn new() -> Self {
        Self {
            admin_token: Some(generate_token()),
            ..Self::default()
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(SpotlightError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(SpotlightError::InvalidConfig(
                "batch_size must be at least 1".into(),
            ));
        }
        if self.server.tick_interval_secs == 0 {
            return Err(SpotlightError::InvalidConfig(
                "server.tick_interval_secs must be at least 1".into(),
            ));
        }
        if self.hook.trim().is_empty() {
            return Err(SpotlightError::InvalidConfig("hook must not be empty".into()));
        }
        Ok(())
    }
}

/// Random alphanumeric admin token.
pub fn generate_token() -> String {
    use rand::{distributions::Alphanumeric, Rng};
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_config_has_token_and_defaults() {
        let cfg = Config::new();
        assert_eq!(cfg.batch_size, 10);
        assert_eq!(cfg.hook, DEFAULT_HOOK);
        assert_eq!(cfg.recurrence, Recurrence::Daily);
        assert!(!cfg.debug);
        assert_eq!(cfg.admin_token.as_deref().map(str::len), Some(24));
        assert_eq!(cfg.server.port, 3141);
    }

    #[test]
    fn load_missing_config_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, SpotlightError::NotInitialized));
    }

    #[test]
    fn save_then_load_preserves_fields() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new();
        cfg.batch_size = 4;
        cfg.debug = true;
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        crate::io::atomic_write(&paths::config_path(dir.path()), b"batch_size: 3\n").unwrap();

        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.batch_size, 3);
        assert_eq!(cfg.hook, DEFAULT_HOOK);
        assert_eq!(cfg.admin_token, None);
        assert_eq!(cfg.server.tick_interval_secs, 60);
    }

    #[test]
    fn recurrence_parses_snake_case() {
        let cfg: Config = serde_yaml::from_str("recurrence: twice_daily\n").unwrap();
        assert_eq!(cfg.recurrence, Recurrence::TwiceDaily);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let dir = TempDir::new().unwrap();
        crate::io::atomic_write(&paths::config_path(dir.path()), b"batch_size: 0\n").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, SpotlightError::InvalidConfig(_)));
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let mut cfg = Config::new();
        cfg.server.tick_interval_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn generated_tokens_differ() {
        assert_ne!(generate_token(), generate_token());
    }
}
