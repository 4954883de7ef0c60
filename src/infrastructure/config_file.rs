//! YAML configuration file for the bot-facing pieces of the crate.

use crate::application::command::{CommandParser, DEFAULT_KEYWORD, DEFAULT_UNLOCK_COMMAND};
use crate::application::config::{BuildError, SuppressorConfig};
use crate::application::gate::{AccessPolicy, ReplyGate};
use crate::application::ports::{Clock, SimilarityOracle};
use crate::application::suppressor::DuplicateReplySuppressor;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Error loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing YAML config")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid suppressor settings: {0}")]
    Invalid(#[from] BuildError),
}

/// Gate section: command words and allow-lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    pub keyword: String,
    pub unlock_command: String,
    pub admins: BTreeSet<String>,
    pub manage_group: Option<String>,
    pub checked_groups: BTreeSet<String>,
    pub exempt_users: BTreeSet<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD.to_owned(),
            unlock_command: DEFAULT_UNLOCK_COMMAND.to_owned(),
            admins: BTreeSet::new(),
            manage_group: None,
            checked_groups: BTreeSet::new(),
            exempt_users: BTreeSet::new(),
        }
    }
}

impl GateConfig {
    pub fn parser(&self) -> CommandParser {
        CommandParser::new(self.keyword.clone(), self.unlock_command.clone())
    }

    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy {
            admins: self.admins.clone(),
            manage_group: self.manage_group.clone(),
            checked_groups: self.checked_groups.clone(),
            exempt_users: self.exempt_users.clone(),
        }
    }
}

/// Whole configuration file.
///
/// ```
/// use reply_throttle::BotConfig;
/// use std::time::Duration;
///
/// let config = BotConfig::from_yaml_str(
///     "suppressor:\n  expiry_secs: 60\ngate:\n  checked_groups: [g1]\n",
/// )
/// .unwrap();
/// assert_eq!(config.suppressor.expiry, Duration::from_secs(60));
/// assert!(config.gate.checked_groups.contains("g1"));
/// assert_eq!(config.gate.keyword, "貓");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    pub suppressor: SuppressorConfig,
    pub gate: GateConfig,
}

impl BotConfig {
    /// Read and validate a YAML file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, is not valid YAML
    /// for this layout, or holds invalid suppressor settings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Parse and validate YAML text.
    ///
    /// An empty document gives the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: BotConfig = if yaml.trim().is_empty() {
            BotConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.suppressor.validate()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Build a gate and its suppressor with the given adapters.
    pub fn build_gate(
        &self,
        clock: Arc<dyn Clock>,
        oracle: Arc<dyn SimilarityOracle>,
    ) -> Result<ReplyGate, ConfigError> {
        let suppressor = DuplicateReplySuppressor::new(self.suppressor.clone(), clock, oracle)?;
        Ok(ReplyGate::new(
            self.gate.parser(),
            self.gate.policy(),
            Arc::new(suppressor),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::similarity::DamerauLevenshtein;
    use std::io::Write;
    use std::time::Duration;

    const FULL: &str = r#"
suppressor:
  expiry_secs: 60
  similarity_threshold: 0.75
  suppress_empty_replies: true
  record_empty_replies: false
  max_entries: 100
gate:
  keyword: "喵"
  unlock_command: "unlock"
  admins: ["a1", "a2"]
  manage_group: "staff"
  checked_groups: ["lobby"]
  exempt_users: ["vip"]
"#;

    #[test]
    fn test_full_file() {
        let config = BotConfig::from_yaml_str(FULL).unwrap();

        assert_eq!(config.suppressor.expiry, Duration::from_secs(60));
        assert_eq!(config.suppressor.similarity_threshold, 0.75);
        assert!(config.suppressor.suppress_empty_replies);
        assert!(!config.suppressor.record_empty_replies);
        assert_eq!(config.suppressor.max_entries, Some(100));

        assert_eq!(config.gate.parser(), CommandParser::new("喵", "unlock"));
        let policy = config.gate.policy();
        assert_eq!(policy.admins.len(), 2);
        assert_eq!(policy.manage_group.as_deref(), Some("staff"));
        assert!(policy.checked_groups.contains("lobby"));
        assert!(policy.exempt_users.contains("vip"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(BotConfig::from_yaml_str("").unwrap(), BotConfig::default());
        assert_eq!(BotConfig::from_yaml_str("{}").unwrap(), BotConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = BotConfig::from_yaml_str("suppressor:\n  similarity_threshold: 3.0\n");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(BuildError::InvalidThreshold(_)))
        ));

        let result = BotConfig::from_yaml_str("suppressor:\n  expiry_secs: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(BuildError::ZeroExpiry))));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result = BotConfig::from_yaml_str("throttle:\n  rate: 1\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let config = BotConfig::load(file.path()).unwrap();
        assert_eq!(config.gate.keyword, "喵");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = BotConfig::load(dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_yaml_output_reloads() {
        let config = BotConfig::from_yaml_str(FULL).unwrap();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(BotConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_accepted_expiries_survive_yaml() {
        for secs in [1, 60, 3600, 86_400] {
            let config = BotConfig {
                suppressor: SuppressorConfig {
                    expiry: Duration::from_secs(secs),
                    ..Default::default()
                },
                ..Default::default()
            };
            let reloaded = BotConfig::from_yaml_str(&config.to_yaml().unwrap()).unwrap();
            assert_eq!(reloaded, config);
        }

        // Sub-second expiries never get as far as the file
        let fractional = SuppressorConfig {
            expiry: Duration::from_millis(500),
            ..Default::default()
        };
        assert!(matches!(
            fractional.validate(),
            Err(BuildError::FractionalExpiry(_))
        ));
    }

    #[test]
    fn test_build_gate() {
        let config = BotConfig::from_yaml_str(FULL).unwrap();
        let gate = config
            .build_gate(Arc::new(SystemClock::new()), Arc::new(DamerauLevenshtein))
            .unwrap();
        assert_eq!(gate.parser().keyword, "喵");
        assert_eq!(gate.suppressor().config().max_entries, Some(100));
    }
}
