//! Environment-driven configuration.
//!
//! # Responsibility
//! - Resolve store path, logging and anti-forgery settings from `FEEDBACK_*`
//!   environment variables with stable defaults.
//!
//! # Invariants
//! - Invalid values produce `ConfigError`; resolution never panics.
//! - The anti-forgery secret is never included in `Debug` output.

use crate::auth::nonce::{AntiForgery, NonceError, DEFAULT_LIFETIME};
use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "FEEDBACK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "FEEDBACK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FEEDBACK_LOG_DIR";
pub const ENV_NONCE_SECRET: &str = "FEEDBACK_NONCE_SECRET";
pub const ENV_NONCE_LIFETIME_SECS: &str = "FEEDBACK_NONCE_LIFETIME_SECS";

const DEFAULT_DB_FILE_NAME: &str = "feedback.sqlite3";

/// Configuration resolution failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    MissingValue(&'static str),
    AntiForgery(NonceError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for {key}: {reason}")
            }
            Self::MissingValue(key) => write!(f, "{key} must be set"),
            Self::AntiForgery(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AntiForgery(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NonceError> for ConfigError {
    fn from(value: NonceError) -> Self {
        Self::AntiForgery(value)
    }
}

/// Resolved runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct FeedbackConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
    pub nonce_secret: Option<String>,
    pub nonce_lifetime: Duration,
}

impl std::fmt::Debug for FeedbackConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackConfig")
            .field("db_path", &self.db_path)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("nonce_secret", &self.nonce_secret.as_ref().map(|_| "<redacted>"))
            .field("nonce_lifetime", &self.nonce_lifetime)
            .finish()
    }
}

impl FeedbackConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, which maps a key to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(value) => normalize_level(&value).map_err(|err| ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL,
                value: value.clone(),
                reason: err.to_string(),
            })?,
            None => default_log_level(),
        };

        let log_dir = match read(ENV_LOG_DIR).map(PathBuf::from) {
            Some(dir) if !dir.is_absolute() => {
                return Err(ConfigError::InvalidValue {
                    key: ENV_LOG_DIR,
                    value: dir.display().to_string(),
                    reason: "must be an absolute path".to_string(),
                });
            }
            other => other,
        };

        let nonce_lifetime = match read(ENV_NONCE_LIFETIME_SECS) {
            Some(value) => {
                let secs = value
                    .parse::<u64>()
                    .map_err(|err| ConfigError::InvalidValue {
                        key: ENV_NONCE_LIFETIME_SECS,
                        value: value.clone(),
                        reason: err.to_string(),
                    })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_LIFETIME,
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            nonce_secret: read(ENV_NONCE_SECRET),
            nonce_lifetime,
        })
    }

    /// Builds the anti-forgery authority from the configured secret.
    ///
    /// # Errors
    /// - `MissingValue` when no secret is configured.
    /// - `AntiForgery` when the secret or lifetime is too weak.
    pub fn anti_forgery(&self) -> Result<AntiForgery, ConfigError> {
        let secret = self
            .nonce_secret
            .as_ref()
            .ok_or(ConfigError::MissingValue(ENV_NONCE_SECRET))?;
        Ok(AntiForgery::new(secret.as_bytes(), self.nonce_lifetime)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, FeedbackConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL,
        ENV_NONCE_LIFETIME_SECS, ENV_NONCE_SECRET,
    };
    use crate::auth::nonce::NonceError;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = FeedbackConfig::from_lookup(lookup(&[])).expect("defaults resolve");
        assert!(config.db_path.ends_with("feedback.sqlite3"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.nonce_secret, None);
        assert_eq!(config.nonce_lifetime, Duration::from_secs(86_400));
        assert_eq!(
            config.anti_forgery().unwrap_err(),
            ConfigError::MissingValue(ENV_NONCE_SECRET)
        );
    }

    #[test]
    fn explicit_values_are_trimmed_and_applied() {
        let config = FeedbackConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, " /var/lib/feedback/entries.db "),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, "/var/log/feedback"),
            (ENV_NONCE_SECRET, "0123456789abcdef0123"),
            (ENV_NONCE_LIFETIME_SECS, "3600"),
        ]))
        .expect("explicit config resolves");
        assert_eq!(config.db_path, PathBuf::from("/var/lib/feedback/entries.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/feedback")));
        assert_eq!(config.nonce_lifetime, Duration::from_secs(3600));
        assert!(config.anti_forgery().is_ok());
        assert!(!format!("{config:?}").contains("0123456789abcdef0123"));
    }

    #[test]
    fn invalid_values_are_reported_by_key() {
        let err = FeedbackConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == ENV_LOG_LEVEL));

        let err = FeedbackConfig::from_lookup(lookup(&[(ENV_LOG_DIR, "logs")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == ENV_LOG_DIR));

        let err = FeedbackConfig::from_lookup(lookup(&[(ENV_NONCE_LIFETIME_SECS, "soon")]))
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { key, .. } if key == ENV_NONCE_LIFETIME_SECS)
        );
    }

    #[test]
    fn weak_secret_is_rejected_when_building_authority() {
        let config = FeedbackConfig::from_lookup(lookup(&[(ENV_NONCE_SECRET, "short")]))
            .expect("config resolves");
        assert!(matches!(
            config.anti_forgery(),
            Err(ConfigError::AntiForgery(NonceError::SecretTooShort { .. }))
        ));
    }
}
