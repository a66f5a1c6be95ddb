//! Core configuration.
//!
//! # Responsibility
//! - Hold tunables for storage, percentage convention and logging.
//! - Load them from JSON with defaults for every missing field.
//!
//! # Invariants
//! - A validated `CoreSettings` has a non-blank storage key and a supported
//!   log level.

use crate::logging::{default_log_level, normalize_level};
use crate::model::aggregate::EmptyDayPolicy;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Durable-store slot the ledger blob lives in.
pub const DEFAULT_STORAGE_KEY: &str = "attendanceData";

/// Settings load/validation errors.
#[derive(Debug)]
pub enum SettingsError {
    Parse(serde_json::Error),
    EmptyStorageKey,
    InvalidLogLevel(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid settings JSON: {err}"),
            Self::EmptyStorageKey => write!(f, "storage_key cannot be empty"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Tunables for the attendance core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreSettings {
    /// Key of the durable slot holding the ledger blob.
    pub storage_key: String,
    /// Percentage reported for dates with no initialized period.
    pub empty_day_policy: EmptyDayPolicy,
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            empty_day_policy: EmptyDayPolicy::default(),
            log_level: default_log_level().to_string(),
        }
    }
}

impl CoreSettings {
    /// Parses and validates settings JSON; absent fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text).map_err(SettingsError::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.storage_key.trim().is_empty() {
            return Err(SettingsError::EmptyStorageKey);
        }
        normalize_level(&self.log_level).map_err(SettingsError::InvalidLogLevel)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreSettings, SettingsError, DEFAULT_STORAGE_KEY};
    use crate::model::aggregate::EmptyDayPolicy;

    #[test]
    fn empty_object_yields_defaults() {
        let settings = CoreSettings::from_json("{}").unwrap();
        assert_eq!(settings, CoreSettings::default());
        assert_eq!(settings.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(settings.empty_day_policy, EmptyDayPolicy::FullAttendance);
    }

    #[test]
    fn fields_override_defaults() {
        let settings =
            CoreSettings::from_json(r#"{"empty_day_policy":"no_data","log_level":"WARN"}"#)
                .unwrap();
        assert_eq!(settings.empty_day_policy, EmptyDayPolicy::NoData);
        assert_eq!(settings.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            CoreSettings::from_json(r#"{"storage_key":"  "}"#),
            Err(SettingsError::EmptyStorageKey)
        ));
        assert!(matches!(
            CoreSettings::from_json(r#"{"log_level":"loud"}"#),
            Err(SettingsError::InvalidLogLevel(_))
        ));
        assert!(matches!(
            CoreSettings::from_json("not json"),
            Err(SettingsError::Parse(_))
        ));
    }
}
