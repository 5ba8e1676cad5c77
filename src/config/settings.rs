use crate::utils::error::{IntakeError, Result};
use crate::utils::validation::{validate_path, validate_positive_number, Validate};
use chrono::TimeDelta;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SLOT_INTERVAL_MINUTES: i64 = 30;
pub const DEFAULT_DATABASE_PATH: &str = "./campaign-intake.db";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(default = "default_slot_interval")]
    pub slot_interval_minutes: i64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slot_interval_minutes: DEFAULT_SLOT_INTERVAL_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

fn default_slot_interval() -> i64 {
    DEFAULT_SLOT_INTERVAL_MINUTES
}

fn default_database_path() -> String {
    DEFAULT_DATABASE_PATH.to_string()
}

impl IntakeConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${INTAKE_DB})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| IntakeError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn slot_interval(&self) -> TimeDelta {
        TimeDelta::minutes(self.booking.slot_interval_minutes)
    }

    pub fn database_path(&self) -> &str {
        &self.storage.database_path
    }
}

impl Validate for IntakeConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number(
            "booking.slot_interval_minutes",
            self.booking.slot_interval_minutes,
            1,
        )
        .map_err(IntakeError::into_config_error)?;

        // a slot longer than a day can never fit a campaign
        if self.booking.slot_interval_minutes > 24 * 60 {
            return Err(IntakeError::InvalidConfigValueError {
                field: "booking.slot_interval_minutes".to_string(),
                value: self.booking.slot_interval_minutes.to_string(),
                reason: "Value must be at most 1440".to_string(),
            });
        }

        validate_path("storage.database_path", &self.storage.database_path)
            .map_err(IntakeError::into_config_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[booking]
slot_interval_minutes = 20

[storage]
database_path = "/var/lib/intake/appointments.db"

[logging]
json = true
"#;

        let config = IntakeConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.slot_interval(), TimeDelta::minutes(20));
        assert_eq!(config.database_path(), "/var/lib/intake/appointments.db");
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = IntakeConfig::from_toml_str("").unwrap();
        assert_eq!(config, IntakeConfig::default());
        assert_eq!(config.slot_interval(), TimeDelta::minutes(30));
        assert_eq!(config.database_path(), DEFAULT_DATABASE_PATH);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("INTAKE_TEST_DB_PATH", "/tmp/intake-test.db");

        let toml_content = r#"
[storage]
database_path = "${INTAKE_TEST_DB_PATH}"
"#;

        let config = IntakeConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.database_path(), "/tmp/intake-test.db");

        std::env::remove_var("INTAKE_TEST_DB_PATH");
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let config = IntakeConfig::from_toml_str("[booking]\nslot_interval_minutes = 0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, IntakeError::InvalidConfigValueError { .. }));
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = IntakeConfig::from_toml_str("[booking\n").unwrap_err();
        assert_eq!(
            err.category(),
            crate::utils::error::ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[booking]\nslot_interval_minutes = 15\n")
            .unwrap();

        let config = IntakeConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.booking.slot_interval_minutes, 15);
    }
}
