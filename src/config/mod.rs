#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::loader::MalformedLinePolicy;
use crate::domain::ports::InventoryConfig;
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use toml_config::TomlConfig;

pub const DEFAULT_INVENTORY_PATH: &str = "values.txt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    pub const VALUES: [&'static str; 2] = ["compact", "json"];
}

impl FromStr for LogFormat {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ShopError::InvalidConfigValueError {
                field: "logging.format".to_string(),
                value: other.to_string(),
                reason: format!("Valid values: {}", Self::VALUES.join(", ")),
            }),
        }
    }
}

/// Values given explicitly on the command line. `None` defers to the file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub inventory_path: Option<String>,
    pub on_malformed_line: Option<MalformedLinePolicy>,
    pub log_format: Option<LogFormat>,
    pub verbose: bool,
}

/// Effective settings: command line > TOML file > defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopSettings {
    pub inventory_path: String,
    pub on_malformed_line: MalformedLinePolicy,
    pub log_format: LogFormat,
    pub verbose: bool,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            inventory_path: DEFAULT_INVENTORY_PATH.to_string(),
            on_malformed_line: MalformedLinePolicy::default(),
            log_format: LogFormat::default(),
            verbose: false,
        }
    }
}

impl ShopSettings {
    pub fn resolve(overrides: SettingsOverrides, file: Option<&TomlConfig>) -> Result<Self> {
        let defaults = Self::default();

        let inventory_path = overrides
            .inventory_path
            .or_else(|| file.and_then(|f| f.inventory_path().map(str::to_string)))
            .unwrap_or(defaults.inventory_path);

        let on_malformed_line = match overrides.on_malformed_line {
            Some(policy) => policy,
            None => match file {
                Some(f) => f.on_malformed_line()?.unwrap_or(defaults.on_malformed_line),
                None => defaults.on_malformed_line,
            },
        };

        let log_format = match overrides.log_format {
            Some(format) => format,
            None => match file {
                Some(f) => f.log_format()?.unwrap_or(defaults.log_format),
                None => defaults.log_format,
            },
        };

        let verbose = overrides.verbose || file.is_some_and(TomlConfig::verbose);

        let settings = Self {
            inventory_path,
            on_malformed_line,
            log_format,
            verbose,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl InventoryConfig for ShopSettings {
    fn inventory_path(&self) -> &str {
        &self.inventory_path
    }

    fn on_malformed_line(&self) -> MalformedLinePolicy {
        self.on_malformed_line
    }
}

impl Validate for ShopSettings {
    fn validate(&self) -> Result<()> {
        validate_path("inventory.path", &self.inventory_path)
    }
}
