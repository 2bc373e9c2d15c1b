use crate::config::LogFormat;
use crate::core::loader::MalformedLinePolicy;
use crate::utils::error::{Result, ShopError};
use crate::utils::validation::{validate_one_of, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub inventory: Option<InventorySection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventorySection {
    pub path: Option<String>,
    pub on_malformed_line: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ShopError::ConfigValidationError {
                field: "config".to_string(),
                message: format!("cannot read {}: {}", path.display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ShopError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHOP_DATA})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ShopError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn inventory_path(&self) -> Option<&str> {
        self.inventory.as_ref()?.path.as_deref()
    }

    pub fn on_malformed_line(&self) -> Result<Option<MalformedLinePolicy>> {
        self.inventory
            .as_ref()
            .and_then(|s| s.on_malformed_line.as_deref())
            .map(str::parse)
            .transpose()
    }

    pub fn log_format(&self) -> Result<Option<LogFormat>> {
        self.logging
            .as_ref()
            .and_then(|s| s.format.as_deref())
            .map(str::parse)
            .transpose()
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|s| s.verbose)
            .unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = self.inventory_path() {
            validate_path("inventory.path", path)?;
        }
        if let Some(mode) = self.inventory.as_ref().and_then(|s| s.on_malformed_line.as_deref()) {
            validate_one_of("inventory.on_malformed_line", mode, &MalformedLinePolicy::VALUES)?;
        }
        if let Some(format) = self.logging.as_ref().and_then(|s| s.format.as_deref()) {
            validate_one_of("logging.format", format, &LogFormat::VALUES)?;
        }
        Ok(())
    }
}
