use crate::config::toml_config::TomlConfig;
use crate::config::{LogFormat, SettingsOverrides, ShopSettings};
use crate::core::loader::MalformedLinePolicy;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "fruitshop")]
#[command(about = "Load an inventory file and run an interactive shopping cart")]
pub struct CliConfig {
    /// Inventory file, one `name,£price` per line [default: values.txt]
    #[arg(short, long)]
    pub inventory: Option<String>,

    /// What to do with a malformed inventory line [default: abort]
    #[arg(long, value_enum)]
    pub on_malformed_line: Option<MalformedLinePolicy>,

    /// Optional TOML settings file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print the inventory and exit
    #[arg(long)]
    pub list: bool,

    /// Output format for --list
    #[arg(long, value_enum, default_value_t = ListFormat::Text)]
    pub format: ListFormat,

    /// Log line format [default: compact]
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            inventory_path: self.inventory.clone(),
            on_malformed_line: self.on_malformed_line,
            log_format: self.log_format,
            verbose: self.verbose,
        }
    }

    /// 合併命令列與設定檔
    pub fn settings(&self) -> Result<ShopSettings> {
        let file = match &self.config {
            Some(path) => {
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                Some(config)
            }
            None => None,
        };
        ShopSettings::resolve(self.overrides(), file.as_ref())
    }
}
