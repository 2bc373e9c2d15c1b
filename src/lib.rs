pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::{toml_config::TomlConfig, ShopSettings};

pub use crate::core::loader::{InventoryLoader, MalformedLinePolicy};
pub use crate::core::session::{CartSession, SessionOutcome, SessionReport};
pub use crate::core::shop::Shop;
pub use utils::error::{Result, ShopError};
