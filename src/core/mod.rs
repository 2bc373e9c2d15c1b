pub mod answers;
pub mod format;
pub mod loader;
pub mod session;
pub mod shop;

pub use crate::domain::model::{Cart, Inventory, Product};
pub use crate::domain::ports::InventoryConfig;
pub use crate::utils::error::Result;
