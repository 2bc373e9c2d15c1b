use crate::core::loader::MalformedLinePolicy;

pub trait InventoryConfig {
    fn inventory_path(&self) -> &str;
    fn on_malformed_line(&self) -> MalformedLinePolicy;
}
