use crate::core::loader::InventoryLoader;
use crate::core::session::{CartSession, SessionReport};
use crate::domain::model::Inventory;
use crate::domain::ports::InventoryConfig;
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// Loads the inventory once, then hands it to a cart session.
pub struct Shop<C: InventoryConfig> {
    config: C,
}

impl<C: InventoryConfig> Shop<C> {
    pub fn new(config: C) -> Self {
        Self { config }
    }

    pub fn load(&self) -> Result<Inventory> {
        let loaded = InventoryLoader::load_configured(&self.config)?;
        if !loaded.report.skipped.is_empty() {
            tracing::info!(
                "Skipped {} of {} inventory lines",
                loaded.report.skipped.len(),
                loaded.report.records_read
            );
        }
        Ok(loaded.inventory)
    }

    /// A load failure returns before anything is read from `input`.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<SessionReport> {
        writeln!(output, "Fruitshop started")?;
        let inventory = self.load()?;
        CartSession::new(&inventory, input, output).run()
    }
}
