use crate::core::loader::CURRENCY_SYMBOL;
use crate::domain::model::Inventory;
use crate::utils::error::Result;
use std::io::Write;

/// `£` plus two decimals.
pub fn money(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}

pub fn write_menu<W: Write>(out: &mut W, inventory: &Inventory) -> Result<()> {
    writeln!(out, "\nInventory:")?;
    for (i, product) in inventory.iter().enumerate() {
        writeln!(out, "{}) {} - {}", i + 1, product.name, money(product.price))?;
    }
    Ok(())
}

/// Plain listing used by `--list`.
pub fn write_inventory_listing<W: Write>(out: &mut W, inventory: &Inventory) -> Result<()> {
    writeln!(out, "Printing Inventory:")?;
    for product in inventory.iter() {
        writeln!(out, "{} costs {}", product.name, money(product.price))?;
    }
    Ok(())
}

pub fn write_inventory_json<W: Write>(out: &mut W, inventory: &Inventory) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, inventory)?;
    writeln!(out)?;
    Ok(())
}
