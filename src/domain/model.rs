use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Ordered, read-only catalog. Menu number `n` is `products[n - 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    products: Vec<Product>,
}

impl Inventory {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Product> {
        self.products.get(index)
    }

    /// Resolves a 1-based menu number to a product index.
    pub fn index_for_choice(&self, choice: usize) -> Option<usize> {
        (1..=self.products.len()).contains(&choice).then(|| choice - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

/// Quantities keyed by inventory index. Entries are always > 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: BTreeMap<usize, u32>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` to the entry for `index`, returning the new entry.
    /// Zero quantities and overflowing additions leave the cart untouched.
    pub fn add(&mut self, index: usize, quantity: u32) -> Option<u32> {
        if quantity == 0 {
            return None;
        }
        let current = self.quantity(index);
        let updated = current.checked_add(quantity)?;
        self.lines.insert(index, updated);
        Some(updated)
    }

    pub fn quantity(&self, index: usize) -> u32 {
        self.lines.get(&index).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Entries in inventory order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.lines.iter().map(|(index, qty)| (*index, *qty))
    }

    pub fn total(&self, inventory: &Inventory) -> f64 {
        self.entries()
            .filter_map(|(index, qty)| inventory.get(index).map(|p| f64::from(qty) * p.price))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub quantity: u32,
    pub name: String,
    pub line_total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSummary {
    pub lines: Vec<SummaryLine>,
    pub total: f64,
}

impl CheckoutSummary {
    pub fn from_cart(cart: &Cart, inventory: &Inventory) -> Self {
        let lines = cart
            .entries()
            .filter_map(|(index, quantity)| {
                inventory.get(index).map(|product| SummaryLine {
                    quantity,
                    name: product.name.clone(),
                    line_total: f64::from(quantity) * product.price,
                })
            })
            .collect();

        Self {
            lines,
            total: cart.total(inventory),
        }
    }
}
