use crate::core::answers::{is_no, is_quit, is_yes, parse_choice, parse_quantity};
use crate::core::format::{money, write_menu};
use crate::domain::model::{Cart, CheckoutSummary, Inventory};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Browsing,
    /// Waiting for a quantity of the product at this inventory index.
    Quantity(usize),
    Checkout,
    Terminal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    EmptyCart,
    Paid { total: f64 },
    Declined { total: f64 },
}

#[derive(Debug, Clone)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub cart: Cart,
}

/// Interactive cart loop over any line-based input and any output stream.
pub struct CartSession<'a, R: BufRead, W: Write> {
    inventory: &'a Inventory,
    input: R,
    output: W,
    cart: Cart,
    running_total: f64,
    state: SessionState,
    outcome: Option<SessionOutcome>,
}

impl<'a, R: BufRead, W: Write> CartSession<'a, R, W> {
    pub fn new(inventory: &'a Inventory, input: R, output: W) -> Self {
        Self {
            inventory,
            input,
            output,
            cart: Cart::new(),
            running_total: 0.0,
            state: SessionState::Browsing,
            outcome: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn running_total(&self) -> f64 {
        self.running_total
    }

    pub fn run(mut self) -> Result<SessionReport> {
        while self.state != SessionState::Terminal {
            self.step()?;
        }

        Ok(SessionReport {
            outcome: self.outcome.take().unwrap_or(SessionOutcome::EmptyCart),
            cart: self.cart,
        })
    }

    /// Handles one prompt and moves to the next state.
    pub fn step(&mut self) -> Result<SessionState> {
        let next = match self.state {
            SessionState::Browsing => self.browse()?,
            SessionState::Quantity(index) => self.choose_quantity(index)?,
            SessionState::Checkout => self.checkout()?,
            SessionState::Terminal => SessionState::Terminal,
        };

        if next != self.state {
            tracing::debug!("Session state {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        Ok(next)
    }

    fn browse(&mut self) -> Result<SessionState> {
        write_menu(&mut self.output, self.inventory)?;
        self.prompt("Pick an item number, or 'q' to quit:")?;

        let Some(input) = self.read_answer()? else {
            tracing::debug!("Input closed while browsing, going to checkout");
            return Ok(SessionState::Checkout);
        };

        if is_quit(&input) {
            return Ok(SessionState::Checkout);
        }

        match parse_choice(&input).and_then(|choice| self.inventory.index_for_choice(choice)) {
            Some(index) => Ok(SessionState::Quantity(index)),
            None => {
                writeln!(self.output, "Please enter a valid item number.")?;
                Ok(SessionState::Browsing)
            }
        }
    }

    fn choose_quantity(&mut self, index: usize) -> Result<SessionState> {
        let inventory = self.inventory;
        let Some(product) = inventory.get(index) else {
            tracing::error!("Menu index {} is outside the inventory", index);
            return Ok(SessionState::Browsing);
        };

        self.prompt(&format!("how many {} would you like to buy? ", product.name))?;
        let input = self.read_answer()?.unwrap_or_default();

        let Some(quantity) = parse_quantity(&input) else {
            writeln!(self.output, "Please enter a quantity greater than 0.")?;
            return Ok(SessionState::Browsing);
        };

        if self.cart.add(index, quantity).is_none() {
            tracing::warn!("Quantity {} for {} would overflow the cart entry", quantity, product.name);
            writeln!(self.output, "That quantity is too large, please enter a smaller one.")?;
            return Ok(SessionState::Browsing);
        }
        self.running_total += f64::from(quantity) * product.price;

        writeln!(
            self.output,
            "Added {} x {} ({} each). Cart total is now {}",
            quantity,
            product.name,
            money(product.price),
            money(self.running_total)
        )?;

        self.prompt("Add another item? (y/n): ")?;
        let again = self.read_answer()?.unwrap_or_default();
        // 只有明確的 n/no 會結帳，其他回答都繼續選購
        if is_no(&again) {
            Ok(SessionState::Checkout)
        } else {
            Ok(SessionState::Browsing)
        }
    }

    fn checkout(&mut self) -> Result<SessionState> {
        if self.cart.is_empty() {
            writeln!(self.output, "\nYour cart is empty. Goodbye!")?;
            self.outcome = Some(SessionOutcome::EmptyCart);
            return Ok(SessionState::Terminal);
        }

        let summary = CheckoutSummary::from_cart(&self.cart, self.inventory);
        let tolerance = 1e-9 * summary.total.abs().max(1.0);
        if (summary.total - self.running_total).abs() > tolerance {
            tracing::error!(
                "Running total {} disagrees with cart contents {}",
                self.running_total,
                summary.total
            );
        }
        let total = summary.total;

        writeln!(self.output, "\nCart summary:")?;
        for line in &summary.lines {
            writeln!(
                self.output,
                "- {} x {} = {}",
                line.quantity,
                line.name,
                money(line.line_total)
            )?;
        }
        writeln!(self.output, "Total: {}", money(total))?;

        self.prompt("Would you like to pay? (yes/no): ")?;
        let pay = self.read_answer()?.unwrap_or_default();

        let outcome = if is_yes(&pay) {
            writeln!(self.output, "Payment accepted. Final total is {}", money(total))?;
            SessionOutcome::Paid { total }
        } else {
            writeln!(self.output, "No problem, goodbye.")?;
            SessionOutcome::Declined { total }
        };
        tracing::info!("Checkout finished: {:?}", outcome);

        self.outcome = Some(outcome);
        Ok(SessionState::Terminal)
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    /// `None` once the input is exhausted. Invalid UTF-8 is replaced, not fatal.
    fn read_answer(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).trim().to_string()))
    }
}
