use serde::Serialize;

/// Order quantity on a product page, bounded to `1..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuantitySelector {
    quantity: u32,
    max: u32,
}

impl QuantitySelector {
    /// Starts at 1. A `max` of zero is treated as 1.
    pub fn new(max: u32) -> Self {
        Self {
            quantity: 1,
            max: max.max(1),
        }
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn increase(&mut self) -> u32 {
        if self.quantity < self.max {
            self.quantity += 1;
        }
        self.quantity
    }

    pub fn decrease(&mut self) -> u32 {
        if self.quantity > 1 {
            self.quantity -= 1;
        }
        self.quantity
    }

    /// Sets the quantity from free text. Anything that is not a positive
    /// integer becomes 1; values above the limit are clamped.
    pub fn set_from_input(&mut self, input: &str) -> u32 {
        let parsed = input.trim().parse::<u32>().ok().filter(|q| *q > 0).unwrap_or(1);
        self.quantity = parsed.min(self.max);
        self.quantity
    }

    pub fn total_price(&self, unit_price: u32) -> u64 {
        u64::from(unit_price) * u64::from(self.quantity)
    }
}
