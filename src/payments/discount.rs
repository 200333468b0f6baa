use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{DiscountType, MonthId};

/// payment-level discount as entered at the counter
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Discount {
    /// currency amount for fixed discounts, percent for percentage discounts
    pub amount: Money,
    pub kind: DiscountType,
    /// months the discount is restricted to, empty means every paid month
    pub applicable_months: Vec<MonthId>,
}

impl Discount {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn fixed(amount: Money) -> Self {
        Self {
            amount,
            kind: DiscountType::Fixed,
            applicable_months: Vec::new(),
        }
    }

    pub fn percentage(percent: Money) -> Self {
        Self {
            amount: percent,
            kind: DiscountType::Percentage,
            applicable_months: Vec::new(),
        }
    }

    /// restrict the discount to the given months
    pub fn restricted_to(mut self, months: Vec<MonthId>) -> Self {
        self.applicable_months = months;
        self
    }

    pub fn is_active(&self) -> bool {
        self.amount.is_positive()
    }

    pub fn is_restricted(&self) -> bool {
        !self.applicable_months.is_empty()
    }

    pub fn applies_to(&self, month_id: &MonthId) -> bool {
        !self.is_restricted() || self.applicable_months.contains(month_id)
    }

    /// discount apportioned to one month of a legacy payment covering `month_count` months
    ///
    /// Percentages are taken from that month's own fee and never diluted by the
    /// month count. Fixed amounts are split evenly across the applicable months,
    /// or across all paid months when unrestricted. `None` when the percentage
    /// of the fee overflows.
    pub fn legacy_share(&self, month_id: &MonthId, month_fee: Money, month_count: usize) -> Option<Money> {
        if !self.is_active() || !self.applies_to(month_id) {
            return Some(Money::ZERO);
        }

        match self.kind {
            DiscountType::Percentage => month_fee.checked_percentage(self.amount.as_decimal()),
            DiscountType::Fixed => {
                let parts = if self.is_restricted() {
                    self.applicable_months.len()
                } else {
                    month_count
                };
                Some(self.amount.split(parts).unwrap_or(Money::ZERO))
            }
        }
    }
}
