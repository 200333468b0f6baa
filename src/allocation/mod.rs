pub mod engine;

use std::collections::btree_map::{self, BTreeMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::AllocationWarning;
use crate::types::{MonthId, PaymentId};

pub use engine::AllocationEngine;

/// one payment's share of a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub payment_id: PaymentId,
    pub paid_amount: Money,
    pub discount_amount: Money,
    pub date: DateTime<Utc>,
}

/// paid and discount totals for one month across a student's payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthAllocation {
    pub total_paid: Money,
    pub total_discount: Money,
    pub month_fee: Money,
    pub payments: Vec<Contribution>,
}

impl MonthAllocation {
    pub fn new(month_fee: Money) -> Self {
        Self {
            total_paid: Money::ZERO,
            total_discount: Money::ZERO,
            month_fee,
            payments: Vec::new(),
        }
    }

    /// add a contribution to the totals, `false` and untouched when a total would overflow
    pub(crate) fn record(&mut self, contribution: Contribution) -> bool {
        let (Some(total_paid), Some(total_discount)) = (
            self.total_paid.checked_add(contribution.paid_amount),
            self.total_discount.checked_add(contribution.discount_amount),
        ) else {
            return false;
        };
        self.total_paid = total_paid;
        self.total_discount = total_discount;
        self.payments.push(contribution);
        true
    }

    /// fee left to collect, never below zero
    pub fn outstanding(&self) -> Money {
        self.month_fee
            .checked_sub(self.total_paid)
            .and_then(|rest| rest.checked_sub(self.total_discount))
            .map_or(Money::ZERO, |rest| rest.max(Money::ZERO))
    }

    pub fn is_settled(&self) -> bool {
        self.outstanding().is_zero()
    }
}

/// allocation result for one student
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthAllocations {
    months: BTreeMap<MonthId, MonthAllocation>,
    warnings: Vec<AllocationWarning>,
}

impl MonthAllocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, month_id: &MonthId) -> Option<&MonthAllocation> {
        self.months.get(month_id)
    }

    pub fn contains(&self, month_id: &MonthId) -> bool {
        self.months.contains_key(month_id)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, MonthId, MonthAllocation> {
        self.months.iter()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// problems met while computing, in the order they were found
    pub fn warnings(&self) -> &[AllocationWarning] {
        &self.warnings
    }

    /// `None` when the grand total overflows
    pub fn total_paid(&self) -> Option<Money> {
        Money::checked_sum(self.months.values().map(|a| a.total_paid))
    }

    pub fn total_discount(&self) -> Option<Money> {
        Money::checked_sum(self.months.values().map(|a| a.total_discount))
    }

    pub fn total_outstanding(&self) -> Option<Money> {
        Money::checked_sum(self.months.values().map(|a| a.outstanding()))
    }

    pub fn into_map(self) -> BTreeMap<MonthId, MonthAllocation> {
        self.months
    }

    pub(crate) fn entry(&mut self, month_id: MonthId, month_fee: Money) -> (&mut MonthAllocation, bool) {
        match self.months.entry(month_id) {
            btree_map::Entry::Occupied(entry) => (entry.into_mut(), false),
            btree_map::Entry::Vacant(entry) => (entry.insert(MonthAllocation::new(month_fee)), true),
        }
    }

    pub(crate) fn warn(&mut self, warning: AllocationWarning) {
        self.warnings.push(warning);
    }
}

impl<'a> IntoIterator for &'a MonthAllocations {
    type Item = (&'a MonthId, &'a MonthAllocation);
    type IntoIter = btree_map::Iter<'a, MonthId, MonthAllocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.months.iter()
    }
}
