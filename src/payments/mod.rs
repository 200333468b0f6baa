pub mod discount;
pub mod records;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::types::{MonthId, PaymentId, StudentId};

pub use discount::Discount;
pub use records::{MonthPaymentRecord, MonthRecord, PaymentRecord, RecordRef};

/// one month's line of an itemized payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthPayment {
    pub month_id: MonthId,
    /// fee of the month at the time the payment was taken
    pub month_fee: Money,
    pub paid_amount: Money,
    pub discount_amount: Money,
    /// amount already paid toward this month before this payment
    pub previously_paid: Money,
}

impl MonthPayment {
    pub fn new(month_id: MonthId, month_fee: Money, paid_amount: Money) -> Self {
        Self {
            month_id,
            month_fee,
            paid_amount,
            discount_amount: Money::ZERO,
            previously_paid: Money::ZERO,
        }
    }

    pub fn with_discount(mut self, discount_amount: Money) -> Self {
        self.discount_amount = discount_amount;
        self
    }
}

/// how a payment spreads over months
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaymentBreakdown {
    /// explicit per-month lines
    Itemized { month_payments: Vec<MonthPayment> },
    /// aggregate amount split evenly over a month list, discount apportioned
    /// from the payment-level [`Discount`]
    Legacy { months: Vec<MonthId>, paid_amount: Money },
}

impl PaymentBreakdown {
    pub fn is_itemized(&self) -> bool {
        matches!(self, PaymentBreakdown::Itemized { .. })
    }

    /// months touched by this payment, in record order
    pub fn month_ids(&self) -> Vec<&MonthId> {
        match self {
            PaymentBreakdown::Itemized { month_payments } => {
                month_payments.iter().map(|mp| &mp.month_id).collect()
            }
            PaymentBreakdown::Legacy { months, .. } => months.iter().collect(),
        }
    }

    /// total handed over at the counter, `None` if the itemized lines overflow
    pub fn paid_amount(&self) -> Option<Money> {
        match self {
            PaymentBreakdown::Itemized { month_payments } => {
                Money::checked_sum(month_payments.iter().map(|mp| mp.paid_amount))
            }
            PaymentBreakdown::Legacy { paid_amount, .. } => Some(*paid_amount),
        }
    }
}

/// a payment taken from a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub student_id: StudentId,
    pub invoice_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub discount: Discount,
    pub breakdown: PaymentBreakdown,
    pub received_by: Option<String>,
    pub reference: Option<String>,
}

impl Payment {
    pub fn is_discounted(&self) -> bool {
        self.discount.is_active()
    }
}

/// read access to stored payments
pub trait PaymentStore {
    /// every payment of a student, in a stable order
    fn payments_by_student(&self, student_id: &StudentId) -> Result<Vec<Payment>>;

    fn all_payments(&self) -> Result<Vec<Payment>>;
}

impl<T: PaymentStore + ?Sized> PaymentStore for &T {
    fn payments_by_student(&self, student_id: &StudentId) -> Result<Vec<Payment>> {
        (**self).payments_by_student(student_id)
    }

    fn all_payments(&self) -> Result<Vec<Payment>> {
        (**self).all_payments()
    }
}

/// payments carrying a payment-level discount, in input order
pub fn discounted(payments: &[Payment]) -> Vec<&Payment> {
    payments.iter().filter(|p| p.is_discounted()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payment(id: &str, discount: Discount) -> Payment {
        Payment {
            id: PaymentId::from(id),
            student_id: StudentId::from("s1"),
            invoice_number: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            discount,
            breakdown: PaymentBreakdown::Legacy {
                months: vec![MonthId::from("m1")],
                paid_amount: Money::from_major(100),
            },
            received_by: None,
            reference: None,
        }
    }

    #[test]
    fn test_discounted_filter() {
        let payments = vec![
            payment("p1", Discount::none()),
            payment("p2", Discount::fixed(Money::from_major(50))),
            payment("p3", Discount::percentage(Money::from_major(10))),
            payment("p4", Discount::fixed(Money::ZERO)),
        ];

        let ids: Vec<&str> = discounted(&payments).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p3"]);
    }

    #[test]
    fn test_itemized_paid_amount_sums_lines() {
        let breakdown = PaymentBreakdown::Itemized {
            month_payments: vec![
                MonthPayment::new(MonthId::from("m1"), Money::from_major(500), Money::from_major(300)),
                MonthPayment::new(MonthId::from("m2"), Money::from_major(500), Money::from_major(200)),
            ],
        };

        assert!(breakdown.is_itemized());
        assert_eq!(breakdown.paid_amount(), Some(Money::from_major(500)));
        assert_eq!(breakdown.month_ids().len(), 2);
    }
}
