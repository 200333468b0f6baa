use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use hourglass_rs::SafeTimeProvider;
use tracing::info;

use crate::decimal::Money;
use crate::errors::{AllocationError, Result};
use crate::month::{Month, MonthCatalog};
use crate::payments::{
    Discount, MonthPayment, MonthRecord, Payment, PaymentBreakdown, PaymentRecord, PaymentStore,
};
use crate::types::{DiscountType, MonthId, PaymentId, StudentId};

/// a payment as taken at the counter, before the store has numbered it
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub student_id: StudentId,
    pub breakdown: PaymentBreakdown,
    pub discount: Discount,
    pub received_by: Option<String>,
    pub reference: Option<String>,
}

impl NewPayment {
    pub fn legacy(student_id: StudentId, months: Vec<MonthId>, paid_amount: Money) -> Self {
        Self {
            student_id,
            breakdown: PaymentBreakdown::Legacy { months, paid_amount },
            discount: Discount::none(),
            received_by: None,
            reference: None,
        }
    }

    pub fn itemized(student_id: StudentId, month_payments: Vec<MonthPayment>) -> Self {
        Self {
            student_id,
            breakdown: PaymentBreakdown::Itemized { month_payments },
            discount: Discount::none(),
            received_by: None,
            reference: None,
        }
    }

    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = discount;
        self
    }

    pub fn received_by(mut self, name: impl Into<String>) -> Self {
        self.received_by = Some(name.into());
        self
    }
}

/// in-memory snapshot of months and payments
///
/// Payments are returned in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    months: HashMap<MonthId, Month>,
    payments: Vec<Payment>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_month(&mut self, month: Month) {
        self.months.insert(month.id.clone(), month);
    }

    /// import a payment as-is, without validation
    pub fn insert_payment(&mut self, payment: Payment) {
        self.payments.push(payment);
    }

    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    /// load a json array of stored payment documents, returns how many were loaded
    pub fn load_payment_records(&mut self, json: &str) -> Result<usize> {
        let records: Vec<PaymentRecord> = serde_json::from_str(json)?;
        let count = records.len();
        self.payments.extend(records.into_iter().map(Payment::from));
        Ok(count)
    }

    /// load a json array of stored month documents, returns how many were loaded
    pub fn load_month_records(&mut self, json: &str) -> Result<usize> {
        let records: Vec<MonthRecord> = serde_json::from_str(json)?;
        let count = records.len();
        for record in records {
            self.insert_month(Month::from(record));
        }
        Ok(count)
    }

    /// validate, number and store a new payment
    pub fn record_payment(&mut self, new: NewPayment, time_provider: &SafeTimeProvider) -> Result<Payment> {
        let payment_id = PaymentId::generate();
        self.validate(&payment_id, &new)?;

        let now = time_provider.now();
        let invoice_number = format!(
            "INV{}{:02}{:04}",
            now.year(),
            now.month(),
            self.payments.len() + 1
        );

        let payment = Payment {
            id: payment_id,
            student_id: new.student_id,
            invoice_number: Some(invoice_number),
            created_at: now,
            discount: new.discount,
            breakdown: new.breakdown,
            received_by: new.received_by,
            reference: new.reference,
        };

        info!(
            payment_id = %payment.id,
            student_id = %payment.student_id,
            invoice = payment.invoice_number.as_deref().unwrap_or_default(),
            amount = ?payment.breakdown.paid_amount(),
            "payment recorded"
        );

        self.payments.push(payment.clone());
        Ok(payment)
    }

    fn validate(&self, payment_id: &PaymentId, new: &NewPayment) -> Result<()> {
        let covered: HashSet<&MonthId> = match &new.breakdown {
            PaymentBreakdown::Legacy { months, paid_amount } => {
                if months.is_empty() {
                    return Err(AllocationError::InvalidPaymentShape {
                        payment_id: payment_id.clone(),
                        reason: "legacy payment needs at least one month".to_string(),
                    });
                }
                ensure_non_negative(*paid_amount)?;
                months.iter().collect()
            }
            PaymentBreakdown::Itemized { month_payments } => {
                if month_payments.is_empty() {
                    return Err(AllocationError::InvalidPaymentShape {
                        payment_id: payment_id.clone(),
                        reason: "itemized payment needs at least one month line".to_string(),
                    });
                }
                for line in month_payments {
                    ensure_non_negative(line.paid_amount)?;
                    ensure_non_negative(line.discount_amount)?;
                }
                if new.breakdown.paid_amount().is_none() {
                    return Err(AllocationError::InvalidPaymentShape {
                        payment_id: payment_id.clone(),
                        reason: "itemized paid amounts overflow".to_string(),
                    });
                }
                month_payments.iter().map(|mp| &mp.month_id).collect()
            }
        };

        if let Some(missing) = covered.iter().find(|id| !self.months.contains_key(**id)) {
            return Err(AllocationError::MonthNotFound {
                month_id: (*missing).clone(),
            });
        }

        let discount = &new.discount;
        ensure_non_negative(discount.amount)?;
        if discount.kind == DiscountType::Percentage && discount.amount > Money::from_major(100) {
            return Err(AllocationError::InvalidDiscount {
                message: format!("percentage {} exceeds 100", discount.amount),
            });
        }
        if let Some(outside) = discount.applicable_months.iter().find(|id| !covered.contains(id)) {
            return Err(AllocationError::InvalidDiscount {
                message: format!("discount month {} is not part of the payment", outside),
            });
        }

        Ok(())
    }
}

fn ensure_non_negative(amount: Money) -> Result<()> {
    if amount.is_negative() {
        return Err(AllocationError::InvalidAmount { amount });
    }
    Ok(())
}

impl PaymentStore for InMemoryStore {
    fn payments_by_student(&self, student_id: &StudentId) -> Result<Vec<Payment>> {
        Ok(self
            .payments
            .iter()
            .filter(|p| &p.student_id == student_id)
            .cloned()
            .collect())
    }

    fn all_payments(&self) -> Result<Vec<Payment>> {
        Ok(self.payments.clone())
    }
}

impl MonthCatalog for InMemoryStore {
    fn month_by_id(&self, month_id: &MonthId) -> Option<Month> {
        self.months.get(month_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CourseId;
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        for (n, id) in ["jan", "feb", "mar"].iter().enumerate() {
            store.insert_month(Month::new(
                MonthId::from(*id),
                id.to_uppercase(),
                n as u32 + 1,
                CourseId::from("physics"),
                Money::from_major(1_000),
            ));
        }
        store
    }

    fn clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()
        ))
    }

    fn months(ids: &[&str]) -> Vec<MonthId> {
        ids.iter().map(|id| MonthId::from(*id)).collect()
    }

    #[test]
    fn test_record_payment_numbers_and_stamps() {
        let mut store = store();
        let time = clock();
        let controller = time.test_control().unwrap();

        let first = store
            .record_payment(
                NewPayment::legacy(StudentId::from("s1"), months(&["jan"]), Money::from_major(1_000))
                    .received_by("front desk"),
                &time,
            )
            .unwrap();
        assert_eq!(first.invoice_number.as_deref(), Some("INV2024030001"));
        assert_eq!(first.created_at, Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap());
        assert_eq!(first.received_by.as_deref(), Some("front desk"));

        controller.advance(Duration::days(30));
        let second = store
            .record_payment(
                NewPayment::itemized(
                    StudentId::from("s1"),
                    vec![MonthPayment::new(MonthId::from("feb"), Money::from_major(1_000), Money::from_major(500))],
                ),
                &time,
            )
            .unwrap();
        assert_eq!(second.invoice_number.as_deref(), Some("INV2024040002"));
        assert!(second.created_at > first.created_at);
        assert_eq!(store.payment_count(), 2);
    }

    #[test]
    fn test_record_rejects_empty_months() {
        let mut store = store();
        let result = store.record_payment(
            NewPayment::legacy(StudentId::from("s1"), vec![], Money::from_major(100)),
            &clock(),
        );
        assert!(matches!(result, Err(AllocationError::InvalidPaymentShape { .. })));
        assert_eq!(store.payment_count(), 0);
    }

    #[test]
    fn test_record_rejects_unknown_month() {
        let mut store = store();
        let result = store.record_payment(
            NewPayment::legacy(StudentId::from("s1"), months(&["jan", "dec"]), Money::from_major(100)),
            &clock(),
        );
        assert!(matches!(
            result,
            Err(AllocationError::MonthNotFound { month_id }) if month_id.as_str() == "dec"
        ));
    }

    #[test]
    fn test_record_rejects_negative_amount() {
        let mut store = store();
        let result = store.record_payment(
            NewPayment::legacy(StudentId::from("s1"), months(&["jan"]), Money::from_major(-10)),
            &clock(),
        );
        assert!(matches!(result, Err(AllocationError::InvalidAmount { .. })));
    }

    #[test]
    fn test_record_rejects_bad_discounts() {
        let mut store = store();

        let over = NewPayment::legacy(StudentId::from("s1"), months(&["jan"]), Money::from_major(100))
            .with_discount(Discount::percentage(Money::from_major(120)));
        assert!(matches!(
            store.record_payment(over, &clock()),
            Err(AllocationError::InvalidDiscount { .. })
        ));

        let outside = NewPayment::legacy(StudentId::from("s1"), months(&["jan", "feb"]), Money::from_major(100))
            .with_discount(Discount::fixed(Money::from_major(20)).restricted_to(months(&["mar"])));
        assert!(matches!(
            store.record_payment(outside, &clock()),
            Err(AllocationError::InvalidDiscount { .. })
        ));
    }

    #[test]
    fn test_record_rejects_overflowing_itemized_total() {
        let mut store = store();
        let huge = Money::from_str_exact("50000000000000000000000000000").unwrap();
        let line = |month: &str| MonthPayment::new(MonthId::from(month), Money::from_major(1_000), huge);

        let result = store.record_payment(
            NewPayment::itemized(StudentId::from("s1"), vec![line("jan"), line("feb")]),
            &clock(),
        );
        assert!(matches!(result, Err(AllocationError::InvalidPaymentShape { .. })));
        assert_eq!(store.payment_count(), 0);
    }

    #[test]
    fn test_payments_by_student_keeps_insertion_order() {
        let mut store = store();
        let time = clock();
        for (student, month) in [("s1", "jan"), ("s2", "jan"), ("s1", "feb")] {
            store
                .record_payment(
                    NewPayment::legacy(StudentId::from(student), months(&[month]), Money::from_major(100)),
                    &time,
                )
                .unwrap();
        }

        let s1 = store.payments_by_student(&StudentId::from("s1")).unwrap();
        assert_eq!(s1.len(), 2);
        assert_eq!(s1[0].breakdown.month_ids(), vec![&MonthId::from("jan")]);
        assert_eq!(s1[1].breakdown.month_ids(), vec![&MonthId::from("feb")]);
        assert_eq!(store.all_payments().unwrap().len(), 3);
    }

    #[test]
    fn test_load_records() {
        let mut store = InMemoryStore::new();
        let months = r#"[
            { "_id": "m1", "name": "January", "monthNumber": 1, "courseId": "c1", "payment": 800 }
        ]"#;
        let payments = r#"[
            { "_id": "p1", "studentId": "s1", "months": ["m1"], "paidAmount": 800,
              "createdAt": "2024-01-10T08:00:00Z" }
        ]"#;

        assert_eq!(store.load_month_records(months).unwrap(), 1);
        assert_eq!(store.load_payment_records(payments).unwrap(), 1);
        assert_eq!(store.month_by_id(&MonthId::from("m1")).unwrap().fee, Money::from_major(800));
        assert!(store.load_payment_records("{").is_err());
    }
}
