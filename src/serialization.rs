//! serialization support for allocation results
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::allocation::{MonthAllocation, MonthAllocations};
use crate::decimal::Money;
use crate::errors::AllocationWarning;
use crate::types::{MonthId, PaymentId};

/// serializable view of a student's month allocations
#[derive(Debug, Serialize, Deserialize)]
pub struct AllocationView {
    pub months: BTreeMap<MonthId, MonthView>,
    pub totals: TotalsView,
    pub warnings: Vec<AllocationWarning>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub total_paid: Money,
    pub total_discount: Money,
    pub month_fee: Money,
    pub outstanding: Money,
    pub payments: Vec<ContributionView>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionView {
    pub payment_id: PaymentId,
    pub paid_amount: Money,
    pub discount_amount: Money,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// grand totals, null when a total overflows
pub struct TotalsView {
    pub total_paid: Option<Money>,
    pub total_discount: Option<Money>,
    pub total_outstanding: Option<Money>,
}

impl AllocationView {
    /// build a view, rounding amounts to `display_dp` places when given
    pub fn from_allocations(allocations: &MonthAllocations, display_dp: Option<u32>) -> Self {
        let round = |m: Money| match display_dp {
            Some(dp) => m.round_dp(dp),
            None => m,
        };

        let months = allocations
            .iter()
            .map(|(id, allocation)| (id.clone(), MonthView::from_allocation(allocation, &round)))
            .collect();

        AllocationView {
            months,
            totals: TotalsView {
                total_paid: allocations.total_paid().map(round),
                total_discount: allocations.total_discount().map(round),
                total_outstanding: allocations.total_outstanding().map(round),
            },
            warnings: allocations.warnings().to_vec(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl MonthView {
    fn from_allocation(allocation: &MonthAllocation, round: &impl Fn(Money) -> Money) -> Self {
        MonthView {
            total_paid: round(allocation.total_paid),
            total_discount: round(allocation.total_discount),
            month_fee: round(allocation.month_fee),
            outstanding: round(allocation.outstanding()),
            payments: allocation
                .payments
                .iter()
                .map(|c| ContributionView {
                    payment_id: c.payment_id.clone(),
                    paid_amount: round(c.paid_amount),
                    discount_amount: round(c.discount_amount),
                    date: c.date,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AllocationEngine;
    use crate::month::Month;
    use crate::payments::{Discount, Payment, PaymentBreakdown};
    use crate::store::InMemoryStore;
    use crate::types::{CourseId, StudentId};
    use chrono::TimeZone;

    #[test]
    fn test_view_uses_report_field_names_and_rounds() {
        let mut store = InMemoryStore::new();
        for id in ["m1", "m2", "m3"] {
            store.insert_month(Month::new(MonthId::from(id), id, 1, CourseId::from("c1"), Money::from_major(100)));
        }
        store.insert_payment(Payment {
            id: PaymentId::from("p1"),
            student_id: StudentId::from("s1"),
            invoice_number: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            discount: Discount::none(),
            breakdown: PaymentBreakdown::Legacy {
                months: vec![MonthId::from("m1"), MonthId::from("m2"), MonthId::from("m3")],
                paid_amount: Money::from_major(100),
            },
            received_by: None,
            reference: None,
        });

        let engine = AllocationEngine::new(&store, &store);
        let allocations = engine.compute_month_allocations(&StudentId::from("s1")).unwrap();
        let view = AllocationView::from_allocations(&allocations, Some(2));

        let m1 = &view.months[&MonthId::from("m1")];
        assert_eq!(m1.total_paid.to_string(), "33.33");
        assert_eq!(m1.outstanding.to_string(), "66.67");

        let json = serde_json::to_value(&view).unwrap();
        let month = &json["months"]["m1"];
        assert!(month.get("totalPaid").is_some());
        assert!(month.get("monthFee").is_some());
        assert_eq!(month["payments"][0]["paymentId"], "p1");
        assert!(view.to_json_pretty().unwrap().contains("\"totalDiscount\""));
        assert!(json["totals"]["totalPaid"].is_string());
        assert_eq!(json["warnings"], serde_json::json!([]));
    }
}
