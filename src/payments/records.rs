//! stored document shapes
//!
//! Payment and month documents as the persisted backends hand them out:
//! `_id` keys, camelCase fields, and references that are either a bare id or
//! a populated document. They are resolved into [`Payment`] and [`Month`]
//! here so nothing downstream has to probe for optional fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::month::Month;
use crate::types::{CourseId, DiscountType, MonthId, PaymentId, StudentId};

use super::{Discount, MonthPayment, Payment, PaymentBreakdown};

/// a reference to another document, bare or populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
    },
}

impl RecordRef {
    pub fn id(&self) -> &str {
        match self {
            RecordRef::Id(id) => id,
            RecordRef::Populated { id } => id,
        }
    }

    pub fn into_id(self) -> String {
        match self {
            RecordRef::Id(id) => id,
            RecordRef::Populated { id } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPaymentRecord {
    pub month_id: RecordRef,
    #[serde(default)]
    pub month_fee: Money,
    pub paid_amount: Money,
    #[serde(default)]
    pub previously_paid: Money,
    #[serde(default)]
    pub discount_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: RecordRef,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub months: Vec<RecordRef>,
    #[serde(default)]
    pub month_payments: Option<Vec<MonthPaymentRecord>>,
    #[serde(default)]
    pub discount_amount: Money,
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default)]
    pub discount_applicable_months: Vec<RecordRef>,
    #[serde(default)]
    pub paid_amount: Money,
    #[serde(default)]
    pub received_by: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentRecord> for Payment {
    fn from(record: PaymentRecord) -> Self {
        let breakdown = match record.month_payments {
            Some(lines) if !lines.is_empty() => PaymentBreakdown::Itemized {
                month_payments: lines
                    .into_iter()
                    .map(|line| MonthPayment {
                        month_id: MonthId::from(line.month_id.into_id()),
                        month_fee: line.month_fee,
                        paid_amount: line.paid_amount,
                        discount_amount: line.discount_amount,
                        previously_paid: line.previously_paid,
                    })
                    .collect(),
            },
            _ => PaymentBreakdown::Legacy {
                months: record
                    .months
                    .into_iter()
                    .map(|m| MonthId::from(m.into_id()))
                    .collect(),
                paid_amount: record.paid_amount,
            },
        };

        Payment {
            id: PaymentId::from(record.id),
            student_id: StudentId::from(record.student_id.into_id()),
            invoice_number: record.invoice_number,
            created_at: record.created_at,
            discount: Discount {
                amount: record.discount_amount,
                kind: record.discount_type,
                applicable_months: record
                    .discount_applicable_months
                    .into_iter()
                    .map(|m| MonthId::from(m.into_id()))
                    .collect(),
            },
            breakdown,
            received_by: record.received_by,
            reference: record.reference,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub month_number: u32,
    pub course_id: RecordRef,
    /// the month's fee
    pub payment: Money,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<MonthRecord> for Month {
    fn from(record: MonthRecord) -> Self {
        Month {
            id: MonthId::from(record.id),
            name: record.name,
            month_number: record.month_number,
            course_id: CourseId::from(record.course_id.into_id()),
            fee: record.payment,
            created_at: record.created_at,
        }
    }
}
