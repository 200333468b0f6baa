use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal::Money;
use crate::types::{MonthId, PaymentId};

#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("invalid payment shape for {payment_id}: {reason}")]
    InvalidPaymentShape {
        payment_id: PaymentId,
        reason: String,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("invalid discount: {message}")]
    InvalidDiscount {
        message: String,
    },

    #[error("month not found: {month_id}")]
    MonthNotFound {
        month_id: MonthId,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("payment store error: {message}")]
    Store {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AllocationError>;

/// recoverable problem met while computing allocations
///
/// These never abort a computation. A skipped payment, month or
/// contribution, or a fee disagreement, is handed back next to the result.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AllocationWarning {
    #[error("payment {payment_id} skipped: {reason}")]
    InvalidPaymentShape {
        payment_id: PaymentId,
        reason: String,
    },

    #[error("payment {payment_id} references unknown month {month_id}")]
    MonthNotFound {
        payment_id: PaymentId,
        month_id: MonthId,
    },

    #[error("payment {payment_id} skipped for month {month_id}: amount overflows")]
    AmountOverflow {
        payment_id: PaymentId,
        month_id: MonthId,
    },

    #[error("month {month_id} fee changed from {previous} to {current} (payment {payment_id})")]
    MonthFeeMismatch {
        payment_id: PaymentId,
        month_id: MonthId,
        previous: Money,
        current: Money,
    },
}

impl AllocationWarning {
    pub fn payment_id(&self) -> &PaymentId {
        match self {
            AllocationWarning::InvalidPaymentShape { payment_id, .. }
            | AllocationWarning::MonthNotFound { payment_id, .. }
            | AllocationWarning::AmountOverflow { payment_id, .. }
            | AllocationWarning::MonthFeeMismatch { payment_id, .. } => payment_id,
        }
    }
}
