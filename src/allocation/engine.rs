use tracing::{debug, warn};

use crate::config::{AllocationConfig, MonthFeePolicy};
use crate::decimal::Money;
use crate::errors::{AllocationWarning, Result};
use crate::month::MonthCatalog;
use crate::payments::{MonthPayment, Payment, PaymentBreakdown, PaymentStore};
use crate::types::{MonthId, StudentId};

use super::{Contribution, MonthAllocations};

/// per-month payment and discount allocation
///
/// Reads a student's payments from the store and folds them into one
/// [`MonthAllocations`]. Itemized payments contribute their lines verbatim;
/// legacy payments are split evenly over their months and have their
/// payment-level discount apportioned per month. Malformed payments, unknown
/// months and contributions whose amounts overflow are skipped and reported,
/// never fatal.
pub struct AllocationEngine<P, C> {
    payments: P,
    months: C,
    config: AllocationConfig,
}

impl<P: PaymentStore, C: MonthCatalog> AllocationEngine<P, C> {
    pub fn new(payments: P, months: C) -> Self {
        Self::with_config(payments, months, AllocationConfig::default())
    }

    pub fn with_config(payments: P, months: C, config: AllocationConfig) -> Self {
        Self {
            payments,
            months,
            config,
        }
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// month-by-month totals for a student
    ///
    /// An unknown student yields an empty result. Only store failures are
    /// returned as errors.
    pub fn compute_month_allocations(&self, student_id: &StudentId) -> Result<MonthAllocations> {
        let payments = self.payments.payments_by_student(student_id)?;
        debug!(student_id = %student_id, payments = payments.len(), "computing month allocations");

        let mut allocations = MonthAllocations::new();
        for payment in &payments {
            match &payment.breakdown {
                PaymentBreakdown::Itemized { month_payments } => {
                    self.apply_itemized(payment, month_payments, &mut allocations);
                }
                PaymentBreakdown::Legacy { months, paid_amount } => {
                    self.apply_legacy(payment, months, *paid_amount, &mut allocations);
                }
            }
        }

        Ok(allocations)
    }

    /// payments with a discount, newest first
    ///
    /// Restricted to one student when `student_id` is given.
    pub fn discounted_payments(&self, student_id: Option<&StudentId>) -> Result<Vec<Payment>> {
        let payments = match student_id {
            Some(id) => self.payments.payments_by_student(id)?,
            None => self.payments.all_payments()?,
        };

        let mut discounted: Vec<Payment> = payments.into_iter().filter(|p| p.is_discounted()).collect();
        discounted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(discounted)
    }

    fn apply_itemized(&self, payment: &Payment, lines: &[MonthPayment], allocations: &mut MonthAllocations) {
        if lines.is_empty() {
            Self::skip_shape(payment, "itemized payment has no month lines", allocations);
            return;
        }

        for line in lines {
            let mut mismatch = None;
            let (entry, created) = allocations.entry(line.month_id.clone(), line.month_fee);

            if !created && entry.month_fee != line.month_fee {
                mismatch = Some(entry.month_fee);
                if self.config.month_fee_policy == MonthFeePolicy::LastSeen {
                    entry.month_fee = line.month_fee;
                }
            }

            let recorded = entry.record(Contribution {
                payment_id: payment.id.clone(),
                paid_amount: line.paid_amount,
                discount_amount: line.discount_amount,
                date: payment.created_at,
            });
            if !recorded {
                Self::skip_overflow(payment, &line.month_id, allocations);
            }

            if let (Some(previous), true) = (mismatch, self.config.report_fee_mismatch) {
                allocations.warn(AllocationWarning::MonthFeeMismatch {
                    payment_id: payment.id.clone(),
                    month_id: line.month_id.clone(),
                    previous,
                    current: line.month_fee,
                });
            }
        }
    }

    fn apply_legacy(
        &self,
        payment: &Payment,
        months: &[MonthId],
        paid_amount: Money,
        allocations: &mut MonthAllocations,
    ) {
        let Some(share) = paid_amount.split(months.len()) else {
            Self::skip_shape(payment, "legacy payment has no months", allocations);
            return;
        };

        for month_id in months {
            let Some(month) = self.months.month_by_id(month_id) else {
                warn!(payment_id = %payment.id, month_id = %month_id, "skipping unknown month");
                allocations.warn(AllocationWarning::MonthNotFound {
                    payment_id: payment.id.clone(),
                    month_id: month_id.clone(),
                });
                continue;
            };

            let Some(discount) = payment.discount.legacy_share(month_id, month.fee, months.len()) else {
                Self::skip_overflow(payment, month_id, allocations);
                continue;
            };
            let (entry, _) = allocations.entry(month_id.clone(), month.fee);
            let recorded = entry.record(Contribution {
                payment_id: payment.id.clone(),
                paid_amount: share,
                discount_amount: discount,
                date: payment.created_at,
            });
            if !recorded {
                Self::skip_overflow(payment, month_id, allocations);
            }
        }
    }

    fn skip_overflow(payment: &Payment, month_id: &MonthId, allocations: &mut MonthAllocations) {
        warn!(payment_id = %payment.id, month_id = %month_id, "skipping contribution, amount overflows");
        allocations.warn(AllocationWarning::AmountOverflow {
            payment_id: payment.id.clone(),
            month_id: month_id.clone(),
        });
    }

    fn skip_shape(payment: &Payment, reason: &str, allocations: &mut MonthAllocations) {
        warn!(payment_id = %payment.id, reason = %reason, "skipping payment");
        allocations.warn(AllocationWarning::InvalidPaymentShape {
            payment_id: payment.id.clone(),
            reason: reason.to_string(),
        });
    }
}
