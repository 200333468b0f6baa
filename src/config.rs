use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{AllocationError, Result};

/// which itemized month fee a month allocation keeps when payments disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthFeePolicy {
    /// every contributing itemized line overwrites the fee
    #[default]
    LastSeen,
    /// the fee recorded when the allocation was first created is kept
    FirstSeen,
}

/// allocation engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub month_fee_policy: MonthFeePolicy,
    /// record a warning when itemized lines disagree on a month's fee
    pub report_fee_mismatch: bool,
    /// rounding applied by views, computations always keep full precision
    pub display_decimal_places: Option<u32>,
}

impl AllocationConfig {
    /// parse and validate a json configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AllocationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(dp) = self.display_decimal_places {
            if dp > Money::SCALE {
                return Err(AllocationError::InvalidConfiguration {
                    message: format!(
                        "display_decimal_places {} exceeds money scale {}",
                        dp,
                        Money::SCALE
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn with_month_fee_policy(mut self, policy: MonthFeePolicy) -> Self {
        self.month_fee_policy = policy;
        self
    }

    pub fn with_fee_mismatch_reporting(mut self) -> Self {
        self.report_fee_mismatch = true;
        self
    }

    pub fn with_display_decimal_places(mut self, dp: u32) -> Self {
        self.display_decimal_places = Some(dp);
        self
    }
}
