use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifiers are opaque strings assigned by the store (document ids in the
/// persisted backends). Each entity gets its own newtype so ids cannot be mixed.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// mint a fresh random id
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

define_id!(StudentId);
define_id!(MonthId);
define_id!(PaymentId);
define_id!(CourseId);

/// how a payment-level discount amount is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// absolute currency amount
    #[default]
    Fixed,
    /// percent of each month's own fee
    Percentage,
}
