pub mod allocation;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod month;
pub mod payments;
pub mod serialization;
pub mod store;
pub mod types;

// re-export key types
pub use allocation::{AllocationEngine, Contribution, MonthAllocation, MonthAllocations};
pub use config::{AllocationConfig, MonthFeePolicy};
pub use decimal::Money;
pub use errors::{AllocationError, AllocationWarning, Result};
pub use month::{Month, MonthCatalog};
pub use payments::{discounted, Discount, MonthPayment, Payment, PaymentBreakdown, PaymentStore};
pub use serialization::AllocationView;
pub use store::{InMemoryStore, NewPayment};
pub use types::{CourseId, DiscountType, MonthId, PaymentId, StudentId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
