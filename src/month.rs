use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{CourseId, MonthId};

/// a billable month of a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Month {
    pub id: MonthId,
    pub name: String,
    pub month_number: u32,
    pub course_id: CourseId,
    /// nominal fee charged for this month
    pub fee: Money,
    pub created_at: Option<DateTime<Utc>>,
}

impl Month {
    pub fn new(id: MonthId, name: impl Into<String>, month_number: u32, course_id: CourseId, fee: Money) -> Self {
        Self {
            id,
            name: name.into(),
            month_number,
            course_id,
            fee,
            created_at: None,
        }
    }
}

/// read access to the month catalog
pub trait MonthCatalog {
    fn month_by_id(&self, month_id: &MonthId) -> Option<Month>;
}

impl<T: MonthCatalog + ?Sized> MonthCatalog for &T {
    fn month_by_id(&self, month_id: &MonthId) -> Option<Month> {
        (**self).month_by_id(month_id)
    }
}
