//! Start/due date window attached to a task for Gantt scheduling.

use super::BoardDomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Validated optional start/due window.
///
/// Either bound may be absent; when both are present the due date must not
/// precede the start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schedule {
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
}

impl Schedule {
    /// Creates a validated schedule window.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidDateRange`] when both dates are
    /// present and the due date precedes the start date.
    pub fn new(
        start_date: Option<NaiveDate>,
        due_date: Option<NaiveDate>,
    ) -> Result<Self, BoardDomainError> {
        if let (Some(start), Some(due)) = (start_date, due_date)
            && due < start
        {
            return Err(BoardDomainError::InvalidDateRange { start, due });
        }
        Ok(Self {
            start_date,
            due_date,
        })
    }

    /// Returns a schedule with no dates set.
    #[must_use]
    pub const fn unscheduled() -> Self {
        Self {
            start_date: None,
            due_date: None,
        }
    }

    /// Returns the start date, if set.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the due date, if set.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}
