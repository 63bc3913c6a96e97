//! Diesel row models for board task persistence.

use super::schema::tasks;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Optional parent task identifier.
    pub parent_id: Option<uuid::Uuid>,
    /// Status (column) identifier.
    pub status_id: uuid::Uuid,
    /// Optional company identifier.
    pub company_id: Option<uuid::Uuid>,
    /// Stored column position.
    pub order_in_status: Option<i32>,
    /// Scheduled start date.
    pub start_date: Option<NaiveDate>,
    /// Scheduled due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Optional parent task identifier.
    pub parent_id: Option<uuid::Uuid>,
    /// Status (column) identifier.
    pub status_id: uuid::Uuid,
    /// Optional company identifier.
    pub company_id: Option<uuid::Uuid>,
    /// Stored column position.
    pub order_in_status: Option<i32>,
    /// Scheduled start date.
    pub start_date: Option<NaiveDate>,
    /// Scheduled due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for a column placement write: status and position together.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct PositionChangeset {
    /// Status (column) identifier.
    pub status_id: uuid::Uuid,
    /// Stored column position.
    pub order_in_status: i32,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for a company reassignment write.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct CompanyChangeset {
    /// Company identifier.
    pub company_id: uuid::Uuid,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for a status-plus-schedule write.
///
/// `treat_none_as_null` so a cleared date persists as `NULL` instead of
/// being skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct StatusScheduleChangeset {
    /// Status (column) identifier.
    pub status_id: uuid::Uuid,
    /// Scheduled start date.
    pub start_date: Option<NaiveDate>,
    /// Scheduled due date.
    pub due_date: Option<NaiveDate>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
