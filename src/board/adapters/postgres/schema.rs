//! Diesel schema for board task persistence.

diesel::table! {
    /// Task records for the board engine.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Optional parent task; NULL marks a root task.
        parent_id -> Nullable<Uuid>,
        /// Pipeline status (board column) reference.
        status_id -> Uuid,
        /// Optional company (tenant) reference.
        company_id -> Nullable<Uuid>,
        /// Position among the root tasks of the column; NULL for subtasks
        /// and for rows the reconciliation pass has not yet numbered.
        order_in_status -> Nullable<Integer>,
        /// Optional scheduled start date.
        start_date -> Nullable<Date>,
        /// Optional scheduled due date.
        due_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
