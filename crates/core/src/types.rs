/// All database primary and foreign keys are PostgreSQL `UUID` columns.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
