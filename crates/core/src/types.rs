//! Shared identifier and timestamp aliases.

use chrono::{DateTime, Utc};

/// Internal database id (BIGSERIAL).
pub type DbId = i64;

/// UTC timestamp as stored in TIMESTAMPTZ columns.
pub type Timestamp = DateTime<Utc>;
