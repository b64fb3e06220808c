//! Database utility functions.

use chrono::Utc;

/// Current time in Unix epoch milliseconds.
pub fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}
