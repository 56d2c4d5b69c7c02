//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Publishing identifiers
pub const FIELD_PACKAGE_NUMBER: &str = "package_number";
pub const FIELD_PACKAGE_ID: &str = "package_id";
pub const FIELD_BLOB: &str = "blob";
pub const FIELD_EML_PATH: &str = "eml_path";

// Collection sizes
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_APPLIED: &str = "applied";
pub const FIELD_SKIPPED: &str = "skipped";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
