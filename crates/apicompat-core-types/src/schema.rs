//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical between the engine, the CLI
//! and the test capture layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Declaration identifiers
pub const FIELD_PACKAGE: &str = "package";
pub const FIELD_DECL_NAME: &str = "decl_name";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_CHANGE_KIND: &str = "change_kind";

// Collection sizes
pub const FIELD_FUNCTION_COUNT: &str = "function_count";
pub const FIELD_TYPE_COUNT: &str = "type_count";
pub const FIELD_VALUE_COUNT: &str = "value_count";
pub const FIELD_BREAKING_COUNT: &str = "breaking_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
