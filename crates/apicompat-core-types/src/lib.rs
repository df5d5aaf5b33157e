//! Core types shared across apicompat facilities
//!
//! This crate holds the canonical schema constants used by the logging
//! macros and by anything that inspects captured events:
//!
//! - **Field keys**: component, op, event, package, declaration
//! - **Event names**: start, end, end_error

pub mod schema;
