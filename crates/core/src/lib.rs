//! Shared foundations for the Ideamart authentication subsystem: id and
//! timestamp aliases, the error taxonomy, identifier validation, and digest
//! helpers.

pub mod error;
pub mod hashing;
pub mod types;
pub mod validate;
