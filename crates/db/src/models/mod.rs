//! Row models and create-DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row and, where inserts take more than a couple of scalars, a create DTO.

pub mod login_attempt;
pub mod one_time_code;
pub mod session;
pub mod user;
