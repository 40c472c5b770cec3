//! # Record Model
//!
//! The user entity and its field-level validation rules.

pub mod user;
pub mod validator;

pub use user::{now, UserFields, UserInput, UserRecord, DEFAULT_COUNTRY_CODE};
pub use validator::{
    is_valid_email, phone_digit_count, validate, Field, FieldError, ValidationMode,
};
