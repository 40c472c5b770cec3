//! # User Validation
//!
//! Field-level rules for user input. Every rule is evaluated on every call,
//! so a caller always sees the full list of violations.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::user::{UserFields, UserInput, DEFAULT_COUNTRY_CODE};

/// Minimum number of digits a phone number must contain
pub const PHONE_DIGITS_MIN: usize = 10;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is a valid regex")
});

/// User fields that can carry a validation or uniqueness error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    CountryCode,
    Phone,
    Place,
    Gender,
    Hobbies,
}

impl Field {
    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::CountryCode => "countryCode",
            Field::Phone => "phone",
            Field::Place => "place",
            Field::Gender => "gender",
            Field::Hobbies => "hobbies",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violated rule, attributed to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Which operation the input is validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Missing country code falls back to the default
    Create,
    /// Country code is required
    Update,
}

/// Checks whether a string matches the accepted email grammar
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Number of decimal digits in a phone string, ignoring separators
pub fn phone_digit_count(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Validates user input, returning every violation found.
///
/// An empty list means the input is acceptable for `mode`.
pub fn validate(input: &UserInput, mode: ValidationMode) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if is_blank(input.name.as_deref()) {
        errors.push(FieldError::new(Field::Name, "Name is required"));
    }

    match input.email.as_deref() {
        None | Some("") => errors.push(FieldError::new(Field::Email, "Email is required")),
        Some(email) if !is_valid_email(email) => {
            errors.push(FieldError::new(Field::Email, "Please provide a valid email"))
        }
        Some(_) => {}
    }

    match input.phone.as_deref() {
        None | Some("") => errors.push(FieldError::new(Field::Phone, "Phone number is required")),
        Some(phone) if phone_digit_count(phone) < PHONE_DIGITS_MIN => {
            errors.push(FieldError::new(Field::Phone, "Phone number is too short"))
        }
        Some(_) => {}
    }

    if mode == ValidationMode::Update && is_blank(input.country_code.as_deref()) {
        errors.push(FieldError::new(
            Field::CountryCode,
            "Country code is required",
        ));
    }

    if is_blank(input.place.as_deref()) {
        errors.push(FieldError::new(Field::Place, "Place is required"));
    }

    if is_blank(input.gender.as_deref()) {
        errors.push(FieldError::new(Field::Gender, "Gender is required"));
    }

    if input.hobbies.as_ref().map_or(true, Vec::is_empty) {
        errors.push(FieldError::new(
            Field::Hobbies,
            "At least one hobby is required",
        ));
    }

    errors
}

impl UserFields {
    /// Normalize and validate raw input into persistable fields.
    ///
    /// # Errors
    ///
    /// Returns every violated rule when the input is not acceptable.
    pub fn from_input(input: UserInput, mode: ValidationMode) -> Result<Self, Vec<FieldError>> {
        let input = input.trimmed();

        let errors = validate(&input, mode);
        if !errors.is_empty() {
            return Err(errors);
        }

        let country_code = match input.country_code {
            Some(code) if !code.is_empty() => code,
            _ => DEFAULT_COUNTRY_CODE.to_string(),
        };

        Ok(Self {
            name: input.name.unwrap_or_default(),
            email: input.email.unwrap_or_default(),
            country_code,
            phone: input.phone.unwrap_or_default(),
            place: input.place.unwrap_or_default(),
            gender: input.gender.unwrap_or_default(),
            hobbies: input.hobbies.unwrap_or_default(),
        })
    }
}
