//! # User Record
//!
//! The single entity held by the directory, plus the raw input shape
//! callers submit on create and update.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Country code applied on create when the caller omits one
pub const DEFAULT_COUNTRY_CODE: &str = "+1";

/// A stored user record.
///
/// Backends hand out owned copies of this type; nothing outside a backend
/// ever holds a reference into its storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Server-assigned identifier, immutable for the record's lifetime
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub country_code: String,
    pub phone: String,
    pub place: String,
    pub gender: String,
    pub hobbies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Build a record from validated fields with fresh timestamps
    pub fn from_fields(id: impl Into<String>, fields: UserFields, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            email: fields.email,
            country_code: fields.country_code,
            phone: fields.phone,
            place: fields.place,
            gender: fields.gender,
            hobbies: fields.hobbies,
            created_at: at,
            updated_at: at,
        }
    }

    /// Overwrite every caller-owned field, keeping `id` and `created_at`
    pub fn apply(&mut self, fields: UserFields, at: DateTime<Utc>) {
        self.name = fields.name;
        self.email = fields.email;
        self.country_code = fields.country_code;
        self.phone = fields.phone;
        self.place = fields.place;
        self.gender = fields.gender;
        self.hobbies = fields.hobbies;
        self.updated_at = at;
    }

    /// The caller-owned part of this record
    pub fn fields(&self) -> UserFields {
        UserFields {
            name: self.name.clone(),
            email: self.email.clone(),
            country_code: self.country_code.clone(),
            phone: self.phone.clone(),
            place: self.place.clone(),
            gender: self.gender.clone(),
            hobbies: self.hobbies.clone(),
        }
    }
}

/// Validated, normalized user fields ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub country_code: String,
    pub phone: String,
    pub place: String,
    pub gender: String,
    pub hobbies: Vec<String>,
}

/// Raw user input as submitted by a caller.
///
/// Every field is optional so that validation can report all missing
/// fields at once instead of failing on the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub place: Option<String>,
    pub gender: Option<String>,
    pub hobbies: Option<Vec<String>>,
}

impl UserInput {
    /// Read input leniently from a JSON body.
    ///
    /// A value of the wrong type is treated as absent; `hobbies` is only
    /// accepted as an array of strings.
    pub fn from_json(body: &Value) -> Self {
        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);

        let hobbies = body.get("hobbies").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        });

        Self {
            name: text("name"),
            email: text("email"),
            country_code: text("countryCode"),
            phone: text("phone"),
            place: text("place"),
            gender: text("gender"),
            hobbies,
        }
    }

    /// Trim surrounding whitespace from every scalar field
    pub fn trimmed(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        Self {
            name: trim(self.name),
            email: trim(self.email),
            country_code: trim(self.country_code),
            phone: trim(self.phone),
            place: trim(self.place),
            gender: trim(self.gender),
            hobbies: self.hobbies,
        }
    }
}

impl From<UserFields> for UserInput {
    fn from(fields: UserFields) -> Self {
        Self {
            name: Some(fields.name),
            email: Some(fields.email),
            country_code: Some(fields.country_code),
            phone: Some(fields.phone),
            place: Some(fields.place),
            gender: Some(fields.gender),
            hobbies: Some(fields.hobbies),
        }
    }
}

/// Current time at the precision both backends can store
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
