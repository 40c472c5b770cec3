//! # Sort Specification
//!
//! Single-field ordering shared by both storage backends.

use std::cmp::Ordering;

use crate::model::UserRecord;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Only the exact literal `desc` is descending
    pub fn parse(value: &str) -> Self {
        if value == "desc" {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// Record fields that can drive ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Email,
    Phone,
    CountryCode,
    Place,
    Gender,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parse a wire field name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" => Some(SortField::Name),
            "email" => Some(SortField::Email),
            "phone" => Some(SortField::Phone),
            "countryCode" => Some(SortField::CountryCode),
            "place" => Some(SortField::Place),
            "gender" => Some(SortField::Gender),
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Phone => "phone",
            SortField::CountryCode => "countryCode",
            SortField::Place => "place",
            SortField::Gender => "gender",
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    /// Column holding the field in the durable store
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Phone => "phone",
            SortField::CountryCode => "country_code",
            SortField::Place => "place",
            SortField::Gender => "gender",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, SortField::CreatedAt | SortField::UpdatedAt)
    }

    /// Natural ascending order of two records on this field.
    ///
    /// Strings compare byte-wise, timestamps chronologically.
    pub fn compare(&self, a: &UserRecord, b: &UserRecord) -> Ordering {
        match self {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Email => a.email.cmp(&b.email),
            SortField::Phone => a.phone.cmp(&b.phone),
            SortField::CountryCode => a.country_code.cmp(&b.country_code),
            SortField::Place => a.place.cmp(&b.place),
            SortField::Gender => a.gender.cmp(&b.gender),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

/// Sort specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::asc(SortField::CreatedAt)
    }
}

impl SortSpec {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    /// Parse `field:direction`.
    ///
    /// Unknown fields fall back to `createdAt`, keeping the direction.
    pub fn parse(value: &str) -> Self {
        let (field, direction) = match value.split_once(':') {
            Some((field, direction)) => (field, SortDirection::parse(direction)),
            None => (value, SortDirection::Asc),
        };

        Self {
            field: SortField::parse(field).unwrap_or(SortField::CreatedAt),
            direction,
        }
    }

    /// Compare two records under this spec
    pub fn compare(&self, a: &UserRecord, b: &UserRecord) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Sorts records in place.
    ///
    /// The sort is stable: records with equal keys keep their relative order.
    pub fn sort(&self, records: &mut [UserRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}
