//! # Predicate Specification
//!
//! A closed set of clause kinds that every storage backend interprets the
//! same way. Clauses in a [`PredicateSpec`] are combined with AND.

use crate::model::UserRecord;

/// Scalar text fields a clause can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    Email,
    Phone,
    CountryCode,
    Place,
    Gender,
}

impl TextField {
    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Name => "name",
            TextField::Email => "email",
            TextField::Phone => "phone",
            TextField::CountryCode => "countryCode",
            TextField::Place => "place",
            TextField::Gender => "gender",
        }
    }

    /// Column holding the field in the durable store
    pub fn column(&self) -> &'static str {
        match self {
            TextField::Name => "name",
            TextField::Email => "email",
            TextField::Phone => "phone",
            TextField::CountryCode => "country_code",
            TextField::Place => "place",
            TextField::Gender => "gender",
        }
    }

    /// Read the field from a record
    pub fn value<'a>(&self, record: &'a UserRecord) -> &'a str {
        match self {
            TextField::Name => &record.name,
            TextField::Email => &record.email,
            TextField::Phone => &record.phone,
            TextField::CountryCode => &record.country_code,
            TextField::Place => &record.place,
            TextField::Gender => &record.gender,
        }
    }
}

/// A single filter clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Case-sensitive equality
    ExactMatch { field: TextField, value: String },

    /// Case-insensitive substring containment
    SubstringMatch { field: TextField, needle: String },

    /// Matches when any inner clause matches
    Disjunction(Vec<Clause>),

    /// Matches when the record's hobbies share at least one value with `values`
    Membership { values: Vec<String> },
}

impl Clause {
    pub fn exact(field: TextField, value: impl Into<String>) -> Self {
        Clause::ExactMatch {
            field,
            value: value.into(),
        }
    }

    pub fn substring(field: TextField, needle: impl Into<String>) -> Self {
        Clause::SubstringMatch {
            field,
            needle: needle.into(),
        }
    }

    /// Check if a record satisfies this clause
    pub fn matches(&self, record: &UserRecord) -> bool {
        match self {
            Clause::ExactMatch { field, value } => field.value(record) == value,
            Clause::SubstringMatch { field, needle } => field
                .value(record)
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Clause::Disjunction(any) => any.iter().any(|c| c.matches(record)),
            Clause::Membership { values } => record.hobbies.iter().any(|h| values.contains(h)),
        }
    }
}

/// Ordered list of clauses combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateSpec {
    pub clauses: Vec<Clause>,
}

impl PredicateSpec {
    /// A predicate that matches every record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Check if a record matches all clauses
    pub fn matches(&self, record: &UserRecord) -> bool {
        self.clauses.iter().all(|c| c.matches(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{now, UserFields};

    fn record(name: &str, email: &str, place: &str, hobbies: &[&str]) -> UserRecord {
        UserRecord::from_fields(
            "1",
            UserFields {
                name: name.to_string(),
                email: email.to_string(),
                country_code: "+1".to_string(),
                phone: "5550102030".to_string(),
                place: place.to_string(),
                gender: "Female".to_string(),
                hobbies: hobbies.iter().map(|h| h.to_string()).collect(),
            },
            now(),
        )
    }

    #[test]
    fn test_substring_is_case_insensitive() {
        let r = record("Alice Johnson", "alice@example.com", "Boston", &["reading"]);

        assert!(Clause::substring(TextField::Name, "JOHN").matches(&r));
        assert!(Clause::substring(TextField::Place, "ost").matches(&r));
        assert!(!Clause::substring(TextField::Name, "smith").matches(&r));
    }

    #[test]
    fn test_substring_is_literal() {
        let r = record("a.c", "x@example.com", "Rome", &["art"]);

        assert!(Clause::substring(TextField::Name, ".").matches(&r));
        assert!(!Clause::substring(TextField::Place, ".*").matches(&r));
    }

    #[test]
    fn test_exact_is_case_sensitive() {
        let r = record("Alice", "alice@example.com", "Boston", &["reading"]);

        assert!(Clause::exact(TextField::Gender, "Female").matches(&r));
        assert!(!Clause::exact(TextField::Gender, "female").matches(&r));
        assert!(!Clause::exact(TextField::Gender, "Fem").matches(&r));
    }

    #[test]
    fn test_disjunction() {
        let r = record("Alice", "alice@example.com", "Boston", &["reading"]);
        let search = Clause::Disjunction(vec![
            Clause::substring(TextField::Name, "bost"),
            Clause::substring(TextField::Email, "bost"),
            Clause::substring(TextField::Place, "bost"),
        ]);

        assert!(search.matches(&r));
        assert!(!Clause::Disjunction(vec![]).matches(&r));
    }

    #[test]
    fn test_membership_intersects() {
        let r = record("Alice", "alice@example.com", "Boston", &["reading", "coding"]);

        let hit = Clause::Membership {
            values: vec!["coding".to_string(), "chess".to_string()],
        };
        let miss = Clause::Membership {
            values: vec!["Coding".to_string()],
        };

        assert!(hit.matches(&r));
        assert!(!miss.matches(&r));
    }

    #[test]
    fn test_predicate_is_conjunctive() {
        let r = record("Alice", "alice@example.com", "Boston", &["reading"]);

        assert!(PredicateSpec::new().matches(&r));

        let both = PredicateSpec::new()
            .and(Clause::substring(TextField::Name, "ali"))
            .and(Clause::exact(TextField::CountryCode, "+1"));
        assert!(both.matches(&r));

        let one_fails = both.and(Clause::exact(TextField::Gender, "Male"));
        assert!(!one_fails.matches(&r));
    }
}
