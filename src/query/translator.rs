//! # Query Translator
//!
//! Turns raw list parameters into a backend-agnostic query: a predicate,
//! a sort and a page window.

use super::params::{parse_int_prefix, ListParams};
use super::predicate::{Clause, PredicateSpec, TextField};
use super::sort::SortSpec;

/// Page number used when none (or an unusable one) is given
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when none (or an unusable one) is given
pub const DEFAULT_LIMIT: u64 = 10;

/// Page window. Both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageSpec {
    /// Create a page window, clamping zero values to 1
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Number of records to skip before this page starts
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages needed to hold `total` records
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }

    fn coerce(value: Option<&str>, default: u64) -> u64 {
        value
            .and_then(parse_int_prefix)
            .and_then(|n| u64::try_from(n).ok())
            .filter(|n| *n >= 1)
            .unwrap_or(default)
    }
}

/// A fully translated list query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub predicate: PredicateSpec,
    pub sort: SortSpec,
    pub page: PageSpec,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Translates list parameters into a [`ListQuery`]
pub fn translate(params: &ListParams) -> ListQuery {
    let mut predicate = PredicateSpec::new();

    if let Some(search) = non_blank(&params.search) {
        predicate = predicate.and(Clause::Disjunction(vec![
            Clause::substring(TextField::Name, search),
            Clause::substring(TextField::Email, search),
            Clause::substring(TextField::Place, search),
        ]));
    }

    let substring_fields = [
        (TextField::Name, &params.name),
        (TextField::Email, &params.email),
        (TextField::Phone, &params.phone),
        (TextField::Place, &params.place),
    ];
    for (field, value) in substring_fields {
        if let Some(needle) = non_blank(value) {
            predicate = predicate.and(Clause::substring(field, needle));
        }
    }

    let exact_fields = [
        (TextField::Gender, &params.gender),
        (TextField::CountryCode, &params.country_code),
    ];
    for (field, value) in exact_fields {
        if let Some(value) = non_blank(value) {
            predicate = predicate.and(Clause::exact(field, value));
        }
    }

    if !params.hobbies.is_empty() {
        predicate = predicate.and(Clause::Membership {
            values: params.hobbies.clone(),
        });
    }

    let sort = params
        .sort
        .as_deref()
        .map(SortSpec::parse)
        .unwrap_or_default();

    let page = PageSpec {
        page: PageSpec::coerce(params.page.as_deref(), DEFAULT_PAGE),
        limit: PageSpec::coerce(params.limit.as_deref(), DEFAULT_LIMIT),
    };

    ListQuery {
        predicate,
        sort,
        page,
    }
}
