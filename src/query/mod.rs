//! # Query Engine
//!
//! Translates list parameters into a backend-agnostic predicate, sort and
//! page window. Both storage backends execute the result with identical
//! semantics: filter, then sort, then skip, then limit.

pub mod params;
pub mod predicate;
pub mod sort;
pub mod translator;

pub use params::ListParams;
pub use predicate::{Clause, PredicateSpec, TextField};
pub use sort::{SortDirection, SortField, SortSpec};
pub use translator::{translate, ListQuery, PageSpec, DEFAULT_LIMIT, DEFAULT_PAGE};
