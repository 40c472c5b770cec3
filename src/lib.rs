//! userdir - a user directory service
//!
//! Stores user records and answers list queries combining free-text search,
//! per-field filters, hobby membership, sorting and pagination. The same
//! query semantics hold on the PostgreSQL store and on the in-process
//! fallback store.

pub mod cli;
pub mod http_server;
pub mod model;
pub mod query;
pub mod service;
pub mod storage;
