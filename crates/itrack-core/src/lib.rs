//! itrack-core: Core library for the itrack issue tracker
//!
//! Provides the data model, query filters and the in-memory store behind
//! the `/api/issues/{project}` API. Nothing is persisted.

pub mod config;
pub mod error;
pub mod filter;
pub mod id;
pub mod issue;
pub mod store;

pub use config::Config;
pub use error::Error;
pub use filter::IssueFilter;
pub use id::generate_id;
pub use issue::{Issue, IssueField, IssueUpdate, NewIssue};
pub use store::IssueStore;

/// Result type for itrack operations
pub type Result<T> = std::result::Result<T, Error>;
