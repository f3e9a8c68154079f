//! FDNS Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared building blocks for the forward-DNS dataset loader:
//!
//! - **Logging**: tracing subscriber setup with console/file targets
//! - **Suffix**: registrable-domain decomposition via the public suffix list
//! - **Types**: the raw and normalized record shapes moved through the
//!   ingestion pipeline
//!
//! # Example
//!
//! ```no_run
//! use fdns_common::suffix;
//!
//! let parts = suffix::resolve("www.example.co.uk");
//! assert_eq!(parts.domain_without_suffix.as_deref(), Some("example"));
//! ```

pub mod logging;
pub mod suffix;
pub mod types;

// Re-export commonly used types
pub use suffix::DomainParts;
pub use types::{DomainRecord, RawRecord};
