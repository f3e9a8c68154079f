//! FDNS Ingest Library
//!
//! One-shot batch loader for the Rapid7 Project Sonar forward-DNS dataset:
//! streams the gzip-compressed, line-delimited dataset over HTTP (or from a
//! local file), decomposes each hostname into registrable-domain parts, and
//! bulk-inserts the normalized records into MongoDB.
//!
//! Pipeline shape:
//!
//! ```text
//! fetch (HTTP, bounded redirects)
//!   -> decompress + line framing (incremental gzip)
//!   -> decode (JSON line -> DomainRecord, recoverable skips)
//!   -> bounded channel (backpressure)
//!   -> store (unordered bulk insert)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use fdns_ingest::{config::IngestConfig, pipeline};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = IngestConfig::default();
//!     let summary = pipeline::ingest(&config, CancellationToken::new()).await?;
//!     tracing::info!("{}", summary.summary());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod decode;
pub mod decompress;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod store;

// Re-export commonly used types
pub use config::IngestConfig;
pub use error::{IngestError, Result};
pub use pipeline::IngestSummary;
pub use store::{FlushOutcome, RecordSink, SonarStore};
