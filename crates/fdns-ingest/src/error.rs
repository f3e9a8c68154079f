//! Error taxonomy for the ingestion pipeline
//!
//! Every variant here is fatal and aborts the run. Recoverable conditions
//! (an unparseable line, a per-document write rejection) never become an
//! `IngestError`; they are counted and surface in the final
//! [`IngestSummary`](crate::pipeline::IngestSummary).

use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Fatal errors raised by the ingestion pipeline
#[derive(Debug, Error)]
pub enum IngestError {
    /// Network-level failure (DNS, connection reset, TLS) while talking to
    /// the dataset host
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The dataset host answered with a status we cannot stream from
    #[error("download request failed, response status: {status} {message}")]
    RemoteFetch { status: u16, message: String },

    /// Redirect chain did not reach a final response within the hop bound
    #[error("redirect chain exceeded {hops} hops")]
    RedirectLoop { hops: u32 },

    /// The compressed stream is malformed; data flushed before the failure
    /// stays in the store (no rollback)
    #[error("corrupt gzip stream: {0}")]
    Decompression(String),

    /// Store connection, index setup, or a whole-batch write failed
    #[error("store operation failed: {0}")]
    Store(#[from] mongodb::error::Error),

    /// I/O failure while reading the byte stream (local file or bridged
    /// network body)
    #[error("stream I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or dataset URL
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The blocking scan task panicked or was aborted
    #[error("pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
