//! Pipeline orchestration
//!
//! Wires fetch -> decompress -> decode -> store and owns the run lifecycle:
//! connect, ensure index, stream, drain, close. The streaming stage runs as
//! two halves joined by a bounded channel: a blocking scan task (decompress,
//! frame, decode, batch) and the async flush loop. The scan can never run
//! further ahead of the store than the channel capacity allows.

use crate::config::IngestConfig;
use crate::decode::{self, Decoded, SkipReason};
use crate::decompress;
use crate::error::{IngestError, Result};
use crate::fetch::{self, DatasetReader, Fetcher};
use crate::store::{RecordSink, SonarStore};
use fdns_common::types::DomainRecord;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    /// Lines framed out of the decompressed stream
    pub lines_seen: u64,
    /// Lines that decoded into a record with a registrable domain
    pub records_accepted: u64,
    /// Lines dropped (unparseable or no registrable domain)
    pub records_dropped: u64,
    /// Subset of dropped lines that were unparseable
    pub parse_errors: u64,
    /// Batches handed to the store
    pub batches_flushed: u64,
    /// Documents the store accepted
    pub records_inserted: u64,
    /// Documents individually rejected by the store
    pub write_failures: u64,
    /// Whether the run was cancelled before end of stream
    pub cancelled: bool,
}

impl IngestSummary {
    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} lines scanned, {} records accepted ({} dropped, {} parse errors), \
             {} batches flushed, {} documents inserted, {} write failures{}",
            self.lines_seen,
            self.records_accepted,
            self.records_dropped,
            self.parse_errors,
            self.batches_flushed,
            self.records_inserted,
            self.write_failures,
            if self.cancelled { " [cancelled]" } else { "" },
        )
    }
}

/// Run a full ingestion: connect, prepare the collection, stream the
/// dataset, drain, and close the store.
///
/// The store is closed on both success and failure paths before the outcome
/// propagates.
pub async fn ingest(config: &IngestConfig, token: CancellationToken) -> Result<IngestSummary> {
    config.validate().map_err(IngestError::Config)?;

    info!(uri = %config.mongo_uri, "connecting to store");
    let store = SonarStore::connect(config).await?;

    let outcome = run_with_store(&store, config, token).await;
    store.close().await;

    if let Err(err) = &outcome {
        error!(error = %err, "ingestion failed");
    }
    outcome
}

async fn run_with_store(
    store: &SonarStore,
    config: &IngestConfig,
    token: CancellationToken,
) -> Result<IngestSummary> {
    if config.drop_existing {
        store.clear_collection().await;
    }
    store.ensure_index().await?;

    let reader = match &config.local_path {
        Some(path) => fetch::open_local(path)?,
        None => {
            Fetcher::new(config)?
                .open_remote(&config.dataset_url)
                .await?
        }
    };

    run_stream(reader, store, config, token).await
}

/// Stream `reader` through decode and batching into `sink`.
///
/// Public seam for tests: any [`RecordSink`] and any blocking reader over
/// gzip bytes work here, network and store not required.
pub async fn run_stream<S>(
    reader: DatasetReader,
    sink: &S,
    config: &IngestConfig,
    token: CancellationToken,
) -> Result<IngestSummary>
where
    S: RecordSink,
{
    config.validate().map_err(IngestError::Config)?;

    let (tx, mut rx) = mpsc::channel::<Vec<DomainRecord>>(config.channel_capacity);
    let scan_config = ScanConfig {
        batch_size: config.batch_size,
        progress_interval: config.progress_interval,
    };
    let scan_token = token.clone();
    let scan = tokio::task::spawn_blocking(move || {
        scan_records(reader, scan_config, tx, scan_token)
    });

    let mut batches_flushed = 0u64;
    let mut records_inserted = 0u64;
    let mut write_failures = 0u64;
    let mut flush_error: Option<IngestError> = None;

    while let Some(batch) = rx.recv().await {
        let batch_len = batch.len();
        match sink.flush(batch).await {
            Ok(outcome) => {
                batches_flushed += 1;
                records_inserted += outcome.inserted as u64;
                write_failures += outcome.failed as u64;
                debug!(
                    batch = batches_flushed,
                    records = batch_len,
                    inserted = outcome.inserted,
                    rejected = outcome.failed,
                    "batch flushed"
                );
            }
            Err(err) => {
                flush_error = Some(err);
                break;
            }
        }
    }
    // Dropping the receiver fails the scan stage's next send, stopping it
    // without a separate signal.
    drop(rx);

    let scan_result = scan.await;

    // A fatal flush error outranks whatever the interrupted scan reports.
    if let Some(err) = flush_error {
        return Err(err);
    }

    let stats = scan_result??;
    if stats.cancelled {
        warn!("ingestion cancelled before end of stream");
    }

    Ok(IngestSummary {
        lines_seen: stats.lines_seen,
        records_accepted: stats.accepted,
        records_dropped: stats.dropped,
        parse_errors: stats.parse_errors,
        batches_flushed,
        records_inserted,
        write_failures,
        cancelled: stats.cancelled,
    })
}

#[derive(Debug, Clone)]
struct ScanConfig {
    batch_size: usize,
    progress_interval: u64,
}

#[derive(Debug, Default)]
struct ScanStats {
    lines_seen: u64,
    accepted: u64,
    dropped: u64,
    parse_errors: u64,
    cancelled: bool,
}

/// Blocking half of the streaming stage: decompress, frame, decode, batch.
fn scan_records(
    reader: DatasetReader,
    config: ScanConfig,
    tx: mpsc::Sender<Vec<DomainRecord>>,
    token: CancellationToken,
) -> Result<ScanStats> {
    let mut stats = ScanStats::default();
    let mut batch: Vec<DomainRecord> = Vec::with_capacity(config.batch_size);

    for line in decompress::record_lines(reader) {
        if token.is_cancelled() {
            stats.cancelled = true;
            break;
        }

        let line = line.map_err(decompress::classify_stream_error)?;
        stats.lines_seen += 1;

        match decode::decode(&line) {
            Decoded::Record(record) => {
                batch.push(record);
                stats.accepted += 1;

                if stats.accepted % config.progress_interval == 0 {
                    info!(
                        lines = stats.lines_seen,
                        records = stats.accepted,
                        "scan progress"
                    );
                }

                if batch.len() >= config.batch_size {
                    let full = std::mem::replace(&mut batch, Vec::with_capacity(config.batch_size));
                    // blocking_send parks this thread while the writer works
                    // through the channel; this edge is the backpressure.
                    if tx.blocking_send(full).is_err() {
                        // Receiver gone: a fatal flush error is unwinding the
                        // run, nothing more to scan.
                        return Ok(stats);
                    }
                }
            }
            Decoded::Skip(SkipReason::InvalidJson(err)) => {
                stats.dropped += 1;
                stats.parse_errors += 1;
                warn!(line = stats.lines_seen, error = %err, "skipping unparseable line");
            }
            Decoded::Skip(SkipReason::NoRegistrableDomain) => {
                stats.dropped += 1;
                trace!(line = stats.lines_seen, "no registrable domain, dropping record");
            }
        }
    }

    // End-of-stream drain: the final partial batch still counts.
    if !batch.is_empty() {
        let _ = tx.blocking_send(batch);
    }

    Ok(stats)
}
