//! Persistent store access
//!
//! One MongoDB client for the whole run: index setup, the optional
//! collection drop, and every batch insert go through it, and it is shut
//! down explicitly on both success and failure paths.

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use async_trait::async_trait;
use fdns_common::types::DomainRecord;
use mongodb::bson::doc;
use mongodb::error::ErrorKind;
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, info, warn};

/// Result of flushing one batch
#[derive(Debug, Clone, Copy, Default)]
pub struct FlushOutcome {
    /// Documents accepted by the store
    pub inserted: usize,
    /// Documents individually rejected (unordered insert keeps the rest)
    pub failed: usize,
}

/// Destination for decoded record batches.
///
/// The pipeline is written against this seam so its batching and drain
/// behavior can be exercised without a running store.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Persist one batch. Per-document rejections are reported in the
    /// outcome; an `Err` means the batch as a whole failed and the run must
    /// abort.
    async fn flush(&self, records: Vec<DomainRecord>) -> Result<FlushOutcome>;
}

/// Handle to the Sonar record collection
pub struct SonarStore {
    client: Client,
    database: String,
    collection: String,
}

impl SonarStore {
    /// Connect and verify the deployment is reachable.
    ///
    /// The driver connects lazily, so an explicit `ping` is issued here to
    /// fail fast on an unreachable store.
    pub async fn connect(config: &IngestConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        client
            .database(&config.database)
            .run_command(doc! { "ping": 1 })
            .await?;

        info!(
            database = %config.database,
            collection = %config.collection,
            "store connection established"
        );

        Ok(SonarStore {
            client,
            database: config.database.clone(),
            collection: config.collection.clone(),
        })
    }

    fn records(&self) -> Collection<DomainRecord> {
        self.client
            .database(&self.database)
            .collection(&self.collection)
    }

    /// Create the text index used by the query side. Idempotent: creating
    /// an index of the same shape again is a no-op server-side.
    pub async fn ensure_index(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "domainWithoutSuffix": "text" })
            .build();
        self.records().create_index(index).await?;
        debug!("text index on domainWithoutSuffix ensured");
        Ok(())
    }

    /// Drop the target collection, best-effort.
    ///
    /// A failed drop usually means the collection does not exist yet; the
    /// error is kept visible at debug level so a permission problem is
    /// still distinguishable from the common case.
    pub async fn clear_collection(&self) {
        match self.records().drop().await {
            Ok(()) => info!(collection = %self.collection, "dropped existing collection"),
            Err(err) => {
                debug!(error = %err, collection = %self.collection, "collection drop failed")
            }
        }
    }

    /// Release the connection.
    pub async fn close(self) {
        self.client.shutdown().await;
        debug!("store connection closed");
    }
}

#[async_trait]
impl RecordSink for SonarStore {
    async fn flush(&self, records: Vec<DomainRecord>) -> Result<FlushOutcome> {
        let total = records.len();

        match self.records().insert_many(records).ordered(false).await {
            Ok(result) => Ok(FlushOutcome {
                inserted: result.inserted_ids.len(),
                failed: 0,
            }),
            // Unordered insert: individually rejected documents do not stop
            // the rest of the batch, so this is a partial success.
            Err(err) => match *err.kind {
                ErrorKind::InsertMany(ref failure) => {
                    let write_errors = failure.write_errors.as_deref().unwrap_or_default();
                    for write_error in write_errors {
                        warn!(
                            index = write_error.index,
                            code = write_error.code,
                            message = %write_error.message,
                            "document rejected by store"
                        );
                    }
                    let failed = write_errors.len();
                    Ok(FlushOutcome {
                        inserted: total.saturating_sub(failed),
                        failed,
                    })
                }
                _ => Err(IngestError::Store(err)),
            },
        }
    }
}
