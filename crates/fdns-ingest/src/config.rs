//! Ingestion run configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Published Sonar FDNS `A`-record snapshot this loader was built against.
pub const SONAR_FDNS_URL: &str =
    "https://opendata.rapid7.com/sonar.fdns_v2/2022-01-28-1643328400-fdns_a.json.gz";

/// Configuration for one ingestion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Dataset URL (gzip-compressed, line-delimited JSON)
    pub dataset_url: String,

    /// Local gzip file to read instead of the network, when set
    pub local_path: Option<PathBuf>,

    /// Store connection string
    pub mongo_uri: String,

    /// Database holding the target collection
    pub database: String,

    /// Collection the records are loaded into
    pub collection: String,

    /// Records accumulated per bulk insert
    pub batch_size: usize,

    /// Batches allowed to queue between the scan stage and the store writer;
    /// together with the awaited flush this bounds outstanding writes
    pub channel_capacity: usize,

    /// Redirect hops followed before the fetch is abandoned
    pub max_redirects: u32,

    /// TCP/TLS connection establishment timeout
    pub connect_timeout_secs: u64,

    /// Idle timeout between body chunks; a whole-request timeout would kill
    /// multi-gigabyte streams partway through
    pub read_timeout_secs: u64,

    /// Accepted-record interval between progress events
    pub progress_interval: u64,

    /// Drop the target collection before loading (best-effort)
    pub drop_existing: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            dataset_url: SONAR_FDNS_URL.to_string(),
            local_path: None,
            mongo_uri: "mongodb://localhost:27017".to_string(),
            database: "test_db".to_string(),
            collection: "sonardata".to_string(),
            batch_size: 100_000,
            channel_capacity: 1,
            max_redirects: 10,
            connect_timeout_secs: 30,
            read_timeout_secs: 300,
            progress_interval: 100_000,
            drop_existing: true,
        }
    }
}

impl IngestConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.local_path.is_none() && self.dataset_url.is_empty() {
            return Err("Dataset URL cannot be empty".to_string());
        }
        if self.mongo_uri.is_empty() {
            return Err("Store connection string cannot be empty".to_string());
        }
        if self.database.is_empty() {
            return Err("Database name cannot be empty".to_string());
        }
        if self.collection.is_empty() {
            return Err("Collection name cannot be empty".to_string());
        }
        if self.batch_size == 0 {
            return Err("Batch size must be greater than 0".to_string());
        }
        if self.channel_capacity == 0 {
            return Err("Channel capacity must be greater than 0".to_string());
        }
        if self.progress_interval == 0 {
            return Err("Progress interval must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(IngestConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_url_rejected_without_local_fallback() {
        let config = IngestConfig {
            dataset_url: String::new(),
            ..IngestConfig::default()
        };
        assert!(config.validate().is_err());

        let config = IngestConfig {
            dataset_url: String::new(),
            local_path: Some(PathBuf::from("fdns_a.json.gz")),
            ..IngestConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = IngestConfig {
            batch_size: 0,
            ..IngestConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_channel_capacity_rejected() {
        let config = IngestConfig {
            channel_capacity: 0,
            ..IngestConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
