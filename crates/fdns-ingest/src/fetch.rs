//! Dataset fetching (HTTP and local file)
//!
//! Resolves the dataset URL into a readable byte stream. Redirects are
//! handled here rather than inside the HTTP client so the hop count stays
//! bounded and observable: 301/302 responses are followed as an explicit
//! counted loop, anything else either streams (200) or fails with its
//! status code.

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use futures::TryStreamExt;
use reqwest::{header, redirect, Client, StatusCode, Url};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::Duration;
use tokio_util::io::{StreamReader, SyncIoBridge};
use tracing::{debug, info};

const USER_AGENT: &str = concat!("fdns-ingest/", env!("CARGO_PKG_VERSION"));

/// A blocking reader over the (still compressed) dataset bytes.
///
/// The remote variant bridges an async response body; it must only be read
/// from a blocking context (the scan stage runs under `spawn_blocking`).
pub type DatasetReader = Box<dyn Read + Send>;

/// HTTP fetcher with manual redirect handling
pub struct Fetcher {
    client: Client,
    max_redirects: u32,
}

impl Fetcher {
    /// Create a fetcher from the run configuration.
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(IngestError::Transport)?;

        Ok(Fetcher {
            client,
            max_redirects: config.max_redirects,
        })
    }

    /// Open the dataset at `url`, following up to `max_redirects` 301/302
    /// hops.
    ///
    /// Completes once response headers are in; the body streams lazily
    /// through the returned reader.
    pub async fn open_remote(&self, url: &str) -> Result<DatasetReader> {
        let mut url = Url::parse(url)
            .map_err(|e| IngestError::Config(format!("invalid dataset URL {url:?}: {e}")))?;

        for hop in 0..=self.max_redirects {
            debug!(%url, hop, "requesting dataset");
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();

            match status {
                StatusCode::OK => {
                    info!(%url, "dataset stream opened");
                    let body = Box::pin(response.bytes_stream().map_err(io::Error::other));
                    return Ok(Box::new(SyncIoBridge::new(StreamReader::new(body))));
                }
                StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
                    let location = response
                        .headers()
                        .get(header::LOCATION)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_owned)
                        .ok_or_else(|| IngestError::RemoteFetch {
                            status: status.as_u16(),
                            message: "redirect without a Location header".to_string(),
                        })?;

                    // Location may be relative; resolve against the current URL.
                    let next = url.join(&location).map_err(|e| IngestError::RemoteFetch {
                        status: status.as_u16(),
                        message: format!("invalid redirect target {location:?}: {e}"),
                    })?;

                    info!(target = %next, hop = hop + 1, "following redirect");
                    url = next;
                }
                _ => {
                    return Err(IngestError::RemoteFetch {
                        status: status.as_u16(),
                        message: status
                            .canonical_reason()
                            .unwrap_or("unexpected status")
                            .to_string(),
                    });
                }
            }
        }

        Err(IngestError::RedirectLoop {
            hops: self.max_redirects,
        })
    }
}

/// Open a local gzip copy of the dataset instead of fetching it.
pub fn open_local(path: &Path) -> Result<DatasetReader> {
    info!(path = %path.display(), "reading dataset from local file");
    let file = File::open(path)?;
    Ok(Box::new(file))
}
