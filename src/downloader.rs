//! Orchestration: probe, partition, concurrent fetch, merge.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::merge;
use crate::part::{Part, PartState};
use crate::partition::{self, DEFAULT_PART_SIZE};
use crate::probe;

/// One download invocation, discarded once `download` returns.
pub(crate) struct DownloadJob {
    pub(crate) url: String,
    pub(crate) dest: PathBuf,
    pub(crate) total_size: u64,
    pub(crate) parts: Vec<Part>,
}

/// Write-once cell holding the job's failure cause. The first recorded error
/// wins; later writes are discarded. Safe for concurrent fetch tasks.
#[derive(Default)]
struct FailureCell(Mutex<Option<Error>>);

impl FailureCell {
    fn record(&self, err: Error) {
        let mut slot = self.0.lock().unwrap();
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    fn take(&self) -> Option<Error> {
        self.0.lock().unwrap().take()
    }
}

/// Splits a remote resource into fixed-size byte ranges, fetches them
/// concurrently, and reassembles them into one output file.
///
/// The caller supplies the [`Client`]; timeouts, TLS, proxies, and rate
/// limiting are its concern, not this type's. One failing part aborts the
/// whole job with the first failure as the cause; there are no retries and
/// no partial-success output.
pub struct Downloader {
    client: Client,
    part_size: u64,
}

impl Downloader {
    /// Create a downloader over the given client with the default 10 MiB
    /// part size.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            part_size: DEFAULT_PART_SIZE,
        }
    }

    /// Override the part size in bytes. Values below 1 are clamped to 1.
    pub fn with_part_size(mut self, part_size: u64) -> Self {
        self.part_size = part_size.max(1);
        self
    }

    /// Download `url` into the file at `dest`.
    ///
    /// On success the destination file is the ordered concatenation of every
    /// part body and no part files remain. On failure the destination is not
    /// merged (or left partially written if the merge itself failed) and
    /// already-downloaded part files are left on disk.
    pub async fn download(&self, url: &str, dest: impl AsRef<Path>) -> Result<()> {
        let dest = dest.as_ref();

        let total_size = probe::content_length(&self.client, url).await?;
        info!(size = total_size, url, "resolved resource size");

        let parts = partition::partition(total_size, self.part_size, dest);
        info!(count = parts.len(), url, "partitioned into parts");

        let mut job = DownloadJob {
            url: url.to_string(),
            dest: dest.to_path_buf(),
            total_size,
            parts,
        };

        job.parts = self
            .fetch_all(&job.url, std::mem::take(&mut job.parts))
            .await?;
        info!(
            done = job.parts.iter().filter(|p| p.state == PartState::Done).count(),
            url,
            "all parts downloaded"
        );

        if let Err(err) = merge::merge(&job).await {
            error!(error = %err, dest = %job.dest.display(), "merge failed");
            return Err(err);
        }
        info!(size = job.total_size, dest = %job.dest.display(), "all parts merged");
        Ok(())
    }

    /// Run one fetch task per part and wait for every task to settle.
    ///
    /// The first task to fail records the job's error cause and cancels the
    /// shared token; peers abort at their next I/O boundary and their errors
    /// are discarded. Returns the settled parts re-slotted by index, so merge
    /// order never depends on completion order.
    async fn fetch_all(&self, url: &str, parts: Vec<Part>) -> Result<Vec<Part>> {
        let cancel = CancellationToken::new();
        let failure = Arc::new(FailureCell::default());
        let count = parts.len();

        let mut handles = Vec::with_capacity(count);
        for mut part in parts {
            let client = self.client.clone();
            let url = url.to_string();
            let cancel = cancel.clone();
            let failure = Arc::clone(&failure);

            let index = part.index;
            let handle = tokio::spawn(async move {
                if let Err(err) = part.fetch(&client, &url, &cancel).await {
                    debug!(part = part.index, error = %err, "part fetch failed");
                    // Record before cancelling so an aborted peer's
                    // `Cancelled` can never become the cause.
                    failure.record(Error::Fetch {
                        part: part.index,
                        source: err,
                    });
                    cancel.cancel();
                }
                part
            });
            handles.push((index, handle));
        }

        // Full join: the outcome is decided only after every task settled,
        // even when the failure cause is already known.
        let mut settled: Vec<Option<Part>> = std::iter::repeat_with(|| None).take(count).collect();
        for (index, handle) in handles {
            match handle.await {
                Ok(part) => {
                    let index = part.index;
                    settled[index] = Some(part);
                }
                Err(source) => {
                    failure.record(Error::Task { part: index, source });
                    cancel.cancel();
                }
            }
        }

        match failure.take() {
            Some(err) => Err(err),
            None => Ok(settled.into_iter().flatten().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    #[test]
    fn failure_cell_keeps_the_first_error() {
        let cell = FailureCell::default();
        cell.record(Error::Fetch {
            part: 2,
            source: FetchError::Cancelled,
        });
        cell.record(Error::Fetch {
            part: 0,
            source: FetchError::Cancelled,
        });

        match cell.take() {
            Some(Error::Fetch { part: 2, .. }) => {}
            other => panic!("unexpected cause: {other:?}"),
        }
        assert!(cell.take().is_none());
    }
}
