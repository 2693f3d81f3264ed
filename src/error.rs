//! Error taxonomy for the download pipeline.
//!
//! Every failure a caller can observe maps to one phase: probing the resource
//! size, fetching a part, or merging the parts. Fetch and merge errors carry
//! the index of the part they are attributable to.

use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error returned by [`crate::Downloader::download`].
///
/// A job produces exactly one of these: the first failure wins and every
/// later failure is discarded.
#[derive(Debug, Error)]
pub enum Error {
    /// The total resource size could not be determined, so no parts were
    /// created.
    #[error("failed to determine resource size")]
    SizeProbe(#[from] SizeProbeError),

    /// A part failed to download. `part` is the index of the first part to
    /// fail.
    #[error("part {part} failed to download")]
    Fetch {
        part: usize,
        #[source]
        source: FetchError,
    },

    /// A part file could not be merged into the destination file.
    #[error("part {part} failed to merge")]
    Merge {
        part: usize,
        #[source]
        source: MergeError,
    },

    /// The destination file could not be created or flushed.
    #[error("failed to write destination file {path}")]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A fetch task panicked or was aborted by the runtime before settling.
    #[error("fetch task for part {part} did not complete")]
    Task {
        part: usize,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Failure of the metadata-only size probe.
#[derive(Debug, Error)]
pub enum SizeProbeError {
    /// The HEAD request itself failed.
    #[error("size request failed")]
    Network(#[source] reqwest::Error),

    /// The Content-Length header is missing or not a valid non-negative
    /// integer.
    #[error("Content-Length header missing or invalid")]
    Unavailable,
}

/// Failure of a single ranged part transfer.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Sending the ranged GET failed at the transport level.
    #[error("request failed")]
    Request(#[source] reqwest::Error),

    /// The server answered with something other than 206 Partial Content.
    /// A 200 here means the server ignored the range and returned the whole
    /// resource; that is never accepted.
    #[error("unexpected status code: {0}")]
    UnexpectedStatus(StatusCode),

    /// The part file could not be created or written.
    #[error("part file error")]
    File(#[source] io::Error),

    /// The response body stream was interrupted mid-transfer.
    #[error("body stream interrupted")]
    Copy(#[source] reqwest::Error),

    /// The shared abort signal was observed before the transfer finished.
    /// Raised only after a peer's failure has already fixed the job's error
    /// cause, so it never surfaces as the cause itself.
    #[error("aborted by a failing peer")]
    Cancelled,
}

/// Failure while concatenating part files into the destination.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The part file could not be opened.
    #[error("failed to open part file")]
    Open(#[source] io::Error),

    /// Copying the part file into the destination failed.
    #[error("failed to copy part file into destination")]
    Copy(#[source] io::Error),

    /// The part file could not be deleted after being merged.
    #[error("failed to delete part file")]
    Delete(#[source] io::Error),
}
