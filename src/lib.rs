//! Parallel ranged downloads.
//!
//! `pdl` downloads a remote resource faster than one sequential transfer by
//! splitting it into fixed-size byte ranges, fetching the ranges concurrently
//! with HTTP `Range` requests, and concatenating the resulting part files
//! into the destination in index order.
//!
//! ```no_run
//! use pdl::Downloader;
//!
//! # async fn example() -> pdl::Result<()> {
//! let downloader = Downloader::new(reqwest::Client::new());
//! downloader.download("https://example.com/big.iso", "big.iso").await?;
//! # Ok(())
//! # }
//! ```
//!
//! The job fails fast: the first part to fail fixes the error cause, every
//! other in-flight part is signalled to abort, and the caller gets exactly
//! one error naming the failing phase and part. Already-downloaded part
//! files are left on disk for manual cleanup; nothing is retried.

mod downloader;
mod error;
mod merge;
mod part;
mod partition;
mod probe;

pub use downloader::Downloader;
pub use error::{Error, FetchError, MergeError, Result, SizeProbeError};
pub use partition::DEFAULT_PART_SIZE;
