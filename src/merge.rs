//! Index-ordered concatenation of part files into the destination file.

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::downloader::DownloadJob;
use crate::error::{Error, MergeError};

/// Concatenate every part file into the destination, strictly in ascending
/// index order, deleting each part file once it has been copied.
///
/// On the first failure this returns immediately: unprocessed part files keep
/// their files on disk and the destination is left partially written.
pub(crate) async fn merge(job: &DownloadJob) -> Result<(), Error> {
    let mut dest = File::create(&job.dest).await.map_err(|source| Error::Destination {
        path: job.dest.clone(),
        source,
    })?;

    for part in &job.parts {
        let mut file = File::open(&part.path).await.map_err(|source| Error::Merge {
            part: part.index,
            source: MergeError::Open(source),
        })?;

        tokio::io::copy(&mut file, &mut dest)
            .await
            .map_err(|source| Error::Merge {
                part: part.index,
                source: MergeError::Copy(source),
            })?;

        fs::remove_file(&part.path)
            .await
            .map_err(|source| Error::Merge {
                part: part.index,
                source: MergeError::Delete(source),
            })?;

        debug!(part = part.index, "part merged and removed");
    }

    dest.flush().await.map_err(|source| Error::Destination {
        path: job.dest.clone(),
        source,
    })?;

    Ok(())
}
