//! One byte range of a download job and the ranged transfer that fills it.

use std::path::PathBuf;

use futures::StreamExt;
use reqwest::{header, Client, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::FetchError;

/// Lifecycle of a part. `Failed` on any part triggers the shared abort
/// signal but never reverts peers already in `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PartState {
    Pending,
    InFlight,
    Done,
    Failed,
}

/// One contiguous byte range `[start, end]` of the source resource, written
/// to its own private file. Exactly one fetch task owns a part; no file
/// locking is needed.
#[derive(Debug)]
pub(crate) struct Part {
    pub(crate) index: usize,
    pub(crate) start: u64,
    pub(crate) end: u64,
    pub(crate) path: PathBuf,
    pub(crate) state: PartState,
}

impl Part {
    pub(crate) fn new(index: usize, start: u64, end: u64, path: PathBuf) -> Self {
        Self {
            index,
            start,
            end,
            path,
            state: PartState::Pending,
        }
    }

    /// Perform the ranged GET for this part and stream the body into the
    /// part file, aborting early if `cancel` fires while waiting on I/O.
    pub(crate) async fn fetch(
        &mut self,
        client: &Client,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<(), FetchError> {
        self.state = PartState::InFlight;
        match self.transfer(client, url, cancel).await {
            Ok(()) => {
                self.state = PartState::Done;
                debug!(part = self.index, path = %self.path.display(), "part downloaded");
                Ok(())
            }
            Err(err) => {
                self.state = PartState::Failed;
                Err(err)
            }
        }
    }

    async fn transfer(
        &self,
        client: &Client,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<(), FetchError> {
        let range = format!("bytes={}-{}", self.start, self.end);
        let request = client.get(url).header(header::RANGE, range);

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            result = request.send() => result.map_err(FetchError::Request)?,
        };

        // A 200 means the server ignored the range and is sending the whole
        // resource; accepting it would corrupt the merge.
        let status = response.status();
        if status != StatusCode::PARTIAL_CONTENT {
            return Err(FetchError::UnexpectedStatus(status));
        }

        let mut file = File::create(&self.path).await.map_err(FetchError::File)?;
        let mut stream = response.bytes_stream();

        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                item = stream.next() => match item {
                    Some(chunk) => chunk.map_err(FetchError::Copy)?,
                    None => break,
                },
            };
            file.write_all(&chunk).await.map_err(FetchError::File)?;
        }

        file.flush().await.map_err(FetchError::File)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn new_part_starts_pending() {
        let part = Part::new(3, 300, 399, Path::new("out.bin.part3").to_path_buf());
        assert_eq!(part.state, PartState::Pending);
        assert_eq!(part.index, 3);
    }
}
