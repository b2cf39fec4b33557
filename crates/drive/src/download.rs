//! Chunked download session
//!
//! Fetches a file's binary content in bounded `Range` requests, writing
//! each chunk to a freshly created local sink. The session owns the sink;
//! dropping it closes the file on every exit path, including a caller
//! that abandons the loop after a failed step.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;

use dc_core::{ChunkStatus, DownloadSession, Error, NodeId, Result};

use crate::auth::Authenticator;
use crate::client::{API_BASE, check_status, map_transport_error};

pub(crate) struct ChunkedDownload {
    http: reqwest::Client,
    auth: std::sync::Arc<Authenticator>,
    url: String,
    sink: tokio::fs::File,
    total: u64,
    received: u64,
    chunk_size: u64,
}

impl ChunkedDownload {
    pub(crate) async fn open(
        http: reqwest::Client,
        auth: std::sync::Arc<Authenticator>,
        id: &NodeId,
        dest: &Path,
        total: u64,
        chunk_size: u64,
    ) -> Result<Self> {
        let sink = tokio::fs::File::create(dest).await?;

        tracing::debug!(id = %id, total, "opened download");

        Ok(Self {
            http,
            auth,
            url: format!("{API_BASE}/files/{}", id.as_str()),
            sink,
            total,
            received: 0,
            chunk_size,
        })
    }

    async fn fetch_range(&self, start: u64, end: u64) -> Result<Bytes> {
        let token = self.auth.bearer().await?;
        let response = self
            .http
            .get(&self.url)
            .bearer_auth(token)
            .query(&[("alt", "media")])
            .header(reqwest::header::RANGE, format!("bytes={start}-{end}"))
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        response.bytes().await.map_err(map_transport_error)
    }
}

#[async_trait]
impl DownloadSession for ChunkedDownload {
    async fn step(&mut self) -> Result<ChunkStatus> {
        // An empty file has nothing to fetch; the created sink is the
        // complete result.
        if self.total == 0 {
            self.sink.flush().await?;
            return Ok(ChunkStatus::finished());
        }

        let end = (self.received + self.chunk_size).min(self.total) - 1;
        let chunk = self.fetch_range(self.received, end).await?;

        if chunk.is_empty() {
            return Err(Error::Network(format!(
                "service returned an empty range at offset {}",
                self.received
            )));
        }

        self.sink.write_all(&chunk).await?;
        self.received += chunk.len() as u64;

        if self.received >= self.total {
            self.sink.flush().await?;
            return Ok(ChunkStatus::finished());
        }

        Ok(ChunkStatus::in_progress(
            self.received as f64 / self.total as f64,
        ))
    }
}
