//! Resumable upload session
//!
//! Opening the session registers the file's metadata with the upload
//! endpoint and receives a session URI; each step then sends one
//! `Content-Range`-delimited chunk to that URI. The service answers 308
//! while the transfer is incomplete (confirming how many bytes it has
//! durably received) and 200/201 once the final chunk lands.
//!
//! The session tracks only its confirmed offset; every step seeks and
//! reads from that offset, so a failed step leaves the position unchanged
//! and the same chunk is resent on the next call. Resumability tolerates
//! transient mid-transfer failures within this one call; sessions are
//! never persisted across process invocations.

use std::io::SeekFrom;
use std::path::Path;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use dc_core::{ChunkStatus, Error, NodeId, Result, UploadSession};

use crate::client::{UPLOAD_BASE, check_status, map_transport_error};

pub(crate) struct ResumableUpload {
    http: reqwest::Client,
    session_uri: String,
    source: tokio::fs::File,
    total: u64,
    sent: u64,
    chunk_size: u64,
}

impl ResumableUpload {
    /// Register metadata for a new file named `name` under `parent` and
    /// obtain the chunk session URI
    pub(crate) async fn open(
        http: reqwest::Client,
        bearer: String,
        parent: &NodeId,
        name: &str,
        source: &Path,
        chunk_size: u64,
    ) -> Result<Self> {
        let file = tokio::fs::File::open(source).await?;
        let total = file.metadata().await?.len();
        let content_type = mime_guess::from_path(source).first_or_octet_stream();

        let metadata = serde_json::json!({
            "name": name,
            "parents": [parent.as_str()],
        });

        let response = http
            .post(format!("{UPLOAD_BASE}/files"))
            .bearer_auth(bearer)
            .query(&[("uploadType", "resumable"), ("fields", "id")])
            .header("X-Upload-Content-Type", content_type.as_ref())
            .header("X-Upload-Content-Length", total)
            .json(&metadata)
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        let session_uri = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| Error::Network("upload open response without session URI".into()))?
            .to_string();

        tracing::debug!(name, total, "opened resumable upload session");

        Ok(Self {
            http,
            session_uri,
            source: file,
            total,
            sent: 0,
            chunk_size,
        })
    }

    fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.sent as f64 / self.total as f64
        }
    }
}

/// Confirmed byte count from a 308 `Range: bytes=0-<last>` header, if the
/// service reported one
fn confirmed_bytes(response: &reqwest::Response) -> Option<u64> {
    let range = response.headers().get(reqwest::header::RANGE)?.to_str().ok()?;
    let last: u64 = range.strip_prefix("bytes=0-")?.parse().ok()?;
    Some(last + 1)
}

#[async_trait]
impl UploadSession for ResumableUpload {
    async fn step(&mut self) -> Result<ChunkStatus> {
        // Zero-byte sources finalize with a single empty request.
        let request = if self.total == 0 {
            self.http
                .put(&self.session_uri)
                .header(reqwest::header::CONTENT_RANGE, "bytes */0")
        } else {
            let want = (self.total - self.sent).min(self.chunk_size) as usize;
            let mut chunk = vec![0u8; want];
            self.source.seek(SeekFrom::Start(self.sent)).await?;
            self.source.read_exact(&mut chunk).await?;

            let end = self.sent + want as u64 - 1;
            self.http
                .put(&self.session_uri)
                .header(
                    reqwest::header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", self.sent, end, self.total),
                )
                .body(chunk)
        };

        let response = request.send().await.map_err(map_transport_error)?;

        // 308 Resume Incomplete: the session is alive and reports how far
        // it has durably gotten; anything the service did not confirm is
        // resent from the new offset.
        if response.status().as_u16() == 308 {
            self.sent = confirmed_bytes(&response)
                .unwrap_or(self.sent)
                .min(self.total);
            return Ok(ChunkStatus::in_progress(self.fraction()));
        }

        check_status(response).await?;
        self.sent = self.total;
        Ok(ChunkStatus::finished())
    }
}
