//! Drive v3 REST client
//!
//! Implements the `DriveStore` trait from dc-core over the Drive HTTP
//! API. All wire responses are validated into the core's typed result
//! structs here; resolver and transfer engine never see raw JSON. Service
//! failures are classified at this boundary into transient vs permanent.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use dc_core::{
    DownloadSession, DriveStore, Error, LookupResult, NodeId, PageCursor, PageResult, Profile,
    Result, UploadSession,
};

use crate::auth::{Authenticator, ServiceAccountKey};
use crate::download::ChunkedDownload;
use crate::upload::ResumableUpload;

pub(crate) const API_BASE: &str = "https://www.googleapis.com/drive/v3";
pub(crate) const UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Authorized handle to one user's Drive hierarchy.
///
/// Reentrant-safe for sequential reuse across facade calls; callers must
/// serialize concurrent access themselves.
pub struct DriveClient {
    http: reqwest::Client,
    auth: std::sync::Arc<Authenticator>,
    chunk_size: u64,
}

/// Wire shape of a file list response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
    next_page_token: Option<String>,
}

/// Wire shape of a single file resource, restricted by field masks
#[derive(Debug, Deserialize)]
struct FileRef {
    id: Option<String>,
    name: Option<String>,
    size: Option<String>,
}

/// Wire shape of a Drive error body
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl DriveClient {
    /// Authenticate to Drive for the given profile's subject.
    ///
    /// Reads the service-account key file eagerly; the first token is
    /// minted lazily on the first request.
    pub fn connect(profile: &Profile) -> Result<Self> {
        let key = ServiceAccountKey::from_file(&profile.key_file)?;
        // No redirect following: the resumable upload protocol reuses
        // status 308 for "resume incomplete".
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        let auth = Authenticator::new(http.clone(), key, profile.subject.clone())?;

        Ok(Self {
            http,
            auth: std::sync::Arc::new(auth),
            chunk_size: profile.chunk_size,
        })
    }

    pub(crate) async fn bearer(&self) -> Result<String> {
        self.auth.bearer().await
    }

    /// Escape a name literal for the Drive query grammar
    fn escape_query_value(name: &str) -> String {
        name.replace('\\', "\\\\").replace('\'', "\\'")
    }

    /// Fetch one metadata field mask for a file id
    async fn get_file(&self, id: &NodeId, fields: &str) -> Result<FileRef> {
        let token = self.bearer().await?;
        let response = self
            .http
            .get(format!("{API_BASE}/files/{}", id.as_str()))
            .bearer_auth(token)
            .query(&[("fields", fields)])
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| Error::Network(format!("malformed file resource: {e}")))
    }
}

/// Map reqwest transport failures (no HTTP status) onto the error
/// taxonomy: timeouts and refused connections are transient I/O,
/// everything else is a plain network failure.
pub(crate) fn map_transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, e))
    } else if e.is_connect() {
        Error::Io(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e))
    } else {
        Error::Network(e.to_string())
    }
}

/// Turn a non-success response into the classified error for its status
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = status.as_u16();
    let message = match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => envelope.error.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unrecognized failure")
            .to_string(),
    };

    Err(Error::from_status(code, message))
}

#[async_trait]
impl DriveStore for DriveClient {
    async fn find_child_by_name(
        &self,
        parent: &NodeId,
        name: &str,
        max_results: u32,
    ) -> Result<LookupResult> {
        let query = format!(
            "'{}' in parents and name = '{}'",
            parent.as_str(),
            Self::escape_query_value(name),
        );

        let page_size = max_results.to_string();
        let token = self.bearer().await?;
        let response = self
            .http
            .get(format!("{API_BASE}/files"))
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("pageSize", page_size.as_str()),
                ("fields", "files(id)"),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        let list: FileList = response
            .json()
            .await
            .map_err(|e| Error::Network(format!("malformed lookup response: {e}")))?;

        let ids = list
            .files
            .into_iter()
            .map(|f| {
                f.id.map(NodeId::new)
                    .ok_or_else(|| Error::Network("lookup entry without id".into()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(LookupResult { ids })
    }

    async fn create_node(&self, parent: &NodeId, name: &str, folder: bool) -> Result<NodeId> {
        let mut metadata = serde_json::json!({
            "name": name,
            "parents": [parent.as_str()],
        });
        if folder {
            metadata["mimeType"] = serde_json::Value::from(FOLDER_MIME_TYPE);
        }

        let token = self.bearer().await?;
        let response = self
            .http
            .post(format!("{API_BASE}/files"))
            .bearer_auth(token)
            .query(&[("fields", "id")])
            .json(&metadata)
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        let created: FileRef = response
            .json()
            .await
            .map_err(|e| Error::Network(format!("malformed create response: {e}")))?;

        created
            .id
            .map(NodeId::new)
            .ok_or_else(|| Error::Network("create response without id".into()))
    }

    async fn delete_node(&self, id: &NodeId) -> Result<()> {
        let token = self.bearer().await?;
        let response = self
            .http
            .delete(format!("{API_BASE}/files/{}", id.as_str()))
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;

        check_status(response).await?;
        Ok(())
    }

    async fn open_upload(
        &self,
        parent: &NodeId,
        name: &str,
        source: &Path,
    ) -> Result<Box<dyn UploadSession>> {
        let session = ResumableUpload::open(
            self.http.clone(),
            self.bearer().await?,
            parent,
            name,
            source,
            self.chunk_size,
        )
        .await?;
        Ok(Box::new(session))
    }

    async fn open_download(
        &self,
        id: &NodeId,
        dest: &Path,
    ) -> Result<Box<dyn DownloadSession>> {
        // Folders and document-format files carry no size and have no
        // binary content to fetch.
        let meta = self.get_file(id, "size").await?;
        let total: u64 = match meta.size {
            Some(size) => size
                .parse()
                .map_err(|_| Error::Network(format!("unparseable size '{size}'")))?,
            None => {
                return Err(Error::Service {
                    status: 400,
                    message: format!("'{id}' has no binary content to download"),
                });
            }
        };

        let session = ChunkedDownload::open(
            self.http.clone(),
            std::sync::Arc::clone(&self.auth),
            id,
            dest,
            total,
            self.chunk_size,
        )
        .await?;
        Ok(Box::new(session))
    }

    async fn list_children<'a>(
        &self,
        parent: &NodeId,
        cursor: Option<&'a PageCursor>,
    ) -> Result<PageResult> {
        let query = format!("'{}' in parents", parent.as_str());

        let mut params = vec![
            ("q", query),
            ("fields", "nextPageToken, files(name)".to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("pageToken", cursor.as_str().to_string()));
        }

        let token = self.bearer().await?;
        let response = self
            .http
            .get(format!("{API_BASE}/files"))
            .bearer_auth(token)
            .query(&params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response).await?;
        let list: FileList = response
            .json()
            .await
            .map_err(|e| Error::Network(format!("malformed listing response: {e}")))?;

        let names = list
            .files
            .into_iter()
            .map(|f| {
                f.name
                    .ok_or_else(|| Error::Network("listing entry without name".into()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PageResult {
            names,
            next_cursor: list.next_page_token.map(PageCursor::new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_escaping() {
        assert_eq!(
            DriveClient::escape_query_value("it's a file"),
            "it\\'s a file"
        );
        assert_eq!(
            DriveClient::escape_query_value(r"back\slash"),
            r"back\\slash"
        );
        assert_eq!(DriveClient::escape_query_value("plain"), "plain");
    }

    #[test]
    fn test_error_envelope_parsing() {
        let raw = r#"{"error": {"code": 404, "message": "File not found: xyz"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.error.message, "File not found: xyz");
    }

    #[test]
    fn test_file_list_parsing() {
        let raw = r#"{
            "nextPageToken": "tok-2",
            "files": [{"id": "abc"}, {"id": "def"}]
        }"#;
        let list: FileList = serde_json::from_str(raw).unwrap();
        assert_eq!(list.files.len(), 2);
        assert_eq!(list.next_page_token.as_deref(), Some("tok-2"));
        assert_eq!(list.files[0].id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_list_parsing_final_page() {
        let list: FileList = serde_json::from_str(r#"{"files": []}"#).unwrap();
        assert!(list.files.is_empty());
        assert!(list.next_page_token.is_none());
    }
}
