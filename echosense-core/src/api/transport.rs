//! Transport seam between [`AnalyticsClient`](super::AnalyticsClient) and the network
//!
//! The client builds plain [`ApiRequest`] values and hands them to a
//! [`Transport`]. Production code uses [`HttpTransport`]; tests can plug in
//! an in-memory fake.

use std::io;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};

use crate::error::{Error, Result};

/// HTTP method used by the backend API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An audio recording ready to be sent as a multipart part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AudioFile {
    /// Wrap in-memory bytes, inferring the MIME type from the file name
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = mime_for_filename(&filename).to_string();
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    /// Read a recording from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not a file path: {}", path.display()),
                ))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(filename, bytes))
    }
}

/// MIME type for the audio formats the backend accepts
pub fn mime_for_filename(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

/// A named file part of a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file: AudioFile,
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Sent without an explicit content type so the boundary is generated
    Multipart(Vec<FilePart>),
}

/// A fully resolved request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// Applied in order; a later header replaces an earlier one with the same name
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

/// Raw response as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure to obtain any response at all
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends [`ApiRequest`]s and returns whatever the server answered
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest)
        -> std::result::Result<ApiResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { http_client })
    }

    fn build(
        &self,
        request: ApiRequest,
    ) -> std::result::Result<reqwest::RequestBuilder, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut headers = reqwest::header::HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError(format!("invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError(format!("invalid header value {:?}: {}", value, e)))?;
            headers.insert(name, value);
        }

        let mut builder = self.http_client.request(method, &request.url);

        match request.body {
            RequestBody::Empty => {}
            RequestBody::Json(value) => {
                // caller headers applied below still win over the content type set here
                builder = builder.json(&value);
            }
            RequestBody::Multipart(parts) => {
                // reqwest sets the multipart content type with its boundary
                headers.remove(CONTENT_TYPE);
                let mut form = Form::new();
                for part in parts {
                    let FilePart { field, file } = part;
                    let body = Part::bytes(file.bytes)
                        .file_name(file.filename)
                        .mime_str(&file.content_type)
                        .map_err(|e| TransportError(format!("invalid content type: {}", e)))?;
                    form = form.part(field, body);
                }
                builder = builder.multipart(form);
            }
        }

        Ok(builder.headers(headers))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: ApiRequest,
    ) -> std::result::Result<ApiResponse, TransportError> {
        let builder = self.build(request)?;

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(format!("HTTP request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(format!("failed to read response body: {}", e)))?;

        Ok(ApiResponse {
            status,
            body: body.to_vec(),
        })
    }
}
