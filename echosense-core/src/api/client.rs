//! HTTP client for the Echosense analytics backend
//!
//! Every operation issues exactly one request. Failures of any kind are
//! logged with the endpoint and returned as [`Error::Request`]; nothing is
//! retried.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::{Error, Result};

use super::transport::{
    ApiRequest, ApiResponse, AudioFile, FilePart, HttpTransport, Method, RequestBody, Transport,
};
use super::types::{
    BulkUploadResponse, ComplianceReport, ComplianceSummary, DashboardStats, DeleteResult,
    FullReport, HealthStatus, ProcessingStatus, QualityScore, QualityTrends, RecentCalls,
    ServiceInfo, TrainingRecommendations, Transcript, UploadResponse,
};

pub const DEFAULT_DASHBOARD_DAYS: u32 = 7;
pub const DEFAULT_RECENT_CALLS_LIMIT: u32 = 10;
pub const DEFAULT_TREND_DAYS: u32 = 30;
pub const DEFAULT_COMPLIANCE_DAYS: u32 = 7;
pub const DEFAULT_TRAINING_DAYS: u32 = 30;

const UPLOAD_AUDIO_PATH: &str = "/api/upload/audio";
const UPLOAD_BULK_PATH: &str = "/api/upload/bulk";

/// Options for the generic JSON request path
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    /// Sent after the default `Content-Type`, so a same-named entry overrides it
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }
}

/// Error body convention of the backend
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Client for the analytics backend REST API
///
/// Cheap to clone; clones share the underlying transport. Construct one and
/// pass it to whatever needs it.
#[derive(Clone)]
pub struct AnalyticsClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for AnalyticsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AnalyticsClient {
    /// Create a client talking HTTP to `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let transport = HttpTransport::new(None)?;
        Ok(Self::with_transport(base_url, Arc::new(transport)))
    }

    /// Create a client for the default local backend
    pub fn localhost() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Create a client from configuration
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(Some(Duration::from_secs(config.timeout_secs)))?;
        Ok(Self::with_transport(config.base_url.trim(), Arc::new(transport)))
    }

    /// Create a client with a caller-supplied transport
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a JSON request to `endpoint` and decode the JSON response
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        headers.extend(options.headers);

        let request = ApiRequest {
            method: options.method,
            url: self.url(endpoint),
            headers,
            body: options.body.map_or(RequestBody::Empty, RequestBody::Json),
        };

        self.execute(endpoint, request).await
    }

    /// Upload a single recording for processing
    pub async fn upload_audio(&self, file: AudioFile) -> Result<UploadResponse> {
        let request = ApiRequest {
            method: Method::Post,
            url: self.url(UPLOAD_AUDIO_PATH),
            headers: Vec::new(),
            body: RequestBody::Multipart(vec![FilePart {
                field: "file".to_string(),
                file,
            }]),
        };

        self.execute(UPLOAD_AUDIO_PATH, request).await
    }

    /// Upload several recordings in one request
    ///
    /// Per-file failures are reported inside the response, not as an error.
    pub async fn upload_bulk(&self, files: Vec<AudioFile>) -> Result<BulkUploadResponse> {
        let parts = files
            .into_iter()
            .map(|file| FilePart {
                field: "files".to_string(),
                file,
            })
            .collect();

        let request = ApiRequest {
            method: Method::Post,
            url: self.url(UPLOAD_BULK_PATH),
            headers: Vec::new(),
            body: RequestBody::Multipart(parts),
        };

        self.execute(UPLOAD_BULK_PATH, request).await
    }

    pub async fn get_processing_status(&self, call_id: &str) -> Result<ProcessingStatus> {
        self.get(&call_path("/api/processing/status", call_id)).await
    }

    pub async fn get_transcript(&self, call_id: &str) -> Result<Transcript> {
        self.get(&call_path("/api/processing/transcript", call_id))
            .await
    }

    pub async fn get_quality_score(&self, call_id: &str) -> Result<QualityScore> {
        self.get(&call_path("/api/processing/quality", call_id)).await
    }

    pub async fn get_compliance_flags(&self, call_id: &str) -> Result<ComplianceReport> {
        self.get(&call_path("/api/processing/compliance", call_id))
            .await
    }

    pub async fn get_full_report(&self, call_id: &str) -> Result<FullReport> {
        self.get(&call_path("/api/processing/full-report", call_id))
            .await
    }

    /// Aggregate stats over the trailing `days` window (default 7)
    pub async fn get_dashboard_stats(&self, days: Option<u32>) -> Result<DashboardStats> {
        let days = days.unwrap_or(DEFAULT_DASHBOARD_DAYS);
        self.get(&format!("/api/analytics/dashboard?days={}", days))
            .await
    }

    /// Most recently uploaded calls (default limit 10)
    pub async fn get_recent_calls(&self, limit: Option<u32>) -> Result<RecentCalls> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_CALLS_LIMIT);
        self.get(&format!("/api/analytics/recent-calls?limit={}", limit))
            .await
    }

    /// Daily quality averages (default 30 days)
    pub async fn get_quality_trends(&self, days: Option<u32>) -> Result<QualityTrends> {
        let days = days.unwrap_or(DEFAULT_TREND_DAYS);
        self.get(&format!("/api/analytics/quality-trends?days={}", days))
            .await
    }

    /// Compliance flags grouped by type and severity (default 7 days)
    pub async fn get_compliance_summary(&self, days: Option<u32>) -> Result<ComplianceSummary> {
        let days = days.unwrap_or(DEFAULT_COMPLIANCE_DAYS);
        self.get(&format!("/api/analytics/compliance-summary?days={}", days))
            .await
    }

    /// Coaching recommendations derived from recent scores (default 30 days)
    pub async fn get_training_recommendations(
        &self,
        days: Option<u32>,
    ) -> Result<TrainingRecommendations> {
        let days = days.unwrap_or(DEFAULT_TRAINING_DAYS);
        self.get(&format!("/api/training/recommendations?days={}", days))
            .await
    }

    /// Delete a call together with its transcript, scores and flags
    pub async fn delete_call(&self, call_id: &str) -> Result<DeleteResult> {
        self.request(
            &call_path("/api/calls", call_id),
            RequestOptions::method(Method::Delete),
        )
        .await
    }

    pub async fn health_check(&self) -> Result<HealthStatus> {
        self.get("/health").await
    }

    pub async fn service_info(&self) -> Result<ServiceInfo> {
        self.get("/").await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.request(endpoint, RequestOptions::default()).await
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn execute<T: DeserializeOwned>(&self, endpoint: &str, request: ApiRequest) -> Result<T> {
        let method = request.method;
        tracing::debug!(%method, endpoint = %endpoint, "sending API request");

        let result = match self.transport.send(request).await {
            Ok(response) => decode_response(response),
            Err(e) => Err(Error::Request(e.to_string())),
        };

        if let Err(e) = &result {
            tracing::error!(%method, endpoint = %endpoint, error = %e, "API request failed");
        }
        result
    }
}

/// Path for a call-scoped endpoint, with the id percent-encoded
fn call_path(prefix: &str, call_id: &str) -> String {
    format!("{}/{}", prefix, urlencoding::encode(call_id))
}

/// Turn a raw response into the decoded body or a request error
fn decode_response<T: DeserializeOwned>(response: ApiResponse) -> Result<T> {
    if !response.is_success() {
        return Err(Error::Request(error_message(&response)));
    }

    serde_json::from_slice(&response.body)
        .map_err(|e| Error::Request(format!("failed to parse response: {}", e)))
}

/// Message for a non-success response: `detail` if usable, else `HTTP <status>`
///
/// A falsy `detail` (null, false, 0, empty string) counts as absent.
fn error_message(response: &ApiResponse) -> String {
    let detail = serde_json::from_slice::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.detail)
        .filter(|detail| !is_falsy(detail));

    match detail {
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => format!("HTTP {}", response.status),
    }
}

fn is_falsy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Bool(b) => !b,
        serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => false,
    }
}
