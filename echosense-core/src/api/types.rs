//! Response payloads returned by the analytics backend
//!
//! Fields the backend may omit or null out are `Option` or `#[serde(default)]`
//! so that additive server changes keep decoding.

use serde::{Deserialize, Serialize};

/// Processing state of an uploaded call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Uploaded,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CallStatus::Uploaded => "uploaded",
            CallStatus::Processing => "processing",
            CallStatus::Completed => "completed",
            CallStatus::Failed => "failed",
            CallStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Response from POST /api/upload/audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub call_id: String,
    pub filename: String,
    #[serde(default)]
    pub duration: Option<f64>,
    pub status: CallStatus,
    #[serde(default)]
    pub message: String,
}

/// One entry of a bulk upload result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUploadItem {
    pub filename: String,
    pub success: bool,
    #[serde(default)]
    pub data: Option<UploadResponse>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from POST /api/upload/bulk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUploadResponse {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    #[serde(default)]
    pub results: Vec<BulkUploadItem>,
}

/// Response from GET /api/processing/status/{call_id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStatus {
    pub call_id: String,
    pub filename: String,
    pub status: CallStatus,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A diarized, sentiment-tagged slice of a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub speaker: String,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
}

/// Response from GET /api/processing/transcript/{call_id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub call_id: String,
    pub filename: String,
    #[serde(default)]
    pub duration: Option<f64>,
    pub status: CallStatus,
    #[serde(default)]
    pub transcript: Vec<TranscriptSegment>,
}

/// Response from GET /api/processing/quality/{call_id}
///
/// Scores are on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub call_id: String,
    pub overall_score: f64,
    pub politeness_score: f64,
    pub clarity_score: f64,
    pub empathy_score: f64,
    pub resolution_score: f64,
    #[serde(default)]
    pub script_adherence_score: Option<f64>,
    #[serde(default)]
    pub avg_sentiment: Option<f64>,
    #[serde(default)]
    pub silence_duration: Option<f64>,
    #[serde(default)]
    pub overlap_duration: Option<f64>,
}

/// A compliance violation or notable event inside a call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceFlag {
    #[serde(rename = "type")]
    pub flag_type: String,
    pub description: String,
    /// low, medium, high or critical
    pub severity: String,
    /// Offset into the call in seconds
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Response from GET /api/processing/compliance/{call_id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub call_id: String,
    pub total_flags: u32,
    #[serde(default)]
    pub flags: Vec<ComplianceFlag>,
}

/// Call metadata embedded in a full report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallInfo {
    pub call_id: String,
    pub filename: String,
    #[serde(default)]
    pub duration: Option<f64>,
    pub status: CallStatus,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
}

/// Quality scores embedded in a full report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportQualityScores {
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub politeness_score: Option<f64>,
    #[serde(default)]
    pub clarity_score: Option<f64>,
    #[serde(default)]
    pub empathy_score: Option<f64>,
    #[serde(default)]
    pub resolution_score: Option<f64>,
    #[serde(default)]
    pub script_adherence_score: Option<f64>,
    #[serde(default)]
    pub avg_sentiment: Option<f64>,
}

/// Response from GET /api/processing/full-report/{call_id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    pub call_info: CallInfo,
    #[serde(default)]
    pub transcript: Vec<TranscriptSegment>,
    /// Absent until the call has been scored
    #[serde(default)]
    pub quality_scores: Option<ReportQualityScores>,
    #[serde(default)]
    pub compliance_flags: Vec<ComplianceFlag>,
}

/// Response from GET /api/analytics/dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub period_days: u32,
    pub total_calls: u64,
    pub processed_calls: u64,
    /// Percentage of uploaded calls that completed processing
    pub processing_rate: f64,
    #[serde(default)]
    pub avg_quality_score: Option<f64>,
    pub total_compliance_flags: u64,
    pub high_severity_flags: u64,
    #[serde(default)]
    pub avg_processing_time_seconds: Option<f64>,
}

/// One row of the recent calls listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCall {
    pub call_id: String,
    pub filename: String,
    #[serde(default)]
    pub duration: Option<f64>,
    pub status: CallStatus,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub overall_score: Option<f64>,
}

/// Response from GET /api/analytics/recent-calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentCalls {
    #[serde(default)]
    pub calls: Vec<RecentCall>,
}

/// Daily quality average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityTrendPoint {
    pub date: String,
    pub avg_score: f64,
    pub call_count: u64,
}

/// Response from GET /api/analytics/quality-trends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityTrends {
    #[serde(default)]
    pub trends: Vec<QualityTrendPoint>,
}

/// Flag count grouped by type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagTypeCount {
    #[serde(rename = "type")]
    pub flag_type: String,
    pub count: u64,
}

/// Flag count grouped by severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagSeverityCount {
    pub severity: String,
    pub count: u64,
}

/// Response from GET /api/analytics/compliance-summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    #[serde(default)]
    pub by_type: Vec<FlagTypeCount>,
    #[serde(default)]
    pub by_severity: Vec<FlagSeverityCount>,
}

/// Aggregate agent performance over the analysis window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallPerformance {
    pub average_score: f64,
    /// Letter grade, "N/A" when nothing was analyzed
    pub grade: String,
    #[serde(default)]
    pub politeness: Option<f64>,
    #[serde(default)]
    pub clarity: Option<f64>,
    #[serde(default)]
    pub empathy: Option<f64>,
    #[serde(default)]
    pub resolution: Option<f64>,
}

/// Response from GET /api/training/recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecommendations {
    pub total_calls_analyzed: u64,
    pub analysis_period_days: u32,
    pub overall_performance: OverallPerformance,
    #[serde(default)]
    pub compliance_flags: Option<u64>,
    /// Free-form recommendation records, ordered high priority first
    #[serde(default)]
    pub training_recommendations: Vec<serde_json::Value>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

/// Response from DELETE /api/calls/{call_id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub call_id: String,
}

/// Response from GET /health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Response from GET /
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_status_is_tolerated() {
        let status: CallStatus = serde_json::from_value(json!("archived")).unwrap();
        assert_eq!(status, CallStatus::Unknown);

        let status: CallStatus = serde_json::from_value(json!("completed")).unwrap();
        assert_eq!(status, CallStatus::Completed);
        assert_eq!(status.to_string(), "completed");
    }

    #[test]
    fn test_full_report_without_scores() {
        let report: FullReport = serde_json::from_value(json!({
            "call_info": {
                "call_id": "c1",
                "filename": "call.wav",
                "duration": 12.5,
                "status": "processing",
                "uploaded_at": "2025-01-10T09:00:00",
                "processed_at": null
            },
            "transcript": [],
            "quality_scores": null,
            "compliance_flags": []
        }))
        .unwrap();

        assert_eq!(report.call_info.status, CallStatus::Processing);
        assert!(report.quality_scores.is_none());
        assert!(report.call_info.processed_at.is_none());
    }

    #[test]
    fn test_compliance_flag_type_rename() {
        let flag: ComplianceFlag = serde_json::from_value(json!({
            "type": "missed_script",
            "description": "Greeting skipped",
            "severity": "medium",
            "timestamp": 3.2
        }))
        .unwrap();
        assert_eq!(flag.flag_type, "missed_script");

        let back = serde_json::to_value(&flag).unwrap();
        assert_eq!(back["type"], "missed_script");
    }

    #[test]
    fn test_empty_training_recommendations() {
        let recs: TrainingRecommendations = serde_json::from_value(json!({
            "total_calls_analyzed": 0,
            "analysis_period_days": 30,
            "overall_performance": { "average_score": 0, "grade": "N/A" },
            "training_recommendations": [],
            "focus_areas": []
        }))
        .unwrap();
        assert_eq!(recs.overall_performance.grade, "N/A");
        assert!(recs.compliance_flags.is_none());
    }
}
