//! Request/response value objects exchanged with the workflow coordinator
//!
//! Every request is self-contained: form state from the UI arrives as one of
//! these immutable values and leaves as a response value. Nothing is kept
//! between requests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::planner::{AttendanceSnapshot, SubjectPlan};
use crate::reconstruct::Reconstruction;
use crate::recognized::RecognizedText;
use crate::timetable::{Timetable, TimetableEntry};
use crate::warning::Warning;

// ========================================
// Request Types
// ========================================

/// Attendance fields as submitted by the calculator form
///
/// `targetPercent` may be omitted; the coordinator substitutes its configured
/// default.
///
/// # Examples
///
/// ```
/// use atp_common::api::types::SnapshotFields;
///
/// let fields: SnapshotFields = serde_json::from_str(
///     r#"{"overallPercent": 80, "totalLectures": 50, "remainingWeeks": 4}"#,
/// ).unwrap();
/// let snapshot = fields.snapshot(75.0);
/// assert_eq!(snapshot.target_percent, 75.0);
/// assert_eq!(snapshot.total_lectures_held, 50);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFields {
    pub overall_percent: f64,
    #[serde(alias = "totalLectures")]
    pub total_lectures_held: i64,
    #[serde(default)]
    pub target_percent: Option<f64>,
    pub remaining_weeks: i64,
}

impl SnapshotFields {
    pub fn snapshot(&self, default_target_percent: f64) -> AttendanceSnapshot {
        AttendanceSnapshot {
            overall_percent: self.overall_percent,
            total_lectures_held: self.total_lectures_held,
            target_percent: self.target_percent.unwrap_or(default_target_percent),
            remaining_weeks: self.remaining_weeks,
        }
    }
}

/// POST /calculate body: snapshot fields plus a (possibly hand-edited) timetable
#[derive(Debug, Clone, Deserialize)]
pub struct CalculateRequest {
    #[serde(flatten)]
    pub snapshot: SnapshotFields,
    /// Subject → weekly sessions
    pub timetable: BTreeMap<String, u32>,
}

impl CalculateRequest {
    pub fn timetable(&self) -> Timetable {
        Timetable::from_counts(self.timetable.iter().map(|(name, &count)| (name, count)))
    }
}

/// POST /plan body: recognized text and snapshot fields in one request
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    #[serde(flatten)]
    pub recognized: RecognizedText,
    #[serde(flatten)]
    pub snapshot: SnapshotFields,
}

// ========================================
// Response Types
// ========================================

/// Warning with its display message alongside the structured fields
#[derive(Debug, Clone, Serialize)]
pub struct WarningView {
    #[serde(flatten)]
    pub warning: Warning,
    pub message: String,
}

impl From<&Warning> for WarningView {
    fn from(warning: &Warning) -> Self {
        Self {
            warning: warning.clone(),
            message: warning.to_string(),
        }
    }
}

fn warning_views(warnings: &[Warning]) -> Vec<WarningView> {
    warnings.iter().map(WarningView::from).collect()
}

/// Successful parse, echoing the text that was parsed
#[derive(Debug, Clone, Serialize)]
pub struct ParseTableResponse {
    pub timetable: Timetable,
    pub entries: Vec<TimetableEntry>,
    pub warnings: Vec<WarningView>,
    pub raw_text: String,
}

impl ParseTableResponse {
    pub fn new(reconstruction: Reconstruction, raw_text: String) -> Self {
        Self {
            warnings: warning_views(&reconstruction.warnings),
            timetable: reconstruction.timetable,
            entries: reconstruction.entries,
            raw_text,
        }
    }
}

/// One subject's plan with its display message
#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    #[serde(flatten)]
    pub plan: SubjectPlan,
    pub message: String,
}

impl From<SubjectPlan> for PlanResult {
    fn from(plan: SubjectPlan) -> Self {
        let message = plan.message();
        Self { plan, message }
    }
}

/// POST /calculate response
#[derive(Debug, Clone, Serialize)]
pub struct CalculateResponse {
    pub results: Vec<PlanResult>,
}

impl CalculateResponse {
    pub fn new(plans: Vec<SubjectPlan>) -> Self {
        Self {
            results: plans.into_iter().map(PlanResult::from).collect(),
        }
    }
}

/// POST /plan response
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub timetable: Timetable,
    pub warnings: Vec<WarningView>,
    pub results: Vec<PlanResult>,
    pub raw_text: String,
}

impl PlanResponse {
    pub fn new(reconstruction: Reconstruction, plans: Vec<SubjectPlan>, raw_text: String) -> Self {
        Self {
            warnings: warning_views(&reconstruction.warnings),
            timetable: reconstruction.timetable,
            results: plans.into_iter().map(PlanResult::from).collect(),
            raw_text,
        }
    }
}

// ========================================
// Error Response Types
// ========================================

/// JSON error body
///
/// `raw_text` is present whenever the failing request carried text, so the
/// UI can offer it back for manual correction.
///
/// # Examples
///
/// ```
/// use atp_common::api::types::ErrorResponse;
///
/// let error = ErrorResponse::new("no_entries_found", "No timetable entries found")
///     .with_raw_text("Mon | Tue\nLunch | -");
/// assert_eq!(error.raw_text.as_deref(), Some("Mon | Tue\nLunch | -"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error kind identifier
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl ErrorResponse {
    pub fn new(kind: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: kind.into(),
            raw_text: None,
        }
    }

    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = Some(raw_text.into());
        self
    }
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Verdict;

    #[test]
    fn test_calculate_request_deserialization() {
        let json = r#"{
            "overallPercent": 80,
            "totalLecturesHeld": 50,
            "targetPercent": 70.5,
            "remainingWeeks": 4,
            "timetable": {"DAA": 3, "daa": 1, "TE": 2}
        }"#;
        let request: CalculateRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.snapshot.target_percent, Some(70.5));
        let timetable = request.timetable();
        assert_eq!(timetable.weekly_sessions("daa"), Some(4));
        assert_eq!(timetable.weekly_sessions("te"), Some(2));
    }

    #[test]
    fn test_plan_request_flattens_text_and_snapshot() {
        let json = r#"{
            "text": "Mon | Tue\nMath | Phy",
            "confidence": 88.0,
            "overallPercent": 60,
            "totalLectures": 20,
            "remainingWeeks": 2
        }"#;
        let request: PlanRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.recognized.confidence, Some(88.0));
        assert_eq!(request.snapshot.snapshot(75.0).total_lectures_held, 20);
    }

    #[test]
    fn test_plan_result_serialization() {
        let result = PlanResult::from(SubjectPlan {
            subject: "math".to_string(),
            weekly_sessions: 3,
            remaining_sessions: 12,
            verdict: Verdict::CanMiss(3),
            bound: 3,
        });
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["subject"], "math");
        assert_eq!(json["remainingSessions"], 12);
        assert_eq!(json["verdict"]["kind"], "can_miss");
        assert_eq!(json["message"], "You can miss up to 3 of the next 12 lectures.");
    }

    #[test]
    fn test_warning_view_carries_kind_and_message() {
        let json = serde_json::to_value(WarningView::from(&Warning::MissingHeader)).unwrap();
        assert_eq!(json["kind"], "missing_header");
        assert!(json["message"].as_str().unwrap().starts_with("No day header found"));
    }

    #[test]
    fn test_error_response_omits_missing_raw_text() {
        let json = serde_json::to_string(&ErrorResponse::new("empty_input", "Empty input")).unwrap();
        assert!(!json.contains("raw_text"));
    }
}
