//! One-shot workflow endpoint: recognized text in, subject plans out

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

use atp_common::api::{PlanRequest, PlanResponse};
use atp_common::{parse_recognized, plan};

use super::ApiError;
use crate::AppState;

/// POST /plan
///
/// Runs extract → reconstruct → plan for one request. Any failure carries
/// the submitted text back.
pub async fn plan_from_text(
    State(state): State<AppState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
    let Json(PlanRequest {
        recognized,
        snapshot,
    }) = payload?;

    let result = parse_recognized(&recognized, &state.parser, state.low_confidence_threshold)
        .and_then(|reconstruction| {
            let snapshot = snapshot.snapshot(state.default_target_percent);
            let plans = plan(&snapshot, &reconstruction.timetable)?;
            Ok((reconstruction, plans))
        });

    match result {
        Ok((reconstruction, plans)) => {
            info!(
                "Planned {} subject(s) with {} warning(s)",
                plans.len(),
                reconstruction.warnings.len()
            );
            Ok(Json(PlanResponse::new(reconstruction, plans, recognized.text)))
        }
        Err(e) => Err(ApiError::with_raw_text(e, recognized.text)),
    }
}
