//! Attendance calculation endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

use atp_common::api::{CalculateRequest, CalculateResponse};
use atp_common::plan;

use super::ApiError;
use crate::AppState;

/// POST /calculate
///
/// Plans every subject of a client-supplied timetable. `targetPercent`
/// falls back to the configured default when omitted.
pub async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let Json(request) = payload?;

    let snapshot = request.snapshot.snapshot(state.default_target_percent);
    let timetable = request.timetable();
    let plans = plan(&snapshot, &timetable)?;

    info!(
        "Calculated {} subject plan(s) over {} weekly sessions for target {}%",
        plans.len(),
        timetable.total_weekly_sessions(),
        snapshot.target_percent
    );

    Ok(Json(CalculateResponse::new(plans)))
}
