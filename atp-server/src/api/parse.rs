//! Timetable parsing endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

use atp_common::api::ParseTableResponse;
use atp_common::{parse_recognized, RecognizedText};

use super::ApiError;
use crate::AppState;

/// POST /parse_table
///
/// Parses recognized text into a weekly timetable. The submitted text is
/// echoed back on success and failure alike so the UI can offer it for
/// manual correction.
pub async fn parse_table(
    State(state): State<AppState>,
    payload: Result<Json<RecognizedText>, JsonRejection>,
) -> Result<Json<ParseTableResponse>, ApiError> {
    let Json(input) = payload?;

    let reconstruction =
        parse_recognized(&input, &state.parser, state.low_confidence_threshold)
            .map_err(|e| ApiError::with_raw_text(e, input.text.clone()))?;

    info!(
        "Parsed timetable: {} subjects, {} weekly sessions, {} warning(s)",
        reconstruction.timetable.len(),
        reconstruction.timetable.total_weekly_sessions(),
        reconstruction.warnings.len()
    );

    Ok(Json(ParseTableResponse::new(reconstruction, input.text)))
}
