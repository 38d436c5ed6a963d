//! Chart calculation routes.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::json::AppJson;
use crate::models::calculation::{CalculateRequest, DirectRequest};
use crate::models::chart::ParsedChart;
use crate::services::calculation;
use crate::AppState;

/// POST /api/calculate — chart from year, month, day, hour and optional flags.
pub async fn calculate(
    State(state): State<AppState>,
    AppJson(body): AppJson<CalculateRequest>,
) -> Result<Json<ApiResponse<ParsedChart>>, AppError> {
    let moment = calculation::validate_components(&body)?;
    let args = calculation::component_args(&moment);
    let chart = calculation::calculate(&state.engine, state.parser.as_ref(), &args).await?;
    Ok(ApiResponse::success(chart))
}

/// POST /api/calculate_direct — chart from four literal pillars.
pub async fn calculate_direct(
    State(state): State<AppState>,
    AppJson(body): AppJson<DirectRequest>,
) -> Result<Json<ApiResponse<ParsedChart>>, AppError> {
    let pillars = calculation::validate_pillars(&body)?;
    let args = calculation::pillar_args(&pillars);
    let chart = calculation::calculate(&state.engine, state.parser.as_ref(), &args).await?;
    Ok(ApiResponse::success(chart))
}
