//! HTTP handlers for the atlas API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use incentive_engine::model::{
    IncentiveMatches, JurisdictionView, JurisdictionViewOutcome, RegulationView, WaterType,
    WaterTypeFilter,
};
use jurisdiction_core::JurisdictionId;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
pub struct WaterTypeQuery {
    pub water_type: Option<String>,
}

/// Aggregated view for a state page
pub async fn state_page(
    State(state): State<Arc<AppState>>,
    Path(state_slug): Path<String>,
) -> Result<Json<JurisdictionView>, ApiError> {
    view(&state, &state_slug, None, None).await
}

/// Aggregated view for a county page
pub async fn county_page(
    State(state): State<Arc<AppState>>,
    Path((state_slug, county_slug)): Path<(String, String)>,
) -> Result<Json<JurisdictionView>, ApiError> {
    view(&state, &state_slug, Some(&county_slug), None).await
}

/// Aggregated view for a city page
pub async fn city_page(
    State(state): State<Arc<AppState>>,
    Path((state_slug, county_slug, city_slug)): Path<(String, String, String)>,
) -> Result<Json<JurisdictionView>, ApiError> {
    view(&state, &state_slug, Some(&county_slug), Some(&city_slug)).await
}

async fn view(
    state: &AppState,
    state_slug: &str,
    county_slug: Option<&str>,
    city_slug: Option<&str>,
) -> Result<Json<JurisdictionView>, ApiError> {
    match state
        .engine
        .jurisdiction_view(state_slug, county_slug, city_slug)
        .await?
    {
        JurisdictionViewOutcome::Found(view) => Ok(Json(*view)),
        JurisdictionViewOutcome::NotFound => Err(ApiError::NotFound),
    }
}

/// Active incentive programs covering a jurisdiction
pub async fn incentives(
    State(state): State<Arc<AppState>>,
    Path(jurisdiction_id): Path<String>,
    Query(query): Query<WaterTypeQuery>,
) -> Result<Json<IncentiveMatches>, ApiError> {
    let water_type = match query.water_type.as_deref() {
        None => None,
        Some(raw) => Some(WaterType::parse(raw).ok_or_else(|| {
            ApiError::InvalidRequest(format!("unknown water type: {raw}"))
        })?),
    };

    let id = JurisdictionId::from_raw(jurisdiction_id);
    let matches = state.engine.match_incentives(&id, water_type).await?;
    Ok(Json(matches))
}

/// Regulation view for a jurisdiction, defaulting to all water types
pub async fn regulations(
    State(state): State<Arc<AppState>>,
    Path(jurisdiction_id): Path<String>,
    Query(query): Query<WaterTypeQuery>,
) -> Result<Json<RegulationView>, ApiError> {
    let filter = match query.water_type.as_deref() {
        None => WaterTypeFilter::All,
        Some(raw) => WaterTypeFilter::parse(raw).ok_or_else(|| {
            ApiError::InvalidRequest(format!("unknown water type: {raw}"))
        })?,
    };

    let id = JurisdictionId::from_raw(jurisdiction_id);
    let view = state.engine.aggregate_regulations(&id, filter).await?;
    Ok(Json(view))
}
