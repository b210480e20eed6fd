//! Axum REST API for the campaign dashboard.
//!
//! Every handler returns `Result<Json<_>, IndexerError>`; failures render
//! through `IndexerError`'s `IntoResponse` impl.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db;
use crate::errors::{IndexerError, Result};
use crate::events::{CampaignSummary, EventRecord};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// Build the HTTP router over `state`.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/campaigns/:id/events", get(get_campaign_events))
        .route("/campaigns/:id/summary", get(get_campaign_summary))
        .route("/accounts/:address/events", get(get_account_events))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
pub struct CampaignEventsResponse {
    pub campaign_id: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AccountEventsResponse {
    pub address: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Result<Json<AllEventsResponse>> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(AllEventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /campaigns/:id/events`
pub async fn get_campaign_events(
    State(state): State<Arc<ApiState>>,
    Path(campaign_id): Path<String>,
) -> Result<Json<CampaignEventsResponse>> {
    let events = db::get_events_for_campaign(&state.pool, &campaign_id).await?;
    Ok(Json(CampaignEventsResponse {
        count: events.len(),
        campaign_id,
        events,
    }))
}

/// `GET /campaigns/:id/summary`
///
/// 404 when nothing has been indexed for the campaign yet.
pub async fn get_campaign_summary(
    State(state): State<Arc<ApiState>>,
    Path(campaign_id): Path<String>,
) -> Result<Json<CampaignSummary>> {
    let events = db::get_events_for_campaign(&state.pool, &campaign_id).await?;
    CampaignSummary::fold(&campaign_id, &events)
        .map(Json)
        .ok_or_else(|| IndexerError::NotFound(format!("no events indexed for campaign {campaign_id}")))
}

/// `GET /accounts/:address/events`
///
/// Every event in which the account was the actor.
pub async fn get_account_events(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Result<Json<AccountEventsResponse>> {
    let events = db::get_events_for_actor(&state.pool, &address).await?;
    Ok(Json(AccountEventsResponse {
        count: events.len(),
        address,
        events,
    }))
}
