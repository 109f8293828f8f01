use super::NearbyQuery;
use crate::{AppState, forwarder::ForwardOutcome, upstream::SatellitesAboveRequest};
use axum::extract::{Query, State};
use std::sync::Arc;

pub const SATELLITES_ENDPOINT: &str = "/api/satellites/nearby";

pub async fn satellites_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearbyQuery>,
) -> ForwardOutcome {
    state
        .forwarder
        .forward(&SatellitesAboveRequest {
            lat: query.lat,
            lng: query.lng,
            radius: query.radius,
        })
        .await
}
