use super::NearbyQuery;
use crate::{AppState, forwarder::ForwardOutcome, upstream::AsteroidFeedRequest};
use axum::extract::{Query, State};
use std::sync::Arc;

pub const ASTEROIDS_ENDPOINT: &str = "/api/asteroids/nearby";

// The NEO feed has no geographic filter, the query is validated and then dropped.
pub async fn asteroids_handler(
    State(state): State<Arc<AppState>>,
    Query(_query): Query<NearbyQuery>,
) -> ForwardOutcome {
    state
        .forwarder
        .forward(&AsteroidFeedRequest::today())
        .await
}
