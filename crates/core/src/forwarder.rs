use crate::{
    ApiKeys, UpstreamSettings,
    http_client::{JsonObject, UpstreamClient, UpstreamFailure},
    upstream::{Integration, UpstreamRequest},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorPayload {
    error: &'static str,
}

/// Result of forwarding a single request upstream.
#[derive(Debug)]
pub enum ForwardOutcome {
    /// The upstream body, passed through untouched.
    Upstream(JsonObject),
    /// The upstream call failed and was replaced by an error payload.
    Failed {
        payload: ErrorPayload,
        status: StatusCode,
    },
}

impl IntoResponse for ForwardOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Upstream(body) => (StatusCode::OK, Json(body)).into_response(),
            Self::Failed { payload, status } => (status, Json(payload)).into_response(),
        }
    }
}

/// Sends requests to their upstream and normalizes every failure into an [`ErrorPayload`].
#[derive(Debug)]
pub struct Forwarder {
    client: UpstreamClient,
    api_keys: ApiKeys,
    nasa_base_url: String,
    n2yo_base_url: String,
    failure_status: StatusCode,
}

impl Forwarder {
    pub fn new(client: UpstreamClient, api_keys: ApiKeys, settings: &UpstreamSettings) -> Self {
        Self {
            client,
            api_keys,
            nasa_base_url: settings.nasa_base_url.to_string(),
            n2yo_base_url: settings.n2yo_base_url.to_string(),
            failure_status: if settings.report_failure_status {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::OK
            },
        }
    }

    pub async fn forward<R: UpstreamRequest>(&self, request: &R) -> ForwardOutcome {
        let integration = R::INTEGRATION;
        let (base_url, api_key) = match integration {
            Integration::Asteroid => (&self.nasa_base_url, &self.api_keys.nasa),
            Integration::Satellite => (&self.n2yo_base_url, &self.api_keys.n2yo),
        };

        debug!("Requesting data from the {} API", integration.name());
        let result = self.client.get_json(&request.url(base_url, api_key)).await;
        self.normalize(integration, result)
    }

    fn normalize(
        &self,
        integration: Integration,
        result: Result<JsonObject, UpstreamFailure>,
    ) -> ForwardOutcome {
        match result {
            Ok(body) => ForwardOutcome::Upstream(body),
            Err(err) => {
                warn!("Error calling {} API: {err}", integration.name());
                ForwardOutcome::Failed {
                    payload: ErrorPayload {
                        error: integration.failure_message(),
                    },
                    status: self.failure_status,
                }
            }
        }
    }
}
