use anyhow::Result;
use reqwest::{Proxy, StatusCode, redirect::Policy};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// A decoded upstream response body.
pub type JsonObject = Map<String, Value>;

pub struct BuildHttpClientArgs {
    pub allow_invalid_certs: bool,
    pub max_redirects: usize,
    pub request_timeout: Duration,
    pub proxy: Option<Proxy>,
}

/// Why a call to an upstream API did not produce a usable body.
#[derive(Debug, Error)]
pub enum UpstreamFailure {
    /// The request could not be sent or the response never arrived.
    #[error("request to upstream failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The upstream answered with a non-2xx status.
    #[error("upstream responded with status {0}")]
    Status(StatusCode),

    /// The body was not a JSON object.
    #[error("failed to decode upstream body: {0}")]
    Decode(#[source] reqwest::Error),

    /// The body decoded to JSON `null`.
    #[error("upstream returned an empty body")]
    EmptyBody,
}

/// Thin wrapper over a pooled [`reqwest::Client`] that fetches JSON objects.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    inner: reqwest::Client,
}

impl UpstreamClient {
    /// Create a new [`UpstreamClient`] with the given arguments.
    pub fn new(args: BuildHttpClientArgs) -> Result<Self> {
        let mut builder = reqwest::ClientBuilder::default()
            .redirect(Policy::limited(args.max_redirects))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .danger_accept_invalid_certs(args.allow_invalid_certs)
            .connect_timeout(Duration::from_secs(5))
            .timeout(args.request_timeout);
        if let Some(proxy) = args.proxy {
            builder = builder.proxy(proxy);
        }
        Ok(Self {
            inner: builder.build()?,
        })
    }

    /// Send a GET request to `url` and decode the response body as a JSON object.
    ///
    /// Errors never include the request URL, as upstream URLs carry API keys.
    pub async fn get_json(&self, url: &str) -> Result<JsonObject, UpstreamFailure> {
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|err| UpstreamFailure::Transport(err.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamFailure::Status(status));
        }

        response
            .json::<Option<JsonObject>>()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    UpstreamFailure::Transport(err.without_url())
                } else {
                    UpstreamFailure::Decode(err.without_url())
                }
            })?
            .ok_or(UpstreamFailure::EmptyBody)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> UpstreamClient {
        UpstreamClient::new(BuildHttpClientArgs {
            allow_invalid_certs: false,
            max_redirects: 10,
            request_timeout: Duration::from_secs(2),
            proxy: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn invalid_url_is_a_transport_failure() {
        let err = client().get_json("not a url").await.unwrap_err();
        assert!(matches!(err, UpstreamFailure::Transport(_)));
    }

    #[tokio::test]
    async fn refused_connection_is_a_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let err = client()
            .get_json(&format!("http://{address}/feed?api_key=SECRET"))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamFailure::Transport(_)));
        assert!(!err.to_string().contains("SECRET"));
    }

    #[test]
    fn status_failure_mentions_code() {
        let err = UpstreamFailure::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "upstream responded with status 500 Internal Server Error"
        );
    }
}
