//! Crate for Sattracker, a small proxy in front of the NASA near-Earth-object feed
//! and the N2YO satellite API.
//!
//! Every upstream failure is absorbed and answered with a fixed `{"error": "..."}` body.

#[cfg(feature = "rustls-tls")]
#[cfg(feature = "native-tls")]
compile_error!("You can only enable one TLS backend");

pub extern crate url;

mod forwarder;
mod http_client;
mod routes;
pub mod upstream;

use anyhow::{Result, bail};
use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, StatusCode},
    middleware::{self as axum_middleware, Next},
    response::Response,
    routing::get,
};
use core::{net::SocketAddr, time::Duration};
use forwarder::Forwarder;
use http_client::{BuildHttpClientArgs, UpstreamClient};
use reqwest::{Proxy, header};
use routes::{ASTEROIDS_ENDPOINT, HEALTH_ENDPOINT, INDEX_ENDPOINT, SATELLITES_ENDPOINT};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    normalize_path::NormalizePathLayer,
    timeout::TimeoutLayer,
    trace::{self, TraceLayer},
};
use tracing::{Level, info};
use url::Url;

/// Base URL of the NASA NEO REST API.
pub const DEFAULT_NASA_BASE_URL: &str = "https://api.nasa.gov/neo/rest/v1";

/// Base URL of the N2YO satellite REST API.
pub const DEFAULT_N2YO_BASE_URL: &str = "https://api.n2yo.com/rest/v1/satellite";

/// Origins allowed to call the API from a browser when none are configured.
pub const DEFAULT_CORS_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:5177",
];

/// # Example
/// ```rust,no_run
/// use std::net::{SocketAddr, IpAddr, Ipv4Addr};
/// use sattracker::{ApiKeys, SattrackerServer, ServerSettings};
///
/// # #[tokio::main]
/// # async fn main() {
/// let server = SattrackerServer::new(ServerSettings::new(ApiKeys {
///     nasa: "DEMO_KEY".into(),
///     n2yo: "N2YO_KEY".into(),
/// }))
/// .unwrap();
/// server.start(&SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080)).await.unwrap();
/// # }
/// ```
#[derive(Debug)]
pub struct SattrackerServer {
    router_inner: Router,
}

/// Settings to run the server with.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// How long a request may take to be processed before it is abandoned.
    pub request_timeout: Duration,

    /// See [`ApiKeys`].
    pub api_keys: ApiKeys,

    /// See [`UpstreamSettings`].
    pub upstream_settings: UpstreamSettings,

    /// See [`CorsSettings`].
    pub cors_settings: CorsSettings,
}

/// Secret keys for the upstream APIs, fixed for the lifetime of the server.
#[derive(Clone)]
pub struct ApiKeys {
    /// Key for `api.nasa.gov`.
    pub nasa: String,
    /// Key for `api.n2yo.com`.
    pub n2yo: String,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("nasa", &"<redacted>")
            .field("n2yo", &"<redacted>")
            .finish()
    }
}

/// Configuration options used when making any call to an upstream API.
#[derive(Debug, Clone)]
pub struct UpstreamSettings {
    /// Base URL that NEO feed requests are made against.
    pub nasa_base_url: Url,

    /// Base URL that satellite lookups are made against.
    pub n2yo_base_url: Url,

    /// How long to wait for an upstream request to complete before it's abandoned
    /// and considered failed.
    pub request_timeout: Duration,

    /// The maximum amount of redirects to follow before abandoning the request.
    pub max_redirects: usize,

    /// The proxy to use for all outgoing requests.
    pub request_proxy: Option<Url>,

    /// Whether to allow invalid/expired/forged TLS certificates when making upstream requests.
    ///
    /// **Enabling this is dangerous and is usually not necessary.**
    pub allow_invalid_certs: bool,

    /// Respond with `502 Bad Gateway` instead of `200 OK` when an upstream call fails.
    ///
    /// The body is the same error payload either way.
    pub report_failure_status: bool,
}

/// Cross-origin policy applied to the `/api` routes.
#[derive(Debug, Clone)]
pub struct CorsSettings {
    /// Origins that browsers may call the API from.
    pub allowed_origins: Box<[String]>,
}

impl ServerSettings {
    /// Default settings using the given API keys.
    pub fn new(api_keys: ApiKeys) -> Self {
        Self {
            request_timeout: Duration::from_secs(15),
            api_keys,
            upstream_settings: UpstreamSettings::default(),
            cors_settings: CorsSettings::default(),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            nasa_base_url: Url::parse(DEFAULT_NASA_BASE_URL).expect("default NASA url is valid"),
            n2yo_base_url: Url::parse(DEFAULT_N2YO_BASE_URL).expect("default N2YO url is valid"),
            request_timeout: Duration::from_secs(10),
            max_redirects: 10,
            request_proxy: None,
            allow_invalid_certs: false,
            report_failure_status: false,
        }
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_CORS_ORIGINS.map(String::from).into(),
        }
    }
}

#[derive(Debug)]
struct AppState {
    forwarder: Forwarder,
}

impl SattrackerServer {
    /// Create a new server with the provided settings.
    ///
    /// Fails if the request timeout does not exceed the upstream request timeout,
    /// as a hung upstream would then be cut off before its failure is reported.
    pub fn new(settings: ServerSettings) -> Result<Self> {
        let upstream = &settings.upstream_settings;
        if settings.request_timeout <= upstream.request_timeout {
            bail!(
                "request timeout ({:?}) must be longer than the upstream request timeout ({:?})",
                settings.request_timeout,
                upstream.request_timeout
            );
        }
        let client = UpstreamClient::new(BuildHttpClientArgs {
            allow_invalid_certs: upstream.allow_invalid_certs,
            max_redirects: upstream.max_redirects,
            request_timeout: upstream.request_timeout,
            proxy: upstream
                .request_proxy
                .as_ref()
                .map(|p| Proxy::all(p.as_str()))
                .transpose()?,
        })?;

        let api_router = Router::new()
            .route(ASTEROIDS_ENDPOINT, get(routes::asteroids_handler))
            .route(SATELLITES_ENDPOINT, get(routes::satellites_handler))
            .layer(Self::cors_layer(&settings.cors_settings)?);

        let router = Router::new()
            .route(INDEX_ENDPOINT, get(routes::index_handler))
            .route(HEALTH_ENDPOINT, get(routes::health_handler))
            .merge(api_router)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                settings.request_timeout,
            ))
            .layer(NormalizePathLayer::trim_trailing_slash())
            .layer(CatchPanicLayer::new())
            .layer(axum_middleware::from_fn(Self::header_middleware))
            .with_state(Arc::new(AppState {
                forwarder: Forwarder::new(client, settings.api_keys.clone(), upstream),
            }));

        Ok(Self {
            router_inner: router,
        })
    }

    /// Start the server and expose it locally on the provided [`SocketAddr`].
    pub async fn start(self, address: &SocketAddr) -> Result<()> {
        let tcp_listener = TcpListener::bind(&address).await?;
        self.serve(tcp_listener).await
    }

    /// Serve requests from an already bound listener until a shutdown signal is received.
    pub async fn serve(self, tcp_listener: TcpListener) -> Result<()> {
        info!("Listening on http://{}", tcp_listener.local_addr()?);
        axum::serve(tcp_listener, self.router_inner)
            .with_graceful_shutdown(Self::shutdown_signal())
            .await?;
        Ok(())
    }

    fn cors_layer(settings: &CorsSettings) -> Result<CorsLayer> {
        let origins = settings
            .allowed_origins
            .iter()
            .map(|origin| HeaderValue::from_str(origin))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(AllowHeaders::any()))
    }

    // https://github.com/tokio-rs/axum/blob/15917c6dbcb4a48707a20e9cfd021992a279a662/examples/graceful-shutdown/src/main.rs#L55
    async fn shutdown_signal() {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    async fn header_middleware(request: Request, next: Next) -> Response {
        let mut response = next.run(request).await;
        response.headers_mut().append(
            header::SERVER,
            HeaderValue::from_static(env!("CARGO_PKG_NAME")),
        );
        response
    }
}
