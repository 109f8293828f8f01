//! Request builders for the supported upstream APIs.

mod asteroid;
mod satellite;

pub use asteroid::*;
pub use satellite::*;

/// An upstream API together with the strings used to report on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integration {
    /// The NASA near-Earth-object feed.
    Asteroid,
    /// The N2YO "satellites above" lookup.
    Satellite,
}

impl Integration {
    /// Short name used in log lines.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Asteroid => "NASA NEO",
            Self::Satellite => "N2YO",
        }
    }

    /// Message placed in the error payload when a call to this integration fails.
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Asteroid => "Failed to fetch asteroid data",
            Self::Satellite => "Failed to fetch satellite data",
        }
    }
}

/// A single outbound call that can be turned into an upstream URL.
pub trait UpstreamRequest {
    /// The integration this request targets.
    const INTEGRATION: Integration;

    /// Build the full upstream URL from the integration's base URL and API key.
    fn url(&self, base_url: &str, api_key: &str) -> String;
}
