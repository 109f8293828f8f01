use super::{Integration, UpstreamRequest};

/// Minimum observer altitude passed to N2YO, in metres.
pub const OBSERVER_ALTITUDE: u32 = 0;

/// N2YO category id for the brightest satellites.
pub const CATEGORY_BRIGHTEST: u32 = 1;

/// A request for the satellites currently above an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatellitesAboveRequest {
    /// Observer latitude in degrees.
    pub lat: f64,
    /// Observer longitude in degrees.
    pub lng: f64,
    /// Search radius in degrees, 0 to 90.
    pub radius: i32,
}

impl UpstreamRequest for SatellitesAboveRequest {
    const INTEGRATION: Integration = Integration::Satellite;

    fn url(&self, base_url: &str, api_key: &str) -> String {
        format!(
            "{}/above/{}/{}/{OBSERVER_ALTITUDE}/{}/{CATEGORY_BRIGHTEST}?apiKey={api_key}",
            base_url.trim_end_matches('/'),
            coordinate(self.lat),
            coordinate(self.lng),
            self.radius,
        )
    }
}

/// Render a coordinate with six decimals and a '.' separator.
///
/// Non-finite values are spelled `NaN`, `Infinity` and `-Infinity`.
fn coordinate(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_negative() {
            "-Infinity".to_string()
        } else {
            "Infinity".to_string()
        }
    } else {
        format!("{value:.6}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_N2YO_BASE_URL;

    #[test]
    fn new_york_lookup() {
        let url = SatellitesAboveRequest {
            lat: 40.7128,
            lng: -74.0060,
            radius: 25,
        }
        .url(DEFAULT_N2YO_BASE_URL, "KEY");
        assert_eq!(
            url,
            "https://api.n2yo.com/rest/v1/satellite/above/40.712800/-74.006000/0/25/1?apiKey=KEY"
        );
    }

    #[test]
    fn coordinates_use_period_decimals() {
        let coordinates = [
            (0.0, 0.0),
            (-33.8688, 151.2093),
            (51.5, -0.1275),
            (89.999999, -179.999999),
            (1e-7, -1e-7),
        ];
        for (lat, lng) in coordinates {
            let url = SatellitesAboveRequest {
                lat,
                lng,
                radius: 90,
            }
            .url("http://upstream", "k");
            let path = url
                .strip_prefix("http://upstream/above/")
                .unwrap()
                .split('?')
                .next()
                .unwrap();
            let segments: Vec<&str> = path.split('/').collect();
            assert_eq!(segments.len(), 5, "{url}");
            for coordinate in &segments[..2] {
                assert!(!coordinate.contains(','), "{url}");
                assert_eq!(coordinate.split('.').nth(1).map(str::len), Some(6), "{url}");
            }
        }
    }

    #[test]
    fn non_finite_coordinates() {
        let url = SatellitesAboveRequest {
            lat: f64::INFINITY,
            lng: f64::NAN,
            radius: 3,
        }
        .url("http://upstream", "k");
        assert_eq!(url, "http://upstream/above/Infinity/NaN/0/3/1?apiKey=k");

        assert_eq!(coordinate(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn out_of_range_values_are_forwarded() {
        let url = SatellitesAboveRequest {
            lat: 123.0,
            lng: -500.25,
            radius: -4,
        }
        .url("http://upstream/", "k");
        assert_eq!(
            url,
            "http://upstream/above/123.000000/-500.250000/0/-4/1?apiKey=k"
        );
    }
}
