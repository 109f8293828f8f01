use super::{Integration, UpstreamRequest};
use chrono::{Days, Local, NaiveDate};

/// Number of days covered by a single feed request, counted from the start date.
pub const FEED_WINDOW_DAYS: u64 = 7;

/// A request for the NEO feed covering [`FEED_WINDOW_DAYS`] from a start date.
///
/// The feed is not filtered geographically, any coordinates supplied by the
/// caller are not part of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsteroidFeedRequest {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl AsteroidFeedRequest {
    /// Create a request whose window starts on `start_date`.
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date: start_date
                .checked_add_days(Days::new(FEED_WINDOW_DAYS))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// Create a request whose window starts on the server's local date.
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    /// First day of the window.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last day of the window.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

impl UpstreamRequest for AsteroidFeedRequest {
    const INTEGRATION: Integration = Integration::Asteroid;

    fn url(&self, base_url: &str, api_key: &str) -> String {
        format!(
            "{}/feed?start_date={}&end_date={}&api_key={api_key}",
            base_url.trim_end_matches('/'),
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_NASA_BASE_URL;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn feed_url_covers_one_week() {
        let url = AsteroidFeedRequest::new(date(2024, 1, 1)).url(DEFAULT_NASA_BASE_URL, "KEY");
        assert_eq!(
            url,
            "https://api.nasa.gov/neo/rest/v1/feed?start_date=2024-01-01&end_date=2024-01-08&api_key=KEY"
        );
    }

    #[test]
    fn window_crosses_month_and_year_boundaries() {
        let request = AsteroidFeedRequest::new(date(2023, 12, 28));
        assert_eq!(request.end_date(), date(2024, 1, 4));

        let request = AsteroidFeedRequest::new(date(2024, 2, 25));
        assert_eq!(request.end_date(), date(2024, 3, 3));
    }

    #[test]
    fn end_date_is_always_seven_days_after_start() {
        let mut start = date(2023, 1, 1);
        while start < date(2025, 1, 1) {
            let request = AsteroidFeedRequest::new(start);
            assert_eq!((request.end_date() - request.start_date()).num_days(), 7);
            start = start.succ_opt().unwrap();
        }
    }

    #[test]
    fn today_starts_on_the_local_date() {
        let before = Local::now().date_naive();
        let request = AsteroidFeedRequest::today();
        let after = Local::now().date_naive();
        assert!(request.start_date() == before || request.start_date() == after);
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let url = AsteroidFeedRequest::new(date(2024, 6, 9)).url("http://127.0.0.1:9000/", "k");
        assert_eq!(
            url,
            "http://127.0.0.1:9000/feed?start_date=2024-06-09&end_date=2024-06-16&api_key=k"
        );
    }
}
