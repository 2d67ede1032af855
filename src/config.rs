use crate::calendar::GOOGLE_CALENDAR_API;
use std::{env, path::PathBuf};

pub const DEFAULT_SHOWS_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSZlY9VQvWzOIfjnYQGtV5OE-I3xljjvpDFI59hKN8iF1u5BPgtfdF5THc6Wt0K4L0jgFXK4TUSqVZX/pub?gid=0&single=true&output=csv";

/// Startup settings, read from the environment once.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub assets_dir: PathBuf,
    pub shows_csv_url: String,
    pub booking_endpoint: Option<String>,
    pub calendar_api_base: String,
    pub calendar_id: Option<String>,
    pub calendar_api_key: Option<String>,
}

impl SiteConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            port: var("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(8080),
            data_path: var("SITE_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/prefs.json")),
            assets_dir: var("SITE_ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("assets")),
            shows_csv_url: var("SHOWS_CSV_URL")
                .unwrap_or_else(|| DEFAULT_SHOWS_CSV_URL.to_string()),
            booking_endpoint: var("BOOKING_ENDPOINT"),
            calendar_api_base: var("CALENDAR_API_BASE")
                .unwrap_or_else(|| GOOGLE_CALENDAR_API.to_string()),
            calendar_id: var("CALENDAR_ID"),
            calendar_api_key: var("CALENDAR_API_KEY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_apply_for_missing_or_blank_values() {
        let vars = HashMap::from([("PORT", "not-a-port"), ("BOOKING_ENDPOINT", "  ")]);
        let config = SiteConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.port, 8080);
        assert_eq!(config.booking_endpoint, None);
        assert_eq!(config.shows_csv_url, DEFAULT_SHOWS_CSV_URL);
        assert_eq!(config.data_path, PathBuf::from("data/prefs.json"));
    }

    #[test]
    fn values_are_read_when_present() {
        let vars = HashMap::from([
            ("PORT", "9000"),
            ("CALENDAR_ID", "gigs@group.calendar.google.com"),
            ("CALENDAR_API_KEY", "k"),
        ]);
        let config = SiteConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.port, 9000);
        assert_eq!(config.calendar_id.as_deref(), Some("gigs@group.calendar.google.com"));
        assert_eq!(config.calendar_api_key.as_deref(), Some("k"));
    }
}
