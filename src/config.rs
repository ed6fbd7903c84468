use std::env;
use std::time::Duration;

/// Sent with every request so intermediaries never serve a stale answer
pub const CACHE_CONTROL: &str = "max-age=0";

/// Wikidata rejects `wbgetentities` calls with more ids than this
pub const LABEL_CHUNK_SIZE: usize = 50;

/// Language whose Wikidata labels are used for property and entity names
pub const LABEL_LANGUAGE: &str = "en";

/// Coordinates are read from this wiki whatever the reference language is
pub const GEO_LANGUAGE: &str = "en";

/// Revision history is read from this wiki whatever the reference language is
pub const EDITS_LANGUAGE: &str = "en";

/// Default language for Google Suggest
pub const DEFAULT_SUGGEST_LANGUAGE: &str = "en";

/// Default look-back window for pageviews and page edits
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

pub const WIKIDATA_CLAIMS_API: &str = "https://wikidata.org/w/api.php";
pub const WIKIDATA_LABELS_API: &str = "https://www.wikidata.org/w/api.php";
pub const PAGEVIEWS_API: &str = "https://wikimedia.org/api/rest_v1/metrics/pageviews/per-article";
pub const SUGGEST_API: &str = "https://suggestqueries.google.com/complete/search";

pub const DEFAULT_USER_AGENT: &str =
    concat!("wikilookup/", env!("CARGO_PKG_VERSION"), " (https://github.com/real-limoges/wikilookup)");
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// MediaWiki action API for one language edition
pub fn wikipedia_api(language: &str) -> String {
    format!("https://{}.wikipedia.org/w/api.php", language)
}

/// HTTP client settings. The lookups themselves carry no configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Reads `WIKILOOKUP_USER_AGENT` and `WIKILOOKUP_TIMEOUT_MS`, falling back to defaults.
    pub fn from_env() -> Self {
        let user_agent = env::var("WIKILOOKUP_USER_AGENT")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let timeout_ms = env::var("WIKILOOKUP_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            user_agent,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
