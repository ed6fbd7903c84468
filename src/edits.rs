use crate::config::{DEFAULT_WINDOW_DAYS, EDITS_LANGUAGE};
use crate::error::{non_empty, LookupError, LookupResult};
use crate::mediawiki::{self, Revision};
use crate::models::DateArg;
use crate::reference::Reference;
use crate::transport::Transport;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

const START_OF_DAY: &str = "T00:00:00";
const END_OF_DAY: &str = "T23:59:59";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub timestamp: DateTime<Utc>,
    /// Bytes added (positive) or removed (negative) relative to the previous revision
    pub delta: i64,
}

/// Structured dates become MediaWiki timestamps at `time_of_day`; raw strings pass through.
pub fn normalize_bound(arg: &DateArg, time_of_day: &str) -> String {
    match arg {
        DateArg::Raw(raw) => raw.clone(),
        DateArg::Date(date) => format!("{}{}", date.format("%Y-%m-%d"), time_of_day),
    }
}

/// Fills in missing bounds: midnight 30 days back through the end of today.
pub fn resolve_window(
    start: Option<&DateArg>,
    end: Option<&DateArg>,
    now: DateTime<Utc>,
) -> (String, String) {
    let start = start
        .cloned()
        .unwrap_or_else(|| DateArg::Date((now - Duration::days(DEFAULT_WINDOW_DAYS)).date_naive()));
    let end = end
        .cloned()
        .unwrap_or_else(|| DateArg::Date(now.date_naive()));
    (
        normalize_bound(&start, START_OF_DAY),
        normalize_bound(&end, END_OF_DAY),
    )
}

fn parse_timestamp(timestamp: &str) -> LookupResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| LookupError::Timestamp(timestamp.to_string()))
}

/// Size change of each revision against the next older one.
///
/// Expects MediaWiki's default newest-first order. The oldest revision has
/// nothing to compare against and yields no row.
pub fn size_deltas(revisions: &[Revision]) -> LookupResult<Vec<Edit>> {
    revisions
        .windows(2)
        .map(|pair| {
            Ok(Edit {
                timestamp: parse_timestamp(&pair[0].timestamp)?,
                delta: pair[0].size - pair[1].size,
            })
        })
        .collect()
}

/// Revision size deltas between two MediaWiki timestamps.
///
/// Always read from English Wikipedia; the reference's language is not used.
pub fn page_edits_between<T: Transport>(
    transport: &T,
    reference: &Reference,
    start: &str,
    end: &str,
) -> LookupResult<Vec<Edit>> {
    // rvstart is where enumeration begins, which for newest-first listing is
    // the later bound
    let request = mediawiki::query(EDITS_LANGUAGE)
        .param("prop", "revisions")
        .param("rvprop", "size|timestamp")
        .param("rvlimit", "max")
        .param("rvstart", end)
        .param("rvend", start)
        .title("titles", &reference.title);
    let page = mediawiki::fetch(transport, &request)?.first_page()?;
    let revisions = page.revisions.map(|r| r.entries).unwrap_or_default();

    let edits = size_deltas(&revisions)?;
    debug!(reference = %reference, revisions = revisions.len(), edits = edits.len(), "page edits");
    non_empty(edits)
}

/// Revision size deltas, defaulting to the last 30 days.
pub fn page_edits<T: Transport>(
    transport: &T,
    reference: &Reference,
    start: Option<&DateArg>,
    end: Option<&DateArg>,
) -> LookupResult<Vec<Edit>> {
    let (start, end) = resolve_window(start, end, Utc::now());
    page_edits_between(transport, reference, &start, &end)
}
