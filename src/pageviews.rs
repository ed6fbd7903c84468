use crate::config::{DEFAULT_WINDOW_DAYS, PAGEVIEWS_API};
use crate::error::{non_empty, LookupError, LookupResult};
use crate::models::DateArg;
use crate::reference::Reference;
use crate::transport::Transport;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

static COMPACT_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").unwrap());

static HOURLY_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})(\d{2})$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyViews {
    pub timestamp: DateTime<Utc>,
    pub views: i64,
}

#[derive(Debug, Deserialize)]
struct PageviewsResponse {
    #[serde(default)]
    items: Vec<PageviewsItem>,
}

#[derive(Debug, Deserialize)]
struct PageviewsItem {
    timestamp: String,
    views: i64,
}

fn compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Resolves a bound to the API's `YYYYMMDD` form.
pub fn normalize_date(arg: &DateArg) -> LookupResult<String> {
    match arg {
        DateArg::Raw(raw) if COMPACT_DATE.is_match(raw) => Ok(raw.clone()),
        DateArg::Raw(raw) => Err(LookupError::InvalidDate(raw.clone())),
        DateArg::Date(date) => Ok(compact(*date)),
    }
}

/// Fills in missing bounds: 30 days back through yesterday.
pub fn resolve_window(
    start: Option<&DateArg>,
    end: Option<&DateArg>,
    now: DateTime<Utc>,
) -> LookupResult<(String, String)> {
    let start = match start {
        Some(arg) => normalize_date(arg)?,
        None => compact((now - Duration::days(DEFAULT_WINDOW_DAYS)).date_naive()),
    };
    let end = match end {
        Some(arg) => normalize_date(arg)?,
        None => compact((now - Duration::days(1)).date_naive()),
    };
    Ok((start, end))
}

/// `YYYYMMDDHH` to a UTC instant on the hour.
pub fn parse_hourly(timestamp: &str) -> LookupResult<DateTime<Utc>> {
    let invalid = || LookupError::Timestamp(timestamp.to_string());
    let caps = HOURLY_TIMESTAMP.captures(timestamp).ok_or_else(invalid)?;
    let field = |i: usize| caps[i].parse::<u32>().map_err(|_| invalid());

    let year = caps[1].parse::<i32>().map_err(|_| invalid())?;
    Utc.with_ymd_and_hms(year, field(2)?, field(3)?, field(4)?, 0, 0)
        .single()
        .ok_or_else(invalid)
}

/// Daily user views between two `YYYYMMDD` bounds, newest first.
pub fn pageviews_between<T: Transport>(
    transport: &T,
    reference: &Reference,
    start: &str,
    end: &str,
) -> LookupResult<Vec<DailyViews>> {
    let url = format!(
        "{}/{}.wikipedia/all-access/user/{}/daily/{}/{}",
        PAGEVIEWS_API,
        reference.language,
        reference.encoded_title(),
        start,
        end
    );
    let body = transport.get(&url)?;
    let response: PageviewsResponse = serde_json::from_str(&body)?;

    let mut series = response
        .items
        .into_iter()
        .map(|item| {
            Ok(DailyViews {
                timestamp: parse_hourly(&item.timestamp)?,
                views: item.views,
            })
        })
        .collect::<LookupResult<Vec<_>>>()?;
    series.reverse();

    debug!(reference = %reference, start, end, days = series.len(), "pageviews");
    non_empty(series)
}

/// Daily user views, defaulting to the last 30 days.
pub fn pageviews<T: Transport>(
    transport: &T,
    reference: &Reference,
    start: Option<&DateArg>,
    end: Option<&DateArg>,
) -> LookupResult<Vec<DailyViews>> {
    let (start, end) = resolve_window(start, end, Utc::now())?;
    pageviews_between(transport, reference, &start, &end)
}
