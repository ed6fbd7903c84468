use thiserror::Error;

/// Why a lookup produced no table.
///
/// Every variant collapses to the same empty answer at the [`crate::sheet`]
/// boundary; inside the crate they stay distinct so callers and tests can
/// tell "nothing exists" apart from "the request broke".
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid reference {0:?}, expected \"language:Title\"")]
    InvalidReference(String),

    #[error("invalid date {0:?}")]
    InvalidDate(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("API error [{code}]: {info}")]
    Api { code: String, info: String },

    #[error("malformed XML response: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("malformed JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unparseable timestamp {0:?}")]
    Timestamp(String),

    #[error("no matching entries")]
    NoData,
}

impl LookupError {
    /// True when the remote answered fine but had nothing for us.
    pub fn is_no_data(&self) -> bool {
        matches!(self, LookupError::NoData)
    }
}

pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Turns an empty collection into [`LookupError::NoData`].
pub(crate) fn non_empty<T>(items: Vec<T>) -> LookupResult<Vec<T>> {
    if items.is_empty() {
        Err(LookupError::NoData)
    } else {
        Ok(items)
    }
}
