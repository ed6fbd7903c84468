//! MediaWiki action API (`action=query&format=xml`) request helpers and the
//! slices of its XML responses the adapters read.

use crate::config::wikipedia_api;
use crate::error::{LookupError, LookupResult};
use crate::query::ApiQuery;
use crate::transport::Transport;
use serde::Deserialize;
use tracing::debug;

/// Starts an `action=query&format=xml` request against one language edition.
pub fn query(language: &str) -> ApiQuery {
    ApiQuery::new(wikipedia_api(language))
        .param("action", "query")
        .param("format", "xml")
}

/// Fetches and decodes a query, surfacing API-level errors.
pub fn fetch<T: Transport>(transport: &T, request: &ApiQuery) -> LookupResult<Query> {
    let url = request.url();
    let body = transport.get(&url)?;
    let response: ApiResponse = quick_xml::de::from_str(&body)?;

    if let Some(error) = response.error {
        debug!(url, code = %error.code, "MediaWiki returned an error");
        return Err(LookupError::Api {
            code: error.code,
            info: error.info,
        });
    }

    response.query.ok_or(LookupError::NoData)
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub query: Option<Query>,
    #[serde(default)]
    pub error: Option<ApiErrorInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorInfo {
    #[serde(rename = "@code", default)]
    pub code: String,
    #[serde(rename = "@info", default)]
    pub info: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub backlinks: Option<BacklinkList>,
    #[serde(default)]
    pub categorymembers: Option<CategoryMemberList>,
    #[serde(default)]
    pub pages: Option<Pages>,
}

impl Query {
    /// The first page of a `prop=` query; MediaWiki nests one per requested title.
    pub fn first_page(self) -> LookupResult<Page> {
        self.pages
            .and_then(|pages| pages.page.into_iter().next())
            .ok_or(LookupError::NoData)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TitledEntry {
    #[serde(rename = "@title")]
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BacklinkList {
    #[serde(rename = "bl", default)]
    pub entries: Vec<TitledEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryMemberList {
    #[serde(rename = "cm", default)]
    pub entries: Vec<TitledEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pages {
    #[serde(default)]
    pub page: Vec<Page>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Page {
    #[serde(rename = "@title", default)]
    pub title: String,
    #[serde(rename = "@missing", default)]
    pub missing: Option<String>,
    #[serde(default)]
    pub langlinks: Option<LangLinks>,
    #[serde(default)]
    pub links: Option<PageLinks>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub revisions: Option<Revisions>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LangLinks {
    #[serde(rename = "ll", default)]
    pub entries: Vec<LangLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LangLink {
    #[serde(rename = "@lang")]
    pub lang: String,
    #[serde(rename = "$text", default)]
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageLinks {
    #[serde(rename = "pl", default)]
    pub entries: Vec<TitledEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "co", default)]
    pub entries: Vec<Coordinate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "@lat")]
    pub lat: String,
    #[serde(rename = "@lon")]
    pub lon: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Revisions {
    #[serde(rename = "rev", default)]
    pub entries: Vec<Revision>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Revision {
    #[serde(rename = "@size")]
    pub size: i64,
    #[serde(rename = "@timestamp")]
    pub timestamp: String,
}
