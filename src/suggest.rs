use crate::config::{DEFAULT_SUGGEST_LANGUAGE, SUGGEST_API};
use crate::error::{non_empty, LookupResult};
use crate::query::ApiQuery;
use crate::transport::Transport;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Toplevel {
    #[serde(rename = "CompleteSuggestion", default)]
    entries: Vec<CompleteSuggestion>,
}

#[derive(Debug, Deserialize)]
struct CompleteSuggestion {
    suggestion: Suggestion,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    #[serde(rename = "@data")]
    data: String,
}

/// Google Suggest completions for a keyword, in the order Google ranks them.
pub fn suggestions<T: Transport>(
    transport: &T,
    keyword: &str,
    language: Option<&str>,
) -> LookupResult<Vec<String>> {
    let language = language
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_SUGGEST_LANGUAGE);
    let request = ApiQuery::new(SUGGEST_API)
        .param("output", "toolbar")
        .param("hl", language)
        .param("q", keyword);

    let body = transport.get(&request.url())?;
    let toplevel: Toplevel = quick_xml::de::from_str(&body)?;
    let suggestions: Vec<String> = toplevel
        .entries
        .into_iter()
        .map(|entry| entry.suggestion.data)
        .collect();

    debug!(keyword, language, count = suggestions.len(), "suggestions");
    non_empty(suggestions)
}
