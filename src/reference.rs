use crate::error::{LookupError, LookupResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Wiki language codes become a hostname label, e.g. `zh-min-nan`.
static LANGUAGE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]+$").unwrap());

/// A language-qualified Wikipedia title such as `de:Berlin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub language: String,
    pub title: String,
}

impl Reference {
    /// Splits on the first colon only, so `en:Category:Foo` keeps `Category:Foo` as its title.
    pub fn parse(input: &str) -> LookupResult<Self> {
        let (language, title) = input
            .split_once(':')
            .ok_or_else(|| LookupError::InvalidReference(input.to_string()))?;

        if title.is_empty() || !LANGUAGE_CODE.is_match(language) {
            return Err(LookupError::InvalidReference(input.to_string()));
        }

        Ok(Self {
            language: language.to_string(),
            title: title.to_string(),
        })
    }

    pub fn new(language: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            title: title.into(),
        }
    }

    /// Title as sent to the remote APIs: whitespace becomes `_`, then percent-encoded.
    pub fn encoded_title(&self) -> String {
        encode_title(&self.title)
    }

    /// Title as shown to people: underscores become spaces.
    pub fn display_title(&self) -> String {
        humanize(&self.title)
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.language, self.title)
    }
}

pub fn underscore(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

pub fn humanize(title: &str) -> String {
    title.replace('_', " ")
}

pub fn encode_title(title: &str) -> String {
    urlencoding::encode(&underscore(title)).into_owned()
}
