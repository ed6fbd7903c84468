use crate::reference::encode_title;

/// GET URL with ordered, percent-encoded query parameters.
#[derive(Debug, Clone)]
pub struct ApiQuery {
    base: String,
    params: Vec<(&'static str, String)>,
}

impl ApiQuery {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &'static str, value: &str) -> Self {
        self.params.push((key, urlencoding::encode(value).into_owned()));
        self
    }

    /// Adds a page title, underscoring whitespace before encoding.
    pub fn title(mut self, key: &'static str, title: &str) -> Self {
        self.params.push((key, encode_title(title)));
        self
    }

    pub fn url(&self) -> String {
        let mut url = String::with_capacity(self.base.len() + self.params.len() * 16);
        url.push_str(&self.base);
        for (i, (key, value)) in self.params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }
        url
    }
}
