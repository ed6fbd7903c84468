use crate::config::{ClientConfig, CACHE_CONTROL};
use crate::error::{LookupError, LookupResult};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL as CACHE_CONTROL_HEADER};
use tracing::{debug, trace};

/// Blocking HTTP GET returning the response body as text.
///
/// Adapters only ever talk to the network through this, so tests swap in
/// canned responses.
pub trait Transport {
    fn get(&self, url: &str) -> LookupResult<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> LookupResult<String> {
        (**self).get(url)
    }
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> LookupResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL_HEADER, HeaderValue::from_static(CACHE_CONTROL));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> LookupResult<String> {
        debug!(url, "GET");
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text()?;
        trace!(url, bytes = body.len(), "response received");
        Ok(body)
    }
}
