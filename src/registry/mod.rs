//! Async HTTP access to the npm registry and the npm download statistics API.
//!
//! Every lookup is independently fault tolerant: a failed request resolves to
//! "no data" for that package and is only logged at `debug` level. Nothing in
//! this module returns an error for a single missing package.
//!
//! - [`npm`] — per-package metadata (maintainers).
//! - [`downloads`] — last-month download counts, bulk and per scoped package.
//! - [`npmrc`] — registry URL and credential lookup from `.npmrc` files.

pub mod downloads;
pub mod npm;
pub mod npmrc;

use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org/";
pub const DEFAULT_DOWNLOADS_URL: &str = "https://api.npmjs.org/downloads/point/last-month/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("thanks/", env!("CARGO_PKG_VERSION"));

/// An already-resolved registry credential, passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    Bearer(String),
    Basic(String),
}

impl Auth {
    fn header_value(&self) -> Option<HeaderValue> {
        let value = match self {
            Auth::Bearer(token) => format!("Bearer {}", token),
            Auth::Basic(token) => format!("Basic {}", token),
        };
        HeaderValue::from_str(&value).ok()
    }
}

/// Where and how to reach the registry.
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    /// Registry base URL, always ending with `/`.
    pub registry_url: String,
    /// Download statistics base URL, always ending with `/`.
    pub downloads_url: String,
    pub auth: Option<Auth>,
    pub timeout: Duration,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            downloads_url: DEFAULT_DOWNLOADS_URL.to_string(),
            auth: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Client for registry metadata and download counts.
pub struct Registry {
    client: Client,
    settings: RegistrySettings,
}

impl Registry {
    pub fn new(settings: RegistrySettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, settings })
    }

    /// GET against the registry, with the credential attached when present.
    fn registry_get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match self.settings.auth.as_ref().and_then(Auth::header_value) {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }
}

/// Append a trailing `/` if missing.
pub fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

#[cfg(test)]
pub(crate) fn test_settings(base: &str) -> RegistrySettings {
    RegistrySettings {
        registry_url: format!("{}/", base),
        downloads_url: format!("{}/downloads/point/last-month/", base),
        auth: None,
        timeout: Duration::from_secs(5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_trailing_slash() {
        assert_eq!(with_trailing_slash("https://r.example"), "https://r.example/");
        assert_eq!(with_trailing_slash("https://r.example/"), "https://r.example/");
    }

    #[test]
    fn test_auth_header_value() {
        let bearer = Auth::Bearer("abc".to_string()).header_value().unwrap();
        assert_eq!(bearer.to_str().unwrap(), "Bearer abc");
        let basic = Auth::Basic("dXNlcjpwYXNz".to_string()).header_value().unwrap();
        assert_eq!(basic.to_str().unwrap(), "Basic dXNlcjpwYXNz");
    }
}
