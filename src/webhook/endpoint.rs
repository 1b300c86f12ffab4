//! Webhook endpoint parsing and validation.
//!
//! Discord webhook URLs have the shape
//! `https://discord.com/api/webhooks/{id}/{token}`. The host is not checked
//! so proxies and local test servers work, but the path must end in a
//! numeric id followed by a non-empty token.

use std::fmt;

use thiserror::Error;
use url::Url;

/// Base used when building an endpoint from an id and token.
pub const DISCORD_WEBHOOK_BASE: &str = "https://discord.com/api/webhooks";

/// Reasons a webhook reference is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("webhook URL could not be parsed: {0}")]
    Parse(#[from] url::ParseError),
    #[error("webhook URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),
    #[error("webhook URL must end with /webhooks/{{id}}/{{token}}")]
    MissingIdOrToken,
    #[error("webhook id must be numeric, got {0:?}")]
    InvalidId(String),
}

/// A validated webhook URL together with its id.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookEndpoint {
    url: Url,
    id: u64,
}

impl WebhookEndpoint {
    /// Parse and validate a full webhook URL.
    pub fn parse(raw: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(raw.trim())?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(EndpointError::UnsupportedScheme(other.to_owned())),
        }
        let id = Self::extract_id(&url)?;
        Ok(Self { url, id })
    }

    /// Build an endpoint on discord.com from its id and token.
    pub fn from_parts(id: u64, token: &str) -> Result<Self, EndpointError> {
        let token = token.trim();
        if token.is_empty() || token.contains('/') {
            return Err(EndpointError::MissingIdOrToken);
        }
        Self::parse(&format!("{DISCORD_WEBHOOK_BASE}/{id}/{token}"))
    }

    fn extract_id(url: &Url) -> Result<u64, EndpointError> {
        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        let [.., marker, id, _token] = segments.as_slice() else {
            return Err(EndpointError::MissingIdOrToken);
        };
        if *marker != "webhooks" {
            return Err(EndpointError::MissingIdOrToken);
        }
        id.parse()
            .map_err(|_| EndpointError::InvalidId((*id).to_owned()))
    }

    /// Numeric webhook id, used to name worker threads.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

// The token is a credential, so Debug output only shows the id and host.
impl fmt::Debug for WebhookEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookEndpoint")
            .field("host", &self.url.host_str())
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
