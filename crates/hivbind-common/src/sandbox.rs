use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use tracing::warn;
use url::Url;
use crate::error::FetchError;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Hosts reachable through the sandbox: PubChem and loopback. Subdomains match too.
pub const ALLOWED_HOSTS: [&str; 3] = [
    "pubchem.ncbi.nlm.nih.gov", // PUG REST
    "localhost",
    "127.0.0.1",
];

/// An HTTP client capped to an allowlist of hosts, with a fixed request timeout.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and the default 10 s timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with the default allowlist and the given timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let allowlist = ALLOWED_HOSTS.into_iter().map(String::from).collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("hivbind/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        url_host_allowed(url, self.allowlist.iter().map(String::as_str))
    }

    /// Builds a GET request if the URL is permitted.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, FetchError> {
        if !self.is_allowed(url) {
            warn!(url = url, "Blocked request to host outside allowlist");
            return Err(FetchError::Transport(format!(
                "Network capabilities capped: domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}

/// Whether `url` would pass the sandbox. Lets callers check configured
/// endpoints before any client is built.
pub fn is_permitted(url: &str) -> bool {
    url_host_allowed(url, ALLOWED_HOSTS)
}

fn url_host_allowed<'a>(url: &str, allowlist: impl IntoIterator<Item = &'a str>) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    // Exact match or subdomain of an allowed host
    allowlist
        .into_iter()
        .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
}
