use std::sync::LazyLock;
use std::time::Duration;

use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, Url};

use crate::gitlab::config::GitlabConfig;
use crate::gitlab::error::{Result, SyncError};

pub const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

static GITLAB_VARS_USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let version = env!("CARGO_PKG_VERSION");
    format!("gitlab-vars/{version}")
});

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Base HTTP client for GitLab API communication.
/// Handles the token header and URL building for every request.
#[derive(Debug, Clone)]
pub struct BaseClient {
    pub client: reqwest::Client,
    pub config: GitlabConfig,
}

impl BaseClient {
    pub fn new(config: GitlabConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(&GITLAB_VARS_USER_AGENT));

        let mut client_builder = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .default_headers(headers)
            .use_rustls_tls();

        // reqwest already honors HTTP(S)_PROXY; a configured proxy takes priority
        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| SyncError::config(format!("invalid proxy URL '{proxy_url}': {e}")))?;
            client_builder = client_builder.proxy(proxy);
            info!("🔀 Using proxy from config: {proxy_url}");
        }

        let client = client_builder.build()?;
        Ok(Self { client, config })
    }

    /// Absolute URL of `endpoint` under the configured server and API version.
    pub fn api_url(&self, endpoint: &str, api_version: &str) -> Result<Url> {
        // Ensure base URL ends with a trailing slash for proper path joining
        let mut base_endpoint = self.config.endpoint.clone();
        if !base_endpoint.ends_with('/') {
            base_endpoint.push('/');
        }

        let base_url = Url::parse(&base_endpoint)
            .map_err(|e| SyncError::config(format!("invalid GitLab URL '{base_endpoint}': {e}")))?;
        base_url
            .join(&format!("{api_version}/{endpoint}"))
            .map_err(|e| SyncError::config(format!("invalid API path '{endpoint}': {e}")))
    }

    /// Build a request carrying the access token for the specified API version
    pub fn base_api(
        &self,
        method: Method,
        endpoint: &str,
        api_version: &str,
    ) -> Result<reqwest::RequestBuilder> {
        let url = self.api_url(endpoint, api_version)?;
        debug!("🔗 Request URL: {method} {url}");

        let request = self.client.request(method, url);
        match &self.config.token {
            Some(token) => Ok(request.header(PRIVATE_TOKEN_HEADER, token.as_str())),
            None => {
                debug!("No access token configured, sending unauthenticated request");
                Ok(request)
            }
        }
    }
}
