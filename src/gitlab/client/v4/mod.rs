pub mod model;

mod variable;

use reqwest::{Method, Url};
use url::form_urlencoded;

use super::base::BaseClient;
use crate::gitlab::config::GitlabConfig;
use crate::gitlab::error::Result;

/// Client for the GitLab REST API v4, bound to one project.
#[derive(Debug, Clone)]
pub struct V4Client {
    base: BaseClient,
}

impl V4Client {
    const API_VERSION: &'static str = "api/v4";

    pub fn new(base: BaseClient) -> Self {
        Self { base }
    }

    pub fn from_config(config: GitlabConfig) -> Result<Self> {
        Ok(Self::new(BaseClient::new(config)?))
    }

    /// Project id as a single path segment. Namespaced paths such as
    /// `group/project` are percent-encoded, numeric ids pass through.
    fn project_segment(&self) -> String {
        form_urlencoded::byte_serialize(self.base.config.project_id.as_bytes()).collect()
    }

    fn variables_path(&self) -> String {
        format!("projects/{}/variables", self.project_segment())
    }

    /// `{server}/api/v4/projects/{project_id}/variables`
    pub fn variables_endpoint(&self) -> Result<Url> {
        self.base
            .api_url(&self.variables_path(), Self::API_VERSION)
    }

    fn base_api(&self, method: Method, endpoint: &str) -> Result<reqwest::RequestBuilder> {
        self.base.base_api(method, endpoint, Self::API_VERSION)
    }
}
