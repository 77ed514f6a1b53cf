use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use strum::Display;
use url::Url;

use crate::gitlab::error::{Result, SyncError};

pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Expands environment variables in a string value.
/// Supports ${VAR} and $VAR syntax.
pub fn expand_env_vars(value: &str) -> Result<String> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| {
            SyncError::config(format!(
                "failed to expand environment variable in '{value}': {e}"
            ))
        })
}

/// Location of the optional config file, following the XDG Base Directory
/// specification (~/.config/gitlab-vars/config.toml on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gitlab-vars").join("config.toml"))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    #[default]
    Export,
    Import,
}

/// Contents of the TOML config file. Every key is optional.
///
/// `gitlab_token` and `proxy` may reference environment variables
/// (`gitlab_token = "${GITLAB_DEPLOY_TOKEN}"`).
#[derive(Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub gitlab_url: Option<String>,
    pub gitlab_token: Option<String>,
    pub project_id: Option<String>,
    pub file: Option<PathBuf>,
    pub proxy: Option<String>,
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFile")
            .field("gitlab_url", &self.gitlab_url)
            .field("gitlab_token", &self.gitlab_token.as_ref().map(|_| "***redacted***"))
            .field("project_id", &self.project_id)
            .field("file", &self.file)
            .field("proxy", &self.proxy)
            .field("path", &self.path)
            .finish()
    }
}

impl ConfigFile {
    /// Loads the config file at `config_path`, or at the default location when
    /// no existing path is given. A missing file yields an empty config; any
    /// other read failure is an error.
    pub fn from_file(config_path: Option<&Path>) -> Result<Self> {
        if let Some(missing) = config_path.filter(|p| !p.exists()) {
            warn!(
                "Config file {} does not exist, falling back to the default location",
                missing.display()
            );
        }

        let path = config_path
            .filter(|p| p.exists())
            .map(Path::to_path_buf)
            .or_else(default_config_path);

        let Some(path) = path else {
            return Ok(Self::default());
        };
        info!("Using configuration path: {}", path.display());

        let toml_config = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let mut config = Self::from_toml(&toml_config)?;
        config.path = Some(path);
        Ok(config)
    }

    pub fn from_toml(config: &str) -> Result<Self> {
        toml::from_str(config).map_err(|e| SyncError::config(e.to_string()))
    }
}

/// Connection parameters for one GitLab project.
#[derive(Clone, PartialEq)]
pub struct GitlabConfig {
    pub endpoint: String,
    pub token: Option<String>,
    pub project_id: String,
    pub proxy: Option<String>,
}

impl fmt::Debug for GitlabConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitlabConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "***redacted***"))
            .field("project_id", &self.project_id)
            .field("proxy", &self.proxy)
            .finish()
    }
}

impl GitlabConfig {
    pub fn new(
        endpoint: impl Into<String>,
        token: Option<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
            project_id: project_id.into(),
            proxy: None,
        }
    }
}

/// Values given on the command line or through environment variables.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub gitlab_url: Option<String>,
    pub gitlab_token: Option<String>,
    pub project_id: Option<String>,
    pub file: Option<PathBuf>,
    pub action: Action,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub gitlab: GitlabConfig,
    pub file: PathBuf,
    pub action: Action,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Resolves settings with precedence: flag or environment variable,
    /// then config file, then built-in default.
    pub fn resolve(overrides: SettingsOverrides, config: &ConfigFile) -> Result<Self> {
        let endpoint = non_empty(overrides.gitlab_url)
            .or_else(|| non_empty(config.gitlab_url.clone()))
            .unwrap_or_else(|| DEFAULT_GITLAB_URL.to_string());
        Url::parse(&endpoint)
            .map_err(|e| SyncError::config(format!("invalid GitLab URL '{endpoint}': {e}")))?;

        let token = match non_empty(overrides.gitlab_token) {
            Some(token) => Some(token),
            None => non_empty(config.gitlab_token.clone())
                .map(|t| expand_env_vars(t.trim()))
                .transpose()?,
        };

        let project_id = non_empty(overrides.project_id)
            .or_else(|| non_empty(config.project_id.clone()))
            .ok_or_else(|| SyncError::MissingSetting {
                name: "project-id".to_string(),
            })?;

        let file = overrides
            .file
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| config.file.clone())
            .ok_or_else(|| SyncError::MissingSetting {
                name: "file".to_string(),
            })?;

        let proxy = config
            .proxy
            .as_deref()
            .map(expand_env_vars)
            .transpose()?;

        Ok(Self {
            gitlab: GitlabConfig {
                endpoint,
                token,
                project_id: project_id.trim().to_string(),
                proxy,
            },
            file,
            action: overrides.action,
        })
    }
}
