use std::fs::File;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use dirs::{home_dir, state_dir};
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};

use gitlab_vars::gitlab::config::{Action, ConfigFile, Settings, SettingsOverrides};
use gitlab_vars::VariableSync;

/// Export the CI/CD variables of a GitLab project to CSV, or import them from CSV.
#[derive(Parser, Debug)]
pub struct SyncCommand {
    /// GitLab server URL [default: https://gitlab.com]
    #[clap(long, env = "GITLAB_URL")]
    pub gitlab_url: Option<String>,

    /// Access token sent in the PRIVATE-TOKEN header
    #[clap(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: Option<String>,

    /// Numeric project id or namespaced path (group/project)
    #[clap(long, env = "CI_PROJECT_ID")]
    pub project_id: Option<String>,

    /// CSV file to write on export or read on import
    #[clap(short, long, env = "CI_ACTION_FILE")]
    pub file: Option<PathBuf>,

    #[clap(long, env = "CI_ACTION", value_enum, default_value_t = Action::Export)]
    pub action: Action,

    /// TOML config file [default: ~/.config/gitlab-vars/config.toml]
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}

impl SyncCommand {
    pub async fn run(&self) -> Result<()> {
        // setup logging
        match std::env::var("GITLAB_VARS_LOG") {
            Ok(log_level) => setup_file_logging(&log_level)?,
            Err(_) => setup_term_logging()?,
        }

        let config = ConfigFile::from_file(self.config.as_deref())?;
        let settings = Settings::resolve(self.overrides(), &config)?;
        info!("Resolved settings: {settings:?}");

        let sync = VariableSync::from_config(settings.gitlab.clone())?;
        match settings.action {
            Action::Export => {
                if !sync.export_variables_as_csv(&settings.file).await? {
                    error!(
                        "Variables of project {} were not exported to {}",
                        settings.gitlab.project_id,
                        settings.file.display()
                    );
                }
            }
            Action::Import => {
                sync.import_variables_from_csv(&settings.file).await?;
            }
        }
        Ok(())
    }

    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            gitlab_url: self.gitlab_url.clone(),
            gitlab_token: self.gitlab_token.clone(),
            project_id: self.project_id.clone(),
            file: self.file.clone(),
            action: self.action,
        }
    }
}

/// Directory for log files, following the XDG Base Directory specification.
fn log_dir() -> Result<PathBuf> {
    state_dir()
        .or_else(|| home_dir().map(|home| home.join(".local").join("state")))
        .map(|dir| dir.join("gitlab-vars").join("logs"))
        .ok_or_else(|| anyhow!("HOME directory must be set to write log files"))
}

fn parse_level(log_level: &str) -> LevelFilter {
    match log_level.to_lowercase().as_str() {
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

fn setup_file_logging(log_level: &str) -> Result<()> {
    let log_dir = log_dir()?;
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join(format!(
        "gitlab-vars-{}.log",
        chrono::Local::now().format("%Y%m%d%H%M%S")
    ));

    WriteLogger::init(
        parse_level(log_level),
        Config::default(),
        File::create(&log_file_path)?,
    )?;

    // Log the file location so users know where to find it
    info!("Logging to: {}", log_file_path.display());

    Ok(())
}

fn setup_term_logging() -> Result<()> {
    TermLogger::init(
        LevelFilter::Warn,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}
