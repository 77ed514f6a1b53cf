pub mod csv_file;

use std::path::Path;
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::gitlab::client::V4Client;
use crate::gitlab::config::GitlabConfig;
use crate::gitlab::error::Result;
use crate::gitlab::model::Variable;
use crate::gitlab::traits::VariableOperations;

/// Outcome of an import. Failed rows do not stop the import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub failed: usize,
}

/// Synchronizes the variables of one GitLab project with a CSV file.
///
/// The boolean operations report HTTP status failures as `false`/`None` and
/// only return `Err` for transport, file and format errors. The `try_*`
/// variants expose the typed error for every failure.
#[derive(Clone)]
pub struct VariableSync {
    client: Arc<dyn VariableOperations>,
}

impl VariableSync {
    pub fn new(client: Arc<dyn VariableOperations>) -> Self {
        Self { client }
    }

    /// Builds a sync over the v4 REST API for the configured project.
    pub fn from_config(config: GitlabConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(V4Client::from_config(config)?)))
    }

    /// Value of the first variable whose key is `name`.
    pub async fn try_get_variable(&self, name: &str) -> Result<Option<String>> {
        let variables = self.client.list_variables().await?;
        Ok(variables
            .iter()
            .find(|v| v.key() == Some(name))
            .and_then(|v| v.value()))
    }

    /// Like [`Self::try_get_variable`], with an unexpected status treated as absent.
    pub async fn get_variable(&self, name: &str) -> Result<Option<String>> {
        match self.try_get_variable(name).await {
            Err(e) if e.is_http_status() => {
                warn!("Could not look up variable '{name}': {e}");
                Ok(None)
            }
            other => other,
        }
    }

    /// Exports every variable to `path` and returns the number of rows written.
    pub async fn try_export_variables_as_csv(&self, path: &Path) -> Result<usize> {
        let variables = self.client.list_variables().await?;
        let rows = csv_file::write_variables(path, &variables)?;
        info!("Exported {rows} variables to {}", path.display());
        Ok(rows)
    }

    /// Exports every variable to `path`. Returns `false` when GitLab answers
    /// the listing request with an unexpected status.
    ///
    /// A project without variables is an error: the header is taken from the
    /// first variable.
    pub async fn export_variables_as_csv(&self, path: &Path) -> Result<bool> {
        match self.try_export_variables_as_csv(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_http_status() => {
                error!("Export failed: {e}");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Creates one variable. Returns `true` only when GitLab answers 201 Created.
    pub async fn create_new_variable(&self, variable: &Variable) -> Result<bool> {
        match self.client.create_variable(variable).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_http_status() => {
                warn!("Could not create variable '{}': {e}", variable.key);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Creates one variable per data row of `path`, in file order.
    pub async fn try_import_variables_from_csv(&self, path: &Path) -> Result<ImportSummary> {
        let variables = csv_file::read_variables(path)?;
        debug!("Read {} rows from {}", variables.len(), path.display());

        let mut summary = ImportSummary::default();
        for variable in &variables {
            if self.create_new_variable(variable).await? {
                summary.created += 1;
            } else {
                summary.failed += 1;
            }
        }

        if summary.failed > 0 {
            warn!(
                "Imported {} of {} variables from {}",
                summary.created,
                variables.len(),
                path.display()
            );
        } else {
            info!("Imported {} variables from {}", summary.created, path.display());
        }
        Ok(summary)
    }

    /// Imports every data row of `path`. Returns `true` once all rows were
    /// sent, whether or not GitLab accepted them.
    pub async fn import_variables_from_csv(&self, path: &Path) -> Result<bool> {
        self.try_import_variables_from_csv(path).await.map(|_| true)
    }
}
