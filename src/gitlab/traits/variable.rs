use async_trait::async_trait;

use crate::gitlab::error::Result;
use crate::gitlab::model::{Variable, VariableRecord};

/// Project variable endpoints of the GitLab API.
#[async_trait]
pub trait VariableOperations: Send + Sync {
    /// Every variable of the project, in the order the server returned them.
    async fn list_variables(&self) -> Result<Vec<VariableRecord>>;
    /// Creates one variable. Any status other than 201 Created is an error.
    async fn create_variable(&self, variable: &Variable) -> Result<()>;
}
