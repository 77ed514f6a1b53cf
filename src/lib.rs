//! Export and import GitLab CI/CD project variables as CSV.

pub mod gitlab;
pub mod sync;

pub use gitlab::config::{Action, ConfigFile, GitlabConfig, Settings};
pub use gitlab::error::SyncError;
pub use gitlab::model::{FlagValue, Variable, VariableRecord, VariableType};
pub use sync::{ImportSummary, VariableSync};
