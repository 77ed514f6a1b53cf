use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Method, StatusCode};

use crate::gitlab::{
    error::{Result, SyncError},
    model::{Variable, VariableRecord},
    traits::VariableOperations,
};

use super::model::variable::CreateVariableRequest;
use super::V4Client;

/// Turns an unexpected status into a typed error, keeping the response body.
async fn status_error(response: reqwest::Response) -> SyncError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    SyncError::from_status(status, body)
}

#[async_trait]
impl VariableOperations for V4Client {
    async fn list_variables(&self) -> Result<Vec<VariableRecord>> {
        debug!("list_variables called");

        let path = self.variables_path();
        let response = self.base_api(Method::GET, &path)?.send().await?;
        if response.status() != StatusCode::OK {
            return Err(status_error(response).await);
        }

        let response_text = response.text().await?;

        let variables: Vec<VariableRecord> = match serde_json::from_str(&response_text) {
            Ok(variables) => variables,
            Err(e) => {
                error!("Failed to decode variable list response. Error: {e}");
                error!(
                    "Response body (first 500 chars): {}",
                    &response_text.chars().take(500).collect::<String>()
                );
                return Err(e.into());
            }
        };

        debug!("Fetched {} variables", variables.len());
        Ok(variables)
    }

    async fn create_variable(&self, variable: &Variable) -> Result<()> {
        debug!(
            "create_variable called for key: {} (scope {})",
            variable.key, variable.environment_scope
        );

        let path = self.variables_path();
        let response = self
            .base_api(Method::POST, &path)?
            .json(&CreateVariableRequest::from(variable))
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            return Err(status_error(response).await);
        }

        debug!("Created variable: {}", variable.key);
        Ok(())
    }
}
