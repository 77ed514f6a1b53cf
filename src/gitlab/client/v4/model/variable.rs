use serde::Serialize;

use crate::gitlab::model::{FlagValue, Variable, VariableType};

/// JSON body of `POST /projects/:id/variables`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVariableRequest<'a> {
    pub variable_type: VariableType,
    pub key: &'a str,
    pub value: &'a str,
    pub protected: &'a FlagValue,
    pub masked: &'a FlagValue,
    pub raw: &'a FlagValue,
    pub environment_scope: &'a str,
    pub description: Option<&'a str>,
}

impl<'a> From<&'a Variable> for CreateVariableRequest<'a> {
    fn from(v: &'a Variable) -> Self {
        CreateVariableRequest {
            variable_type: v.effective_type(),
            key: &v.key,
            value: &v.value,
            protected: &v.protected,
            masked: &v.masked,
            raw: &v.raw,
            environment_scope: &v.environment_scope,
            description: v.description.as_deref(),
        }
    }
}
