use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

pub const DEFAULT_ENVIRONMENT_SCOPE: &str = "*";

/// Type of a CI/CD variable.
///
/// Names GitLab does not define are kept as `Other` and sent as written, so
/// the server decides whether to accept them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VariableType {
    #[default]
    EnvVar,
    File,
    Other(String),
}

impl VariableType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "env_var" => Self::EnvVar,
            "file" => Self::File,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::EnvVar => "env_var",
            Self::File => "file",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl Serialize for VariableType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VariableType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// A `protected`/`masked`/`raw` flag.
///
/// Values decoded from CSV keep the cell text verbatim and are sent to GitLab
/// as JSON strings; GitLab performs the boolean cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl Default for FlagValue {
    fn default() -> Self {
        FlagValue::Bool(false)
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        FlagValue::Text(value)
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{b}"),
            FlagValue::Text(s) => f.write_str(s),
        }
    }
}

/// A project-level CI/CD variable as sent to the create endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
    /// `None` is sent as `env_var`.
    #[serde(default)]
    pub variable_type: Option<VariableType>,
    #[serde(default)]
    pub protected: FlagValue,
    #[serde(default)]
    pub masked: FlagValue,
    #[serde(default)]
    pub raw: FlagValue,
    #[serde(default = "default_environment_scope")]
    pub environment_scope: String,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_environment_scope() -> String {
    DEFAULT_ENVIRONMENT_SCOPE.to_string()
}

impl Variable {
    /// An unprotected, unmasked `env_var` visible to every environment.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            variable_type: None,
            protected: FlagValue::default(),
            masked: FlagValue::default(),
            raw: FlagValue::default(),
            environment_scope: default_environment_scope(),
            description: None,
        }
    }

    pub fn effective_type(&self) -> VariableType {
        self.variable_type.clone().unwrap_or_default()
    }
}

/// One variable object exactly as the list endpoint returned it.
///
/// Field order is preserved so the exported CSV header follows the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableRecord(pub Map<String, Value>);

impl VariableRecord {
    pub fn key(&self) -> Option<&str> {
        self.0.get("key").and_then(Value::as_str)
    }

    pub fn value(&self) -> Option<String> {
        match self.0.get("value")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_variable_defaults() {
        let var = Variable::new("API_URL", "https://example.com");
        assert_eq!(var.effective_type(), VariableType::EnvVar);
        assert_eq!(var.environment_scope, "*");
        assert_eq!(var.protected, FlagValue::Bool(false));
        assert_eq!(var.description, None);
    }

    #[test]
    fn test_variable_type_names() {
        assert_eq!(VariableType::EnvVar.to_string(), "env_var");
        assert_eq!(VariableType::from_str("file").unwrap(), VariableType::File);
        assert_eq!(json!(VariableType::File), json!("file"));
    }

    #[test]
    fn test_unknown_variable_type_is_kept_verbatim() {
        let parsed = VariableType::from_str("ENV_VAR").unwrap();
        assert_eq!(parsed, VariableType::Other("ENV_VAR".to_string()));
        assert_eq!(parsed.to_string(), "ENV_VAR");
        assert_eq!(json!(parsed), json!("ENV_VAR"));

        let decoded: VariableType = serde_json::from_value(json!("secret")).unwrap();
        assert_eq!(decoded, VariableType::Other("secret".to_string()));
    }

    #[test]
    fn test_flag_values_serialize_verbatim() {
        assert_eq!(json!(FlagValue::Bool(true)), json!(true));
        assert_eq!(json!(FlagValue::Text("False".into())), json!("False"));
    }

    #[test]
    fn test_record_keeps_server_field_order() {
        let record: VariableRecord = serde_json::from_str(
            r#"{"variable_type":"env_var","key":"TOKEN","value":"abc","protected":false}"#,
        )
        .unwrap();
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(names, vec!["variable_type", "key", "value", "protected"]);
        assert_eq!(record.key(), Some("TOKEN"));
        assert_eq!(record.value().as_deref(), Some("abc"));
    }
}
