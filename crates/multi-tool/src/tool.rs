use std::collections::HashMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::ToolError;

/// Outcome reported by a tool to the hosted reasoning loop.
///
/// Serialises as `{"status": "success", "report": ...}` or
/// `{"status": "error", "error_message": ...}`, so a result always carries
/// `status` and exactly one of the two payload fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolResult {
    Success { report: String },
    Error { error_message: String },
}

impl ToolResult {
    pub fn success<S: Into<String>>(report: S) -> Self {
        ToolResult::Success {
            report: report.into(),
        }
    }

    pub fn error<S: Into<String>>(error_message: S) -> Self {
        ToolResult::Error {
            error_message: error_message.into(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ToolResult::Success { report } => json!({ "status": "success", "report": report }),
            ToolResult::Error { error_message } => {
                json!({ "status": "error", "error_message": error_message })
            }
        }
    }
}

/// A function tool the hosted agent may call.
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// JSON schema of each parameter, keyed by parameter name
    pub parameters: HashMap<String, Value>,
    /// The function that powers the tool
    pub function: Box<dyn Fn(&Value) -> anyhow::Result<Value> + Send + Sync>,
}

impl Tool {
    pub fn new<N, D>(
        name: N,
        description: D,
        parameters: HashMap<String, Value>,
        function: impl Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            parameters,
            function: Box::new(function),
        }
    }

    /// Full object schema for the parameters; every parameter is required.
    pub fn schema(&self) -> Value {
        let mut required: Vec<&String> = self.parameters.keys().collect();
        required.sort();
        json!({
            "type": "object",
            "properties": self.parameters,
            "required": required,
        })
    }

    pub fn declaration(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.schema(),
        })
    }

    pub fn call(&self, args: &Value) -> anyhow::Result<Value> {
        (self.function)(args)
    }
}

impl Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("function", &"<function>")
            .finish()
    }
}

/// Extract a required string argument from a tool call.
pub fn string_arg<'a>(args: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidParameters(format!("{} parameter required", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(params: &Value) -> anyhow::Result<Value> {
        let city = string_arg(params, "city")?;
        Ok(ToolResult::success(format!("echo {}", city)).to_value())
    }

    fn city_parameter() -> HashMap<String, Value> {
        HashMap::from([(
            "city".to_string(),
            json!({
                "type": "string",
                "description": "The name of the city"
            }),
        )])
    }

    #[test]
    fn test_basic_tool_creation() {
        let tool = Tool::new("echo_city", "Echo the city", city_parameter(), echo);

        assert_eq!(tool.name, "echo_city");
        assert_eq!(tool.description, "Echo the city");
        assert_eq!(tool.parameters, city_parameter());

        let result = tool.call(&json!({"city": "Lisbon"})).unwrap();
        assert_eq!(result["status"], "success");
        assert_eq!(result["report"], "echo Lisbon");
    }

    #[test]
    fn test_missing_argument_is_an_invocation_error() {
        let tool = Tool::new("echo_city", "Echo the city", city_parameter(), echo);

        let err = tool.call(&json!({"town": "Lisbon"})).unwrap_err();
        assert!(err.to_string().contains("city parameter required"));
    }

    #[test]
    fn test_declaration_schema() {
        let tool = Tool::new("echo_city", "Echo the city", city_parameter(), echo);

        assert_eq!(
            tool.declaration(),
            json!({
                "name": "echo_city",
                "description": "Echo the city",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "city": {"type": "string", "description": "The name of the city"}
                    },
                    "required": ["city"]
                }
            })
        );
    }

    #[test]
    fn test_tool_debug_output() {
        let tool = Tool::new("test_tool", "Test description", HashMap::new(), |_| {
            Ok(json!({}))
        });

        let debug_output = format!("{:?}", tool);
        assert!(debug_output.contains("test_tool"));
        assert!(debug_output.contains("Test description"));
        assert!(debug_output.contains("<function>"));
    }

    #[test]
    fn test_result_carries_status_and_one_payload() {
        let success = ToolResult::success("all good").to_value();
        let object = success.as_object().unwrap();
        assert_eq!(object["status"], "success");
        assert!(object.contains_key("report"));
        assert!(!object.contains_key("error_message"));

        let error = ToolResult::error("nope").to_value();
        let object = error.as_object().unwrap();
        assert_eq!(object["status"], "error");
        assert!(object.contains_key("error_message"));
        assert!(!object.contains_key("report"));
    }

    #[test]
    fn test_result_serde_matches_to_value() {
        let result = ToolResult::error("nope");
        assert_eq!(serde_json::to_value(&result).unwrap(), result.to_value());

        let parsed: ToolResult =
            serde_json::from_value(json!({"status": "success", "report": "ok"})).unwrap();
        assert_eq!(parsed, ToolResult::success("ok"));
    }
}
