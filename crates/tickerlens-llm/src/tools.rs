//! Tool specifications offered to the model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Specification of a tool the model may call
///
/// Carries the name, a description the model uses to decide when to call
/// the tool, and a JSON Schema for the parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name (must be unique within a request)
    pub name: String,

    /// What the tool does, written for the model
    pub description: String,

    /// JSON schema for the tool's parameters
    pub parameters: Value,
}

impl ToolSpec {
    /// Create a new tool specification
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Helpers for building parameter schemas
pub mod schema {
    use serde_json::{Value, json};

    /// Object schema with the given properties and required field names
    pub fn object(properties: Value, required: Vec<&str>) -> Value {
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// String property schema
    pub fn string(description: &str) -> Value {
        json!({
            "type": "string",
            "description": description,
        })
    }

    /// Number property schema
    pub fn number(description: &str) -> Value {
        json!({
            "type": "number",
            "description": description,
        })
    }

    /// Integer property schema
    pub fn integer(description: &str) -> Value {
        json!({
            "type": "integer",
            "description": description,
        })
    }

    /// Boolean property schema
    pub fn boolean(description: &str) -> Value {
        json!({
            "type": "boolean",
            "description": description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_spec_creation() {
        let params = schema::object(
            json!({ "ticker": schema::string("Stock ticker symbol") }),
            vec!["ticker"],
        );

        let tool = ToolSpec::new("get_technical_data", "Fetch price data", params.clone());
        assert_eq!(tool.name, "get_technical_data");
        assert_eq!(tool.parameters, params);
    }

    #[test]
    fn test_schema_builders() {
        assert_eq!(schema::string("t")["type"], "string");
        assert_eq!(schema::number("n")["type"], "number");
        assert_eq!(schema::boolean("b")["type"], "boolean");
        assert_eq!(schema::integer("i")["type"], "integer");
    }
}
