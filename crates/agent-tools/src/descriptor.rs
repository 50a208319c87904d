//! Typed tool descriptors and argument validation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{Result, ToolError};

/// JSON value types a parameter or result may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    /// No constraint
    Any,
}

impl ValueType {
    /// Whether `value` is of this type
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Any => true,
        }
    }

    /// JSON Schema type name
    pub fn schema_name(self) -> Option<&'static str> {
        match self {
            Self::String => Some("string"),
            Self::Integer => Some("integer"),
            Self::Number => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::Array => Some("array"),
            Self::Object => Some("object"),
            Self::Any => None,
        }
    }

    /// Read the `type` of a JSON Schema fragment
    pub fn from_schema(schema: &Value) -> Self {
        match schema.get("type").and_then(Value::as_str) {
            Some("string") => Self::String,
            Some("integer") => Self::Integer,
            Some("number") => Self::Number,
            Some("boolean") => Self::Boolean,
            Some("array") => Self::Array,
            Some("object") => Self::Object,
            _ => Self::Any,
        }
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub value_type: ValueType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSpec {
    /// A required parameter
    pub fn required(name: impl Into<String>, value_type: ValueType, description: &str) -> Self {
        Self {
            name: name.into(),
            value_type,
            required: true,
            description: Some(description.to_string()),
        }
    }

    /// An optional parameter
    pub fn optional(name: impl Into<String>, value_type: ValueType, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, value_type, description)
        }
    }
}

/// Name, parameter schema and return type of a tool
///
/// Parameters keep their declaration order; that order is what a model
/// sees in the generated JSON Schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    pub returns: ValueType,
}

impl ToolDescriptor {
    /// Create a descriptor with no parameters returning an object
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            returns: ValueType::Object,
        }
    }

    /// Declare a parameter
    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    /// Declare the return type
    pub fn returns(mut self, value_type: ValueType) -> Self {
        self.returns = value_type;
        self
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// The only required string parameter, if the tool has exactly one
    ///
    /// Used to feed free text into a tool when no structured arguments
    /// are available.
    pub fn sole_text_parameter(&self) -> Option<&ParameterSpec> {
        let mut required = self.parameters.iter().filter(|p| p.required);
        match (required.next(), required.next()) {
            (Some(p), None) if p.value_type == ValueType::String => Some(p),
            _ => None,
        }
    }

    /// Arguments object feeding `text` into the sole text parameter
    pub fn text_arguments(&self, text: &str) -> Option<Value> {
        self.sole_text_parameter().map(|p| {
            let mut args = Map::new();
            args.insert(p.name.clone(), Value::String(text.to_string()));
            Value::Object(args)
        })
    }

    /// Check `args` against the declared parameters
    ///
    /// `null` is treated as "no arguments"; optional parameters set to
    /// `null` are dropped. Undeclared keys are passed through untouched.
    pub fn validate(&self, args: Value) -> Result<Map<String, Value>> {
        let mut args = match args {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(ToolError::invalid(
                    &self.name,
                    format!("expected an object of arguments, got {other}"),
                ));
            }
        };

        for spec in &self.parameters {
            let present = args.get(&spec.name).is_some_and(|v| !v.is_null());
            if !present {
                if spec.required {
                    return Err(ToolError::invalid(
                        &self.name,
                        format!("missing required parameter '{}'", spec.name),
                    ));
                }
                args.remove(&spec.name);
                continue;
            }

            if let Some(value) = args.get(&spec.name) {
                if !spec.value_type.matches(value) {
                    return Err(ToolError::invalid(
                        &self.name,
                        format!(
                            "parameter '{}' must be of type {:?}",
                            spec.name, spec.value_type
                        ),
                    ));
                }
            }
        }

        Ok(args)
    }

    /// JSON Schema of the parameters, for model tool definitions
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for spec in &self.parameters {
            let mut prop = Map::new();
            if let Some(ty) = spec.value_type.schema_name() {
                prop.insert("type".into(), json!(ty));
            }
            if let Some(description) = &spec.description {
                prop.insert("description".into(), json!(description));
            }
            properties.insert(spec.name.clone(), Value::Object(prop));
        }

        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Rebuild a descriptor from a JSON Schema published by a remote server
    pub fn from_input_schema(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: &Value,
    ) -> Self {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let parameters = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(key, prop)| ParameterSpec {
                        name: key.clone(),
                        value_type: ValueType::from_schema(prop),
                        required: required.contains(&key.as_str()),
                        description: prop
                            .get("description")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            returns: ValueType::Any,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_object() -> ToolDescriptor {
        ToolDescriptor::new("create_object", "Create an object")
            .param(ParameterSpec::required("bucket", ValueType::String, "Bucket"))
            .param(ParameterSpec::required("name", ValueType::String, "Object name"))
            .param(ParameterSpec::required("content", ValueType::String, "Body"))
            .param(ParameterSpec::optional("overwrite", ValueType::Boolean, "Replace"))
    }

    #[test]
    fn test_validate_accepts_valid_args() {
        let args = create_object()
            .validate(json!({"bucket": "b", "name": "n", "content": "c"}))
            .unwrap();
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_validate_missing_required() {
        let err = create_object()
            .validate(json!({"bucket": "b", "content": "c"}))
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::invalid("create_object", "missing required parameter 'name'")
        );
    }

    #[test]
    fn test_validate_type_mismatch() {
        let err = create_object()
            .validate(json!({"bucket": "b", "name": 7, "content": "c"}))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument { .. }));
    }

    #[test]
    fn test_validate_drops_null_optional() {
        let args = create_object()
            .validate(json!({"bucket": "b", "name": "n", "content": "c", "overwrite": null}))
            .unwrap();
        assert!(!args.contains_key("overwrite"));
    }

    #[test]
    fn test_validate_rejects_non_object() {
        assert!(create_object().validate(json!(["b"])).is_err());
        assert!(ToolDescriptor::new("noop", "").validate(Value::Null).is_ok());
    }

    #[test]
    fn test_integer_is_not_float() {
        assert!(ValueType::Integer.matches(&json!(3)));
        assert!(!ValueType::Integer.matches(&json!(3.5)));
        assert!(ValueType::Number.matches(&json!(3.5)));
    }

    #[test]
    fn test_input_schema_round_trip() {
        let desc = create_object();
        let schema = desc.input_schema();
        assert_eq!(schema["required"], json!(["bucket", "name", "content"]));
        assert_eq!(schema["properties"]["overwrite"]["type"], "boolean");

        let rebuilt = ToolDescriptor::from_input_schema("create_object", "Create", &schema);
        assert_eq!(rebuilt.parameters.len(), 4);
        assert!(rebuilt.parameter("bucket").unwrap().required);
        assert!(!rebuilt.parameter("overwrite").unwrap().required);
    }

    #[test]
    fn test_sole_text_parameter() {
        let fetch = ToolDescriptor::new("get_news_article", "Fetch")
            .param(ParameterSpec::required("article_url", ValueType::String, "URL"));
        assert_eq!(fetch.sole_text_parameter().unwrap().name, "article_url");
        assert_eq!(
            fetch.text_arguments("https://example.com/a"),
            Some(json!({"article_url": "https://example.com/a"}))
        );
        assert!(create_object().sole_text_parameter().is_none());
        assert!(create_object().text_arguments("x").is_none());
    }
}
