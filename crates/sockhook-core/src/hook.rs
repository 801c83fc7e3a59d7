use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::parse::route::Description;
use crate::parse::schema::{SchemaNode, SchemaType};

/// The converted form of one route: what a socket hook subscriber sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocketHookRecord {
    pub event: String,
    pub accepts: Vec<ParameterObject>,
    pub path: String,
    /// Normalized HTTP verb.
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
}

/// Where a documented parameter travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    FormData,
    Body,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::FormData => "formData",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A documented route parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterObject {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub required: bool,

    #[serde(flatten)]
    pub shape: ParameterShape,

    /// Properties of the referenced model, inlined for flat rendering.
    #[serde(rename = "modelParams", skip_serializing_if = "Option::is_none")]
    pub model_params: Option<IndexMap<String, ModelParam>>,

    #[serde(rename = "modelName", skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl ParameterObject {
    pub fn schema(&self) -> Option<&SchemaNode> {
        match &self.shape {
            ParameterShape::Schema { schema } => Some(schema),
            ParameterShape::Inline(_) => None,
        }
    }

    pub fn inline(&self) -> Option<&InlineSchema> {
        match &self.shape {
            ParameterShape::Inline(inline) => Some(inline),
            ParameterShape::Schema { .. } => None,
        }
    }
}

/// A parameter is described either by a nested schema (body parameters) or
/// by primitive fields merged onto the parameter itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterShape {
    Schema { schema: SchemaNode },
    Inline(InlineSchema),
}

/// Primitive schema fields carried directly by a non-body parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Format marking a string parameter that carries JSON-encoded content.
pub const JSON_FORMAT: &str = "JSON";

impl InlineSchema {
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            format: None,
            default_value: None,
            enum_values: Vec::new(),
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    /// A string the caller fills with a JSON-encoded value.
    pub fn json_string() -> Self {
        Self {
            format: Some(JSON_FORMAT.to_string()),
            ..Self::of_type(SchemaType::String)
        }
    }

    /// Lift the primitive fields of `schema`. `None` if the schema is untyped.
    pub fn from_primitive(schema: &SchemaNode) -> Option<Self> {
        let schema_type = schema.schema_type?;
        Some(Self {
            schema_type,
            format: schema.format.clone(),
            default_value: schema.default_value.clone(),
            enum_values: schema.enum_values.clone(),
            minimum: schema.minimum,
            maximum: schema.maximum,
            min_length: schema.min_length,
            max_length: schema.max_length,
            pattern: schema.pattern.clone(),
        })
    }
}

/// One property of an expanded model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelParam {
    #[serde(flatten)]
    pub schema: SchemaNode,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}
