use serde_json::Value;

use super::TypeRegistry;
use crate::parse::route::TypeDescriptor;
use crate::parse::schema::{SchemaNode, SchemaType};

/// Turns an argument's type descriptor into a canonical schema.
pub trait SchemaBuilder {
    fn build(&self, descriptor: &TypeDescriptor, registry: &dyn TypeRegistry) -> SchemaNode;
}

/// Schema builder for framework type names.
///
/// - `string`, `number`, `integer`, `boolean` map to the matching primitive
/// - `date` is a `date-time` string, `buffer` a `byte` string
/// - `any`, `object` and inline object descriptors are objects
/// - `array` is an array of anything, `[T]` an array of `T`
/// - names known to the registry become references
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeSchemaBuilder;

impl SchemaBuilder for TypeSchemaBuilder {
    fn build(&self, descriptor: &TypeDescriptor, registry: &dyn TypeRegistry) -> SchemaNode {
        build_value(&descriptor.0, registry)
    }
}

fn build_value(value: &Value, registry: &dyn TypeRegistry) -> SchemaNode {
    match value {
        Value::String(name) => build_named(name, registry),
        Value::Array(items) => {
            let item = items
                .first()
                .map(|item| build_value(item, registry))
                .unwrap_or_default();
            SchemaNode::array_of(item)
        }
        Value::Null | Value::Object(_) => SchemaNode::of_type(SchemaType::Object),
        other => {
            log::warn!("unsupported type descriptor {other}, treating as object");
            SchemaNode::of_type(SchemaType::Object)
        }
    }
}

fn build_named(name: &str, registry: &dyn TypeRegistry) -> SchemaNode {
    match name.to_lowercase().as_str() {
        "string" => SchemaNode::of_type(SchemaType::String),
        "number" => SchemaNode::of_type(SchemaType::Number),
        "integer" => SchemaNode::of_type(SchemaType::Integer),
        "boolean" => SchemaNode::of_type(SchemaType::Boolean),
        "date" => SchemaNode::of_type(SchemaType::String).with_format("date-time"),
        "buffer" => SchemaNode::of_type(SchemaType::String).with_format("byte"),
        "any" | "object" => SchemaNode::of_type(SchemaType::Object),
        "array" => SchemaNode::array_of(SchemaNode::default()),
        _ if registry.is_defined(name) => SchemaNode::reference(registry.reference(name)),
        _ => {
            log::warn!("unknown type `{name}`, treating as object");
            SchemaNode::of_type(SchemaType::Object)
        }
    }
}
