pub mod schema_builder;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::LookupError;
use crate::parse::schema::SchemaNode;

pub use schema_builder::{SchemaBuilder, TypeSchemaBuilder};

/// Default prefix for model references.
pub const DEFAULT_REFERENCE_PREFIX: &str = "#/definitions/";

/// The shape of a named model: its properties and which of them are required.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ModelDefinition {
    #[serde(default)]
    pub properties: IndexMap<String, SchemaNode>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl ModelDefinition {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

/// Read-only registry of named model shapes.
pub trait TypeRegistry {
    /// The reference string pointing at `type_name`.
    fn reference(&self, type_name: &str) -> String;

    fn is_defined(&self, type_name: &str) -> bool;

    /// Resolve a definition from a reference produced by [`TypeRegistry::reference`].
    fn definition_by_type_name(&self, reference: &str) -> Result<&ModelDefinition, LookupError>;
}

/// In-memory [`TypeRegistry`] keyed by model name.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    prefix: String,
    definitions: IndexMap<String, ModelDefinition>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_REFERENCE_PREFIX)
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            definitions: IndexMap::new(),
        }
    }

    pub fn with_models(mut self, models: &IndexMap<String, ModelDefinition>) -> Self {
        for (name, definition) in models {
            self.register(name.clone(), definition.clone());
        }
        self
    }

    pub fn register(&mut self, name: impl Into<String>, definition: ModelDefinition) {
        let name = name.into();
        if self.definitions.insert(name.clone(), definition).is_some() {
            log::warn!("model `{name}` registered twice, keeping the last definition");
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl TypeRegistry for ModelRegistry {
    fn reference(&self, type_name: &str) -> String {
        format!("{}{}", self.prefix, type_name)
    }

    fn is_defined(&self, type_name: &str) -> bool {
        self.definitions.contains_key(type_name)
    }

    fn definition_by_type_name(&self, reference: &str) -> Result<&ModelDefinition, LookupError> {
        let name = reference.strip_prefix(&self.prefix).unwrap_or(reference);
        self.definitions
            .get(name)
            .ok_or_else(|| LookupError::UnknownType(reference.to_string()))
    }
}
