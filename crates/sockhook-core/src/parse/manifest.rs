use indexmap::IndexMap;
use serde::Deserialize;

use super::class::ClassDescriptor;
use super::route::RouteDescriptor;
use crate::registry::ModelDefinition;

/// Everything needed to convert an application's routes: the named model
/// definitions backing the type registry and the classes exposing routes.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RouteManifest {
    #[serde(default)]
    pub models: IndexMap<String, ModelDefinition>,
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
}

impl RouteManifest {
    pub fn route_count(&self) -> usize {
        self.classes.iter().map(|c| c.routes.len()).sum()
    }
}

/// A class descriptor together with the routes it exposes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassEntry {
    #[serde(flatten)]
    pub class: ClassDescriptor,
    #[serde(default)]
    pub routes: Vec<RouteDescriptor>,
}
