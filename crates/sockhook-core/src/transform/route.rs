use crate::error::ConvertError;
use crate::hook::SocketHookRecord;
use crate::parse::class::ClassDescriptor;
use crate::parse::manifest::RouteManifest;
use crate::parse::route::RouteDescriptor;
use crate::registry::{
    DEFAULT_REFERENCE_PREFIX, ModelRegistry, SchemaBuilder, TypeRegistry, TypeSchemaBuilder,
};

use super::accepts::extract_arguments;
use super::event_name::derive_event_name;
use super::parameter::{MappingContext, map_parameter};
use super::text::DEFAULT_LINE_SEPARATOR;
use super::verb::normalize_verb;

/// Converts route descriptors into socket hook records against a fixed set
/// of read-only collaborators.
pub struct RouteConverter<'a> {
    registry: &'a dyn TypeRegistry,
    schema_builder: &'a dyn SchemaBuilder,
    line_separator: String,
}

impl<'a> RouteConverter<'a> {
    pub fn new(registry: &'a dyn TypeRegistry) -> Self {
        Self {
            registry,
            schema_builder: &TypeSchemaBuilder,
            line_separator: DEFAULT_LINE_SEPARATOR.to_string(),
        }
    }

    pub fn with_schema_builder(mut self, schema_builder: &'a dyn SchemaBuilder) -> Self {
        self.schema_builder = schema_builder;
        self
    }

    pub fn with_line_separator(mut self, line_separator: impl Into<String>) -> Self {
        self.line_separator = line_separator.into();
        self
    }

    /// Convert one route. Any failure aborts the whole route.
    pub fn convert(
        &self,
        route: &RouteDescriptor,
        class: Option<&ClassDescriptor>,
    ) -> Result<SocketHookRecord, ConvertError> {
        if route.method.is_empty() {
            return Err(ConvertError::MalformedInput(format!(
                "route `{} {}` has an empty method",
                route.verb, route.path
            )));
        }

        let ctx = MappingContext {
            route,
            class,
            registry: self.registry,
            schema_builder: self.schema_builder,
            line_separator: &self.line_separator,
        };
        let accepts = extract_arguments(route, class)
            .into_iter()
            .map(|arg| map_parameter(arg, &ctx))
            .collect::<Result<Vec<_>, _>>()?;

        let record = SocketHookRecord {
            event: derive_event_name(&route.method),
            accepts,
            path: route.path.clone(),
            method: normalize_verb(&route.verb),
            description: route.description.clone(),
        };
        log::debug!(
            "{} → {} ({} parameters)",
            route.method,
            record.event,
            record.accepts.len()
        );
        Ok(record)
    }
}

/// Convert one route with the default schema builder.
pub fn convert_route(
    route: &RouteDescriptor,
    class: Option<&ClassDescriptor>,
    registry: &dyn TypeRegistry,
) -> Result<SocketHookRecord, ConvertError> {
    RouteConverter::new(registry).convert(route, class)
}

/// Options for converting a whole manifest.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub reference_prefix: String,
    pub line_separator: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
            line_separator: DEFAULT_LINE_SEPARATOR.to_string(),
        }
    }
}

/// Convert every route of every class in `manifest`, in declaration order.
pub fn convert_manifest(
    manifest: &RouteManifest,
    options: &ConvertOptions,
) -> Result<Vec<SocketHookRecord>, ConvertError> {
    let registry =
        ModelRegistry::with_prefix(options.reference_prefix.clone()).with_models(&manifest.models);
    let converter =
        RouteConverter::new(&registry).with_line_separator(options.line_separator.clone());

    let mut records = Vec::with_capacity(manifest.route_count());
    for entry in &manifest.classes {
        for route in &entry.routes {
            records.push(converter.convert(route, Some(&entry.class))?);
        }
    }
    log::debug!(
        "converted {} routes across {} classes against {} models",
        records.len(),
        manifest.classes.len(),
        registry.len()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::ParameterLocation;
    use crate::parse::route::{ArgumentSource, ArgumentSpec, HttpBinding, TypeDescriptor};
    use crate::parse::schema::{SchemaNode, SchemaType};
    use crate::registry::ModelDefinition;

    fn registry() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        let mut widget = ModelDefinition::default();
        widget
            .properties
            .insert("name".to_string(), SchemaNode::of_type(SchemaType::String));
        registry.register("Widget", widget);
        registry
    }

    fn widget_class() -> ClassDescriptor {
        ClassDescriptor::new("Widget").with_shared_ctor(vec![
            ArgumentSpec::named("id")
                .with_type(TypeDescriptor::named("number"))
                .required(),
        ])
    }

    #[test]
    fn test_convert_instance_method() {
        let route =
            RouteDescriptor::new("Widget.prototype.updateAttributes", "PUT", "/widgets/:id")
                .with_description("Update attributes of a widget.")
                .with_accepts(vec![
                    ArgumentSpec::named("data")
                        .with_type(TypeDescriptor::named("object"))
                        .with_http(HttpBinding::BoundTo(ArgumentSource::Body)),
                    ArgumentSpec::named("options").with_http(HttpBinding::Derived),
                ]);
        let registry = registry();
        let record = convert_route(&route, Some(&widget_class()), &registry).unwrap();

        assert_eq!(record.event, "widget:updateAttributes");
        assert_eq!(record.method, "put");
        assert_eq!(record.path, "/widgets/:id");
        assert_eq!(record.accepts.len(), 2);
        assert_eq!(record.accepts[0].name, "data");
        assert_eq!(record.accepts[0].location, ParameterLocation::Body);
        assert_eq!(record.accepts[1].name, "id");
        assert_eq!(record.accepts[1].location, ParameterLocation::Path);
    }

    #[test]
    fn test_convert_static_method_skips_shared_ctor() {
        let route = RouteDescriptor::new("Widget.find", "all", "/widgets");
        let registry = registry();
        let record = convert_route(&route, Some(&widget_class()), &registry).unwrap();
        assert_eq!(record.event, "widget:find");
        assert_eq!(record.method, "post");
        assert!(record.accepts.is_empty());
        assert!(record.description.is_none());
    }

    #[test]
    fn test_empty_method_is_malformed() {
        let route = RouteDescriptor::new("", "get", "/widgets");
        let registry = registry();
        let err = convert_route(&route, None, &registry).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput(_)));
    }

    #[test]
    fn test_conversion_is_repeatable() {
        let route = RouteDescriptor::new("Widget.prototype.save", "post", "/widgets/:id/save")
            .with_accepts(vec![
                ArgumentSpec::named("data")
                    .with_type(TypeDescriptor::named("object"))
                    .with_http(HttpBinding::BoundTo(ArgumentSource::Body)),
            ]);
        let registry = registry();
        let class = widget_class();
        let converter = RouteConverter::new(&registry);
        let first = converter.convert(&route, Some(&class)).unwrap();
        let second = converter.convert(&route, Some(&class)).unwrap();
        assert_eq!(first, second);
    }

    struct StringOnly;

    impl SchemaBuilder for StringOnly {
        fn build(&self, _: &TypeDescriptor, _: &dyn TypeRegistry) -> SchemaNode {
            SchemaNode::of_type(SchemaType::String)
        }
    }

    #[test]
    fn test_custom_schema_builder() {
        let route = RouteDescriptor::new("Widget.find", "get", "/widgets")
            .with_accepts(vec![
                ArgumentSpec::named("filter").with_type(TypeDescriptor::named("object")),
            ]);
        let registry = registry();
        let record = RouteConverter::new(&registry)
            .with_schema_builder(&StringOnly)
            .convert(&route, None)
            .unwrap();
        let inline = record.accepts[0].inline().unwrap();
        assert_eq!(inline.schema_type, SchemaType::String);
        assert!(inline.format.is_none());
    }
}
