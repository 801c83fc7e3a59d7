use indexmap::IndexMap;

use crate::error::ConvertError;
use crate::hook::{InlineSchema, ModelParam, ParameterLocation, ParameterObject, ParameterShape};
use crate::parse::class::ClassDescriptor;
use crate::parse::route::{ArgumentSpec, RouteDescriptor};
use crate::parse::schema::SchemaNode;
use crate::registry::{SchemaBuilder, TypeRegistry};

use super::text::convert_text;

/// Argument name whose object payload stands for a whole instance of the
/// owning class.
const INSTANCE_DATA_ARG: &str = "data";

/// Everything a single argument mapping needs to know about its route.
#[derive(Clone, Copy)]
pub struct MappingContext<'a> {
    pub route: &'a RouteDescriptor,
    pub class: Option<&'a ClassDescriptor>,
    pub registry: &'a dyn TypeRegistry,
    pub schema_builder: &'a dyn SchemaBuilder,
    pub line_separator: &'a str,
}

/// Map one route argument to its documented parameter.
pub fn map_parameter(
    arg: &ArgumentSpec,
    ctx: &MappingContext<'_>,
) -> Result<ParameterObject, ConvertError> {
    let name = arg.param_name().ok_or_else(|| {
        ConvertError::MalformedInput(format!(
            "an argument of `{}` has neither `name` nor `arg`",
            ctx.route.method
        ))
    })?;

    let location = resolve_location(name, arg, ctx.route);
    let schema = ctx
        .schema_builder
        .build(&arg.type_descriptor, ctx.registry);

    let shape = match location {
        ParameterLocation::Body => ParameterShape::Schema {
            schema: body_schema(name, schema, ctx)?,
        },
        _ => ParameterShape::Inline(inline_schema(&schema)),
    };

    let mut param = ParameterObject {
        name: name.to_string(),
        location,
        description: convert_text(arg.description.as_ref(), ctx.line_separator),
        required: arg.required,
        shape,
        model_params: None,
        model_name: None,
    };

    if let Some(reference) = param.schema().and_then(|s| s.ref_path.clone()) {
        param.model_params = Some(expand_model(&reference, ctx.registry)?);
        param.model_name = Some(reference);
    }

    log::trace!(
        "{}: mapped `{}` to {}",
        ctx.route.method,
        param.name,
        param.location
    );
    Ok(param)
}

/// Decide where an argument travels on the wire.
///
/// An explicit `http.source` wins. Otherwise a `:name` placeholder in the
/// path makes it a path parameter, and anything else falls back to `query`
/// for GET routes and `formData` for the rest.
///
/// The placeholder check is a plain substring match, so `:id` also matches
/// a path containing `:identity`.
pub fn resolve_location(
    name: &str,
    arg: &ArgumentSpec,
    route: &RouteDescriptor,
) -> ParameterLocation {
    if let Some(location) = arg.http.location() {
        return location;
    }
    if route.path.contains(&format!(":{name}")) {
        return ParameterLocation::Path;
    }
    default_location(&route.verb)
}

fn default_location(verb: &str) -> ParameterLocation {
    if verb.eq_ignore_ascii_case("get") {
        ParameterLocation::Query
    } else {
        ParameterLocation::FormData
    }
}

fn body_schema(
    name: &str,
    schema: SchemaNode,
    ctx: &MappingContext<'_>,
) -> Result<SchemaNode, ConvertError> {
    if name != INSTANCE_DATA_ARG || !schema.is_object() {
        return Ok(schema);
    }
    let class = ctx.class.ok_or_else(|| {
        ConvertError::MalformedInput(format!(
            "`{}` takes an object `data` body but has no owning class",
            ctx.route.method
        ))
    })?;
    Ok(SchemaNode::reference(ctx.registry.reference(&class.name)))
}

/// Complex shapes can't travel as a plain non-body value, so callers send
/// them as a JSON-encoded string.
fn inline_schema(schema: &SchemaNode) -> InlineSchema {
    if schema.is_complex() {
        return InlineSchema::json_string();
    }
    InlineSchema::from_primitive(schema).unwrap_or_else(InlineSchema::json_string)
}

fn expand_model(
    reference: &str,
    registry: &dyn TypeRegistry,
) -> Result<IndexMap<String, ModelParam>, ConvertError> {
    let definition = registry.definition_by_type_name(reference)?;
    Ok(definition
        .properties
        .iter()
        .map(|(property, schema)| {
            let param = ModelParam {
                schema: schema.clone(),
                required: definition.is_required(property),
            };
            (property.clone(), param)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::parse::route::{ArgumentSource, HttpBinding, TypeDescriptor};
    use crate::parse::schema::SchemaType;
    use crate::registry::{ModelDefinition, ModelRegistry, TypeSchemaBuilder};

    fn registry() -> ModelRegistry {
        let mut properties = IndexMap::new();
        properties.insert("a".to_string(), SchemaNode::of_type(SchemaType::String));
        properties.insert("b".to_string(), SchemaNode::of_type(SchemaType::Number));
        let mut registry = ModelRegistry::new();
        registry.register(
            "Widget",
            ModelDefinition {
                properties,
                required: vec!["a".to_string()],
            },
        );
        registry.register("Part", ModelDefinition::default());
        registry
    }

    fn map(
        arg: ArgumentSpec,
        route: &RouteDescriptor,
        class: Option<&ClassDescriptor>,
        registry: &ModelRegistry,
    ) -> Result<ParameterObject, ConvertError> {
        let ctx = MappingContext {
            route,
            class,
            registry,
            schema_builder: &TypeSchemaBuilder,
            line_separator: "\n",
        };
        map_parameter(&arg, &ctx)
    }

    #[test]
    fn test_get_defaults_to_query() {
        let route = RouteDescriptor::new("Widget.count", "GET", "/widgets/count");
        let param = map(
            ArgumentSpec::named("where").with_type(TypeDescriptor::named("string")),
            &route,
            None,
            &registry(),
        )
        .unwrap();
        assert_eq!(param.location, ParameterLocation::Query);
        assert_eq!(param.inline().unwrap().schema_type, SchemaType::String);
    }

    #[test]
    fn test_other_verbs_default_to_form_data() {
        let route = RouteDescriptor::new("Widget.create", "post", "/widgets");
        let param = map(
            ArgumentSpec::named("name").with_type(TypeDescriptor::named("string")),
            &route,
            None,
            &registry(),
        )
        .unwrap();
        assert_eq!(param.location, ParameterLocation::FormData);
    }

    #[test]
    fn test_path_placeholder_overrides_default() {
        let route = RouteDescriptor::new("Widget.findById", "get", "/widgets/:id");
        let param = map(
            ArgumentSpec::named("id")
                .with_type(TypeDescriptor::named("number"))
                .required(),
            &route,
            None,
            &registry(),
        )
        .unwrap();
        assert_eq!(param.location, ParameterLocation::Path);
        assert!(param.required);
        assert_eq!(param.inline().unwrap().schema_type, SchemaType::Number);
    }

    #[test]
    fn test_path_match_is_plain_substring() {
        let route = RouteDescriptor::new("Widget.byIdentity", "get", "/widgets/:identity");
        assert_eq!(
            resolve_location("id", &ArgumentSpec::named("id"), &route),
            ParameterLocation::Path
        );
    }

    #[test]
    fn test_http_source_has_highest_precedence() {
        let route = RouteDescriptor::new("Widget.findById", "get", "/widgets/:id");
        let arg = ArgumentSpec::named("id")
            .with_http(HttpBinding::BoundTo(ArgumentSource::Header))
            .with_type(TypeDescriptor::named("string"));
        let param = map(arg, &route, None, &registry()).unwrap();
        assert_eq!(param.location, ParameterLocation::Header);
    }

    #[test]
    fn test_object_in_form_data_degrades_to_json_string() {
        let route = RouteDescriptor::new("Widget.upsert", "put", "/widgets");
        let param = map(
            ArgumentSpec::named("options").with_type(TypeDescriptor::named("object")),
            &route,
            None,
            &registry(),
        )
        .unwrap();
        assert_eq!(param.location, ParameterLocation::FormData);
        assert_eq!(param.inline(), Some(&InlineSchema::json_string()));
        assert!(param.model_params.is_none());
    }

    #[test]
    fn test_array_and_reference_degrade_outside_body() {
        let route = RouteDescriptor::new("Widget.find", "get", "/widgets");
        let registry = registry();
        for descriptor in [TypeDescriptor::array_of("string"), TypeDescriptor::named("Widget")] {
            let param = map(
                ArgumentSpec::named("filter").with_type(descriptor),
                &route,
                None,
                &registry,
            )
            .unwrap();
            assert_eq!(param.inline(), Some(&InlineSchema::json_string()));
            assert!(param.model_name.is_none());
        }
    }

    #[test]
    fn test_formatted_primitive_is_merged() {
        let route = RouteDescriptor::new("Widget.since", "get", "/widgets/since");
        let param = map(
            ArgumentSpec::named("from").with_type(TypeDescriptor::named("date")),
            &route,
            None,
            &registry(),
        )
        .unwrap();
        let inline = param.inline().unwrap();
        assert_eq!(inline.schema_type, SchemaType::String);
        assert_eq!(inline.format.as_deref(), Some("date-time"));
    }

    #[test]
    fn test_data_body_references_owning_class() {
        let route = RouteDescriptor::new("Widget.create", "post", "/widgets");
        let class = ClassDescriptor::new("Widget");
        let arg = ArgumentSpec::named("data")
            .with_type(TypeDescriptor::named("object"))
            .with_http(HttpBinding::BoundTo(ArgumentSource::Body));
        let param = map(arg, &route, Some(&class), &registry()).unwrap();

        assert_eq!(param.location, ParameterLocation::Body);
        assert_eq!(
            param.schema().and_then(|s| s.ref_path.as_deref()),
            Some("#/definitions/Widget")
        );
        assert_eq!(param.model_name.as_deref(), Some("#/definitions/Widget"));
    }

    #[test]
    fn test_model_expansion_marks_required() {
        let route = RouteDescriptor::new("Widget.create", "post", "/widgets");
        let class = ClassDescriptor::new("Widget");
        let arg = ArgumentSpec::named("data")
            .with_type(TypeDescriptor::named("object"))
            .with_http(HttpBinding::BoundTo(ArgumentSource::Body));
        let param = map(arg, &route, Some(&class), &registry()).unwrap();

        let model_params = param.model_params.unwrap();
        assert_eq!(model_params.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(model_params["a"].required);
        assert!(!model_params["b"].required);
        assert_eq!(model_params["b"].schema.schema_type, Some(SchemaType::Number));
    }

    #[test]
    fn test_other_body_uses_own_schema() {
        let route = RouteDescriptor::new(
            "Widget.prototype.__create__parts",
            "post",
            "/widgets/:id/parts",
        );
        let class = ClassDescriptor::new("Widget");
        let arg = ArgumentSpec::named("part")
            .with_type(TypeDescriptor::named("Part"))
            .with_http(HttpBinding::BoundTo(ArgumentSource::Body));
        let param = map(arg, &route, Some(&class), &registry()).unwrap();

        assert_eq!(param.model_name.as_deref(), Some("#/definitions/Part"));
        assert!(param.model_params.unwrap().is_empty());
    }

    #[test]
    fn test_data_body_with_primitive_schema_kept() {
        let route = RouteDescriptor::new("Widget.rename", "post", "/widgets/rename");
        let arg = ArgumentSpec::named("data")
            .with_type(TypeDescriptor::named("string"))
            .with_http(HttpBinding::BoundTo(ArgumentSource::Body));
        let param = map(arg, &route, None, &registry()).unwrap();
        assert_eq!(
            param.schema(),
            Some(&SchemaNode::of_type(SchemaType::String))
        );
        assert!(param.model_params.is_none());
    }

    #[test]
    fn test_unknown_class_reference_is_lookup_failure() {
        let route = RouteDescriptor::new("Gadget.create", "post", "/gadgets");
        let class = ClassDescriptor::new("Gadget");
        let arg = ArgumentSpec::named("data")
            .with_type(TypeDescriptor::named("object"))
            .with_http(HttpBinding::BoundTo(ArgumentSource::Body));
        let err = map(arg, &route, Some(&class), &registry()).unwrap_err();
        match err {
            ConvertError::Lookup(LookupError::UnknownType(reference)) => {
                assert_eq!(reference, "#/definitions/Gadget");
            }
            other => panic!("expected lookup failure, got {other:?}"),
        }
    }

    #[test]
    fn test_data_body_without_class_is_malformed() {
        let route = RouteDescriptor::new("Widget.create", "post", "/widgets");
        let arg = ArgumentSpec::named("data")
            .with_type(TypeDescriptor::named("object"))
            .with_http(HttpBinding::BoundTo(ArgumentSource::Body));
        let err = map(arg, &route, None, &registry()).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput(_)));
    }

    #[test]
    fn test_unnamed_argument_is_malformed() {
        let route = RouteDescriptor::new("Widget.find", "get", "/widgets");
        let err = map(ArgumentSpec::default(), &route, None, &registry()).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput(_)));
    }

    #[test]
    fn test_description_converted() {
        let route = RouteDescriptor::new("Widget.find", "get", "/widgets");
        let arg = ArgumentSpec::named("filter")
            .with_type(TypeDescriptor::named("string"))
            .with_description("  Filter defining fields  ");
        let param = map(arg, &route, None, &registry()).unwrap();
        assert_eq!(param.description.as_deref(), Some("Filter defining fields"));
        assert!(!param.required);
    }
}
