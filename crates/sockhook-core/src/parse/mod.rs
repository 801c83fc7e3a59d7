pub mod class;
pub mod manifest;
pub mod route;
pub mod schema;

use crate::error::ParseError;
use manifest::RouteManifest;

/// Parse a route manifest from YAML.
pub fn from_yaml(input: &str) -> Result<RouteManifest, ParseError> {
    let manifest: RouteManifest = serde_yaml_ng::from_str(input)?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

/// Parse a route manifest from JSON.
pub fn from_json(input: &str) -> Result<RouteManifest, ParseError> {
    let manifest: RouteManifest = serde_json::from_str(input)?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

fn validate_manifest(manifest: &RouteManifest) -> Result<(), ParseError> {
    for (index, entry) in manifest.classes.iter().enumerate() {
        if entry.class.name.is_empty() {
            return Err(ParseError::MissingField(format!("classes[{index}].name")));
        }
        let class_name = &entry.class.name;

        if let Some(accepts) = entry.class.shared_accepts() {
            for (i, arg) in accepts.iter().enumerate() {
                if arg.param_name().is_none() {
                    return Err(ParseError::MissingField(format!(
                        "{class_name}.sharedCtor.accepts[{i}].name"
                    )));
                }
            }
        }

        for (r, route) in entry.routes.iter().enumerate() {
            if route.method.is_empty() {
                return Err(ParseError::MissingField(format!(
                    "{class_name}.routes[{r}].method"
                )));
            }
            for (i, arg) in route.accepts.iter().enumerate() {
                if arg.param_name().is_none() {
                    return Err(ParseError::MissingField(format!(
                        "{}.accepts[{i}].name",
                        route.method
                    )));
                }
            }
        }
    }
    Ok(())
}
