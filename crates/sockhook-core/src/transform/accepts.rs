use crate::parse::class::ClassDescriptor;
use crate::parse::route::{ArgumentSpec, RouteDescriptor};

/// Collect the arguments of `route` that should be documented.
///
/// Instance methods (more than two method segments, e.g.
/// `Widget.prototype.save`) also receive the class's shared constructor
/// arguments, appended after the route's own. Arguments computed by the
/// framework or bound to `req`/`res`/`context` are dropped.
pub fn extract_arguments<'a>(
    route: &'a RouteDescriptor,
    class: Option<&'a ClassDescriptor>,
) -> Vec<&'a ArgumentSpec> {
    let shared: &[ArgumentSpec] = match class.and_then(ClassDescriptor::shared_accepts) {
        Some(accepts) if is_instance_method(&route.method) => accepts,
        _ => &[],
    };

    route
        .accepts
        .iter()
        .chain(shared)
        .filter(|arg| !arg.http.is_hidden())
        .collect()
}

fn is_instance_method(method: &str) -> bool {
    method.split('.').count() > 2
}
