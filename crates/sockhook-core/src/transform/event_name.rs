use heck::ToLowerCamelCase;

const PROTOTYPE_SEGMENT: &str = "prototype";

/// Derive the socket hook event from a dotted method path.
///
/// Examples:
/// - `Widget.find` → `widget:find`
/// - `Widget.prototype.save` → `widget:save`
/// - `user.prototype.__get__profile` → `user:get:profile`
pub fn derive_event_name(method: &str) -> String {
    let mut event = String::new();
    let tokens = method
        .split('.')
        .filter(|segment| *segment != PROTOTYPE_SEGMENT)
        .flat_map(|segment| segment.split("__"))
        .filter(|token| !token.is_empty());

    for token in tokens {
        if !event.is_empty() {
            event.push(':');
        }
        event.push_str(&token.to_lower_camel_case());
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_method() {
        assert_eq!(derive_event_name("Widget.find"), "widget:find");
    }

    #[test]
    fn test_prototype_dropped() {
        assert_eq!(derive_event_name("Widget.prototype.save"), "widget:save");
    }

    #[test]
    fn test_relation_method() {
        assert_eq!(
            derive_event_name("user.prototype.__get__profile"),
            "user:get:profile"
        );
    }

    #[test]
    fn test_camel_cases_tokens() {
        assert_eq!(derive_event_name("Widget.findById"), "widget:findById");
        assert_eq!(
            derive_event_name("OrderItem.prototype.__create__line_items"),
            "orderItem:create:lineItems"
        );
    }

    #[test]
    fn test_empty_tokens_skipped() {
        assert_eq!(derive_event_name("Widget..count"), "widget:count");
        assert_eq!(derive_event_name("__Widget__"), "widget");
        assert_eq!(derive_event_name(""), "");
    }

    #[test]
    fn test_only_exact_prototype_dropped() {
        assert_eq!(
            derive_event_name("Widget.prototypes.list"),
            "widget:prototypes:list"
        );
    }
}
