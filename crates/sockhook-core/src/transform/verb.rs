/// Map an HTTP verb alias to its canonical lowercase form.
///
/// `all` becomes `post` and `del` becomes `delete`; anything else is just
/// lower-cased.
pub fn normalize_verb(verb: &str) -> String {
    let lower = verb.to_lowercase();
    match lower.as_str() {
        "all" => "post".to_string(),
        "del" => "delete".to_string(),
        _ => lower,
    }
}
