use crate::parse::route::Description;

/// Default separator between the lines of a multi-line description.
pub const DEFAULT_LINE_SEPARATOR: &str = "\n";

/// Normalize free-form description text.
///
/// Multi-line descriptions are joined with `line_separator`, the result is
/// trimmed, and blank descriptions are dropped.
pub fn convert_text(description: Option<&Description>, line_separator: &str) -> Option<String> {
    let text = match description? {
        Description::Text(text) => text.trim().to_string(),
        Description::Lines(lines) => lines
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join(line_separator)
            .trim()
            .to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}
