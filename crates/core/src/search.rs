//! Full-text search helpers.
//!
//! Video search is delegated to PostgreSQL (`videos.search_vector`, weighted
//! title A / description B). This module only turns user input into a safe
//! `tsquery` string.

/// Sanitize user input into a list of terms suitable for tsquery construction.
///
/// - Splits on whitespace.
/// - Removes every character other than alphanumerics and `_`, so tsquery
///   operators and quotes cannot leak through.
/// - Drops empty terms.
///
/// Returns `None` if the input yields no usable terms.
fn sanitize_terms(query: &str) -> Option<Vec<String>> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .collect();

    if terms.is_empty() { None } else { Some(terms) }
}

/// Sanitize and convert user input into a PostgreSQL `tsquery` string.
///
/// Whitespace-separated terms are joined with `&` (AND) and the last term
/// gets a `:*` prefix match so partially typed words still hit.
///
/// # Examples
///
/// ```
/// use vidhub_core::search::build_tsquery;
/// assert_eq!(build_tsquery("rust tutor"), Some("rust & tutor:*".to_string()));
/// assert_eq!(build_tsquery("  "), None);
/// ```
pub fn build_tsquery(query: &str) -> Option<String> {
    let terms = sanitize_terms(query)?;
    let (last, exact) = terms.split_last()?;
    if exact.is_empty() {
        Some(format!("{last}:*"))
    } else {
        Some(format!("{} & {last}:*", exact.join(" & ")))
    }
}
