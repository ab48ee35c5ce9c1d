//! Parsing helpers for type names as they appear in metadata

/// Strip an optional `, Origin` qualifier: `App.Order, App.Core` -> `App.Order`.
/// Commas nested inside generic arguments are left alone.
pub fn strip_qualifier(name: &str) -> &str {
    let mut depth = 0usize;
    for (idx, c) in name.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return name[..idx].trim(),
            _ => {}
        }
    }
    name.trim()
}

/// Break a possibly generic type name into every concrete type it mentions.
///
/// `Dictionary<App.Key, List<App.Order[]>>` yields `Dictionary`, `App.Key`,
/// `List` and `App.Order`. Array, pointer, by-ref and nullable decorations are
/// removed.
pub fn decompose(name: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in strip_qualifier(name).split(['<', '>', ',']) {
        let cleaned = clean(part);
        if !cleaned.is_empty() && !out.iter().any(|existing| existing == cleaned) {
            out.push(cleaned.to_string());
        }
    }
    out
}

/// The outer (non-generic) part of a type name.
pub fn head(name: &str) -> &str {
    let name = strip_qualifier(name);
    let end = name.find('<').unwrap_or(name.len());
    clean(&name[..end])
}

/// Whether `name` sits inside `namespace` (or is the namespace itself).
pub fn in_namespace(name: &str, namespace: &str) -> bool {
    if namespace.is_empty() {
        return true;
    }
    name == namespace
        || name
            .strip_prefix(namespace)
            .is_some_and(|rest| rest.starts_with('.'))
}

fn clean(part: &str) -> &str {
    part.trim().trim_end_matches(['[', ']', '?', '&', '*']).trim()
}
