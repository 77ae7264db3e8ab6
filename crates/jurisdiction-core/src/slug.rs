//! URL slug handling for jurisdiction names.
//!
//! Slugs are the only identity that appears in URLs, so resolution failures
//! here are expected traffic (stale links, typos) and are modeled as `None`,
//! never as errors.

use crate::states::StateCode;

/// Lower-case, hyphenate whitespace runs, strip everything outside
/// `[a-z0-9-]`, collapse repeated hyphens, trim leading/trailing hyphens.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
        // Other punctuation (apostrophes, periods) is dropped without
        // becoming a separator: "O'Brien" -> "obrien".
    }
    out
}

/// Hyphens become spaces and each word gets its first letter capitalized.
///
/// The title-casing is naive on purpose: it capitalizes the first letter
/// only, so "mcallen" -> "Mcallen" and "isle-of-palms" -> "Isle Of Palms".
/// Callers depend on this exact (imperfect) output; do not make it smarter.
pub fn deslugify(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a URL segment to a state code.
///
/// Tries the segment as a hyphenated state name first ("new-york"), then
/// falls back to a literal 2-letter code ("ny"). First hit wins.
pub fn resolve_state_slug(slug: &str) -> Option<StateCode> {
    StateCode::from_name(&deslugify(slug)).or_else(|| StateCode::from_code(slug))
}

/// Best-effort slug match against a collection.
///
/// Strategy 1: case-insensitive equality between a candidate's display name
/// and the deslugified target, across all items. Strategy 2 (only if no item
/// matched): equality between the slug and the slugified candidate name.
/// No match is `None`; callers decide whether that is a 404.
pub fn find_by_slug<'a, T, F>(items: &'a [T], slug: &str, name_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> &str,
{
    let target = deslugify(slug);
    items
        .iter()
        .find(|item| name_of(item).eq_ignore_ascii_case(&target))
        .or_else(|| items.iter().find(|item| slugify(name_of(item)) == slug))
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
