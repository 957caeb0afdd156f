//! Landscape and portrait artwork detection over serialized page state

use super::patterns::{LANDSCAPE_POSTERS, PORTRAIT_POSTERS};
use regex::Regex;
use tracing::debug;

/// Artwork URLs by orientation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Posters {
    pub landscape: Option<String>,
    pub portrait: Option<String>,
}

/// First landscape and first portrait candidate in `serialized`.
///
/// URL-shape patterns yield their whole match; named-field patterns yield the
/// field value. Surrounding quotes are stripped either way.
pub fn detect_posters(serialized: &str) -> Posters {
    let posters = Posters {
        landscape: first_candidate(&LANDSCAPE_POSTERS, serialized),
        portrait: first_candidate(&PORTRAIT_POSTERS, serialized),
    };
    debug!(
        "🖼️ Poster detection: landscape={} portrait={}",
        posters.landscape.is_some(),
        posters.portrait.is_some()
    );
    posters
}

fn first_candidate(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        let captures = pattern.captures(text)?;
        let found = captures.get(1).or_else(|| captures.get(0))?;
        let url = found.as_str().trim_matches('"');
        (!url.is_empty()).then(|| url.to_string())
    })
}
