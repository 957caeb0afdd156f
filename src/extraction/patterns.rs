//! Pattern library shared by the extraction layers
//!
//! Every group is ordered: callers walk a group front to back and stop at the
//! first acceptable match, so the order of each list is part of its meaning.

use regex::Regex;
use std::sync::LazyLock;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("static extraction pattern must compile"))
        .collect()
}

/// Route segments that mark a series-like detail page
pub const SERIES_PATH_MARKERS: &[&str] = &["/show/", "/series/", "/web-series/", "/tv-show/"];

/// Route segment that marks a movie detail page
pub const MOVIE_PATH_MARKER: &str = "/movie/";

/// Discriminant values that identify the primary content object in embedded state
pub const CONTENT_DISCRIMINANTS: &[&str] = &["movie", "individual", "series"];

/// Discriminants that mark the content object inside the application-state tree
pub const TREE_DISCRIMINANTS: &[&str] = &["movie", "show"];

/// Accepted release-year window for text-derived years
pub const MIN_RELEASE_YEAR: i32 = 1900;
pub const MAX_RELEASE_YEAR: i32 = 2030;

/// Trailing identifier: digits at the end of the path, optionally after a hyphen
pub static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?(\d+)/?$").expect("identifier pattern"));

/// ISO-8601 duration (`P[nD]T[nH][nM][nS]`)
pub static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$")
        .expect("iso duration pattern")
});

/// Strings already in the canonical duration grammar
pub static CANONICAL_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+h \d+m|\d+m|\d+m \d+s)$").expect("canonical duration pattern")
});

/// Free-text duration fragments such as `1h 27m`, `1h27m5s`, `2h` or `87m`
pub static TEXT_DURATION_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(\d+)\s*h)?\s*(?:(\d+)\s*m)?\s*(?:(\d+)\s*s)?$")
        .expect("text duration pattern")
});

/// Duration phrasings searched in raw page text, most specific first
pub static DURATION_TEXT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(\d{1,2}:\d{2}:\d{2})",
        r"(?i)(\d{1,2}h\s*\d{1,2}m\s*\d{1,2}s)",
        r"(?i)(\d{1,2}h\s*\d{1,2}m)",
        r"(\d{1,2}:\d{2})",
        r"(?i)(\d{1,3})\s*minutes?",
        r"(?i)runs for approximately (\d+h\s*\d+m)",
        r"(?i)runs for approximately (\d+h)",
        r"(?i)movie runs for approximately (\d+h\s*\d+m)",
        r"(?i)movie runs for approximately (\d+m)",
        r"(?i)duration.*?(\d+h\s*\d+m)",
        r"(?i)duration.*?(\d+h)",
        r"(?i)duration.*?(\d+m)",
        r"(?i)(\d+h\s*\d+m)\s*long",
        r"(?i)(\d+h)\s*long",
        r"(?i)(\d+m)\s*long",
    ])
});

/// Release-year phrasings, most specific first
pub static YEAR_TEXT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)released in (\d{4})",
        r"(?i)(\d{4}) movie",
        r"\b(\d{4})\b",
    ])
});

/// Language phrasings
pub static LANGUAGE_TEXT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"Available in\s*([A-Za-z]+)",
        r"language.*?([A-Za-z]+)",
        r"([A-Za-z]+)\s*language",
    ])
});

/// Genre phrasings; the first pattern captures a pair of terms
pub static GENRE_TEXT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"compelling\s*([A-Za-z]+)\s*and\s*([A-Za-z]+)\s*movie",
        r"genre.*?([A-Za-z]+)",
        r"([A-Za-z]+)\s*movie",
    ])
});

/// Episode-count phrasings
pub static EPISODE_COUNT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)(\d+)\s*episodes?",
        r"(?i)episode\s*(\d+)",
        r#"(?i)"episodeCount":\s*(\d+)"#,
        r#"(?i)"numberOfEpisodes":\s*(\d+)"#,
        r"(?i)season\s*\d+.*?(\d+)\s*episodes?",
    ])
});

/// Poster URLs embedded directly in page markup
pub static HTML_LANDSCAPE_POSTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(https://media\.stage\.in/episode/horizontal/[^"]*\.(?:webp|jpg|jpeg))"#)
        .expect("landscape poster pattern")
});

pub static HTML_PORTRAIT_POSTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(https://media\.stage\.in/episode/vertical/[^"]*\.(?:webp|jpg|jpeg))"#)
        .expect("portrait poster pattern")
});

/// Landscape artwork candidates over serialized state; URL shapes first, then named fields
pub static LANDSCAPE_POSTERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"https://media\.stage\.in/[^"']*horizontal[^"]*\.(?:webp|jpg|jpeg)"#,
        r#"https://media\.stage\.in/[^"']*landscape[^"]*\.(?:webp|jpg|jpeg)"#,
        r#"https://media\.stage\.in/[^"']*wide[^"]*\.(?:webp|jpg|jpeg)"#,
        r#""horizontalThumbnail":"([^"]+)""#,
        r#""largeThumbnail":"([^"]+)""#,
    ])
});

/// Portrait artwork candidates over serialized state
pub static PORTRAIT_POSTERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r#"https://media\.stage\.in/[^"']*vertical[^"]*\.(?:webp|jpg|jpeg)"#,
        r#"https://media\.stage\.in/[^"']*portrait[^"]*\.(?:webp|jpg|jpeg)"#,
        r#"https://media\.stage\.in/[^"']*tall[^"]*\.(?:webp|jpg|jpeg)"#,
        r#""verticalThumbnail":"([^"]+)""#,
    ])
});

/// Whole-word series and movie indicators for the weighted lexical count
pub static SERIES_WORDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\bepisode\b",
        r"(?i)\bseason\b",
        r"(?i)\bseries\b",
        r"(?i)\bshow\b",
    ])
});

pub static MOVIE_WORDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"(?i)\bmovie\b", r"(?i)\bfilm\b", r"(?i)\bcinema\b"])
});

/// Distinct series terms counted by the fallback classifier
pub const SERIES_INDICATOR_TERMS: &[&str] = &[
    "episode",
    "episodes",
    "season",
    "seasons",
    "series",
    "web series",
];

/// Field-scoped patterns over a serialized state tree, anchored to a movie discriminant
pub static TREE_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""type":"movie"[^}]*"title":"([^"]+)""#).expect("tree title pattern")
});

pub static TREE_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""type":"movie"[^}]*"description":"([^"]+)""#)
        .expect("tree description pattern")
});

pub static TREE_RELEASE_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""type":"movie"[^}]*"yearOfRelease":(\d+)"#).expect("tree year pattern")
});

pub static TREE_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""type":"movie"[^}]*"duration":(\d+)"#).expect("tree duration pattern")
});

pub static TREE_DIALECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""type":"movie"[^}]*"dialect":"([^"]+)""#).expect("tree dialect pattern")
});

/// A flat JSON object carrying a content discriminant, for raw-text recovery
pub static DISCRIMINATED_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{[^{}]*"type"\s*:\s*"(?:movie|individual|series)"[^{}]*\}"#)
        .expect("discriminated object pattern")
});

/// Markers that identify search-suggestion JSON around a text match
pub const SUGGESTION_MARKERS: &[&str] = &["\"search_screen\"", "textfieldlabel"];

/// Width of the context window inspected on each side of a known-title match
pub const SUGGESTION_WINDOW: usize = 100;

/// Absolute http(s) URLs in free text
pub static URL_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).expect("url pattern")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_groups_compile() {
        assert_eq!(DURATION_TEXT.len(), 15);
        assert_eq!(YEAR_TEXT.len(), 3);
        assert_eq!(LANGUAGE_TEXT.len(), 3);
        assert_eq!(GENRE_TEXT.len(), 3);
        assert_eq!(EPISODE_COUNT.len(), 5);
        assert_eq!(LANDSCAPE_POSTERS.len(), 5);
        assert_eq!(PORTRAIT_POSTERS.len(), 4);
    }

    #[test]
    fn test_canonical_duration_grammar() {
        assert!(CANONICAL_DURATION.is_match("1h 27m"));
        assert!(CANONICAL_DURATION.is_match("45m"));
        assert!(CANONICAL_DURATION.is_match("3m 20s"));
        assert!(!CANONICAL_DURATION.is_match("PT1H27M"));
        assert!(!CANONICAL_DURATION.is_match("5220"));
        assert!(!CANONICAL_DURATION.is_match("1h 27m 3s"));
    }

    #[test]
    fn test_tree_patterns_stay_inside_object() {
        let text = r#"{"type":"movie","id":1},{"title":"Other"}"#;
        assert!(TREE_TITLE.captures(text).is_none());

        let text = r#"{"type":"movie","id":1,"title":"Kayantar"}"#;
        assert_eq!(&TREE_TITLE.captures(text).unwrap()[1], "Kayantar");
    }
}
