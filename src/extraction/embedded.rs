//! Layer A: embedded state objects and raw-markup heuristics
//!
//! The discriminated-object search looks for a content object tagged `movie`,
//! `individual` or `series` in the page's JSON script blocks. The markup
//! heuristics always run (unless disabled) because they also decide the
//! content type and runtime when the state object is silent on them.

use super::duration::{format_minutes, parse_text_duration};
use super::episodes::extract_episode_count;
use super::fields::ContentNode;
use super::overrides::{duration_override, find_known_series, KnownSeries};
use super::patterns::{
    CONTENT_DISCRIMINANTS, DISCRIMINATED_OBJECT, DURATION_TEXT, GENRE_TEXT, HTML_LANDSCAPE_POSTER,
    HTML_PORTRAIT_POSTER, LANGUAGE_TEXT, MAX_RELEASE_YEAR, MIN_RELEASE_YEAR, MOVIE_PATH_MARKER,
    MOVIE_WORDS, SERIES_PATH_MARKERS, SERIES_WORDS, YEAR_TEXT,
};
use super::{title_case, Classification, ClassificationBasis, ContentType, PartialRecord};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("script selector"));

static TITLE_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "h1",
        "title",
        "[data-testid='movie-title']",
        ".movie-title",
        "meta[property='og:title']",
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("title selector"))
    .collect()
});

static DESCRIPTION_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "meta[property='og:description']",
        "meta[name='description']",
        ".movie-description",
        ".description",
        "p",
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("description selector"))
    .collect()
});

/// Elements whose text never reaches the reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Settings for the markup heuristics
#[derive(Debug, Clone)]
pub struct HtmlHeuristics {
    pub enabled: bool,
    /// Bare site name that is never accepted as a title
    pub site_name: String,
    /// Descriptions must be strictly longer than this many characters
    pub min_description_chars: usize,
    pub apply_manual_overrides: bool,
}

impl Default for HtmlHeuristics {
    fn default() -> Self {
        Self {
            enabled: true,
            site_name: "STAGE".to_string(),
            min_description_chars: 50,
            apply_manual_overrides: true,
        }
    }
}

/// Output of Layer A
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedExtraction {
    /// Content object found by discriminant, if any
    pub discriminated: Option<PartialRecord>,
    /// Fields recovered from raw markup
    pub heuristic: PartialRecord,
    /// Markup classification; `None` when the heuristics are disabled
    pub classification: Option<Classification>,
}

/// Run Layer A over a parsed page and its raw text
pub fn extract_embedded(
    document: &Html,
    html: &str,
    page_url: &str,
    settings: &HtmlHeuristics,
) -> EmbeddedExtraction {
    let discriminated = find_discriminated_object(document)
        .as_ref()
        .and_then(ContentNode::from_value)
        .map(ContentNode::into_partial);

    if discriminated.is_some() {
        debug!("🧩 Found discriminated content object in embedded state");
    }

    if !settings.enabled {
        return EmbeddedExtraction {
            discriminated,
            ..Default::default()
        };
    }

    let (heuristic, classification) = extract_heuristics(document, html, page_url, settings);
    EmbeddedExtraction {
        discriminated,
        heuristic,
        classification: Some(classification),
    }
}

/// Locate the primary content object among the page's JSON script blocks.
///
/// Each block is checked at its top level, then one level down into object values
/// and list members. The linked-data and `__NEXT_DATA__` blocks belong to other
/// layers and are skipped. Flat objects carrying a discriminant are then recovered
/// from the text of script blocks that are not JSON documents.
pub fn find_discriminated_object(document: &Html) -> Option<Value> {
    let mut unstructured = Vec::new();

    for script in document.select(&SCRIPT) {
        if is_owned_by_other_layer(script) {
            continue;
        }

        let body: String = script.text().collect();
        let trimmed = body.trim();
        if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
            unstructured.push(body);
            continue;
        }

        let value = match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => value,
            Err(e) => {
                debug!("Unparseable script block left to raw-text recovery: {}", e);
                unstructured.push(body);
                continue;
            }
        };

        if let Some(found) = discriminated_within(&value) {
            return Some(found.clone());
        }
    }

    unstructured.iter().find_map(|text| {
        DISCRIMINATED_OBJECT.find_iter(text).find_map(|candidate| {
            serde_json::from_str::<Value>(candidate.as_str())
                .ok()
                .filter(Value::is_object)
        })
    })
}

fn is_owned_by_other_layer(script: ElementRef<'_>) -> bool {
    let element = script.value();
    let linked_data = element
        .attr("type")
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
    linked_data || element.id() == Some("__NEXT_DATA__")
}

fn discriminated_within(value: &Value) -> Option<&Value> {
    if has_discriminant(value) {
        return Some(value);
    }
    match value {
        Value::Object(map) => map.values().find_map(|child| match child {
            Value::Array(items) => items.iter().find(|item| has_discriminant(item)),
            other if has_discriminant(other) => Some(other),
            _ => None,
        }),
        Value::Array(items) => items.iter().find(|item| has_discriminant(item)),
        _ => None,
    }
}

fn has_discriminant(value: &Value) -> bool {
    value
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|tag| CONTENT_DISCRIMINANTS.contains(&tag))
}

fn extract_heuristics(
    document: &Html,
    html: &str,
    page_url: &str,
    settings: &HtmlHeuristics,
) -> (PartialRecord, Classification) {
    let html_lower = html.to_lowercase();
    let visible = visible_text(document);

    let known = if settings.apply_manual_overrides {
        find_known_series(&visible)
    } else {
        None
    };

    let classification = classify_markup(page_url, &html_lower, &visible, known);
    debug!(
        "🏷️ Markup classification: {} via {:?}",
        classification.content_type, classification.basis
    );

    let episode_count = if classification.content_type.is_series() {
        known
            .and_then(|series| series.episode_count)
            .or_else(|| extract_episode_count(html))
    } else {
        None
    };

    let overridden = if settings.apply_manual_overrides {
        duration_override(&html_lower)
    } else {
        None
    };
    let duration = overridden
        .map(str::to_string)
        .or_else(|| extract_duration(html));

    let record = PartialRecord {
        content_type: Some(classification.content_type),
        title: extract_title(document, &settings.site_name),
        description: extract_description(document, settings.min_description_chars),
        release_date: extract_year(html),
        duration,
        genre: extract_genre(html),
        languages: extract_language(html),
        episode_count,
        landscape_poster_url: first_capture(&HTML_LANDSCAPE_POSTER, html),
        portrait_poster_url: first_capture(&HTML_PORTRAIT_POSTER, html),
    };

    (record, classification)
}

/// Decide Movie vs Series from markup, recording which rule fired
fn classify_markup(
    page_url: &str,
    html_lower: &str,
    visible: &str,
    known: Option<&KnownSeries>,
) -> Classification {
    let decided = |content_type, basis| Classification { content_type, basis };
    let url_lower = page_url.to_lowercase();

    if SERIES_PATH_MARKERS.iter().any(|m| url_lower.contains(m)) {
        return decided(ContentType::Series, ClassificationBasis::UrlPath);
    }
    if url_lower.contains(MOVIE_PATH_MARKER) {
        return decided(ContentType::Movie, ClassificationBasis::UrlPath);
    }
    if SERIES_PATH_MARKERS.iter().any(|m| html_lower.contains(m)) {
        return decided(ContentType::Series, ClassificationBasis::UrlPath);
    }
    if let Some(series) = known {
        debug!("📺 Known series '{}' in page text", series.title);
        return decided(ContentType::Series, ClassificationBasis::KnownTitle);
    }
    if html_lower.contains(MOVIE_PATH_MARKER) {
        return decided(ContentType::Movie, ClassificationBasis::MoviePath);
    }

    let count = |words: &[Regex]| -> usize { words.iter().map(|w| w.find_iter(visible).count()).sum() };
    let series_count = count(SERIES_WORDS.as_slice());
    let movie_count = count(MOVIE_WORDS.as_slice());
    debug!("Lexical indicators: series={} movie={}", series_count, movie_count);

    let content_type = if series_count >= 2 && movie_count <= 1 {
        ContentType::Series
    } else {
        ContentType::Movie
    };
    decided(content_type, ClassificationBasis::LexicalCount)
}

/// Text a reader would see: every text node outside script-like elements
pub fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            text.push_str(fragment);
            text.push(' ');
        }
    }
    text
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn attribute(element: ElementRef<'_>, name: &str) -> String {
    element.value().attr(name).unwrap_or_default().trim().to_string()
}

fn extract_title(document: &Html, site_name: &str) -> Option<String> {
    for selector in TITLE_SELECTORS.iter() {
        let Some(element) = document.select(selector).next() else {
            continue;
        };
        let mut candidate = element_text(element);
        if candidate.is_empty() {
            candidate = attribute(element, "content");
        }
        if !candidate.is_empty() && candidate != site_name {
            return Some(candidate);
        }
    }
    None
}

fn extract_description(document: &Html, min_chars: usize) -> Option<String> {
    for selector in DESCRIPTION_SELECTORS.iter() {
        let Some(element) = document.select(selector).next() else {
            continue;
        };
        let mut candidate = attribute(element, "content");
        if candidate.is_empty() {
            candidate = element_text(element);
        }
        if candidate.chars().count() > min_chars {
            return Some(candidate);
        }
    }
    None
}

/// First runtime phrase in the page, skipping degenerate values
fn extract_duration(html: &str) -> Option<String> {
    for (index, pattern) in DURATION_TEXT.iter().enumerate() {
        let Some(capture) = pattern.captures(html).and_then(|c| c.get(1)) else {
            continue;
        };
        // "348h 10m" must not be read as "48h 10m"
        let truncated = html[..capture.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit());
        let raw = capture.as_str().trim();
        if truncated || is_degenerate_duration(raw) {
            debug!("⏭️ Rejecting degenerate duration '{}' (pattern {})", raw, index);
            continue;
        }
        match canonical_text_duration(raw) {
            Some(duration) if duration != "0m" => {
                debug!("⏱️ Duration '{}' from pattern {}", duration, index);
                return Some(duration);
            }
            _ => continue,
        }
    }
    None
}

fn is_degenerate_duration(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    lowered == "0m" || lowered == "0h" || lowered.contains("348h")
}

/// Captures are either bare minute counts or clock/unit text
fn canonical_text_duration(raw: &str) -> Option<String> {
    if let Ok(minutes) = raw.parse::<u64>() {
        return Some(format_minutes(minutes));
    }
    parse_text_duration(raw)
}

fn extract_year(html: &str) -> Option<String> {
    YEAR_TEXT.iter().find_map(|pattern| {
        pattern
            .captures_iter(html)
            .filter_map(|c| c.get(1))
            .find_map(|m| {
                let year = m.as_str().parse::<i32>().ok()?;
                (MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR)
                    .contains(&year)
                    .then(|| year.to_string())
            })
    })
}

fn extract_language(html: &str) -> Option<String> {
    LANGUAGE_TEXT.iter().find_map(|pattern| {
        let language = pattern.captures(html)?.get(1)?.as_str();
        (language.len() > 2).then(|| title_case(language))
    })
}

fn extract_genre(html: &str) -> Option<String> {
    GENRE_TEXT.iter().find_map(|pattern| {
        let captures = pattern.captures(html)?;
        let first = captures.get(1)?.as_str();
        Some(match captures.get(2) {
            Some(second) => format!("{}, {}", first, second.as_str()),
            None => first.to_string(),
        })
    })
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
