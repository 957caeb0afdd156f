//! Multi-layer metadata extraction for STAGE content detail pages
//!
//! Three source regions of the same page are read independently (embedded
//! state objects plus markup heuristics, the `__NEXT_DATA__` application tree,
//! and the linked-data block) and folded into one record by the merger.

pub mod patterns;
pub mod duration;
pub mod identifier;
pub mod fields;
pub mod overrides;
pub mod embedded;
pub mod next_data;
pub mod linked_data;
pub mod classifier;
pub mod posters;
pub mod episodes;
pub mod merge;

// Re-export main types
pub use classifier::{classify_type, ClassifierSources};
pub use duration::{normalize_duration, DurationInput};
pub use embedded::{extract_embedded, EmbeddedExtraction, HtmlHeuristics};
pub use identifier::extract_identifier;
pub use linked_data::{extract_linked_data, find_linked_data};
pub use merge::{merge, LayerOutputs};
pub use next_data::{extract_structured_tree, find_next_data};
pub use posters::{detect_posters, Posters};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of content a detail page describes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ContentType {
    Movie,
    Series,
    Unknown,
}

impl ContentType {
    /// Map a raw discriminant tag from page data onto a content type
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "movie" | "individual" | "film" => ContentType::Movie,
            "series" | "show" | "web-series" | "tvseries" | "tvshow" => ContentType::Series,
            _ => ContentType::Unknown,
        }
    }

    /// Like [`ContentType::from_tag`], but unrecognized tags yield `None`
    pub fn known_from_tag(tag: &str) -> Option<Self> {
        match Self::from_tag(tag) {
            ContentType::Unknown => None,
            known => Some(known),
        }
    }

    pub fn is_series(&self) -> bool {
        matches!(self, ContentType::Series)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContentType::Movie => "Movie",
            ContentType::Series => "Series",
            ContentType::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// How a markup-level classification was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationBasis {
    /// A series or movie route marker in the page URL or markup
    UrlPath,
    /// A title from the known-series table appeared in visible text
    KnownTitle,
    /// A movie route marker appeared in the markup
    MoviePath,
    /// Weighted count of series and movie words
    LexicalCount,
}

/// Content type decided by the markup heuristics, with the evidence used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub content_type: ContentType,
    pub basis: ClassificationBasis,
}

/// Field-optional output of a single extraction layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialRecord {
    pub content_type: Option<ContentType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub duration: Option<String>,
    pub genre: Option<String>,
    pub languages: Option<String>,
    pub episode_count: Option<u32>,
    pub landscape_poster_url: Option<String>,
    pub portrait_poster_url: Option<String>,
}

impl PartialRecord {
    /// Combine with a lower-priority record: every field keeps its own value when set
    pub fn or(self, lower: PartialRecord) -> PartialRecord {
        PartialRecord {
            content_type: self.content_type.or(lower.content_type),
            title: self.title.or(lower.title),
            description: self.description.or(lower.description),
            release_date: self.release_date.or(lower.release_date),
            duration: self.duration.or(lower.duration),
            genre: self.genre.or(lower.genre),
            languages: self.languages.or(lower.languages),
            episode_count: self.episode_count.or(lower.episode_count),
            landscape_poster_url: self.landscape_poster_url.or(lower.landscape_poster_url),
            portrait_poster_url: self.portrait_poster_url.or(lower.portrait_poster_url),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == PartialRecord::default()
    }
}

/// Canonical extraction result, one per engine call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    pub identifier: Option<String>,
    pub content_type: Option<ContentType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub duration: Option<String>,
    pub genre: Option<String>,
    pub languages: Option<String>,
    pub episode_count: Option<u32>,
    pub landscape_poster_url: Option<String>,
    pub portrait_poster_url: Option<String>,
    pub url: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetadataRecord {
    /// Record with every content field absent
    pub fn empty(url: &str) -> Self {
        Self {
            identifier: None,
            content_type: None,
            title: None,
            description: None,
            release_date: None,
            duration: None,
            genre: None,
            languages: None,
            episode_count: None,
            landscape_poster_url: None,
            portrait_poster_url: None,
            url: url.to_string(),
            success: false,
            error: None,
        }
    }

    /// Failure-shaped record for a pipeline that could not run
    pub fn failure(url: &str, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::empty(url)
        }
    }

    /// Any content field populated
    pub fn has_content(&self) -> bool {
        self.identifier.is_some()
            || self.content_type.is_some()
            || self.title.is_some()
            || self.description.is_some()
            || self.release_date.is_some()
            || self.duration.is_some()
            || self.genre.is_some()
            || self.languages.is_some()
            || self.episode_count.is_some()
            || self.landscape_poster_url.is_some()
            || self.portrait_poster_url.is_some()
    }
}

/// Trimmed value, or `None` for missing and blank strings
pub(crate) fn non_empty<S: AsRef<str>>(value: Option<S>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.as_ref().trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Turn literal `\n` escapes into real newlines
pub(crate) fn unescape_newlines(text: &str) -> String {
    text.replace("\\r\\n", "\n").replace("\\n", "\n")
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest
pub(crate) fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }
    result
}
