//! Lenient JSON field types for page-embedded content objects
//!
//! Page payloads are not schema-checked upstream: a year may arrive as a number or
//! a string, a genre as a string or a list of named objects. These wrappers accept
//! every shape and expose only the typed views the layers need, so one odd field
//! never discards the rest of an object.

use super::duration::{normalize_duration, normalize_duration_text, DurationInput};
use super::{non_empty, title_case, unescape_newlines, ContentType, PartialRecord};
use serde::Deserialize;
use serde_json::Value;

/// Any JSON scalar, or something else entirely
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(Value),
}

impl Scalar {
    pub fn text(&self) -> Option<String> {
        match self {
            Scalar::Integer(n) => Some(n.to_string()),
            Scalar::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
            Scalar::Float(f) => Some(f.to_string()),
            Scalar::Text(s) => non_empty(Some(s)),
            Scalar::Other(_) => None,
        }
    }

    /// Non-negative whole number, from a number or a numeric string
    pub fn count(&self) -> Option<u64> {
        match self {
            Scalar::Integer(n) => u64::try_from(*n).ok(),
            Scalar::Float(f) if *f >= 0.0 => Some(f.floor() as u64),
            Scalar::Text(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        }
    }

    /// Numbers are seconds; strings go through free-text normalization
    pub fn duration(&self) -> Option<String> {
        match self {
            Scalar::Integer(_) | Scalar::Float(_) => match self.count() {
                Some(0) | None => None,
                Some(seconds) => normalize_duration(DurationInput::Seconds(seconds)),
            },
            Scalar::Text(s) => normalize_duration_text(s),
            Scalar::Other(_) => None,
        }
    }
}

/// One entry of a text list: a bare string or an object carrying a `name`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextItem {
    Text(String),
    Named { name: String },
    Other(Value),
}

impl TextItem {
    fn text(&self) -> Option<String> {
        match self {
            TextItem::Text(s) | TextItem::Named { name: s } => non_empty(Some(s)),
            TextItem::Other(_) => None,
        }
    }
}

/// A string, a list of strings/named objects, or a single named object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextList {
    Many(Vec<TextItem>),
    One(TextItem),
}

impl TextList {
    /// Comma-joined text of every usable entry
    pub fn joined(&self) -> Option<String> {
        let parts: Vec<String> = match self {
            TextList::One(item) => item.text().into_iter().collect(),
            TextList::Many(items) => items.iter().filter_map(TextItem::text).collect(),
        };
        (!parts.is_empty()).then(|| parts.join(", "))
    }

    /// Individual entries, for tag lookups such as `@type`
    pub fn items(&self) -> Vec<String> {
        match self {
            TextList::One(item) => item.text().into_iter().collect(),
            TextList::Many(items) => items.iter().filter_map(TextItem::text).collect(),
        }
    }
}

/// Content object as it appears in embedded application state
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentNode {
    #[serde(rename = "type")]
    pub kind: Option<Scalar>,
    pub title: Option<Scalar>,
    pub description: Option<Scalar>,
    pub year_of_release: Option<Scalar>,
    pub duration: Option<Scalar>,
    pub dialect: Option<Scalar>,
    pub genre: Option<TextList>,
    pub horizontal_thumbnail: Option<Scalar>,
    pub vertical_thumbnail: Option<Scalar>,
}

impl ContentNode {
    /// Read a JSON object as a content node; non-objects yield `None`
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn tag(&self) -> Option<String> {
        self.kind.as_ref().and_then(Scalar::text)
    }

    pub fn into_partial(self) -> PartialRecord {
        PartialRecord {
            content_type: self
                .tag()
                .and_then(|tag| ContentType::known_from_tag(&tag)),
            title: self.title.as_ref().and_then(Scalar::text),
            description: self
                .description
                .as_ref()
                .and_then(Scalar::text)
                .map(|d| unescape_newlines(&d)),
            release_date: self.year_of_release.as_ref().and_then(Scalar::text),
            duration: self.duration.as_ref().and_then(Scalar::duration),
            genre: self.genre.as_ref().and_then(TextList::joined),
            languages: self
                .dialect
                .as_ref()
                .and_then(Scalar::text)
                .map(|d| title_case(&d)),
            episode_count: None,
            landscape_poster_url: self.horizontal_thumbnail.as_ref().and_then(Scalar::text),
            portrait_poster_url: self.vertical_thumbnail.as_ref().and_then(Scalar::text),
        }
    }
}
