//! Layer C: the schema.org linked-data block

use super::duration::{normalize_duration, DurationInput};
use super::fields::{Scalar, TextList};
use super::{unescape_newlines, ContentType, PartialRecord};
use chrono::DateTime;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;

static LINKED_DATA_SCRIPT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("linked data selector")
});

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LinkedData {
    #[serde(rename = "@type")]
    kind: Option<TextList>,
    name: Option<Scalar>,
    description: Option<Scalar>,
    upload_date: Option<Scalar>,
    date_published: Option<Scalar>,
    duration: Option<Scalar>,
    genre: Option<TextList>,
    in_language: Option<TextList>,
    number_of_episodes: Option<Scalar>,
}

/// Parse the first linked-data block on the page
pub fn find_linked_data(document: &Html) -> Option<Value> {
    let script = document.select(&LINKED_DATA_SCRIPT).next()?;
    let body: String = script.text().collect();
    match serde_json::from_str::<Value>(body.trim()) {
        Ok(node) => Some(node),
        Err(e) => {
            warn!("⚠️ Malformed ld+json block ignored: {}", e);
            None
        }
    }
}

/// Read a linked-data node (object, or array whose first element is used)
pub fn extract_linked_data(node: &Value) -> PartialRecord {
    let node = match node {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return PartialRecord::default(),
        },
        other => other,
    };
    if !node.is_object() {
        return PartialRecord::default();
    }

    let data: LinkedData = match serde_json::from_value(node.clone()) {
        Ok(data) => data,
        Err(e) => {
            warn!("⚠️ Unreadable ld+json object: {}", e);
            return PartialRecord::default();
        }
    };

    let published = data
        .upload_date
        .as_ref()
        .or(data.date_published.as_ref())
        .and_then(Scalar::text)
        .map(|stamp| date_portion(&stamp));

    let duration = data
        .duration
        .as_ref()
        .and_then(Scalar::text)
        .and_then(|raw| normalize_duration(DurationInput::Iso(&raw)));

    PartialRecord {
        content_type: data.kind.as_ref().and_then(|kind| {
            kind.items()
                .iter()
                .find_map(|tag| ContentType::known_from_tag(tag))
        }),
        title: data.name.as_ref().and_then(Scalar::text),
        description: data
            .description
            .as_ref()
            .and_then(Scalar::text)
            .map(|d| unescape_newlines(&d)),
        release_date: published,
        duration,
        genre: data.genre.as_ref().and_then(TextList::joined),
        languages: data.in_language.as_ref().and_then(TextList::joined),
        episode_count: data
            .number_of_episodes
            .as_ref()
            .and_then(Scalar::count)
            .and_then(|n| u32::try_from(n).ok()),
        landscape_poster_url: None,
        portrait_poster_url: None,
    }
}

/// Date part of an ISO date-time; plain dates pass through
fn date_portion(stamp: &str) -> String {
    match DateTime::parse_from_rfc3339(stamp) {
        Ok(parsed) => parsed.date_naive().to_string(),
        Err(_) => stamp.split('T').next().unwrap_or(stamp).to_string(),
    }
}
