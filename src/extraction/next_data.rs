//! Layer B: the `__NEXT_DATA__` application-state tree

use super::duration::{normalize_duration, DurationInput};
use super::fields::ContentNode;
use super::patterns::{
    TREE_DESCRIPTION, TREE_DIALECT, TREE_DISCRIMINANTS, TREE_DURATION, TREE_RELEASE_YEAR,
    TREE_TITLE,
};
use super::{non_empty, title_case, unescape_newlines, PartialRecord};
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

static NEXT_DATA_SCRIPT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script#__NEXT_DATA__").expect("next data selector")
});

/// Candidate locations of the content object, tried in order
const CONTENT_PATHS: &[&str] = &[
    "/props/pageProps/data",
    "/props/pageProps/content",
    "/props/pageProps/movie",
    "/props/pageProps/series",
    "/props/pageProps/episode",
    "/query",
];

/// Parse the page's `__NEXT_DATA__` block, if present and well-formed
pub fn find_next_data(document: &Html) -> Option<Value> {
    let script = document.select(&NEXT_DATA_SCRIPT).next()?;
    let body: String = script.text().collect();
    match serde_json::from_str::<Value>(body.trim()) {
        Ok(tree) => Some(tree),
        Err(e) => {
            warn!("⚠️ Malformed __NEXT_DATA__ block ignored: {}", e);
            None
        }
    }
}

/// Extract content fields from an application-state tree.
///
/// Typed path lookups run first; when none yields a content object, field-scoped
/// patterns anchored to a movie discriminant are tried over the serialized tree.
pub fn extract_structured_tree(tree: &Value) -> PartialRecord {
    if let Some(node) = lookup_content_node(tree) {
        debug!("🧭 Content object found by path lookup");
        return node.into_partial();
    }

    let serialized = match serde_json::to_string(tree) {
        Ok(text) => text,
        Err(e) => {
            warn!("⚠️ Could not serialize application state: {}", e);
            return PartialRecord::default();
        }
    };
    extract_from_serialized(&serialized)
}

fn lookup_content_node(tree: &Value) -> Option<ContentNode> {
    CONTENT_PATHS.iter().find_map(|path| {
        let source = tree.pointer(path)?;
        if !source.is_object() {
            return None;
        }
        if is_tree_content(source) {
            debug!("Path {} matched directly", path);
            return ContentNode::from_value(source);
        }
        let listed = source
            .get("content")
            .and_then(Value::as_array)?
            .iter()
            .find(|item| item.get("type").and_then(Value::as_str) == Some("movie"))?;
        debug!("Path {} matched a listed movie", path);
        ContentNode::from_value(listed)
    })
}

fn is_tree_content(value: &Value) -> bool {
    value
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|tag| TREE_DISCRIMINANTS.contains(&tag))
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    non_empty(pattern.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str()))
}

fn extract_from_serialized(text: &str) -> PartialRecord {
    let duration = capture(&TREE_DURATION, text)
        .and_then(|seconds| seconds.parse::<u64>().ok())
        .filter(|seconds| *seconds > 0)
        .and_then(|seconds| normalize_duration(DurationInput::Seconds(seconds)));

    let record = PartialRecord {
        title: capture(&TREE_TITLE, text),
        description: capture(&TREE_DESCRIPTION, text).map(|d| unescape_newlines(&d)),
        release_date: capture(&TREE_RELEASE_YEAR, text),
        duration,
        languages: capture(&TREE_DIALECT, text).map(|d| title_case(&d)),
        ..Default::default()
    };

    if !record.is_empty() {
        debug!("🔎 Recovered fields from serialized application state");
    }
    record
}
