//! Human-readable rendering of extraction results

use crate::extraction::MetadataRecord;

const MISSING: &str = "N/A";

/// Multi-line summary of a record, or a one-line failure notice
pub fn format_message(record: &MetadataRecord) -> String {
    if !record.success {
        return match &record.error {
            Some(error) => format!("❌ Failed to extract data from {}\nError: {}", record.url, error),
            None => format!("❌ Failed to extract data from {}", record.url),
        };
    }

    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING.to_string());

    let mut message = format!(
        "🎬 {}\n🆔 ID: {}\n📺 Type: {}\n📅 Release: {}\n⏱ Duration: {}\n🎭 Genre: {}\n🌐 Languages: {}",
        field(&record.title),
        field(&record.identifier),
        record
            .content_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| MISSING.to_string()),
        field(&record.release_date),
        field(&record.duration),
        field(&record.genre),
        field(&record.languages),
    );

    if let Some(episodes) = record.episode_count {
        message.push_str(&format!("\n📦 Episodes: {}", episodes));
    }

    message.push_str(&format!("\n\n🔗 {}", record.url));
    message
}

/// Poster to attach to a rendered message: landscape first, then portrait
pub fn preferred_poster(record: &MetadataRecord) -> Option<&str> {
    record
        .landscape_poster_url
        .as_deref()
        .or(record.portrait_poster_url.as_deref())
}
