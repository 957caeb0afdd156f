//! Episode-count extraction for series pages

use super::patterns::EPISODE_COUNT;
use tracing::debug;

/// First episode count found in `text`, trying each count phrasing in order.
///
/// Callers only invoke this once a page is known to be a series.
pub fn extract_episode_count(text: &str) -> Option<u32> {
    for (index, pattern) in EPISODE_COUNT.iter().enumerate() {
        let Some(captured) = pattern.captures(text).and_then(|c| c.get(1)) else {
            continue;
        };
        match captured.as_str().parse::<u32>() {
            Ok(count) => {
                debug!("📦 Episode count {} from pattern {}", count, index);
                return Some(count);
            }
            Err(_) => continue,
        }
    }
    None
}
