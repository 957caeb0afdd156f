//! Movie/series classification when no layer states a type

use super::patterns::{MOVIE_PATH_MARKER, SERIES_INDICATOR_TERMS, SERIES_PATH_MARKERS};
use super::ContentType;
use tracing::debug;

/// Evidence available to the classifier
#[derive(Debug, Clone, Copy)]
pub struct ClassifierSources<'a> {
    /// URL of the page being classified
    pub page_url: &'a str,
    /// Serialized application-state tree followed by the serialized linked-data block
    pub combined_text: &'a str,
}

/// Classify from route markers, then from distinct series terms; defaults to Movie
pub fn classify_type(sources: &ClassifierSources<'_>) -> ContentType {
    let url = sources.page_url.to_lowercase();
    let text = sources.combined_text.to_lowercase();
    let mentions = |marker: &str| url.contains(marker) || text.contains(marker);

    if SERIES_PATH_MARKERS.iter().any(|&marker| mentions(marker)) {
        debug!("📺 Classified as series by route marker");
        return ContentType::Series;
    }
    if mentions(MOVIE_PATH_MARKER) {
        debug!("🎬 Classified as movie by route marker");
        return ContentType::Movie;
    }

    let distinct_terms = SERIES_INDICATOR_TERMS
        .iter()
        .filter(|term| text.contains(*term))
        .count();
    debug!("Series indicator terms present: {}", distinct_terms);

    if distinct_terms >= 3 {
        ContentType::Series
    } else {
        ContentType::Movie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(page_url: &str, combined_text: &str) -> ContentType {
        classify_type(&ClassifierSources {
            page_url,
            combined_text,
        })
    }

    #[test]
    fn test_route_markers() {
        assert_eq!(classify("https://www.stage.in/en/haryanvi/show/x-1", ""), ContentType::Series);
        assert_eq!(classify("https://www.stage.in/x-1", r#"{"link":"/web-series/abc"}"#), ContentType::Series);
        assert_eq!(classify("https://www.stage.in/x-1", r#"{"link":"/movie/abc"}"#), ContentType::Movie);
    }

    #[test]
    fn test_series_markers_beat_movie_markers() {
        assert_eq!(
            classify("https://www.stage.in/en/movie/x-1", r#"{"next":"/series/y"}"#),
            ContentType::Series
        );
    }

    #[test]
    fn test_distinct_terms_threshold() {
        assert_eq!(
            classify("https://www.stage.in/x-1", "Season 1 with new episodes"),
            ContentType::Series
        );
        assert_eq!(classify("https://www.stage.in/x-1", "episode episode episode"), ContentType::Movie);
    }

    #[test]
    fn test_default_is_movie() {
        assert_eq!(classify("https://www.stage.in/x-1", ""), ContentType::Movie);
    }
}
