//! Record merger: folds layer outputs into the final record

use super::classifier::{classify_type, ClassifierSources};
use super::duration::{is_canonical, normalize_duration_text};
use super::embedded::EmbeddedExtraction;
use super::episodes::extract_episode_count;
use super::posters::detect_posters;
use super::{non_empty, title_case, unescape_newlines, MetadataRecord, PartialRecord};
use tracing::debug;

/// Everything the merger needs from one page
#[derive(Debug, Clone, Default)]
pub struct LayerOutputs {
    pub page_url: String,
    pub identifier: Option<String>,
    pub embedded: EmbeddedExtraction,
    pub structured: PartialRecord,
    pub linked: PartialRecord,
    /// Serialized application-state tree followed by the serialized linked-data block
    pub combined_text: String,
}

/// Merge layer outputs under the fixed priority order.
///
/// Discriminated object > application-state tree > linked data > markup
/// heuristics > classifier and detector defaults. A field set by a higher
/// source is never replaced.
pub fn merge(outputs: LayerOutputs) -> MetadataRecord {
    let LayerOutputs {
        page_url,
        identifier,
        embedded,
        structured,
        linked,
        combined_text,
    } = outputs;
    let EmbeddedExtraction {
        discriminated,
        heuristic,
        classification,
    } = embedded;

    let mut merged = discriminated
        .unwrap_or_default()
        .or(structured)
        .or(linked)
        .or(heuristic);

    let content_type = match merged.content_type {
        Some(stated) => stated,
        None => {
            debug!("No layer stated a type, falling back to classifier");
            classify_type(&ClassifierSources {
                page_url: &page_url,
                combined_text: &combined_text,
            })
        }
    };
    if let Some(markup) = classification {
        debug!(
            "Markup classification {} via {:?}, resolved {}",
            markup.content_type, markup.basis, content_type
        );
    }

    if content_type.is_series() {
        if merged.episode_count.is_none() {
            merged.episode_count = extract_episode_count(&combined_text);
        }
    } else {
        merged.episode_count = None;
    }

    if merged.landscape_poster_url.is_none() || merged.portrait_poster_url.is_none() {
        let posters = detect_posters(&combined_text);
        merged.landscape_poster_url = merged.landscape_poster_url.or(posters.landscape);
        merged.portrait_poster_url = merged.portrait_poster_url.or(posters.portrait);
    }

    let title = non_empty(merged.title);
    let success = title.is_some() || identifier.is_some();

    MetadataRecord {
        identifier,
        content_type: Some(content_type),
        title,
        description: non_empty(merged.description).map(|d| unescape_newlines(&d)),
        release_date: non_empty(merged.release_date),
        duration: merged.duration.as_deref().and_then(finalize_duration),
        genre: non_empty(merged.genre),
        languages: non_empty(merged.languages).map(|l| title_case(&l)),
        episode_count: merged.episode_count,
        landscape_poster_url: non_empty(merged.landscape_poster_url),
        portrait_poster_url: non_empty(merged.portrait_poster_url),
        url: page_url,
        success,
        error: None,
    }
}

/// Only canonical, non-zero durations leave the pipeline
fn finalize_duration(raw: &str) -> Option<String> {
    let normalized = normalize_duration_text(raw)?;
    if is_canonical(&normalized) && normalized != "0m" {
        Some(normalized)
    } else {
        debug!("Dropping non-canonical duration '{}'", raw);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{Classification, ClassificationBasis, ContentType};

    fn partial(title: &str) -> PartialRecord {
        PartialRecord {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    fn outputs() -> LayerOutputs {
        LayerOutputs {
            page_url: "https://www.stage.in/en/haryanvi/kayantar-14145".to_string(),
            identifier: Some("14145".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_priority_order() {
        let mut layers = outputs();
        layers.embedded.discriminated = Some(partial("From state object"));
        layers.structured = PartialRecord {
            title: Some("From tree".to_string()),
            genre: Some("Drama".to_string()),
            ..Default::default()
        };
        layers.linked = PartialRecord {
            genre: Some("Comedy".to_string()),
            duration: Some("PT1H27M".to_string()),
            ..Default::default()
        };
        layers.embedded.heuristic = PartialRecord {
            duration: Some("2h 0m".to_string()),
            languages: Some("haryanvi".to_string()),
            ..Default::default()
        };

        let record = merge(layers);
        assert_eq!(record.title.as_deref(), Some("From state object"));
        assert_eq!(record.genre.as_deref(), Some("Drama"));
        assert_eq!(record.duration.as_deref(), Some("1h 27m"));
        assert_eq!(record.languages.as_deref(), Some("Haryanvi"));
        assert!(record.success);
    }

    #[test]
    fn test_heuristic_ranks_below_linked_data() {
        let mut layers = outputs();
        layers.linked = partial("Linked");
        layers.embedded.heuristic = partial("Heading");
        assert_eq!(merge(layers).title.as_deref(), Some("Linked"));
    }

    #[test]
    fn test_episode_count_requires_series() {
        let mut layers = outputs();
        layers.structured = PartialRecord {
            content_type: Some(ContentType::Movie),
            episode_count: Some(4),
            ..Default::default()
        };
        let record = merge(layers);
        assert_eq!(record.content_type, Some(ContentType::Movie));
        assert_eq!(record.episode_count, None);
    }

    #[test]
    fn test_markup_word_count_outranks_classifier() {
        let mut layers = outputs();
        layers.embedded.classification = Some(Classification {
            content_type: ContentType::Series,
            basis: ClassificationBasis::LexicalCount,
        });
        layers.embedded.heuristic.content_type = Some(ContentType::Series);
        layers.combined_text = r#"{"link":"/movie/other-1"}"#.to_string();

        let record = merge(layers);
        assert_eq!(record.content_type, Some(ContentType::Series));
    }

    #[test]
    fn test_classifier_resolves_missing_type() {
        // Markup heuristics disabled: no classification, no heuristic type
        let mut layers = outputs();
        layers.combined_text =
            r#"{"seasons":[{"episodes":[]}],"label":"web series","episodeCount":8}"#.to_string();

        let record = merge(layers);
        assert_eq!(record.content_type, Some(ContentType::Series));
        assert_eq!(record.episode_count, Some(8));
    }

    #[test]
    fn test_detector_posters_fill_gaps_only() {
        let mut layers = outputs();
        layers.structured.landscape_poster_url = Some("https://cdn.example/own.webp".to_string());
        layers.combined_text = r#"["https://media.stage.in/a/horizontal/x.jpg","https://media.stage.in/a/vertical/y.jpg"]"#.to_string();

        let record = merge(layers);
        assert_eq!(record.landscape_poster_url.as_deref(), Some("https://cdn.example/own.webp"));
        assert_eq!(
            record.portrait_poster_url.as_deref(),
            Some("https://media.stage.in/a/vertical/y.jpg")
        );
    }

    #[test]
    fn test_non_canonical_duration_dropped() {
        let mut layers = outputs();
        layers.linked.duration = Some("about 90 minutes".to_string());
        assert_eq!(merge(layers).duration, None);

        let mut layers = outputs();
        layers.structured.duration = Some("0m".to_string());
        assert_eq!(merge(layers).duration, None);
    }

    #[test]
    fn test_success_from_identifier_alone() {
        let record = merge(outputs());
        assert!(record.success);
        assert_eq!(record.title, None);

        let mut layers = outputs();
        layers.identifier = None;
        assert!(!merge(layers).success);
    }
}
