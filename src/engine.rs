//! Extraction engine: fetch, run every layer, merge

use crate::config::Config;
use crate::error::StageError;
use crate::extraction::{
    extract_embedded, extract_identifier, extract_linked_data, extract_structured_tree,
    find_linked_data, find_next_data, merge, HtmlHeuristics, LayerOutputs, MetadataRecord,
};
use crate::fetch::{HttpFetcher, PageFetcher};
use scraper::Html;
use serde_json::Value;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

/// Public entry point for metadata extraction
pub struct StageIdentityEngine<F: PageFetcher = HttpFetcher> {
    fetcher: F,
    heuristics: HtmlHeuristics,
}

impl StageIdentityEngine<HttpFetcher> {
    /// Create an engine that fetches pages over HTTP
    pub fn new(config: &Config) -> Self {
        Self::with_fetcher(config, HttpFetcher::new(&config.fetch))
    }
}

impl<F: PageFetcher> StageIdentityEngine<F> {
    /// Create an engine around any page source
    pub fn with_fetcher(config: &Config, fetcher: F) -> Self {
        Self {
            fetcher,
            heuristics: config.heuristics(),
        }
    }

    /// Fetch `url` and extract its metadata.
    ///
    /// Never fails: transport errors and internal faults come back as a
    /// record with `success = false` and `error` set.
    pub async fn get_identity(&self, url: &str) -> MetadataRecord {
        let url = url.trim();
        if url.is_empty() {
            let error = StageError::InvalidUrl("empty URL".to_string());
            return MetadataRecord::failure(url, error.to_string());
        }

        info!("🎬 Extracting metadata for: {}", url);
        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("❌ Fetch failed for {}: {}", url, e);
                return MetadataRecord::failure(url, e.to_string());
            }
        };

        self.extract_from_html(url, &html)
    }

    /// Run the synchronous pipeline over already-fetched HTML
    pub fn extract_from_html(&self, url: &str, html: &str) -> MetadataRecord {
        match panic::catch_unwind(AssertUnwindSafe(|| run_pipeline(url, html, &self.heuristics))) {
            Ok(record) => record,
            Err(payload) => {
                let fault = StageError::Internal(panic_message(payload.as_ref()));
                error!("💥 Extraction aborted for {}: {}", url, fault);
                MetadataRecord::failure(url, fault.to_string())
            }
        }
    }
}

/// Every layer over one page, then the merge
pub fn run_pipeline(url: &str, html: &str, heuristics: &HtmlHeuristics) -> MetadataRecord {
    let document = Html::parse_document(html);

    let identifier = extract_identifier(url);
    let embedded = extract_embedded(&document, html, url, heuristics);

    let tree = find_next_data(&document);
    let linked_node = find_linked_data(&document);
    debug!(
        "Source blocks: next_data={} linked_data={}",
        tree.is_some(),
        linked_node.is_some()
    );

    let structured = tree.as_ref().map(extract_structured_tree).unwrap_or_default();
    let linked = linked_node.as_ref().map(extract_linked_data).unwrap_or_default();
    let combined_text = serialize_sources(&[tree.as_ref(), linked_node.as_ref()]);

    let record = merge(LayerOutputs {
        page_url: url.to_string(),
        identifier,
        embedded,
        structured,
        linked,
        combined_text,
    });

    if record.success {
        info!(
            "✅ Extracted '{}' ({})",
            record.title.as_deref().unwrap_or("untitled"),
            record
                .content_type
                .map(|t| t.to_string())
                .unwrap_or_default()
        );
    } else {
        warn!("⚠️ No title or identifier recovered from {}", url);
    }
    record
}

fn serialize_sources(sources: &[Option<&Value>]) -> String {
    sources
        .iter()
        .flatten()
        .filter_map(|value| serde_json::to_string(value).ok())
        .collect::<Vec<_>>()
        .join("")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;

    struct StaticPage(&'static str);

    #[async_trait]
    impl PageFetcher for StaticPage {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_get_identity_runs_pipeline() {
        let engine = StageIdentityEngine::with_fetcher(
            &Config::default(),
            StaticPage(r#"<html><head><meta property="og:title" content="Kayantar"></head></html>"#),
        );
        let record = engine
            .get_identity("https://www.stage.in/en/haryanvi/movie/kayantar-14145")
            .await;
        assert!(record.success);
        assert_eq!(record.title.as_deref(), Some("Kayantar"));
        assert_eq!(record.identifier.as_deref(), Some("14145"));
    }

    #[tokio::test]
    async fn test_empty_url_is_rejected() {
        let engine = StageIdentityEngine::with_fetcher(&Config::default(), StaticPage(""));
        let record = engine.get_identity("  ").await;
        assert!(!record.success);
        assert!(record.error.unwrap().contains("Invalid URL"));
    }

    #[test]
    fn test_blocking_caller() {
        let engine = StageIdentityEngine::with_fetcher(
            &Config::default(),
            StaticPage("<html><body><h1>Videshi Bahu</h1></body></html>"),
        );
        let record = tokio_test::block_on(
            engine.get_identity("https://www.stage.in/en/rajasthani/videshi-bahu-5521"),
        );
        assert!(record.success);
        assert_eq!(record.episode_count, Some(12));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }

    #[test]
    fn test_serialize_sources_skips_missing() {
        let tree = serde_json::json!({"a": 1});
        assert_eq!(serialize_sources(&[Some(&tree), None]), r#"{"a":1}"#);
        assert_eq!(serialize_sources(&[None, None]), "");
    }
}
