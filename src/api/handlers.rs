//! API request handlers

use futures::stream::{self, StreamExt};
use serde_json::Value;

use super::server::AppState;
use crate::error::{Result, StageError};
use crate::extraction::MetadataRecord;
use crate::links::is_site_url;

/// Handle health check requests
pub async fn health_check() -> Result<Value> {
    Ok(serde_json::json!({
        "status": "healthy",
        "service": "stage-identity",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle a single extraction; URLs off the content site are rejected
pub async fn extract(state: &AppState, url: &str) -> Result<MetadataRecord> {
    let url = url.trim();
    if !is_site_url(url, &state.config.fetch.site_domain) {
        return Err(StageError::InvalidUrl(format!(
            "{} is not a {} content page",
            url, state.config.fetch.site_domain
        )));
    }

    Ok(state.engine.get_identity(url).await)
}

/// Handle a batch extraction, preserving request order
pub async fn extract_batch(state: &AppState, urls: &[String]) -> Result<Vec<MetadataRecord>> {
    if urls.is_empty() {
        return Err(StageError::InvalidUrl("no URLs supplied".to_string()));
    }

    let limit = state.config.performance.max_concurrent_requests.max(1);
    let records = stream::iter(urls.iter())
        .map(|url| async move {
            match extract(state, url).await {
                Ok(record) => record,
                Err(e) => MetadataRecord::failure(url.trim(), e.to_string()),
            }
        })
        .buffered(limit)
        .collect::<Vec<_>>()
        .await;

    Ok(records)
}
