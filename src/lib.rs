//! Stage Identity - metadata extraction for STAGE content pages
//!
//! Given the URL of a movie or show detail page, fetches the page and recovers
//! title, type, release date, duration, genre, languages, episode count and
//! poster artwork from the page's embedded state, application-state tree,
//! linked-data block and markup.

pub mod config;
pub mod engine;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod format;
pub mod links;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::engine::StageIdentityEngine;
pub use crate::error::{Result, StageError};
pub use crate::extraction::{ContentType, MetadataRecord, PartialRecord};
pub use crate::fetch::{HttpFetcher, PageFetcher};
pub use crate::format::{format_message, preferred_poster};
pub use crate::links::{extract_urls, is_site_url};
