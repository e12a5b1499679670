//! Anime/manga metadata provider abstraction
//!
//! The recommendation pipeline only talks to [`MediaProvider`], so the Jikan
//! client can be swapped for a fake in tests.
use std::time::Duration;

use crate::{
    error::AppResult,
    models::{JikanItem, JikanRecommendation, MediaType},
};

pub mod jikan;

pub use jikan::JikanProvider;

/// Trait for anime/manga metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaProvider: Send + Sync {
    /// Search for a title by name
    ///
    /// Returns the best match, or `None` when the provider has no result.
    async fn search(&self, media_type: MediaType, query: &str) -> AppResult<Option<JikanItem>>;

    /// Community recommendations for the item with the given id
    async fn recommendations(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> AppResult<Vec<JikanRecommendation>>;

    /// Top-ranked items of a media type
    async fn top(&self, media_type: MediaType) -> AppResult<Vec<JikanItem>>;

    /// Full record for a single item
    async fn details(&self, media_type: MediaType, id: u64) -> AppResult<JikanItem>;

    /// Gap to leave between consecutive requests fanned out in parallel
    fn request_spacing(&self) -> Duration;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
