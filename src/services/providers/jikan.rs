/// Jikan (unofficial MyAnimeList) API provider
///
/// API Flow:
/// 1. Search: /{anime|manga}?q=... → candidate items, best match wins
/// 2. Recommendations: /{resource}/{id}/recommendations → entry references
/// 3. Details: /{resource}/{id} → full record for each entry
/// 4. Fallback: /top/{resource} → top-ranked items
///
/// Jikan rate-limits aggressively, so every request waits a fixed delay first.
use crate::{
    error::{AppError, AppResult},
    models::{JikanItem, JikanList, JikanRecommendation, JikanSingle, MediaType},
    services::providers::MediaProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

const SEARCH_LIMIT: &str = "5";

#[derive(Clone)]
pub struct JikanProvider {
    http_client: HttpClient,
    api_url: String,
    request_delay: Duration,
}

impl JikanProvider {
    pub fn new(api_url: String, request_delay: Duration) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            request_delay,
        }
    }

    /// Waits the configured delay, then GETs `path` and parses the JSON body
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        tokio::time::sleep(self.request_delay).await;

        let url = format!("{}/{}", self.api_url, path);
        tracing::debug!(url = %url, "Fetching from Jikan");

        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Jikan API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                "Failed to deserialize Jikan response"
            );
            AppError::ExternalApi(format!("Failed to parse Jikan response: {}", e))
        })
    }

    fn with_type_filter<'a>(
        media_type: MediaType,
        mut query: Vec<(&'a str, &'a str)>,
    ) -> Vec<(&'a str, &'a str)> {
        if let Some(filter) = media_type.type_filter() {
            query.push(("type", filter));
        }
        query
    }

    /// Exact title match first, otherwise Jikan's own ranking
    fn best_match(query: &str, items: Vec<JikanItem>) -> Option<JikanItem> {
        match items.iter().position(|item| item.has_title(query)) {
            Some(index) => items.into_iter().nth(index),
            None => items.into_iter().next(),
        }
    }
}

#[async_trait::async_trait]
impl MediaProvider for JikanProvider {
    async fn search(&self, media_type: MediaType, query: &str) -> AppResult<Option<JikanItem>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let params = Self::with_type_filter(media_type, vec![("q", query), ("limit", SEARCH_LIMIT)]);
        let results: JikanList<JikanItem> =
            self.fetch_json(media_type.resource(), &params).await?;

        tracing::info!(
            query = %query,
            media_type = %media_type,
            results = results.data.len(),
            provider = "jikan",
            "Title search completed"
        );

        Ok(Self::best_match(query, results.data))
    }

    async fn recommendations(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> AppResult<Vec<JikanRecommendation>> {
        let path = format!("{}/{}/recommendations", media_type.resource(), id);
        let results: JikanList<JikanRecommendation> = self.fetch_json(&path, &[]).await?;

        tracing::info!(
            mal_id = id,
            media_type = %media_type,
            results = results.data.len(),
            provider = "jikan",
            "Recommendations fetched"
        );

        Ok(results.data)
    }

    async fn top(&self, media_type: MediaType) -> AppResult<Vec<JikanItem>> {
        let path = format!("top/{}", media_type.resource());
        let params = Self::with_type_filter(media_type, Vec::new());
        let results: JikanList<JikanItem> = self.fetch_json(&path, &params).await?;

        tracing::info!(
            media_type = %media_type,
            results = results.data.len(),
            provider = "jikan",
            "Top list fetched"
        );

        Ok(results.data)
    }

    async fn details(&self, media_type: MediaType, id: u64) -> AppResult<JikanItem> {
        let path = format!("{}/{}", media_type.resource(), id);
        let result: JikanSingle<JikanItem> = self.fetch_json(&path, &[]).await?;
        Ok(result.data)
    }

    fn request_spacing(&self) -> Duration {
        self.request_delay
    }

    fn name(&self) -> &'static str {
        "jikan"
    }
}
