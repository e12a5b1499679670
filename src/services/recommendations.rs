use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{JikanItem, MediaType, RecommendationRequest, RecommendationResponse},
    services::{
        formatter::{format_item, FormatContext, RecommendationSource},
        providers::MediaProvider,
    },
};

/// Maximum number of recommendations returned to the client
pub const MAX_RESULTS: usize = 5;

/// Below this many community results the top list is used to fill up
pub const MIN_COMMUNITY_RESULTS: usize = 3;

/// Generates recommendations for the first requested title
///
/// 1. Search the first title (404 when nothing matches)
/// 2. Fetch MAL community recommendations and their details in parallel
/// 3. If that failed or produced fewer than three items, fill from the top list
/// 4. Order by preferred genres, cap at five and format
pub async fn get_recommendations(
    provider: Arc<dyn MediaProvider>,
    request: RecommendationRequest,
) -> AppResult<RecommendationResponse> {
    let media_type = request.media_type();

    let searched_title = request
        .titles
        .first()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::InvalidInput("At least one title is required".to_string()))?
        .to_string();

    let base = provider
        .search(media_type, &searched_title)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No {} found matching \"{}\"",
                media_type, searched_title
            ))
        })?;

    tracing::info!(
        searched = %searched_title,
        mal_id = base.mal_id,
        media_type = %media_type,
        provider = provider.name(),
        "Base title matched"
    );

    let mut filter = CandidateFilter::new(&request, base.mal_id);
    let mut candidates: Vec<(JikanItem, RecommendationSource)> = Vec::new();

    match community_items(&provider, media_type, base.mal_id, &filter).await {
        Ok(items) => {
            for item in items {
                if candidates.len() < MAX_RESULTS && filter.accept(&item) {
                    candidates.push((item, RecommendationSource::Community));
                }
            }
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                mal_id = base.mal_id,
                "Recommendation fetch failed, falling back to top list"
            );
        }
    }

    if candidates.len() < MIN_COMMUNITY_RESULTS {
        tracing::info!(
            community = candidates.len(),
            "Not enough community recommendations, supplementing from top list"
        );

        match provider.top(media_type).await {
            Ok(items) => {
                for item in items {
                    if candidates.len() >= MAX_RESULTS {
                        break;
                    }
                    if filter.accept(&item) {
                        candidates.push((item, RecommendationSource::TopList));
                    }
                }
            }
            Err(e) if candidates.is_empty() => return Err(e),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kept = candidates.len(),
                    "Top list fetch failed, returning community results only"
                );
            }
        }
    }

    if let Some(genres) = request.genres.as_deref() {
        prefer_genres(&mut candidates, genres);
    }
    candidates.truncate(MAX_RESULTS);

    let base_genres = base.genre_names();
    let ctx = FormatContext {
        searched_title: &searched_title,
        media_type,
        base_genres: &base_genres,
    };

    let recommendations = candidates
        .iter()
        .map(|(item, source)| format_item(item, &ctx, *source))
        .collect::<Vec<_>>();

    tracing::info!(
        base_title = ?base.display_title(),
        results = recommendations.len(),
        "Recommendations ready"
    );

    Ok(RecommendationResponse {
        recommendations,
        base_title: base
            .display_title()
            .unwrap_or(searched_title.as_str())
            .to_string(),
        media_type,
    })
}

/// Fetches community recommendations and resolves the first few to full records
///
/// Entries the filter would reject anyway are skipped before the detail lookups.
/// Detail lookups run in parallel, each started one request spacing after the
/// previous one; a failed lookup is logged and dropped.
async fn community_items(
    provider: &Arc<dyn MediaProvider>,
    media_type: MediaType,
    base_id: u64,
    filter: &CandidateFilter,
) -> AppResult<Vec<JikanItem>> {
    let entries = provider.recommendations(media_type, base_id).await?;

    let ids: Vec<u64> = entries
        .iter()
        .filter(|rec| filter.would_accept(rec.entry.mal_id, rec.entry.title.as_deref()))
        .map(|rec| rec.entry.mal_id)
        .take(MAX_RESULTS)
        .collect();

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let spacing = provider.request_spacing();
    let mut tasks = Vec::with_capacity(ids.len());
    for (index, id) in ids.into_iter().enumerate() {
        let provider = Arc::clone(provider);
        let offset = spacing * index as u32;
        let task = tokio::spawn(async move {
            tokio::time::sleep(offset).await;
            (id, provider.details(media_type, id).await)
        });
        tasks.push(task);
    }

    let mut results = Vec::new();
    let mut error_count = 0;

    for task in tasks {
        match task.await {
            Ok((_, Ok(item))) => results.push(item),
            Ok((id, Err(e))) => {
                tracing::error!(error = %e, mal_id = id, "Detail fetch failed for recommendation");
                error_count += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                error_count += 1;
            }
        }
    }

    if error_count > 0 {
        tracing::warn!(
            success_count = results.len(),
            error_count,
            "Partial detail fetch failure"
        );
    }

    Ok(results)
}

/// Rejects the base item, duplicates and anything the user excluded or already named
struct CandidateFilter {
    base_id: u64,
    seen: HashSet<u64>,
    excluded_titles: Vec<String>,
}

impl CandidateFilter {
    fn new(request: &RecommendationRequest, base_id: u64) -> Self {
        let excluded_titles = request
            .titles
            .iter()
            .chain(request.exclude.iter().flatten())
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            base_id,
            seen: HashSet::new(),
            excluded_titles,
        }
    }

    fn would_accept(&self, id: u64, title: Option<&str>) -> bool {
        if id == self.base_id || self.seen.contains(&id) {
            return false;
        }
        match title {
            Some(title) => !self.is_excluded(title),
            None => true,
        }
    }

    fn is_excluded(&self, title: &str) -> bool {
        let title = title.trim().to_lowercase();
        self.excluded_titles.iter().any(|t| *t == title)
    }

    /// Checks an item and records it as seen when accepted
    fn accept(&mut self, item: &JikanItem) -> bool {
        if !self.would_accept(item.mal_id, None) {
            return false;
        }
        if self.excluded_titles.iter().any(|t| item.has_title(t)) {
            return false;
        }
        self.seen.insert(item.mal_id);
        true
    }
}

/// Stable reorder: items sharing a preferred genre first
fn prefer_genres(candidates: &mut [(JikanItem, RecommendationSource)], genres: &[String]) {
    if genres.is_empty() {
        return;
    }
    candidates.sort_by_key(|(item, _)| {
        let matches = item
            .genres
            .iter()
            .any(|g| genres.iter().any(|p| p.trim().eq_ignore_ascii_case(&g.name)));
        !matches
    });
}
