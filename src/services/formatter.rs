use crate::models::{JikanItem, JikanResource, Length, MediaType, Recommendation};

const UNKNOWN: &str = "Unknown";
const NO_DESCRIPTION: &str = "No description available";

/// Where a recommended item came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationSource {
    /// MyAnimeList user recommendations for the base title
    Community,
    /// Top-ranked list, used when community results run short
    TopList,
}

/// Request-level context shared by every formatted item
#[derive(Debug, Clone, Copy)]
pub struct FormatContext<'a> {
    /// Title exactly as the user typed it
    pub searched_title: &'a str,
    pub media_type: MediaType,
    /// Genres of the matched base item
    pub base_genres: &'a [String],
}

/// Maps an upstream record to the client-facing shape, filling in defaults
/// for anything Jikan left out.
pub fn format_item(
    item: &JikanItem,
    ctx: &FormatContext<'_>,
    source: RecommendationSource,
) -> Recommendation {
    let genres = item.genre_names();
    let media_type = ctx.media_type;

    let creators = if media_type.is_anime() {
        &item.studios
    } else {
        &item.authors
    };

    let length = if media_type.is_anime() {
        Length::Episodes(item.episodes)
    } else {
        Length::Chapters(item.chapters)
    };

    Recommendation {
        title: item.display_title().unwrap_or(UNKNOWN).to_string(),
        creator: join_names(creators).unwrap_or_else(|| UNKNOWN.to_string()),
        kind: item
            .kind
            .clone()
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| media_type.label().to_string()),
        description: item
            .synopsis
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        similar_to: ctx.searched_title.to_string(),
        why_recommended: why_recommended(ctx, source, &genres),
        image: item.image_url(),
        url: item.url.clone(),
        score: item.score,
        genres,
        length,
    }
}

fn join_names(resources: &[JikanResource]) -> Option<String> {
    let names: Vec<&str> = resources
        .iter()
        .map(|r| r.name.as_str())
        .filter(|n| !n.is_empty())
        .collect();
    (!names.is_empty()).then(|| names.join(", "))
}

fn why_recommended(
    ctx: &FormatContext<'_>,
    source: RecommendationSource,
    genres: &[String],
) -> String {
    let mut reason = match source {
        RecommendationSource::Community => {
            format!("Fans of {} also enjoyed this", ctx.searched_title)
        }
        RecommendationSource::TopList => {
            format!("Highly rated {} you might enjoy", ctx.media_type.label())
        }
    };

    let shared: Vec<&str> = genres
        .iter()
        .filter(|g| ctx.base_genres.iter().any(|b| b.eq_ignore_ascii_case(g)))
        .map(String::as_str)
        .collect();

    if !shared.is_empty() {
        reason.push_str(&format!(" (shared genres: {})", shared.join(", ")));
    }

    reason
}
