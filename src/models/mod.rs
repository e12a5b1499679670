use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod jikan;

pub use jikan::{
    JikanEntry, JikanImageSet, JikanImages, JikanItem, JikanList, JikanRecommendation,
    JikanResource, JikanSingle,
};

/// Kind of media a request is about
///
/// Anime has its own Jikan resource; manga, manhwa and manhua all live under
/// the `manga` resource and are told apart by its `type` filter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Anime,
    #[default]
    Manga,
    Manhwa,
    Manhua,
}

impl MediaType {
    /// Jikan resource segment (`/anime/...` or `/manga/...`)
    pub fn resource(self) -> &'static str {
        match self {
            MediaType::Anime => "anime",
            MediaType::Manga | MediaType::Manhwa | MediaType::Manhua => "manga",
        }
    }

    /// Value for Jikan's `type` query filter, if the media type needs one
    pub fn type_filter(self) -> Option<&'static str> {
        match self {
            MediaType::Manhwa => Some("manhwa"),
            MediaType::Manhua => Some("manhua"),
            MediaType::Anime | MediaType::Manga => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaType::Anime => "anime",
            MediaType::Manga => "manga",
            MediaType::Manhwa => "manhwa",
            MediaType::Manhua => "manhua",
        }
    }

    pub fn is_anime(self) -> bool {
        matches!(self, MediaType::Anime)
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Body of `POST /api/recommendations`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Titles the user liked; the first one seeds the lookup
    #[serde(default)]
    pub titles: Vec<String>,
    /// Preferred genres, used to order results
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    /// Titles that must not be recommended
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
}

impl RecommendationRequest {
    pub fn media_type(&self) -> MediaType {
        self.media_type.unwrap_or_default()
    }
}

/// Length of a title in its own unit
///
/// Flattened into [`Recommendation`] so exactly one of `episodes` or
/// `chapters` appears in the JSON output.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub enum Length {
    #[serde(rename = "episodes")]
    Episodes(Option<u32>),
    #[serde(rename = "chapters")]
    Chapters(Option<u32>),
}

/// A single recommendation returned to the client
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    pub creator: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub genres: Vec<String>,
    pub description: String,
    pub similar_to: String,
    pub why_recommended: String,
    pub image: Option<String>,
    pub url: Option<String>,
    pub score: Option<f64>,
    #[serde(flatten)]
    pub length: Length,
}

/// Response of `POST /api/recommendations`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
    pub base_title: String,
    pub media_type: MediaType,
}
