use serde::{Deserialize, Deserializer};

// ============================================================================
// Jikan API Types
// ============================================================================
//
// Jikan returns `null` for many fields it has no data for, including list
// fields, so every field here tolerates being absent or null.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope for list endpoints (`/anime?q=`, `/top/manga`, ...)
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct JikanList<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
}

/// Envelope for single-resource endpoints (`/anime/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct JikanSingle<T> {
    pub data: T,
}

/// Anime or manga record as returned by Jikan
///
/// Anime records carry `studios` and `episodes`, manga records carry
/// `authors` and `chapters`. The other pair is simply empty.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct JikanItem {
    #[serde(default)]
    pub mal_id: u64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub images: Option<JikanImages>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_english: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<JikanResource>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub studios: Vec<JikanResource>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<JikanResource>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub chapters: Option<u32>,
}

impl JikanItem {
    /// English title when MAL has one, otherwise the default title
    pub fn display_title(&self) -> Option<&str> {
        self.title_english
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.title.as_deref().filter(|t| !t.trim().is_empty()))
    }

    /// Case-insensitive match against either the default or the English title
    pub fn has_title(&self, candidate: &str) -> bool {
        let candidate = candidate.trim().to_lowercase();
        [self.title.as_deref(), self.title_english.as_deref()]
            .into_iter()
            .flatten()
            .any(|t| t.trim().to_lowercase() == candidate)
    }

    /// Genre names in upstream order, without duplicates
    pub fn genre_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.genres.len());
        for genre in &self.genres {
            if !names.contains(&genre.name) {
                names.push(genre.name.clone());
            }
        }
        names
    }

    pub fn image_url(&self) -> Option<String> {
        let jpg = self.images.as_ref()?.jpg.as_ref()?;
        jpg.large_image_url
            .clone()
            .or_else(|| jpg.image_url.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct JikanImages {
    #[serde(default)]
    pub jpg: Option<JikanImageSet>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct JikanImageSet {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

/// Named cross-reference (genre, studio, author)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct JikanResource {
    #[serde(default)]
    pub mal_id: u64,
    #[serde(default)]
    pub name: String,
}

/// One entry from `/{anime|manga}/{id}/recommendations`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct JikanRecommendation {
    pub entry: JikanEntry,
    #[serde(default)]
    pub votes: u32,
}

/// Short reference to a recommended title; details need a separate lookup
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct JikanEntry {
    pub mal_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}
