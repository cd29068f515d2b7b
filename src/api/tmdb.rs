//! TMDB (The Movie Database) API client
//!
//! Fetches the detail record and the similar titles for a route.
//! API docs: https://developer.themoviedb.org/docs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::ShowFetcher;
use crate::models::{
    CastMember, Credits, Genre, RouteKey, ShowHeading, ShowId, ShowRecord, SimilarTitle, VideoRef,
    Videos,
};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid show id: {0:?}")]
    InvalidId(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client
#[derive(Debug, Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    language: Option<String>,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            language: None,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
        }
    }

    /// Request localized metadata (e.g. "en-US")
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Make an authenticated GET request with retry logic for rate limits
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T, TmdbError> {
        let mut url = format!("{}{}", self.base_url, endpoint);
        if let Some(language) = &self.language {
            let sep = if url.contains('?') { '&' } else { '?' };
            url.push(sep);
            url.push_str("language=");
            url.push_str(&urlencoding::encode(language));
        }
        let mut retries = 0;

        loop {
            debug!(%url, "tmdb request");
            let response = self
                .client
                .get(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Accept", "application/json")
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await?;
                    let parsed: T = serde_json::from_str(&body).map_err(|e| {
                        TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                    })?;
                    return Ok(parsed);
                }
                StatusCode::NOT_FOUND => {
                    return Err(TmdbError::NotFound);
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(TmdbError::RateLimited);
                    }

                    // Get Retry-After header or default to exponential backoff
                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    warn!(retries, wait_secs, "tmdb rate limited");
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    return Err(TmdbError::ServerError(status.as_u16()));
                }
            }
        }
    }

    /// Get the detail record (with videos and credits) for a route
    pub async fn show_detail(&self, category: &str, id: &ShowId) -> Result<ShowRecord, TmdbError> {
        let id = numeric_id(id)?;
        let endpoint = format!(
            "/{}/{}?append_to_response=videos,credits",
            urlencoding::encode(category),
            id
        );
        let response: ShowResponse = self.get(&endpoint).await?;
        Ok(response.into_record())
    }

    /// Get titles similar to the given one
    pub async fn similar_titles(
        &self,
        category: &str,
        id: &ShowId,
    ) -> Result<Vec<SimilarTitle>, TmdbError> {
        let id = numeric_id(id)?;
        let endpoint = format!("/{}/{}/similar?page=1", urlencoding::encode(category), id);
        let response: SimilarResponse = self.get(&endpoint).await?;
        Ok(response.into_titles())
    }
}

#[async_trait]
impl ShowFetcher for TmdbClient {
    async fn show(&self, key: &RouteKey) -> Result<ShowRecord, TmdbError> {
        self.show_detail(&key.category, &key.id).await
    }

    async fn similar(&self, key: &RouteKey) -> Result<Vec<SimilarTitle>, TmdbError> {
        self.similar_titles(&key.category, &key.id).await
    }
}

fn numeric_id(id: &ShowId) -> Result<u64, TmdbError> {
    match id {
        ShowId::Numeric(id) => Ok(*id),
        ShowId::Malformed(raw) => Err(TmdbError::InvalidId(raw.clone())),
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ShowResponse {
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    poster_path: Option<String>,
    overview: Option<String>,
    #[serde(default)]
    genres: Vec<GenreRaw>,
    videos: Option<VideosRaw>,
    credits: Option<CreditsRaw>,
}

impl ShowResponse {
    fn into_record(self) -> ShowRecord {
        ShowRecord {
            heading: ShowHeading::from_fields(self.title, self.name),
            poster_path: self.poster_path,
            overview: self.overview.unwrap_or_default(),
            genres: self
                .genres
                .into_iter()
                .map(|g| Genre {
                    id: g.id,
                    name: g.name,
                })
                .collect(),
            videos: Videos {
                results: self
                    .videos
                    .map(|v| v.results.into_iter().map(VideoRaw::into_video).collect())
                    .unwrap_or_default(),
            },
            credits: Credits {
                cast: self
                    .credits
                    .map(|c| c.cast.into_iter().map(CastRaw::into_member).collect())
                    .unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenreRaw {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct VideosRaw {
    #[serde(default)]
    results: Vec<VideoRaw>,
}

#[derive(Debug, Deserialize)]
struct VideoRaw {
    id: String,
    key: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    site: String,
    #[serde(rename = "type", default)]
    kind: String,
}

impl VideoRaw {
    fn into_video(self) -> VideoRef {
        VideoRef {
            id: self.id,
            key: self.key,
            name: self.name,
            site: self.site,
            kind: self.kind,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreditsRaw {
    #[serde(default)]
    cast: Vec<CastRaw>,
}

#[derive(Debug, Deserialize)]
struct CastRaw {
    id: u64,
    name: String,
    character: Option<String>,
    profile_path: Option<String>,
}

impl CastRaw {
    fn into_member(self) -> CastMember {
        CastMember {
            id: self.id,
            name: self.name,
            character: self.character.unwrap_or_default(),
            profile_path: self.profile_path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SimilarResponse {
    results: Vec<SimilarRaw>,
}

impl SimilarResponse {
    fn into_titles(self) -> Vec<SimilarTitle> {
        self.results.into_iter().map(SimilarRaw::into_title).collect()
    }
}

#[derive(Debug, Deserialize)]
struct SimilarRaw {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f32>,
}

impl SimilarRaw {
    fn into_title(self) -> SimilarTitle {
        let heading = ShowHeading::from_fields(self.title, self.name);
        let date_str = self.release_date.or(self.first_air_date);
        SimilarTitle {
            id: self.id,
            title: heading.display_title().to_string(),
            year: date_str.and_then(|d| extract_year(&d)),
            vote_average: self.vote_average.unwrap_or(0.0),
        }
    }
}

/// Extract year from a date string like "2022-03-04"
fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2022-03-04"), Some(2022));
        assert_eq!(extract_year("2019-11-12"), Some(2019));
        assert_eq!(extract_year(""), None);
        assert_eq!(extract_year("abc"), None);
    }

    #[test]
    fn test_show_response_movie() {
        let json = r#"{
            "title": "Dune",
            "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
            "overview": "Paul Atreides leads nomadic tribes.",
            "genres": [{"id": 878, "name": "Science Fiction"}],
            "videos": {"results": [
                {"id": "v1", "key": "n9xhJrPXop4", "name": "Official Trailer", "site": "YouTube", "type": "Trailer"}
            ]},
            "credits": {"cast": [
                {"id": 1190668, "name": "Timothée Chalamet", "character": "Paul Atreides", "profile_path": null}
            ]}
        }"#;
        let record = serde_json::from_str::<ShowResponse>(json).unwrap().into_record();

        assert_eq!(record.heading, ShowHeading::Title("Dune".into()));
        assert_eq!(record.genres[0].name, "Science Fiction");
        assert_eq!(record.videos.results[0].kind, "Trailer");
        assert_eq!(record.credits.cast[0].character, "Paul Atreides");
    }

    #[test]
    fn test_show_response_tv_without_appendices() {
        let json = r#"{"name": "Arcane", "overview": null, "poster_path": null}"#;
        let record = serde_json::from_str::<ShowResponse>(json).unwrap().into_record();

        assert_eq!(record.heading, ShowHeading::Name("Arcane".into()));
        assert_eq!(record.overview, "");
        assert!(record.genres.is_empty());
        assert!(record.videos.results.is_empty());
        assert!(record.credits.cast.is_empty());
    }

    #[test]
    fn test_numeric_id_rejects_malformed() {
        assert_eq!(numeric_id(&ShowId::Numeric(7)).unwrap(), 7);
        assert!(matches!(
            numeric_id(&ShowId::Malformed("x1".into())),
            Err(TmdbError::InvalidId(raw)) if raw == "x1"
        ));
    }
}
