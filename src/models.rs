//! Data structures and types for caper
//!
//! Contains the shared models used across the application:
//! - **Route**: the `{category, id}` key a detail page is opened with
//! - **Show**: the fetched TMDB record and its nested genres, videos and cast
//! - **Similar**: entries of the "similar titles" panel

use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading shown when a record carries neither a `title` nor a `name`
pub const UNTITLED: &str = "Untitled";

// =============================================================================
// Route Models
// =============================================================================

/// Media type discriminator for the route category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Recognise a route category segment ("movie" / "tv")
    pub fn from_category(category: &str) -> Option<Self> {
        match category {
            "movie" => Some(MediaType::Movie),
            "tv" => Some(MediaType::Tv),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Tv => write!(f, "TV Show"),
        }
    }
}

/// Numeric show id taken from the route.
///
/// Segments that do not parse are kept verbatim so the fetch layer can report
/// them as an error instead of the route layer rejecting them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShowId {
    Numeric(u64),
    Malformed(String),
}

impl ShowId {
    pub fn parse(segment: &str) -> Self {
        match segment.trim().parse::<u64>() {
            Ok(id) => ShowId::Numeric(id),
            Err(_) => ShowId::Malformed(segment.to_string()),
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ShowId::Numeric(id) => Some(*id),
            ShowId::Malformed(_) => None,
        }
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowId::Numeric(id) => write!(f, "{}", id),
            ShowId::Malformed(raw) => write!(f, "{}", raw),
        }
    }
}

/// Key a detail page is fetched and cached under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteKey {
    pub category: String,
    pub id: ShowId,
}

impl RouteKey {
    pub fn new(category: impl Into<String>, id: ShowId) -> Self {
        Self {
            category: category.into(),
            id,
        }
    }

    pub fn media_type(&self) -> Option<MediaType> {
        MediaType::from_category(&self.category)
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.category, self.id)
    }
}

// =============================================================================
// Show Models (TMDB)
// =============================================================================

/// Title of a record. Movies carry `title`, TV shows carry `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ShowHeading {
    Title(String),
    Name(String),
    Untitled,
}

impl ShowHeading {
    /// Build from the raw optional fields; the first non-empty one wins
    pub fn from_fields(title: Option<String>, name: Option<String>) -> Self {
        match (title, name) {
            (Some(t), _) if !t.is_empty() => ShowHeading::Title(t),
            (_, Some(n)) if !n.is_empty() => ShowHeading::Name(n),
            _ => ShowHeading::Untitled,
        }
    }

    /// The present title, if any
    pub fn title(&self) -> Option<&str> {
        match self {
            ShowHeading::Title(s) | ShowHeading::Name(s) => Some(s),
            ShowHeading::Untitled => None,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title().unwrap_or(UNTITLED)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// A video attached to a record (trailers, teasers, clips)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRef {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl VideoRef {
    /// Watch URL for the hosting site, when we know how to build one
    pub fn url(&self) -> Option<String> {
        match self.site.as_str() {
            "YouTube" => Some(format!("https://www.youtube.com/watch?v={}", self.key)),
            "Vimeo" => Some(format!("https://vimeo.com/{}", self.key)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Videos {
    pub results: Vec<VideoRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

impl fmt::Display for CastMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.character.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} as {}", self.name, self.character)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub cast: Vec<CastMember>,
}

/// Movie or TV show as fetched for the detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowRecord {
    pub heading: ShowHeading,
    pub poster_path: Option<String>,
    pub overview: String,
    pub genres: Vec<Genre>,
    pub videos: Videos,
    pub credits: Credits,
}

impl ShowRecord {
    pub fn display_title(&self) -> &str {
        self.heading.display_title()
    }
}

// =============================================================================
// Similar Titles
// =============================================================================

/// Entry of the "similar titles" panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarTitle {
    pub id: u64,
    pub title: String,
    pub year: Option<u16>,
    pub vote_average: f32,
}

impl fmt::Display for SimilarTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} ★ {:.1}", self.title, year_str, self.vote_average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_id_parse() {
        assert_eq!(ShowId::parse("438631"), ShowId::Numeric(438631));
        assert_eq!(ShowId::parse(" 42 "), ShowId::Numeric(42));
        assert_eq!(ShowId::parse("abc"), ShowId::Malformed("abc".into()));
        assert_eq!(ShowId::parse("-1"), ShowId::Malformed("-1".into()));
        assert_eq!(ShowId::parse("abc").as_u64(), None);
    }

    #[test]
    fn test_route_key_display() {
        let key = RouteKey::new("movie", ShowId::Numeric(438631));
        assert_eq!(key.to_string(), "/movie/438631");
        assert_eq!(key.media_type(), Some(MediaType::Movie));

        let key = RouteKey::new("anime", ShowId::Numeric(1));
        assert_eq!(key.media_type(), None);
    }

    #[test]
    fn test_heading_prefers_title() {
        let heading = ShowHeading::from_fields(Some("Dune".into()), Some("Other".into()));
        assert_eq!(heading, ShowHeading::Title("Dune".into()));
        assert_eq!(heading.display_title(), "Dune");
    }

    #[test]
    fn test_heading_falls_back_to_name() {
        let heading = ShowHeading::from_fields(None, Some("Arcane".into()));
        assert_eq!(heading.display_title(), "Arcane");

        // Empty title counts as absent
        let heading = ShowHeading::from_fields(Some(String::new()), Some("Arcane".into()));
        assert_eq!(heading, ShowHeading::Name("Arcane".into()));
    }

    #[test]
    fn test_heading_untitled() {
        let heading = ShowHeading::from_fields(None, None);
        assert_eq!(heading, ShowHeading::Untitled);
        assert_eq!(heading.title(), None);
        assert_eq!(heading.display_title(), UNTITLED);
    }

    #[test]
    fn test_video_url() {
        let video = VideoRef {
            id: "1".into(),
            key: "dQw4w9WgXcQ".into(),
            name: "Trailer".into(),
            site: "YouTube".into(),
            kind: "Trailer".into(),
        };
        assert_eq!(
            video.url().as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );

        let other = VideoRef {
            site: "Dailymotion".into(),
            ..video
        };
        assert!(other.url().is_none());
    }

    #[test]
    fn test_cast_member_display() {
        let member = CastMember {
            id: 1,
            name: "Timothée Chalamet".into(),
            character: "Paul Atreides".into(),
            profile_path: None,
        };
        assert_eq!(member.to_string(), "Timothée Chalamet as Paul Atreides");
    }
}
