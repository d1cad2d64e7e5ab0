use std::collections::HashSet;
use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of content types that can be liked, saved and commented on.
///
/// Interaction endpoints address content through a lowercase type tag plus a
/// numeric id; keeping the tag an enum makes the resolver exhaustive instead
/// of an untyped string lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Review,
    Movie,
    News,
    Award,
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ContentKind::Review => "review",
            ContentKind::Movie => "movie",
            ContentKind::News => "news",
            ContentKind::Award => "award",
        };
        write!(f, "{}", tag)
    }
}

impl FromStr for ContentKind {
    type Err = ();

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "review" => Ok(ContentKind::Review),
            "movie" => Ok(ContentKind::Movie),
            "news" => Ok(ContentKind::News),
            "award" => Ok(ContentKind::Award),
            _ => Err(()),
        }
    }
}

/// A polymorphic reference to exactly one content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRef {
    pub kind: ContentKind,
    pub id: u64,
}

impl ContentRef {
    pub fn new(kind: ContentKind, id: u64) -> Self {
        Self { kind, id }
    }
}

impl Display for ContentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Whether a review covers a movie or a TV show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSubject {
    Movie,
    TvShow,
}

/// Valid range for review ratings, inclusive.
pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 10.0;

/// Checks a rating against the allowed 1.0..=10.0 range.
pub fn rating_in_range(rating: f64) -> bool {
    (RATING_MIN..=RATING_MAX).contains(&rating)
}

/// A published review of a movie or TV show.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: u64,
    pub title: String,
    pub subject: ReviewSubject,
    pub body: String,
    pub cast: String,
    pub director: String,
    pub verdict: String,
    pub rating: f64,
    pub genre_id: u64,
    pub industry_id: u64,
    pub platform_id: u64,
    pub publisher_id: u64,
    pub created_at: DateTime<Utc>,
    pub liked_by: HashSet<u64>,
    pub saved_by: HashSet<u64>,
}

/// A movie catalogue entry.
#[derive(Debug, Clone)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub brief_description: String,
    pub director: String,
    pub producer: String,
    pub release_date: NaiveDate,
    pub cast: String,
    pub genre_id: u64,
    pub industry_id: u64,
    pub platform_id: u64,
    pub publisher_id: u64,
    pub created_at: DateTime<Utc>,
    pub liked_by: HashSet<u64>,
    pub saved_by: HashSet<u64>,
}

/// A news article.
#[derive(Debug, Clone)]
pub struct News {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub publisher_id: u64,
    pub created_at: DateTime<Utc>,
    pub liked_by: HashSet<u64>,
    pub saved_by: HashSet<u64>,
}

/// An awards announcement.
#[derive(Debug, Clone)]
pub struct Award {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub publisher_id: u64,
    pub created_at: DateTime<Utc>,
    pub liked_by: HashSet<u64>,
    pub saved_by: HashSet<u64>,
}
