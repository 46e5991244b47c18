//! Response shapes of the Twitter v2 API.
//!
//! Only the fields requested by [`Fields`](crate::Fields) are populated by
//! the API, so everything that is not always returned is optional.

use indexmap::IndexMap;
use serde::Deserialize;
use time::OffsetDateTime;

/// Insertion-ordered metric counters, e.g. `followers_count`, `like_count`.
pub type Metrics = IndexMap<String, u64>;

#[derive(Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub includes: Includes,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub errors: Vec<ApiProblem>,
}

/// Side objects returned alongside a page, grouped by kind.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Includes {
    #[serde(default)]
    pub tweets: Vec<Tweet>,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Includes {
    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
            && self.media.is_empty()
            && self.places.is_empty()
            && self.users.is_empty()
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Meta {
    pub result_count: Option<u64>,
    pub next_token: Option<String>,
}

/// Partial error reported inside a successful response, e.g. an unknown
/// username in a bulk lookup.
#[derive(Deserialize, Clone, Debug)]
pub struct ApiProblem {
    pub value: Option<String>,
    pub detail: Option<String>,
    pub title: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    pub description: Option<String>,
    pub entities: Option<UserEntities>,
    pub location: Option<String>,
    pub pinned_tweet_id: Option<String>,
    pub profile_image_url: Option<String>,
    pub protected: Option<bool>,
    pub public_metrics: Option<Metrics>,
    pub url: Option<String>,
    pub verified: Option<bool>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UserEntities {
    pub url: Option<UrlEntities>,
    pub description: Option<TextEntities>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UrlEntities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
}

/// Annotated spans found in a tweet text or a user bio.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TextEntities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
    #[serde(default)]
    pub hashtags: Vec<HashtagEntity>,
    #[serde(default)]
    pub mentions: Vec<MentionEntity>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct UrlEntity {
    pub url: String,
    pub expanded_url: Option<String>,
    pub display_url: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct HashtagEntity {
    pub tag: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct MentionEntity {
    pub username: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub author_id: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    pub source: Option<String>,
    pub lang: Option<String>,
    pub public_metrics: Option<Metrics>,
    pub entities: Option<TextEntities>,
    pub attachments: Option<Attachments>,
    pub geo: Option<Geo>,
    #[serde(default)]
    pub referenced_tweets: Vec<ReferencedTweet>,
}

impl Tweet {
    pub fn references(&self, kind: &str) -> bool {
        self.referenced_tweets.iter().any(|r| r.kind == kind)
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Attachments {
    #[serde(default)]
    pub media_keys: Vec<String>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Geo {
    pub place_id: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ReferencedTweet {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Media {
    pub media_key: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: Option<String>,
    pub duration_ms: Option<u64>,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub public_metrics: Option<Metrics>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Place {
    pub id: String,
    pub full_name: String,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub place_type: Option<String>,
    pub geo: Option<PlaceGeo>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PlaceGeo {
    #[serde(default)]
    pub bbox: Vec<f64>,
}
