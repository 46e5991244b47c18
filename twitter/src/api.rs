use async_trait::async_trait;

use crate::model::{ApiResponse, Tweet, User};
use crate::{Fields, TwitterError};

/// Paged listings of accounts related to a user id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsersEndpoint {
    Following(String),
    Followers(String),
}

/// Paged listings of tweets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TweetsEndpoint {
    /// Timeline of a user id
    UserTweets(String),
    /// Recent search for a query
    SearchRecent(String),
}

/// Upstream operations used by the extractor.
///
/// Every paged call takes the opaque cursor returned in the previous
/// page's `meta.next_token`, `None` for the first page.
#[async_trait]
pub trait TwitterApi: Send + Sync {
    async fn user(&self, username: &str, fields: &Fields)
        -> Result<ApiResponse<User>, TwitterError>;

    async fn users(
        &self,
        usernames: &[String],
        fields: &Fields,
    ) -> Result<ApiResponse<Vec<User>>, TwitterError>;

    async fn users_page(
        &self,
        endpoint: &UsersEndpoint,
        fields: &Fields,
        cursor: Option<&str>,
    ) -> Result<ApiResponse<Vec<User>>, TwitterError>;

    async fn tweets_page(
        &self,
        endpoint: &TweetsEndpoint,
        fields: &Fields,
        cursor: Option<&str>,
    ) -> Result<ApiResponse<Vec<Tweet>>, TwitterError>;
}
