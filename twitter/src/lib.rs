mod api;
pub mod auth;
mod client;
mod error;
mod fields;
mod join;
pub mod model;
mod paginate;
mod rate_limit;

pub use api::{TweetsEndpoint, TwitterApi, UsersEndpoint};
pub use auth::{AccessToken, Auth, ConsumerKey, RequestToken};
pub use client::{http_client, TwitterClient};
pub use error::TwitterError;
pub use fields::Fields;
pub use join::{JoinedTweet, JoinedUser, Pinned};
pub use paginate::{ensure_public, followers, friends, search_tweets, user_tweets, JoinedStream};
