use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::api::{TweetsEndpoint, TwitterApi, UsersEndpoint};
use crate::model::{ApiResponse, Tweet, User};
use crate::rate_limit::check_rate_limit;
use crate::{Auth, Fields, TwitterError};

static API_BASE: &str = "https://api.twitter.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Twitter v2 API client.
///
/// Rate limited requests are retried after sleeping until the limit resets.
pub struct TwitterClient {
    client: Client,
    auth: Auth,
    base: String,
}

/// HTTP client shared by API requests and the PIN flow.
pub fn http_client() -> Result<Client, TwitterError> {
    build_client(REQUEST_TIMEOUT)
}

fn build_client(timeout: Duration) -> Result<Client, TwitterError> {
    ClientBuilder::new()
        .timeout(timeout)
        .build()
        .map_err(|source| TwitterError::Request {
            endpoint: API_BASE.to_string(),
            source,
        })
}

impl TwitterClient {
    pub fn new(auth: Auth) -> Result<Self, TwitterError> {
        Ok(Self::with_client(http_client()?, auth))
    }

    pub fn with_client(client: Client, auth: Auth) -> Self {
        Self {
            client,
            auth,
            base: API_BASE.to_string(),
        }
    }

    /// Send requests to `base` instead of the public API, e.g. a proxy.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Account the client acts for
    pub async fn me(&self) -> Result<User, TwitterError> {
        let resp: ApiResponse<User> = self.get("/2/users/me", vec![]).await?;
        resp.data.ok_or_else(|| TwitterError::Parse {
            endpoint: "/2/users/me".to_string(),
            msg: "missing data".to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(&str, String)>,
    ) -> Result<T, TwitterError> {
        let url = format!("{}{}", self.base, path);
        let err_func = |source: reqwest::Error| TwitterError::Request {
            endpoint: path.to_string(),
            source,
        };

        let resp = loop {
            let auth = self.auth.header("GET", &url, &query)?;
            let resp = self
                .client
                .get(&url)
                .query(&query)
                .header(header::AUTHORIZATION, auth)
                .send()
                .await
                .map_err(err_func)?;

            if let Some(duration) = check_rate_limit(resp.status(), resp.headers()) {
                tracing::warn!(endpoint = path, ?duration, "rate limit hit, sleeping");
                sleep(duration).await;
                continue;
            }

            break resp;
        };

        let status = resp.status();
        let body = resp.text().await.map_err(err_func)?;
        if !status.is_success() {
            return Err(TwitterError::Status {
                endpoint: path.to_string(),
                status,
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| TwitterError::Parse {
            endpoint: path.to_string(),
            msg: e.to_string(),
        })
    }
}

#[async_trait]
impl TwitterApi for TwitterClient {
    async fn user(
        &self,
        username: &str,
        fields: &Fields,
    ) -> Result<ApiResponse<User>, TwitterError> {
        let path = format!("/2/users/by/username/{}", urlencoding::encode(username));
        self.get(&path, fields.query()).await
    }

    async fn users(
        &self,
        usernames: &[String],
        fields: &Fields,
    ) -> Result<ApiResponse<Vec<User>>, TwitterError> {
        let mut query = vec![("usernames", usernames.join(","))];
        query.extend(fields.query());
        self.get("/2/users/by", query).await
    }

    async fn users_page(
        &self,
        endpoint: &UsersEndpoint,
        fields: &Fields,
        cursor: Option<&str>,
    ) -> Result<ApiResponse<Vec<User>>, TwitterError> {
        let path = match endpoint {
            UsersEndpoint::Following(id) => format!("/2/users/{}/following", id),
            UsersEndpoint::Followers(id) => format!("/2/users/{}/followers", id),
        };

        let mut query = fields.query();
        if let Some(cursor) = cursor {
            query.push(("pagination_token", cursor.to_string()));
        }

        tracing::info!(path = %path, ?cursor, "fetching users page");
        self.get(&path, query).await
    }

    async fn tweets_page(
        &self,
        endpoint: &TweetsEndpoint,
        fields: &Fields,
        cursor: Option<&str>,
    ) -> Result<ApiResponse<Vec<Tweet>>, TwitterError> {
        let mut query = fields.query();
        let path = match endpoint {
            TweetsEndpoint::UserTweets(id) => {
                if let Some(cursor) = cursor {
                    query.push(("pagination_token", cursor.to_string()));
                }
                format!("/2/users/{}/tweets", id)
            }
            TweetsEndpoint::SearchRecent(keyword) => {
                query.push(("query", keyword.clone()));
                if let Some(cursor) = cursor {
                    query.push(("next_token", cursor.to_string()));
                }
                "/2/tweets/search/recent".to_string()
            }
        };

        tracing::info!(path = %path, ?cursor, "fetching tweets page");
        self.get(&path, query).await
    }
}
