use std::path::PathBuf;

use serde::Deserialize;
use twitter::ConsumerKey;

#[derive(Deserialize, Debug)]
pub struct TwitterConfig {
    pub bearer_token: Option<String>,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    /// Access token of the delegated account, written after the PIN flow
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            consumer_key: None,
            consumer_secret: None,
            credentials_file: default_credentials_file(),
        }
    }
}

impl TwitterConfig {
    pub fn bearer_token(&self) -> Option<String> {
        self.bearer_token
            .clone()
            .or_else(|| std::env::var("TWITTER_BEARER_TOKEN").ok())
    }

    pub fn consumer(&self) -> Option<ConsumerKey> {
        let key = self
            .consumer_key
            .clone()
            .or_else(|| std::env::var("TWITTER_CONSUMER_KEY").ok())?;
        let secret = self
            .consumer_secret
            .clone()
            .or_else(|| std::env::var("TWITTER_CONSUMER_SECRET").ok())?;
        Some(ConsumerKey { key, secret })
    }
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from("external_user_creds.json")
}
