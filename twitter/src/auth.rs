//! Authorization for API requests.
//!
//! Requests are made either as the app owning the API keys (bearer token)
//! or on behalf of another account that granted access through the PIN
//! based OAuth 1.0a flow.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::{header, Client};
use sha1::Sha1;
use time::OffsetDateTime;

use crate::TwitterError;

static REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";
static AUTHORIZE_URL: &str = "https://api.twitter.com/oauth/authorize";
static ACCESS_TOKEN_URL: &str = "https://api.twitter.com/oauth/access_token";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsumerKey {
    pub key: String,
    pub secret: String,
}

/// Access granted by a delegated account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub secret: String,
}

/// Temporary credentials of a pending PIN authorization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestToken {
    pub token: String,
    pub secret: String,
}

impl RequestToken {
    /// Page where the delegated account approves access and gets a PIN
    pub fn authorize_url(&self) -> String {
        format!(
            "{}?oauth_token={}",
            AUTHORIZE_URL,
            urlencoding::encode(&self.token)
        )
    }
}

#[derive(Clone, Debug)]
pub enum Auth {
    /// App-only access as the owner of the API keys
    Bearer(String),
    /// User context access on behalf of a delegated account
    User {
        consumer: ConsumerKey,
        access: AccessToken,
    },
}

impl Auth {
    pub fn is_delegated(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// Value of the `Authorization` header for a request.
    ///
    /// `url` must not contain a query string, query parameters are passed in
    /// `params` so they are covered by the OAuth signature.
    pub(crate) fn header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<String, TwitterError> {
        match self {
            Self::Bearer(token) => Ok(format!("Bearer {}", token)),
            Self::User { consumer, access } => {
                let oauth = OAuthParams::new(consumer, Some((&access.token, &access.secret)));
                oauth.header(method, url, params)
            }
        }
    }
}

/// Start the PIN flow, the returned token's [`authorize_url`] must be
/// opened by the delegated account.
///
/// [`authorize_url`]: RequestToken::authorize_url
pub async fn request_token(
    client: &Client,
    consumer: &ConsumerKey,
) -> Result<RequestToken, TwitterError> {
    let mut oauth = OAuthParams::new(consumer, None);
    oauth.extra.push(("oauth_callback", "oob".to_string()));
    let auth = oauth.header("POST", REQUEST_TOKEN_URL, &[])?;

    let body = post_form(client, REQUEST_TOKEN_URL, auth).await?;
    let (token, secret) = token_pair(&body, REQUEST_TOKEN_URL)?;

    Ok(RequestToken { token, secret })
}

/// Finish the PIN flow by trading the PIN for an access token.
pub async fn access_token(
    client: &Client,
    consumer: &ConsumerKey,
    request: &RequestToken,
    pin: &str,
) -> Result<AccessToken, TwitterError> {
    let mut oauth = OAuthParams::new(consumer, Some((&request.token, &request.secret)));
    oauth.extra.push(("oauth_verifier", pin.trim().to_string()));
    let auth = oauth.header("POST", ACCESS_TOKEN_URL, &[])?;

    let body = post_form(client, ACCESS_TOKEN_URL, auth).await?;
    let (token, secret) = token_pair(&body, ACCESS_TOKEN_URL)?;

    Ok(AccessToken { token, secret })
}

async fn post_form(client: &Client, url: &str, auth: String) -> Result<String, TwitterError> {
    let err_func = |source: reqwest::Error| TwitterError::Request {
        endpoint: url.to_string(),
        source,
    };

    let resp = client
        .post(url)
        .header(header::AUTHORIZATION, auth)
        .send()
        .await
        .map_err(err_func)?;

    let status = resp.status();
    let body = resp.text().await.map_err(err_func)?;
    if !status.is_success() {
        return Err(TwitterError::Status {
            endpoint: url.to_string(),
            status,
            body,
        });
    }

    Ok(body)
}

fn token_pair(body: &str, endpoint: &str) -> Result<(String, String), TwitterError> {
    let mut token = None;
    let mut secret = None;
    for pair in body.split('&') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let value = urlencoding::decode(value)
            .map_err(|e| TwitterError::Parse {
                endpoint: endpoint.to_string(),
                msg: e.to_string(),
            })?
            .into_owned();
        match name {
            "oauth_token" => token = Some(value),
            "oauth_token_secret" => secret = Some(value),
            _ => {}
        }
    }

    match (token, secret) {
        (Some(token), Some(secret)) => Ok((token, secret)),
        _ => Err(TwitterError::Auth(format!(
            "{} did not return an oauth token",
            endpoint
        ))),
    }
}

struct OAuthParams<'a> {
    consumer: &'a ConsumerKey,
    token: Option<(&'a str, &'a str)>,
    nonce: String,
    timestamp: String,
    extra: Vec<(&'static str, String)>,
}

impl<'a> OAuthParams<'a> {
    fn new(consumer: &'a ConsumerKey, token: Option<(&'a str, &'a str)>) -> Self {
        Self {
            consumer,
            token,
            nonce: uuid::Uuid::new_v4().simple().to_string(),
            timestamp: OffsetDateTime::now_utc().unix_timestamp().to_string(),
            extra: vec![],
        }
    }

    fn oauth_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("oauth_consumer_key", self.consumer.key.clone()),
            ("oauth_nonce", self.nonce.clone()),
            ("oauth_signature_method", "HMAC-SHA1".to_string()),
            ("oauth_timestamp", self.timestamp.clone()),
            ("oauth_version", "1.0".to_string()),
        ];
        if let Some((token, _)) = self.token {
            pairs.push(("oauth_token", token.to_string()));
        }
        pairs.extend(self.extra.iter().cloned());
        pairs
    }

    fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<String, TwitterError> {
        let mut encoded: Vec<(String, String)> = self
            .oauth_pairs()
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .chain(params.iter().map(|(k, v)| (k.to_string(), v.clone())))
            .map(|(k, v)| (encode(&k), encode(&v)))
            .collect();
        encoded.sort();

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let base = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(url),
            encode(&param_string)
        );
        let key = format!(
            "{}&{}",
            encode(&self.consumer.secret),
            encode(self.token.map(|(_, secret)| secret).unwrap_or_default())
        );

        let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
            .map_err(|e| TwitterError::Auth(e.to_string()))?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    fn header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<String, TwitterError> {
        let signature = self.signature(method, url, params)?;
        let mut pairs = self.oauth_pairs();
        pairs.push(("oauth_signature", signature));
        pairs.sort();

        let fields = pairs
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {}", fields))
    }
}

/// RFC 3986 percent encoding, leaves only unreserved characters
fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}
