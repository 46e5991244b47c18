use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TwitterError {
    #[error("user with username={username} could not be found")]
    UserNotFound { username: String },

    #[error("account of username={username} is protected")]
    PrivateAccount { username: String },

    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    #[error("unable to parse response of {endpoint}: {msg}")]
    Parse { endpoint: String, msg: String },

    #[error("failed to authorize: {0}")]
    Auth(String),
}
