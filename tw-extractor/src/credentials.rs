//! Access tokens of the delegated account.

use std::path::Path;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use twitter::auth::{access_token, request_token};
use twitter::{AccessToken, ConsumerKey};

#[derive(Serialize, Deserialize, Debug)]
struct StoredCredentials {
    access_token: String,
    access_token_secret: String,
}

/// Load previously saved credentials, `None` if the file does not exist
pub fn load(path: impl AsRef<Path>) -> Result<Option<AccessToken>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    tracing::debug!(path = %path.display(), "reading credentials from file");
    let contents = std::fs::read_to_string(path)?;
    let stored: StoredCredentials = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid credentials file {}", path.display()))?;

    Ok(Some(AccessToken {
        token: stored.access_token,
        secret: stored.access_token_secret,
    }))
}

pub fn save(path: impl AsRef<Path>, token: &AccessToken) -> Result<()> {
    let stored = StoredCredentials {
        access_token: token.token.clone(),
        access_token_secret: token.secret.clone(),
    };
    std::fs::write(path.as_ref(), serde_json::to_string(&stored)?)
        .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
    Ok(())
}

/// Saved credentials if present, otherwise run the PIN flow on the terminal
/// and save its result.
pub async fn load_or_authorize(
    client: &Client,
    consumer: &ConsumerKey,
    path: impl AsRef<Path>,
) -> Result<AccessToken> {
    if let Some(token) = load(path.as_ref())? {
        return Ok(token);
    }

    let request = request_token(client, consumer).await?;

    let mut stdout = tokio::io::stdout();
    let prompt = format!(
        "\nPlease get the PIN from the following URL\n\n{}\n\nEnter PIN: ",
        request.authorize_url()
    );
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;

    let mut pin = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut pin)
        .await?;

    let token = access_token(client, consumer, &request, &pin).await?;
    save(path, &token)?;

    Ok(token)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path().join("creds.json")).unwrap().is_none());
    }

    #[test]
    fn reads_saved_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(
            &path,
            r#"{"access_token": "123-abc", "access_token_secret": "s3cret"}"#,
        )
        .unwrap();

        let token = load(&path).unwrap().unwrap();
        assert_eq!("123-abc", token.token);
        assert_eq!("s3cret", token.secret);

        save(&path, &AccessToken { token: "456-def".to_string(), secret: "x".to_string() }).unwrap();
        assert_eq!("456-def", load(&path).unwrap().unwrap().token);
    }

    #[test]
    fn invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(load(&path).is_err());
    }
}
