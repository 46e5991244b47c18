//! Runs one extraction mode against the API and normalizes its records.

use futures::future;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use itertools::Itertools;
use twitter::{JoinedStream, JoinedTweet, JoinedUser, TwitterApi, TwitterError};

use crate::models::{TweetRecord, TweetSchema, UserRecord, UserSchema};
use crate::ExtractorError;

pub use self::mode::{Exclude, ExtractRequest, ExtractedDataType, Mode};

mod fields;
mod mode;

/// Most usernames accepted by one bulk lookup
const USERS_PER_LOOKUP: usize = 100;

pub type RecordStream<'a, T> = BoxStream<'a, Result<T, ExtractorError>>;

#[derive(Clone, Debug, Default)]
pub struct ExtractOptions {
    /// Maximum number of tweets yielded, counted after exclusions
    pub tweet_count: Option<usize>,
    pub excludes: Vec<Exclude>,
}

pub enum Records<'a> {
    User(UserRecord),
    Users(RecordStream<'a, UserRecord>),
    Tweets(RecordStream<'a, TweetRecord>),
}

/// Records of a run together with their kind.
pub struct Extraction<'a> {
    pub data_type: ExtractedDataType,
    pub records: Records<'a>,
}

pub async fn extract<'a, A>(
    api: &'a A,
    mode: &Mode,
    options: &ExtractOptions,
) -> Result<Extraction<'a>, ExtractorError>
where
    A: TwitterApi + ?Sized,
{
    let records = match mode {
        Mode::User(username) => Records::User(user(api, username).await?),
        Mode::Users(usernames) => Records::Users(users(api, usernames).await?),
        Mode::Friends(username) => {
            tracing::info!("Getting friends for username={}", username);
            let friends = twitter::friends(api, username, fields::users_page()).await?;
            Records::Users(normalize_users(friends))
        }
        Mode::Followers(username) => {
            tracing::info!("Getting followers for username={}", username);
            let followers = twitter::followers(api, username, fields::users_page()).await?;
            Records::Users(normalize_users(followers))
        }
        Mode::UserTweets(username) => {
            tracing::info!("Getting tweets for username={}", username);
            let tweets = twitter::user_tweets(api, username, fields::tweets_page(false)).await?;
            Records::Tweets(normalize_tweets(tweets, TweetSchema::Timeline, options))
        }
        Mode::Search(keyword) => {
            tracing::info!("Getting tweets for keyword={}", keyword);
            let tweets = twitter::search_tweets(api, keyword, fields::tweets_page(true));
            Records::Tweets(normalize_tweets(tweets, TweetSchema::Search, options))
        }
    };

    Ok(Extraction {
        data_type: mode.data_type(),
        records,
    })
}

async fn user<A>(api: &A, username: &str) -> Result<UserRecord, ExtractorError>
where
    A: TwitterApi + ?Sized,
{
    tracing::info!("Getting data for username={}", username);

    let response = api.user(username, &fields::user(UserSchema::Full)).await?;
    let joined = JoinedUser::single(response).ok_or_else(|| TwitterError::UserNotFound {
        username: username.to_string(),
    })?;

    let record = UserRecord::new(&joined, UserSchema::Full);
    tracing::debug!("User data: {}", record);
    Ok(record)
}

async fn users<'a, A>(
    api: &'a A,
    usernames: &[String],
) -> Result<RecordStream<'a, UserRecord>, ExtractorError>
where
    A: TwitterApi + ?Sized,
{
    tracing::info!("Getting data for usernames={}", usernames.iter().join(","));

    let fields = fields::user(UserSchema::Bulk);
    let mut found = vec![];
    for chunk in usernames.chunks(USERS_PER_LOOKUP) {
        let response = api.users(chunk, &fields).await?;
        found.extend(response.data.unwrap_or_default());
    }

    if let Some(missing) = usernames
        .iter()
        .find(|name| !found.iter().any(|u| u.username.eq_ignore_ascii_case(name)))
    {
        return Err(TwitterError::UserNotFound {
            username: missing.clone(),
        }
        .into());
    }

    let records: Vec<Result<UserRecord, ExtractorError>> = found
        .into_iter()
        .unique_by(|u| u.id.clone())
        .map(|user| {
            let record = UserRecord::new(&JoinedUser::bare(user), UserSchema::Bulk);
            tracing::debug!("User data: {}", record);
            Ok(record)
        })
        .collect();

    Ok(futures::stream::iter(records).boxed())
}

fn normalize_users(joined: JoinedStream<'_, JoinedUser>) -> RecordStream<'_, UserRecord> {
    joined
        .map(|joined| -> Result<UserRecord, ExtractorError> {
            let record = UserRecord::new(&joined?, UserSchema::Full);
            tracing::debug!("User data: {}", record);
            Ok(record)
        })
        .boxed()
}

/// Drop excluded tweets, normalize the rest and stop after the tweet count.
fn normalize_tweets<'a>(
    joined: JoinedStream<'a, JoinedTweet>,
    schema: TweetSchema,
    options: &ExtractOptions,
) -> RecordStream<'a, TweetRecord> {
    let excludes = options.excludes.clone();
    let records = joined
        .try_filter(move |joined| {
            let excluded = excludes.iter().any(|e| e.matches(&joined.tweet));
            future::ready(!excluded)
        })
        .map(move |joined| -> Result<TweetRecord, ExtractorError> {
            let record = TweetRecord::new(&joined?, schema);
            tracing::debug!("Tweet data: {}", record);
            Ok(record)
        });

    match options.tweet_count {
        Some(count) => records.take(count).boxed(),
        None => records.boxed(),
    }
}
