use std::str::FromStr;

use twitter::model::Tweet;

use crate::ExtractorError;

/// Extraction targets as given on the command line.
#[derive(Clone, Debug, Default)]
pub struct ExtractRequest {
    pub user: Option<String>,
    pub users: Option<Vec<String>>,
    pub friends: bool,
    pub followers: bool,
    pub user_tweets: bool,
    pub search: Option<String>,
}

/// What a single run extracts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    User(String),
    Users(Vec<String>),
    Friends(String),
    Followers(String),
    UserTweets(String),
    Search(String),
}

/// Kind of records produced by a run, tells the reporter which schema and
/// table to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractedDataType {
    User,
    Users,
    Friends,
    Followers,
    UserTweets,
    SearchTweets,
}

impl ExtractedDataType {
    pub fn is_tweets(self) -> bool {
        matches!(self, Self::UserTweets | Self::SearchTweets)
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Mode {
    pub fn select(request: &ExtractRequest) -> Result<Self, ExtractorError> {
        let selected = [
            request.friends,
            request.followers,
            request.user_tweets,
            request.search.is_some(),
        ]
        .into_iter()
        .filter(|s| *s)
        .count();
        if selected > 1 {
            return Err(ExtractorError::UnsupportedMode);
        }

        // Search takes no account, paged listings take exactly one
        let targets_accounts = request.user.is_some() || request.users.is_some();
        if (request.search.is_some() && targets_accounts)
            || (selected == 1 && request.users.is_some())
        {
            return Err(ExtractorError::UnsupportedMode);
        }

        if request.search.is_some() {
            let keyword =
                non_empty(&request.search).ok_or(ExtractorError::MissingParameter("search keyword"))?;
            return Ok(Self::Search(keyword.to_string()));
        }

        let user = non_empty(&request.user).map(str::to_string);
        if request.friends || request.followers || request.user_tweets {
            let user = user.ok_or(ExtractorError::MissingParameter("username"))?;
            return Ok(if request.friends {
                Self::Friends(user)
            } else if request.followers {
                Self::Followers(user)
            } else {
                Self::UserTweets(user)
            });
        }

        match (user, &request.users) {
            (Some(_), Some(_)) => Err(ExtractorError::UnsupportedMode),
            (Some(user), None) => Ok(Self::User(user)),
            (None, Some(users)) => {
                let users: Vec<String> = users
                    .iter()
                    .map(|u| u.trim())
                    .filter(|u| !u.is_empty())
                    .map(str::to_string)
                    .collect();
                if users.is_empty() {
                    Err(ExtractorError::MissingParameter("usernames"))
                } else {
                    Ok(Self::Users(users))
                }
            }
            (None, None) => {
                if request.user.is_some() {
                    Err(ExtractorError::MissingParameter("username"))
                } else {
                    Err(ExtractorError::UnsupportedMode)
                }
            }
        }
    }

    pub fn data_type(&self) -> ExtractedDataType {
        match self {
            Self::User(_) => ExtractedDataType::User,
            Self::Users(_) => ExtractedDataType::Users,
            Self::Friends(_) => ExtractedDataType::Friends,
            Self::Followers(_) => ExtractedDataType::Followers,
            Self::UserTweets(_) => ExtractedDataType::UserTweets,
            Self::Search(_) => ExtractedDataType::SearchTweets,
        }
    }
}

/// Tweets left out of tweet extractions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exclude {
    Retweets,
    Replies,
}

impl Exclude {
    /// Parse a comma separated list such as `retweets,replies`
    pub fn parse_list(s: &str) -> Result<Vec<Self>, ExtractorError> {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::from_str)
            .collect()
    }

    pub fn matches(self, tweet: &Tweet) -> bool {
        match self {
            Self::Retweets => tweet.references("retweeted"),
            Self::Replies => tweet.references("replied_to"),
        }
    }
}

impl FromStr for Exclude {
    type Err = ExtractorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "retweets" => Ok(Self::Retweets),
            "replies" => Ok(Self::Replies),
            _ => Err(ExtractorError::InvalidExclude(s.to_string())),
        }
    }
}
