//! Binding of page entities to the side objects returned with the page.
//!
//! Every entity of a page produces exactly one joined record. For each kind
//! of side object the first item, in API order, whose key equals the
//! entity's reference field is bound; later duplicates are ignored.

use crate::model::{ApiResponse, Includes, Media, Place, Tweet, User};

/// Where the text of a user's pinned tweet comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Pinned {
    /// Single user lookup with expansions, the pinned tweet is
    /// `includes.tweets[0]`
    Includes(Includes),
    /// Paged listings, the pinned tweet matched for this user
    Tweet(Tweet),
}

impl Pinned {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Includes(includes) => includes.tweets.first().map(|t| t.text.as_str()),
            Self::Tweet(tweet) => Some(tweet.text.as_str()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct JoinedUser {
    pub user: User,
    pub pinned: Option<Pinned>,
}

impl JoinedUser {
    /// Join the result of a single user lookup, `None` if the user does not
    /// exist.
    pub fn single(response: ApiResponse<User>) -> Option<Self> {
        let user = response.data?;
        let pinned = if response.includes.is_empty() {
            None
        } else {
            Some(Pinned::Includes(response.includes))
        };
        Some(Self { user, pinned })
    }

    /// A user without any side data, as returned by bulk lookups
    pub fn bare(user: User) -> Self {
        Self { user, pinned: None }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct JoinedTweet {
    pub tweet: Tweet,
    pub media: Option<Media>,
    pub place: Option<Place>,
    pub author: Option<User>,
}

fn first_match<T: Clone>(items: &[T], is_match: impl Fn(&T) -> bool) -> Option<T> {
    items.iter().find(|item| is_match(item)).cloned()
}

/// Join a page of users to their pinned tweets.
pub(crate) fn join_pinned(page: ApiResponse<Vec<User>>) -> (Vec<JoinedUser>, Option<String>) {
    let includes = page.includes;
    let users = page
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|user| {
            let pinned = user.pinned_tweet_id.as_deref().and_then(|id| {
                first_match(&includes.tweets, |t| t.id == id).map(Pinned::Tweet)
            });
            JoinedUser { user, pinned }
        })
        .collect();

    (users, page.meta.next_token)
}

/// Join a page of tweets to their media, place and author.
pub(crate) fn join_attachments(
    page: ApiResponse<Vec<Tweet>>,
) -> (Vec<JoinedTweet>, Option<String>) {
    let includes = page.includes;
    let tweets = page
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|tweet| {
            let media = tweet.attachments.as_ref().and_then(|a| {
                first_match(&includes.media, |m| a.media_keys.contains(&m.media_key))
            });
            let place = tweet
                .geo
                .as_ref()
                .and_then(|g| g.place_id.as_deref())
                .and_then(|id| first_match(&includes.places, |p| p.id == id));
            let author = tweet
                .author_id
                .as_deref()
                .and_then(|id| first_match(&includes.users, |u| u.id == id));
            JoinedTweet {
                tweet,
                media,
                place,
                author,
            }
        })
        .collect();

    (tweets, page.meta.next_token)
}
