use std::collections::VecDeque;
use std::future::Future;

use futures::stream::{BoxStream, StreamExt};

use crate::api::{TweetsEndpoint, TwitterApi, UsersEndpoint};
use crate::join::{join_attachments, join_pinned, JoinedTweet, JoinedUser};
use crate::{Fields, TwitterError};

/// Lazily fetched sequence of joined records.
///
/// The next page is only requested once every record of the previous page
/// has been consumed, dropping the stream stops all fetching.
pub type JoinedStream<'a, T> = BoxStream<'a, Result<T, TwitterError>>;

enum Cursor {
    Start,
    Next(String),
    Done,
}

struct FetchState<T, F> {
    fetch: F,
    records: VecDeque<T>,
    cursor: Cursor,
}

fn paginate<'a, T, F, Fut>(fetch: F) -> JoinedStream<'a, T>
where
    T: Send + 'a,
    F: FnMut(Option<String>) -> Fut + Send + 'a,
    Fut: Future<Output = Result<(Vec<T>, Option<String>), TwitterError>> + Send + 'a,
{
    let state = FetchState {
        fetch,
        records: VecDeque::new(),
        cursor: Cursor::Start,
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            // Return next record if it exists
            if let Some(record) = state.records.pop_front() {
                return Some((Ok(record), state));
            }

            let cursor = match std::mem::replace(&mut state.cursor, Cursor::Done) {
                Cursor::Done => return None,
                Cursor::Start => None,
                Cursor::Next(token) => Some(token),
            };

            match (state.fetch)(cursor).await {
                Ok((records, next)) => {
                    state.records.extend(records);
                    if let Some(token) = next {
                        state.cursor = Cursor::Next(token);
                    }
                }
                // Cursor stays done, the stream ends after the error
                Err(e) => return Some((Err(e), state)),
            }
        }
    })
    .boxed()
}

/// Resolve a username to its id, failing if the account is protected.
pub async fn ensure_public<A>(api: &A, username: &str) -> Result<String, TwitterError>
where
    A: TwitterApi + ?Sized,
{
    let fields = Fields {
        user: vec!["protected"],
        ..Default::default()
    };

    let user = api
        .user(username, &fields)
        .await?
        .data
        .ok_or_else(|| TwitterError::UserNotFound {
            username: username.to_string(),
        })?;

    if user.protected.unwrap_or(false) {
        return Err(TwitterError::PrivateAccount {
            username: username.to_string(),
        });
    }

    Ok(user.id)
}

fn users<'a, A>(api: &'a A, endpoint: UsersEndpoint, fields: Fields) -> JoinedStream<'a, JoinedUser>
where
    A: TwitterApi + ?Sized,
{
    paginate(move |cursor: Option<String>| {
        let endpoint = endpoint.clone();
        let fields = fields.clone();
        async move {
            let page = api
                .users_page(&endpoint, &fields, cursor.as_deref())
                .await?;
            Ok::<_, TwitterError>(join_pinned(page))
        }
    })
}

fn tweets<'a, A>(
    api: &'a A,
    endpoint: TweetsEndpoint,
    fields: Fields,
) -> JoinedStream<'a, JoinedTweet>
where
    A: TwitterApi + ?Sized,
{
    paginate(move |cursor: Option<String>| {
        let endpoint = endpoint.clone();
        let fields = fields.clone();
        async move {
            let page = api
                .tweets_page(&endpoint, &fields, cursor.as_deref())
                .await?;
            Ok::<_, TwitterError>(join_attachments(page))
        }
    })
}

/// Accounts followed by `username`, each joined to its pinned tweet.
pub async fn friends<'a, A>(
    api: &'a A,
    username: &str,
    fields: Fields,
) -> Result<JoinedStream<'a, JoinedUser>, TwitterError>
where
    A: TwitterApi + ?Sized,
{
    let id = ensure_public(api, username).await?;
    Ok(users(api, UsersEndpoint::Following(id), fields))
}

/// Followers of `username`, each joined to its pinned tweet.
pub async fn followers<'a, A>(
    api: &'a A,
    username: &str,
    fields: Fields,
) -> Result<JoinedStream<'a, JoinedUser>, TwitterError>
where
    A: TwitterApi + ?Sized,
{
    let id = ensure_public(api, username).await?;
    Ok(users(api, UsersEndpoint::Followers(id), fields))
}

/// Timeline of `username`, each tweet joined to its media, place and author.
pub async fn user_tweets<'a, A>(
    api: &'a A,
    username: &str,
    fields: Fields,
) -> Result<JoinedStream<'a, JoinedTweet>, TwitterError>
where
    A: TwitterApi + ?Sized,
{
    let id = ensure_public(api, username).await?;
    Ok(tweets(api, TweetsEndpoint::UserTweets(id), fields))
}

/// Recent tweets matching `keyword`.
pub fn search_tweets<'a, A>(
    api: &'a A,
    keyword: &str,
    fields: Fields,
) -> JoinedStream<'a, JoinedTweet>
where
    A: TwitterApi + ?Sized,
{
    tweets(api, TweetsEndpoint::SearchRecent(keyword.to_string()), fields)
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use futures::TryStreamExt;
    use serde_json::json;

    use super::*;
    use crate::model::{ApiResponse, Tweet, User};

    /// Serves a fixed list of pages, page `n` links to page `n + 1`.
    struct PagedApi {
        protected: bool,
        pages: usize,
        per_page: usize,
        page_calls: AtomicUsize,
    }

    impl PagedApi {
        fn new(pages: usize, per_page: usize) -> Self {
            Self {
                protected: false,
                pages,
                per_page,
                page_calls: AtomicUsize::new(0),
            }
        }

        fn page_index(&self, cursor: Option<&str>) -> usize {
            self.page_calls.fetch_add(1, Ordering::SeqCst);
            cursor.map_or(0, |c| c.parse().unwrap())
        }

        fn next_token(&self, index: usize) -> serde_json::Value {
            if index + 1 < self.pages {
                json!((index + 1).to_string())
            } else {
                serde_json::Value::Null
            }
        }
    }

    #[async_trait]
    impl TwitterApi for PagedApi {
        async fn user(
            &self,
            username: &str,
            _fields: &Fields,
        ) -> Result<ApiResponse<User>, TwitterError> {
            if username == "nobody" {
                return Ok(serde_json::from_value(json!({ "errors": [{ "value": "nobody" }] })).unwrap());
            }
            Ok(serde_json::from_value(json!({
                "data": { "id": "42", "name": username, "username": username, "protected": self.protected }
            }))
            .unwrap())
        }

        async fn users(
            &self,
            _usernames: &[String],
            _fields: &Fields,
        ) -> Result<ApiResponse<Vec<User>>, TwitterError> {
            unimplemented!()
        }

        async fn users_page(
            &self,
            endpoint: &UsersEndpoint,
            _fields: &Fields,
            cursor: Option<&str>,
        ) -> Result<ApiResponse<Vec<User>>, TwitterError> {
            assert_eq!(&UsersEndpoint::Following("42".to_string()), endpoint);
            let index = self.page_index(cursor);
            let data: Vec<_> = (0..self.per_page)
                .map(|i| {
                    let id = format!("{}-{}", index, i);
                    json!({ "id": id, "name": id, "username": id, "pinned_tweet_id": format!("t{}", id) })
                })
                .collect();
            Ok(serde_json::from_value(json!({
                "data": data,
                "includes": { "tweets": [{ "id": format!("t{}-0", index), "text": "pinned" }] },
                "meta": { "next_token": self.next_token(index) }
            }))
            .unwrap())
        }

        async fn tweets_page(
            &self,
            _endpoint: &TweetsEndpoint,
            _fields: &Fields,
            cursor: Option<&str>,
        ) -> Result<ApiResponse<Vec<Tweet>>, TwitterError> {
            let index = self.page_index(cursor);
            let data: Vec<_> = (0..self.per_page)
                .map(|i| json!({ "id": format!("{}-{}", index, i), "text": "hi" }))
                .collect();
            Ok(serde_json::from_value(json!({
                "data": data,
                "meta": { "next_token": self.next_token(index) }
            }))
            .unwrap())
        }
    }

    #[tokio::test]
    async fn walks_every_page() {
        let api = PagedApi::new(3, 4);
        let users: Vec<_> = friends(&api, "alice", Fields::default())
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(12, users.len());
        assert_eq!(3, api.page_calls.load(Ordering::SeqCst));
        let pinned = users.iter().filter(|u| u.pinned.is_some()).count();
        assert_eq!(3, pinned);
    }

    #[tokio::test]
    async fn fetches_on_demand() {
        let api = PagedApi::new(5, 3);
        let stream = search_tweets(&api, "rust", Fields::default());
        assert_eq!(0, api.page_calls.load(Ordering::SeqCst));

        let tweets: Vec<_> = stream.take(4).try_collect().await.unwrap();
        assert_eq!(4, tweets.len());
        assert_eq!(2, api.page_calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn protected_account() {
        let api = PagedApi {
            protected: true,
            ..PagedApi::new(2, 2)
        };
        let err = user_tweets(&api, "bob", Fields::default()).await.err().unwrap();
        assert!(matches!(err, TwitterError::PrivateAccount { username } if username == "bob"));
        assert_eq!(0, api.page_calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unknown_account() {
        let api = PagedApi::new(2, 2);
        let err = followers(&api, "nobody", Fields::default()).await.err().unwrap();
        assert!(matches!(err, TwitterError::UserNotFound { username } if username == "nobody"));
        assert_eq!(0, api.page_calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn skips_empty_pages() {
        let fetches = AtomicUsize::new(0);
        let stream = paginate(|cursor: Option<String>| {
            let call = fetches.fetch_add(1, Ordering::SeqCst);
            async move {
                Ok::<_, TwitterError>(match cursor.as_deref() {
                    None => (vec![], Some("1".to_string())),
                    Some(_) => (vec![call], None),
                })
            }
        });

        let records: Vec<usize> = stream.try_collect().await.unwrap();
        assert_eq!(vec![1], records);
    }

    #[tokio::test]
    async fn stops_after_error() {
        let stream = paginate(|cursor: Option<String>| async move {
            match cursor {
                None => Ok((vec![1, 2], Some("1".to_string()))),
                Some(_) => Err(TwitterError::Auth("expired".to_string())),
            }
        });

        let results: Vec<_> = stream.collect().await;
        assert_eq!(3, results.len());
        assert!(results[2].is_err());
    }
}
