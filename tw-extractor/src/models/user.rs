use std::fmt;

use serde::Serialize;
use twitter::model::Metrics;
use twitter::JoinedUser;

use super::{format_metrics, format_time, hashtag_items, mention_items, url_items};

/// Field set of a user record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserSchema {
    Full,
    /// Bulk lookups do not request the pinned tweet, protected accounts
    /// reject it, so the pinned tweet id is left out entirely
    Bulk,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub name: String,
    pub created_at: String,
    pub description: String,
    pub url_items: Vec<String>,
    pub hashtag_items: Vec<String>,
    pub mention_items: Vec<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_tweet_id: Option<String>,
    pub pinned_tweet_text: String,
    pub profile_image_url: String,
    pub protected: bool,
    pub public_metrics: Metrics,
    pub url: String,
    pub verified: bool,
}

impl UserRecord {
    pub fn new(joined: &JoinedUser, schema: UserSchema) -> Self {
        let user = &joined.user;
        let entities = user.entities.clone().unwrap_or_default();
        let description = entities.description.unwrap_or_default();

        let pinned_tweet_id = match schema {
            UserSchema::Full => Some(user.pinned_tweet_id.clone().unwrap_or_default()),
            UserSchema::Bulk => None,
        };
        let pinned_tweet_text = joined
            .pinned
            .as_ref()
            .and_then(|p| p.text())
            .unwrap_or_default()
            .to_string();

        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            created_at: format_time(user.created_at),
            description: user.description.clone().unwrap_or_default(),
            url_items: entities.url.map(|u| url_items(&u.urls)).unwrap_or_default(),
            hashtag_items: hashtag_items(&description.hashtags),
            mention_items: mention_items(&description.mentions),
            location: user.location.clone().unwrap_or_default(),
            pinned_tweet_id,
            pinned_tweet_text,
            profile_image_url: user.profile_image_url.clone().unwrap_or_default(),
            protected: user.protected.unwrap_or(false),
            public_metrics: user.public_metrics.clone().unwrap_or_default(),
            url: user.url.clone().unwrap_or_default(),
            verified: user.verified.unwrap_or(false),
        }
    }

    pub fn columns(schema: UserSchema) -> Vec<&'static str> {
        let mut columns = vec![
            "ID",
            "Username",
            "Name",
            "Created At",
            "Bio",
            "URLs",
            "Hashtags",
            "Mentions",
            "Location",
            "Pinned Tweet ID",
            "Pinned Tweet",
            "Profile Image URL",
            "Account Protected",
            "Public Metrics",
            "Url",
            "Verified",
        ];
        if schema == UserSchema::Bulk {
            columns.retain(|c| *c != "Pinned Tweet ID");
        }
        columns
    }

    pub fn schema(&self) -> UserSchema {
        match self.pinned_tweet_id {
            Some(_) => UserSchema::Full,
            None => UserSchema::Bulk,
        }
    }

    /// Cell values in the order of [`UserRecord::columns`]
    pub fn row(&self) -> Vec<String> {
        let mut row = vec![
            self.id.clone(),
            self.username.clone(),
            self.name.clone(),
            self.created_at.clone(),
            self.description.clone(),
            self.url_items.join(" "),
            self.hashtag_items.join(" "),
            self.mention_items.join(" "),
            self.location.clone(),
        ];
        if let Some(id) = &self.pinned_tweet_id {
            row.push(id.clone());
        }
        row.extend([
            self.pinned_tweet_text.clone(),
            self.profile_image_url.clone(),
            self.protected.to_string(),
            format_metrics(&self.public_metrics),
            self.url.clone(),
            self.verified.to_string(),
        ]);
        row
    }
}

impl fmt::Display for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:{}:{}", self.id, self.username, self.name)?;
        writeln!(f, "\tCreated at: {}", self.created_at)?;
        writeln!(f, "\tBio: {}", self.description)?;
        for (title, items) in [
            ("URLs", &self.url_items),
            ("Hashtags", &self.hashtag_items),
            ("Mentions", &self.mention_items),
        ] {
            if !items.is_empty() {
                writeln!(f, "\t{}", title)?;
            }
            for item in items {
                writeln!(f, "\t\t{}", item)?;
            }
        }
        writeln!(f, "\tLocation: {}", self.location)?;
        if let Some(id) = &self.pinned_tweet_id {
            writeln!(f, "\tPinned tweet id: {}", id)?;
        }
        if !self.pinned_tweet_text.is_empty() {
            writeln!(f, "\tPinned tweet: {}", self.pinned_tweet_text)?;
        }
        writeln!(f, "\tProfile image url: {}", self.profile_image_url)?;
        writeln!(
            f,
            "\tIs account private: {}",
            if self.protected { "YES" } else { "NO" }
        )?;
        writeln!(f, "\tPublic metrics")?;
        for (metric, value) in &self.public_metrics {
            writeln!(f, "\t\t{}: {}", metric, value)?;
        }
        writeln!(f, "\tUrl: {}", self.url)?;
        write!(f, "\tVerified: {}", self.verified)
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use twitter::model::{Includes, Tweet, User};
    use twitter::Pinned;

    use super::*;

    fn user(value: serde_json::Value) -> User {
        serde_json::from_value(value).unwrap()
    }

    fn tweet(id: &str, text: &str) -> Tweet {
        serde_json::from_value(json!({ "id": id, "text": text })).unwrap()
    }

    fn annotated_user() -> User {
        user(json!({
            "id": "2244994945",
            "name": "Twitter Dev",
            "username": "TwitterDev",
            "created_at": "2013-12-14T04:35:55.000Z",
            "description": "The voice of the #TwitterDev team, ask @TwitterSupport",
            "entities": {
                "url": { "urls": [{ "url": "https://t.co/3ZX3TNiZCY", "expanded_url": "https://developer.twitter.com/en/community" }] },
                "description": {
                    "hashtags": [{ "start": 17, "end": 28, "tag": "TwitterDev" }],
                    "mentions": [{ "start": 39, "end": 54, "username": "TwitterSupport" }]
                }
            },
            "location": "127.0.0.1",
            "pinned_tweet_id": "1255542774432063488",
            "profile_image_url": "https://pbs.twimg.com/profile_images/1/dev.png",
            "protected": false,
            "public_metrics": { "followers_count": 513962, "following_count": 2039 },
            "url": "https://t.co/3ZX3TNiZCY",
            "verified": true
        }))
    }

    #[test]
    fn flattens_user() {
        let joined = JoinedUser {
            user: annotated_user(),
            pinned: Some(Pinned::Tweet(tweet("1255542774432063488", "pinned text"))),
        };
        let record = UserRecord::new(&joined, UserSchema::Full);

        assert_eq!("TwitterDev", record.username);
        assert_eq!("2013-12-14T04:35:55Z", record.created_at);
        assert_eq!(vec!["https://t.co/3ZX3TNiZCY"], record.url_items);
        assert_eq!(vec!["TwitterDev"], record.hashtag_items);
        assert_eq!(vec!["TwitterSupport"], record.mention_items);
        assert_eq!(Some("1255542774432063488"), record.pinned_tweet_id.as_deref());
        assert_eq!("pinned text", record.pinned_tweet_text);
        assert!(record.verified);

        let row = record.row();
        assert_eq!(UserRecord::columns(UserSchema::Full).len(), row.len());
        assert_eq!("followers_count: 513962 | following_count: 2039", row[13]);
    }

    #[test]
    fn pinned_text_from_both_shapes() {
        let nested = JoinedUser {
            user: annotated_user(),
            pinned: Some(Pinned::Includes(Includes {
                tweets: vec![tweet("1255542774432063488", "from includes")],
                ..Default::default()
            })),
        };
        assert_eq!(
            "from includes",
            UserRecord::new(&nested, UserSchema::Full).pinned_tweet_text
        );

        let flat = JoinedUser {
            user: annotated_user(),
            pinned: Some(Pinned::Tweet(tweet("1255542774432063488", "from page"))),
        };
        assert_eq!(
            "from page",
            UserRecord::new(&flat, UserSchema::Full).pinned_tweet_text
        );

        let none = JoinedUser::bare(annotated_user());
        assert_eq!("", UserRecord::new(&none, UserSchema::Full).pinned_tweet_text);
    }

    #[test]
    fn no_annotations_give_empty_lists() {
        let joined = JoinedUser::bare(user(json!({ "id": "1", "name": "A", "username": "a" })));
        let record = UserRecord::new(&joined, UserSchema::Full);

        assert!(record.url_items.is_empty());
        assert!(record.hashtag_items.is_empty());
        assert!(record.mention_items.is_empty());
        assert_eq!(Some(""), record.pinned_tweet_id.as_deref());
        assert_eq!("", record.created_at);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(json!([]), value["url_items"]);
        assert_eq!(json!([]), value["hashtag_items"]);
        assert_eq!(json!([]), value["mention_items"]);
    }

    #[test]
    fn bulk_schema_omits_pinned_id() {
        let joined = JoinedUser::bare(annotated_user());
        let record = UserRecord::new(&joined, UserSchema::Bulk);

        assert!(record.pinned_tweet_id.is_none());
        assert_eq!("", record.pinned_tweet_text);
        assert_eq!(UserSchema::Bulk, record.schema());
        assert_eq!(UserRecord::columns(UserSchema::Bulk).len(), record.row().len());
        assert!(!UserRecord::columns(UserSchema::Bulk).contains(&"Pinned Tweet ID"));

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("pinned_tweet_id").is_none());
        assert_eq!(json!(""), value["pinned_tweet_text"]);
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let joined = JoinedUser {
            user: annotated_user(),
            pinned: Some(Pinned::Tweet(tweet("1255542774432063488", "pinned"))),
        };
        assert_eq!(
            UserRecord::new(&joined, UserSchema::Full),
            UserRecord::new(&joined, UserSchema::Full)
        );
    }
}
