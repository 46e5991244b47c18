use std::fmt;

use serde::Serialize;
use twitter::model::{Media, Metrics, Place};
use twitter::JoinedTweet;

use super::{format_metrics, format_time, hashtag_items, mention_items, url_items};

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct MediaItem {
    pub media_key: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub duration_ms: Option<u64>,
    pub view_count: Option<u64>,
}

impl From<&Media> for MediaItem {
    fn from(media: &Media) -> Self {
        Self {
            media_key: media.media_key.clone(),
            media_type: media.media_type.clone(),
            url: media.url.clone().unwrap_or_default(),
            width: media.width,
            height: media.height,
            duration_ms: media.duration_ms,
            view_count: media
                .public_metrics
                .as_ref()
                .and_then(|m| m.get("view_count").copied()),
        }
    }
}

impl fmt::Display for MediaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Key: {}, Type: {}", self.media_key, self.media_type)?;
        writeln!(f, "URL: {}", self.url)?;
        write!(
            f,
            "Width: {}, Height: {}",
            self.width.unwrap_or_default(),
            self.height.unwrap_or_default()
        )?;
        if self.media_type == "video" {
            write!(
                f,
                "\nDuration: {}\nView count: {}",
                self.duration_ms.unwrap_or_default(),
                self.view_count.unwrap_or_default()
            )?;
        }
        Ok(())
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PlaceItem {
    pub id: String,
    pub full_name: String,
    pub country: String,
    pub country_code: String,
    pub place_type: String,
    pub bbox: Vec<f64>,
}

impl From<&Place> for PlaceItem {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id.clone(),
            full_name: place.full_name.clone(),
            country: place.country.clone().unwrap_or_default(),
            country_code: place.country_code.clone().unwrap_or_default(),
            place_type: place.place_type.clone().unwrap_or_default(),
            bbox: place.geo.clone().unwrap_or_default().bbox,
        }
    }
}

impl fmt::Display for PlaceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Full name: {}", self.full_name)?;
        writeln!(f, "Country: {} ({})", self.country, self.country_code)?;
        writeln!(f, "Type: {}", self.place_type)?;
        write!(f, "Coords: {:?}", self.bbox)
    }
}

/// Field set of a tweet record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweetSchema {
    /// Tweets of one account, the author is always that account
    Timeline,
    /// Search results carry the expanded author
    Search,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TweetRecord {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub source: String,
    pub language: String,
    pub public_metrics: Metrics,
    pub url_items: Vec<String>,
    pub hashtag_items: Vec<String>,
    pub mention_items: Vec<String>,
    pub media: Vec<MediaItem>,
    pub places: Vec<PlaceItem>,
    /// Username of the joined author, empty when not expanded. `None` for
    /// timelines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl TweetRecord {
    pub fn new(joined: &JoinedTweet, schema: TweetSchema) -> Self {
        let tweet = &joined.tweet;
        let entities = tweet.entities.clone().unwrap_or_default();

        let author = match schema {
            TweetSchema::Search => Some(
                joined
                    .author
                    .as_ref()
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
            ),
            TweetSchema::Timeline => None,
        };

        Self {
            id: tweet.id.clone(),
            text: tweet.text.clone(),
            created_at: format_time(tweet.created_at),
            source: tweet.source.clone().unwrap_or_default(),
            language: tweet.lang.clone().unwrap_or_default(),
            public_metrics: tweet.public_metrics.clone().unwrap_or_default(),
            url_items: url_items(&entities.urls),
            hashtag_items: hashtag_items(&entities.hashtags),
            mention_items: mention_items(&entities.mentions),
            media: joined.media.iter().map(MediaItem::from).collect(),
            places: joined.place.iter().map(PlaceItem::from).collect(),
            author,
        }
    }

    pub fn columns(schema: TweetSchema) -> Vec<&'static str> {
        let mut columns = vec![
            "ID",
            "Text",
            "Created At",
            "Source",
            "Language",
            "Public Metrics",
            "URLs",
            "Hashtags",
            "Mentions",
            "Media",
            "Place",
        ];
        if schema == TweetSchema::Search {
            columns.push("Author");
        }
        columns
    }

    pub fn schema(&self) -> TweetSchema {
        match self.author {
            Some(_) => TweetSchema::Search,
            None => TweetSchema::Timeline,
        }
    }

    /// Cell values in the order of [`TweetRecord::columns`]
    pub fn row(&self) -> Vec<String> {
        let mut row = vec![
            self.id.clone(),
            self.text.clone(),
            self.created_at.clone(),
            self.source.clone(),
            self.language.clone(),
            format_metrics(&self.public_metrics),
            self.url_items.join(" "),
            self.hashtag_items.join(" "),
            self.mention_items.join(" "),
            join_blocks(&self.media),
            join_blocks(&self.places),
        ];
        if let Some(author) = &self.author {
            row.push(author.clone());
        }
        row
    }
}

fn join_blocks<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("\n-------\n")
}

impl fmt::Display for TweetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "\tTweet: {}", self.text)?;
        writeln!(f, "\tCreated at: {}", self.created_at)?;
        writeln!(f, "\tSource: {}", self.source)?;
        writeln!(f, "\tLanguage: {}", self.language)?;
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            writeln!(f, "\tAuthor: {}", author)?;
        }
        writeln!(f, "\tPublic Metrics")?;
        for (metric, value) in &self.public_metrics {
            writeln!(f, "\t\t{}: {}", metric, value)?;
        }
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
        for media in &self.media {
            writeln!(f, "\tMedia\n\t\t{}", media.to_string().replace('\n', "\n\t\t"))?;
        }
        for place in &self.places {
            writeln!(f, "\tPlace\n\t\t{}", place.to_string().replace('\n', "\n\t\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use twitter::model::Tweet;

    use super::*;

    fn joined(tweet: serde_json::Value, media: Option<serde_json::Value>) -> JoinedTweet {
        JoinedTweet {
            tweet: serde_json::from_value::<Tweet>(tweet).unwrap(),
            media: media.map(|m| serde_json::from_value(m).unwrap()),
            place: None,
            author: None,
        }
    }

    #[test]
    fn flattens_tweet() {
        let joined = joined(
            json!({
                "id": "1460323737035677698",
                "text": "Introducing a new era for the Twitter Developer Platform! #TwitterAPI @TwitterDev https://t.co/abc",
                "created_at": "2021-11-15T19:08:05.000Z",
                "source": "Twitter Web App",
                "lang": "en",
                "public_metrics": { "retweet_count": 10, "reply_count": 2, "like_count": 50, "quote_count": 1 },
                "entities": {
                    "urls": [{ "start": 83, "end": 106, "url": "https://t.co/abc" }],
                    "hashtags": [{ "start": 58, "end": 69, "tag": "TwitterAPI" }],
                    "mentions": [{ "start": 70, "end": 81, "username": "TwitterDev", "id": "2244994945" }]
                },
                "attachments": { "media_keys": ["7_1"] }
            }),
            Some(json!({
                "media_key": "7_1",
                "type": "video",
                "duration_ms": 46947,
                "width": 1920,
                "height": 1080,
                "public_metrics": { "view_count": 1234 }
            })),
        );

        let record = TweetRecord::new(&joined, TweetSchema::Search);
        assert_eq!("2021-11-15T19:08:05Z", record.created_at);
        assert_eq!("en", record.language);
        assert_eq!(vec!["https://t.co/abc"], record.url_items);
        assert_eq!(vec!["TwitterAPI"], record.hashtag_items);
        assert_eq!(vec!["TwitterDev"], record.mention_items);
        assert_eq!(1, record.media.len());
        assert_eq!(Some(1234), record.media[0].view_count);
        assert!(record.places.is_empty());

        let row = record.row();
        assert_eq!(TweetRecord::columns(TweetSchema::Search).len(), row.len());
        assert_eq!(
            "retweet_count: 10 | reply_count: 2 | like_count: 50 | quote_count: 1",
            row[5]
        );
        assert!(row[9].contains("Duration: 46947"));
        assert!(row[9].contains("View count: 1234"));
        assert_eq!("", row[11]);
    }

    #[test]
    fn no_annotations_give_empty_lists() {
        let record = TweetRecord::new(
            &joined(json!({ "id": "1", "text": "plain" }), None),
            TweetSchema::Search,
        );
        assert!(record.url_items.is_empty());
        assert!(record.hashtag_items.is_empty());
        assert!(record.mention_items.is_empty());
        assert!(record.media.is_empty());
        assert_eq!("", record.row()[9]);
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let joined = joined(json!({ "id": "1", "text": "same" }), None);
        assert_eq!(
            TweetRecord::new(&joined, TweetSchema::Search),
            TweetRecord::new(&joined, TweetSchema::Search)
        );
    }

    #[test]
    fn timeline_schema_omits_author() {
        let record = TweetRecord::new(
            &joined(json!({ "id": "1", "text": "mine" }), None),
            TweetSchema::Timeline,
        );

        assert!(record.author.is_none());
        assert_eq!(TweetSchema::Timeline, record.schema());
        assert!(!TweetRecord::columns(TweetSchema::Timeline).contains(&"Author"));
        assert_eq!(TweetRecord::columns(TweetSchema::Timeline).len(), record.row().len());

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("author").is_none());
    }
}
