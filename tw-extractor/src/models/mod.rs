//! Flat records handed to the reporters.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use twitter::model::{HashtagEntity, MentionEntity, Metrics, UrlEntity};

pub use self::tweet::{MediaItem, PlaceItem, TweetRecord, TweetSchema};
pub use self::user::{UserRecord, UserSchema};

mod tweet;
mod user;

fn format_time(time: Option<OffsetDateTime>) -> String {
    time.and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_default()
}

/// `key: value | key: value`, in API order
pub(crate) fn format_metrics(metrics: &Metrics) -> String {
    metrics
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn url_items(urls: &[UrlEntity]) -> Vec<String> {
    urls.iter().map(|u| u.url.clone()).collect()
}

fn hashtag_items(hashtags: &[HashtagEntity]) -> Vec<String> {
    hashtags.iter().map(|h| h.tag.clone()).collect()
}

fn mention_items(mentions: &[MentionEntity]) -> Vec<String> {
    mentions.iter().map(|m| m.username.clone()).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn metrics_keep_order() {
        let mut metrics = Metrics::new();
        metrics.insert("retweet_count".to_string(), 3);
        metrics.insert("like_count".to_string(), 10);
        assert_eq!("retweet_count: 3 | like_count: 10", format_metrics(&metrics));
        assert_eq!("", format_metrics(&Metrics::new()));
    }

    #[test]
    fn missing_time() {
        assert_eq!("", format_time(None));
        assert_eq!(
            "1970-01-01T00:00:00Z",
            format_time(Some(OffsetDateTime::UNIX_EPOCH))
        );
    }
}
