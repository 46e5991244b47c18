use twitter::Fields;

use crate::models::UserSchema;

const USER_FIELDS: [&str; 10] = [
    "created_at",
    "description",
    "entities",
    "location",
    "pinned_tweet_id",
    "profile_image_url",
    "protected",
    "public_metrics",
    "url",
    "verified",
];

const TWEET_FIELDS: [&str; 9] = [
    "attachments",
    "author_id",
    "created_at",
    "entities",
    "geo",
    "lang",
    "public_metrics",
    "referenced_tweets",
    "source",
];

const PLACE_FIELDS: [&str; 5] = ["country", "country_code", "full_name", "geo", "place_type"];

const MEDIA_FIELDS: [&str; 6] = ["url", "duration_ms", "width", "height", "public_metrics", "type"];

/// Fields of a user lookup
pub(crate) fn user(schema: UserSchema) -> Fields {
    match schema {
        UserSchema::Full => Fields {
            user: USER_FIELDS.to_vec(),
            tweet: vec!["text"],
            expansions: vec!["pinned_tweet_id"],
            ..Default::default()
        },
        UserSchema::Bulk => Fields {
            user: USER_FIELDS
                .into_iter()
                .filter(|f| *f != "pinned_tweet_id")
                .collect(),
            ..Default::default()
        },
    }
}

/// Fields of a friends or followers page
pub(crate) fn users_page() -> Fields {
    Fields {
        max_results: Some(1000),
        ..user(UserSchema::Full)
    }
}

/// Fields of a tweets page, search results also expand the author
pub(crate) fn tweets_page(with_author: bool) -> Fields {
    let mut expansions = vec!["geo.place_id", "attachments.media_keys"];
    if with_author {
        expansions.push("author_id");
    }

    Fields {
        tweet: TWEET_FIELDS.to_vec(),
        media: MEDIA_FIELDS.to_vec(),
        place: PLACE_FIELDS.to_vec(),
        expansions,
        max_results: Some(100),
        ..Default::default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bulk_lookup_skips_pinned_tweet() {
        let fields = user(UserSchema::Bulk);
        assert!(!fields.user.contains(&"pinned_tweet_id"));
        assert!(fields.expansions.is_empty());

        let fields = user(UserSchema::Full);
        assert!(fields.user.contains(&"pinned_tweet_id"));
        assert!(fields.expands("pinned_tweet_id"));
    }

    #[test]
    fn search_expands_author() {
        assert!(tweets_page(true).expands("author_id"));
        assert!(!tweets_page(false).expands("author_id"));
        assert_eq!(Some(1000), users_page().max_results);
    }

    #[test]
    fn tweets_page_requests_no_user_fields() {
        let fields = tweets_page(false);
        assert!(fields.user.is_empty());
        assert_eq!(Some(100), fields.max_results);
        assert!(fields.tweet.contains(&"referenced_tweets"));
        assert!(fields.expands("attachments.media_keys"));
    }
}
