//! Output sinks for normalized records.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use serde::Deserialize;

use crate::extractor::{ExtractedDataType, Extraction, Records};
use crate::models::{TweetRecord, TweetSchema, UserRecord, UserSchema};
use crate::ReporterError;

pub use self::csv::CsvReporter;
pub use self::json::JsonReporter;
pub use self::sqlite::SqliteReporter;
pub use self::xlsx::XlsxReporter;

mod csv;
mod json;
mod sqlite;
mod xlsx;

#[derive(Deserialize, clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    #[default]
    Csv,
    Json,
    Sqlite,
    Xlsx,
}

impl OutputType {
    pub fn default_file(self) -> PathBuf {
        match self {
            Self::Csv => "results.csv".into(),
            Self::Json => "results.jsonl".into(),
            Self::Sqlite => "tw_extractor.db".into(),
            Self::Xlsx => "results.xlsx".into(),
        }
    }
}

/// Outcome of writing a single record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Written {
    Saved,
    /// Already present in the destination
    Skipped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub saved: usize,
    pub skipped: usize,
}

impl SaveSummary {
    fn add(&mut self, written: Written) {
        match written {
            Written::Saved => self.saved += 1,
            Written::Skipped => self.skipped += 1,
        }
    }
}

pub trait Reporter: Send {
    fn write_user(&mut self, record: &UserRecord) -> Result<Written, ReporterError>;

    fn write_tweet(&mut self, record: &TweetRecord) -> Result<Written, ReporterError>;

    /// Flush buffered output, called once after the last record.
    fn finish(&mut self) -> Result<(), ReporterError>;

    fn destination(&self) -> String;
}

/// User schema written for a kind of extraction.
pub fn user_schema(data_type: ExtractedDataType) -> UserSchema {
    match data_type {
        ExtractedDataType::Users => UserSchema::Bulk,
        _ => UserSchema::Full,
    }
}

/// Tweet schema written for a kind of extraction.
pub fn tweet_schema(data_type: ExtractedDataType) -> TweetSchema {
    match data_type {
        ExtractedDataType::SearchTweets => TweetSchema::Search,
        _ => TweetSchema::Timeline,
    }
}

/// Header row for a kind of extraction.
pub fn columns(data_type: ExtractedDataType) -> Vec<&'static str> {
    if data_type.is_tweets() {
        TweetRecord::columns(tweet_schema(data_type))
    } else {
        UserRecord::columns(user_schema(data_type))
    }
}

pub fn create(
    output_type: OutputType,
    path: impl AsRef<Path>,
    data_type: ExtractedDataType,
) -> Result<Box<dyn Reporter>, ReporterError> {
    let reporter: Box<dyn Reporter> = match output_type {
        OutputType::Csv => Box::new(CsvReporter::create(path, data_type)?),
        OutputType::Json => Box::new(JsonReporter::create(path)?),
        OutputType::Sqlite => Box::new(SqliteReporter::open(path)?),
        OutputType::Xlsx => Box::new(XlsxReporter::create(path, data_type)?),
    };
    Ok(reporter)
}

/// Drain an extraction into `reporter` one record at a time.
///
/// Records written before a failure stay in the destination.
pub async fn save(
    reporter: &mut dyn Reporter,
    extraction: Extraction<'_>,
) -> Result<SaveSummary, ReporterError> {
    let pb = indicatif::ProgressBar::new_spinner();
    if let Ok(sty) = indicatif::ProgressStyle::default_spinner().template("{spinner} {pos} records")
    {
        pb.set_style(sty);
    }

    let mut summary = SaveSummary::default();
    let drained = drain(reporter, extraction.records, &mut summary, &pb).await;
    let finished = reporter.finish();
    pb.finish_and_clear();
    drained?;
    finished?;

    tracing::info!(
        saved = summary.saved,
        skipped = summary.skipped,
        "Data saved to {}",
        reporter.destination()
    );
    Ok(summary)
}

async fn drain(
    reporter: &mut dyn Reporter,
    records: Records<'_>,
    summary: &mut SaveSummary,
    pb: &indicatif::ProgressBar,
) -> Result<(), ReporterError> {
    match records {
        Records::User(record) => {
            summary.add(reporter.write_user(&record)?);
            pb.inc(1);
        }
        Records::Users(mut records) => {
            while let Some(record) = records.next().await {
                summary.add(reporter.write_user(&record?)?);
                pb.inc(1);
            }
        }
        Records::Tweets(mut records) => {
            while let Some(record) = records.next().await {
                summary.add(reporter.write_tweet(&record?)?);
                pb.inc(1);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use futures::stream;
    use serde_json::json;
    use twitter::model::{Tweet, User};
    use twitter::{JoinedTweet, JoinedUser};

    use super::*;
    use crate::ExtractorError;

    pub(super) fn user_record(id: &str, schema: UserSchema) -> UserRecord {
        let user: User =
            serde_json::from_value(json!({ "id": id, "name": "Name", "username": format!("user{}", id) }))
                .unwrap();
        UserRecord::new(&JoinedUser::bare(user), schema)
    }

    pub(super) fn tweet_record(id: &str, schema: TweetSchema) -> TweetRecord {
        let tweet: Tweet = serde_json::from_value(json!({
            "id": id,
            "text": "hello #rust",
            "entities": { "hashtags": [{ "tag": "rust" }] },
            "public_metrics": { "like_count": 3 }
        }))
        .unwrap();
        let joined = JoinedTweet {
            tweet,
            media: None,
            place: None,
            author: None,
        };
        TweetRecord::new(&joined, schema)
    }

    #[derive(Default)]
    struct Recorder {
        ids: Vec<String>,
        finished: bool,
    }

    impl Reporter for Recorder {
        fn write_user(&mut self, record: &UserRecord) -> Result<Written, ReporterError> {
            self.ids.push(record.id.clone());
            Ok(Written::Saved)
        }

        fn write_tweet(&mut self, record: &TweetRecord) -> Result<Written, ReporterError> {
            if self.ids.contains(&record.id) {
                return Ok(Written::Skipped);
            }
            self.ids.push(record.id.clone());
            Ok(Written::Saved)
        }

        fn finish(&mut self) -> Result<(), ReporterError> {
            self.finished = true;
            Ok(())
        }

        fn destination(&self) -> String {
            "memory".to_string()
        }
    }

    #[test]
    fn columns_per_data_type() {
        assert_eq!(
            TweetRecord::columns(TweetSchema::Search),
            columns(ExtractedDataType::SearchTweets)
        );
        assert!(columns(ExtractedDataType::SearchTweets).contains(&"Author"));
        assert!(!columns(ExtractedDataType::UserTweets).contains(&"Author"));
        assert!(columns(ExtractedDataType::Friends).contains(&"Pinned Tweet ID"));
        assert!(!columns(ExtractedDataType::Users).contains(&"Pinned Tweet ID"));
    }

    #[test]
    fn output_type_from_config() {
        #[derive(Deserialize)]
        struct Output {
            output_type: OutputType,
        }
        let output: Output = toml::from_str(r#"output_type = "json""#).unwrap();
        assert_eq!(OutputType::Json, output.output_type);
        assert_eq!(PathBuf::from("results.jsonl"), output.output_type.default_file());

        let output: Output = toml::from_str(r#"output_type = "xlsx""#).unwrap();
        assert_eq!(OutputType::Xlsx, output.output_type);
        assert_eq!(PathBuf::from("results.xlsx"), output.output_type.default_file());
    }

    #[tokio::test]
    async fn counts_saved_and_skipped() {
        let records = ["1", "2", "1"].map(|id| Ok(tweet_record(id, TweetSchema::Timeline)));
        let extraction = Extraction {
            data_type: ExtractedDataType::UserTweets,
            records: Records::Tweets(stream::iter(records).boxed()),
        };

        let mut recorder = Recorder::default();
        let summary = save(&mut recorder, extraction).await.unwrap();
        assert_eq!(SaveSummary { saved: 2, skipped: 1 }, summary);
        assert!(recorder.finished);
    }

    #[tokio::test]
    async fn keeps_records_before_failure() {
        let records = vec![
            Ok(user_record("1", UserSchema::Full)),
            Err(ExtractorError::UnsupportedMode),
            Ok(user_record("2", UserSchema::Full)),
        ];
        let extraction = Extraction {
            data_type: ExtractedDataType::Followers,
            records: Records::Users(stream::iter(records).boxed()),
        };

        let mut recorder = Recorder::default();
        let err = save(&mut recorder, extraction).await.unwrap_err();
        assert!(matches!(err, ReporterError::Source(ExtractorError::UnsupportedMode)));
        assert_eq!(vec!["1"], recorder.ids);
        assert!(recorder.finished);
    }
}
