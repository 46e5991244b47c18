use thiserror::Error;
use twitter::TwitterError;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("{0} parameter is missing")]
    MissingParameter(&'static str),

    #[error("unsupported extractor, check your parameters")]
    UnsupportedMode,

    #[error("unknown exclude value: {0}, should be one of retweets, replies")]
    InvalidExclude(String),

    #[error(transparent)]
    Twitter(#[from] TwitterError),
}

#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("unable to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("unable to write csv record: {0}")]
    Csv(#[from] csv::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("unable to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("unable to serialize record: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Source(#[from] ExtractorError),
}
