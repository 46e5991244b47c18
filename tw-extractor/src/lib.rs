pub mod config;
pub mod credentials;
mod error;
pub mod extractor;
pub mod logging;
pub mod models;
pub mod reporter;

pub use error::{ExtractorError, ReporterError};
