use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::{columns, Reporter, Written};
use crate::extractor::ExtractedDataType;
use crate::models::{TweetRecord, UserRecord};
use crate::ReporterError;

/// Writes one row per record below a header matching the extraction.
pub struct CsvReporter<W: Write> {
    writer: ::csv::Writer<W>,
    destination: String,
}

impl CsvReporter<File> {
    pub fn create(path: impl AsRef<Path>, data_type: ExtractedDataType) -> Result<Self, ReporterError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ReporterError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::new(file, path.display().to_string(), data_type)
    }
}

impl<W: Write> CsvReporter<W> {
    pub fn new(
        writer: W,
        destination: String,
        data_type: ExtractedDataType,
    ) -> Result<Self, ReporterError> {
        let mut writer = ::csv::Writer::from_writer(writer);
        writer.write_record(columns(data_type))?;
        Ok(Self {
            writer,
            destination,
        })
    }

    pub fn into_inner(self) -> Result<W, ReporterError> {
        self.writer
            .into_inner()
            .map_err(|e| ReporterError::Csv(e.into_error().into()))
    }
}

impl<W: Write + Send> Reporter for CsvReporter<W> {
    fn write_user(&mut self, record: &UserRecord) -> Result<Written, ReporterError> {
        self.writer.write_record(record.row())?;
        Ok(Written::Saved)
    }

    fn write_tweet(&mut self, record: &TweetRecord) -> Result<Written, ReporterError> {
        self.writer.write_record(record.row())?;
        Ok(Written::Saved)
    }

    fn finish(&mut self) -> Result<(), ReporterError> {
        self.writer.flush().map_err(|source| ReporterError::Io {
            path: self.destination.clone(),
            source,
        })
    }

    fn destination(&self) -> String {
        self.destination.clone()
    }
}
