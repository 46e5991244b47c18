use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::{Reporter, Written};
use crate::models::{TweetRecord, UserRecord};
use crate::ReporterError;

/// Writes one JSON document per line.
pub struct JsonReporter<W: Write> {
    writer: W,
    destination: String,
}

impl JsonReporter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ReporterError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file), path.display().to_string()))
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(writer: W, destination: String) -> Self {
        Self {
            writer,
            destination,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, record: &impl Serialize) -> Result<Written, ReporterError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer
            .write_all(b"\n")
            .map_err(|source| ReporterError::Io {
                path: self.destination.clone(),
                source,
            })?;
        Ok(Written::Saved)
    }
}

impl<W: Write + Send> Reporter for JsonReporter<W> {
    fn write_user(&mut self, record: &UserRecord) -> Result<Written, ReporterError> {
        self.write_line(record)
    }

    fn write_tweet(&mut self, record: &TweetRecord) -> Result<Written, ReporterError> {
        self.write_line(record)
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
