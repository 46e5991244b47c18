use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::{columns, Reporter, Written};
use crate::extractor::ExtractedDataType;
use crate::models::{TweetRecord, UserRecord};
use crate::ReporterError;

/// Widest column set, in characters
const MAX_WIDTH: usize = 80;

/// Writes a single worksheet with a bold header row, saved on finish.
pub struct XlsxReporter {
    worksheet: Worksheet,
    path: PathBuf,
    row: u32,
    widths: Vec<usize>,
}

impl XlsxReporter {
    pub fn create(path: impl AsRef<Path>, data_type: ExtractedDataType) -> Result<Self, ReporterError> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(if data_type.is_tweets() { "Tweets" } else { "Users" })?;

        let mut reporter = Self {
            worksheet,
            path: path.as_ref().to_path_buf(),
            row: 0,
            widths: vec![],
        };
        let header = columns(data_type);
        let bold = Format::new().set_bold();
        for (col, title) in header.iter().enumerate() {
            reporter
                .worksheet
                .write_string_with_format(0, col as u16, *title, &bold)?;
            reporter.fit(col, title);
        }
        reporter.row = 1;
        Ok(reporter)
    }

    fn fit(&mut self, col: usize, value: &str) {
        let width = value
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_WIDTH);
        if self.widths.len() <= col {
            self.widths.resize(col + 1, 0);
        }
        self.widths[col] = self.widths[col].max(width);
    }

    fn write_row(&mut self, cells: Vec<String>) -> Result<Written, ReporterError> {
        for (col, cell) in cells.iter().enumerate() {
            self.worksheet.write_string(self.row, col as u16, cell.as_str())?;
            self.fit(col, cell);
        }
        self.row += 1;
        Ok(Written::Saved)
    }
}

impl Reporter for XlsxReporter {
    fn write_user(&mut self, record: &UserRecord) -> Result<Written, ReporterError> {
        self.write_row(record.row())
    }

    fn write_tweet(&mut self, record: &TweetRecord) -> Result<Written, ReporterError> {
        self.write_row(record.row())
    }

    fn finish(&mut self) -> Result<(), ReporterError> {
        for (col, width) in self.widths.iter().enumerate() {
            // Two characters of padding
            self.worksheet.set_column_width(col as u16, (*width + 2) as f64)?;
        }

        let mut workbook = Workbook::new();
        workbook.push_worksheet(std::mem::replace(&mut self.worksheet, Worksheet::new()));
        workbook.save(&self.path)?;
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}
