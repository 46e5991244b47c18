use std::path::PathBuf;

use serde::Deserialize;

use crate::reporter::OutputType;

#[derive(Deserialize, Debug, Default)]
pub struct OutputConfig {
    pub output_type: Option<OutputType>,
    pub output_file: Option<PathBuf>,
}
