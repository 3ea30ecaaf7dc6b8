//! CSV output of checked tables.

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::info;

use crate::error::{IngestError, Result};

/// Write a DataFrame as CSV with a header row, creating parent directories.
pub fn write_survey_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let io_error = |source: std::io::Error| IngestError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut file = File::create(path).map_err(io_error)?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .map_err(|e| IngestError::CsvWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    info!(path = %path.display(), rows = df.height(), "survey table written");
    Ok(())
}
