//! CSV file reading with Polars.

use std::collections::HashSet;
use std::path::Path;

use polars::prelude::{
    AnyValue, CsvParseOptions, CsvReadOptions, DataFrame, NullValues, PlSmallStr, SerReader,
};
use survey_check::{any_to_string, is_missing};
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Options for loading a survey table.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Rows used for schema inference.
    pub infer_schema_length: usize,
    /// Extra cell contents read as null, e.g. `"NA"` or `"."`.
    pub null_values: Vec<String>,
    /// Respondent-id column that must be present, complete and unique.
    pub index_column: Option<String>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: 100,
            null_values: Vec::new(),
            index_column: None,
        }
    }
}

impl ReadOptions {
    #[must_use]
    pub fn with_index_column(mut self, column: impl Into<String>) -> Self {
        self.index_column = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }
}

/// Reads a survey CSV file (single header row) into a DataFrame.
///
/// When an index column is configured it is validated with
/// [`validate_index`].
pub fn read_survey_csv(path: &Path, options: &ReadOptions) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut read_options = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(options.infer_schema_length));
    if !options.null_values.is_empty() {
        let markers: Vec<PlSmallStr> = options
            .null_values
            .iter()
            .map(|value| value.as_str().into())
            .collect();
        read_options = read_options.with_parse_options(
            CsvParseOptions::default().with_null_values(Some(NullValues::AllColumns(markers))),
        );
    }

    let df = read_options
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if let Some(column) = &options.index_column {
        validate_index(&df, column)?;
    }

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "survey table loaded"
    );
    Ok(df)
}

/// Check that `column` identifies every row exactly once.
pub fn validate_index(df: &DataFrame, column: &str) -> Result<()> {
    let series = df
        .column(column)
        .map_err(|_| IngestError::ColumnNotFound {
            column: column.to_string(),
        })?;

    let mut seen = HashSet::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = series.get(idx)?;
        if is_missing(&value) {
            return Err(IngestError::NullIndex {
                column: column.to_string(),
                row: idx,
            });
        }
        let key = index_key(&value);
        if !seen.insert(key.clone()) {
            return Err(IngestError::DuplicateIndex {
                column: column.to_string(),
                value: key,
            });
        }
    }

    debug!(column, respondents = seen.len(), "index column is unique");
    Ok(())
}

/// Identity of a respondent id; string ids are compared verbatim.
fn index_key(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => any_to_string(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_infers_types() {
        let file = create_temp_csv("id,V3,name\n1,2,a\n2,,b\n");
        let df = read_survey_csv(file.path(), &ReadOptions::default()).unwrap();

        assert_eq!(df.shape(), (2, 3));
        let v3 = df.column("V3").unwrap().i64().unwrap();
        assert_eq!(v3.get(0), Some(2));
        assert_eq!(v3.get(1), None);
    }

    #[test]
    fn test_custom_null_markers() {
        let file = create_temp_csv("id,V3\n1,NA\n2,4\n");
        let options = ReadOptions::default().with_null_values(["NA"]);
        let df = read_survey_csv(file.path(), &options).unwrap();

        let v3 = df.column("V3").unwrap().i64().unwrap();
        assert_eq!(v3.get(0), None);
        assert_eq!(v3.get(1), Some(4));
    }

    #[test]
    fn test_duplicate_index() {
        let file = create_temp_csv("id,V3\n1,1\n1,2\n");
        let options = ReadOptions::default().with_index_column("id");

        let err = read_survey_csv(file.path(), &options).unwrap_err();

        assert!(matches!(err, IngestError::DuplicateIndex { ref value, .. } if value == "1"));
    }

    #[test]
    fn test_string_ids_compare_verbatim() {
        let df = DataFrame::new(vec![
            Series::new("id".into(), vec![" 1", "1", "1 "]).into(),
            Series::new("V3".into(), vec![1i64, 2, 3]).into(),
        ])
        .unwrap();

        assert!(validate_index(&df, "id").is_ok());

        let df = DataFrame::new(vec![Series::new("id".into(), vec!["r1", "r2", "r1"]).into()])
            .unwrap();
        let err = validate_index(&df, "id").unwrap_err();
        assert!(matches!(err, IngestError::DuplicateIndex { ref value, .. } if value == "r1"));
    }

    #[test]
    fn test_null_index() {
        let file = create_temp_csv("id,V3\n1,1\n,2\n");
        let options = ReadOptions::default().with_index_column("id");

        let err = read_survey_csv(file.path(), &options).unwrap_err();

        assert!(matches!(err, IngestError::NullIndex { row: 1, .. }));
    }

    #[test]
    fn test_unknown_index_column() {
        let file = create_temp_csv("id,V3\n1,1\n");
        let options = ReadOptions::default().with_index_column("respondent");

        let err = read_survey_csv(file.path(), &options).unwrap_err();

        assert!(matches!(err, IngestError::ColumnNotFound { .. }));
    }
}
