//! Survey data ingestion: CSV loading, respondent index checks and CSV output.

pub mod csv;
pub mod error;

pub use csv::{ReadOptions, read_survey_csv, validate_index, write_survey_csv};
pub use error::{IngestError, Result};
