//! CSV reading and writing.

mod reader;
mod writer;

pub use reader::{ReadOptions, read_survey_csv, validate_index};
pub use writer::write_survey_csv;
