//! Load, flag and write a survey table.

use std::fs;

use survey_check::{CategoryRule, ValueSet, check_category};
use survey_ingest::{IngestError, ReadOptions, read_survey_csv, write_survey_csv};

#[test]
fn flagged_table_is_written_with_flag_columns() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wave1.csv");
    fs::write(&input, "id,V3\n101,1\n102,7\n103,\n").unwrap();

    let options = ReadOptions::default().with_index_column("id");
    let mut df = read_survey_csv(&input, &options).unwrap();
    check_category(&mut df, &CategoryRule::new("V3", ValueSet::new([1, 2, 3]))).unwrap();

    let output = dir.path().join("out").join("wave1_checked.csv");
    write_survey_csv(&mut df, &output).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some("id,V3,err_V3_missing,err_V3_values"));
    assert_eq!(lines.next(), Some("101,1,false,false"));
    assert_eq!(lines.next(), Some("102,7,false,true"));
    assert_eq!(lines.next(), Some("103,,true,false"));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();

    let err = read_survey_csv(&dir.path().join("absent.csv"), &ReadOptions::default())
        .unwrap_err();

    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
