use std::fs;

use pretty_assertions::assert_eq;
use scout_core::JobConfig;
use scout_engine::{
    query_slug, render_csv, salvage_outputs, write_outputs, AtomicFileWriter, PlaceRecord,
};

fn record(name: &str) -> PlaceRecord {
    PlaceRecord {
        name: name.to_string(),
        rating: "4.6".to_string(),
        reviews: "1,234".to_string(),
        category: "Cafe".to_string(),
        address: "Main St 4".to_string(),
        phone: "+358 40 1234567".to_string(),
        website: "https://example.com".to_string(),
        maps_url: "https://www.google.com/maps/place/x".to_string(),
    }
}

#[test]
fn csv_quotes_fields_with_commas_and_quotes() {
    let mut rec = record("Joe's \"Famous\" Cafe, Downtown");
    rec.address = "Line1\nLine2".to_string();
    let csv = render_csv(&[rec]);

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Name,Rating,Reviews,Category,Address,Phone,Website,Maps URL")
    );
    let body = &csv[csv.find('\n').unwrap() + 1..];
    assert!(body.starts_with("\"Joe's \"\"Famous\"\" Cafe, Downtown\""));
    assert!(body.contains("\"Line1\nLine2\""));
    // The reviews field contains a comma and must be quoted too.
    assert!(body.contains("\"1,234\""));
}

#[test]
fn csv_for_no_records_is_just_the_header() {
    let csv = render_csv(&[]);
    assert_eq!(csv, "Name,Rating,Reviews,Category,Address,Phone,Website,Maps URL\n");
}

#[test]
fn slug_is_filesystem_safe_and_stable() {
    assert_eq!(query_slug("Coffee near Helsinki!"), "coffee-near-helsinki");
    assert_eq!(query_slug("  ***  "), "query");
    assert_eq!(query_slug("a  b"), "a-b");
}

#[test]
fn write_outputs_creates_csv_and_manifest() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = JobConfig::new("Coffee near Helsinki");
    config.output_dir = dir.path().to_path_buf();

    let paths = write_outputs(&config, &[record("Cafe One"), record("Cafe Two")])
        .expect("write outputs");

    assert_eq!(paths.csv, dir.path().join("coffee-near-helsinki.csv"));
    let csv = fs::read_to_string(&paths.csv).expect("read csv");
    assert_eq!(csv.lines().count(), 3);

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.manifest).expect("read manifest"))
            .expect("parse manifest");
    assert_eq!(manifest["query"], "Coffee near Helsinki");
    assert_eq!(manifest["record_count"], 2);
    assert_eq!(manifest["config"]["unavailable_text"], "Not Available");
}

#[test]
fn rerun_replaces_previous_outputs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = JobConfig::new("bakeries");
    config.output_dir = dir.path().to_path_buf();

    write_outputs(&config, &[record("First")]).expect("first write");
    let paths = write_outputs(&config, &[record("Second")]).expect("second write");

    let csv = fs::read_to_string(&paths.csv).expect("read csv");
    assert!(csv.contains("Second"));
    assert!(!csv.contains("First"));
}

#[test]
fn writer_rejects_a_plain_file_as_output_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("not_a_dir");
    fs::write(&file_path, b"x").expect("write file");

    let writer = AtomicFileWriter::new(file_path);
    let err = writer.write("out.csv", "data").expect_err("must reject");
    assert!(err.to_string().contains("not a directory"));
}

#[test]
fn writer_creates_missing_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("a").join("b");

    let path = AtomicFileWriter::new(nested.clone())
        .write("out.csv", "data")
        .expect("write into nested dir");

    assert!(nested.is_dir());
    assert_eq!(fs::read_to_string(path).expect("read back"), "data");
}

#[test]
fn partial_records_are_kept_when_a_run_breaks_off() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = JobConfig::new("coffee roasters");
    config.output_dir = dir.path().to_path_buf();

    let paths = salvage_outputs(&config, &[record("Half Way Cafe")]).expect("salvage paths");

    let csv = fs::read_to_string(&paths.csv).expect("read csv");
    assert!(csv.contains("Half Way Cafe"));
    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.manifest).expect("read manifest"))
            .expect("parse manifest");
    assert_eq!(manifest["record_count"], 1);
}

#[test]
fn nothing_is_kept_when_a_broken_run_collected_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = JobConfig::new("coffee roasters");
    config.output_dir = dir.path().to_path_buf();

    assert!(salvage_outputs(&config, &[]).is_none());
    assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 0);
}

#[test]
fn salvage_reports_nothing_when_the_output_dir_is_unusable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file_path = dir.path().join("not_a_dir");
    fs::write(&file_path, b"x").expect("write file");
    let mut config = JobConfig::new("coffee roasters");
    config.output_dir = file_path;

    // The export failure is logged, not surfaced.
    assert!(salvage_outputs(&config, &[record("Lost Cafe")]).is_none());
}
