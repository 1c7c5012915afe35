// tests/convert_tests.rs
use rtx_rs::*;
use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn sample_header() -> RecordingHeader {
    RecordingHeader {
        owner: "ACME Metrology".to_string(),
        version_number: "2.11".to_string(),
        file_type: "rtx".to_string(),
        velocity: 1.25,
        sample_rate: 100.0,
        sample_number: 5.0,
        trigger_point: 0.0,
        trigger_interval: 0.01,
        actual_sample_rate: 100.0,
        flags: vec![1, 0],
        machine: "Form Talysurf".to_string(),
        serial_number: "FTS-1188".to_string(),
        date: NaiveDate::from_ymd_opt(2023, 11, 2)
            .unwrap()
            .and_hms_opt(11, 7, 30)
            .unwrap(),
        by: "night shift".to_string(),
        axis: "Z".to_string(),
        location: "metrology cell".to_string(),
    }
}

fn write_recording(path: &Path, header: &RecordingHeader, samples: &[f64]) {
    let mut writer = RtxWriter::create(path).unwrap();
    writer.write_header(header).unwrap();
    writer.write_samples(samples).unwrap();
    writer.finish().unwrap();
}

#[test]
fn test_convert_emits_expected_artifacts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scan_0042.rtx");
    let output = dir.path().join("converted");
    write_recording(&input, &sample_header(), &[1.5, -2.25, 0.0, 100.0, 0.125]);

    let report = rtx_to_csv(&input, &output, &ConvertOptions::default()).unwrap();

    let out_dir = output.join("scan_0042");
    assert_eq!(report.header_path, out_dir.join("header.json"));
    assert_eq!(report.csv_path, out_dir.join("data.csv"));
    assert_eq!(report.samples_written, 5);

    let csv = fs::read_to_string(&report.csv_path).unwrap();
    assert_eq!(
        csv,
        "0,1.5\r\n0.01,-2.25\r\n0.02,0\r\n0.03,100\r\n0.04,0.125\r\n"
    );
}

#[test]
fn test_header_json_content_and_layout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scan_0042.rtx");
    let output = dir.path().join("converted");
    write_recording(&input, &sample_header(), &[1.0, 2.0]);

    let report = rtx_to_csv(&input, &output, &ConvertOptions::default()).unwrap();
    let json = fs::read_to_string(&report.header_path).unwrap();

    // Four-space pretty print with the CSV path leading the document.
    assert!(json.starts_with("{\n    \"file_path\""));
    assert!(json.contains(&format!(
        "\"file_path\": {}",
        serde_json::to_string(&report.csv_path.to_string_lossy()).unwrap()
    )));
    assert!(json.contains("\"file_type\": \"csv\""));
    assert!(json.contains("\"date\": \"02/11/2023 11:07:30\""));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["owner"], "ACME Metrology");
    assert_eq!(value["actual_sample_rate"], 100.0);
    assert_eq!(value["flags"], serde_json::json!([1, 0]));
    // The original file type is rewritten; everything else passes through.
    assert_eq!(value["velocity"], 1.25);
}

#[test]
fn test_convert_with_mean_reduction() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scan_0042.rtx");
    let output = dir.path().join("converted");
    write_recording(&input, &sample_header(), &[1.5, -2.25, 0.0, 100.0, 0.125]);

    let options = ConvertOptions {
        reduce_factor: 2,
        reduction: ReductionMode::Mean,
        ..ConvertOptions::default()
    };
    let report = rtx_to_csv(&input, &output, &options).unwrap();

    assert_eq!(report.samples_written, 3);
    let csv = fs::read_to_string(&report.csv_path).unwrap();
    // Halved rate, so rows land 20 ms apart; the short tail averages alone.
    assert_eq!(csv, "0,-0.375\r\n0.02,50\r\n0.04,0.125\r\n");

    let json = fs::read_to_string(&report.header_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["actual_sample_rate"], 50.0);
}

#[test]
fn test_convert_with_drop_reduction() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scan_0042.rtx");
    let output = dir.path().join("converted");
    write_recording(&input, &sample_header(), &[1.5, -2.25, 0.0, 100.0, 0.125]);

    let options = ConvertOptions {
        reduce_factor: 2,
        reduction: ReductionMode::Drop,
        ..ConvertOptions::default()
    };
    rtx_to_csv(&input, &output, &options).unwrap();

    let csv = fs::read_to_string(output.join("scan_0042").join("data.csv")).unwrap();
    assert_eq!(csv, "0,1.5\r\n0.02,0\r\n0.04,0.125\r\n");
}

#[test]
fn test_reconversion_replaces_stale_artifacts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scan_0042.rtx");
    let output = dir.path().join("converted");
    write_recording(&input, &sample_header(), &[1.0, 2.0]);

    let stale_dir = output.join("scan_0042");
    fs::create_dir_all(&stale_dir).unwrap();
    let stale_file = stale_dir.join("leftover.txt");
    fs::write(&stale_file, b"from an older run").unwrap();

    rtx_to_csv(&input, &output, &ConvertOptions::default()).unwrap();

    assert!(!stale_file.exists());
    assert!(stale_dir.join("data.csv").exists());
    assert!(stale_dir.join("header.json").exists());
}

#[test]
fn test_zero_sample_rate_is_rejected_before_writing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("still.rtx");
    let output = dir.path().join("converted");
    let mut header = sample_header();
    header.actual_sample_rate = 0.0;
    write_recording(&input, &header, &[1.0, 2.0]);

    let err = rtx_to_csv(&input, &output, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        RtxError::MalformedHeaderValue { key, .. } if key == "Actual sample rate"
    ));
    // Nothing was created for the failed conversion.
    assert!(!output.join("still").exists());
}

#[test]
fn test_convert_honours_custom_chunk_size() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("scan_0042.rtx");
    let output = dir.path().join("converted");
    let samples: Vec<f64> = (0..1000).map(|i| i as f64).collect();
    write_recording(&input, &sample_header(), &samples);

    let options = ConvertOptions {
        chunk_size: 512,
        ..ConvertOptions::default()
    };
    let report = rtx_to_csv(&input, &output, &options).unwrap();
    assert_eq!(report.samples_written, 1000);

    let bad = ConvertOptions {
        chunk_size: 100,
        ..ConvertOptions::default()
    };
    let err = rtx_to_csv(&input, &output, &bad).unwrap_err();
    assert!(matches!(err, RtxError::InvalidChunkSize(100)));
}
