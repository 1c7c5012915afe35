// src/convert.rs
//! Conversion of RTX recordings into CSV directories.
//!
//! Each converted recording becomes a directory named after the input
//! file's stem, holding `header.json` (the typed header, plus the path of
//! the emitted CSV) and `data.csv` (one `timestamp,value` row per sample,
//! no heading row). Converting over an existing directory replaces it
//! wholesale, so stale artifacts from a previous run never survive.

use crate::decimate::ReductionMode;
use crate::error::{Result, RtxError};
use crate::format::{DEFAULT_CHUNK_SIZE, RTX_EXTENSION};
use crate::header::RecordingHeader;
use crate::reader::RtxReader;
use crate::recording::Recording;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Knobs for a single conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Sample-rate reduction factor; 1 leaves the recording untouched.
    pub reduce_factor: usize,
    /// How reduced sample groups collapse.
    pub reduction: ReductionMode,
    /// Chunk size for the streaming read.
    pub chunk_size: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            reduce_factor: 1,
            reduction: ReductionMode::Mean,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// What a conversion produced.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub header_path: PathBuf,
    pub csv_path: PathBuf,
    /// Rows written to the CSV, after any reduction.
    pub samples_written: usize,
}

/// `header.json` layout: the CSV path first, then the header fields with
/// `file_type` rewritten to reflect the emitted format.
#[derive(Serialize)]
struct HeaderDocument<'a> {
    file_path: &'a str,
    #[serde(flatten)]
    header: &'a RecordingHeader,
}

/// Convert one `.rtx` recording into a CSV directory under `output_dir`.
///
/// The output directory is `output_dir/<file stem>`; it is removed first
/// if it already exists. With a reduction factor above 1 the samples are
/// decimated before emission and the JSON carries the reduced
/// `actual_sample_rate`, so timestamps and rate stay consistent.
///
/// # Errors
///
/// [`UnsupportedFileKind`](RtxError::UnsupportedFileKind) when the input
/// path does not end in `.rtx`, any decode error from the streaming read,
/// and [`MalformedHeaderValue`](RtxError::MalformedHeaderValue) when the
/// header declares a zero `Actual sample rate`, which admits no timestamps.
pub fn rtx_to_csv(
    rtx_file: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    convert_file(rtx_file.as_ref(), output_dir.as_ref(), options)
}

#[instrument(skip(options), err)]
fn convert_file(
    rtx_file: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    if rtx_file.extension().and_then(|ext| ext.to_str()) != Some(RTX_EXTENSION) {
        return Err(RtxError::UnsupportedFileKind(rtx_file.to_path_buf()));
    }
    let stem = rtx_file
        .file_stem()
        .ok_or_else(|| RtxError::UnsupportedFileKind(rtx_file.to_path_buf()))?;

    let mut reader = RtxReader::open_with_chunk_size(rtx_file, options.chunk_size)?;
    let mut recording = reader.read_recording()?;

    // Timestamps divide by this; fail before touching the output tree.
    if recording.header.actual_sample_rate == 0.0 {
        return Err(RtxError::MalformedHeaderValue {
            key: "Actual sample rate".to_string(),
            value: recording.header.actual_sample_rate.to_string(),
            expected: "a non-zero rate".to_string(),
        });
    }

    let out_dir = output_dir.join(stem);
    if out_dir.is_dir() {
        fs::remove_dir_all(&out_dir)?;
    }
    fs::create_dir_all(&out_dir)?;

    recording.decimate(options.reduce_factor, options.reduction);

    let header_path = out_dir.join("header.json");
    let csv_path = out_dir.join("data.csv");

    write_header_json(&header_path, &csv_path, &recording.header)?;
    let samples_written = write_csv(&csv_path, &recording)?;

    info!(
        rows = samples_written,
        out = %out_dir.display(),
        "converted recording"
    );

    Ok(ConvertReport {
        header_path,
        csv_path,
        samples_written,
    })
}

fn write_header_json(header_path: &Path, csv_path: &Path, header: &RecordingHeader) -> Result<()> {
    let mut emitted = header.clone();
    emitted.file_type = "csv".to_string();

    let file_path = csv_path.to_string_lossy();
    let document = HeaderDocument {
        file_path: file_path.as_ref(),
        header: &emitted,
    };

    let mut out = BufWriter::new(File::create(header_path)?);
    // Four-space indent, matching the instrument vendor's own exports.
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    document.serialize(&mut serializer)?;
    out.flush()?;
    Ok(())
}

fn write_csv(csv_path: &Path, recording: &Recording) -> Result<usize> {
    let mut out = BufWriter::new(File::create(csv_path)?);
    let mut rows = 0usize;
    for (timestamp, value) in recording.timestamped_samples() {
        write!(out, "{},{}\r\n", timestamp, value)?;
        rows += 1;
    }
    out.flush()?;
    Ok(rows)
}
