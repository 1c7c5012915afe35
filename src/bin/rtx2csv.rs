// src/bin/rtx2csv.rs
use anyhow::{bail, Context};
use clap::Parser;
use crossbeam_channel::unbounded;
use glob::glob;
use parking_lot::Mutex;
use rtx_rs::{validate_chunk_size, ConvertOptions, ReductionMode, RtxReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Convert RTX measurement recordings into CSV directories.
///
/// Each matched recording becomes `<OUTPUT_DIR>/<file stem>/` holding
/// `header.json` and `data.csv`.
#[derive(Parser, Debug)]
#[command(name = "rtx2csv", version, about = "Convert .rtx recordings into .csv files")]
struct Cli {
    /// Path to an .rtx file or a glob expression
    input: String,

    /// Folder to store the converted recordings in
    #[arg(required_unless_present = "header_only")]
    output_dir: Option<PathBuf>,

    /// Factor to reduce the sampling rate by
    #[arg(long, default_value_t = 1)]
    reduceby: usize,

    /// How groups of samples collapse during reduction
    #[arg(long, default_value = "mean")]
    reduction: ReductionMode,

    /// Amount of data (in bytes) to read at once from a recording
    #[arg(long, default_value_t = 8192)]
    chunk_size: usize,

    /// Print each recording's header as JSON and write nothing
    #[arg(long)]
    header_only: bool,

    /// Convert matched recordings on this many worker threads
    #[arg(long, default_value_t = 1)]
    jobs: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    validate_chunk_size(cli.chunk_size)?;

    let start = Instant::now();
    let files = matched_files(&cli.input)?;
    if files.is_empty() {
        warn!("no files matched {}", cli.input);
    }

    if cli.header_only {
        let failed = print_headers(&files, cli.chunk_size);
        if failed > 0 {
            bail!("failed to read {failed} of {} headers", files.len());
        }
        return Ok(());
    }

    // Safe: clap enforces the positional unless --header-only was given.
    let output_dir = match cli.output_dir {
        Some(dir) => dir,
        None => bail!("OUTPUT_DIR is required"),
    };
    let options = ConvertOptions {
        reduce_factor: cli.reduceby,
        reduction: cli.reduction,
        chunk_size: cli.chunk_size,
    };

    let total = files.len();
    let failed = if cli.jobs > 1 {
        convert_parallel(files, &output_dir, &options, cli.jobs)
    } else {
        convert_serial(files, &output_dir, &options)
    };

    let converted = total - failed;
    println!("Converted {converted} files in {:.2?}", start.elapsed());

    if failed > 0 {
        bail!("{failed} of {total} conversions failed");
    }
    Ok(())
}

fn matched_files(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = glob(pattern).with_context(|| format!("bad glob pattern {pattern:?}"))?;
    for entry in entries {
        match entry {
            Ok(path) => files.push(path),
            Err(err) => warn!("skipping unreadable match: {err}"),
        }
    }
    Ok(files)
}

fn print_headers(files: &[PathBuf], chunk_size: usize) -> usize {
    let mut failed = 0;
    for file in files {
        let json = RtxReader::open_with_chunk_size(file, chunk_size)
            .and_then(|mut reader| reader.read_header())
            .and_then(|header| serde_json::to_string_pretty(&header).map_err(Into::into));
        match json {
            Ok(json) => println!("{json}"),
            Err(err) => {
                error!("failed to read header of {}: {err}", file.display());
                failed += 1;
            }
        }
    }
    failed
}

fn convert_serial(files: Vec<PathBuf>, output_dir: &Path, options: &ConvertOptions) -> usize {
    let mut failed = 0;
    for file in files {
        if let Err(err) = rtx_rs::rtx_to_csv(&file, output_dir, options) {
            error!("failed to convert {}: {err}", file.display());
            failed += 1;
        }
    }
    failed
}

fn convert_parallel(
    files: Vec<PathBuf>,
    output_dir: &Path,
    options: &ConvertOptions,
    jobs: usize,
) -> usize {
    let (tx, rx) = unbounded::<PathBuf>();
    for file in files {
        // Send on an unbounded channel only fails once all receivers are
        // gone, and rx outlives this loop.
        let _ = tx.send(file);
    }
    drop(tx);

    let failed = Mutex::new(0usize);
    std::thread::scope(|scope| {
        for _ in 0..jobs {
            let rx = rx.clone();
            let failed = &failed;
            scope.spawn(move || {
                while let Ok(file) = rx.recv() {
                    if let Err(err) = rtx_rs::rtx_to_csv(&file, output_dir, options) {
                        error!("failed to convert {}: {err}", file.display());
                        *failed.lock() += 1;
                    }
                }
            });
        }
    });
    failed.into_inner()
}
