// src/lib.rs
//! # rtx-rs
//!
//! A Rust library for reading, decimating and converting RTX measurement
//! recordings, the binary capture format produced by surface-measurement
//! instruments.
//!
//! ## Features
//!
//! - 🚀 **Streaming**: fixed-size chunked reads keep memory flat no matter
//!   how long the recording ran
//! - ✅ **Faithful**: byte-exact container semantics, down to the quirky
//!   12-hour header dates the instruments emit
//! - 📦 **Complete conversion**: one `header.json` plus `data.csv`
//!   directory per recording, ready for downstream analysis
//! - 🎯 **Type Safe**: strongly typed header with serde support
//!
//! ## Quick Start
//!
//! ### Reading a recording
//!
//! ```rust,no_run
//! use rtx_rs::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut reader = RtxReader::open("scan_0042.rtx")?;
//!     let recording = reader.read_recording()?;
//!
//!     println!(
//!         "{} samples on axis {} at {} Hz",
//!         recording.len(),
//!         recording.header.axis,
//!         recording.header.actual_sample_rate,
//!     );
//!     for (timestamp, value) in recording.timestamped_samples().take(5) {
//!         println!("{timestamp},{value}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Converting to CSV
//!
//! ```rust,no_run
//! use rtx_rs::{rtx_to_csv, ConvertOptions, ReductionMode};
//!
//! fn main() -> rtx_rs::Result<()> {
//!     let options = ConvertOptions {
//!         reduce_factor: 4,
//!         reduction: ReductionMode::Mean,
//!         ..ConvertOptions::default()
//!     };
//!     let report = rtx_to_csv("scan_0042.rtx", "converted", &options)?;
//!     println!(
//!         "wrote {} rows to {}",
//!         report.samples_written,
//!         report.csv_path.display(),
//!     );
//!     Ok(())
//! }
//! ```

// Modules
pub mod convert;
pub mod decimate;
pub mod error;
pub mod format;
pub mod header;
pub mod reader;
pub mod recording;
pub mod series;
pub mod writer;

// Re-export commonly used types at the crate root for convenience
pub use error::{Result, RtxError};

// Format exports
pub use format::{validate_chunk_size, DEFAULT_CHUNK_SIZE, SAMPLE_SIZE};

// Header exports
pub use header::{parse_header_date, RecordingHeader};

// Sample data exports
pub use recording::Recording;
pub use series::SampleSeries;

// Decimation exports
pub use decimate::{reduce_samples, ReductionMode};

// Reader exports
pub use reader::{ParseCursor, RtxReader};

// Writer exports
pub use writer::RtxWriter;

// Conversion exports
pub use convert::{rtx_to_csv, ConvertOptions, ConvertReport};

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use rtx_rs::prelude::*;
    //! ```

    pub use crate::convert::{rtx_to_csv, ConvertOptions};
    pub use crate::decimate::ReductionMode;
    pub use crate::error::{Result, RtxError};
    pub use crate::header::RecordingHeader;
    pub use crate::reader::RtxReader;
    pub use crate::recording::Recording;
    pub use crate::writer::RtxWriter;
}

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
