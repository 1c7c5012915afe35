// src/writer/sync_writer.rs
use crate::error::{Result, RtxError};
use crate::format::{DATA_TAG, DATE_FORMAT, EOF_TAG, HEADER_TAG, KEY_SEP, LINE_END};
use crate::header::{RecordingHeader, REQUIRED_KEYS};
use bytes::{BufMut, BytesMut};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Byte sequences that would be re-tokenized as framing if they appeared
/// inside a header value.
const RESERVED_SEQUENCES: [&str; 3] = ["\r\n", "::", ": "];

/// Buffered sample bytes are flushed to the sink once they pass this size.
const FLUSH_THRESHOLD: usize = 8192;

#[derive(Debug, PartialEq, Eq)]
enum WriterState {
    ExpectHeader,
    ExpectSamples,
}

/// Synchronous RTX recording writer.
///
/// Emits the container front to back: preamble, the sixteen header lines in
/// canonical order, the data terminator, dense little-endian samples and
/// the EOF marker. Sample bytes accumulate in a [`BytesMut`] and are
/// flushed in large writes.
pub struct RtxWriter<W: Write> {
    sink: W,
    buffer: BytesMut,
    state: WriterState,
    samples_written: u64,
}

/// Constructor for standard file I/O
impl RtxWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(RtxWriter::from_sink(BufWriter::new(file)))
    }
}

impl<W: Write> RtxWriter<W> {
    /// Wrap any byte sink, e.g. a `Vec<u8>` in tests.
    pub fn from_sink(sink: W) -> Self {
        RtxWriter {
            sink,
            buffer: BytesMut::with_capacity(FLUSH_THRESHOLD),
            state: WriterState::ExpectHeader,
            samples_written: 0,
        }
    }

    /// Write the header section. Must be called exactly once, before any
    /// samples.
    ///
    /// Free-text fields are rejected if they contain a sequence the header
    /// tokenizer treats as framing (`\r\n`, `::` or `: `); surrounding
    /// whitespace in a value does not survive a read back, since values are
    /// stored trimmed.
    pub fn write_header(&mut self, header: &RecordingHeader) -> Result<()> {
        if self.state != WriterState::ExpectHeader {
            return Err(RtxError::WriterMisuse("header already written"));
        }

        // One value per entry of REQUIRED_KEYS, in its order.
        let values = [
            header.owner.clone(),
            header.version_number.clone(),
            header.file_type.clone(),
            header.velocity.to_string(),
            header.sample_rate.to_string(),
            header.sample_number.to_string(),
            header.trigger_point.to_string(),
            header.trigger_interval.to_string(),
            header.actual_sample_rate.to_string(),
            header
                .flags
                .iter()
                .map(|flag| flag.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            header.machine.clone(),
            header.serial_number.clone(),
            header.date.format(DATE_FORMAT).to_string(),
            header.by.clone(),
            header.axis.clone(),
            header.location.clone(),
        ];

        for value in &values {
            if RESERVED_SEQUENCES.iter().any(|seq| value.contains(seq)) {
                return Err(RtxError::WriterMisuse(
                    "header value contains a reserved sequence",
                ));
            }
        }

        self.buffer.put_slice(HEADER_TAG);
        for (key, value) in REQUIRED_KEYS.iter().zip(&values) {
            self.buffer.put_slice(key.as_bytes());
            self.buffer.put_slice(KEY_SEP);
            self.buffer.put_slice(value.as_bytes());
            self.buffer.put_slice(LINE_END);
        }
        self.buffer.put_slice(DATA_TAG);

        self.flush_buffer()?;
        self.state = WriterState::ExpectSamples;
        Ok(())
    }

    /// Append samples to the data section.
    pub fn write_samples(&mut self, values: &[f64]) -> Result<()> {
        if self.state != WriterState::ExpectSamples {
            return Err(RtxError::WriterMisuse("header not written yet"));
        }

        for value in values {
            self.buffer.put_f64_le(*value);
        }
        self.samples_written += values.len() as u64;

        if self.buffer.len() >= FLUSH_THRESHOLD {
            self.flush_buffer()?;
        }
        Ok(())
    }

    /// Samples appended so far.
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Write the EOF marker, flush everything and return the sink.
    pub fn finish(mut self) -> Result<W> {
        if self.state != WriterState::ExpectSamples {
            return Err(RtxError::WriterMisuse("header not written yet"));
        }

        self.buffer.put_slice(EOF_TAG);
        self.flush_buffer()?;
        self.sink.flush()?;
        Ok(self.sink)
    }

    fn flush_buffer(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            let bytes = self.buffer.split();
            self.sink.write_all(&bytes)?;
        }
        Ok(())
    }
}
