// src/reader/chunked.rs
use crate::error::{Result, RtxError};
use crate::format::{
    validate_chunk_size, DEFAULT_CHUNK_SIZE, EOF_TAG, HEADER_TAG, SAMPLE_SIZE,
};
use crate::header::{tokenize_header, RecordingHeader};
use crate::recording::Recording;
use crate::series::SampleSeries;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Trait alias for Read + Seek
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Decode progress through a recording, exposed for diagnostics.
///
/// `offset` is the absolute stream position of the next undecoded byte,
/// `chunk_index` the 1-based count of chunks read so far (the header chunk
/// is chunk 1) and `eof_seen` whether the EOF marker has been located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseCursor {
    pub offset: u64,
    pub chunk_index: usize,
    pub eof_seen: bool,
}

/// Streaming RTX recording reader.
///
/// The reader never loads the whole file at once: it walks the stream in
/// fixed-size chunks (default 8192 bytes), decoding the header from the
/// first chunk and sample data from the rest. Chunk sizes must be positive
/// multiples of the 8-byte sample size; that alignment keeps every
/// non-final data chunk a whole number of samples and pins the EOF marker
/// to the tail of the final short read, so no bytes ever need to be
/// buffered across chunk boundaries.
///
/// # Example
///
/// ```no_run
/// use rtx_rs::RtxReader;
///
/// let mut reader = RtxReader::open("traces/surface_scan.rtx")?;
/// let recording = reader.read_recording()?;
/// println!("{} samples at {} Hz", recording.len(), recording.header.actual_sample_rate);
/// # Ok::<(), rtx_rs::RtxError>(())
/// ```
pub struct RtxReader<R: ReadSeek> {
    source: R,
    chunk_size: usize,
    cursor: ParseCursor,
}

/// Constructors for standard file I/O
impl RtxReader<BufReader<File>> {
    /// Open a recording with the default chunk size.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_chunk_size(path, DEFAULT_CHUNK_SIZE)
    }

    /// Open a recording with an explicit chunk size.
    ///
    /// Larger chunks admit larger headers and cut syscall overhead; the
    /// size must be a positive multiple of 8.
    pub fn open_with_chunk_size(path: impl AsRef<Path>, chunk_size: usize) -> Result<Self> {
        let file = File::open(path)?;
        RtxReader::from_source(BufReader::with_capacity(65536, file), chunk_size)
    }
}

impl<R: ReadSeek> RtxReader<R> {
    /// Wrap any seekable byte source, e.g. a `Cursor<Vec<u8>>` in tests.
    pub fn from_source(source: R, chunk_size: usize) -> Result<Self> {
        validate_chunk_size(chunk_size)?;
        Ok(RtxReader {
            source,
            chunk_size,
            cursor: ParseCursor::default(),
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Decode progress after the last `read_*` call.
    pub fn cursor(&self) -> ParseCursor {
        self.cursor
    }

    /// Decode the whole recording: header plus every sample.
    pub fn read_recording(&mut self) -> Result<Recording> {
        let header = self.decode_header()?;
        let samples = self.decode_samples(header.sample_count_hint())?;
        debug!(
            samples = samples.len(),
            chunks = self.cursor.chunk_index,
            "decoded recording"
        );
        Ok(Recording::new(header, samples))
    }

    /// Decode only the header, leaving the sample data unread.
    pub fn read_header(&mut self) -> Result<RecordingHeader> {
        self.decode_header()
    }

    /// Read and interpret the header chunk, leaving the source positioned
    /// at the first data byte.
    fn decode_header(&mut self) -> Result<RecordingHeader> {
        self.source.seek(SeekFrom::Start(0))?;
        self.cursor = ParseCursor::default();

        let mut buf = vec![0u8; self.chunk_size];
        let n = read_full(&mut self.source, &mut buf)?;
        let chunk = &buf[..n];
        self.cursor.chunk_index = 1;

        if !chunk.starts_with(HEADER_TAG) {
            let prefix = &chunk[..chunk.len().min(HEADER_TAG.len())];
            return Err(RtxError::InvalidTag {
                expected: "HEADER::".to_string(),
                found: String::from_utf8_lossy(prefix).escape_debug().to_string(),
            });
        }

        let (raw, data_start) = tokenize_header(chunk, HEADER_TAG.len())?;
        let header = RecordingHeader::from_raw(&raw)?;

        self.cursor.offset = self.source.seek(SeekFrom::Start(data_start as u64))?;
        Ok(header)
    }

    /// Decode the data section from the current position to the EOF marker.
    ///
    /// Every full-size aligned chunk is a dense run of samples. The final
    /// read comes up short and carries the remaining samples with the
    /// marker at its tail; after splitting it the source is rewound so the
    /// marker is consumed as its own chunk, which ends the loop. A chunk
    /// that leads with the marker before that point means the data section
    /// ended early.
    fn decode_samples(&mut self, capacity_hint: Option<usize>) -> Result<SampleSeries> {
        let mut series = match capacity_hint {
            Some(count) => SampleSeries::with_capacity(count),
            None => SampleSeries::new(),
        };
        let mut buf = vec![0u8; self.chunk_size];

        loop {
            let n = read_full(&mut self.source, &mut buf)?;
            if n == 0 {
                if self.cursor.eof_seen {
                    break;
                }
                return Err(RtxError::TruncatedStream {
                    offset: self.cursor.offset,
                });
            }
            self.cursor.chunk_index += 1;
            let chunk = &buf[..n];

            if chunk.starts_with(EOF_TAG) {
                if self.cursor.eof_seen {
                    self.cursor.offset += n as u64;
                    break;
                }
                return Err(RtxError::PrematureEof {
                    chunk_index: self.cursor.chunk_index,
                });
            }

            if n % SAMPLE_SIZE == 0 {
                series.extend_from_le_bytes(chunk);
                self.cursor.offset += n as u64;
                continue;
            }

            // Short final read: samples then the marker.
            if n < EOF_TAG.len() {
                return Err(RtxError::TruncatedStream {
                    offset: self.cursor.offset + n as u64,
                });
            }
            let (data, trailer) = chunk.split_at(n - EOF_TAG.len());
            if trailer != EOF_TAG || data.len() % SAMPLE_SIZE != 0 {
                return Err(RtxError::TruncatedStream {
                    offset: self.cursor.offset + n as u64,
                });
            }
            series.extend_from_le_bytes(data);
            self.cursor.eof_seen = true;
            self.cursor.offset = self
                .source
                .seek(SeekFrom::End(-(EOF_TAG.len() as i64)))?;
        }

        Ok(series)
    }
}

/// Read into `buf` until it is full or the source is exhausted, retrying
/// interrupted reads. Returns the number of bytes read, which is short only
/// on the final read of a stream.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
