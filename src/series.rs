// src/series.rs
use crate::format::SAMPLE_SIZE;
use byteorder::{ByteOrder, LittleEndian};

/// Ordered sequence of decoded samples.
///
/// The series is append-only while the decoder owns it; the only other
/// mutation is the whole-sequence replacement performed by the decimation
/// stage. Samples are 64-bit floats in acquisition order.
///
/// # Example
///
/// ```
/// use rtx_rs::SampleSeries;
///
/// let mut series = SampleSeries::new();
/// series.extend_from_le_bytes(&1.5f64.to_le_bytes());
/// series.extend_from_le_bytes(&2.5f64.to_le_bytes());
///
/// assert_eq!(series.values(), &[1.5, 2.5]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSeries {
    values: Vec<f64>,
}

impl SampleSeries {
    pub fn new() -> Self {
        SampleSeries { values: Vec::new() }
    }

    /// Create an empty series with room for `capacity` samples.
    ///
    /// The decoder seeds this from the header's declared sample count; the
    /// hint is never validated against the decoded length.
    pub fn with_capacity(capacity: usize) -> Self {
        SampleSeries {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Decode a run of little-endian 8-byte floats and append them.
    ///
    /// The byte order is pinned to little-endian regardless of the host:
    /// RTX instruments write native little-endian and a decode on a
    /// big-endian host must not reinterpret.
    ///
    /// # Panics
    ///
    /// Panics if `bytes.len()` is not a multiple of the sample size; callers
    /// are expected to have split the chunk on a sample boundary already.
    pub fn extend_from_le_bytes(&mut self, bytes: &[u8]) {
        assert!(bytes.len() % SAMPLE_SIZE == 0);

        let count = bytes.len() / SAMPLE_SIZE;
        let start = self.values.len();
        self.values.resize(start + count, 0.0);
        LittleEndian::read_f64_into(bytes, &mut self.values[start..]);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Replace the entire sequence. Used by the decimation stage, which
    /// collapses the series as a whole rather than editing in place.
    pub fn replace(&mut self, values: Vec<f64>) {
        self.values = values;
    }

    /// Iterate `(timestamp, value)` rows where `timestamp[i] = i / sample_rate`.
    ///
    /// `sample_rate` must be non-zero; the converter checks this before any
    /// timestamp is computed.
    pub fn timestamped(&self, sample_rate: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i as f64 / sample_rate, v))
    }
}

impl From<Vec<f64>> for SampleSeries {
    fn from(values: Vec<f64>) -> Self {
        SampleSeries { values }
    }
}
