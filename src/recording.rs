// src/recording.rs
use crate::decimate::{reduce_samples, ReductionMode};
use crate::header::RecordingHeader;
use crate::series::SampleSeries;

/// A fully decoded recording: the typed header plus every sample that
/// followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub header: RecordingHeader,
    pub samples: SampleSeries,
}

impl Recording {
    pub fn new(header: RecordingHeader, samples: SampleSeries) -> Self {
        Recording { header, samples }
    }

    /// Number of decoded samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Reduce the recording in place by `factor`, collapsing each group of
    /// `factor` consecutive samples per `mode`.
    ///
    /// The header's `actual_sample_rate` is divided by the factor so that
    /// timestamps generated from the reduced series still span the same
    /// wall-clock interval. A factor of zero or one leaves the recording
    /// untouched, rate included.
    pub fn decimate(&mut self, factor: usize, mode: ReductionMode) {
        if factor <= 1 {
            return;
        }
        let reduced = reduce_samples(self.samples.values(), factor, mode);
        self.samples.replace(reduced);
        self.header.actual_sample_rate /= factor as f64;
    }

    /// Seconds between consecutive samples, `1 / actual_sample_rate`.
    ///
    /// Reflects any decimation already applied; the interval grows by the
    /// reduction factor.
    pub fn sample_interval(&self) -> f64 {
        1.0 / self.header.actual_sample_rate
    }

    /// Iterate `(timestamp, value)` rows, timestamps derived from the
    /// header's achieved rate: sample `i` maps to `i / actual_sample_rate`
    /// seconds.
    pub fn timestamped_samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples.timestamped(self.header.actual_sample_rate)
    }
}
