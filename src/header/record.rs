// src/header/record.rs
use crate::error::{Result, RtxError};
use crate::header::tokenizer::RawHeaderMap;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// The sixteen fields every recording header must carry, spelled exactly as
/// they appear on the wire.
pub const REQUIRED_KEYS: [&str; 16] = [
    "Owner",
    "Version no",
    "File Type",
    "Velocity",
    "Sample rate",
    "Sample no",
    "Trigger point",
    "Trigger interval",
    "Actual sample rate",
    "Flags",
    "Machine",
    "Serial No",
    "Date",
    "By",
    "Axis",
    "Location",
];

/// Typed view of a recording's header section.
///
/// Field order matters: serialization emits fields in declaration order, and
/// downstream consumers of the emitted JSON rely on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingHeader {
    pub owner: String,
    pub version_number: String,
    pub file_type: String,
    /// Traverse velocity of the measurement head, in the machine's own units.
    pub velocity: f64,
    /// Sample rate the recording was configured with, in Hz.
    pub sample_rate: f64,
    /// Declared number of samples. Informational only; the decoder never
    /// checks it against the data section.
    pub sample_number: f64,
    pub trigger_point: f64,
    pub trigger_interval: f64,
    /// Rate the hardware actually achieved, in Hz. This, not `sample_rate`,
    /// drives timestamp generation.
    pub actual_sample_rate: f64,
    pub flags: Vec<i64>,
    pub machine: String,
    pub serial_number: String,
    #[serde(with = "rtx_date")]
    pub date: NaiveDateTime,
    pub by: String,
    pub axis: String,
    pub location: String,
}

impl RecordingHeader {
    /// Interpret a raw key/value map as a typed header.
    ///
    /// Every key in [`REQUIRED_KEYS`] must be present; extra keys are
    /// ignored. Numeric fields must parse as decimal numbers, `Flags` as
    /// whitespace-separated integers and `Date` as a
    /// `DD/MM/YYYY hh:mm:ss` timestamp.
    ///
    /// # Errors
    ///
    /// [`MissingHeaderField`](RtxError::MissingHeaderField) when a required
    /// key is absent, [`MalformedHeaderValue`](RtxError::MalformedHeaderValue)
    /// when a value does not parse as its field's type.
    pub fn from_raw(raw: &RawHeaderMap) -> Result<Self> {
        Ok(RecordingHeader {
            owner: text_field(raw, "Owner")?,
            version_number: text_field(raw, "Version no")?,
            file_type: text_field(raw, "File Type")?,
            velocity: numeric_field(raw, "Velocity")?,
            sample_rate: numeric_field(raw, "Sample rate")?,
            sample_number: numeric_field(raw, "Sample no")?,
            trigger_point: numeric_field(raw, "Trigger point")?,
            trigger_interval: numeric_field(raw, "Trigger interval")?,
            actual_sample_rate: numeric_field(raw, "Actual sample rate")?,
            flags: flags_field(raw)?,
            machine: text_field(raw, "Machine")?,
            serial_number: text_field(raw, "Serial No")?,
            date: date_field(raw)?,
            by: text_field(raw, "By")?,
            axis: text_field(raw, "Axis")?,
            location: text_field(raw, "Location")?,
        })
    }

    /// Declared sample count as a capacity hint, or `None` when the header
    /// value is not a sane count.
    pub fn sample_count_hint(&self) -> Option<usize> {
        if self.sample_number.is_finite() && self.sample_number >= 0.0 {
            Some(self.sample_number as usize)
        } else {
            None
        }
    }
}

/// Parse a header `Date` value.
///
/// The on-disk format is `%d/%m/%Y %I:%M:%S`: a 12-hour clock with no
/// AM/PM marker, so hours outside `01..=12` never occur in well-formed
/// recordings. The hour digits are taken literally; `09` means nine
/// o'clock with the half of the day unknown.
pub fn parse_header_date(text: &str) -> Option<NaiveDateTime> {
    // chrono refuses %I without a meridiem, so parse 24-hour and apply the
    // 12-hour range restriction by hand.
    let parsed = NaiveDateTime::parse_from_str(text, "%d/%m/%Y %H:%M:%S").ok()?;
    if (1..=12).contains(&parsed.hour()) {
        Some(parsed)
    } else {
        None
    }
}

fn require<'a>(raw: &'a RawHeaderMap, key: &str) -> Result<&'a str> {
    raw.get(key)
        .ok_or_else(|| RtxError::MissingHeaderField(key.to_string()))
}

fn text_field(raw: &RawHeaderMap, key: &str) -> Result<String> {
    require(raw, key).map(str::to_string)
}

fn numeric_field(raw: &RawHeaderMap, key: &str) -> Result<f64> {
    let value = require(raw, key)?;
    value.parse().map_err(|_| RtxError::MalformedHeaderValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: "a decimal number".to_string(),
    })
}

fn flags_field(raw: &RawHeaderMap) -> Result<Vec<i64>> {
    let value = require(raw, "Flags")?;
    value
        .split_whitespace()
        .map(|token| {
            token.parse().map_err(|_| RtxError::MalformedHeaderValue {
                key: "Flags".to_string(),
                value: value.to_string(),
                expected: "whitespace-separated integers".to_string(),
            })
        })
        .collect()
}

fn date_field(raw: &RawHeaderMap) -> Result<NaiveDateTime> {
    let value = require(raw, "Date")?;
    parse_header_date(value).ok_or_else(|| RtxError::MalformedHeaderValue {
        key: "Date".to_string(),
        value: value.to_string(),
        expected: "a `DD/MM/YYYY hh:mm:ss` timestamp".to_string(),
    })
}

mod rtx_date {
    use super::parse_header_date;
    use crate::format::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_header_date(&text).ok_or_else(|| serde::de::Error::custom("invalid RTX date"))
    }
}
