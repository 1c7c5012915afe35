// src/header/tokenizer.rs
use crate::error::{Result, RtxError};
use crate::format::{DATA_TAG, KEY_SEP, LINE_END, SECTION_SEP};
use std::collections::HashMap;

/// Raw string key/value pairs lifted from the header section.
///
/// Keys are unique: the first occurrence wins and later repeats are ignored.
/// The map is transient; it exists only to be consumed by
/// [`RecordingHeader::from_raw`](crate::header::RecordingHeader::from_raw).
#[derive(Debug, Default)]
pub struct RawHeaderMap {
    entries: HashMap<String, String>,
}

impl RawHeaderMap {
    pub fn new() -> Self {
        RawHeaderMap {
            entries: HashMap::new(),
        }
    }

    /// Insert a pair unless the key is already present.
    pub fn insert_first(&mut self, key: String, value: String) {
        self.entries.entry(key).or_insert(value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan the header region of `buffer` starting at `start` (just past the
/// `HEADER::\r\n` preamble) and collect its `Key: Value` pairs.
///
/// The scan is a single forward pass with no backtracking. At each position
/// the token rules apply in priority order:
///
/// 1. `::` — section separator; resets the token start and is otherwise
///    ignored,
/// 2. `: ` — ends a key (trimmed UTF-8 of the bytes since the token start),
/// 3. `\r\n` — ends a value and binds it to the pending key (first
///    occurrence wins; a value with no pending key is dropped),
/// 4. `Data:\r\n` — terminates the header; the offset just past it is where
///    sample data begins.
///
/// If the buffer runs out before the terminator appears the header did not
/// fit in one chunk and the scan fails with
/// [`HeaderTooLarge`](crate::RtxError::HeaderTooLarge); the caller should
/// retry the whole read with a larger chunk size.
///
/// # Example
///
/// ```
/// use rtx_rs::header::tokenize_header;
///
/// let buffer = b"Owner: ACME\r\n::Machine: M7\r\nData:\r\n";
/// let (map, data_start) = tokenize_header(buffer, 0).unwrap();
///
/// assert_eq!(map.get("Owner"), Some("ACME"));
/// assert_eq!(map.get("Machine"), Some("M7"));
/// assert_eq!(data_start, buffer.len());
/// ```
pub fn tokenize_header(buffer: &[u8], start: usize) -> Result<(RawHeaderMap, usize)> {
    let mut map = RawHeaderMap::new();
    let mut pos = start;
    let mut token_start = start;
    let mut pending_key: Option<String> = None;

    while pos < buffer.len() {
        if buffer[pos..].starts_with(SECTION_SEP) {
            pos += SECTION_SEP.len();
            token_start = pos;
            continue;
        }

        if buffer[pos..].starts_with(KEY_SEP) {
            pending_key = Some(decode_trimmed(&buffer[token_start..pos])?);
            pos += KEY_SEP.len();
            token_start = pos;
            continue;
        }

        if buffer[pos..].starts_with(LINE_END) {
            if let Some(key) = pending_key.take() {
                let value = decode_trimmed(&buffer[token_start..pos])?;
                map.insert_first(key, value);
            }
            pos += LINE_END.len();
            token_start = pos;
            continue;
        }

        if buffer[pos..].starts_with(DATA_TAG) {
            return Ok((map, pos + DATA_TAG.len()));
        }

        pos += 1;
    }

    Err(RtxError::HeaderTooLarge {
        chunk_size: buffer.len(),
    })
}

fn decode_trimmed(bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes).map_err(|_| RtxError::InvalidUtf8)?;
    Ok(text.trim().to_string())
}
