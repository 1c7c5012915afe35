// src/format.rs
//! Fixed byte layout of the RTX container.
//!
//! An RTX recording is a single file laid out as
//!
//! ```text
//! HEADER::\r\n
//! Key: Value\r\n        (one line per header field, `::` allowed as an
//! ...                    inert section separator in the key region)
//! Data:\r\n
//! <samples>             (dense run of little-endian 8-byte floats)
//! EOF::\r\n
//! ```
//!
//! The literals below are the only framing the format has; there are no
//! length fields and no checksums. Decoding therefore walks the stream
//! front to back in fixed-size chunks (see [`crate::reader::RtxReader`]).

use crate::error::{Result, RtxError};

/// Preamble opening the header section.
pub const HEADER_TAG: &[u8; 10] = b"HEADER::\r\n";

/// Literal terminating the header section; sample data starts just past it.
pub const DATA_TAG: &[u8; 7] = b"Data:\r\n";

/// Literal terminating the sample data at the very end of the file.
pub const EOF_TAG: &[u8; 7] = b"EOF::\r\n";

/// Inert section separator inside the header key region.
pub const SECTION_SEP: &[u8; 2] = b"::";

/// Separator between a key and its value.
pub const KEY_SEP: &[u8; 2] = b": ";

/// Line terminator used throughout the header section.
pub const LINE_END: &[u8; 2] = b"\r\n";

/// Width of one sample in the data section.
pub const SAMPLE_SIZE: usize = 8;

/// Default chunk size for streaming reads. Must comfortably exceed the
/// header size of real recordings; the original tooling used the same value.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Timestamp format of the `Date` header field.
///
/// The hour field is 12-hour (`%I`) with no AM/PM indicator anywhere in the
/// header, so hours are taken literally: `01`-`12` parse to 1-12 and there
/// is no way to express an afternoon time. This matches the instrument's
/// observed output; see [`crate::header::parse_header_date`].
pub const DATE_FORMAT: &str = "%d/%m/%Y %I:%M:%S";

/// File extension expected of RTX recordings.
pub const RTX_EXTENSION: &str = "rtx";

/// Check a chunk size against the decoder's alignment precondition.
///
/// Chunk sizes must be positive multiples of [`SAMPLE_SIZE`]. This keeps
/// every non-final chunk a whole number of samples and guarantees the EOF
/// marker never straddles two reads (any final partial read is then
/// `7 mod 8` bytes long, i.e. samples plus the full marker).
pub fn validate_chunk_size(chunk_size: usize) -> Result<()> {
    if chunk_size == 0 || chunk_size % SAMPLE_SIZE != 0 {
        return Err(RtxError::InvalidChunkSize(chunk_size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_lengths() {
        assert_eq!(HEADER_TAG.len(), 10);
        assert_eq!(DATA_TAG.len(), 7);
        assert_eq!(EOF_TAG.len(), 7);
    }

    #[test]
    fn test_chunk_size_validation() {
        assert!(validate_chunk_size(8).is_ok());
        assert!(validate_chunk_size(DEFAULT_CHUNK_SIZE).is_ok());

        assert!(matches!(
            validate_chunk_size(0),
            Err(RtxError::InvalidChunkSize(0))
        ));
        assert!(matches!(
            validate_chunk_size(100),
            Err(RtxError::InvalidChunkSize(100))
        ));
    }
}
