// src/header/mod.rs
mod record;
mod tokenizer;

pub use record::{parse_header_date, RecordingHeader, REQUIRED_KEYS};
pub use tokenizer::{tokenize_header, RawHeaderMap};
