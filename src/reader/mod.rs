// src/reader/mod.rs
mod chunked;

pub use chunked::{ParseCursor, ReadSeek, RtxReader};
