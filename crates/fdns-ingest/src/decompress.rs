//! Incremental gzip decompression and line framing
//!
//! Turns the compressed byte stream into a lazy sequence of text lines.
//! Decompression happens chunk by chunk as lines are pulled, so peak memory
//! is bounded by the inflate window plus the current line, not by the size
//! of the dataset (tens of gigabytes decompressed).

use crate::error::IngestError;
use flate2::read::MultiGzDecoder;
use std::io::{self, BufRead, BufReader, Read};

/// Frame the gzip-compressed `reader` into LF-delimited lines.
///
/// Delimiters are stripped, order is preserved, and a line split across
/// compressed-chunk boundaries is reassembled before it is yielded. A
/// non-empty trailing line without a final LF is yielded at end of stream.
/// `MultiGzDecoder` also tolerates datasets published as concatenated gzip
/// members.
pub fn record_lines<R: Read>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    BufReader::new(MultiGzDecoder::new(reader)).lines()
}

/// Classify a stream read failure.
///
/// `flate2` reports malformed compressed data as `InvalidData`; everything
/// else is a transport-level failure of the underlying reader.
pub(crate) fn classify_stream_error(err: io::Error) -> IngestError {
    if err.kind() == io::ErrorKind::InvalidData {
        IngestError::Decompression(err.to_string())
    } else {
        IngestError::Io(err)
    }
}
