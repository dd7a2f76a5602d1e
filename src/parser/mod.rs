//! The parser module is responsible for parsing FITS files.
//! This parser was created following the FITS 3.0 standard.
//! Specifically https://www.aanda.org/articles/aa/pdf/2010/16/aa15362-10.pdf
//! using Appendix A.
//!
//! Only the parts needed to reach and read a binary table are implemented:
//! header cards, header units, the HDU scan, column layout and fixed-width rows.
//! Card parsing is lenient in the ways real archive files need: the value
//! indicator is located anywhere before column 10, truncated headers are
//! accepted, and literals that are not valid FITS values are kept as text.
mod bintable;
mod columns;
mod document;
mod header;
pub mod stream_parser;
mod type_forms;
mod util;

pub use document::{decode, ColumnLayout, Decoder, DecoderConfig, DEFAULT_MAX_EXTENSIONS};
pub use stream_parser::read_header_unit;

use crate::types::HeaderRecord;

/// Decode a single 80-byte header card.
pub fn parse_card(input: &[u8]) -> HeaderRecord {
    header::header_record(input)
}
