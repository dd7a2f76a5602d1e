//! Error types for decoding FITS buffers.
//!
//! Decoding is lenient: unreadable cells become missing values, unsupported
//! columns are dropped and truncated headers are accepted. Those conditions are
//! reported as [`DecodeWarning`](crate::DecodeWarning)s on the document. The only
//! hard failure is a buffer that holds no binary table at all.

use thiserror::Error;

/// Result type alias for decoding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a decode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The HDU scan ended without finding an `XTENSION = 'BINTABLE'` header
    #[error("no BINTABLE extension found in FITS file (scanned {hdus_scanned} extension HDUs, stopped at byte {offset})")]
    NoBinaryTable {
        /// Number of extension headers inspected before giving up
        hdus_scanned: usize,
        /// Byte offset where the scan stopped
        offset: usize,
    },
}
