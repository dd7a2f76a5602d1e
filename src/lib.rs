#![warn(missing_docs)]
//! A decoder for the FITS files published by space-telescope photometry archives.
//!
//! The *Flexible Image Transport System* ([FITS](https://en.wikipedia.org/wiki/FITS)) is
//! > an open standard defining a digital file format useful for storage,
//! > transmission and processing of scientific and other images.
//!
//! Kepler and TESS light curves ship as a primary header followed by a `BINTABLE`
//! extension whose columns hold the time series. [`decode`] scans the header-data
//! units of a byte buffer, finds the first binary table and returns every header
//! card together with every scalar numeric column, row aligned.
//!
//! ```no_run
//! let buffer = std::fs::read("kplr011446443-2009131110544_slc.fits")?;
//! let document = fits_lightcurve::decode(&buffer)?;
//! for name in document.column_names() {
//!     println!("{name}: {} rows", document.row_count());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod parser;
pub mod types;

pub use error::{Error, Result};
pub use parser::{decode, ColumnLayout, Decoder, DecoderConfig};
pub use types::{
    ColumnDescriptor, DataPoint, DecodeWarning, ElementKind, FitsDocument, HeaderCard,
    HeaderUnit, Keyword, LightCurve, LightCurveColumns, Observation, Table, TableColumn, Value,
};

mod fits {
    /// All Keyword/Value/Comment lines are this fixed length
    pub(crate) const KEYWORD_LINE_LENGTH: usize = 80;

    /// All segments are in mulitples of this many bytes
    pub(crate) const FITS_BLOCK_SIZE: usize = 36 * KEYWORD_LINE_LENGTH; // 2880

    /// Round `len` up to the next multiple of the block size.
    pub(crate) fn pad_to_block(len: usize) -> usize {
        len.saturating_add((FITS_BLOCK_SIZE - len % FITS_BLOCK_SIZE) % FITS_BLOCK_SIZE)
    }

}
