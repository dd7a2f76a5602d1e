//! The types modules describes all the structures produced when decoding FITS files.

mod extension;
mod file;
mod header;
mod keyword;
mod lightcurve;

pub use extension::{
    BinForm, BinTable, BinType, ColumnDescriptor, ElementKind, Extension, ParseFormError,
};
pub use file::{DecodeWarning, FitsDocument, Observation, Table, TableColumn};
pub use header::{HeaderCard, HeaderRecord, HeaderUnit, Value, ValueRetrievalError};
pub use keyword::{Keyword, ParseKeywordError};
pub use lightcurve::{DataPoint, LightCurve, LightCurveColumns};
