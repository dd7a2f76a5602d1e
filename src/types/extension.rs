use super::HeaderUnit;
use super::Keyword;
use serde::Serialize;
use std::str::FromStr;

/// Common extensions found in FITS
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extension {
    /// Multi-dimensional array similar to the FITS primary header & data unit
    Image,
    /// Contains rows & columns of data expressed in ASCII
    Table,
    /// Flexible and efficient storing of data structures in binary representation
    /// Each entry is allowed to be a single dimensioned array
    BinTable,
    /// Any other `XTENSION` value
    Other(String),
}

impl Extension {
    /// Classify an `XTENSION` value
    pub fn from_xtension(value: &str) -> Extension {
        match value {
            "IMAGE" => Extension::Image,
            "TABLE" => Extension::Table,
            "BINTABLE" => Extension::BinTable,
            other => Extension::Other(other.to_string()),
        }
    }
}

/// Geometry of a binary table, read leniently from its header.
///
/// Absent keywords fall back to `0`, except `GCOUNT` which defaults to `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinTable {
    /// NAXIS1, bytes per row
    pub row_stride: usize,
    /// NAXIS2
    pub row_count: u32,
    /// TFIELDS
    pub fields: u16,
    /// PCOUNT is number of bytes that follow the table
    pub heap_size: usize,
    /// GCOUNT
    pub group_count: usize,
}

/// FITS allows at most 999 fields per table
pub(crate) const MAX_TFIELDS: u16 = 999;

fn non_negative(header: &HeaderUnit, keyword: Keyword, default: i64) -> u64 {
    header.integer_or(&keyword, default).max(0) as u64
}

impl BinTable {
    /// Read the table geometry from an extension header
    pub fn from_header(header: &HeaderUnit) -> BinTable {
        let fields = non_negative(header, Keyword::TFIELDS, 0).min(u64::from(MAX_TFIELDS)) as u16;
        BinTable {
            row_stride: usize::try_from(non_negative(header, Keyword::NAXISn(1), 0))
                .unwrap_or(usize::MAX),
            row_count: u32::try_from(non_negative(header, Keyword::NAXISn(2), 0))
                .unwrap_or(u32::MAX),
            fields,
            heap_size: usize::try_from(non_negative(header, Keyword::PCOUNT, 0))
                .unwrap_or(usize::MAX),
            group_count: usize::try_from(non_negative(header, Keyword::GCOUNT, 1))
                .unwrap_or(usize::MAX),
        }
    }

    /// Bytes the header declares for the data unit: the rows plus the heap.
    pub fn data_len(&self) -> usize {
        self.row_stride
            .saturating_mul(self.row_count as usize)
            .saturating_add(self.heap_size.saturating_mul(self.group_count))
    }

    /// Rows that start inside `available` bytes of table data.
    ///
    /// A zero-width row can only be read once.
    pub fn rows_within(&self, available: usize) -> u32 {
        let rows = match self.row_stride {
            0 => 1,
            stride => available / stride + usize::from(available % stride != 0),
        };
        u32::try_from(rows).unwrap_or(u32::MAX).min(self.row_count)
    }
}

// rTa
// r: repeat count, non-neg int specifiying the number of elements (default=1)
// T: data type letter code (for (P | Q), r must be 0,1)
// a: optional?
// b: number of bytes for a type T
// total bytes in a row: sum([r * b for r,b in tfields])

/// A parsed `TFORMn` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinForm {
    /// Elements per cell
    pub repeat: u32,
    /// Element type
    pub bintype: BinType,
}

impl BinForm {
    /// Bytes this field occupies in every row
    pub fn width(&self) -> usize {
        let repeat = usize::try_from(self.repeat).unwrap_or(usize::MAX);
        match self.bintype {
            BinType::X => repeat / 8 + usize::from(repeat % 8 != 0),
            other => repeat.saturating_mul(usize::from(other.size())),
        }
    }
}

/// Returned when a type letter is not one of the binary table codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFormError {
    /// Unknown type letter
    InvalidBinType,
}

/// A code indicating the type of a bintable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinType {
    /// Logical
    L,
    /// Bit
    X,
    /// Unsigned byte
    B,
    /// 16-bit integer
    I,
    /// 32-bit integer
    J,
    /// 64-bit integer
    K,
    /// Character
    A,
    /// 32-bit float
    E,
    /// 64-bit float
    D,
    /// 32-bit complex
    C,
    /// 64-bit complex
    M,
    /// Array Descriptor (32-bit)
    P,
    /// Array Descriptor (64-bit)
    Q,
}

impl FromStr for BinType {
    type Err = ParseFormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "L" => BinType::L,
            "X" => BinType::X,
            "B" => BinType::B,
            "I" => BinType::I,
            "J" => BinType::J,
            "K" => BinType::K,
            "A" => BinType::A,
            "E" => BinType::E,
            "D" => BinType::D,
            "C" => BinType::C,
            "M" => BinType::M,
            "P" => BinType::P,
            "Q" => BinType::Q,
            _ => return Err(ParseFormError::InvalidBinType),
        })
    }
}

impl BinType {
    /// Bytes per element. Bits are packed, see [`BinForm::width`].
    pub fn size(self) -> u8 {
        match self {
            BinType::L => 1,
            BinType::X => 1,
            BinType::B => 1,
            BinType::I => 2,
            BinType::J => 4,
            BinType::K => 8,
            BinType::A => 1,
            BinType::E => 4,
            BinType::D => 8,
            BinType::C => 8,
            BinType::M => 16,
            BinType::P => 8,
            BinType::Q => 16,
        }
    }
}

/// Scalar cell encodings the table reader decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElementKind {
    /// `E`, big-endian IEEE single
    #[serde(rename = "FLOAT32")]
    Float32,
    /// `D`, big-endian IEEE double
    #[serde(rename = "FLOAT64")]
    Float64,
    /// `J`
    #[serde(rename = "INT32")]
    Int32,
    /// `I`
    #[serde(rename = "INT16")]
    Int16,
    /// `B`
    #[serde(rename = "UINT8")]
    UInt8,
    /// Anything else
    #[serde(rename = "UNSUPPORTED")]
    Unsupported,
}

impl ElementKind {
    /// Kind for a bare type code such as `"D"`.
    pub fn from_type_code(code: &str) -> ElementKind {
        match code {
            "D" => ElementKind::Float64,
            "E" => ElementKind::Float32,
            "J" => ElementKind::Int32,
            "I" => ElementKind::Int16,
            "B" => ElementKind::UInt8,
            _ => ElementKind::Unsupported,
        }
    }

    /// Bytes per cell, `0` for unsupported kinds.
    pub fn width(self) -> u32 {
        match self {
            ElementKind::Float64 => 8,
            ElementKind::Float32 | ElementKind::Int32 => 4,
            ElementKind::Int16 => 2,
            ElementKind::UInt8 => 1,
            ElementKind::Unsupported => 0,
        }
    }
}

impl From<BinForm> for ElementKind {
    fn from(form: BinForm) -> ElementKind {
        if form.repeat != 1 {
            return ElementKind::Unsupported;
        }
        match form.bintype {
            BinType::D => ElementKind::Float64,
            BinType::E => ElementKind::Float32,
            BinType::J => ElementKind::Int32,
            BinType::I => ElementKind::Int16,
            BinType::B => ElementKind::UInt8,
            _ => ElementKind::Unsupported,
        }
    }
}

/// One decodable column of a binary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    /// `TTYPEn`, or `COLn` when absent
    pub name: String,
    /// Raw `TFORMn`
    pub format: String,
    /// `TUNITn`, or empty
    pub unit: String,
    /// Offset of the cell within a row
    pub byte_offset: u32,
    /// Cell encoding
    pub kind: ElementKind,
}
