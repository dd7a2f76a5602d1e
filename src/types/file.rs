use super::{ColumnDescriptor, HeaderUnit, Keyword, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt::{self, Display, Formatter};

/// A decoded column: its layout plus one cell per row, `None` where the value is missing.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TableColumn {
    /// Where and how the column was read
    pub descriptor: ColumnDescriptor,
    /// Cells in row order
    pub cells: Vec<Option<f64>>,
}

impl TableColumn {
    /// Column name
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

/// Columns of a binary table, in declaration order, all of the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<TableColumn>,
}

impl Table {
    pub(crate) fn new(columns: Vec<TableColumn>) -> Table {
        Table { columns }
    }

    /// Cells of the first column with this name.
    pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
        self.column(name).map(|c| c.cells.as_slice())
    }

    /// First column with this name.
    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when no column was decodable
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in &self.columns {
            map.serialize_entry(column.name(), &column.cells)?;
        }
        map.end()
    }
}

/// Conditions the decoder recovered from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeWarning {
    /// The buffer ended before the header unit at `offset` reached its `END` card
    MissingEnd {
        /// Offset of the header unit
        offset: usize,
    },
    /// A column was left out of the table
    UnsupportedColumn {
        /// 1-based field index
        index: u16,
        /// Column name
        name: String,
        /// Raw `TFORMn`
        format: String,
    },
    /// `NAXIS1` is smaller than the resolved column widths
    RowWidthMismatch {
        /// `NAXIS1`
        declared: usize,
        /// Sum of resolved column widths
        computed: usize,
    },
    /// The buffer holds less table data than `NAXIS1 * NAXIS2 + PCOUNT * GCOUNT`
    DataTruncated {
        /// Declared size of the data unit
        declared: usize,
        /// Bytes present after the table header
        available: usize,
    },
    /// Fewer rows were decoded than `NAXIS2` declares
    RowsTruncated {
        /// `NAXIS2`
        declared: u32,
        /// Rows in the table
        decoded: u32,
    },
}

impl Display for DecodeWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DecodeWarning::MissingEnd { offset } => {
                write!(f, "header at byte {} has no END card", offset)
            }
            DecodeWarning::UnsupportedColumn {
                index,
                name,
                format,
            } => write!(f, "column {} ({}) has unsupported format {:?}", index, name, format),
            DecodeWarning::RowWidthMismatch { declared, computed } => write!(
                f,
                "NAXIS1 = {} but columns need {} bytes per row",
                declared, computed
            ),
            DecodeWarning::DataTruncated {
                declared,
                available,
            } => write!(
                f,
                "table data needs {} bytes but only {} are present",
                declared, available
            ),
            DecodeWarning::RowsTruncated { declared, decoded } => {
                write!(f, "decoded {} of {} rows", decoded, declared)
            }
        }
    }
}

/// Headline metadata of an observation.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct Observation {
    /// `OBJECT`
    pub object: Option<Value>,
    /// `TELESCOP`
    pub telescope: Option<Value>,
    /// `INSTRUME`
    pub instrument: Option<Value>,
    /// `DATE-OBS`
    pub date_obs: Option<Value>,
    /// `EXPOSURE`
    pub exposure: Option<Value>,
    /// `CREATOR`
    pub creator: Option<Value>,
}

/// Everything decoded from a FITS buffer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FitsDocument {
    primary_header: HeaderUnit,
    extension_header: HeaderUnit,
    table: Table,
    column_names: Vec<String>,
    row_count: u32,
    warnings: Vec<DecodeWarning>,
}

impl FitsDocument {
    pub(crate) fn new(
        primary_header: HeaderUnit,
        extension_header: HeaderUnit,
        table: Table,
        row_count: u32,
        warnings: Vec<DecodeWarning>,
    ) -> FitsDocument {
        let column_names = table.columns().iter().map(|c| c.name().to_string()).collect();
        FitsDocument {
            primary_header,
            extension_header,
            table,
            column_names,
            row_count,
            warnings,
        }
    }

    /// Cards of the primary HDU
    pub fn primary_header(&self) -> &HeaderUnit {
        &self.primary_header
    }

    /// Cards of the binary table extension
    pub fn extension_header(&self) -> &HeaderUnit {
        &self.extension_header
    }

    /// Decoded columns
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Names of the decoded columns, in declaration order
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Rows in every column
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Conditions recovered from while decoding
    pub fn warnings(&self) -> &[DecodeWarning] {
        &self.warnings
    }

    /// Look a keyword up in the primary header, then in the extension header.
    pub fn lookup(&self, keyword: &Keyword) -> Option<&Value> {
        self.primary_header
            .value_of(keyword)
            .or_else(|_| self.extension_header.value_of(keyword))
            .ok()
    }

    /// Target, instrument and timing metadata.
    pub fn observation(&self) -> Observation {
        let find = |keyword: Keyword| self.lookup(&keyword).cloned();
        Observation {
            object: find(Keyword::OBJECT),
            telescope: find(Keyword::TELESCOP),
            instrument: find(Keyword::INSTRUME),
            date_obs: find(Keyword::DATE_OBS),
            exposure: find(Keyword::EXPOSURE),
            creator: find(Keyword::CREATOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementKind, HeaderCard};
    use pretty_assertions::assert_eq;

    fn column(name: &str, cells: Vec<Option<f64>>) -> TableColumn {
        TableColumn {
            descriptor: ColumnDescriptor {
                name: name.to_string(),
                format: "1D".to_string(),
                unit: String::new(),
                byte_offset: 0,
                kind: ElementKind::Float64,
            },
            cells,
        }
    }

    #[test]
    fn table_lookup_takes_first_duplicate() {
        let table = Table::new(vec![
            column("TIME", vec![Some(1.0)]),
            column("TIME", vec![Some(2.0)]),
        ]);
        assert_eq!(table.get("TIME"), Some(&[Some(1.0)][..]));
        assert_eq!(table.get("FLUX"), None);
    }

    #[test]
    fn table_serializes_as_name_to_cells() {
        let table = Table::new(vec![column("FLUX", vec![Some(1.5), None])]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"FLUX":[1.5,null]}"#);
    }

    #[test]
    fn observation_prefers_primary_header() {
        let primary = HeaderUnit::new(
            vec![HeaderCard::new("OBJECT", Value::CharacterString("KIC 1".into()), "")],
            0,
            2880,
            true,
        );
        let extension = HeaderUnit::new(
            vec![
                HeaderCard::new("OBJECT", Value::CharacterString("KIC 2".into()), ""),
                HeaderCard::new("EXPOSURE", Value::Number(30.5), ""),
            ],
            2880,
            2880,
            true,
        );
        let doc = FitsDocument::new(primary, extension, Table::default(), 0, vec![]);
        let observation = doc.observation();
        assert_eq!(observation.object, Some(Value::CharacterString("KIC 1".into())));
        assert_eq!(observation.exposure, Some(Value::Number(30.5)));
        assert_eq!(observation.telescope, None);
    }

    #[test]
    fn lookup_accepts_parsed_keyword_names() {
        let extension = HeaderUnit::new(
            vec![
                HeaderCard::new("DATE-OBS", Value::CharacterString("2009-05-02".into()), ""),
                HeaderCard::new("TUNIT2", Value::CharacterString("e-/s".into()), ""),
            ],
            2880,
            2880,
            true,
        );
        let primary = HeaderUnit::default();
        let doc = FitsDocument::new(primary, extension, Table::default(), 0, vec![]);
        for (name, expected) in [("DATE-OBS", "2009-05-02"), ("TUNIT2", "e-/s")] {
            let keyword: Keyword = name.parse().unwrap();
            assert_eq!(
                doc.lookup(&keyword),
                Some(&Value::CharacterString(expected.into())),
                "{}",
                name
            );
        }
        assert_eq!(doc.lookup(&"KEPLERID".parse().unwrap()), None);
    }
}
