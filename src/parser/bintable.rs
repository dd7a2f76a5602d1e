//! Decoding the fixed-width rows of a binary table.
use crate::types::{ColumnDescriptor, ElementKind, Table, TableColumn};
use nom::{
    combinator::map,
    number::complete::{be_f32, be_f64, be_i16, be_i32, u8},
    IResult,
};
use tracing::debug;

/// Decode one big-endian cell at the start of `input`.
///
/// Short input and non-finite values both yield `None`.
pub(crate) fn decode_cell(kind: ElementKind, input: &[u8]) -> Option<f64> {
    let decoded: IResult<&[u8], f64> = match kind {
        ElementKind::Float64 => be_f64(input),
        ElementKind::Float32 => map(be_f32, f64::from)(input),
        ElementKind::Int32 => map(be_i32, f64::from)(input),
        ElementKind::Int16 => map(be_i16, f64::from)(input),
        ElementKind::UInt8 => map(u8, f64::from)(input),
        ElementKind::Unsupported => return None,
    };
    decoded.ok().map(|(_, v)| v).filter(|v| v.is_finite())
}

/// Read `rows` rows of `row_stride` bytes from the start of `data`.
///
/// Every column comes back with exactly `rows` cells; cells that fall outside
/// `data` are missing.
pub(crate) fn read_table(
    data: &[u8],
    row_stride: usize,
    rows: u32,
    descriptors: &[ColumnDescriptor],
) -> Table {
    let rows = rows as usize;
    let mut cells: Vec<Vec<Option<f64>>> = descriptors
        .iter()
        .map(|_| Vec::with_capacity(rows.min(data.len())))
        .collect();

    for row in 0..rows {
        let row_start = match row_stride.checked_mul(row) {
            Some(start) if start < data.len() => start,
            _ => {
                debug!(row, available = data.len(), "table data ends early");
                break;
            }
        };
        for (descriptor, column) in descriptors.iter().zip(cells.iter_mut()) {
            let cell = row_start
                .checked_add(descriptor.byte_offset as usize)
                .and_then(|pos| data.get(pos..))
                .and_then(|input| decode_cell(descriptor.kind, input));
            column.push(cell);
        }
    }

    Table::new(
        descriptors
            .iter()
            .cloned()
            .zip(cells)
            .map(|(descriptor, mut cells)| {
                cells.resize(rows, None);
                TableColumn { descriptor, cells }
            })
            .collect(),
    )
}
