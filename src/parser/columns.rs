//! Column layout of a binary table row.
use crate::{
    parser::{
        type_forms::{bin_tform, type_code},
        ColumnLayout,
    },
    types::{ColumnDescriptor, DecodeWarning, ElementKind, HeaderUnit, Keyword, Value},
};
use tracing::{debug, warn};

/// Decodable columns plus the columns that were left out.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct ColumnResolution {
    pub(crate) columns: Vec<ColumnDescriptor>,
    pub(crate) row_width: usize,
    pub(crate) warnings: Vec<DecodeWarning>,
}

struct FieldDefinition {
    index: u16,
    name: String,
    format: String,
    unit: String,
}

fn string_or(header: &HeaderUnit, keyword: Keyword, default: impl FnOnce() -> String) -> String {
    match header.value_of(&keyword) {
        Ok(Value::CharacterString(s)) if !s.is_empty() => s.clone(),
        _ => default(),
    }
}

fn field_definitions(
    header: &HeaderUnit,
    fields: u16,
) -> impl Iterator<Item = FieldDefinition> + '_ {
    (1..=fields).map(move |index| FieldDefinition {
        index,
        name: string_or(header, Keyword::TTYPEn(index), || format!("COL{}", index)),
        format: string_or(header, Keyword::TFORMn(index), String::new),
        unit: string_or(header, Keyword::TUNITn(index), String::new),
    })
}

impl FieldDefinition {
    fn into_descriptor(self, byte_offset: usize, kind: ElementKind) -> ColumnDescriptor {
        ColumnDescriptor {
            name: self.name,
            format: self.format,
            unit: self.unit,
            byte_offset: u32::try_from(byte_offset).unwrap_or(u32::MAX),
            kind,
        }
    }

    fn dropped(self) -> DecodeWarning {
        warn!(index = self.index, name = %self.name, format = %self.format, "dropping column");
        DecodeWarning::UnsupportedColumn {
            index: self.index,
            name: self.name,
            format: self.format,
        }
    }
}

/// Build the descriptors for `TFORM1..=TFORMfields` of a table header.
pub(crate) fn resolve_columns(
    header: &HeaderUnit,
    fields: u16,
    layout: ColumnLayout,
) -> ColumnResolution {
    let resolution = match layout {
        ColumnLayout::OnDisk => on_disk_layout(header, fields),
        ColumnLayout::SupportedOnly => supported_only_layout(header, fields),
    };
    debug!(
        ?layout,
        fields,
        decoded = resolution.columns.len(),
        row_width = resolution.row_width,
        "resolved columns"
    );
    resolution
}

/// Every field advances the offset by its real width, so columns after an
/// unsupported one still line up.
fn on_disk_layout(header: &HeaderUnit, fields: u16) -> ColumnResolution {
    let mut resolution = ColumnResolution::default();
    let mut offset = 0usize;
    let mut width_known = true;

    for field in field_definitions(header, fields) {
        if !width_known {
            resolution.warnings.push(field.dropped());
            continue;
        }
        let form = match bin_tform(&field.format) {
            Ok((_, form)) => form,
            Err(_) => {
                // Offsets of this field and the ones after it can't be trusted.
                width_known = false;
                resolution.warnings.push(field.dropped());
                continue;
            }
        };
        let kind = ElementKind::from(form);
        if kind == ElementKind::Unsupported {
            resolution.warnings.push(field.dropped());
        } else {
            resolution.columns.push(field.into_descriptor(offset, kind));
        }
        offset = offset.saturating_add(form.width());
    }
    resolution.row_width = offset;
    resolution
}

/// Only decodable fields take up space in the row.
///
/// Correct only when unsupported fields trail the supported ones.
fn supported_only_layout(header: &HeaderUnit, fields: u16) -> ColumnResolution {
    let mut resolution = ColumnResolution::default();
    let mut offset = 0usize;

    for field in field_definitions(header, fields) {
        let kind = ElementKind::from_type_code(&type_code(&field.format));
        if kind == ElementKind::Unsupported {
            resolution.warnings.push(field.dropped());
            continue;
        }
        let width = kind.width() as usize;
        resolution.columns.push(field.into_descriptor(offset, kind));
        offset += width;
    }
    resolution.row_width = offset;
    resolution
}
