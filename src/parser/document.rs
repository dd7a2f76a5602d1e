//! Scanning HDUs for the first binary table and assembling the decoded document.
use crate::{
    error::{Error, Result},
    fits::pad_to_block,
    parser::{bintable::read_table, columns::resolve_columns, stream_parser::read_header_unit},
    types::{BinTable, DecodeWarning, Extension, FitsDocument, HeaderUnit, Keyword},
};
use tracing::{debug, info, warn};

/// Default cap on the number of extension HDUs inspected
pub const DEFAULT_MAX_EXTENSIONS: usize = 10;

/// FITS allows at most 999 axes
const MAX_NAXIS: i64 = 999;

/// How column offsets within a row are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnLayout {
    /// Every field takes its real on-disk width, decodable or not
    #[default]
    OnDisk,
    /// Only decodable scalar fields take space; undecodable ones are treated as absent
    SupportedOnly,
}

/// Configuration for the decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Extension HDUs inspected before giving up on finding a table
    pub max_extensions: usize,
    /// Column offset strategy
    pub column_layout: ColumnLayout,
    /// Upper bound on decoded rows (None = every row present in the buffer)
    pub max_rows: Option<u32>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_extensions: DEFAULT_MAX_EXTENSIONS,
            column_layout: ColumnLayout::default(),
            max_rows: None,
        }
    }
}

impl DecoderConfig {
    /// Creates a new decoder config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the extension scan budget
    pub fn max_extensions(mut self, max: usize) -> Self {
        self.max_extensions = max;
        self
    }

    /// Sets the column offset strategy
    pub fn column_layout(mut self, layout: ColumnLayout) -> Self {
        self.column_layout = layout;
        self
    }

    /// Caps the number of decoded rows
    pub fn max_rows(mut self, max: Option<u32>) -> Self {
        self.max_rows = max;
        self
    }
}

/// Decodes FITS buffers into [`FitsDocument`]s.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

/// Decode `buffer` with the default configuration.
pub fn decode(buffer: &[u8]) -> Result<FitsDocument> {
    Decoder::default().decode(buffer)
}

impl Decoder {
    /// Creates a decoder with the given config
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode the primary header and the first binary table extension of `buffer`.
    ///
    /// Fails only when no `BINTABLE` extension is found within the scan budget.
    pub fn decode(&self, buffer: &[u8]) -> Result<FitsDocument> {
        let mut warnings = Vec::new();

        let primary = read_header_unit(buffer, 0);
        note_unterminated(&primary, &mut warnings);
        let mut offset = primary.padded_len();
        debug!(cards = primary.len(), next = offset, "read primary header");

        let mut hdus_scanned = 0;
        for _ in 0..self.config.max_extensions {
            if offset >= buffer.len() {
                break;
            }
            let header = read_header_unit(buffer, offset);
            hdus_scanned += 1;
            if header.padded_len() == 0 {
                // not even one whole card left
                break;
            }
            let data_start = offset.saturating_add(header.padded_len());

            match header.extension() {
                Some(Extension::BinTable) => {
                    note_unterminated(&header, &mut warnings);
                    info!(offset, data_start, "found BINTABLE extension");
                    return Ok(self.read_bintable(buffer, primary, header, data_start, warnings));
                }
                kind => {
                    let data_len = data_unit_len(&header);
                    debug!(offset, ?kind, data_len, "skipping extension");
                    offset = data_start.saturating_add(data_len);
                }
            }
        }

        warn!(hdus_scanned, offset, "no BINTABLE extension found");
        Err(Error::NoBinaryTable {
            hdus_scanned,
            offset,
        })
    }

    fn read_bintable(
        &self,
        buffer: &[u8],
        primary: HeaderUnit,
        header: HeaderUnit,
        data_start: usize,
        mut warnings: Vec<DecodeWarning>,
    ) -> FitsDocument {
        let geometry = BinTable::from_header(&header);
        let resolution = resolve_columns(&header, geometry.fields, self.config.column_layout);
        warnings.extend(resolution.warnings);

        if geometry.row_stride < resolution.row_width {
            warn!(
                declared = geometry.row_stride,
                computed = resolution.row_width,
                "NAXIS1 is narrower than the columns"
            );
            warnings.push(DecodeWarning::RowWidthMismatch {
                declared: geometry.row_stride,
                computed: resolution.row_width,
            });
        }

        let data = buffer.get(data_start..).unwrap_or_default();
        if data.len() < geometry.data_len() {
            warn!(
                declared = geometry.data_len(),
                available = data.len(),
                "table data is truncated"
            );
            warnings.push(DecodeWarning::DataTruncated {
                declared: geometry.data_len(),
                available: data.len(),
            });
        }

        // Never allocate for rows that start past the end of the buffer.
        let readable = geometry.rows_within(data.len());
        let rows = self
            .config
            .max_rows
            .map_or(readable, |max| max.min(readable));
        if rows < geometry.row_count {
            warnings.push(DecodeWarning::RowsTruncated {
                declared: geometry.row_count,
                decoded: rows,
            });
        }

        let table = read_table(data, geometry.row_stride, rows, &resolution.columns);
        debug!(rows, columns = table.len(), "decoded table");
        FitsDocument::new(primary, header, table, rows, warnings)
    }
}

fn note_unterminated(header: &HeaderUnit, warnings: &mut Vec<DecodeWarning>) {
    if !header.is_terminated() {
        warnings.push(DecodeWarning::MissingEnd {
            offset: header.offset(),
        });
    }
}

/// Padded size of the data section that follows `header`.
///
/// Pixel data is `|BITPIX| / 8 * NAXIS1 * ... * NAXISn` bytes, plus
/// `PCOUNT * GCOUNT` for heap or group parameters. Negative sizes count as zero.
fn data_unit_len(header: &HeaderUnit) -> usize {
    let non_negative =
        |keyword: Keyword, default: i64| header.integer_or(&keyword, default).max(0) as u64;

    let naxis = header.integer_or(&Keyword::NAXIS, 0).clamp(0, MAX_NAXIS) as u16;
    let mut size = 0u64;
    if naxis > 0 {
        let pixels = (1..=naxis).fold(1u64, |acc, n| {
            acc.saturating_mul(non_negative(Keyword::NAXISn(n), 0))
        });
        let bitpix = header.integer_or(&Keyword::BITPIX, 0).unsigned_abs();
        size = pixels.saturating_mul(bitpix) / 8;
    }
    size = size.saturating_add(
        non_negative(Keyword::PCOUNT, 0).saturating_mul(non_negative(Keyword::GCOUNT, 1)),
    );
    pad_to_block(usize::try_from(size).unwrap_or(usize::MAX))
}
