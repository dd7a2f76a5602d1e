//! Builds FITS buffers in memory for the integration tests.
#![allow(dead_code)]

pub const BLOCK: usize = 2880;
pub const CARD: usize = 80;

/// Pad `bytes` with `fill` up to the next block boundary.
pub fn pad(bytes: &mut Vec<u8>, fill: u8) {
    let padded = (bytes.len() + BLOCK - 1) / BLOCK * BLOCK;
    bytes.resize(padded, fill);
}

/// One header unit: the given cards, an END card and blank padding.
pub fn header(cards: &[String]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for card in cards.iter().map(String::as_str).chain(["END"]) {
        let mut line = card.as_bytes().to_vec();
        assert!(line.len() <= CARD, "card too long: {}", card);
        line.resize(CARD, b' ');
        bytes.extend(line);
    }
    pad(&mut bytes, b' ');
    bytes
}

pub fn logical(key: &str, value: bool) -> String {
    format!("{:<8}= {:>20}", key, if value { "T" } else { "F" })
}

pub fn int(key: &str, value: i64) -> String {
    format!("{:<8}= {:>20}", key, value)
}

pub fn string(key: &str, value: &str) -> String {
    format!("{:<8}= '{:<8}'", key, value)
}

pub fn primary() -> Vec<u8> {
    header(&[logical("SIMPLE", true), int("BITPIX", 8), int("NAXIS", 0)])
}

/// A BINTABLE header for the given (name, tform) columns.
pub fn bintable_header(row_bytes: usize, rows: usize, columns: &[(&str, &str)]) -> Vec<u8> {
    let mut cards = vec![
        string("XTENSION", "BINTABLE"),
        int("BITPIX", 8),
        int("NAXIS", 2),
        int("NAXIS1", row_bytes as i64),
        int("NAXIS2", rows as i64),
        int("PCOUNT", 0),
        int("GCOUNT", 1),
        int("TFIELDS", columns.len() as i64),
    ];
    for (i, (name, form)) in columns.iter().enumerate() {
        cards.push(string(&format!("TTYPE{}", i + 1), name));
        cards.push(string(&format!("TFORM{}", i + 1), form));
    }
    header(&cards)
}

/// Rows of TIME (1D) and FLUX (1E).
pub fn time_flux_rows(rows: &[(f64, f32)]) -> Vec<u8> {
    let mut data = Vec::new();
    for (time, flux) in rows {
        data.extend_from_slice(&time.to_be_bytes());
        data.extend_from_slice(&flux.to_be_bytes());
    }
    pad(&mut data, 0);
    data
}

/// Primary header, then a TIME/FLUX binary table holding `rows`.
pub fn time_flux_file(rows: &[(f64, f32)]) -> Vec<u8> {
    let mut file = primary();
    file.extend(bintable_header(12, rows.len(), &[("TIME", "1D"), ("FLUX", "1E")]));
    file.extend(time_flux_rows(rows));
    file
}

/// An IMAGE extension with BITPIX=16 and the given axes, data included.
pub fn image_extension(axes: &[usize]) -> Vec<u8> {
    let mut cards = vec![
        string("XTENSION", "IMAGE"),
        int("BITPIX", 16),
        int("NAXIS", axes.len() as i64),
    ];
    for (i, n) in axes.iter().enumerate() {
        cards.push(int(&format!("NAXIS{}", i + 1), *n as i64));
    }
    cards.push(int("PCOUNT", 0));
    cards.push(int("GCOUNT", 1));
    let mut bytes = header(&cards);
    let mut data = vec![0x7Fu8; axes.iter().product::<usize>() * 2];
    pad(&mut data, 0);
    bytes.extend(data);
    bytes
}
