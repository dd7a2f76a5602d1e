/// Map every byte to the code point of the same value.
///
/// Header text is 7-bit ASCII; stray high bytes come through as Latin-1 instead
/// of failing a UTF-8 decode.
pub(crate) fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
