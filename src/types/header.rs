use super::{Extension, Keyword};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// The value a header card carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A quoted string, quotes removed, or an unquoted literal that is not a number
    CharacterString(String),
    /// Any integer or real literal
    Number(f64),
    /// `T` or `F`
    Logical(bool),
    /// No value indicator, or an empty value field
    Undefined,
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::CharacterString(s) => write!(f, "'{}'", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Logical(true) => write!(f, "T"),
            Value::Logical(false) => write!(f, "F"),
            Value::Undefined => Ok(()),
        }
    }
}

/// One decoded 80-byte card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCard {
    /// Keyword field, surrounding whitespace removed
    pub key: String,
    /// Parsed value
    pub value: Value,
    /// Comment text after the `/`, or empty
    pub comment: String,
}

impl HeaderCard {
    /// Create a card
    pub fn new(key: impl Into<String>, value: Value, comment: impl Into<String>) -> HeaderCard {
        HeaderCard {
            key: key.into(),
            value,
            comment: comment.into(),
        }
    }
}

impl Display for HeaderCard {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:<8}", self.key)?;
        if self.value != Value::Undefined {
            write!(f, "= {}", self.value)?;
        }
        if !self.comment.is_empty() {
            write!(f, " / {}", self.comment)?;
        }
        Ok(())
    }
}

/// What a single 80-byte card decodes to.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderRecord {
    /// A keyword card, with or without a value
    Card(HeaderCard),
    /// The `END` card closing a header unit
    EndRecord,
    /// A card with a blank keyword field
    BlankRecord,
}

/// Reasons a typed header lookup can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRetrievalError {
    /// No card carries the keyword
    KeywordNotPresent,
    /// The value is not a character string
    NotAString,
    /// The value is not numeric
    NotANumber,
    /// The value is numeric but not a finite integer
    NotAnInteger,
    /// The value is not `T` or `F`
    NotALogical,
}

/// The ordered cards of one header, plus where it sat in the buffer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HeaderUnit {
    cards: Vec<HeaderCard>,
    #[serde(skip)]
    offset: usize,
    #[serde(skip)]
    padded_len: usize,
    #[serde(skip)]
    terminated: bool,
}

impl HeaderUnit {
    /// Create a header unit that started at `offset` and spans `padded_len` bytes.
    pub fn new(cards: Vec<HeaderCard>, offset: usize, padded_len: usize, terminated: bool) -> Self {
        HeaderUnit {
            cards,
            offset,
            padded_len,
            terminated,
        }
    }

    /// All cards in file order. `END` and blank cards are not included.
    pub fn cards(&self) -> &[HeaderCard] {
        &self.cards
    }

    /// Byte offset of the first card.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes from the first card to the end of the last block, a multiple of 2880.
    pub fn padded_len(&self) -> usize {
        self.padded_len
    }

    /// Whether an `END` card was found before the buffer ran out.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Number of cards
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// True when no cards were decoded
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// First card with the given keyword.
    pub fn get(&self, keyword: &Keyword) -> Option<&HeaderCard> {
        let key = keyword.to_string();
        self.get_by_name(&key)
    }

    /// First card whose key equals `key`.
    pub fn get_by_name(&self, key: &str) -> Option<&HeaderCard> {
        self.cards.iter().find(|card| card.key == key)
    }

    /// Value of the first card with the keyword.
    pub fn value_of(&self, keyword: &Keyword) -> Result<&Value, ValueRetrievalError> {
        self.get(keyword)
            .map(|card| &card.value)
            .ok_or(ValueRetrievalError::KeywordNotPresent)
    }

    /// String value of the first card with the keyword.
    pub fn str_value_of(&self, keyword: &Keyword) -> Result<&str, ValueRetrievalError> {
        match self.value_of(keyword)? {
            Value::CharacterString(s) => Ok(s),
            _ => Err(ValueRetrievalError::NotAString),
        }
    }

    /// Numeric value of the first card with the keyword.
    pub fn number_value_of(&self, keyword: &Keyword) -> Result<f64, ValueRetrievalError> {
        match self.value_of(keyword)? {
            Value::Number(n) => Ok(*n),
            _ => Err(ValueRetrievalError::NotANumber),
        }
    }

    /// Integer value of the first card with the keyword.
    pub fn integer_value_of(&self, keyword: &Keyword) -> Result<i64, ValueRetrievalError> {
        let n = self.number_value_of(keyword)?;
        if n.is_finite() && n.fract() == 0.0 && n.abs() <= i64::MAX as f64 {
            Ok(n as i64)
        } else {
            Err(ValueRetrievalError::NotAnInteger)
        }
    }

    /// Logical value of the first card with the keyword.
    pub fn logical_value_of(&self, keyword: &Keyword) -> Result<bool, ValueRetrievalError> {
        match self.value_of(keyword)? {
            Value::Logical(b) => Ok(*b),
            _ => Err(ValueRetrievalError::NotALogical),
        }
    }

    /// Integer value of the keyword, or `default` when it is absent or not an integer.
    pub fn integer_or(&self, keyword: &Keyword, default: i64) -> i64 {
        self.integer_value_of(keyword).unwrap_or(default)
    }

    /// The extension kind named by `XTENSION`, if this is an extension header.
    pub fn extension(&self) -> Option<Extension> {
        self.str_value_of(&Keyword::XTENSION)
            .ok()
            .map(Extension::from_xtension)
    }
}

impl Display for HeaderUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            writeln!(f, "{}", card)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> HeaderUnit {
        HeaderUnit::new(
            vec![
                HeaderCard::new("XTENSION", Value::CharacterString("BINTABLE".into()), ""),
                HeaderCard::new("NAXIS1", Value::Number(12.0), "width of table in bytes"),
                HeaderCard::new("EXPOSURE", Value::Number(2.5), ""),
                HeaderCard::new("INHERIT", Value::Logical(true), ""),
                HeaderCard::new("NAXIS1", Value::Number(99.0), "duplicate"),
            ],
            2880,
            2880,
            true,
        )
    }

    #[test]
    fn lookup_returns_first_match() {
        assert_eq!(unit().integer_value_of(&Keyword::NAXISn(1)), Ok(12));
    }

    #[test]
    fn typed_lookups_report_mismatches() {
        let header = unit();
        assert_eq!(
            header.integer_value_of(&Keyword::EXPOSURE),
            Err(ValueRetrievalError::NotAnInteger)
        );
        assert_eq!(
            header.str_value_of(&Keyword::NAXISn(1)),
            Err(ValueRetrievalError::NotAString)
        );
        assert_eq!(
            header.value_of(&Keyword::TFIELDS),
            Err(ValueRetrievalError::KeywordNotPresent)
        );
        assert_eq!(header.logical_value_of(&Keyword::Unrecognized("INHERIT".into())), Ok(true));
        assert_eq!(header.integer_or(&Keyword::GCOUNT, 1), 1);
    }

    #[test]
    fn extension_kind_comes_from_xtension() {
        assert_eq!(unit().extension(), Some(Extension::BinTable));
        assert_eq!(HeaderUnit::default().extension(), None);
    }

    #[test]
    fn card_display_looks_like_a_header_line() {
        let card = HeaderCard::new(
            "OBJECT",
            Value::CharacterString("KIC 11446443".into()),
            "target",
        );
        assert_eq!(card.to_string(), "OBJECT  = 'KIC 11446443' / target");
    }
}
