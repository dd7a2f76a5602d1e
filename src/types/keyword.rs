use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};
use thiserror::Error;

/// Keywords the decoder looks up by name.
///
/// Everything else found in a header is kept as `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(non_camel_case_types, missing_docs)]
pub enum Keyword {
    BITPIX,
    COMMENT,
    CREATOR,
    DATE_OBS,
    END,
    EXPOSURE,
    EXTEND,
    EXTNAME,
    GCOUNT,
    HISTORY,
    INSTRUME,
    NAXIS,
    NAXISn(u16),
    OBJECT,
    PCOUNT,
    SIMPLE,
    TELESCOP,
    TFIELDS,
    TFORMn(u16),
    THEAP,
    TTYPEn(u16),
    TUNITn(u16),
    XTENSION,
    Unrecognized(String),
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Keyword::DATE_OBS => write!(f, "DATE-OBS"),
            Keyword::NAXISn(n) => write!(f, "NAXIS{}", n),
            Keyword::TFORMn(n) => write!(f, "TFORM{}", n),
            Keyword::TTYPEn(n) => write!(f, "TTYPE{}", n),
            Keyword::TUNITn(n) => write!(f, "TUNIT{}", n),
            Keyword::Unrecognized(k) => write!(f, "{}", k),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// Problems that could occur when parsing a `str` for a Keyword are enumerated here.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKeywordError {
    /// A blank keyword field.
    #[error("keyword is empty")]
    Empty,
    /// More than the 8 characters a keyword field holds.
    #[error("keyword is longer than 8 characters")]
    TooLong,
}

const INDEXED: &[(&str, fn(u16) -> Keyword)] = &[
    ("NAXIS", Keyword::NAXISn),
    ("TFORM", Keyword::TFORMn),
    ("TTYPE", Keyword::TTYPEn),
    ("TUNIT", Keyword::TUNITn),
];

impl FromStr for Keyword {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_end();
        if s.is_empty() {
            return Err(ParseKeywordError::Empty);
        }
        if s.chars().count() > 8 {
            return Err(ParseKeywordError::TooLong);
        }
        Ok(match s {
            "BITPIX" => Keyword::BITPIX,
            "COMMENT" => Keyword::COMMENT,
            "CREATOR" => Keyword::CREATOR,
            "DATE-OBS" => Keyword::DATE_OBS,
            "END" => Keyword::END,
            "EXPOSURE" => Keyword::EXPOSURE,
            "EXTEND" => Keyword::EXTEND,
            "EXTNAME" => Keyword::EXTNAME,
            "GCOUNT" => Keyword::GCOUNT,
            "HISTORY" => Keyword::HISTORY,
            "INSTRUME" => Keyword::INSTRUME,
            "NAXIS" => Keyword::NAXIS,
            "OBJECT" => Keyword::OBJECT,
            "PCOUNT" => Keyword::PCOUNT,
            "SIMPLE" => Keyword::SIMPLE,
            "TELESCOP" => Keyword::TELESCOP,
            "TFIELDS" => Keyword::TFIELDS,
            "THEAP" => Keyword::THEAP,
            "XTENSION" => Keyword::XTENSION,
            input => INDEXED
                .iter()
                .find_map(|&(prefix, constructor)| {
                    input
                        .strip_prefix(prefix)
                        .and_then(|n| n.parse::<u16>().ok())
                        .map(constructor)
                })
                .unwrap_or_else(|| Keyword::Unrecognized(input.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_could_be_constructed_from_str() {
        let data = vec![
            ("BITPIX", Keyword::BITPIX),
            ("DATE-OBS", Keyword::DATE_OBS),
            ("END", Keyword::END),
            ("GCOUNT", Keyword::GCOUNT),
            ("NAXIS", Keyword::NAXIS),
            ("PCOUNT", Keyword::PCOUNT),
            ("TFIELDS", Keyword::TFIELDS),
            ("XTENSION", Keyword::XTENSION),
            ("KEPLERID", Keyword::Unrecognized("KEPLERID".to_string())),
        ];

        for (input, expected) in data {
            assert_eq!(Keyword::from_str(input).unwrap(), expected);
        }
    }

    #[allow(non_snake_case)]
    #[test]
    fn TFORMn_should_round_trip_through_display() {
        for n in 1u16..1000u16 {
            let keyword = Keyword::TFORMn(n);
            let representation = format!("TFORM{}", n);

            assert_eq!(keyword.to_string(), representation);
            assert_eq!(Keyword::from_str(&representation).unwrap(), keyword);
        }
    }

    #[allow(non_snake_case)]
    #[test]
    fn NAXISn_should_be_parsed_from_str() {
        assert_eq!(Keyword::from_str("NAXIS2").unwrap(), Keyword::NAXISn(2));
        assert_eq!(Keyword::NAXISn(2).to_string(), "NAXIS2");
    }

    #[test]
    fn indexed_prefix_without_number_is_unrecognized() {
        assert_eq!(
            Keyword::from_str("TFORMAT").unwrap(),
            Keyword::Unrecognized("TFORMAT".to_string())
        );
    }

    #[test]
    fn should_also_parse_whitespace_keywords() {
        assert_eq!(Keyword::from_str("SIMPLE  ").unwrap(), Keyword::SIMPLE);
    }

    #[test]
    fn blank_and_oversized_keywords_are_rejected() {
        assert_eq!(Keyword::from_str("   "), Err(ParseKeywordError::Empty));
        assert_eq!(Keyword::from_str("TOOLONGKEY"), Err(ParseKeywordError::TooLong));
        assert_eq!(
            ParseKeywordError::TooLong.to_string(),
            "keyword is longer than 8 characters"
        );
    }
}
