use crate::types::BinForm;
use crate::types::BinType;
use nom::{
    bytes::complete::{take, take_while, take_while1},
    character::{complete::space0, is_digit},
    combinator::{map_res, opt},
    sequence::{preceded, tuple},
    IResult,
};
use std::str::FromStr;

/// Parse a binary table `TFORMn` value of the form `rTa`.
///
/// `r` is an optional repeat count (default 1), `T` the type letter and `a`
/// free text that only matters for variable-length descriptors.
pub(crate) fn bin_tform(input: &str) -> IResult<&str, BinForm> {
    map_res(
        preceded(
            space0,
            tuple((opt(repeat_count), take(1usize), take_while(is_allowed_ascii_char))),
        ),
        |(a, b, _)| {
            let repeat = a.unwrap_or(1);
            BinType::from_str(b).map(|bintype| BinForm { repeat, bintype })
        },
    )(input)
}

/// The type letter of a `TFORMn`, found by dropping every decimal digit.
pub(crate) fn type_code(tform: &str) -> String {
    tform
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect::<String>()
        .trim()
        .to_string()
}

fn repeat_count(input: &str) -> IResult<&str, u32> {
    map_res(take_while1(is_digit_char), u32::from_str)(input)
}

fn is_digit_char(c: char) -> bool {
    c.is_ascii() && is_digit(c as u8)
}

fn is_allowed_ascii_char(c: char) -> bool {
    // Space - '~'
    (' '..='~').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_binary_tform() {
        let valid_pairs = &[
            ("0A", 0, BinType::A),
            ("12A", 12, BinType::A),
            ("1B", 1, BinType::B),
            ("1E", 1, BinType::E),
            ("D", 1, BinType::D),
            ("1J", 1, BinType::J),
            ("3I", 3, BinType::I),
            ("1PE(100)", 1, BinType::P),
            (" 1D", 1, BinType::D),
            ("99999D", 99999, BinType::D),
            ("70000B", 70000, BinType::B),
        ];
        for (input, repeat, bintype) in valid_pairs {
            let (_, k) = bin_tform(input).unwrap();
            assert_eq!(
                k,
                BinForm {
                    repeat: *repeat,
                    bintype: *bintype,
                },
                "{}",
                input
            );
        }
    }

    #[test]
    fn reject_unknown_or_empty_forms() {
        assert!(bin_tform("").is_err());
        assert!(bin_tform("1Z").is_err());
    }

    #[test]
    fn type_code_strips_digits() {
        assert_eq!(type_code("1D"), "D");
        assert_eq!(type_code("E"), "E");
        assert_eq!(type_code("16A"), "A");
        assert_eq!(type_code("1PE(100)"), "PE()");
        assert_eq!(type_code(""), "");
    }
}
