use crate::{
    fits::KEYWORD_LINE_LENGTH,
    parser::util::latin1,
    types::{HeaderCard, HeaderRecord, Value},
};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::{
        complete::{char, none_of, space0},
        is_digit,
    },
    combinator::{all_consuming, map, map_res, not, opt, peek, recognize, value},
    multi::fold_many0,
    sequence::{delimited, preceded, tuple},
    IResult,
};
use std::str::FromStr;

/// Width of the keyword field
const KEYWORD_FIELD_LENGTH: usize = 8;

/// The value indicator must sit before this column to count
const VALUE_INDICATOR_LIMIT: usize = 10;

/// Decode a single 80-byte card.
///
/// Bytes past the first 80 are ignored. Cards without a usable value indicator
/// (commentary cards, `HISTORY`, ...) still produce a card, valued `Undefined`.
pub(crate) fn header_record(input: &[u8]) -> HeaderRecord {
    let line = &input[..input.len().min(KEYWORD_LINE_LENGTH)];
    let key = latin1(&line[..line.len().min(KEYWORD_FIELD_LENGTH)]);
    let key = key.trim();

    if key == "END" {
        return HeaderRecord::EndRecord;
    }
    if key.is_empty() {
        return HeaderRecord::BlankRecord;
    }

    let (value, comment) = match line.iter().position(|&b| b == b'=') {
        Some(idx) if idx < VALUE_INDICATOR_LIMIT => value_field(&line[idx + 1..]),
        _ => (Value::Undefined, String::new()),
    };
    HeaderRecord::Card(HeaderCard::new(key, value, comment))
}

/// Split everything after the `=` into a value and a comment.
fn value_field(field: &[u8]) -> (Value, String) {
    // A quoted string may itself contain '/', so it is consumed before looking for a comment.
    if let Ok((rest, s)) = preceded(space0, character_string)(field) {
        let comment = rest
            .iter()
            .position(|&b| b == b'/')
            .map(|idx| comment_text(&rest[idx + 1..]))
            .unwrap_or_default();
        return (Value::CharacterString(s.trim().to_string()), comment);
    }

    let (literal, comment) = match field.iter().position(|&b| b == b'/') {
        Some(idx) => (&field[..idx], comment_text(&field[idx + 1..])),
        None => (field, String::new()),
    };
    (literal_value(latin1(literal).trim()), comment)
}

fn comment_text(input: &[u8]) -> String {
    latin1(input).trim().to_string()
}

fn literal_value(literal: &str) -> Value {
    match literal {
        "" => Value::Undefined,
        "T" => Value::Logical(true),
        "F" => Value::Logical(false),
        _ => match number(literal.as_bytes()) {
            Ok((_, n)) => Value::Number(n),
            Err(_) => Value::CharacterString(literal.to_string()),
        },
    }
}

fn character_string(input: &[u8]) -> IResult<&[u8], String> {
    // A quote inside a string is written as two successive quotes, e.g. 'O''HARA'.
    delimited(
        char('\''),
        fold_many0(
            alt((value('\'', tag("''")), none_of("'"))),
            String::new,
            |mut s, c| {
                s.push(c);
                s
            },
        ),
        char('\''),
    )(input)
}

fn number(input: &[u8]) -> IResult<&[u8], f64> {
    alt((
        all_consuming(map(integer, |i| i as f64)),
        all_consuming(floating),
    ))(input)
}

// if an integer has a '.' after, we assume its a float and shouldn't parse
fn integer(input: &[u8]) -> IResult<&[u8], i64> {
    map_res(
        map_res(
            recognize(tuple((sign, take_while1(is_digit), peek(not(tag(".")))))),
            std::str::from_utf8,
        ),
        i64::from_str,
    )(input)
}

fn sign(input: &[u8]) -> IResult<&[u8], Option<u8>> {
    opt(map(alt((tag("+"), tag("-"))), |x: &[u8]| x[0]))(input)
}

fn floating(input: &[u8]) -> IResult<&[u8], f64> {
    map_res(
        map_res(
            recognize(tuple((decimal_number, opt(exponent)))),
            std::str::from_utf8,
        ),
        // Rust only knows 'E' exponents; FITS also writes doubles as 1.5D3
        |s: &str| f64::from_str(&s.replace(&['D', 'd'][..], "E")),
    )(input)
}

fn decimal_number(input: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(tuple((
        opt(sign),
        alt((decimal_number_must_integer, decimal_number_must_fractional)),
    )))(input)
}

fn decimal_number_must_integer(input: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(tuple((
        number_part,
        opt(tuple((tag("."), opt(number_part)))),
    )))(input)
}

fn decimal_number_must_fractional(input: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(tuple((opt(number_part), tag("."), number_part)))(input)
}

fn number_part(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(is_digit)(input)
}

fn exponent(input: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(tuple((exponent_letter, opt(sign), number_part)))(input)
}

fn exponent_letter(input: &[u8]) -> IResult<&[u8], &[u8]> {
    alt((tag("E"), tag("D"), tag("e"), tag("d")))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(text: &str) -> Vec<u8> {
        let mut line = text.as_bytes().to_vec();
        line.resize(KEYWORD_LINE_LENGTH, b' ');
        line
    }

    fn decoded(text: &str) -> HeaderCard {
        match header_record(&card(text)) {
            HeaderRecord::Card(c) => c,
            other => panic!("expected a card, got {:?}", other),
        }
    }

    #[test]
    fn keyword_record_should_parse_a_keyword_record() {
        let record = decoded("OBJECT  = 'EPIC 200164267'     / string version of target id");
        assert_eq!(
            record,
            HeaderCard::new(
                "OBJECT",
                Value::CharacterString("EPIC 200164267".into()),
                "string version of target id"
            )
        )
    }

    #[test]
    fn string_values_are_unquoted_and_trimmed() {
        let record = decoded("TELESCOP= 'KEPLER  '           / telescope");
        assert_eq!(record.value, Value::CharacterString("KEPLER".into()));
    }

    #[test]
    fn keyword_record_should_parse_unrecognized_keyword_record() {
        let record = decoded("SCALE_U =     0.00116355283466 / Upper-bound index scale (radians).");
        assert_eq!(
            record,
            HeaderCard::new(
                "SCALE_U",
                Value::Number(0.00116355283466f64),
                "Upper-bound index scale (radians)."
            )
        )
    }

    #[test]
    fn keyword_record_should_parse_a_keyword_record_without_a_comment() {
        let record = decoded("KEPLERID=            200164267");
        assert_eq!(
            record,
            HeaderCard::new("KEPLERID", Value::Number(200164267.0), "")
        )
    }

    #[allow(non_snake_case)]
    #[test]
    fn logical_constant_should_parse_an_uppercase_T_or_F() {
        for (constant, boolean) in &[("T", true), ("F", false)] {
            let record = decoded(&format!("SIMPLE  =                    {}", constant));
            assert_eq!(record.value, Value::Logical(*boolean))
        }
    }

    #[test]
    fn numeric_literals_become_numbers() {
        for (input, n) in &[
            ("12345", 12345f64),
            ("3.5", 3.5),
            ("-32", -32.0),
            ("1.0E-3", 0.001),
            ("2.5D2", 250.0),
            (".5", 0.5),
        ] {
            assert_eq!(literal_value(input), Value::Number(*n), "{}", input)
        }
    }

    #[test]
    fn unparseable_literals_stay_strings() {
        assert_eq!(
            literal_value("(1.0, 2.0)"),
            Value::CharacterString("(1.0, 2.0)".into())
        );
        assert_eq!(literal_value("12abc"), Value::CharacterString("12abc".into()));
        assert_eq!(literal_value(""), Value::Undefined);
    }

    #[test]
    fn quoted_strings_keep_slashes_and_escaped_quotes() {
        let record = decoded("TUNIT4  = 'e-/s    '           / column units: electrons per second");
        assert_eq!(record.value, Value::CharacterString("e-/s".into()));
        assert_eq!(record.comment, "column units: electrons per second");

        let record = decoded("OBSERVER= 'O''HARA'");
        assert_eq!(record.value, Value::CharacterString("O'HARA".into()));
    }

    #[test]
    fn unterminated_quote_falls_back_to_raw_text() {
        let record = decoded("OBJECT  = 'EPIC / half a comment");
        assert_eq!(record.value, Value::CharacterString("'EPIC".into()));
        assert_eq!(record.comment, "half a comment");
    }

    #[test]
    fn end_and_blank_cards() {
        assert_eq!(header_record(&card("END")), HeaderRecord::EndRecord);
        assert_eq!(header_record(&card("")), HeaderRecord::BlankRecord);
        assert_eq!(
            header_record(&card("        / just a comment")),
            HeaderRecord::BlankRecord
        );
    }

    #[test]
    fn commentary_cards_carry_no_value() {
        let record = decoded("HISTORY  created by a pipeline, x = 3");
        assert_eq!(record.key, "HISTORY");
        assert_eq!(record.value, Value::Undefined);

        let record = decoded("COMMENT   no value indicator here");
        assert_eq!(record.value, Value::Undefined);
    }

    #[test]
    fn high_bytes_map_to_their_code_points() {
        let mut line = card("OBJECT  = 'caf");
        line[14] = 0xE9;
        line[15] = b'\'';
        match header_record(&line) {
            HeaderRecord::Card(c) => assert_eq!(c.value, Value::CharacterString("café".into())),
            other => panic!("unexpected {:?}", other),
        }
    }
}
