//! Reading a whole header unit, card by card.
use crate::{
    fits::{pad_to_block, KEYWORD_LINE_LENGTH},
    parser::header,
    types::{HeaderCard, HeaderRecord, HeaderUnit},
};
use tracing::{trace, warn};

/// Parse a fits header
#[derive(Debug)]
pub struct HeaderParser {
    cards: Vec<HeaderCard>,
    start: usize,
    consumed: usize,
    terminated: bool,
}

/// What happened to the last card fed to [`HeaderParser::parse_record`]
#[derive(Debug, PartialEq, Eq)]
pub enum ParseOutcome<'a> {
    /// A card was read, more may follow; carries the remaining input
    Ok(&'a [u8]),
    /// The `END` card was read; carries the input after it
    Complete(&'a [u8]),
    /// Fewer than 80 bytes were left
    Exhausted,
}

impl HeaderParser {
    /// Create a parser for a header starting at byte `start` of the buffer
    pub fn new(start: usize) -> HeaderParser {
        HeaderParser {
            cards: Vec::new(),
            start,
            consumed: 0,
            terminated: false,
        }
    }

    /// Read cards until `END` or until the input runs out.
    ///
    /// Running out is not an error; the header is kept with whatever cards were
    /// read and reports itself as unterminated.
    pub fn parse_header<'a>(&mut self, mut input: &'a [u8]) -> &'a [u8] {
        loop {
            match self.parse_record(input) {
                ParseOutcome::Ok(r) => input = r,
                ParseOutcome::Complete(c) => return c,
                ParseOutcome::Exhausted => return input,
            }
        }
    }

    /// Convert this into the `HeaderUnit` type
    pub fn into_header(self) -> HeaderUnit {
        HeaderUnit::new(
            self.cards,
            self.start,
            pad_to_block(self.consumed),
            self.terminated,
        )
    }

    /// parse single record from buf
    pub fn parse_record<'a>(&mut self, input: &'a [u8]) -> ParseOutcome<'a> {
        if self.terminated || input.len() < KEYWORD_LINE_LENGTH {
            return ParseOutcome::Exhausted;
        }
        let (line, remainder) = input.split_at(KEYWORD_LINE_LENGTH);
        self.consumed += KEYWORD_LINE_LENGTH;
        match header::header_record(line) {
            HeaderRecord::EndRecord => {
                self.terminated = true;
                ParseOutcome::Complete(remainder)
            }
            HeaderRecord::BlankRecord => ParseOutcome::Ok(remainder),
            HeaderRecord::Card(card) => {
                trace!(key = %card.key, value = %card.value, "card");
                self.cards.push(card);
                ParseOutcome::Ok(remainder)
            }
        }
    }
}

/// Read the header unit starting at `offset`.
///
/// The returned unit's `padded_len` is the distance from `offset` to the next
/// HDU or data section.
pub fn read_header_unit(buffer: &[u8], offset: usize) -> HeaderUnit {
    let mut parser = HeaderParser::new(offset);
    parser.parse_header(buffer.get(offset..).unwrap_or_default());
    let unit = parser.into_header();
    if !unit.is_terminated() {
        warn!(offset, cards = unit.len(), "header ended without an END card");
    }
    unit
}
