//! Cursor primitives shared by the light and fog signal decoders.
//!
//! Every `take_*` method either consumes a complete token and returns it, or
//! leaves the cursor where it was. Nothing here can fail.

use crate::vocabulary::Abbreviation;

#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn skip_while(&mut self, mut pred: impl FnMut(char) -> bool) -> usize {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.pos - start
    }

    pub fn skip_whitespace(&mut self) -> usize {
        self.skip_while(char::is_whitespace)
    }

    /// Skip one word of noise: an alphanumeric run, or a single other char
    pub fn skip_word(&mut self) {
        match self.bump() {
            Some(c) if c.is_alphanumeric() => {
                self.skip_while(char::is_alphanumeric);
            }
            _ => {}
        }
    }

    pub fn take_digits(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if self.skip_while(|c| c.is_ascii_digit()) == 0 {
            return None;
        }
        Some(&self.src[start..self.pos])
    }

    /// Decimal number with either `,` or `.` as the decimal mark
    pub fn take_number(&mut self) -> Option<f64> {
        let start = self.pos;
        let integer = self.take_digits()?;

        let mark = self.pos;
        let fraction = match self.bump() {
            Some('.') | Some(',') => match self.take_digits() {
                Some(fraction) => Some(fraction),
                None => {
                    self.reset(mark);
                    None
                }
            },
            _ => {
                self.reset(mark);
                None
            }
        };

        let parsed = match fraction {
            Some(fraction) => format!("{integer}.{fraction}").parse::<f64>(),
            None => integer.parse::<f64>(),
        };
        match parsed {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                self.reset(start);
                None
            }
        }
    }

    /// Period token `N s` or `N sec`, e.g. `15s`, `1,5s`, `2.5 s`, `10 sec`
    pub fn take_period(&mut self) -> Option<f64> {
        let start = self.pos;
        let value = self.take_number()?;
        self.skip_while(|c| c == ' ');

        let unit = self.rest();
        let unit_len = self.skip_while(char::is_alphabetic);
        if PERIOD_UNITS
            .iter()
            .any(|expected| unit[..unit_len].eq_ignore_ascii_case(expected))
        {
            return Some(value);
        }
        self.reset(start);
        None
    }

    /// Text between `(` and the next `)`, trimmed. Unclosed groups are left alone.
    pub fn take_parenthesized(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        if !rest.starts_with('(') {
            return None;
        }
        let close = rest.find(')')?;
        self.pos += close + 1;
        Some(rest[1..close].trim())
    }

    /// Longest vocabulary entry matching at the cursor.
    ///
    /// `entries` must already be sorted longest first. A `.` or space in an
    /// abbreviation matches either separator in the input. The match is only
    /// accepted when `boundary` holds for the char that follows it.
    pub fn take_abbreviation<T: Copy>(
        &mut self,
        entries: &[Abbreviation<T>],
        case_insensitive: bool,
        boundary: impl Fn(Option<char>) -> bool,
    ) -> Option<T> {
        let rest = self.rest();
        entries.iter().find_map(|entry| {
            let len = match_abbreviation(rest, &entry.abbreviation, case_insensitive)?;
            if boundary(rest[len..].chars().next()) {
                self.pos += len;
                Some(entry.value)
            } else {
                None
            }
        })
    }
}

/// Units accepted after a period value
const PERIOD_UNITS: [&str; 2] = ["s", "sec"];

fn is_separator(c: char) -> bool {
    c == '.' || c == ' '
}

/// Byte length of `input`'s prefix matching `abbreviation`, if any.
///
/// A run of separators in the abbreviation matches a run of one or more
/// separators in the input.
fn match_abbreviation(input: &str, abbreviation: &str, case_insensitive: bool) -> Option<usize> {
    let mut consumed = 0;
    let mut expected_chars = abbreviation.chars().peekable();

    while let Some(expected) = expected_chars.next() {
        let rest = &input[consumed..];
        if is_separator(expected) {
            while expected_chars.next_if(|&c| is_separator(c)).is_some() {}
            let run: usize = rest
                .chars()
                .take_while(|&c| is_separator(c))
                .map(char::len_utf8)
                .sum();
            if run == 0 {
                return None;
            }
            consumed += run;
            continue;
        }

        let actual = rest.chars().next()?;
        let matches = if case_insensitive {
            expected.eq_ignore_ascii_case(&actual)
        } else {
            expected == actual
        };
        if !matches {
            return None;
        }
        consumed += actual.len_utf8();
    }

    Some(consumed)
}
