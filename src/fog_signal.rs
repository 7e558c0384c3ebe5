//! Fog signal decoding.
//!
//! Decodes light-list fog signals such as `"HORN(3)30s (2+2+2+2+2+20)"`,
//! `"BELL.15s (2,5+12,5)"` or `"HORN MO(U)30s (0,75+1+0,75+1+2,5+24)"`.
//! The trailing timing breakdown is kept verbatim; only the category, Morse
//! group, repeat count and period are interpreted.

use crate::models::{FogSignalCategory, FogSignalCharacteristic};
use crate::scanner::Cursor;
use crate::validity::Validity;
use crate::vocabulary::{Abbreviation, FogSignalVocabulary, longest_first};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FogSignalDecoder {
    categories: Vec<Abbreviation<FogSignalCategory>>,
    morse_qualifier: String,
}

fn word_boundary(next: Option<char>) -> bool {
    !next.is_some_and(char::is_alphabetic)
}

impl FogSignalDecoder {
    pub fn new(vocabulary: &FogSignalVocabulary) -> Self {
        Self {
            categories: longest_first(&vocabulary.categories),
            morse_qualifier: vocabulary.morse_qualifier.trim().to_string(),
        }
    }

    /// Decode a fog signal. Never fails; check [`Validity::is_valid`].
    pub fn decode(&self, raw: &str) -> FogSignalCharacteristic {
        let mut fog_signal = FogSignalCharacteristic::default();
        let mut cursor = Cursor::new(raw.trim());

        while let Some(c) = cursor.peek() {
            if c == '(' {
                match cursor.take_parenthesized() {
                    Some(inner) => self.assign_parenthesized(inner, &mut fog_signal),
                    None => {
                        cursor.bump();
                    }
                }
            } else if c.is_ascii_digit() {
                match cursor.take_period() {
                    Some(period) if fog_signal.period_seconds.is_none() => {
                        fog_signal.period_seconds = Some(period)
                    }
                    Some(_) => {}
                    None => cursor.skip_word(),
                }
            } else if c.is_alphabetic() {
                if fog_signal.category.is_none() {
                    if let Some(category) =
                        cursor.take_abbreviation(&self.categories, true, word_boundary)
                    {
                        fog_signal.category = Some(category);
                        continue;
                    }
                }
                match self.take_morse(&mut cursor) {
                    Some(morse) if fog_signal.morse.is_none() => fog_signal.morse = Some(morse),
                    Some(_) => {}
                    None => cursor.skip_word(),
                }
            } else {
                cursor.bump();
            }
        }

        debug!(
            "Decoded fog signal '{}': category={:?} morse={:?} group={:?} period={:?} valid={}",
            raw,
            fog_signal.category,
            fog_signal.morse,
            fog_signal.group,
            fog_signal.period_seconds,
            fog_signal.is_valid()
        );
        fog_signal
    }

    /// `MO(U)` or `MO (AR)`: the qualifier followed by a parenthesised letter group
    fn take_morse(&self, cursor: &mut Cursor<'_>) -> Option<String> {
        let start = cursor.position();
        let qualifier_len = self.morse_qualifier.len();
        let rest = cursor.rest();

        let is_qualifier = rest
            .get(..qualifier_len)
            .is_some_and(|head| head.eq_ignore_ascii_case(&self.morse_qualifier))
            && word_boundary(rest[qualifier_len..].chars().next());
        if !is_qualifier {
            return None;
        }

        cursor.reset(start + qualifier_len);
        cursor.skip_whitespace();
        match cursor.take_parenthesized() {
            Some(letters)
                if !letters.is_empty() && letters.chars().all(char::is_alphabetic) =>
            {
                Some(letters.to_uppercase())
            }
            _ => {
                cursor.reset(start);
                None
            }
        }
    }

    /// A bare count before any timing breakdown is the repeat group;
    /// anything else is the first (and only kept) timing breakdown.
    fn assign_parenthesized(&self, inner: &str, fog_signal: &mut FogSignalCharacteristic) {
        if inner.is_empty() {
            return;
        }

        let is_count = inner.chars().all(|c| c.is_ascii_digit());
        if is_count
            && fog_signal.group.is_none()
            && fog_signal.period_seconds.is_none()
            && fog_signal.timing_breakdown.is_none()
        {
            if let Ok(group) = inner.parse::<u32>() {
                fog_signal.group = Some(group);
                return;
            }
        }

        if fog_signal.timing_breakdown.is_none() {
            fog_signal.timing_breakdown = Some(inner.to_string());
        }
    }
}
