//! Light characteristic decoding.
//!
//! Decodes light-list characteristics such as `"Fl(2+1)W.10s"`,
//! `"2 Oc.W.R G.1,5s"` or `"Q(6)+LFl W 15s"` into a [`LightCharacteristic`].
//! Dot, space and mixed separators are all accepted; unrecognised text is
//! skipped rather than rejected.

use crate::models::{LightCharacteristic, LightColour, LightPhase};
use crate::scanner::Cursor;
use crate::validity::Validity;
use crate::vocabulary::{Abbreviation, LightVocabulary, longest_first};
use tracing::debug;

/// Decoder for light characteristics over a fixed vocabulary
#[derive(Debug, Clone)]
pub struct LightDecoder {
    phases: Vec<Abbreviation<LightPhase>>,
    colours: Vec<Abbreviation<LightColour>>,
}

/// A phase must not run into a lowercase letter (`F` is not a prefix of `Fl`)
fn phase_boundary(next: Option<char>) -> bool {
    !next.is_some_and(|c| c.is_lowercase())
}

impl LightDecoder {
    pub fn new(vocabulary: &LightVocabulary) -> Self {
        Self {
            phases: longest_first(&vocabulary.phases),
            colours: longest_first(&vocabulary.colours),
        }
    }

    /// Decode a light characteristic. Never fails; check [`Validity::is_valid`].
    pub fn decode(&self, raw: &str) -> LightCharacteristic {
        let mut light = LightCharacteristic::default();
        let mut cursor = Cursor::new(raw.trim());

        light.multiplicity = self.take_multiplicity(&mut cursor);
        if let Some(phase) = self.take_phase(&mut cursor) {
            light.phase = Some(phase);
            self.take_phase_suffix(&mut cursor, &mut light);
        }
        self.scan_tail(&mut cursor, &mut light);

        debug!(
            "Decoded light '{}': phase={:?} group={:?} colours={:?} period={:?} valid={}",
            raw,
            light.phase,
            light.group,
            light.colours,
            light.period_seconds,
            light.is_valid()
        );
        light
    }

    fn take_phase(&self, cursor: &mut Cursor<'_>) -> Option<LightPhase> {
        cursor.take_abbreviation(&self.phases, false, phase_boundary)
    }

    /// Leading count, only when followed by whitespace and a phase
    fn take_multiplicity(&self, cursor: &mut Cursor<'_>) -> Option<u32> {
        let start = cursor.position();
        let multiplicity = cursor
            .take_digits()
            .and_then(|digits| digits.parse::<u32>().ok());

        if let Some(multiplicity) = multiplicity {
            if cursor.skip_whitespace() > 0 {
                let phase_start = cursor.position();
                if self.take_phase(cursor).is_some() {
                    cursor.reset(phase_start);
                    return Some(multiplicity);
                }
            }
        }
        cursor.reset(start);
        None
    }

    /// Group and `+` additional phase directly after the phase
    fn take_phase_suffix(&self, cursor: &mut Cursor<'_>, light: &mut LightCharacteristic) {
        let start = cursor.position();
        cursor.skip_whitespace();
        match cursor.take_parenthesized() {
            Some(group) if !group.is_empty() => light.group = Some(group.to_string()),
            Some(_) => {}
            None => cursor.reset(start),
        }

        let start = cursor.position();
        cursor.skip_whitespace();
        if cursor.eat('+') {
            cursor.skip_whitespace();
            if let Some(additional) = self.take_phase(cursor) {
                light.additional = Some(additional);
                return;
            }
        }
        cursor.reset(start);
    }

    /// One run of colour codes, e.g. `WRG`, ending at a non-letter
    fn take_colour_run(&self, cursor: &mut Cursor<'_>) -> Option<Vec<LightColour>> {
        let start = cursor.position();
        let mut run = Vec::new();
        while let Some(colour) = cursor.take_abbreviation(&self.colours, false, |_| true) {
            run.push(colour);
        }

        if run.is_empty() || cursor.peek().is_some_and(char::is_alphabetic) {
            cursor.reset(start);
            return None;
        }
        Some(run)
    }

    fn scan_tail(&self, cursor: &mut Cursor<'_>, light: &mut LightCharacteristic) {
        while let Some(c) = cursor.peek() {
            if c.is_ascii_digit() {
                match cursor.take_period() {
                    Some(period) if light.period_seconds.is_none() => {
                        light.period_seconds = Some(period)
                    }
                    Some(_) => {}
                    None => cursor.skip_word(),
                }
            } else if c == '(' {
                if cursor.take_parenthesized().is_none() {
                    cursor.bump();
                }
            } else if c.is_alphabetic() {
                if light.phase.is_none() {
                    if let Some(phase) = self.take_phase(cursor) {
                        light.phase = Some(phase);
                        self.take_phase_suffix(cursor, light);
                        continue;
                    }
                }
                match self.take_colour_run(cursor) {
                    Some(run) => light.colours.extend(run),
                    None => cursor.skip_word(),
                }
            } else {
                cursor.bump();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::Vocabulary;

    fn decoder() -> LightDecoder {
        LightDecoder::new(&Vocabulary::default().light)
    }

    #[test]
    fn test_morse_group_and_period() {
        let light = decoder().decode("Mo(U)15s");
        assert_eq!(light.phase, Some(LightPhase::Morse));
        assert_eq!(light.group.as_deref(), Some("U"));
        assert_eq!(light.period_seconds, Some(15.0));
        assert!(light.colours.is_empty());
        assert!(light.is_valid());
    }

    #[test]
    fn test_group_kept_verbatim() {
        let light = decoder().decode("Fl(2+1)W.10s");
        assert_eq!(light.phase, Some(LightPhase::Flashing));
        assert_eq!(light.group.as_deref(), Some("2+1"));
        assert_eq!(light.colours, vec![LightColour::White]);
        assert_eq!(light.period_seconds, Some(10.0));
    }

    #[test]
    fn test_colour_run_in_encounter_order() {
        let light = decoder().decode("Iso.WRG.4s");
        assert_eq!(light.phase, Some(LightPhase::Isophase));
        assert_eq!(
            light.colours,
            vec![LightColour::White, LightColour::Red, LightColour::Green]
        );
        assert_eq!(light.period_seconds, Some(4.0));
    }

    #[test]
    fn test_alternating_phase_longest_match() {
        let decoder = decoder();
        for raw in ["Al Fl.WR.4s", "Al.Fl.WR.4s", "Al  Fl.WR.4s", "Al. Fl.WR.4s"] {
            let light = decoder.decode(raw);
            assert_eq!(light.phase, Some(LightPhase::AlternatingFlashing), "{raw}");
            assert_eq!(light.colours, vec![LightColour::White, LightColour::Red]);
            assert_eq!(light.period_seconds, Some(4.0));
        }

        let plain = decoder.decode("Al.WR.4s");
        assert_eq!(plain.phase, Some(LightPhase::Alternating));
    }

    #[test]
    fn test_fixed_without_period() {
        let light = decoder().decode("F.R");
        assert_eq!(light.phase, Some(LightPhase::Fixed));
        assert_eq!(light.colours, vec![LightColour::Red]);
        assert_eq!(light.period_seconds, None);
        assert!(light.is_valid());
    }

    #[test]
    fn test_additional_phase() {
        let light = decoder().decode("VQ+LFl.R");
        assert_eq!(light.phase, Some(LightPhase::VeryQuick));
        assert_eq!(light.additional, Some(LightPhase::LongFlash));
        assert_eq!(light.colours, vec![LightColour::Red]);
    }

    #[test]
    fn test_group_then_additional_phase() {
        let light = decoder().decode("Q(6)+LFl W 15s");
        assert_eq!(light.phase, Some(LightPhase::Quick));
        assert_eq!(light.group.as_deref(), Some("6"));
        assert_eq!(light.additional, Some(LightPhase::LongFlash));
        assert_eq!(light.colours, vec![LightColour::White]);
        assert_eq!(light.period_seconds, Some(15.0));
    }

    #[test]
    fn test_multiplicity_and_mixed_separators() {
        let light = decoder().decode("2 Oc.W.R G.1,5s");
        assert_eq!(light.multiplicity, Some(2));
        assert_eq!(light.phase, Some(LightPhase::Occulting));
        assert_eq!(
            light.colours,
            vec![LightColour::White, LightColour::Red, LightColour::Green]
        );
        assert_eq!(light.period_seconds, Some(1.5));
    }

    #[test]
    fn test_decimal_mark_normalisation() {
        let decoder = decoder();
        let comma = decoder.decode("Oc.W.R G.1,5s");
        let point = decoder.decode("Oc.W.R G.1.5s");
        assert_eq!(comma.period_seconds, Some(1.5));
        assert_eq!(comma.period_seconds, point.period_seconds);
    }

    #[test]
    fn test_space_separated() {
        let light = decoder().decode("Fl G 2s");
        assert_eq!(light.phase, Some(LightPhase::Flashing));
        assert_eq!(light.colours, vec![LightColour::Green]);
        assert_eq!(light.period_seconds, Some(2.0));
    }

    #[test]
    fn test_two_letter_colours() {
        let light = decoder().decode("Fl.Bu.5s");
        assert_eq!(light.colours, vec![LightColour::Blue]);

        let light = decoder().decode("Oc WOr 6s");
        assert_eq!(light.colours, vec![LightColour::White, LightColour::Orange]);
    }

    #[test]
    fn test_leading_noise_before_phase() {
        let light = decoder().decode("Dir Fl.W.4s");
        assert_eq!(light.phase, Some(LightPhase::Flashing));
        assert_eq!(light.colours, vec![LightColour::White]);
        assert_eq!(light.period_seconds, Some(4.0));
    }

    #[test]
    fn test_count_without_phase_is_not_multiplicity() {
        let light = decoder().decode("10 s");
        assert_eq!(light.multiplicity, None);
        assert_eq!(light.period_seconds, Some(10.0));
        assert!(!light.is_valid());
    }

    #[test]
    fn test_partial_and_empty_inputs() {
        let decoder = decoder();

        let partial = decoder.decode("W.R 5s");
        assert_eq!(partial.phase, None);
        assert_eq!(partial.colours, vec![LightColour::White, LightColour::Red]);
        assert!(!partial.is_valid());

        for raw in ["", "   ", "???", "(", "Fl(2", "+", "°°°"] {
            let light = decoder.decode(raw);
            assert!(light.colours.is_empty() || light.phase.is_some(), "{raw}");
        }
        assert_eq!(decoder.decode(""), LightCharacteristic::default());
    }

    #[test]
    fn test_unclosed_group_is_ignored() {
        let light = decoder().decode("Fl(2 W 10s");
        assert_eq!(light.phase, Some(LightPhase::Flashing));
        assert_eq!(light.group, None);
        assert_eq!(light.colours, vec![LightColour::White]);
        assert_eq!(light.period_seconds, Some(10.0));
    }

    #[test]
    fn test_restricted_vocabulary() {
        let mut vocabulary = Vocabulary::default().light;
        vocabulary
            .phases
            .retain(|entry| entry.value != LightPhase::AlternatingFlashing);

        let light = LightDecoder::new(&vocabulary).decode("Al Fl.WR.4s");
        assert_eq!(light.phase, Some(LightPhase::Alternating));
    }

    #[test]
    fn test_sec_period_unit() {
        let decoder = decoder();
        for raw in ["Fl W 10 sec", "Fl.W.10sec", "Fl.W.10 s"] {
            let light = decoder.decode(raw);
            assert_eq!(light.period_seconds, Some(10.0), "{raw}");
            assert_eq!(light.colours, vec![LightColour::White], "{raw}");
        }
    }

    #[test]
    fn test_overflowing_period_is_dropped() {
        let light = decoder().decode(&format!("Fl.W.{}s", "9".repeat(400)));
        assert_eq!(light.phase, Some(LightPhase::Flashing));
        assert_eq!(light.period_seconds, None);
    }
}
