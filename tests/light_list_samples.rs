//! Light-list sample notations through the public decoder API

use aton_notation::{
    DesignCodeDecoder, FogSignalDecoder, LightDecoder, NotationDecoders, NotationKind, Outcome,
    ToAtonTags, Validity, Vocabulary,
};

const LIGHT_CHARACTERISTICS: &[&str] = &[
    "Mo(U)15s",
    "Fl(2+1)W.10s",
    "Iso.WRG.4s",
    "Al Fl.WR.4s",
    "Fl.G.3s",
    "F.R",
    "VQ+LFl.R",
    "Oc.WRG.5s",
    "2 Oc.W.R G.1,5s",
    "Q(6)+LFl W 15s",
    "Fl G 2s",
];

const FOG_SIGNALS: &[&str] = &[
    "HORN(3)30s   (2+2+2+2+2+20)",
    "SIREN(1)30s   (5+25)",
    "BELL.15s   (2,5+12,5)",
    "HORN   MO(U)30s   (0,75+1+0,75+1+2,5+24)",
    "HORN",
    "Horn(2)60s (5+5+5+45)",
    "Horn (2) 60s",
    "Horn (2) 30s",
];

const DESIGN_CODES: &[&str] = &[
    "2S5NC/B",
    "1S7EC/RA",
    "2S5EC",
    "+1S7SC/R",
    "2S1SWSP/B",
    "1S10SM",
    "NS1SL",
    "1S9SC-AIS/R/MH",
    "3S4.5NC",
    "4B4SL",
];

const NOISE: &[&str] = &[
    "",
    " ",
    "\t\n",
    "((((",
    "))))",
    "+++",
    "s",
    "0s",
    "99999999999999999999999s",
    "1,5,5s",
    "Fl(",
    "Fl()",
    "MO(",
    "MO()",
    "HORN MO(1)",
    "/",
    "+/",
    "ÆØÅ Fl.W.5s",
    "灯台",
    "🚢 HORN 🚢",
    "Fl.W.5s\u{0}",
    "1S",
    "1SXX",
];

fn overflowing_numbers() -> Vec<String> {
    let nines = "9".repeat(400);
    vec![
        format!("Fl.W.{nines}s"),
        format!("Fl.W.{nines},5s"),
        format!("HORN({nines}){nines}s"),
        format!("1S{nines}NC"),
        format!("2S{nines}.5SC/B"),
    ]
}

#[test]
fn test_all_sample_lights_are_valid() {
    let decoder = LightDecoder::new(&Vocabulary::default().light);
    for sample in LIGHT_CHARACTERISTICS {
        let light = decoder.decode(sample);
        assert!(light.is_valid(), "light '{}' should be valid", sample);
        assert_eq!(light.outcome(), Outcome::Full);

        let tags = light.to_tags();
        assert_eq!(tags[0].key, "seamark:type");
        assert_eq!(tags[0].value, "light");
        assert!(tags.iter().any(|tag| tag.key == "seamark:light:character"));
    }
}

#[test]
fn test_all_sample_fog_signals_are_valid() {
    let decoder = FogSignalDecoder::new(&Vocabulary::default().fog_signal);
    for sample in FOG_SIGNALS {
        let fog_signal = decoder.decode(sample);
        assert!(fog_signal.is_valid(), "fog signal '{}' should be valid", sample);
        assert!(
            fog_signal
                .to_tags()
                .iter()
                .any(|tag| tag.key == "seamark:fog_signal:category")
        );
    }
}

#[test]
fn test_all_sample_design_codes_are_valid() {
    let decoder = DesignCodeDecoder::new(&Vocabulary::default().design_code).unwrap();
    for sample in DESIGN_CODES {
        let design_code = decoder.decode(sample);
        assert!(design_code.is_valid(), "design code '{}' should be valid", sample);
        assert!(
            design_code.structure_type.is_some(),
            "design code '{}' should have a structure type",
            sample
        );
        assert!(
            design_code
                .to_tags()
                .iter()
                .all(|tag| !tag.key.contains('{'))
        );
    }
}

#[test]
fn test_end_to_end_morse_light() {
    let decoder = LightDecoder::new(&Vocabulary::default().light);
    let light = decoder.decode("Mo(U)15s");
    let tags = light.to_tags();

    let value = |key: &str| {
        tags.iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.clone())
    };
    assert_eq!(value("seamark:light:character").as_deref(), Some("Mo"));
    assert_eq!(value("seamark:light:group").as_deref(), Some("U"));
    assert_eq!(value("seamark:light:period").as_deref(), Some("15"));
    assert_eq!(value("seamark:light:colour"), None);
}

#[test]
fn test_decoding_is_deterministic() {
    let decoders = NotationDecoders::new(&Vocabulary::default()).unwrap();
    let samples = [
        (NotationKind::Light, LIGHT_CHARACTERISTICS),
        (NotationKind::FogSignal, FOG_SIGNALS),
        (NotationKind::DesignCode, DESIGN_CODES),
    ];
    for (kind, inputs) in samples {
        for input in inputs.iter().chain(NOISE) {
            let first = decoders.decode(kind, input);
            let second = decoders.decode(kind, input);
            assert_eq!(first, second, "{} '{}'", kind, input);
            assert_eq!(first.to_tags(), second.to_tags());
        }
    }
}

#[test]
fn test_decoding_is_total() {
    let decoders = NotationDecoders::new(&Vocabulary::default()).unwrap();
    for kind in [
        NotationKind::Light,
        NotationKind::FogSignal,
        NotationKind::DesignCode,
    ] {
        for input in NOISE {
            let record = decoders.decode(kind, input);
            let tags = record.to_tags();
            assert!(
                tags.iter().all(|tag| !tag.value.trim().is_empty()),
                "{} '{}' emitted an empty tag",
                kind,
                input
            );
            if !record.is_valid() {
                assert!(tags.iter().all(|tag| tag.key != "seamark:type"));
            }
        }
    }
}

#[test]
fn test_overflowing_numbers_never_reach_tags() {
    let decoders = NotationDecoders::new(&Vocabulary::default()).unwrap();
    for input in overflowing_numbers() {
        for kind in [
            NotationKind::Light,
            NotationKind::FogSignal,
            NotationKind::DesignCode,
        ] {
            for tag in decoders.decode(kind, &input).to_tags() {
                assert!(
                    !["inf", "-inf", "NaN"].contains(&tag.value.as_str()),
                    "{} '{}' emitted {}",
                    kind,
                    input,
                    tag
                );
            }
        }
    }
}

#[test]
fn test_custom_vocabulary_file_changes_behaviour() {
    use std::io::Write;

    let mut vocabulary = Vocabulary::default();
    vocabulary.version = 2;
    vocabulary
        .fog_signal
        .categories
        .retain(|entry| !entry.abbreviation.eq_ignore_ascii_case("bell"));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", vocabulary.to_json_pretty().unwrap()).unwrap();

    let loaded = Vocabulary::from_json_file(file.path()).unwrap();
    assert_eq!(loaded.version, 2);

    let decoder = FogSignalDecoder::new(&loaded.fog_signal);
    assert!(!decoder.decode("BELL.15s   (2,5+12,5)").is_valid());
    assert!(decoder.decode("HORN(3)30s").is_valid());
}
