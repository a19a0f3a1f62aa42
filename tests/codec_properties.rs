use kvtool::codec::{decode, encode};
use kvtool::matcher::matches;
use kvtool::Format;
use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

fn bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..200)
}

fn format_strategy() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Quoted), Just(Format::Hex), Just(Format::Escaped)]
}

// Property: every format round-trips arbitrary bytes
proptest! {
    #[test]
    fn prop_round_trip(data in bytes_strategy(), format in format_strategy()) {
        let encoded = encode(&data, format);
        prop_assert!(encoded.is_ascii());
        prop_assert_eq!(decode(&encoded, format).unwrap(), data);
    }

    #[test]
    fn prop_hex_is_two_lowercase_digits_per_byte(data in bytes_strategy()) {
        let encoded = encode(&data, Format::Hex);
        prop_assert_eq!(encoded.len(), data.len() * 2);
        prop_assert!(encoded.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn prop_quoted_text_is_literal(text in "[a-zA-Z0-9 _.:/-]{0,64}") {
        prop_assert_eq!(decode(&text, Format::Quoted).unwrap(), text.as_bytes().to_vec());
        prop_assert_eq!(encode(text.as_bytes(), Format::Quoted), format!("\"{}\"", text));
    }
}

// Property: matching is conjunction of literal substring tests
proptest! {
    #[test]
    fn prop_empty_terms_always_match(key in bytes_strategy()) {
        let terms: Vec<Vec<u8>> = Vec::new();
        prop_assert!(matches(&key, &terms));
    }

    #[test]
    fn prop_slices_of_key_match(
        key in prop_vec(any::<u8>(), 1..64),
        cuts in prop_vec((any::<prop::sample::Index>(), any::<prop::sample::Index>()), 1..5),
    ) {
        let terms: Vec<Vec<u8>> = cuts
            .iter()
            .map(|(a, b)| {
                let (a, b) = (a.index(key.len() + 1), b.index(key.len() + 1));
                key[a.min(b)..a.max(b)].to_vec()
            })
            .collect();
        prop_assert!(matches(&key, &terms));
    }

    #[test]
    fn prop_matches_agrees_with_each_term(
        key in "[ab]{0,12}",
        terms in prop_vec("[ab]{1,3}", 0..4),
    ) {
        let expected = terms.iter().all(|t| key.contains(t.as_str()));
        prop_assert_eq!(matches(key.as_bytes(), &terms), expected);
    }

    #[test]
    fn prop_longer_term_never_matches(key in bytes_strategy(), extra in any::<u8>()) {
        let mut term = key.clone();
        term.push(extra);
        prop_assert!(!matches(&key, &[term]));
    }
}
