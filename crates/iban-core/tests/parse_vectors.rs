//! End-to-end parse vectors across the public API.
//!
//! The positive vectors are published example codes whose check digits were
//! verified arithmetically; the negative vectors assert the exact structured
//! error payloads callers rely on.
#![allow(clippy::expect_used, clippy::panic)]

use iban_core::{Iban, ParseError, check_digits_for, lookup, supported_countries};

/// Published example codes, one per country where available.
const VALID_VECTORS: &[(&str, &str)] = &[
    ("GB82 WEST 1234 5698 7654 32", "GB"),
    ("DE89 3704 0044 0532 0130 00", "DE"),
    ("BE68 5390 0754 7034", "BE"),
    ("FR14 2004 1010 0505 0001 3M02 606", "FR"),
    ("CH93 0076 2011 6238 5295 7", "CH"),
    ("MT84 MALT 0110 0001 2345 MTLC AST0 01S", "MT"),
    ("NO93 8601 1117 947", "NO"),
    ("MU17 BOMM 0101 1010 3030 0200 000M UR", "MU"),
    ("LC55 HEMM 0001 0001 0012 0012 0002 3015", "LC"),
];

#[test]
fn known_vectors_parse() {
    for &(vector, country) in VALID_VECTORS {
        let iban = Iban::parse(vector)
            .unwrap_or_else(|err| panic!("vector {vector:?} should parse: {err}"));
        assert_eq!(iban.country_code(), country);
        assert_eq!(iban.as_str().len(), iban.rule().length);
        assert!(iban.validate().is_empty());
    }
}

/// The shortest (NO, 15) and longest (LC, 32) table entries round-trip
/// through display formatting.
#[test]
fn boundary_lengths_round_trip() {
    let shortest = Iban::parse("NO9386011117947").expect("valid code");
    assert_eq!(shortest.as_str().len(), 15);
    assert_eq!(shortest.display_format(), "NO93 8601 1117 947");

    let longest = Iban::parse("LC55HEMM000100010012001200023015").expect("valid code");
    assert_eq!(longest.as_str().len(), 32);
    assert_eq!(
        longest.display_format(),
        "LC55 HEMM 0001 0001 0012 0012 0002 3015"
    );

    for iban in [&shortest, &longest] {
        let stripped: String = iban
            .display_format()
            .chars()
            .filter(|&ch| ch != ' ')
            .collect();
        assert_eq!(stripped, iban.as_str());
    }
}

/// For every table entry, a BBAN built from representative characters plus
/// computed check digits must parse.  This exercises each country's layout,
/// length, and the check-digit computation together.
#[test]
fn every_table_entry_accepts_a_constructed_code() {
    for country in supported_countries() {
        let rule = lookup(country).expect("listed country resolves");
        let mut bban = String::with_capacity(rule.length - 4);
        for segment in rule.layout().segments() {
            let filler = if segment.class.contains(b'1') {
                '1'
            } else if segment.class.contains(b'A') {
                'A'
            } else {
                'a'
            };
            for _ in 0..segment.count {
                bban.push(filler);
            }
        }
        let digits = check_digits_for(country, &bban)
            .unwrap_or_else(|| panic!("check digits computable for {country}"));
        let code = format!("{country}{digits}{bban}");
        let iban = Iban::parse(&code)
            .unwrap_or_else(|err| panic!("constructed {country} code {code:?} should parse: {err}"));
        assert_eq!(iban.country_code(), country);
        assert_eq!(iban.check_digits(), digits);
        assert_eq!(iban.bban(), bban);
    }
}

#[test]
fn altered_check_digit_is_a_checksum_failure() {
    assert_eq!(
        Iban::parse("GB82 WEST 1234 5698 7654 33"),
        Err(ParseError::ChecksumMismatch { remainder: 28 })
    );
    assert_eq!(
        Iban::parse("DE89 3704 0044 0532 0130 01"),
        Err(ParseError::ChecksumMismatch { remainder: 28 })
    );
}

#[test]
fn unsupported_country_is_not_a_header_failure() {
    assert_eq!(
        Iban::parse("XX00 0000 0000"),
        Err(ParseError::UnsupportedCountry {
            country: "XX".to_owned(),
        })
    );
}

#[test]
fn length_error_reports_both_lengths() {
    assert_eq!(
        Iban::parse("GB82 WEST 1234 5698 7654 3"),
        Err(ParseError::LengthMismatch {
            country: "GB",
            expected: 22,
            actual: 21,
        })
    );
}

#[test]
fn structural_error_names_the_country_format() {
    assert_eq!(
        Iban::parse("GB82 WE5T 1234 5698 7654 32"),
        Err(ParseError::BbanFormatMismatch {
            country: "GB",
            bban_format: "U04F06F08",
        })
    );
}

/// The full error chain is ordered: cheap checks win over the checksum.
/// An input that is simultaneously mis-charactered and mis-checksummed
/// reports the character failure.
#[test]
fn character_gate_runs_before_everything_else() {
    assert_eq!(
        Iban::parse("GB82_WEST_1234_5698_7654_33"),
        Err(ParseError::InvalidCharacters {
            found: '_',
            position: 4,
        })
    );
}
