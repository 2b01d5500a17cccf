//! Parsing, validation, and canonical formatting of full codes.
//!
//! [`Iban::parse`] is the single construction entry point: it either returns
//! a fully validated value or a [`ParseError`], never a partially valid
//! object.  Cheap structural checks (character gate, header shape, length)
//! run before the mod-97 arithmetic so malformed input fails fast.
//!
//! [`Iban::validate`] re-runs the two content checks (BBAN structure and
//! checksum) against an already-constructed value; both always run and every
//! failure is collected, so a caller can tell which check broke.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::check_digits::rearranged_mod97;
use crate::registry::{self, CountryRule};

// ---------------------------------------------------------------------------
// ParseError
// ---------------------------------------------------------------------------

/// Errors produced when constructing or re-validating an [`Iban`].
///
/// Each variant carries the structured data a caller needs to build a
/// precise message without re-deriving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// After space stripping and upper-casing, a character outside `[0-9A-Z]`
    /// remained.
    InvalidCharacters {
        /// The first offending character.
        found: char,
        /// Zero-based position of the character in the normalized code.
        position: usize,
    },
    /// The first four characters are not two non-digits followed by two
    /// digits.
    MalformedHeader {
        /// The observed header (up to four characters).
        header: String,
    },
    /// No rule exists for the two-letter country code.
    UnsupportedCountry {
        /// The country code that failed the lookup.
        country: String,
    },
    /// The normalized code does not have the exact length its country
    /// requires.
    LengthMismatch {
        /// The country whose rule set the expectation.
        country: &'static str,
        /// Length required by the country rule.
        expected: usize,
        /// Length of the normalized code.
        actual: usize,
    },
    /// The BBAN does not match the country's layout.
    BbanFormatMismatch {
        /// The country whose layout was applied.
        country: &'static str,
        /// The descriptor the BBAN was checked against.
        bban_format: &'static str,
    },
    /// The rearranged, letter-expanded code is not congruent to 1 modulo 97.
    ChecksumMismatch {
        /// The observed mod-97 remainder.
        remainder: u32,
    },
    /// The checksum expansion hit a character it cannot map to digits.
    /// Unreachable after the character gate; surfaced instead of panicking.
    InternalArithmetic,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacters { found, position } => write!(
                f,
                "invalid character {found:?} at position {position}: only alphanumeric characters and spaces are accepted"
            ),
            Self::MalformedHeader { header } => write!(
                f,
                "code must start with a two-letter country code and two check digits, got {header:?}"
            ),
            Self::UnsupportedCountry { country } => {
                write!(f, "unsupported country code {country:?}")
            }
            Self::LengthMismatch {
                country,
                expected,
                actual,
            } => write!(
                f,
                "length {actual} does not match length {expected} required for country code {country}"
            ),
            Self::BbanFormatMismatch {
                country,
                bban_format,
            } => write!(
                f,
                "BBAN does not match the {country} country format {bban_format}"
            ),
            Self::ChecksumMismatch { remainder } => write!(
                f,
                "incorrect check digits: mod-97 remainder is {remainder}, expected 1"
            ),
            Self::InternalArithmetic => {
                f.write_str("check digit expansion produced a non-numeric value")
            }
        }
    }
}

impl std::error::Error for ParseError {}

// ---------------------------------------------------------------------------
// Regex statics
//
// Compiled once; the patterns are literals, so Regex::new never fails.  The
// fallback chain satisfies the workspace ban on unwrap() and expect().
// ---------------------------------------------------------------------------

/// Matches a fully normalized code: uppercase alphanumeric only.
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Z]*$")
        .unwrap_or_else(|_| Regex::new(".").unwrap_or_else(|_| unreachable!("regex engine broken")))
});

/// Matches the header shape: two non-digit characters, then two digits.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^0-9]{2}[0-9]{2}")
        .unwrap_or_else(|_| Regex::new(".").unwrap_or_else(|_| unreachable!("regex engine broken")))
});

// ---------------------------------------------------------------------------
// Iban
// ---------------------------------------------------------------------------

/// A structurally and arithmetically well-formed code.
///
/// Built exclusively through [`Iban::parse`] (or the [`FromStr`] /
/// [`TryFrom`] / serde surfaces that delegate to it); immutable afterwards.
/// Equality and hashing are keyed on the normalized code alone, so the same
/// account typed with different spacing or case compares equal.
///
/// The country rule is borrowed from the process-lifetime registry, never
/// owned.
#[derive(Debug, Clone)]
pub struct Iban {
    raw: String,
    code: String,
    display: String,
    rule: &'static CountryRule,
}

impl Iban {
    /// Parses and validates `input`, producing a value object or the first
    /// failure encountered.
    ///
    /// Normalization strips ASCII spaces (no other whitespace) and folds to
    /// uppercase.  The checks run in order: character gate, header shape,
    /// country lookup, exact length, BBAN structure, mod-97 checksum.
    ///
    /// # Errors
    ///
    /// One [`ParseError`] variant per failed step; construction is
    /// all-or-nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use iban_core::Iban;
    ///
    /// let iban = Iban::parse("gb82 west 1234 5698 7654 32")?;
    /// assert_eq!(iban.as_str(), "GB82WEST12345698765432");
    /// assert_eq!(iban.display_format(), "GB82 WEST 1234 5698 7654 32");
    /// assert_eq!(iban.country_code(), "GB");
    /// assert_eq!(iban.check_digits(), "82");
    /// # Ok::<(), iban_core::ParseError>(())
    /// ```
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let code: String = input
            .chars()
            .filter(|&ch| ch != ' ')
            .map(|ch| ch.to_ascii_uppercase())
            .collect();

        if !CODE_RE.is_match(&code) {
            let (position, found) = code
                .chars()
                .enumerate()
                .find(|&(_, ch)| !ch.is_ascii_digit() && !ch.is_ascii_uppercase())
                .unwrap_or((0, '\u{fffd}'));
            return Err(ParseError::InvalidCharacters { found, position });
        }
        // The gate leaves only ASCII, so byte offsets below are char offsets.

        if !HEADER_RE.is_match(&code) {
            return Err(ParseError::MalformedHeader {
                header: code.chars().take(4).collect(),
            });
        }

        let rule =
            registry::lookup(&code[..2]).ok_or_else(|| ParseError::UnsupportedCountry {
                country: code[..2].to_owned(),
            })?;

        if code.len() != rule.length {
            return Err(ParseError::LengthMismatch {
                country: rule.country,
                expected: rule.length,
                actual: code.len(),
            });
        }

        if !rule.layout().matches(&code[4..]) {
            return Err(ParseError::BbanFormatMismatch {
                country: rule.country,
                bban_format: rule.bban_format,
            });
        }

        match rearranged_mod97(&code) {
            Some(1) => {}
            Some(remainder) => return Err(ParseError::ChecksumMismatch { remainder }),
            None => return Err(ParseError::InternalArithmetic),
        }

        let display = group_by_four(&code);
        Ok(Self {
            raw: input.to_owned(),
            code,
            display,
            rule,
        })
    }

    /// Re-runs the BBAN structural check and the mod-97 checksum against the
    /// stored value.
    ///
    /// Both checks always run; every failure is collected in order (BBAN
    /// first, then checksum), so the caller can tell which check broke.  An
    /// empty list means the value still verifies.
    pub fn validate(&self) -> Vec<ParseError> {
        let mut failures = Vec::new();
        if !self.rule.layout().matches(self.bban()) {
            failures.push(ParseError::BbanFormatMismatch {
                country: self.rule.country,
                bban_format: self.rule.bban_format,
            });
        }
        match rearranged_mod97(&self.code) {
            Some(1) => {}
            Some(remainder) => failures.push(ParseError::ChecksumMismatch { remainder }),
            None => failures.push(ParseError::InternalArithmetic),
        }
        failures
    }

    /// The original caller-supplied string, unmodified.
    pub fn raw_input(&self) -> &str {
        &self.raw
    }

    /// The normalized code: uppercase, space-free.
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// The code grouped into blocks of four characters separated by single
    /// spaces; the final block may be shorter.
    pub fn display_format(&self) -> &str {
        &self.display
    }

    /// The two-letter country code.
    pub fn country_code(&self) -> &str {
        &self.code[..2]
    }

    /// The two check digits following the country code.
    pub fn check_digits(&self) -> &str {
        &self.code[2..4]
    }

    /// The country-specific payload after the four-character header.
    pub fn bban(&self) -> &str {
        &self.code[4..]
    }

    /// The country rule the code was validated against.
    pub fn rule(&self) -> &'static CountryRule {
        self.rule
    }

    /// Whether the issuing country is a Single Euro Payments Area member.
    pub fn is_sepa_member(&self) -> bool {
        self.rule.sepa_member
    }
}

/// Greedily slices `code` into 4-character groups joined by single spaces.
fn group_by_four(code: &str) -> String {
    let mut out = String::with_capacity(code.len() + code.len() / 4);
    for (i, ch) in code.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Trait surface
// ---------------------------------------------------------------------------

impl PartialEq for Iban {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Iban {}

impl Hash for Iban {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl TryFrom<&str> for Iban {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl FromStr for Iban {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl AsRef<str> for Iban {
    fn as_ref(&self) -> &str {
        &self.code
    }
}

impl Serialize for Iban {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.code)
    }
}

impl<'de> Deserialize<'de> for Iban {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
