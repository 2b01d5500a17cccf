//! Country rule table: per-country code length, BBAN layout, and SEPA
//! membership.
//!
//! The raw table is a hand-curated constant, one entry per country that
//! issues codes.  It is compiled once per process into a registry behind
//! `LazyLock` — descriptor strings are parsed exactly once, and lookups on
//! the validation path touch only precompiled [`BbanLayout`]s.  The registry
//! is read-only after initialization and safe to share across threads
//! without locking.
//!
//! Table invariant: for every entry, the layout's repeat counts sum to
//! `length - 4` (two country letters plus two check digits).  Violating it
//! is a data-entry bug caught by the self-check test below, not a runtime
//! error.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::layout::BbanLayout;

// ---------------------------------------------------------------------------
// CountryRule
// ---------------------------------------------------------------------------

/// Validation rules for one country's codes.
#[derive(Debug, Clone, Serialize)]
pub struct CountryRule {
    /// The two-letter country code this rule applies to.
    pub country: &'static str,
    /// Exact length of the full code, header included.
    pub length: usize,
    /// Compact descriptor the BBAN layout was compiled from.
    pub bban_format: &'static str,
    /// Single Euro Payments Area membership.  Metadata only; validation
    /// never consults it.
    pub sepa_member: bool,
    layout: BbanLayout,
}

impl CountryRule {
    /// The precompiled structural matcher for this country's BBAN.
    pub fn layout(&self) -> &BbanLayout {
        &self.layout
    }
}

// ---------------------------------------------------------------------------
// Raw table
//
// (country, total length, BBAN descriptor, SEPA member), sorted by country.
// ---------------------------------------------------------------------------

const RULE_DATA: &[(&str, usize, &str, bool)] = &[
    ("AD", 24, "F04F04A12", false),
    ("AE", 23, "F03F16", false),
    ("AL", 28, "F08A16", false),
    ("AT", 20, "F05F11", true),
    ("AZ", 28, "U04A20", false),
    ("BA", 20, "F03F03F08F02", false),
    ("BE", 16, "F03F07F02", true),
    ("BG", 22, "U04F04F02A08", true),
    ("BH", 22, "U04A14", false),
    ("BR", 29, "F08F05F10U01A01", false),
    ("CH", 21, "F05A12", true),
    ("CR", 21, "F03F14", false),
    ("CY", 28, "F03F05A16", false),
    ("CZ", 24, "F04F06F10", true),
    ("DE", 22, "F08F10", true),
    ("DK", 18, "F04F09F01", true),
    ("DO", 28, "U04F20", false),
    ("EE", 20, "F02F02F11F01", true),
    ("ES", 24, "F04F04F01F01F10", true),
    ("FI", 18, "F06F07F01", true),
    ("FO", 18, "F04F09F01", true),
    ("FR", 27, "F05F05A11F02", true),
    ("GB", 22, "U04F06F08", true),
    ("GE", 22, "U02F16", false),
    ("GI", 23, "U04A15", true),
    ("GL", 18, "F04F09F01", true),
    ("GR", 27, "F03F04A16", true),
    ("GT", 28, "A04A20", false),
    ("HR", 21, "F07F10", false),
    ("HU", 28, "F03F04F01F15F01", true),
    ("IE", 22, "U04F06F08", true),
    ("IL", 23, "F03F03F13", false),
    ("IS", 26, "F04F02F06F10", true),
    ("IT", 27, "U01F05F05A12", true),
    ("JO", 30, "U04F04A18", false),
    ("KW", 30, "U04A22", false),
    ("KZ", 20, "F03A13", false),
    ("LB", 28, "F04A20", false),
    ("LC", 32, "U04A24", false),
    ("LI", 21, "F05A12", true),
    ("LT", 20, "F05F11", true),
    ("LU", 20, "F03A13", true),
    ("LV", 21, "U04A13", true),
    ("MC", 27, "F05F05A11F02", true),
    ("MD", 24, "A20", false),
    ("ME", 22, "F03F13F02", false),
    ("MK", 19, "F03A10F02", false),
    ("MR", 27, "F05F05F11F02", false),
    ("MT", 31, "U04F05A18", true),
    ("MU", 30, "U04F02F02F12F03U03", false),
    ("NL", 18, "U04F10", true),
    ("NO", 15, "F04F06F01", true),
    ("PK", 24, "U04A16", false),
    ("PL", 28, "F08F16", true),
    ("PS", 29, "U04A21", false),
    ("PT", 25, "F04F04F11F02", true),
    ("QA", 29, "U04A21", false),
    ("RO", 24, "U04A16", true),
    ("RS", 22, "F03F13F02", false),
    ("SA", 24, "F02A18", false),
    ("SC", 31, "U04F02F02F16U03", false),
    ("SE", 24, "F03F16F01", true),
    ("SI", 19, "F05F08F02", true),
    ("SK", 24, "F04F06F10", true),
    ("SM", 27, "U01F05F05A12", true),
    ("ST", 25, "F08F11F02", false),
    ("TL", 23, "F03F14F02", false),
    ("TN", 24, "F02F03F13F02", false),
    ("TR", 26, "F05A01A16", false),
    ("UA", 29, "F06A19", false),
    ("VG", 24, "U04F16", false),
    ("XK", 20, "F04F10F02", false),
];

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

static REGISTRY: LazyLock<BTreeMap<&'static str, CountryRule>> = LazyLock::new(|| {
    RULE_DATA
        .iter()
        .map(|&(country, length, bban_format, sepa_member)| {
            // A descriptor typo degrades to a layout that matches nothing;
            // the self-check test then fails on the length invariant.
            let layout = BbanLayout::compile(bban_format).unwrap_or_else(|_| BbanLayout::empty());
            (
                country,
                CountryRule {
                    country,
                    length,
                    bban_format,
                    sepa_member,
                    layout,
                },
            )
        })
        .collect()
});

/// Looks up the rule for a two-letter uppercase country code.
///
/// # Examples
///
/// ```
/// use iban_core::registry::lookup;
///
/// let rule = lookup("GB").expect("GB is in the table");
/// assert_eq!(rule.length, 22);
/// assert!(lookup("XX").is_none());
/// ```
pub fn lookup(country: &str) -> Option<&'static CountryRule> {
    REGISTRY.get(country)
}

/// Country codes present in the rule table, in ascending order.
pub fn supported_countries() -> impl Iterator<Item = &'static str> {
    REGISTRY.keys().copied()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    /// Every layout's repeat counts must sum to `length - 4`.  This also
    /// catches descriptors that failed to compile, since those degrade to an
    /// empty layout with a zero sum.
    #[test]
    fn table_self_check_layout_lengths() {
        for country in supported_countries() {
            let rule = lookup(country).expect("listed country resolves");
            assert_eq!(
                rule.layout().total_len(),
                rule.length - 4,
                "layout of {} is inconsistent with its length",
                rule.country,
            );
        }
    }

    #[test]
    fn table_is_complete_and_sorted() {
        let countries: Vec<&str> = supported_countries().collect();
        assert_eq!(countries.len(), 72);
        let mut sorted = countries.clone();
        sorted.sort_unstable();
        assert_eq!(countries, sorted);
    }

    #[test]
    fn lookup_known_country() {
        let rule = lookup("GB").expect("GB is supported");
        assert_eq!(rule.country, "GB");
        assert_eq!(rule.length, 22);
        assert_eq!(rule.bban_format, "U04F06F08");
        assert!(rule.sepa_member);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(lookup("gb").is_none());
        assert!(lookup("Gb").is_none());
    }

    #[test]
    fn lookup_unknown_country() {
        assert!(lookup("XX").is_none());
        assert!(lookup("").is_none());
        assert!(lookup("GBR").is_none());
    }

    /// Boundary entries: the shortest and longest codes in the table.
    #[test]
    fn length_extremes() {
        let shortest = lookup("NO").expect("NO is supported");
        assert_eq!(shortest.length, 15);
        let longest = lookup("LC").expect("LC is supported");
        assert_eq!(longest.length, 32);
        for country in supported_countries() {
            let rule = lookup(country).expect("listed country resolves");
            assert!(rule.length >= shortest.length);
            assert!(rule.length <= longest.length);
        }
    }

    #[test]
    fn sepa_membership_spot_checks() {
        assert!(lookup("DE").expect("DE is supported").sepa_member);
        assert!(lookup("NO").expect("NO is supported").sepa_member);
        assert!(!lookup("BR").expect("BR is supported").sepa_member);
        assert!(!lookup("SA").expect("SA is supported").sepa_member);
    }

    /// Rules serialize with their compiled layout, usable as metadata output.
    #[test]
    fn rule_serializes_to_json() {
        let rule = lookup("NL").expect("NL is supported");
        let json = serde_json::to_value(rule).expect("serialize");
        assert_eq!(json["country"], "NL");
        assert_eq!(json["length"], 18);
        assert_eq!(json["bban_format"], "U04F10");
        assert_eq!(json["sepa_member"], true);
        assert_eq!(json["layout"]["segments"][0]["class"], "upper-letter");
    }
}
