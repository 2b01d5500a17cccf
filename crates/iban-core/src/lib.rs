#![deny(clippy::print_stdout, clippy::print_stderr)]

//! Parsing, validation, and canonical formatting of International Bank
//! Account Numbers.
//!
//! The crate proves a code is *structurally and arithmetically well-formed*:
//! it never checks that an account exists.  Three layers, each depending
//! only on the one before it: the country rule table ([`registry`]), the
//! layout compiler ([`layout`]), and the validator/formatter ([`iban`]),
//! with the mod-97 arithmetic factored into [`check_digits`].

pub mod check_digits;
pub mod iban;
pub mod layout;
pub mod registry;

pub use check_digits::{check_digits_for, rearranged_mod97};
pub use iban::{Iban, ParseError};
pub use layout::{BbanLayout, CharClass, LayoutError, Segment};
pub use registry::{CountryRule, lookup, supported_countries};

/// Returns the current version of the iban-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
