//! Pure MOD 97-10 (ISO 7064) arithmetic for check-digit verification.
//!
//! Both functions are zero-allocation on the verification path: the decimal
//! numeral produced by letter expansion (`A`→`10` … `Z`→`35`) would run to
//! 60+ digits for real codes, so instead of building it the remainder is
//! folded left to right, `r = (r * base + value) % 97`, with base 10 for a
//! digit and 100 for a letter's two-digit expansion.
//!
//! Characters that cannot be expanded make the numeral undefined; the
//! functions return `None` rather than skipping them, so a caller that
//! somehow reaches this point with unvetted input fails closed instead of
//! silently verifying a different string.

/// Folds one already-uppercased byte into a running mod-97 remainder.
fn fold_mod97(remainder: u32, byte: u8) -> Option<u32> {
    match byte {
        b'0'..=b'9' => Some((remainder * 10 + u32::from(byte - b'0')) % 97),
        b'A'..=b'Z' => Some((remainder * 100 + u32::from(byte - b'A') + 10) % 97),
        _ => None,
    }
}

/// Computes the mod-97 remainder of a code after moving its four-character
/// header to the end and expanding letters to digits.
///
/// A well-formed code produces `Some(1)`.  Returns `None` when the code is
/// shorter than its header or contains a byte outside `[0-9A-Z]` — the
/// expansion is undefined there.
///
/// # Examples
///
/// ```
/// use iban_core::check_digits::rearranged_mod97;
///
/// assert_eq!(rearranged_mod97("GB82WEST12345698765432"), Some(1));
///
/// // Corrupting the last digit shifts the remainder away from 1.
/// assert_eq!(rearranged_mod97("GB82WEST12345698765433"), Some(28));
/// ```
pub fn rearranged_mod97(code: &str) -> Option<u32> {
    let bytes = code.as_bytes();
    if bytes.len() < 4 {
        return None;
    }
    let (header, body) = bytes.split_at(4);
    let mut remainder: u32 = 0;
    for &byte in body.iter().chain(header) {
        remainder = fold_mod97(remainder, byte)?;
    }
    Some(remainder)
}

/// Computes the two check digits that make `country`, the digits, and `bban`
/// assemble into a code with remainder 1.
///
/// The pair is derived as `98 - mod97(bban ++ country ++ "00")`, zero-padded
/// to two characters.  Lowercase input is folded to uppercase before
/// expansion.  Returns `None` when `country` is not exactly two letters or
/// either argument contains a byte outside `[0-9A-Za-z]`.
///
/// # Examples
///
/// ```
/// use iban_core::check_digits::check_digits_for;
///
/// assert_eq!(
///     check_digits_for("GB", "WEST12345698765432").as_deref(),
///     Some("82"),
/// );
/// ```
pub fn check_digits_for(country: &str, bban: &str) -> Option<String> {
    let country = country.as_bytes();
    if country.len() != 2 || !country.iter().all(u8::is_ascii_alphabetic) {
        return None;
    }
    let mut remainder: u32 = 0;
    for &byte in bban.as_bytes().iter().chain(country).chain(b"00") {
        remainder = fold_mod97(remainder, byte.to_ascii_uppercase())?;
    }
    Some(format!("{:02}", 98 - remainder))
}
