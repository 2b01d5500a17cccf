//! Layout descriptor compiler for country-specific BBAN structures.
//!
//! A layout descriptor is a compact string of tokens, each a single class
//! tag followed by a two-digit repeat count: `F04A12` means four digit
//! characters then twelve alphanumeric characters.  [`BbanLayout::compile`]
//! parses a descriptor into an ordered sequence of [`Segment`]s once, so the
//! hot validation path never re-reads descriptor strings;
//! [`BbanLayout::matches`] then checks a candidate against the compiled
//! sequence directly, without a regular-expression engine.
//!
//! A descriptor that cannot be parsed is a [`LayoutError`], reported
//! separately from a candidate that merely fails to match.

use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// LayoutError
// ---------------------------------------------------------------------------

/// Errors produced when compiling a layout descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A token began with a character that is not one of the seven class tags.
    UnknownClassTag {
        /// The unrecognised tag character.
        tag: char,
        /// Byte offset of the tag within the descriptor.
        offset: usize,
    },
    /// The two decimal digits of a repeat count were missing or malformed.
    MalformedRepeatCount {
        /// Byte offset where the two-digit count was expected.
        offset: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownClassTag { tag, offset } => {
                write!(f, "unknown class tag {tag:?} at offset {offset}")
            }
            Self::MalformedRepeatCount { offset } => {
                write!(f, "expected a two-digit repeat count at offset {offset}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

// ---------------------------------------------------------------------------
// CharClass
// ---------------------------------------------------------------------------

/// One of the seven character classes a layout segment can require.
///
/// The tag letters are the ones used by the descriptor grammar; the set is
/// closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CharClass {
    /// Tag `F`: `0-9`.
    Digit,
    /// Tag `L`: `a-z`.
    LowerLetter,
    /// Tag `U`: `A-Z`.
    UpperLetter,
    /// Tag `A`: `0-9A-Za-z`.
    Alphanumeric,
    /// Tag `B`: `0-9A-Z`.
    UpperAlphanumeric,
    /// Tag `C`: `A-Za-z`.
    Letter,
    /// Tag `W`: `0-9a-z`.
    LowerAlphanumeric,
}

impl CharClass {
    /// Maps a descriptor tag byte to its class, or `None` for an unknown tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'F' => Some(Self::Digit),
            b'L' => Some(Self::LowerLetter),
            b'U' => Some(Self::UpperLetter),
            b'A' => Some(Self::Alphanumeric),
            b'B' => Some(Self::UpperAlphanumeric),
            b'C' => Some(Self::Letter),
            b'W' => Some(Self::LowerAlphanumeric),
            _ => None,
        }
    }

    /// The descriptor tag letter for this class.
    pub fn tag(self) -> char {
        match self {
            Self::Digit => 'F',
            Self::LowerLetter => 'L',
            Self::UpperLetter => 'U',
            Self::Alphanumeric => 'A',
            Self::UpperAlphanumeric => 'B',
            Self::Letter => 'C',
            Self::LowerAlphanumeric => 'W',
        }
    }

    /// Returns `true` if `byte` belongs to this class.
    pub fn contains(self, byte: u8) -> bool {
        match self {
            Self::Digit => byte.is_ascii_digit(),
            Self::LowerLetter => byte.is_ascii_lowercase(),
            Self::UpperLetter => byte.is_ascii_uppercase(),
            Self::Alphanumeric => byte.is_ascii_alphanumeric(),
            Self::UpperAlphanumeric => byte.is_ascii_digit() || byte.is_ascii_uppercase(),
            Self::Letter => byte.is_ascii_alphabetic(),
            Self::LowerAlphanumeric => byte.is_ascii_digit() || byte.is_ascii_lowercase(),
        }
    }
}

// ---------------------------------------------------------------------------
// Segment / BbanLayout
// ---------------------------------------------------------------------------

/// One compiled descriptor token: exactly `count` characters from `class`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// The character class every character of the segment must belong to.
    pub class: CharClass,
    /// Exact number of characters the segment covers.
    pub count: usize,
}

/// A compiled BBAN layout: an ordered sequence of [`Segment`]s.
///
/// Matching is purely structural.  A candidate matches when it is exactly
/// the concatenation, in order, of `count` characters from each segment's
/// class — no more, no fewer, no gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BbanLayout {
    segments: Vec<Segment>,
}

impl BbanLayout {
    /// Compiles a descriptor string into a layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownClassTag`] for a tag outside
    /// `{F, L, U, A, B, C, W}` and [`LayoutError::MalformedRepeatCount`]
    /// when a tag is not followed by exactly two decimal digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use iban_core::layout::BbanLayout;
    ///
    /// let layout = BbanLayout::compile("U04F06F08")?;
    /// assert_eq!(layout.total_len(), 18);
    /// assert!(layout.matches("WEST12345698765432"));
    /// assert!(!layout.matches("WE5T12345698765432"));
    /// # Ok::<(), iban_core::LayoutError>(())
    /// ```
    pub fn compile(descriptor: &str) -> Result<Self, LayoutError> {
        let bytes = descriptor.as_bytes();
        let mut segments = Vec::with_capacity(bytes.len() / 3);
        let mut offset = 0;
        while offset < bytes.len() {
            let Some(class) = CharClass::from_tag(bytes[offset]) else {
                return Err(LayoutError::UnknownClassTag {
                    tag: char::from(bytes[offset]),
                    offset,
                });
            };
            let count = match (bytes.get(offset + 1), bytes.get(offset + 2)) {
                (Some(&tens), Some(&ones)) if tens.is_ascii_digit() && ones.is_ascii_digit() => {
                    usize::from(tens - b'0') * 10 + usize::from(ones - b'0')
                }
                _ => return Err(LayoutError::MalformedRepeatCount { offset: offset + 1 }),
            };
            segments.push(Segment { class, count });
            offset += 3;
        }
        Ok(Self { segments })
    }

    /// A layout with no segments; it matches only the empty candidate.
    pub(crate) fn empty() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns `true` if `candidate` is exactly the concatenation of the
    /// compiled segments.
    pub fn matches(&self, candidate: &str) -> bool {
        let bytes = candidate.as_bytes();
        if bytes.len() != self.total_len() {
            return false;
        }
        let mut rest = bytes;
        for segment in &self.segments {
            let (head, tail) = rest.split_at(segment.count);
            if !head.iter().all(|&byte| segment.class.contains(byte)) {
                return false;
            }
            rest = tail;
        }
        true
    }

    /// Sum of all repeat counts: the exact candidate length this layout accepts.
    pub fn total_len(&self) -> usize {
        self.segments.iter().map(|segment| segment.count).sum()
    }

    /// The compiled segments, in descriptor order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
