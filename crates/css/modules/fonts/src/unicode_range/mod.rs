//! Spec: <https://www.w3.org/TR/css-fonts-4/#unicode-range-desc>
//!
//! A descriptor is parsed into an [`IntervalSet`] in token order. Serialization always
//! expands wildcards, so `u+0?` round-trips as `u+0-f`.

mod encode;
mod interval;

use crate::error::UnicodeRangeError;
use core::fmt;
use core::str::FromStr;
use log::trace;
use std::collections::BTreeSet;

pub use encode::{EncodedCodePoint, encode_code_point, is_control};
pub use interval::{Interval, IntervalSet, MAX_CODE_POINT};

/// Probe string used when the descriptor covers all of Unicode.
pub const DEFAULT_TEST_STRING: &str = "BESbswy";

/// Maximum number of code points in a derived probe string.
const MAX_TEST_STRING_LENGTH: usize = 7;

/// Maximum number of hex digits (including `?` wildcards) in one bound.
const MAX_HEX_DIGITS: usize = 6;

/// A parsed `unicode-range` descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnicodeRange {
    ranges: IntervalSet,
}

impl UnicodeRange {
    /// The descriptor covering every code point, `u+0-10ffff`.
    pub fn full() -> Self {
        Self {
            ranges: Interval::new(0, MAX_CODE_POINT).into_iter().collect(),
        }
    }

    /// Parse descriptor text such as `u+0-7f,u+4e??`.
    ///
    /// # Errors
    /// Returns [`UnicodeRangeError`] if the text is empty, a token is malformed, a bound
    /// exceeds `U+10FFFF`, or a range is incomplete or inverted.
    pub fn parse(text: &str) -> Result<Self, UnicodeRangeError> {
        if text.trim().is_empty() {
            return Err(UnicodeRangeError::Empty);
        }
        let mut ranges = IntervalSet::new();
        for token in text.split(',') {
            let interval = parse_token(token.trim())?;
            trace!("unicode-range token `{}` -> {interval}", token.trim());
            ranges.push(interval);
        }
        Ok(Self { ranges })
    }

    /// Build the descriptor of the distinct code points of `text`, one point each, ascending.
    pub fn parse_string(text: &str) -> Self {
        Self::from_code_points(text.chars().map(u32::from))
    }

    /// Like [`UnicodeRange::parse_string`] over raw UTF-16.
    ///
    /// Valid surrogate pairs become one code point; lone surrogates are kept as-is.
    pub fn parse_utf16(units: &[u16]) -> Self {
        Self::from_code_points(char::decode_utf16(units.iter().copied()).map(|decoded| {
            decoded.map_or_else(|err| u32::from(err.unpaired_surrogate()), u32::from)
        }))
    }

    fn from_code_points(code_points: impl Iterator<Item = u32>) -> Self {
        let distinct: BTreeSet<u32> = code_points.collect();
        Self {
            ranges: distinct.into_iter().filter_map(Interval::point).collect(),
        }
    }

    /// The intervals of the descriptor, in parse order.
    pub const fn ranges(&self) -> &IntervalSet {
        &self.ranges
    }

    /// Whether the descriptor covers every code point.
    pub fn is_full(&self) -> bool {
        self.ranges.covers_all()
    }

    /// Whether `code_point` is covered by the descriptor.
    pub fn contains(&self, code_point: u32) -> bool {
        self.ranges.contains(code_point)
    }

    /// Whether the two descriptors share at least one code point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.ranges.intersects(&other.ranges)
    }

    /// Derive a short probe string from the covered code points.
    ///
    /// The full range yields [`DEFAULT_TEST_STRING`]. Otherwise the first seven
    /// non-control code points are taken in interval order; the result is empty when
    /// only control characters are covered. Lone surrogates cannot be part of a
    /// `String` and are skipped like control characters.
    pub fn test_string(&self) -> String {
        if self.is_full() {
            return DEFAULT_TEST_STRING.to_owned();
        }
        let mut out = String::new();
        let mut count = 0_usize;
        for interval in self.ranges.iter().filter(|interval| !encode::is_control_only(**interval)) {
            for code_point in interval.code_points().filter(|code_point| !is_control(*code_point)) {
                let Some(character) = encode_code_point(code_point).and_then(|enc| enc.to_char())
                else {
                    continue;
                };
                out.push(character);
                count += 1;
                if count >= MAX_TEST_STRING_LENGTH {
                    return out;
                }
            }
        }
        out
    }
}

impl fmt::Display for UnicodeRange {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.ranges, formatter)
    }
}

impl FromStr for UnicodeRange {
    type Err = UnicodeRangeError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

/// Parse one comma-separated token: `u+hex`, `u+hex?..`, or `u+hex-hex`.
fn parse_token(token: &str) -> Result<Interval, UnicodeRangeError> {
    let syntax = || UnicodeRangeError::Syntax {
        token: token.to_owned(),
    };
    let body = token
        .get(..2)
        .filter(|prefix| prefix.eq_ignore_ascii_case("u+"))
        .and_then(|_| token.get(2..))
        .ok_or_else(syntax)?;

    if let Some((start_text, end_text)) = body.split_once('-') {
        if end_text.is_empty() {
            return Err(UnicodeRangeError::MissingEnd {
                token: token.to_owned(),
            });
        }
        let start = parse_hex(start_text, token)?;
        let end = parse_hex(end_text, token)?;
        return Interval::new(start, end).ok_or(UnicodeRangeError::Inverted { start, end });
    }

    let digits = body.trim_end_matches('?');
    let wildcards = body.len() - digits.len();
    if wildcards == 0 {
        let code_point = parse_hex(body, token)?;
        return Interval::point(code_point).ok_or_else(|| UnicodeRangeError::OutOfRange {
            token: token.to_owned(),
        });
    }
    if body.len() > MAX_HEX_DIGITS {
        return Err(UnicodeRangeError::WildcardOutOfRange {
            token: token.to_owned(),
        });
    }
    let prefix = if digits.is_empty() {
        0
    } else {
        parse_hex(digits, token)?
    };
    // Each `?` contributes one nibble of uncertainty.
    let shift = 4 * wildcards as u32;
    let start = prefix << shift;
    let end = start | ((1_u32 << shift) - 1);
    Interval::new(start, end).ok_or_else(|| UnicodeRangeError::WildcardOutOfRange {
        token: token.to_owned(),
    })
}

/// Parse one bound of 1 to 6 hex digits.
fn parse_hex(digits: &str, token: &str) -> Result<u32, UnicodeRangeError> {
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(UnicodeRangeError::Syntax {
            token: token.to_owned(),
        });
    }
    if digits.len() > MAX_HEX_DIGITS {
        return Err(UnicodeRangeError::OutOfRange {
            token: token.to_owned(),
        });
    }
    let value = u32::from_str_radix(digits, 16).map_err(|_| UnicodeRangeError::Syntax {
        token: token.to_owned(),
    })?;
    if value > MAX_CODE_POINT {
        return Err(UnicodeRangeError::OutOfRange {
            token: token.to_owned(),
        });
    }
    Ok(value)
}
