//! UTF-16 encoding of single code points.

use super::interval::{Interval, MAX_CODE_POINT};

const SURROGATE_OFFSET: u32 = 0x1_0000;
const HIGH_SURROGATE_BASE: u32 = 0xD800;
const LOW_SURROGATE_BASE: u32 = 0xDC00;

/// A code point encoded as one or two UTF-16 code units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EncodedCodePoint {
    units: [u16; 2],
    len: usize,
}

impl EncodedCodePoint {
    /// The code units, one for the BMP and two (a surrogate pair) above it.
    pub fn as_units(&self) -> &[u16] {
        self.units.get(..self.len).unwrap_or(&[])
    }

    /// Whether the encoding is a surrogate pair.
    pub const fn is_surrogate_pair(&self) -> bool {
        self.len == 2
    }

    /// The encoded text, or `None` for a lone surrogate which has no `char` form.
    pub fn to_char(&self) -> Option<char> {
        char::decode_utf16(self.as_units().iter().copied())
            .next()
            .and_then(Result::ok)
    }
}

/// Encode `code_point` as UTF-16.
///
/// Code points up to `U+FFFF` (control characters and lone surrogates included) map to
/// themselves as a single unit; anything above is split into a surrogate pair.
/// Returns `None` above `U+10FFFF`.
pub fn encode_code_point(code_point: u32) -> Option<EncodedCodePoint> {
    if code_point > MAX_CODE_POINT {
        return None;
    }
    if code_point < SURROGATE_OFFSET {
        return Some(EncodedCodePoint {
            units: [code_point as u16, 0],
            len: 1,
        });
    }
    let offset = code_point - SURROGATE_OFFSET;
    let high = HIGH_SURROGATE_BASE + (offset >> 10);
    let low = LOW_SURROGATE_BASE + (offset & 0x3FF);
    Some(EncodedCodePoint {
        units: [high as u16, low as u16],
        len: 2,
    })
}

/// Whether `code_point` is skipped when building probe strings: C0 controls, space and DEL.
pub const fn is_control(code_point: u32) -> bool {
    code_point <= 0x20 || code_point == 0x7F
}

/// Whether every code point of `interval` is skipped by [`is_control`].
pub const fn is_control_only(interval: Interval) -> bool {
    interval.end() <= 0x20 || (interval.start() == 0x7F && interval.end() == 0x7F)
}
