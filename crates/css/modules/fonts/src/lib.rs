//! CSS Fonts Module Level 4 — `@font-face` descriptors and `unicode-range`.
//! Spec: <https://www.w3.org/TR/css-fonts-4/>

mod error;
mod font_face;

/// Style-rule access for `@font-face` rules, in memory or owned by a host sheet.
pub mod rule;
/// The `unicode-range` descriptor: parsing, serialization and probe strings.
pub mod unicode_range;

pub use error::{RuleError, UnicodeRangeError};
pub use font_face::{FontFace, FontFaceDescriptors};
pub use rule::{FontFaceRule, MemorySheet, ParsedRule, RuleHost, RuleId, SheetRule};
pub use unicode_range::{
    DEFAULT_TEST_STRING, EncodedCodePoint, Interval, IntervalSet, MAX_CODE_POINT, UnicodeRange,
    encode_code_point,
};
