//! Closed code point intervals and ordered interval lists.

use core::fmt::{self, Write as _};
use core::slice;

/// Largest valid Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x0010_FFFF;

/// A closed interval of code points, `start..=end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    start: u32,
    end: u32,
}

impl Interval {
    /// Create an interval, or `None` if the bounds are inverted or exceed `U+10FFFF`.
    pub const fn new(start: u32, end: u32) -> Option<Self> {
        if start <= end && end <= MAX_CODE_POINT {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// The single-point interval `cp..=cp`.
    pub const fn point(code_point: u32) -> Option<Self> {
        Self::new(code_point, code_point)
    }

    /// Lowest code point in the interval.
    pub const fn start(self) -> u32 {
        self.start
    }

    /// Highest code point in the interval.
    pub const fn end(self) -> u32 {
        self.end
    }

    /// Whether `code_point` lies inside the interval.
    pub const fn contains(self, code_point: u32) -> bool {
        self.start <= code_point && code_point <= self.end
    }

    /// Whether the two intervals share at least one code point.
    pub const fn overlaps(self, other: Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Iterate over every code point in the interval.
    pub fn code_points(self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(formatter, "u+{:x}", self.start)
        } else {
            write!(formatter, "u+{:x}-{:x}", self.start, self.end)
        }
    }
}

/// An ordered list of intervals, kept in insertion order.
///
/// Intervals are neither sorted nor merged, so equality is structural: `u+0,u+1`
/// and `u+0-1` cover the same code points but are different sets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }

    /// Append an interval at the end.
    pub fn push(&mut self, interval: Interval) {
        self.intervals.push(interval);
    }

    /// Iterate over the intervals in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Number of intervals (not code points).
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether the set holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Whether any code point belongs to one of the intervals.
    pub fn contains(&self, code_point: u32) -> bool {
        self.intervals
            .iter()
            .any(|interval| interval.contains(code_point))
    }

    /// Whether any interval of `self` overlaps any interval of `other`.
    pub fn intersects(&self, other: &Self) -> bool {
        self.intervals.iter().any(|lhs| {
            other
                .intervals
                .iter()
                .any(|rhs| lhs.overlaps(*rhs))
        })
    }

    /// Whether the union of the intervals is exactly `U+0..=U+10FFFF`.
    pub fn covers_all(&self) -> bool {
        let mut sorted = self.intervals.clone();
        sorted.sort_unstable_by_key(|interval| interval.start);
        // Next code point not yet covered.
        let mut next: u32 = 0;
        for interval in sorted {
            if interval.start > next {
                return false;
            }
            if interval.end >= MAX_CODE_POINT {
                return true;
            }
            next = next.max(interval.end + 1);
        }
        false
    }

    /// Serialize as comma-separated lowercase `u+` tokens with no leading zeros.
    pub fn to_canonical_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for IntervalSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, interval) in self.intervals.iter().enumerate() {
            if index > 0 {
                formatter.write_char(',')?;
            }
            fmt::Display::fmt(interval, formatter)?;
        }
        Ok(())
    }
}

impl FromIterator<Interval> for IntervalSet {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        Self {
            intervals: iter.into_iter().collect(),
        }
    }
}

impl<'set> IntoIterator for &'set IntervalSet {
    type Item = &'set Interval;
    type IntoIter = slice::Iter<'set, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
