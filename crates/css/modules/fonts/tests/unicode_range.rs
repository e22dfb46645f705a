use css_fonts::{Interval, UnicodeRange, UnicodeRangeError, encode_code_point};

fn ranges(text: &str) -> Vec<(u32, u32)> {
    UnicodeRange::parse(text)
        .map(|range| {
            range
                .ranges()
                .iter()
                .map(|interval| (interval.start(), interval.end()))
                .collect()
        })
        .unwrap_or_default()
}

fn canonical(text: &str) -> String {
    UnicodeRange::parse(text)
        .map(|range| range.to_string())
        .unwrap_or_else(|err| panic!("failed to parse `{text}`: {err}"))
}

fn probe(text: &str) -> String {
    UnicodeRange::parse(text)
        .map(|range| range.test_string())
        .unwrap_or_else(|err| panic!("failed to parse `{text}`: {err}"))
}

fn intersects(left: &str, right: &str) -> bool {
    match (UnicodeRange::parse(left), UnicodeRange::parse(right)) {
        (Ok(lhs), Ok(rhs)) => lhs.intersects(&rhs),
        _ => panic!("failed to parse `{left}` or `{right}`"),
    }
}

#[test]
fn parses_single_code_points() {
    assert_eq!(ranges("u+0"), [(0, 0)]);
    assert_eq!(ranges("u+f"), [(15, 15)]);
    assert_eq!(ranges("U+F"), [(15, 15)]);
}

#[test]
fn parses_wildcards_and_ranges() {
    assert_eq!(ranges("u+0?"), [(0, 15)]);
    assert_eq!(ranges("u+00-ff"), [(0, 255)]);
    assert_eq!(ranges("u+0,u+f"), [(0, 0), (15, 15)]);
    assert_eq!(ranges("u+0?,u+f?"), [(0, 15), (240, 255)]);
    assert_eq!(ranges("u+00-ff,u+ff-fff"), [(0, 255), (255, 4095)]);
    assert_eq!(ranges("u+0-7f, u+100"), [(0, 127), (256, 256)]);
}

#[test]
fn rejects_malformed_descriptors() {
    assert_eq!(UnicodeRange::parse(""), Err(UnicodeRangeError::Empty));
    assert!(matches!(
        UnicodeRange::parse("not a range"),
        Err(UnicodeRangeError::Syntax { .. })
    ));
    assert!(matches!(
        UnicodeRange::parse("u+ffffffffffff"),
        Err(UnicodeRangeError::OutOfRange { .. })
    ));
    assert!(matches!(
        UnicodeRange::parse("u+ff-"),
        Err(UnicodeRangeError::MissingEnd { .. })
    ));
    assert!(matches!(
        UnicodeRange::parse("u+0,"),
        Err(UnicodeRangeError::Syntax { .. })
    ));
}

#[test]
fn serializes_canonically() {
    assert_eq!(canonical("u+ff"), "u+ff");
    assert_eq!(canonical("u+0"), "u+0");
    assert_eq!(canonical("u+0?"), "u+0-f");
    assert_eq!(canonical("u+00-ff"), "u+0-ff");
    assert_eq!(canonical("u+0,u+f"), "u+0,u+f");
    assert_eq!(canonical("U+4E??"), "u+4e00-4eff");
}

#[test]
fn canonical_text_is_stable_under_reparsing() {
    for text in ["u+0", "u+0?", "u+00-ff,u+ff-fff", "U+1F6??,u+a", "u+0-10ffff", "u+7-7"] {
        let once = canonical(text);
        assert_eq!(canonical(&once), once, "`{text}` did not stabilize");
    }
}

#[test]
fn single_point_and_unit_range_canonicalize_identically() {
    let point = UnicodeRange::parse("u+41");
    let unit = UnicodeRange::parse("u+41-41");
    assert_eq!(
        point.map(|range| range.to_string()),
        unit.map(|range| range.to_string())
    );
}

#[test]
fn parses_strings_into_distinct_code_points() {
    assert_eq!(UnicodeRange::parse_string("hello").to_string(), "u+65,u+68,u+6c,u+6f");
    assert_eq!(UnicodeRange::parse_string("1").to_string(), "u+31");
    assert_eq!(UnicodeRange::parse_string("中国").to_string(), "u+4e2d,u+56fd");
    assert_eq!(UnicodeRange::parse_string("a\u{1d306}bc").to_string(), "u+61,u+62,u+63,u+1d306");
}

#[test]
fn parses_utf16_with_surrogates() {
    let units = [0x61, 0xD834, 0xDF06, 0x62, 0x63, 0xD800];
    assert_eq!(
        UnicodeRange::parse_utf16(&units).to_string(),
        "u+61,u+62,u+63,u+d800,u+1d306"
    );
}

#[test]
fn encodes_code_points() {
    let chars = |code_point: u32| encode_code_point(code_point).and_then(|enc| enc.to_char());
    assert_eq!(chars(65), Some('A'));
    assert_eq!(chars(57), Some('9'));
    assert_eq!(chars(97), Some('a'));
    assert_eq!(chars(0), Some('\u{0}'));
    assert_eq!(chars(127), Some('\u{7f}'));
    assert_eq!(chars(20013), Some('\u{4e2d}'));
    assert_eq!(chars(119_558), Some('\u{1d306}'));

    let pair = encode_code_point(0x10_FFFF);
    assert_eq!(pair.as_ref().map(|enc| enc.as_units().to_vec()), Some(vec![0xDBFF, 0xDFFF]));
    assert!(pair.is_some_and(|enc| enc.is_surrogate_pair()));
}

#[test]
fn derives_test_strings() {
    assert_eq!(probe("u+0-10ffff"), "BESbswy");
    assert_eq!(probe("u+41-5a"), "ABCDEFG");
    assert_eq!(probe("u+41,u+48,u+53-5a"), "AHSTUVW");
    assert_eq!(probe("u+41"), "A");
    assert_eq!(probe("u+41,u+48"), "AH");
    assert_eq!(probe("u+00"), "");
    assert_eq!(probe("u+0-ff"), "!\"#$%&'");
    assert_eq!(probe("u+4e2d,u+56fd"), "\u{4e2d}\u{56fd}");
    assert_eq!(probe("u+1d306"), "\u{1d306}");
    assert_eq!(UnicodeRange::full().test_string(), "BESbswy");
}

#[test]
fn intersection_is_symmetric() {
    let cases = [
        ("u+0", "u+0", true),
        ("u+0-2", "u+2", true),
        ("u+0", "u+1", false),
        ("u+0-5", "u+6", false),
        ("u+0,u+2", "u+2,u+0", true),
        ("u+0-2,u+3", "u+3", true),
        ("u+0,u+2", "u+1", false),
    ];
    for (left, right, expected) in cases {
        assert_eq!(intersects(left, right), expected, "{left} ∩ {right}");
        assert_eq!(intersects(right, left), expected, "{right} ∩ {left}");
    }
}

#[test]
fn interval_contains_is_inclusive() {
    let interval = Interval::new(0x41, 0x5A);
    assert!(interval.is_some_and(|range| range.contains(0x41) && range.contains(0x5A)));
    assert!(interval.is_some_and(|range| !range.contains(0x5B)));
}

#[test]
fn descriptor_membership_follows_its_intervals() {
    let latin: UnicodeRange = "u+0-7f, u+4e??".parse().unwrap();
    assert_eq!(latin.ranges().len(), 2);
    assert!(!latin.ranges().is_empty());
    assert!(latin.contains(0x41));
    assert!(latin.contains(0x4E00) && latin.contains(0x4EFF));
    assert!(!latin.contains(0x80));
    assert!(!latin.is_full());

    let split: UnicodeRange = "u+80-10ffff,u+0-7f".parse().unwrap();
    assert!(split.is_full());
    assert_eq!(split.test_string(), "BESbswy");
}
