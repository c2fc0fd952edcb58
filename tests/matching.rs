use pyre::{Matcher, MatcherBuilder};

fn matcher(pattern: &str) -> Matcher {
    Matcher::new(pattern)
        .unwrap_or_else(|e| panic!("failed to compile '{}': {}", pattern, e))
}

/// Whole-string membership, for comparing languages.
fn fullmatches(pattern: &str, input: &str) -> bool {
    matcher(pattern).fullmatch(input).is_some()
}

fn spans(pattern: &str, input: &str) -> Vec<(usize, usize)> {
    matcher(pattern)
        .find_iter(input)
        .map(|c| (c.span().start, c.span().end))
        .collect()
}

#[test]
fn anchored_match_with_group() {
    let caps = matcher("(a|b)c").find("ac").unwrap();
    assert_eq!(caps.span().range(), 0..2);
    assert_eq!(caps.group(1).map(|s| s.range()), Some(0..1));
}

#[test]
fn search_all_with_group() {
    let m = matcher("(a|b)c");
    let all: Vec<_> = m.find_iter("xxbcxx").collect();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].span().range(), 2..4);
    assert_eq!(all[0].group(1).map(|s| s.range()), Some(2..3));
}

#[test]
fn match_prefers_longest_prefix() {
    let caps = matcher("a*").find("aaa").unwrap();
    assert_eq!(caps.span().range(), 0..3);
    let caps = matcher("a*").find("aaab").unwrap();
    assert_eq!(caps.span().range(), 0..3);
}

#[test]
fn complement_and_intersection() {
    let caps = matcher(".*&~.*bad.*").find("good things").unwrap();
    assert_eq!(caps.span().range(), 0..11);
    // The longest prefix of a string containing "bad" stops before the
    // forbidden word completes.
    let m = matcher(".*&~.*bad.*");
    assert!(m.fullmatch("so bad").is_none());
    assert!(m.fullmatch("so bud").is_some());
}

#[test]
fn starred_group_keeps_last_iteration() {
    let caps = matcher("(x)*").find("xxx").unwrap();
    assert_eq!(caps.span().range(), 0..3);
    assert_eq!(caps.group(1).map(|s| s.range()), Some(2..3));
}

#[test]
fn failed_search_is_none() {
    assert!(matcher("a+").search("bbb").is_none());
    assert!(matcher("a+").find_iter("bbb").next().is_none());
}

#[test]
fn search_finds_leftmost() {
    let caps = matcher("ab").search("xxabxab").unwrap();
    assert_eq!(caps.span().range(), 2..4);
}

#[test]
fn find_iter_is_non_overlapping_and_ordered() {
    assert_eq!(spans("ab", "ababab"), vec![(0, 2), (2, 4), (4, 6)]);
    assert_eq!(spans("aa", "aaaa"), vec![(0, 2), (2, 4)]);
}

#[test]
fn find_iter_empty_match_progress() {
    // Matches Python's re.findall('a*', ...) segmentation.
    assert_eq!(spans("a*", "aab"), vec![(0, 2), (2, 2), (3, 3)]);
    assert_eq!(spans("a*", "bbb"), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    assert_eq!(spans("a*", ""), vec![(0, 0)]);
}

#[test]
fn spans_are_byte_offsets() {
    // α and β are two bytes each in UTF-8.
    let caps = matcher("[α-ω]+").search("xαβx").unwrap();
    assert_eq!(caps.span().range(), 1..5);
    assert_eq!(&"xαβx"[caps.span().range()], "αβ");
}

#[test]
fn intersection_trivial() {
    assert!(fullmatches("a & a", "a"));
    assert!(!fullmatches("a & a", ""));
    assert!(!fullmatches("a & a", "b"));
    assert!(!fullmatches("a & a", "aa"));
}

#[test]
fn intersection_of_disjoint_is_empty() {
    for input in ["", "a", "b", "ab"] {
        assert!(!fullmatches("a & b", input));
    }
}

#[test]
fn intersection_over_union() {
    // (a|b) & (b|c) accepts exactly "b".
    assert!(!fullmatches("(a|b) & (b|c)", "a"));
    assert!(fullmatches("(a|b) & (b|c)", "b"));
    assert!(!fullmatches("(a|b) & (b|c)", "c"));
    assert!(!fullmatches("(a|b) & (b|c)", ""));
    assert!(!fullmatches("(a|b) & (b|c)", "bb"));
}

#[test]
fn intersection_with_star() {
    // (a|b)* & a* accepts exactly a*.
    for (input, expected) in [
        ("", true),
        ("a", true),
        ("aa", true),
        ("b", false),
        ("ab", false),
        ("ba", false),
    ] {
        assert_eq!(fullmatches("(a|b)* & a*", input), expected, "{:?}", input);
    }
}

#[test]
fn complement_of_literal() {
    assert!(!fullmatches("~a", "a"));
    assert!(fullmatches("~a", ""));
    assert!(fullmatches("~a", "b"));
    assert!(fullmatches("~a", "aa"));
    assert!(fullmatches("~a", "ab"));
}

#[test]
fn double_complement() {
    assert!(fullmatches("~~a", "a"));
    assert!(!fullmatches("~~a", ""));
    assert!(!fullmatches("~~a", "b"));
}

#[test]
fn complement_agrees_with_de_morgan() {
    for input in ["", "a", "b", "c", "aa", "ab", "ba", "bb"] {
        assert_eq!(
            fullmatches("~(a|b)", input),
            fullmatches("~a & ~b", input),
            "{:?}",
            input,
        );
    }
}

#[test]
fn difference() {
    // (a|ab) - a accepts exactly "ab".
    assert!(!fullmatches("(a|ab) - a", ""));
    assert!(!fullmatches("(a|ab) - a", "a"));
    assert!(fullmatches("(a|ab) - a", "ab"));
    assert!(!fullmatches("(a|ab) - a", "b"));
    assert!(!fullmatches("(a|ab) - a", "aba"));
    // a - (a|b) is empty.
    for input in ["", "a", "b", "ab"] {
        assert!(!fullmatches("a - (a|b)", input));
    }
}

#[test]
fn symmetric_difference() {
    for input in ["", "a", "aa", "b"] {
        assert!(!fullmatches("a ^ a", input));
    }
    // (a|b) ^ a accepts exactly "b".
    assert!(!fullmatches("(a|b) ^ a", "a"));
    assert!(fullmatches("(a|b) ^ a", "b"));
    assert!(!fullmatches("(a|b) ^ a", ""));
    assert!(!fullmatches("(a|b) ^ a", "ab"));
}

#[test]
fn boolean_identities() {
    // a & b == a - (a - b)
    for input in ["", "a", "b", "ab"] {
        assert_eq!(
            fullmatches("a & b", input),
            fullmatches("a - (a - b)", input),
        );
    }
    // r ^ s == (r | s) - (r & s)
    for input in ["", "a", "b", "ab", "ba"] {
        assert_eq!(
            fullmatches("a ^ b", input),
            fullmatches("(a | b) - (a & b)", input),
        );
    }
}

#[test]
fn counted_repetition_agrees_with_sugar() {
    let samples = ["", "a", "aa", "aaa", "b", "baaa", "aaab"];
    for (counted, sugar) in [("a{0,}", "a*"), ("a{1,}", "a+"), ("a{0,1}", "a?")]
    {
        for input in samples {
            assert_eq!(
                fullmatches(counted, input),
                fullmatches(sugar, input),
                "{} vs {} on {:?}",
                counted,
                sugar,
                input,
            );
        }
    }
}

#[test]
fn exact_and_bounded_repetition() {
    for (input, expected) in
        [("", false), ("a", false), ("aa", false), ("aaa", true), ("aaaa", false)]
    {
        assert_eq!(fullmatches("a{3}", input), expected, "{:?}", input);
    }
    for (input, expected) in [
        ("", false),
        ("a", false),
        ("aa", true),
        ("aaa", true),
        ("aaaa", true),
        ("aaaaa", false),
    ] {
        assert_eq!(fullmatches("a{2,4}", input), expected, "{:?}", input);
    }
    for (input, expected) in [
        ("", false),
        ("ab", false),
        ("abab", true),
        ("ababab", true),
        ("abababab", true),
    ] {
        assert_eq!(fullmatches("(ab){2,}", input), expected, "{:?}", input);
    }
    for (input, expected) in
        [("", false), ("ab", true), ("abab", true), ("ababab", true), ("abababab", false)]
    {
        assert_eq!(fullmatches("(ab){1,3}", input), expected, "{:?}", input);
    }
}

#[test]
fn repetition_over_alternation() {
    for (input, expected) in [
        ("", false),
        ("a", false),
        ("b", false),
        ("ab", true),
        ("aba", true),
        ("abba", false),
        ("aaaa", false),
    ] {
        assert_eq!(fullmatches("(a|b){2,3}", input), expected, "{:?}", input);
    }
}

#[test]
fn search_with_bounded_repeat() {
    // Greedy: the longest run wins at the leftmost viable offset.
    let caps = matcher("a{2,3}").search("xxaaaxy").unwrap();
    assert_eq!(caps.span().range(), 2..5);

    let caps = matcher("(ab){2}").search("zzababzzab").unwrap();
    assert_eq!(caps.span().range(), 2..6);
}

#[test]
fn is_match_is_unanchored() {
    let m = matcher("needle");
    assert!(m.is_match("a needle in a haystack"));
    assert!(!m.is_match("nothing here"));
}

#[test]
fn matchers_are_shareable_across_threads() {
    let m = std::sync::Arc::new(matcher("(a|b)+c"));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let m = std::sync::Arc::clone(&m);
            std::thread::spawn(move || {
                let input = format!("{}abbac", "x".repeat(i));
                m.search(&input).map(|c| c.span().len())
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(5));
    }
}
