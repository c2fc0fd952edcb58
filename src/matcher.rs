use log::debug;
use memchr::{memchr, memchr2, memchr3};

use crate::builder::MatcherBuilder;
use crate::captures::{Captures, Slots, Span};
use crate::dfa::DFA;
use crate::error::Result;

/// A compiled pattern, ready for matching.
///
/// A matcher owns the DFA compiled from a pattern and drives it over
/// input strings. All searching is a tight loop over (state, position,
/// capture slots); there is no backtracking and the stack depth is
/// constant. A matcher is immutable and can be shared freely across
/// threads.
#[derive(Clone, Debug)]
pub struct Matcher {
    dfa: DFA,
    /// When the start state is not accepting and the characters that
    /// can lead anywhere from it are at most three ASCII bytes, those
    /// bytes. Searching then skips non-viable start offsets with
    /// memchr instead of stepping the automaton.
    start_bytes: Option<Vec<u8>>,
}

impl Matcher {
    /// Compile the given pattern with the default configuration.
    ///
    /// Use a [`MatcherBuilder`] to pick a non-default configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use pyre::Matcher;
    ///
    /// # fn example() -> Result<(), pyre::Error> {
    /// let m = Matcher::new("foo|bar")?;
    /// assert!(m.is_match("xxbarxx"));
    /// # Ok(()) } example().unwrap()
    /// ```
    pub fn new(pattern: &str) -> Result<Matcher> {
        MatcherBuilder::new().build(pattern)
    }

    pub(crate) fn from_dfa(dfa: DFA) -> Matcher {
        let start_bytes = start_bytes(&dfa);
        if let Some(ref bytes) = start_bytes {
            debug!("search accelerated over start bytes {:?}", bytes);
        }
        Matcher { dfa, start_bytes }
    }

    /// The underlying DFA.
    pub fn dfa(&self) -> &DFA {
        &self.dfa
    }

    /// Returns true if and only if a match exists anywhere in the
    /// input.
    pub fn is_match(&self, input: &str) -> bool {
        self.search(input).is_some()
    }

    /// Match anchored at the start of the input, preferring the longest
    /// accepting prefix. Returns the capture spans recorded at that
    /// prefix, or `None` if no prefix of the input matches.
    ///
    /// # Example
    ///
    /// ```
    /// use pyre::Matcher;
    ///
    /// # fn example() -> Result<(), pyre::Error> {
    /// let m = Matcher::new("a*")?;
    /// let caps = m.find("aaab").unwrap();
    /// assert_eq!(caps.span().range(), 0..3);
    /// # Ok(()) } example().unwrap()
    /// ```
    pub fn find(&self, input: &str) -> Option<Captures> {
        self.find_at(input, 0)
    }

    /// Match the entire input: succeeds only when the whole string is
    /// in the pattern's language.
    pub fn fullmatch(&self, input: &str) -> Option<Captures> {
        let dfa = &self.dfa;
        let mut state = dfa.start();
        let mut slots = Slots::new(dfa.group_count());
        for (pos, ch) in input.char_indices() {
            let tr = match dfa.transition(state, ch) {
                None => return None,
                Some(tr) => tr,
            };
            if dfa.is_dead_state(tr.next()) {
                return None;
            }
            for &edit in tr.edits() {
                slots.apply(edit, pos, pos + ch.len_utf8());
            }
            state = tr.next();
        }
        if dfa.is_match_state(state) {
            Some(slots.snapshot(Span { start: 0, end: input.len() }))
        } else {
            None
        }
    }

    /// The leftmost match in the input, scanning start offsets from
    /// the beginning. Equivalent to `find_iter(input).next()`.
    pub fn search(&self, input: &str) -> Option<Captures> {
        self.find_iter(input).next()
    }

    /// Iterate over all non-overlapping matches, left to right. After
    /// a match the scan resumes at its end offset, stepping one
    /// character instead when the match was empty so that the iterator
    /// always makes progress.
    ///
    /// # Example
    ///
    /// ```
    /// use pyre::Matcher;
    ///
    /// # fn example() -> Result<(), pyre::Error> {
    /// let m = Matcher::new("a+")?;
    /// let spans: Vec<_> =
    ///     m.find_iter("baaxa").map(|c| c.span().range()).collect();
    /// assert_eq!(spans, vec![1..3, 4..5]);
    /// # Ok(()) } example().unwrap()
    /// ```
    pub fn find_iter<'m, 't>(&'m self, input: &'t str) -> FindMatches<'m, 't> {
        FindMatches { matcher: self, input, at: 0 }
    }

    /// Anchored longest-prefix match starting at the given byte offset.
    ///
    /// Capture slots are snapshotted at every accepting position, so
    /// the spans reported for the longest prefix are exactly the state
    /// the automaton had recorded when it read that prefix.
    fn find_at(&self, input: &str, at: usize) -> Option<Captures> {
        let dfa = &self.dfa;
        let mut state = dfa.start();
        if dfa.is_dead_state(state) {
            return None;
        }
        let mut slots = Slots::new(dfa.group_count());
        let mut last = if dfa.is_match_state(state) {
            Some(slots.snapshot(Span { start: at, end: at }))
        } else {
            None
        };
        for (i, ch) in input[at..].char_indices() {
            let pos = at + i;
            let next_pos = pos + ch.len_utf8();
            let tr = match dfa.transition(state, ch) {
                None => break,
                Some(tr) => tr,
            };
            if dfa.is_dead_state(tr.next()) {
                break;
            }
            for &edit in tr.edits() {
                slots.apply(edit, pos, next_pos);
            }
            state = tr.next();
            if dfa.is_match_state(state) {
                last = Some(slots.snapshot(Span { start: at, end: next_pos }));
            }
        }
        last
    }

    /// The smallest offset at or after `at` whose first character does
    /// not lead straight to the dead state. Returns a value past the
    /// input's length when no such offset exists.
    fn advance(&self, input: &str, at: usize) -> usize {
        if let Some(ref bytes) = self.start_bytes {
            let haystack = &input.as_bytes()[at..];
            let found = match *bytes.as_slice() {
                [a] => memchr(a, haystack),
                [a, b] => memchr2(a, b, haystack),
                [a, b, c] => memchr3(a, b, c, haystack),
                _ => unreachable!("start_bytes holds 1 to 3 bytes"),
            };
            return match found {
                Some(i) => at + i,
                None => input.len() + 1,
            };
        }
        let start = self.dfa.start();
        for (i, ch) in input[at..].char_indices() {
            if let Some(tr) = self.dfa.transition(start, ch) {
                if !self.dfa.is_dead_state(tr.next()) {
                    return at + i;
                }
            }
        }
        input.len() + 1
    }
}

/// An iterator over the non-overlapping matches in an input string.
///
/// `'m` is the lifetime of the matcher and `'t` the lifetime of the
/// input.
#[derive(Debug)]
pub struct FindMatches<'m, 't> {
    matcher: &'m Matcher,
    input: &'t str,
    at: usize,
}

impl<'m, 't> Iterator for FindMatches<'m, 't> {
    type Item = Captures;

    fn next(&mut self) -> Option<Captures> {
        let len = self.input.len();
        let dfa = self.matcher.dfa();
        let start_is_match = dfa.is_match_state(dfa.start());
        while self.at <= len {
            if !start_is_match {
                // A match needs at least one character; skip offsets
                // whose first character is hopeless.
                if self.at >= len {
                    return None;
                }
                self.at = self.matcher.advance(self.input, self.at);
                if self.at > len {
                    return None;
                }
            }
            match self.matcher.find_at(self.input, self.at) {
                Some(caps) => {
                    let span = caps.span();
                    self.at = if span.is_empty() {
                        step(self.input, span.end)
                    } else {
                        span.end
                    };
                    return Some(caps);
                }
                None => {
                    self.at = step(self.input, self.at);
                }
            }
        }
        None
    }
}

/// The next char boundary after `at`, or one past the end.
fn step(input: &str, at: usize) -> usize {
    if at >= input.len() {
        return at + 1;
    }
    at + input[at..].chars().next().map_or(1, char::len_utf8)
}

/// Compute the accelerator bytes for a DFA, if it qualifies: a
/// non-accepting start state whose live transitions cover at most
/// three characters, all ASCII.
fn start_bytes(dfa: &DFA) -> Option<Vec<u8>> {
    let start = dfa.start();
    if dfa.is_dead_state(start) || dfa.is_match_state(start) {
        return None;
    }
    let mut bytes = vec![];
    for tr in dfa.transitions(start) {
        if dfa.is_dead_state(tr.next()) {
            continue;
        }
        for range in tr.class().ranges() {
            let (lo, hi) = (range.start() as u32, range.end() as u32);
            if hi > 0x7F || bytes.len() as u32 + (hi - lo) + 1 > 3 {
                return None;
            }
            for b in lo..=hi {
                bytes.push(b as u8);
            }
        }
    }
    if bytes.is_empty() {
        None
    } else {
        Some(bytes)
    }
}
