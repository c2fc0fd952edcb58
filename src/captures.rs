use std::fmt;

/// The range of a match or of a capture group, as byte offsets into the
/// input. The end offset is exclusive, so a span can index the haystack
/// directly.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Span {
    /// The starting byte offset, inclusive.
    pub start: usize,
    /// The ending byte offset, exclusive.
    pub end: usize,
}

impl Span {
    /// The number of bytes spanned.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if and only if this is a zero-width span.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// This span as a range, for slicing.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A capture edit carried on a DFA transition.
///
/// An edit is a group index paired with an open/close flag, packed into
/// a single word: the index is shifted left one bit and the low bit
/// distinguishes close from open. Transitions carry short ordered lists
/// of these.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Edit(u32);

impl Edit {
    /// An edit recording entry into the given group.
    pub fn open(group: u32) -> Edit {
        Edit(group << 1)
    }

    /// An edit recording completion of the given group.
    pub fn close(group: u32) -> Edit {
        Edit((group << 1) | 1)
    }

    /// The group index this edit applies to.
    pub fn group(&self) -> u32 {
        self.0 >> 1
    }

    /// Returns true if and only if this is an open edit.
    pub fn is_open(&self) -> bool {
        self.0 & 1 == 0
    }
}

impl fmt::Debug for Edit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_open() {
            write!(f, "Open({})", self.group())
        } else {
            write!(f, "Close({})", self.group())
        }
    }
}

/// The spans recorded for one match.
///
/// Index 0 is the whole match and is always present. Indexes 1 through
/// `group_len() - 1` are the pattern's capture groups; a group that did
/// not participate in the match (or that matched only the empty string)
/// is `None`.
#[derive(Clone, Eq, PartialEq)]
pub struct Captures {
    spans: Vec<Option<Span>>,
}

impl Captures {
    /// The span of the whole match.
    pub fn span(&self) -> Span {
        self.spans[0].expect("group 0 is always present")
    }

    /// The span of the capture group with the given index, if it
    /// participated in the match. Index 0 is the whole match.
    pub fn group(&self, index: usize) -> Option<Span> {
        self.spans.get(index).copied().flatten()
    }

    /// The total number of groups, including group 0. This is one more
    /// than the number of capturing groups in the pattern, regardless
    /// of how many participated in the match.
    pub fn group_len(&self) -> usize {
        self.spans.len()
    }

    /// Iterate over all group spans, starting with group 0.
    pub fn iter(&self) -> impl Iterator<Item = Option<Span>> + '_ {
        self.spans.iter().copied()
    }
}

impl fmt::Debug for Captures {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut map = f.debug_map();
        for (i, span) in self.spans.iter().enumerate() {
            if let Some(span) = span {
                map.entry(&i, span);
            }
        }
        map.finish()
    }
}

/// The mutable capture state threaded through a single match attempt.
///
/// Each group is either unset, open (an entry offset with no exit yet)
/// or closed. `open` is idempotent while the group is open: the first
/// entry wins for as long as the group is live. Once the group closes,
/// a later `open` re-arms it and overwrites, which is what gives
/// repetition its "last iteration wins" behavior.
#[derive(Clone, Debug)]
pub(crate) struct Slots {
    slots: Vec<Slot>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    start: Option<usize>,
    end: Option<usize>,
}

impl Slot {
    fn is_open(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }
}

impl Slots {
    /// Create slots for a pattern with the given number of capture
    /// groups (excluding group 0).
    pub(crate) fn new(groups: u32) -> Slots {
        Slots { slots: vec![Slot::default(); groups as usize] }
    }

    /// Apply one edit. `pos` is the offset before the character was
    /// consumed and `next_pos` the offset after; opens record the
    /// former and closes the latter.
    pub(crate) fn apply(&mut self, edit: Edit, pos: usize, next_pos: usize) {
        let slot = &mut self.slots[edit.group() as usize - 1];
        if edit.is_open() {
            if !slot.is_open() {
                *slot = Slot { start: Some(pos), end: None };
            }
        } else if slot.is_open() {
            slot.end = Some(next_pos);
        }
    }

    /// Freeze the current state into a reported `Captures` for a match
    /// with the given overall span. Groups still open are closed at the
    /// match end.
    pub(crate) fn snapshot(&self, span: Span) -> Captures {
        let mut spans = Vec::with_capacity(1 + self.slots.len());
        spans.push(Some(span));
        for slot in &self.slots {
            spans.push(slot.start.map(|start| Span {
                start,
                end: slot.end.unwrap_or(span.end),
            }));
        }
        Captures { spans }
    }
}
