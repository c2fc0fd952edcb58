use crate::captures::Edit;
use crate::classes::Partition;
use crate::hir::{Hir, HirKind};

/// Returns true if and only if the term accepts the empty string.
pub fn nullable(hir: &Hir) -> bool {
    match hir.kind() {
        HirKind::Empty => false,
        HirKind::Epsilon => true,
        HirKind::Class(_) => false,
        HirKind::Concat(a, b) => nullable(a) && nullable(b),
        HirKind::Alternation(items) => items.iter().any(nullable),
        HirKind::Intersection(items) => items.iter().all(nullable),
        HirKind::Complement(inner) => !nullable(inner),
        HirKind::Star(_) => true,
        HirKind::Group(_, inner) => nullable(inner),
    }
}

/// Compute the partition of the alphabet induced by a term: two
/// characters in the same block are guaranteed to have structurally
/// equal derivatives, so the DFA builder only needs one derivative per
/// block.
pub fn partition(hir: &Hir) -> Partition {
    match hir.kind() {
        HirKind::Empty | HirKind::Epsilon => Partition::full(),
        HirKind::Class(set) => Partition::of_class(set),
        HirKind::Concat(a, b) => {
            // When the left side cannot match the empty string, the
            // derivative never reaches the right side in this step.
            if !nullable(a) {
                partition(a)
            } else {
                partition(a).refine(&partition(b))
            }
        }
        HirKind::Alternation(items) | HirKind::Intersection(items) => items
            .iter()
            .map(partition)
            .reduce(|acc, p| acc.refine(&p))
            .unwrap_or_else(Partition::full),
        HirKind::Complement(inner)
        | HirKind::Star(inner)
        | HirKind::Group(_, inner) => partition(inner),
    }
}

/// The result of a single derivative step: the successor term together
/// with the capture edits the step performs.
#[derive(Debug)]
pub struct Deriv {
    /// The canonical derivative term.
    pub hir: Hir,
    /// Capture edits, in the order the recursion encountered them.
    pub edits: Vec<Edit>,
}

impl Deriv {
    fn of(hir: Hir) -> Deriv {
        Deriv { hir, edits: vec![] }
    }
}

/// Compute the Brzozowski derivative of a term with respect to one
/// character: the term whose language is the set of suffixes of the
/// original's strings that begin with that character.
///
/// The result is built with the smart constructors, so structurally
/// equal languages (under the canonicalization identities) collapse to
/// the same term. Capture edits are recorded as the recursion passes
/// through `Group` nodes: an `open` whenever the character is consumed
/// inside a group, and a `close` when a group's residue collapses to
/// `ε`, at which point the wrapper is removed. Edits contributed by a
/// sub-derivative that turns out to be `∅`, or by anything beneath a
/// `Complement`, are discarded.
pub fn derive(hir: &Hir, ch: char) -> Deriv {
    match hir.kind() {
        HirKind::Empty | HirKind::Epsilon => Deriv::of(Hir::empty()),
        HirKind::Class(set) => {
            if set.contains(ch) {
                Deriv::of(Hir::epsilon())
            } else {
                Deriv::of(Hir::empty())
            }
        }
        HirKind::Concat(a, b) => {
            let da = derive(a, ch);
            let left = Hir::concat(da.hir, b.clone());
            let mut edits = if left.is_empty() { vec![] } else { da.edits };
            let hir = if nullable(a) {
                let db = derive(b, ch);
                if !db.hir.is_empty() {
                    merge(&mut edits, db.edits);
                }
                Hir::alternation(left, db.hir)
            } else {
                left
            };
            if hir.is_empty() {
                edits.clear();
            }
            Deriv { hir, edits }
        }
        HirKind::Alternation(items) => {
            let mut hir = Hir::empty();
            let mut edits = vec![];
            for item in items {
                let d = derive(item, ch);
                if !d.hir.is_empty() {
                    merge(&mut edits, d.edits);
                }
                hir = Hir::alternation(hir, d.hir);
            }
            Deriv { hir, edits }
        }
        HirKind::Intersection(items) => {
            let mut hir = Hir::any();
            let mut edits = vec![];
            for item in items {
                let d = derive(item, ch);
                if d.hir.is_empty() {
                    return Deriv::of(Hir::empty());
                }
                merge(&mut edits, d.edits);
                hir = Hir::intersection(hir, d.hir);
            }
            Deriv { hir, edits }
        }
        HirKind::Complement(inner) => {
            let d = derive(inner, ch);
            Deriv::of(Hir::complement(d.hir))
        }
        HirKind::Star(inner) => {
            let d = derive(inner, ch);
            let next = Hir::concat(d.hir, hir.clone());
            let edits = if next.is_empty() { vec![] } else { d.edits };
            Deriv { hir: next, edits }
        }
        HirKind::Group(index, inner) => {
            let d = derive(inner, ch);
            if d.hir.is_empty() {
                return Deriv::of(Hir::empty());
            }
            let mut edits = vec![Edit::open(*index)];
            merge(&mut edits, d.edits);
            if d.hir.is_epsilon() {
                edits.push(Edit::close(*index));
                Deriv { hir: Hir::epsilon(), edits }
            } else {
                Deriv { hir: Hir::group(*index, d.hir), edits }
            }
        }
    }
}

fn merge(into: &mut Vec<Edit>, from: Vec<Edit>) {
    for edit in from {
        if !into.contains(&edit) {
            into.push(edit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::ClassSet;

    fn chr(ch: char) -> Hir {
        Hir::class(ClassSet::singleton(ch))
    }

    fn lit(s: &str) -> Hir {
        s.chars().fold(Hir::epsilon(), |acc, ch| Hir::concat(acc, chr(ch)))
    }

    /// Word membership by iterated derivatives, the definitional check.
    fn accepts(hir: &Hir, word: &str) -> bool {
        let mut cur = hir.clone();
        for ch in word.chars() {
            cur = derive(&cur, ch).hir;
        }
        nullable(&cur)
    }

    #[test]
    fn nullability() {
        assert!(!nullable(&Hir::empty()));
        assert!(nullable(&Hir::epsilon()));
        assert!(!nullable(&chr('a')));
        assert!(nullable(&Hir::star(chr('a'))));
        assert!(nullable(&Hir::complement(chr('a'))));
        assert!(!nullable(&Hir::complement(Hir::epsilon())));
        assert!(nullable(&Hir::optional(chr('a'))));
        assert!(!nullable(&Hir::concat(Hir::star(chr('a')), chr('b'))));
        assert!(nullable(&Hir::group(1, Hir::star(chr('a')))));
    }

    #[test]
    fn derivative_soundness() {
        let hir = Hir::concat(Hir::star(chr('a')), chr('b'));
        assert!(accepts(&hir, "b"));
        assert!(accepts(&hir, "aab"));
        assert!(!accepts(&hir, "aa"));
        assert!(!accepts(&hir, "ba"));

        let boolean = Hir::intersection(
            Hir::concat(chr('a'), Hir::any()),
            Hir::complement(lit("ab")),
        );
        assert!(accepts(&boolean, "a"));
        assert!(accepts(&boolean, "ax"));
        assert!(!accepts(&boolean, "ab"));
        assert!(!accepts(&boolean, "b"));
    }

    #[test]
    fn derivative_of_class_is_epsilon_or_empty() {
        let digits = Hir::class(ClassSet::range('0', '9'));
        assert!(derive(&digits, '5').hir.is_epsilon());
        assert!(derive(&digits, 'x').hir.is_empty());
    }

    #[test]
    fn star_unrolls_once() {
        let star = Hir::star(chr('a'));
        let d = derive(&star, 'a');
        assert_eq!(d.hir, star);
        assert!(derive(&star, 'b').hir.is_empty());
    }

    #[test]
    fn partition_blocks_share_derivatives() {
        let hir = Hir::alternation(
            Hir::class(ClassSet::range('a', 'f')),
            Hir::class(ClassSet::range('d', 'k')),
        );
        for block in partition(&hir).blocks() {
            let rep = block.min().unwrap();
            let expected = derive(&hir, rep).hir;
            // Sample the block's range endpoints; every member must
            // agree with the representative.
            for range in block.ranges().iter().take(4) {
                assert_eq!(derive(&hir, range.start()).hir, expected);
                assert_eq!(derive(&hir, range.end()).hir, expected);
            }
        }
    }

    #[test]
    fn partition_of_concat_ignores_right_when_left_consumes() {
        let hir = Hir::concat(chr('a'), chr('b'));
        // Left side is not nullable, so only 'a' is distinguished.
        assert_eq!(partition(&hir).blocks().len(), 2);

        let nullable_left = Hir::concat(Hir::star(chr('a')), chr('b'));
        assert_eq!(partition(&nullable_left).blocks().len(), 3);
    }

    #[test]
    fn group_completion_emits_open_then_close() {
        let hir = Hir::group(1, chr('a'));
        let d = derive(&hir, 'a');
        assert!(d.hir.is_epsilon());
        assert_eq!(d.edits, vec![Edit::open(1), Edit::close(1)]);
    }

    #[test]
    fn group_continuation_emits_open_only() {
        let hir = Hir::group(1, lit("ab"));
        let d = derive(&hir, 'a');
        assert!(matches!(d.hir.kind(), HirKind::Group(1, _)));
        assert_eq!(d.edits, vec![Edit::open(1)]);
    }

    #[test]
    fn nested_groups_emit_in_encounter_order() {
        // ((a)b): consuming 'a' opens 1, then opens and closes 2.
        let hir = Hir::group(1, Hir::concat(Hir::group(2, chr('a')), chr('b')));
        let d = derive(&hir, 'a');
        assert_eq!(
            d.edits,
            vec![Edit::open(1), Edit::open(2), Edit::close(2)],
        );
    }

    #[test]
    fn dead_branches_contribute_no_edits() {
        // a*(b): deriving by 'a' stays in the star and must not touch
        // the group.
        let hir = Hir::concat(Hir::star(chr('a')), Hir::group(1, chr('b')));
        assert!(derive(&hir, 'a').edits.is_empty());
        let d = derive(&hir, 'b');
        assert_eq!(d.edits, vec![Edit::open(1), Edit::close(1)]);
    }

    #[test]
    fn complement_discards_edits() {
        let hir = Hir::complement(Hir::group(1, chr('a')));
        assert!(derive(&hir, 'a').edits.is_empty());
    }
}
