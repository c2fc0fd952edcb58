use std::fmt;
use std::sync::Arc;

use crate::classes::ClassSet;

/// A canonical regular expression term.
///
/// Terms are immutable and cheap to clone: a `Hir` is a shared handle
/// to its node, so derivatives of a term reuse the sub-terms they do
/// not rewrite. Construction goes through the smart constructors below,
/// which apply a fixed set of algebraic rewrites bottom-up. The point
/// of the rewrites is that structurally equal terms denote equal
/// languages for every identity in the set, which keeps the number of
/// distinct derivatives of any term finite and small. Equality,
/// ordering and hashing are structural over the canonical form, so
/// terms can serve directly as map keys during determinization.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Hir(Arc<HirKind>);

/// The underlying kind of a term.
///
/// The declaration order of the variants fixes the total order on
/// terms: the derived `Ord` is lexicographic over the constructor tag
/// followed by the children, which is what the sorted `Alternation`
/// and `Intersection` forms rely on.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum HirKind {
    /// The empty language. Matches nothing.
    Empty,
    /// The empty string.
    Epsilon,
    /// Any single character drawn from the (non-empty) class.
    Class(ClassSet),
    /// `r` followed by `s`. Always right-associated.
    Concat(Hir, Hir),
    /// Union. Flattened, sorted, deduplicated, at least two items.
    Alternation(Vec<Hir>),
    /// Intersection. Flattened, sorted, deduplicated, at least two
    /// items.
    Intersection(Vec<Hir>),
    /// Complement with respect to all strings over the full alphabet.
    Complement(Hir),
    /// Kleene closure.
    Star(Hir),
    /// Capture group `index`, numbered from 1. Denotes the same
    /// language as its body; it exists so that derivatives can emit
    /// span-tracking edits.
    Group(u32, Hir),
}

impl Hir {
    fn new(kind: HirKind) -> Hir {
        Hir(Arc::new(kind))
    }

    /// The kind of this term.
    pub fn kind(&self) -> &HirKind {
        &self.0
    }

    /// The `∅` term.
    pub fn empty() -> Hir {
        Hir::new(HirKind::Empty)
    }

    /// The `ε` term.
    pub fn epsilon() -> Hir {
        Hir::new(HirKind::Epsilon)
    }

    /// The canonical "any string" term `Σ*`.
    pub fn any() -> Hir {
        Hir::star(Hir::class(ClassSet::full()))
    }

    /// A character class term. An empty class denotes `∅`.
    pub fn class(set: ClassSet) -> Hir {
        if set.is_empty() {
            Hir::empty()
        } else {
            Hir::new(HirKind::Class(set))
        }
    }

    /// Concatenation.
    ///
    /// `∅` annihilates, `ε` is the identity and the result is
    /// right-associated.
    pub fn concat(left: Hir, right: Hir) -> Hir {
        if left.is_empty() || right.is_empty() {
            return Hir::empty();
        }
        if left.is_epsilon() {
            return right;
        }
        if right.is_epsilon() {
            return left;
        }
        if let HirKind::Concat(a, b) = left.kind() {
            let rest = Hir::concat(b.clone(), right);
            return Hir::concat(a.clone(), rest);
        }
        Hir::new(HirKind::Concat(left, right))
    }

    /// Union.
    ///
    /// `∅` is the identity, `Σ*` absorbs everything and the flattened
    /// argument list is sorted and deduplicated, making union
    /// associative, commutative and idempotent under structural
    /// equality.
    pub fn alternation(left: Hir, right: Hir) -> Hir {
        fn flatten(hir: &Hir, into: &mut Vec<Hir>) {
            match hir.kind() {
                HirKind::Alternation(items) => into.extend(items.iter().cloned()),
                _ => into.push(hir.clone()),
            }
        }
        let mut items = vec![];
        flatten(&left, &mut items);
        flatten(&right, &mut items);

        if items.iter().any(Hir::is_any) {
            return Hir::any();
        }
        items.retain(|h| !h.is_empty());
        items.sort();
        items.dedup();
        match items.len() {
            0 => Hir::empty(),
            1 => items.pop().unwrap(),
            _ => Hir::new(HirKind::Alternation(items)),
        }
    }

    /// Intersection.
    ///
    /// `∅` annihilates, `Σ*` is the identity and the flattened argument
    /// list is sorted and deduplicated, as for union.
    pub fn intersection(left: Hir, right: Hir) -> Hir {
        fn flatten(hir: &Hir, into: &mut Vec<Hir>) {
            match hir.kind() {
                HirKind::Intersection(items) => into.extend(items.iter().cloned()),
                _ => into.push(hir.clone()),
            }
        }
        let mut items = vec![];
        flatten(&left, &mut items);
        flatten(&right, &mut items);

        if items.iter().any(Hir::is_empty) {
            return Hir::empty();
        }
        items.retain(|h| !h.is_any());
        items.sort();
        items.dedup();
        match items.len() {
            0 => Hir::any(),
            1 => items.pop().unwrap(),
            _ => Hir::new(HirKind::Intersection(items)),
        }
    }

    /// Complement.
    ///
    /// Double complement cancels; `~∅` is rewritten to the canonical
    /// `Σ*` (and `~Σ*` back to `∅`) so the absorption rules above fire
    /// on either spelling of "anything".
    pub fn complement(hir: Hir) -> Hir {
        if hir.is_empty() {
            return Hir::any();
        }
        if hir.is_any() {
            return Hir::empty();
        }
        match hir.kind() {
            HirKind::Complement(inner) => inner.clone(),
            _ => Hir::new(HirKind::Complement(hir)),
        }
    }

    /// Kleene closure. `∅* = ε* = ε` and `(r*)* = r*`.
    pub fn star(hir: Hir) -> Hir {
        match hir.kind() {
            HirKind::Empty | HirKind::Epsilon => Hir::epsilon(),
            HirKind::Star(_) => hir,
            _ => Hir::new(HirKind::Star(hir)),
        }
    }

    /// A capture group around `hir`. Group indexes start at 1; index 0
    /// is reserved for the whole match.
    ///
    /// A group whose body is `∅` or `ε` is simplified to its body: it
    /// can never span a non-empty range of the input, and this crate
    /// does not report zero-width group spans.
    pub fn group(index: u32, hir: Hir) -> Hir {
        assert!(index >= 1, "capture group indexes start at 1");
        match hir.kind() {
            HirKind::Empty => Hir::empty(),
            HirKind::Epsilon => Hir::epsilon(),
            _ => Hir::new(HirKind::Group(index, hir)),
        }
    }

    /// `r? = r | ε`.
    pub fn optional(hir: Hir) -> Hir {
        Hir::alternation(Hir::epsilon(), hir)
    }

    /// `r+ = r·r*`.
    pub fn plus(hir: Hir) -> Hir {
        Hir::concat(hir.clone(), Hir::star(hir))
    }

    /// Returns true if and only if this term is `∅`.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind(), HirKind::Empty)
    }

    /// Returns true if and only if this term is `ε`.
    pub fn is_epsilon(&self) -> bool {
        matches!(self.kind(), HirKind::Epsilon)
    }

    /// Returns true if and only if this term is the canonical `Σ*`.
    pub fn is_any(&self) -> bool {
        match self.kind() {
            HirKind::Star(inner) => match inner.kind() {
                HirKind::Class(set) => set.is_full(),
                _ => false,
            },
            _ => false,
        }
    }

    /// The largest capture group index appearing in this term, or 0 if
    /// there are no groups.
    pub fn group_count(&self) -> u32 {
        match self.kind() {
            HirKind::Empty | HirKind::Epsilon | HirKind::Class(_) => 0,
            HirKind::Concat(a, b) => a.group_count().max(b.group_count()),
            HirKind::Alternation(items) | HirKind::Intersection(items) => {
                items.iter().map(Hir::group_count).max().unwrap_or(0)
            }
            HirKind::Complement(inner) | HirKind::Star(inner) => {
                inner.group_count()
            }
            HirKind::Group(index, inner) => (*index).max(inner.group_count()),
        }
    }

    fn precedence(&self) -> u8 {
        match self.kind() {
            HirKind::Alternation(_) => 1,
            HirKind::Intersection(_) => 2,
            HirKind::Complement(_) => 3,
            HirKind::Concat(_, _) => 4,
            HirKind::Star(_) => 5,
            _ => 6,
        }
    }

    fn fmt_child(&self, parent: u8, f: &mut fmt::Formatter) -> fmt::Result {
        if self.precedence() < parent {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Debug for Hir {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

/// Renders a term in roughly the surface syntax, for diagnostics.
impl fmt::Display for Hir {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            HirKind::Empty => write!(f, "∅"),
            HirKind::Epsilon => write!(f, "ε"),
            HirKind::Class(set) => {
                if set.is_full() {
                    write!(f, ".")
                } else if set.ranges().len() == 1
                    && set.ranges()[0].start() == set.ranges()[0].end()
                {
                    write!(f, "{}", set.ranges()[0].start().escape_debug())
                } else {
                    write!(f, "{:?}", set)
                }
            }
            HirKind::Concat(a, b) => {
                a.fmt_child(4, f)?;
                b.fmt_child(4, f)
            }
            HirKind::Alternation(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    item.fmt_child(2, f)?;
                }
                Ok(())
            }
            HirKind::Intersection(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, "&")?;
                    }
                    item.fmt_child(3, f)?;
                }
                Ok(())
            }
            HirKind::Complement(inner) => {
                write!(f, "~")?;
                inner.fmt_child(4, f)
            }
            HirKind::Star(inner) => {
                inner.fmt_child(6, f)?;
                write!(f, "*")
            }
            HirKind::Group(_, inner) => write!(f, "({})", inner),
        }
    }
}
