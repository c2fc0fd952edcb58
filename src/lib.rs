/*!
A regular expression engine built on Brzozowski derivatives.

Instead of compiling a pattern to an NFA and determinizing it with the
subset construction, this crate builds a DFA *directly* from the
expression: each DFA state is a canonical regular expression term, and
the transition out of a state for a character `c` leads to the state
for the term's derivative with respect to `c`. Because derivatives are
closed under boolean operations, the surface syntax supports language
intersection (`r & s`), complement (`~r`), difference (`r - s`) and
symmetric difference (`r ^ s`) alongside the usual operators.

Capture groups are tracked without backtracking: transitions carry
open/close edits that are computed once, at construction time, and a
match replays them into a small per-call table of spans.

# Example

```
use pyre::Matcher;

# fn example() -> Result<(), pyre::Error> {
let m = Matcher::new("(a|b)c")?;
let caps = m.search("xxbcxx").unwrap();
assert_eq!(caps.span().range(), 2..4);
assert_eq!(caps.group(1).map(|s| s.range()), Some(2..3));
# Ok(()) } example().unwrap()
```

Boolean operators compose like any other term. This matches strings
that do not contain `bad`:

```
use pyre::Matcher;

# fn example() -> Result<(), pyre::Error> {
let m = Matcher::new(".*&~.*bad.*")?;
assert!(m.fullmatch("good things").is_some());
assert!(m.fullmatch("some bad things").is_none());
# Ok(()) } example().unwrap()
```
*/

pub use crate::{
    builder::MatcherBuilder,
    captures::{Captures, Edit, Span},
    classes::{ClassRange, ClassSet, Partition},
    derivative::{derive, nullable, partition, Deriv},
    dfa::{StateID, Transition, DEAD, DFA},
    error::{Error, ErrorKind, Result},
    hir::{Hir, HirKind},
    matcher::{FindMatches, Matcher},
    parser::{parse, Parser},
};

mod builder;
mod captures;
mod classes;
mod derivative;
mod determinize;
mod dfa;
mod error;
mod hir;
mod matcher;
mod parser;
