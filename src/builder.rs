use crate::determinize::Determinizer;
use crate::error::Result;
use crate::hir::Hir;
use crate::matcher::Matcher;
use crate::parser::Parser;

/// The default ceiling on the number of DFA states.
const DEFAULT_STATE_LIMIT: usize = 10_000;

/// A builder for compiling patterns into a [`Matcher`].
///
/// The builder configures both the parse of the pattern (whether `.`
/// matches a line terminator) and the determinization (the state
/// ceiling).
///
/// # Example
///
/// ```
/// use pyre::MatcherBuilder;
///
/// # fn example() -> Result<(), pyre::Error> {
/// let m = MatcherBuilder::new()
///     .dot_matches_new_line(true)
///     .build("a.c")?;
/// assert!(m.fullmatch("a\nc").is_some());
/// # Ok(()) } example().unwrap()
/// ```
#[derive(Clone, Debug)]
pub struct MatcherBuilder {
    dot_matches_new_line: bool,
    state_limit: Option<usize>,
}

impl MatcherBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> MatcherBuilder {
        MatcherBuilder {
            dot_matches_new_line: false,
            state_limit: Some(DEFAULT_STATE_LIMIT),
        }
    }

    /// Enable or disable the "dot matches any character" behavior.
    ///
    /// When disabled (the default), `.` matches any character except
    /// `\n`.
    pub fn dot_matches_new_line(&mut self, yes: bool) -> &mut MatcherBuilder {
        self.dot_matches_new_line = yes;
        self
    }

    /// Set the maximum number of DFA states construction may create
    /// before giving up with a "pattern too complex" error, or `None`
    /// for no ceiling.
    ///
    /// Derivative construction always terminates, but the bound can be
    /// large for patterns that nest complement and intersection; the
    /// default ceiling of 10 000 states keeps compilation of such
    /// patterns from exhausting memory.
    pub fn state_limit(&mut self, limit: Option<usize>) -> &mut MatcherBuilder {
        self.state_limit = limit;
        self
    }

    /// Parse and compile the given pattern.
    pub fn build(&self, pattern: &str) -> Result<Matcher> {
        let hir = Parser::new(pattern)
            .dot_matches_new_line(self.dot_matches_new_line)
            .parse()?;
        self.build_from_hir(&hir)
    }

    /// Compile an already-parsed term. This is the entry point for
    /// callers that construct their expressions programmatically with
    /// the [`Hir`](crate::Hir) smart constructors.
    pub fn build_from_hir(&self, hir: &Hir) -> Result<Matcher> {
        let dfa = Determinizer::new(hir.clone(), self.state_limit).build()?;
        Ok(Matcher::from_dfa(dfa))
    }
}

impl Default for MatcherBuilder {
    fn default() -> MatcherBuilder {
        MatcherBuilder::new()
    }
}
