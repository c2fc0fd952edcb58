use std::error;
use std::fmt;
use std::result;

pub type Result<T> = result::Result<T, Error>;

/// An error that occurred while parsing a pattern or compiling it into
/// a DFA.
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The kind of error that occurred.
#[derive(Clone, Debug)]
pub enum ErrorKind {
    /// An error that occurred while parsing a regular expression. The
    /// position is the byte offset in the pattern at which the error
    /// was detected.
    Syntax { pos: usize, msg: String },
    /// An error that occurred because an unsupported construct was used.
    /// The message string describes which construct.
    ///
    /// Currently this is only produced for counted repetitions whose
    /// bounds are large enough that expanding them would produce an
    /// unreasonably big expression.
    Unsupported(String),
    /// An error that occurred because determinization exceeded the
    /// configured state ceiling. Patterns mixing complement and
    /// intersection can, in principle, require very large automata;
    /// the ceiling turns that into an error instead of unbounded
    /// memory use.
    TooManyStates { limit: usize },
}

impl Error {
    /// Return the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn syntax(pos: usize, msg: impl Into<String>) -> Error {
        Error { kind: ErrorKind::Syntax { pos, msg: msg.into() } }
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Error {
        Error { kind: ErrorKind::Unsupported(msg.into()) }
    }

    pub(crate) fn too_many_states(limit: usize) -> Error {
        Error { kind: ErrorKind::TooManyStates { limit } }
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ErrorKind::Syntax { pos, ref msg } => {
                write!(f, "syntax error at offset {}: {}", pos, msg)
            }
            ErrorKind::Unsupported(ref msg) => write!(f, "{}", msg),
            ErrorKind::TooManyStates { limit } => write!(
                f,
                "pattern too complex: DFA construction exceeded \
                 the state limit of {}",
                limit,
            ),
        }
    }
}
