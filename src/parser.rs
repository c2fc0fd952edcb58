use crate::classes::ClassSet;
use crate::error::{Error, Result};
use crate::hir::Hir;

/// Counted repetitions expand by concatenation and alternation, so the
/// bounds are capped to keep the expansion reasonable.
const MAX_REPEAT: u32 = 1000;

/// Parse a pattern with the default configuration.
pub fn parse(pattern: &str) -> Result<Hir> {
    Parser::new(pattern).parse()
}

/// A recursive-descent parser for the surface syntax, producing a
/// canonical [`Hir`].
///
/// Operator precedence, loosest first: `|`, `^` (symmetric difference)
/// and `-` (difference) at the same level, then `&`, then prefix `~`
/// (which negates a whole concatenation), then concatenation, then the
/// postfix operators `*`, `+`, `?` and `{m,n}`. Space and tab are
/// insignificant everywhere; match a literal space with `\ `.
///
/// The difference operators are sugar over the core algebra:
/// `r - s` parses as `r & ~s` and `r ^ s` as `(r & ~s) | (s & ~r)`.
/// Every parenthesized group captures and is numbered by its opening
/// parenthesis, starting at 1.
#[derive(Debug)]
pub struct Parser<'p> {
    pattern: &'p str,
    chars: Vec<(usize, char)>,
    pos: usize,
    dot_matches_new_line: bool,
    groups: u32,
}

impl<'p> Parser<'p> {
    pub fn new(pattern: &'p str) -> Parser<'p> {
        Parser {
            pattern,
            chars: pattern.char_indices().collect(),
            pos: 0,
            dot_matches_new_line: false,
            groups: 0,
        }
    }

    /// Whether `.` should match `\n`. Disabled by default.
    pub fn dot_matches_new_line(mut self, yes: bool) -> Parser<'p> {
        self.dot_matches_new_line = yes;
        self
    }

    /// Parse the whole pattern.
    pub fn parse(mut self) -> Result<Hir> {
        let hir = self.parse_alternation()?;
        self.skip_space();
        match self.peek() {
            None => Ok(hir),
            Some(ch) => Err(self.error(format!("unexpected '{}'", ch))),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, ch)| ch)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    /// The byte offset of the next character, for error reporting.
    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map_or(self.pattern.len(), |&(offset, _)| offset)
    }

    fn error(&self, msg: impl Into<String>) -> Error {
        Error::syntax(self.offset(), msg)
    }

    fn skip_space(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.pos += 1;
        }
    }

    fn parse_alternation(&mut self) -> Result<Hir> {
        let mut hir = self.parse_intersection()?;
        loop {
            self.skip_space();
            match self.peek() {
                Some('|') => {
                    self.bump();
                    let rhs = self.parse_intersection()?;
                    hir = Hir::alternation(hir, rhs);
                }
                Some('-') => {
                    self.bump();
                    let rhs = self.parse_intersection()?;
                    hir = Hir::intersection(hir, Hir::complement(rhs));
                }
                Some('^') => {
                    self.bump();
                    let rhs = self.parse_intersection()?;
                    hir = Hir::alternation(
                        Hir::intersection(
                            hir.clone(),
                            Hir::complement(rhs.clone()),
                        ),
                        Hir::intersection(rhs, Hir::complement(hir)),
                    );
                }
                _ => return Ok(hir),
            }
        }
    }

    fn parse_intersection(&mut self) -> Result<Hir> {
        let mut hir = self.parse_complement()?;
        loop {
            self.skip_space();
            if self.peek() != Some('&') {
                return Ok(hir);
            }
            self.bump();
            let rhs = self.parse_complement()?;
            hir = Hir::intersection(hir, rhs);
        }
    }

    fn parse_complement(&mut self) -> Result<Hir> {
        self.skip_space();
        if self.peek() == Some('~') {
            self.bump();
            Ok(Hir::complement(self.parse_complement()?))
        } else {
            self.parse_concat()
        }
    }

    fn parse_concat(&mut self) -> Result<Hir> {
        let mut items = vec![];
        loop {
            self.skip_space();
            match self.peek() {
                None => break,
                Some('|') | Some('&') | Some('^') | Some('-') | Some('~')
                | Some(')') => break,
                _ => items.push(self.parse_repeat()?),
            }
        }
        if items.is_empty() {
            return Err(self.error("expected an expression"));
        }
        Ok(items
            .into_iter()
            .rev()
            .reduce(|rest, item| Hir::concat(item, rest))
            .unwrap())
    }

    fn parse_repeat(&mut self) -> Result<Hir> {
        let mut hir = self.parse_atom()?;
        loop {
            self.skip_space();
            match self.peek() {
                Some('*') => {
                    self.bump();
                    hir = Hir::star(hir);
                }
                Some('+') => {
                    self.bump();
                    hir = Hir::plus(hir);
                }
                Some('?') => {
                    self.bump();
                    hir = Hir::optional(hir);
                }
                Some('{') => {
                    self.bump();
                    hir = self.parse_counted(hir)?;
                }
                _ => return Ok(hir),
            }
        }
    }

    fn parse_atom(&mut self) -> Result<Hir> {
        self.skip_space();
        match self.peek() {
            None => Err(self.error("unexpected end of pattern")),
            Some('(') => {
                self.bump();
                self.groups += 1;
                let index = self.groups;
                let inner = self.parse_alternation()?;
                self.skip_space();
                if self.peek() != Some(')') {
                    return Err(self.error("expected ')'"));
                }
                self.bump();
                Ok(Hir::group(index, inner))
            }
            Some('[') => self.parse_class(),
            Some('.') => {
                self.bump();
                let dot = if self.dot_matches_new_line {
                    ClassSet::full()
                } else {
                    ClassSet::full().difference(&ClassSet::singleton('\n'))
                };
                Ok(Hir::class(dot))
            }
            Some('ε') => {
                self.bump();
                Ok(Hir::epsilon())
            }
            Some('\\') => {
                self.bump();
                self.parse_escape()
            }
            Some(ch @ ('*' | '+' | '?' | '{')) => {
                Err(self.error(format!("unexpected '{}'", ch)))
            }
            Some(ch) => {
                self.bump();
                Ok(Hir::class(ClassSet::singleton(ch)))
            }
        }
    }

    fn parse_escape(&mut self) -> Result<Hir> {
        match self.bump() {
            None => Err(self.error("incomplete escape sequence")),
            Some('d') => Ok(Hir::class(ClassSet::range('0', '9'))),
            Some(ch) => {
                let literal = match ch {
                    'a' => '\x07',
                    'b' => '\x08',
                    't' => '\t',
                    'n' => '\n',
                    'v' => '\x0B',
                    'f' => '\x0C',
                    'r' => '\r',
                    ch => ch,
                };
                Ok(Hir::class(ClassSet::singleton(literal)))
            }
        }
    }

    fn parse_class(&mut self) -> Result<Hir> {
        self.bump(); // '['
        self.skip_space();
        let negate = if self.peek() == Some('^') {
            self.bump();
            true
        } else {
            false
        };
        let mut set = ClassSet::empty();
        let mut first = true;
        loop {
            self.skip_space();
            let ch = match self.peek() {
                None => return Err(self.error("unclosed character class")),
                Some(ch) => ch,
            };
            // ']' closes the class unless it is the first item.
            if ch == ']' && !first {
                self.bump();
                break;
            }
            self.bump();
            first = false;
            self.skip_space();
            if self.peek() == Some('-') {
                self.bump();
                self.skip_space();
                match self.peek() {
                    None => {
                        return Err(self.error("unclosed character class"))
                    }
                    Some(']') => {
                        return Err(self
                            .error("expected a character after '-' in class"))
                    }
                    Some(end) => {
                        if ch > end {
                            return Err(self.error(format!(
                                "class range {}-{} is not increasing",
                                ch, end,
                            )));
                        }
                        self.bump();
                        set = set
                            .union(&ClassSet::range(ch, end));
                    }
                }
            } else {
                set = set.union(&ClassSet::singleton(ch));
            }
        }
        let set = if negate { set.negate() } else { set };
        Ok(Hir::class(set))
    }

    /// Parse the inside of `{...}` and expand the counted repetition.
    fn parse_counted(&mut self, hir: Hir) -> Result<Hir> {
        self.skip_space();
        let lo = self.maybe_integer()?;
        self.skip_space();
        let bounded = if self.peek() == Some(',') {
            self.bump();
            self.skip_space();
            let hi = self.maybe_integer()?;
            (lo, hi, true)
        } else {
            (lo, lo, false)
        };
        self.skip_space();
        if self.peek() != Some('}') {
            return Err(self.error("expected '}' in repetition"));
        }
        self.bump();

        match bounded {
            (Some(n), _, false) => {
                self.check_repeat(n)?;
                Ok(repeat_exact(&hir, n))
            }
            (None, None, _) | (None, _, false) => {
                Err(self.error("expected an integer in repetition"))
            }
            // {,n}: zero up to n occurrences.
            (None, Some(hi), true) => {
                self.check_repeat(hi)?;
                let mut out = Hir::epsilon();
                for k in 1..=hi {
                    out = Hir::alternation(out, repeat_exact(&hir, k));
                }
                Ok(out)
            }
            // {m,}: at least m occurrences.
            (Some(lo), None, true) => {
                self.check_repeat(lo)?;
                Ok(Hir::concat(repeat_exact(&hir, lo), Hir::star(hir)))
            }
            // {m,n}: between m and n occurrences.
            (Some(lo), Some(hi), true) => {
                if lo > hi {
                    return Err(self
                        .error("repetition bounds are not increasing"));
                }
                self.check_repeat(hi)?;
                let mut out = repeat_exact(&hir, lo);
                for k in lo + 1..=hi {
                    out = Hir::alternation(out, repeat_exact(&hir, k));
                }
                Ok(out)
            }
        }
    }

    fn check_repeat(&self, n: u32) -> Result<()> {
        if n > MAX_REPEAT {
            Err(Error::unsupported(format!(
                "repetition bound {} exceeds the supported maximum of {}",
                n, MAX_REPEAT,
            )))
        } else {
            Ok(())
        }
    }

    fn maybe_integer(&mut self) -> Result<Option<u32>> {
        let mut digits = String::new();
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            self.bump();
        }
        if digits.is_empty() {
            return Ok(None);
        }
        match digits.parse() {
            Ok(n) => Ok(Some(n)),
            Err(_) => Err(self.error("repetition bound is too large")),
        }
    }
}

fn repeat_exact(hir: &Hir, n: u32) -> Hir {
    if n == 0 {
        return Hir::epsilon();
    }
    let mut out = hir.clone();
    for _ in 1..n {
        out = Hir::concat(out, hir.clone());
    }
    out
}
