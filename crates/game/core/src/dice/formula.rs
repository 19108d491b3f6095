//! Roll formula parsing and evaluation.
//!
//! A formula is a signed sum of terms:
//!
//! ```text
//! formula  := sign* term ( ('+' | '-') sign* term )*
//! term     := dice | integer | '@' path
//! dice     := [count] 'd' sides
//! ```
//!
//! `1d20 + @attributes.pp.mod + 3 + -10` is valid; `@path` is looked up in a
//! [`RollContext`].

use std::fmt;
use std::str::FromStr;

use super::rng::DieRoller;
use super::{DieResult, Roll, RollContext};
use crate::error::{ErrorSeverity, RulesError};

/// Upper bounds that keep a malformed formula from rolling forever.
const MAX_DICE: u32 = 100;
const MAX_SIDES: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,

    #[error("unexpected '{found}' at position {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("formula ends with an operator")]
    MissingTerm,

    #[error("invalid dice term '{0}'")]
    InvalidDice(String),

    #[error("number out of range: '{0}'")]
    NumberOutOfRange(String),

    #[error("unknown roll variable '@{0}'")]
    UnknownVariable(String),
}

impl RulesError for FormulaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "FORMULA_EMPTY",
            Self::UnexpectedChar { .. } => "FORMULA_UNEXPECTED_CHAR",
            Self::MissingTerm => "FORMULA_MISSING_TERM",
            Self::InvalidDice(_) => "FORMULA_INVALID_DICE",
            Self::NumberOutOfRange(_) => "FORMULA_NUMBER_OUT_OF_RANGE",
            Self::UnknownVariable(_) => "FORMULA_UNKNOWN_VARIABLE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TermKind {
    Dice { count: u32, sides: u32 },
    Constant(i32),
    Variable(String),
}

/// One signed summand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    /// `1` or `-1`.
    pub sign: i32,
    pub kind: TermKind,
}

/// Parsed roll formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formula {
    source: String,
    terms: Vec<Term>,
}

impl Formula {
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        source.parse()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Rolls every dice term and sums the formula.
    pub fn evaluate(
        &self,
        ctx: &RollContext,
        dice: &mut impl DieRoller,
    ) -> Result<Roll, FormulaError> {
        let overflow = || FormulaError::NumberOutOfRange(self.source.clone());
        let mut total = 0i32;
        let mut results = Vec::new();

        for term in &self.terms {
            let value = match &term.kind {
                TermKind::Dice { count, sides } => {
                    let mut sum = 0i32;
                    for _ in 0..*count {
                        let value = dice.roll_die(*sides);
                        results.push(DieResult {
                            sides: *sides,
                            value,
                        });
                        sum = i32::try_from(value)
                            .ok()
                            .and_then(|value| sum.checked_add(value))
                            .ok_or_else(overflow)?;
                    }
                    sum
                }
                TermKind::Constant(value) => *value,
                TermKind::Variable(path) => ctx
                    .get(path)
                    .ok_or_else(|| FormulaError::UnknownVariable(path.clone()))?,
            };
            total = term
                .sign
                .checked_mul(value)
                .and_then(|signed| total.checked_add(signed))
                .ok_or_else(overflow)?;
        }

        Ok(Roll {
            formula: self.source.clone(),
            total,
            dice: results,
        })
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Formula {
    type Err = FormulaError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            chars: source.char_indices().peekable(),
        };
        let mut terms = Vec::new();

        parser.skip_whitespace();
        if parser.peek().is_none() {
            return Err(FormulaError::Empty);
        }

        loop {
            let sign = parser.signs();
            let kind = parser.term()?;
            terms.push(Term { sign, kind });

            parser.skip_whitespace();
            match parser.peek() {
                None => break,
                Some((_, '+')) | Some((_, '-')) => {}
                Some((position, found)) => {
                    return Err(FormulaError::UnexpectedChar { found, position });
                }
            }
        }

        Ok(Self {
            source: source.trim().to_owned(),
            terms,
        })
    }
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    /// Consumes any run of `+`/`-` and folds it into one sign.
    fn signs(&mut self) -> i32 {
        let mut sign = 1;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some((_, '+')) => {
                    self.chars.next();
                }
                Some((_, '-')) => {
                    self.chars.next();
                    sign = -sign;
                }
                _ => return sign,
            }
        }
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some((_, c)) = self.peek() {
            if !accept(c) {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        out
    }

    fn term(&mut self) -> Result<TermKind, FormulaError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(FormulaError::MissingTerm),
            Some((_, '@')) => {
                self.chars.next();
                let path = self.take_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
                if path.is_empty() {
                    return Err(FormulaError::MissingTerm);
                }
                Ok(TermKind::Variable(path))
            }
            Some((_, c)) if c.is_ascii_digit() || c == 'd' || c == 'D' => {
                let count = self.take_while(|c| c.is_ascii_digit());
                if matches!(self.peek(), Some((_, 'd')) | Some((_, 'D'))) {
                    self.chars.next();
                    let sides = self.take_while(|c| c.is_ascii_digit());
                    Self::dice(&count, &sides)
                } else {
                    count
                        .parse::<i32>()
                        .map(TermKind::Constant)
                        .map_err(|_| FormulaError::NumberOutOfRange(count))
                }
            }
            Some((position, found)) => Err(FormulaError::UnexpectedChar { found, position }),
        }
    }

    fn dice(count: &str, sides: &str) -> Result<TermKind, FormulaError> {
        let invalid = || FormulaError::InvalidDice(format!("{count}d{sides}"));
        let count = if count.is_empty() {
            1
        } else {
            count.parse::<u32>().map_err(|_| invalid())?
        };
        let sides = sides.parse::<u32>().map_err(|_| invalid())?;
        if count == 0 || count > MAX_DICE || sides == 0 || sides > MAX_SIDES {
            return Err(invalid());
        }
        Ok(TermKind::Dice { count, sides })
    }
}
