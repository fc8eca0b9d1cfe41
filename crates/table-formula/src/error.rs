//! Formula error types

use crate::ast::ArithmeticOp;
use crate::lexer::TokenKind;
use std::fmt;
use thiserror::Error;

/// Result type for lexing and parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type for evaluation
pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// Errors produced while turning formula text into an AST
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A character no lexer rule recognizes
    #[error("unexpected character '{ch}' at offset {position}")]
    UnexpectedChar { position: usize, ch: char },

    /// Structural grammar violation: missing `=`, unbalanced parens,
    /// stray token, chained comparison, trailing input
    #[error("syntax error at offset {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: usize,
        expected: Expected,
        found: TokenKind,
    },

    /// Expression nesting exceeded the caller-supplied bound
    #[error("formula nesting deeper than the limit of {limit}")]
    TooDeep { limit: usize },
}

impl ParseError {
    /// Cell indicator the grid renders for a formula that failed to parse.
    pub fn indicator(&self) -> &'static str {
        "#ERROR"
    }
}

/// The token kind(s) a parse position would have accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    One(TokenKind),
    OneOf(&'static [TokenKind]),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::One(kind) => write!(f, "{}", kind),
            Expected::OneOf([]) => f.write_str("nothing"),
            Expected::OneOf([single]) => write!(f, "{}", single),
            Expected::OneOf([init @ .., last]) => {
                for kind in init {
                    write!(f, "{}, ", kind)?;
                }
                write!(f, "or {}", last)
            }
        }
    }
}

/// Errors produced while evaluating a parsed formula
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The resolver could not supply a value for a referenced cell
    #[error("unresolved cell reference '{identifier}'")]
    UnresolvedReference { identifier: String },

    /// `/`, `div`, or `mod` with an exactly-zero right operand
    #[error("division by zero in '{operator}'")]
    DivisionByZero { operator: ArithmeticOp },
}

impl EvalError {
    /// Cell indicator the grid renders for this evaluation failure.
    pub fn indicator(&self) -> &'static str {
        match self {
            EvalError::UnresolvedReference { .. } => "#REF!",
            EvalError::DivisionByZero { .. } => "#DIV/0!",
        }
    }
}

/// Umbrella error for callers that parse and evaluate in one step
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl FormulaError {
    /// Cell indicator the grid renders for this failure.
    pub fn indicator(&self) -> &'static str {
        match self {
            FormulaError::Parse(e) => e.indicator(),
            FormulaError::Eval(e) => e.indicator(),
        }
    }
}
