//! Formula parser
//!
//! Precedence-climbing parser over the lexer's token stream. A formula is
//! `'=' '(' body ')'` followed by end of input; the body is an arithmetic
//! expression, optionally compared once against a second arithmetic
//! expression. Comparisons are flat: `a < b < c` is a syntax error.
//!
//! Binding strength, tightest first: `mod`/`div`, then `*`/`/`, then
//! `+`/`-`, all left-associative. The `mod`/`div` tier sitting above
//! `*`/`/` is deliberate language behavior, not an oversight.

use crate::ast::{ArithExpr, ArithmeticOp, ComparisonOp, Expr, Formula, UnaryFunction};
use crate::error::{Expected, ParseError, ParseResult};
use crate::lexer::{tokenize, Token, TokenKind, TokenTag};

/// Default bound on expression nesting depth.
///
/// Nesting (parenthesized groups and `inc`/`dec` arguments) is the only
/// input-controlled recursion in the parser, so it is capped to keep
/// adversarial formulas from exhausting the stack.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Token kinds that can start an arithmetic atom.
const ATOM_START: &[TokenKind] = &[
    TokenKind::Number,
    TokenKind::CellRef,
    TokenKind::Inc,
    TokenKind::Dec,
    TokenKind::LeftParen,
];

/// Parse a formula string into an AST.
///
/// # Example
/// ```rust
/// use table_formula::parse_formula;
///
/// let formula = parse_formula("=(A1+B2)").unwrap();
/// let formula = parse_formula("=(2*3 mod 4)").unwrap();
/// let formula = parse_formula("=(inc(5) <= 10)").unwrap();
/// ```
pub fn parse_formula(text: &str) -> ParseResult<Formula> {
    parse_formula_with_limit(text, DEFAULT_MAX_DEPTH)
}

/// Parse with a caller-supplied bound on expression nesting depth.
pub fn parse_formula_with_limit(text: &str, max_depth: usize) -> ParseResult<Formula> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };
    parser.parse()
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn parse(&mut self) -> ParseResult<Formula> {
        self.expect(TokenKind::Equals)?;
        self.expect(TokenKind::LeftParen)?;
        let body = self.parse_body()?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::EndOfInput)?;
        Ok(Formula { body })
    }

    /// One token of lookahead decides between the two body forms: if a
    /// comparison operator follows the first arithmetic expression, commit
    /// to a single flat comparison.
    fn parse_body(&mut self) -> ParseResult<Expr> {
        let left = self.parse_arithmetic(0)?;

        if let Some(op) = comparison_op(&self.current().tag) {
            self.advance();
            let right = self.parse_arithmetic(0)?;
            return Ok(Expr::Comparison { op, left, right });
        }

        Ok(Expr::Arithmetic(left))
    }

    /// Precedence climbing: consume operators binding at least as tightly
    /// as `min_prec`, recursing with `prec + 1` for left associativity.
    fn parse_arithmetic(&mut self, min_prec: u8) -> ParseResult<ArithExpr> {
        let mut left = self.parse_atom()?;

        while let Some(op) = arithmetic_op(&self.current().tag) {
            let prec = precedence(op);
            if prec < min_prec {
                break;
            }
            self.advance();
            let right = self.parse_arithmetic(prec + 1)?;
            left = ArithExpr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_atom(&mut self) -> ParseResult<ArithExpr> {
        match self.current().tag.clone() {
            TokenTag::Number(n) => {
                self.advance();
                Ok(ArithExpr::Number(n))
            }

            TokenTag::CellRef(identifier) => {
                self.advance();
                Ok(ArithExpr::CellRef(identifier))
            }

            TokenTag::Inc => {
                self.advance();
                self.parse_call(UnaryFunction::Inc)
            }

            TokenTag::Dec => {
                self.advance();
                self.parse_call(UnaryFunction::Dec)
            }

            TokenTag::LeftParen => {
                self.advance();
                let expr = self.nested(|p| p.parse_arithmetic(0))?;
                self.expect(TokenKind::RightParen)?;
                Ok(expr)
            }

            _ => Err(self.unexpected(Expected::OneOf(ATOM_START))),
        }
    }

    fn parse_call(&mut self, func: UnaryFunction) -> ParseResult<ArithExpr> {
        self.expect(TokenKind::LeftParen)?;
        let arg = self.nested(|p| p.parse_arithmetic(0))?;
        self.expect(TokenKind::RightParen)?;
        Ok(ArithExpr::Call {
            func,
            arg: Box::new(arg),
        })
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // === Token stream helpers ===

    fn current(&self) -> &Token {
        // tokenize always terminates the stream with EndOfInput and
        // advance never moves past it
        &self.tokens[self.pos]
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.current().kind() == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(Expected::One(kind)))
        }
    }

    fn unexpected(&self, expected: Expected) -> ParseError {
        let token = self.current();
        ParseError::UnexpectedToken {
            position: token.offset,
            expected,
            found: token.kind(),
        }
    }
}

fn comparison_op(tag: &TokenTag) -> Option<ComparisonOp> {
    match tag {
        TokenTag::Equals => Some(ComparisonOp::Equal),
        TokenTag::NotEqual => Some(ComparisonOp::NotEqual),
        TokenTag::LessThan => Some(ComparisonOp::LessThan),
        TokenTag::LessEqual => Some(ComparisonOp::LessEqual),
        TokenTag::GreaterThan => Some(ComparisonOp::GreaterThan),
        TokenTag::GreaterEqual => Some(ComparisonOp::GreaterEqual),
        _ => None,
    }
}

fn arithmetic_op(tag: &TokenTag) -> Option<ArithmeticOp> {
    match tag {
        TokenTag::Plus => Some(ArithmeticOp::Add),
        TokenTag::Minus => Some(ArithmeticOp::Subtract),
        TokenTag::Star => Some(ArithmeticOp::Multiply),
        TokenTag::Slash => Some(ArithmeticOp::Divide),
        TokenTag::Mod => Some(ArithmeticOp::Modulo),
        TokenTag::Div => Some(ArithmeticOp::IntDivide),
        _ => None,
    }
}

/// Binding strength, higher is tighter. `mod`/`div` above `*`/`/` is the
/// language's documented (if unconventional) ordering.
fn precedence(op: ArithmeticOp) -> u8 {
    match op {
        ArithmeticOp::Add | ArithmeticOp::Subtract => 1,
        ArithmeticOp::Multiply | ArithmeticOp::Divide => 2,
        ArithmeticOp::Modulo | ArithmeticOp::IntDivide => 3,
    }
}
