//! Formula Abstract Syntax Tree types
//!
//! The grammar is two-tier: a formula body is either a pure arithmetic
//! expression or exactly one comparison of two arithmetic expressions.
//! The types encode that directly, so a comparison can never nest inside
//! arithmetic or inside another comparison.

use std::fmt;

/// A parsed formula, always of the textual shape `=( ... )`.
///
/// The unique root of every AST; built once per parse and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub body: Expr,
}

/// Formula body: arithmetic, or one flat comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Arithmetic(ArithExpr),
    Comparison {
        op: ComparisonOp,
        left: ArithExpr,
        right: ArithExpr,
    },
}

/// Arithmetic expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum ArithExpr {
    /// Numeric literal
    Number(f64),
    /// Raw textual cell reference, e.g. `A1`; resolved at evaluation time
    CellRef(String),
    /// Binary arithmetic operation
    BinaryOp {
        op: ArithmeticOp,
        left: Box<ArithExpr>,
        right: Box<ArithExpr>,
    },
    /// Unary function call, `inc(...)` or `dec(...)`
    Call {
        func: UnaryFunction,
        arg: Box<ArithExpr>,
    },
}

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// Keyword `mod`: truncating remainder
    Modulo,
    /// Keyword `div`: integer division, truncating toward zero
    IntDivide,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

/// Unary spreadsheet functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryFunction {
    Inc,
    Dec,
}

// === Canonical printing ===
//
// `Display` renders the canonical text form: re-parsing it yields a
// structurally identical tree. Binary operations print fully
// parenthesized, so no precedence knowledge is needed here.

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "=({})", self.body)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Arithmetic(expr) => write!(f, "{}", expr),
            Expr::Comparison { op, left, right } => write!(f, "{} {} {}", left, op, right),
        }
    }
}

impl fmt::Display for ArithExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithExpr::Number(n) => write!(f, "{}", n),
            ArithExpr::CellRef(id) => f.write_str(id),
            ArithExpr::BinaryOp { op, left, right } => {
                write!(f, "({} {} {})", left, op, right)
            }
            ArithExpr::Call { func, arg } => write!(f, "{}({})", func, arg),
        }
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
            ArithmeticOp::Modulo => "mod",
            ArithmeticOp::IntDivide => "div",
        };
        f.write_str(s)
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "<>",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterEqual => ">=",
        };
        f.write_str(s)
    }
}

impl fmt::Display for UnaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryFunction::Inc => f.write_str("inc"),
            UnaryFunction::Dec => f.write_str("dec"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Box<ArithExpr> {
        Box::new(ArithExpr::Number(n))
    }

    #[test]
    fn test_display_arithmetic() {
        let formula = Formula {
            body: Expr::Arithmetic(ArithExpr::BinaryOp {
                op: ArithmeticOp::Add,
                left: num(1.0),
                right: Box::new(ArithExpr::BinaryOp {
                    op: ArithmeticOp::Multiply,
                    left: num(2.0),
                    right: Box::new(ArithExpr::CellRef("A1".into())),
                }),
            }),
        };
        assert_eq!(formula.to_string(), "=((1 + (2 * A1)))");
    }

    #[test]
    fn test_display_comparison() {
        let formula = Formula {
            body: Expr::Comparison {
                op: ComparisonOp::LessEqual,
                left: ArithExpr::CellRef("B2".into()),
                right: ArithExpr::Number(10.0),
            },
        };
        assert_eq!(formula.to_string(), "=(B2 <= 10)");
    }

    #[test]
    fn test_display_call() {
        let formula = Formula {
            body: Expr::Arithmetic(ArithExpr::Call {
                func: UnaryFunction::Inc,
                arg: Box::new(ArithExpr::Call {
                    func: UnaryFunction::Dec,
                    arg: num(5.0),
                }),
            }),
        };
        assert_eq!(formula.to_string(), "=(inc(dec(5)))");
    }

    #[test]
    fn test_display_keyword_operators() {
        let formula = Formula {
            body: Expr::Arithmetic(ArithExpr::BinaryOp {
                op: ArithmeticOp::Modulo,
                left: num(7.0),
                right: num(2.0),
            }),
        };
        assert_eq!(formula.to_string(), "=((7 mod 2))");
    }
}
