//! Formula evaluator
//!
//! Walks a parsed AST and produces a single numeric or boolean value,
//! resolving cell references through a caller-supplied [`CellResolver`].

use crate::ast::{ArithExpr, ArithmeticOp, ComparisonOp, Expr, Formula, UnaryFunction};
use crate::error::{EvalError, EvalResult, FormulaError};
use crate::parser::parse_formula;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

/// Capability to resolve a cell identifier such as `"A1"` to its numeric
/// value. Supplied by the grid; the evaluator borrows it for the duration
/// of one call and never stores it.
///
/// Concurrent evaluations of different formulas are safe whenever the
/// resolver itself tolerates concurrent reads.
pub trait CellResolver {
    /// Resolve an identifier, or `None` when the cell has no usable value.
    fn resolve(&self, identifier: &str) -> Option<f64>;
}

impl<S: BuildHasher> CellResolver for HashMap<String, f64, S> {
    fn resolve(&self, identifier: &str) -> Option<f64> {
        self.get(identifier).copied()
    }
}

/// Adapter turning a closure into a [`CellResolver`].
///
/// ```rust
/// use table_formula::evaluator::{evaluate_str, ResolveFn, Value};
///
/// let cells = ResolveFn(|id: &str| (id == "A1").then_some(10.0));
/// assert_eq!(evaluate_str("=(A1+5)", &cells).unwrap(), Value::Number(15.0));
/// ```
pub struct ResolveFn<F>(pub F);

impl<F: Fn(&str) -> Option<f64>> CellResolver for ResolveFn<F> {
    fn resolve(&self, identifier: &str) -> Option<f64> {
        (self.0)(identifier)
    }
}

/// Result of a successful evaluation: a number, or a boolean when the
/// formula's root is a comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Boolean(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Number(_) => None,
        }
    }
}

impl fmt::Display for Value {
    /// Display form shown in a grid cell: integral numbers print with no
    /// fractional part, booleans print `TRUE`/`FALSE`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Boolean(true) => f.write_str("TRUE"),
            Value::Boolean(false) => f.write_str("FALSE"),
        }
    }
}

/// Evaluate a parsed formula against a cell resolver.
///
/// Operands evaluate left before right; the order is observable when
/// resolving a reference has side effects in the collaborator, so it is a
/// contract rather than an implementation detail. The first failure aborts
/// the whole evaluation.
pub fn evaluate<R: CellResolver + ?Sized>(formula: &Formula, cells: &R) -> EvalResult<Value> {
    match &formula.body {
        Expr::Arithmetic(expr) => Ok(Value::Number(eval_arith(expr, cells)?)),
        Expr::Comparison { op, left, right } => {
            let l = eval_arith(left, cells)?;
            let r = eval_arith(right, cells)?;
            Ok(Value::Boolean(compare(*op, l, r)))
        }
    }
}

/// Parse and evaluate in one step.
pub fn evaluate_str<R: CellResolver + ?Sized>(
    text: &str,
    cells: &R,
) -> Result<Value, FormulaError> {
    let formula = parse_formula(text)?;
    Ok(evaluate(&formula, cells)?)
}

fn eval_arith<R: CellResolver + ?Sized>(expr: &ArithExpr, cells: &R) -> EvalResult<f64> {
    match expr {
        ArithExpr::Number(n) => Ok(*n),

        ArithExpr::CellRef(identifier) => {
            cells
                .resolve(identifier)
                .ok_or_else(|| EvalError::UnresolvedReference {
                    identifier: identifier.clone(),
                })
        }

        ArithExpr::BinaryOp { op, left, right } => {
            let l = eval_arith(left, cells)?;
            let r = eval_arith(right, cells)?;
            apply_binary(*op, l, r)
        }

        ArithExpr::Call { func, arg } => {
            let value = eval_arith(arg, cells)?;
            Ok(match func {
                UnaryFunction::Inc => value + 1.0,
                UnaryFunction::Dec => value - 1.0,
            })
        }
    }
}

fn apply_binary(op: ArithmeticOp, l: f64, r: f64) -> EvalResult<f64> {
    match op {
        ArithmeticOp::Add => Ok(l + r),
        ArithmeticOp::Subtract => Ok(l - r),
        ArithmeticOp::Multiply => Ok(l * r),
        ArithmeticOp::Divide => {
            if r == 0.0 {
                Err(EvalError::DivisionByZero { operator: op })
            } else {
                Ok(l / r)
            }
        }
        // `div` truncates toward zero; `mod` is the matching truncating
        // remainder, so it carries the sign of the dividend
        ArithmeticOp::IntDivide => {
            if r == 0.0 {
                Err(EvalError::DivisionByZero { operator: op })
            } else {
                Ok((l / r).trunc())
            }
        }
        ArithmeticOp::Modulo => {
            if r == 0.0 {
                Err(EvalError::DivisionByZero { operator: op })
            } else {
                Ok(l % r)
            }
        }
    }
}

/// Ordinary f64 ordering; `=` and `<>` are exact, with no epsilon
/// tolerance. Values computed through division can therefore compare
/// unequal to their decimal rendering, which is accepted behavior.
fn compare(op: ComparisonOp, l: f64, r: f64) -> bool {
    match op {
        ComparisonOp::Equal => l == r,
        ComparisonOp::NotEqual => l != r,
        ComparisonOp::LessThan => l < r,
        ComparisonOp::LessEqual => l <= r,
        ComparisonOp::GreaterThan => l > r,
        ComparisonOp::GreaterEqual => l >= r,
    }
}
