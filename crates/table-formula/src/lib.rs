//! # table-formula
//!
//! Formula language front end for the table-manager spreadsheet editor.
//!
//! This crate provides:
//! - Formula lexing and parsing (text → AST)
//! - Formula evaluation (AST → numeric or boolean value)
//! - Cell-reference extraction for the grid's recalculation scheduling
//!
//! A formula always has the textual shape `=( ... )`. The grid itself —
//! storage, rendering, recalculation order, cycle detection — lives
//! elsewhere; this crate only needs a [`CellResolver`] to map identifiers
//! like `"A1"` to numbers during one evaluation call.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use table_formula::{evaluate, parse_formula, Value};
//!
//! let cells = HashMap::from([("A1".to_string(), 10.0), ("B2".to_string(), 5.0)]);
//!
//! let formula = parse_formula("=(A1+B2)").unwrap();
//! assert_eq!(evaluate(&formula, &cells).unwrap(), Value::Number(15.0));
//! ```

pub mod ast;
pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;

pub use ast::{ArithExpr, ArithmeticOp, ComparisonOp, Expr, Formula, UnaryFunction};
pub use dependency::references;
pub use error::{EvalError, EvalResult, Expected, FormulaError, ParseError, ParseResult};
pub use evaluator::{evaluate, evaluate_str, CellResolver, ResolveFn, Value};
pub use lexer::{tokenize, Token, TokenKind, TokenTag};
pub use parser::{parse_formula, parse_formula_with_limit, DEFAULT_MAX_DEPTH};
