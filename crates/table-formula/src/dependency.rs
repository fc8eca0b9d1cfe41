//! Cell-reference extraction
//!
//! The grid schedules recalculation and detects cross-cell cycles itself;
//! this module only reports which cells a single parsed formula mentions.

use crate::ast::{ArithExpr, Expr, Formula};
use ahash::AHashSet;

/// The cell identifiers a formula references, deduplicated, in first
/// appearance order (left to right).
pub fn references(formula: &Formula) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut out = Vec::new();

    match &formula.body {
        Expr::Arithmetic(expr) => collect(expr, &mut seen, &mut out),
        Expr::Comparison { left, right, .. } => {
            collect(left, &mut seen, &mut out);
            collect(right, &mut seen, &mut out);
        }
    }

    out
}

fn collect(expr: &ArithExpr, seen: &mut AHashSet<String>, out: &mut Vec<String>) {
    match expr {
        ArithExpr::Number(_) => {}
        ArithExpr::CellRef(identifier) => {
            if seen.insert(identifier.clone()) {
                out.push(identifier.clone());
            }
        }
        ArithExpr::BinaryOp { left, right, .. } => {
            collect(left, seen, out);
            collect(right, seen, out);
        }
        ArithExpr::Call { arg, .. } => collect(arg, seen, out),
    }
}
