// The proof representation (spec §3.4): a successful search reconstructs an
// ordered sequence of (applied-rule, resulting-expression) pairs from the
// original statement down to `true`.

use crate::expr::Expr;
use crate::rules::Applied;

/// One step of a reconstructed proof: the rule (or induction variable) that
/// was applied, and the expression it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofStep {
    pub applied: Applied,
    pub result: Expr,
}

/// A complete proof path, in application order: `steps[0]` is the first
/// rewrite of the original statement, `steps.last()` always has
/// `result == Expr::truth()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub steps: Vec<ProofStep>,
}

impl Proof {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
