// The rule-step generator (component F): the five-stage ordered strategy
// of spec §4.6, turning a rule store plus a current goal into the set of
// one-step successors reachable by rewriting.

use crate::expr::{evaluate, Expr};
use crate::induction::induct;
use crate::matcher::matches;
use crate::signature::{Signature, Type};

/// Identifies which rule (by position in the store) produced a successor,
/// or that the step was an induction on a named variable instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Rule(usize),
    Induction(String),
}

/// Enumerates every successor of `stmt` (under type constraint `typ`)
/// reachable in one rewriting step, in the fixed five-stage order of the
/// design: direct subsumption short-circuits everything after it; then
/// equational rewriting, implication back-chaining, sub-term rewriting
/// (excluded from an implication's antecedent), and induction.
///
/// Built eagerly rather than as a true lazy iterator: the teacher's own
/// `Prover::activate` likewise returns a materialized `Vec` of next steps
/// rather than a generator, since stable Rust has no first-class
/// coroutines to model one. Within a single `prove` call this list is
/// small (rule-store size plus one term per argument position), so the
/// eager build costs nothing the lazy version would have saved.
pub fn successors(sig: &Signature, rules: &[Expr], stmt: &Expr, typ: &Type) -> Vec<(Applied, Expr)> {
    if let Some(hit) = direct_subsumption(sig, rules, stmt, typ) {
        return vec![hit];
    }

    let mut out = Vec::new();
    equational_rewrites(sig, rules, stmt, typ, &mut out);
    implication_backchain(sig, rules, stmt, typ, &mut out);
    subterm_rewrites(sig, rules, stmt, &mut out);
    induction_steps(sig, stmt, &mut out);

    out.retain(|(_, next)| next != stmt);
    out
}

fn direct_subsumption(sig: &Signature, rules: &[Expr], stmt: &Expr, typ: &Type) -> Option<(Applied, Expr)> {
    for (i, rule) in rules.iter().enumerate() {
        if matches(rule, stmt, typ.clone(), sig).is_some() {
            return Some((Applied::Rule(i), Expr::truth()));
        }
    }
    None
}

fn equational_rewrites(sig: &Signature, rules: &[Expr], stmt: &Expr, typ: &Type, out: &mut Vec<(Applied, Expr)>) {
    for (i, rule) in rules.iter().enumerate() {
        let Expr::App(head, args) = rule else { continue };
        if head != "=" || args.len() != 2 {
            continue;
        }
        let (l, r) = (&args[0], &args[1]);

        if let Some(bindings) = matches(l, stmt, typ.clone(), sig) {
            out.push((Applied::Rule(i), evaluate(r, &bindings)));
        }
        if let Some(bindings) = matches(r, stmt, typ.clone(), sig) {
            out.push((Applied::Rule(i), evaluate(l, &bindings)));
        }
    }
}

fn implication_backchain(sig: &Signature, rules: &[Expr], stmt: &Expr, typ: &Type, out: &mut Vec<(Applied, Expr)>) {
    if sig.type_of(stmt) != Type::named("Bool") || *typ != Type::named("Bool") {
        return;
    }
    for (i, rule) in rules.iter().enumerate() {
        let Expr::App(head, args) = rule else { continue };
        if head != "implies" || args.len() != 2 {
            continue;
        }
        let (antecedent, consequent) = (&args[0], &args[1]);
        if let Some(bindings) = matches(consequent, stmt, Type::named("Bool"), sig) {
            out.push((Applied::Rule(i), evaluate(antecedent, &bindings)));
        }
    }
}

fn subterm_rewrites(sig: &Signature, rules: &[Expr], stmt: &Expr, out: &mut Vec<(Applied, Expr)>) {
    let Expr::App(head, args) = stmt else { return };
    if head == "implies" {
        return;
    }
    for i in 0..args.len() {
        let arg_type = sig.arg_type(head, i).unwrap_or(Type::Unknown);
        for (applied, replaced) in successors(sig, rules, &args[i], &arg_type) {
            let mut new_args = args.clone();
            new_args[i] = replaced;
            out.push((applied, Expr::App(head.clone(), new_args)));
        }
    }
}

fn induction_steps(sig: &Signature, stmt: &Expr, out: &mut Vec<(Applied, Expr)>) {
    let Expr::App(head, _) = stmt else { return };
    if sig.descriptor(head).map(|d| d.return_type()) != Some(Type::named("Bool")) {
        return;
    }
    for (var, var_type) in crate::expr::variables(stmt, sig) {
        if let Some(result) = induct(stmt, &var, &var_type, sig) {
            if &result != stmt {
                out.push((Applied::Induction(var), result));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;

    #[test]
    fn test_direct_subsumption_short_circuits() {
        let env = Environment::peano();
        let stmt = Expr::app("=", vec![Expr::app("+", vec![Expr::literal("0"), Expr::var("N")]), Expr::var("N")]);
        let result = successors(&env.signature, &env.rules, &stmt, &Type::Top);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].1, Expr::truth());
    }

    #[test]
    fn test_no_successor_equals_input() {
        let env = Environment::peano();
        let stmt = Expr::app("=", vec![Expr::app("+", vec![Expr::var("M"), Expr::literal("0")]), Expr::var("M")]);
        let result = successors(&env.signature, &env.rules, &stmt, &Type::Top);
        for (_, next) in &result {
            assert_ne!(next, &stmt);
        }
    }

    #[test]
    fn test_subterm_rewrites_excludes_implication_antecedent() {
        let env = Environment::peano();
        let stmt = Expr::app(
            "implies",
            vec![
                Expr::app("=", vec![Expr::app("+", vec![Expr::literal("0"), Expr::var("N")]), Expr::var("N")]),
                Expr::app("=", vec![Expr::var("N"), Expr::var("N")]),
            ],
        );
        let mut out = Vec::new();
        subterm_rewrites(&env.signature, &env.rules, &stmt, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_induction_on_predicate_free_variable() {
        let env = Environment::peano();
        let stmt = Expr::app("=", vec![Expr::app("+", vec![Expr::var("N"), Expr::literal("0")]), Expr::var("N")]);
        let mut out = Vec::new();
        induction_steps(&env.signature, &stmt, &mut out);
        assert!(out.iter().any(|(applied, _)| matches!(applied, Applied::Induction(v) if v == "N")));
    }
}
