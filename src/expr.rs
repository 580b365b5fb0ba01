// The term model (component A of the design) and the structural utilities
// built directly on top of it (component B): flattening, deep length,
// free-variable collection, and substitution.

use std::collections::HashMap;

use fxhash::FxHashMap;

use crate::signature::Type;

/// An expression is a literal, a variable, or an application of a literal
/// head to a fixed number of argument expressions.
///
/// Expressions are immutable once built and compare by deep structural
/// equality, which is what the rest of the prover relies on: the rule
/// store, the closed set, and the heuristic cache all key off `Expr`
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Expr {
    /// A signature-registered atom, e.g. `true` or `0`.
    Literal(String),

    /// An identifier standing for a universally quantified term. By
    /// convention these start with an uppercase letter.
    Variable(String),

    /// `head` applied to `args`. `head` must be a literal, never a
    /// variable; `args.len()` must equal the declared arity of `head`.
    App(String, Vec<Expr>),
}

/// A substitution from variable name to the expression it is bound to.
pub type Bindings = FxHashMap<String, Expr>;

impl Expr {
    pub fn literal(name: impl Into<String>) -> Expr {
        Expr::Literal(name.into())
    }

    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Variable(name.into())
    }

    pub fn app(head: impl Into<String>, args: Vec<Expr>) -> Expr {
        Expr::App(head.into(), args)
    }

    pub fn truth() -> Expr {
        Expr::Literal("true".to_string())
    }

    pub fn falsehood() -> Expr {
        Expr::Literal("false".to_string())
    }

    pub fn is_truth(&self) -> bool {
        matches!(self, Expr::Literal(s) if s == "true")
    }

    pub fn is_falsehood(&self) -> bool {
        matches!(self, Expr::Literal(s) if s == "false")
    }

    /// The head literal of an application, or the literal/variable name.
    pub fn head(&self) -> &str {
        match self {
            Expr::Literal(s) => s,
            Expr::Variable(s) => s,
            Expr::App(h, _) => h,
        }
    }

    pub fn args(&self) -> &[Expr] {
        match self {
            Expr::App(_, args) => args,
            _ => &[],
        }
    }

    /// True if every leaf in this expression is a variable whose name is
    /// free (i.e. this is determined purely lexically, without a
    /// signature: see [`crate::signature::is_variable_name`]).
    pub fn is_variable_shaped(&self) -> bool {
        matches!(self, Expr::Variable(_))
    }
}

/// Returns the leaves of `e` in left-to-right order.
pub fn flatten(e: &Expr) -> Vec<&str> {
    let mut out = Vec::new();
    flatten_into(e, &mut out);
    out
}

fn flatten_into<'a>(e: &'a Expr, out: &mut Vec<&'a str>) {
    match e {
        Expr::Literal(s) | Expr::Variable(s) => out.push(s),
        Expr::App(_, args) => {
            for arg in args {
                flatten_into(arg, out);
            }
        }
    }
}

/// The number of leaf atoms in `e`.
pub fn deep_length(e: &Expr) -> u32 {
    match e {
        Expr::Literal(_) | Expr::Variable(_) => 1,
        Expr::App(_, args) => args.iter().map(deep_length).sum(),
    }
}

/// The free variables of `e`, paired with the most specific type their
/// position constrains them to, in left-to-right first-occurrence order.
///
/// A variable that appears more than once keeps the type inferred from its
/// leftmost occurrence; later occurrences are not used to further narrow
/// the returned type (narrowing during matching is handled separately by
/// [`crate::matcher::matches`]).
pub fn variables(e: &Expr, sig: &crate::signature::Signature) -> Vec<(String, Type)> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<(String, Type)> = Vec::new();
    collect_variables(e, Type::Top, sig, &mut seen, &mut out);
    out
}

fn collect_variables(
    e: &Expr,
    constraint: Type,
    sig: &crate::signature::Signature,
    seen: &mut HashMap<String, usize>,
    out: &mut Vec<(String, Type)>,
) {
    match e {
        Expr::Variable(name) => {
            if !seen.contains_key(name) {
                seen.insert(name.clone(), out.len());
                out.push((name.clone(), constraint));
            }
        }
        Expr::Literal(_) => {}
        Expr::App(head, args) => {
            for (i, arg) in args.iter().enumerate() {
                let arg_type = sig.arg_type(head, i).unwrap_or(Type::Top);
                collect_variables(arg, arg_type, sig, seen, out);
            }
        }
    }
}

/// Substitutes every variable in `e` that is present in `bindings` with
/// its bound expression. Literals are returned unchanged. Bindings always
/// point to terms external to the pattern they came from, so this never
/// recurses into a cycle.
pub fn evaluate(e: &Expr, bindings: &Bindings) -> Expr {
    match e {
        Expr::Literal(_) => e.clone(),
        Expr::Variable(name) => bindings.get(name).cloned().unwrap_or_else(|| e.clone()),
        Expr::App(head, args) => {
            Expr::App(head.clone(), args.iter().map(|a| evaluate(a, bindings)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;

    fn peano_sig() -> Signature {
        Signature::peano()
    }

    #[test]
    fn test_deep_length() {
        let a = Expr::var("A");
        let b = Expr::var("B");
        let e = Expr::app("+", vec![a, b]);
        assert_eq!(deep_length(&e), 1 + 1 + 1);
    }

    #[test]
    fn test_flatten_order() {
        let e = Expr::app("+", vec![Expr::literal("0"), Expr::var("N")]);
        assert_eq!(flatten(&e), vec!["0", "N"]);
    }

    #[test]
    fn test_evaluate_identity_on_empty_bindings() {
        let e = Expr::app("+", vec![Expr::var("M"), Expr::var("N")]);
        let empty = Bindings::default();
        assert_eq!(evaluate(&e, &empty), e);
    }

    #[test]
    fn test_evaluate_substitutes() {
        let e = Expr::app("+", vec![Expr::var("M"), Expr::var("N")]);
        let mut b = Bindings::default();
        b.insert("M".to_string(), Expr::literal("0"));
        let result = evaluate(&e, &b);
        assert_eq!(result, Expr::app("+", vec![Expr::literal("0"), Expr::var("N")]));
    }

    #[test]
    fn test_variables_dedup_keeps_leftmost() {
        let sig = peano_sig();
        let e = Expr::app("=", vec![Expr::var("N"), Expr::var("N")]);
        let vars = variables(&e, &sig);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].0, "N");
    }
}
