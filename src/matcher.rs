// Pattern matching / unification-by-subsumption (component D).
//
// `matches(pattern, subject, typ)` checks whether `pattern` subsumes
// `subject`: whether some binding of pattern's variables turns `pattern`
// into `subject`, with every bound value well-typed against the
// positional constraint accumulated from the pattern. Traversal is an
// explicit worklist over `(pattern, subject, constraint)` triples rather
// than recursion, mirroring the original Python's `while stack:` loop.

use fxhash::FxHashMap;

use crate::expr::{Bindings, Expr};
use crate::signature::{looks_like_variable, Signature, Type};

/// Returns `Some(bindings)` on a successful match (possibly empty: an
/// empty binding map is a valid success, distinct from failure), `None` on
/// failure.
pub fn matches(pattern: &Expr, subject: &Expr, typ: Type, sig: &Signature) -> Option<Bindings> {
    let mut bindings = Bindings::default();
    let mut vartypes: FxHashMap<String, Type> = FxHashMap::default();
    let mut stack: Vec<(&Expr, &Expr, Type)> = vec![(pattern, subject, typ)];

    while let Some((p, s, constraint)) = stack.pop() {
        match p {
            Expr::Literal(name) => {
                if !(matches_literal(name, s) && constraint.subsumes(&sig.type_of(p))) {
                    return None;
                }
            }

            Expr::Variable(name) => {
                let prior = vartypes.get(name).cloned().unwrap_or(Type::Top);
                let tightened = prior.tighten(&constraint)?;
                vartypes.insert(name.clone(), tightened.clone());

                if !is_pattern_variable(s) && !tightened.subsumes(&sig.type_of(s)) {
                    return None;
                }

                match bindings.get(name) {
                    None => {
                        if p != s {
                            bindings.insert(name.clone(), s.clone());
                        }
                    }
                    Some(bound) => {
                        if bound != s {
                            return None;
                        }
                    }
                }
            }

            Expr::App(head, pargs) => {
                let Expr::App(shead, sargs) = s else {
                    return None;
                };
                if head != shead || pargs.len() != sargs.len() {
                    return None;
                }
                for i in 0..pargs.len() {
                    let arg_type = sig.arg_type(head, i).unwrap_or(Type::Unknown);
                    stack.push((&pargs[i], &sargs[i], arg_type));
                }
            }
        }
    }

    Some(bindings)
}

fn matches_literal(name: &str, subject: &Expr) -> bool {
    matches!(subject, Expr::Literal(s) if s == name)
}

/// Whether `e` plays the role of a pattern variable during matching: it is
/// lexically shaped like one (leading uppercase letter) regardless of
/// which side of the match it's on. Matching only ever calls this on the
/// *subject*, to decide whether a variable-vs-variable binding should be
/// checked against `type_of` or left alone; the *pattern* side variable
/// case is handled directly by the `Expr::Variable` arm above.
fn is_pattern_variable(e: &Expr) -> bool {
    matches!(e, Expr::Variable(name) if looks_like_variable(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;

    fn sig() -> Signature {
        Signature::peano()
    }

    #[test]
    fn test_matches_self_with_empty_bindings() {
        let sig = sig();
        let e = Expr::app("+", vec![Expr::literal("0"), Expr::var("N")]);
        let result = matches(&e, &e, Type::Top, &sig);
        assert_eq!(result, Some(Bindings::default()));
    }

    #[test]
    fn test_matches_binds_variable() {
        let sig = sig();
        let pattern = Expr::app("+", vec![Expr::literal("0"), Expr::var("N")]);
        let subject = Expr::app("+", vec![Expr::literal("0"), Expr::literal("0")]);
        let bindings = matches(&pattern, &subject, Type::Top, &sig).unwrap();
        assert_eq!(bindings.get("N"), Some(&Expr::literal("0")));
    }

    #[test]
    fn test_matches_rejects_wrong_arity() {
        let sig = sig();
        let pattern = Expr::app("+", vec![Expr::literal("0"), Expr::var("N")]);
        let subject = Expr::app("+", vec![Expr::literal("0")]);
        assert!(matches(&pattern, &subject, Type::Top, &sig).is_none());
    }

    #[test]
    fn test_matches_rejects_rebinding_to_different_value() {
        // Open Question resolution (spec.md §9): a variable rebound to a
        // different value within one match must fail, not be accepted.
        let sig = sig();
        let pattern = Expr::app("=", vec![Expr::var("X"), Expr::var("X")]);
        let subject = Expr::app("=", vec![Expr::literal("0"), Expr::app("s", vec![Expr::literal("0")])]);
        assert!(matches(&pattern, &subject, Type::Top, &sig).is_none());
    }

    #[test]
    fn test_matches_same_variable_twice_consistent() {
        let sig = sig();
        let pattern = Expr::app("=", vec![Expr::var("X"), Expr::var("X")]);
        let subject = Expr::app("=", vec![Expr::literal("0"), Expr::literal("0")]);
        let bindings = matches(&pattern, &subject, Type::Top, &sig).unwrap();
        assert_eq!(bindings.get("X"), Some(&Expr::literal("0")));
    }

    #[test]
    fn test_matches_rejects_type_mismatch() {
        let sig = sig();
        // N is constrained to Nat by its position; true is Bool.
        let pattern = Expr::app("+", vec![Expr::literal("0"), Expr::var("N")]);
        let subject = Expr::app("+", vec![Expr::literal("0"), Expr::truth()]);
        assert!(matches(&pattern, &subject, Type::Top, &sig).is_none());
    }
}
