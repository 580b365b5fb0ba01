// The induction operator (component E).
//
// `induct(stmt, var, typ, sig)` expands a statement over a typed free
// variable into base and step conjuncts, one per constructor of `typ`.

use crate::expr::{evaluate, Expr};
use crate::signature::{Constructor, Signature, Type};

/// Builds the structural-induction expansion of `stmt` over `var: typ`, or
/// `None` if `typ` has no registered constructors.
///
/// For `Nat`, this produces `(and, stmt[var↦0], (implies, stmt,
/// stmt[var↦(s, var)]))`. A type with a single constructor yields its one
/// conjunct directly rather than wrapping it in a degenerate unary `and`.
pub fn induct(stmt: &Expr, var: &str, typ: &Type, sig: &Signature) -> Option<Expr> {
    let type_name = match typ {
        Type::Named(name) => name.as_str(),
        Type::Top | Type::Unknown => return None,
    };
    let ctors = sig.constructors(type_name)?;

    let conjuncts: Vec<Expr> = ctors.iter().map(|ctor| conjunct_for(stmt, var, ctor, sig)).collect();

    match conjuncts.len() {
        0 => None,
        1 => Some(conjuncts.into_iter().next().unwrap()),
        _ => Some(Expr::app("and", conjuncts)),
    }
}

fn conjunct_for(stmt: &Expr, var: &str, ctor: &Constructor, sig: &Signature) -> Expr {
    match ctor {
        Constructor::Nullary(name) => {
            let binding = singleton_binding(var, Expr::literal(name.clone()));
            evaluate(stmt, &binding)
        }

        Constructor::Compound(name, arg_types) => {
            let mut args = Vec::with_capacity(arg_types.len());
            let mut recursive_var = None;

            for (i, arg_type_name) in arg_types.iter().enumerate() {
                let fresh = fresh_variable(var, i);
                if type_of_stmt_var(sig, stmt, var) == Type::named(arg_type_name.clone()) {
                    recursive_var = Some(fresh.clone());
                }
                args.push(Expr::var(fresh));
            }

            let constructed = Expr::app(name.clone(), args);
            let step_consequent = evaluate(stmt, &singleton_binding(var, constructed));

            match recursive_var {
                Some(rv) => {
                    let antecedent = evaluate(stmt, &singleton_binding(var, Expr::var(rv)));
                    Expr::app("implies", vec![antecedent, step_consequent])
                }
                None => step_consequent,
            }
        }
    }
}

/// The declared type of `var` as it appears in `stmt`, used only to decide
/// which constructor argument position is the recursive one (the one whose
/// declared type equals the type being inducted over).
fn type_of_stmt_var(sig: &Signature, stmt: &Expr, var: &str) -> Type {
    crate::expr::variables(stmt, sig)
        .into_iter()
        .find(|(name, _)| name == var)
        .map(|(_, t)| t)
        .unwrap_or(Type::Top)
}

fn fresh_variable(base: &str, index: usize) -> String {
    format!("{}{}", base, index)
}

fn singleton_binding(var: &str, value: Expr) -> crate::expr::Bindings {
    let mut b = crate::expr::Bindings::default();
    b.insert(var.to_string(), value);
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;

    #[test]
    fn test_induct_nat_produces_base_and_step() {
        let sig = Signature::peano();
        let stmt = Expr::app("=", vec![Expr::app("+", vec![Expr::var("N"), Expr::literal("0")]), Expr::var("N")]);
        let result = induct(&stmt, "N", &Type::named("Nat"), &sig).unwrap();

        let Expr::App(head, args) = &result else {
            panic!("expected and-application");
        };
        assert_eq!(head, "and");
        assert_eq!(args.len(), 2);

        let base = &args[0];
        let expected_base = Expr::app("=", vec![Expr::app("+", vec![Expr::literal("0"), Expr::literal("0")]), Expr::literal("0")]);
        assert_eq!(base, &expected_base);

        let Expr::App(step_head, step_args) = &args[1] else {
            panic!("expected implies step");
        };
        assert_eq!(step_head, "implies");
        assert_eq!(step_args.len(), 2);
    }

    #[test]
    fn test_induct_unregistered_type_is_none() {
        let sig = Signature::peano();
        let stmt = Expr::var("N");
        assert!(induct(&stmt, "N", &Type::Unknown, &sig).is_none());
    }

    #[test]
    fn test_induct_bool_both_conjuncts_are_base_cases() {
        let sig = Signature::peano();
        let stmt = Expr::app("=", vec![Expr::var("B"), Expr::var("B")]);
        let result = induct(&stmt, "B", &Type::named("Bool"), &sig).unwrap();
        let Expr::App(head, args) = &result else {
            panic!("expected and-application");
        };
        assert_eq!(head, "and");
        assert_eq!(args.len(), 2);
        // Both Bool constructors are nullary, so neither conjunct is an implication.
        for conjunct in args {
            assert!(!matches!(conjunct, Expr::App(h, _) if h == "implies"));
        }
    }
}
