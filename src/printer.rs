// The printer half of the surface-syntax collaborator (spec §6.1): renders
// an `Expr` back to the minimal parenthesization that round-trips through
// `parser::parse` for every tree shape the spec guarantees (left-associative
// chains at a single precedence level).

use crate::expr::Expr;

const OPERATORS: [&str; 6] = ["or", "and", "implies", "=", "+", "*"];

fn precedence(op: &str) -> Option<u8> {
    OPERATORS.iter().position(|o| *o == op).map(|i| i as u8 + 1)
}

/// Renders `e` as surface syntax.
pub fn print(e: &Expr) -> String {
    print_at(e, 0)
}

/// Renders `e`, parenthesizing it if needed as an operand of a surrounding
/// operator with precedence `surrounding_prec` (0 means "no surrounding
/// operator", i.e. top level). Per spec §6.1: parenthesize when `e`'s own
/// top operator has precedence strictly less than the surrounding one (our
/// operators are all left-associative, so the "equal precedence, surrounding
/// non-associative" case never fires).
fn print_at(e: &Expr, surrounding_prec: u8) -> String {
    match e {
        Expr::Literal(name) => name.clone(),
        Expr::Variable(name) => name.clone(),

        Expr::App(head, args) => {
            if let Some(op_prec) = precedence(head).filter(|_| args.len() == 2) {
                let body = format!("{} {} {}", print_at(&args[0], op_prec), head, print_at(&args[1], op_prec));
                if op_prec < surrounding_prec {
                    format!("({})", body)
                } else {
                    body
                }
            } else {
                print_function_application(head, args)
            }
        }
    }
}

/// A function-call expression `f a1 a2 ...`; each argument that is itself a
/// non-atomic application is always parenthesized, per spec §6.1, regardless
/// of precedence (so `s 0` but `s (s 0)`, and `+ (s 0) N`).
fn print_function_application(head: &str, args: &[Expr]) -> String {
    let mut out = head.to_string();
    for arg in args {
        out.push(' ');
        match arg {
            Expr::App(_, _) => out.push_str(&format!("({})", print(arg))),
            _ => out.push_str(&print(arg)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::signature::Signature;

    fn sig() -> Signature {
        Signature::peano()
    }

    #[test]
    fn test_print_atom() {
        assert_eq!(print(&Expr::literal("0")), "0");
        assert_eq!(print(&Expr::var("N")), "N");
    }

    #[test]
    fn test_print_minimal_parens_for_higher_precedence_child() {
        // '+' binds tighter than '=', so no parens are needed around it.
        let e = Expr::app("=", vec![Expr::app("+", vec![Expr::literal("0"), Expr::var("N")]), Expr::var("N")]);
        assert_eq!(print(&e), "0 + N = N");
    }

    #[test]
    fn test_print_parenthesizes_lower_precedence_child() {
        // '=' binds looser than '+', so (X = Y) needs parens as a '+' operand.
        let e = Expr::app("+", vec![Expr::app("=", vec![Expr::var("X"), Expr::var("Y")]), Expr::var("N")]);
        assert_eq!(print(&e), "(X = Y) + N");
    }

    #[test]
    fn test_print_nonatomic_function_argument_always_parenthesized() {
        let e = Expr::app("s", vec![Expr::app("s", vec![Expr::literal("0")])]);
        assert_eq!(print(&e), "s (s 0)");
    }

    #[test]
    fn test_print_roundtrips_through_parser() {
        let sig = sig();
        let originals = vec![
            "0 + N = N",
            "M + N = N + M",
            "s 0 = s 0",
            "X = Y implies Y = X",
        ];
        for src in originals {
            let parsed = parse(src, &sig).unwrap();
            let printed = print(&parsed);
            let reparsed = parse(&printed, &sig).unwrap();
            assert_eq!(parsed, reparsed, "roundtrip mismatch for {:?}: printed {:?}", src, printed);
        }
    }
}
