// The parser half of the surface-syntax collaborator specified in spec §6.1.
//
// Grammar:
//   expr ::= atom | function ws expr {ws expr} | expr ws operator ws expr
// with operators, in strictly increasing precedence, `or and implies = + *`,
// all left-associative. The algorithm is the classical shunting-yard,
// adapted so that a registered function symbol encountered where an operand
// is expected is treated as a prefix operator of the highest precedence,
// consuming exactly `arity(head)` operands off the output stack once that
// many have accumulated since it was pushed, mirroring the way the
// teacher's own expression parser gathers a flat run of tokens and reduces
// by precedence (see `expression.rs`'s `parse_partial_expressions`), just
// specialized to this crate's much smaller fixed operator set.

use std::fmt;

use crate::expr::Expr;
use crate::signature::{looks_like_variable, Signature};
use crate::token::{tokenize, LexError, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub index: usize,
    pub line: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}:", self.message)?;
        writeln!(f, "{}", self.line)?;
        for (i, _) in self.line.char_indices() {
            write!(f, "{}", if i < self.index { ' ' } else { '^' })?;
            if i >= self.index {
                break;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> ParseError {
        ParseError { message: e.message, index: e.index, line: e.line }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Binary operators, in strictly increasing precedence (matching spec
/// §6.1's listed order). Every one of these also doubles as a registered
/// arity-2 function name, so the same token can be used prefix (`+ 0 N`) or
/// infix (`0 + N`) depending on whether an operand is already pending.
const OPERATORS: [&str; 6] = ["or", "and", "implies", "=", "+", "*"];

fn precedence(op: &str) -> Option<u8> {
    OPERATORS.iter().position(|o| *o == op).map(|i| i as u8 + 1)
}

enum StackOp {
    LParen,
    BinOp(String),
    /// A prefix function application awaiting `arity` operands; `base` is
    /// the length of the output stack at the moment this was pushed, so
    /// `output.len() - base == arity` signals it is ready to reduce.
    Func { name: String, arity: usize, base: usize },
}

/// Parses one expression from `line` against `sig`.
pub fn parse(line: &str, sig: &Signature) -> Result<Expr> {
    let tokens = tokenize(line, sig)?;
    let mut output: Vec<Expr> = Vec::new();
    let mut ops: Vec<StackOp> = Vec::new();
    let mut expecting_operand = true;

    for tok in &tokens {
        match tok.kind {
            TokenKind::LeftParen => {
                if !expecting_operand {
                    return Err(unexpected(tok, "unexpected '('"));
                }
                ops.push(StackOp::LParen);
            }

            TokenKind::RightParen => {
                if expecting_operand {
                    return Err(unexpected(tok, "unexpected ')'"));
                }
                reduce_to_lparen(&mut ops, &mut output, tok)?;
                reduce_ready_funcs(&mut ops, &mut output);
                expecting_operand = awaiting_func_arg(&ops, output.len());
            }

            TokenKind::Atom => {
                let name = tok.text.as_str();

                if expecting_operand {
                    if let Some(arity) = sig.arity(name) {
                        if arity > 0 {
                            ops.push(StackOp::Func { name: name.to_string(), arity, base: output.len() });
                            expecting_operand = true;
                            continue;
                        }
                    }
                    if is_operator_name(name) {
                        return Err(unexpected(tok, "operator used where an operand was expected"));
                    }
                    output.push(atom_expr(name, sig));
                    reduce_ready_funcs(&mut ops, &mut output);
                    expecting_operand = awaiting_func_arg(&ops, output.len());
                } else {
                    let prec = precedence(name)
                        .ok_or_else(|| unexpected(tok, "expected an operator here"))?;
                    reduce_while_ge(&mut ops, &mut output, prec, tok)?;
                    ops.push(StackOp::BinOp(name.to_string()));
                    expecting_operand = true;
                }
            }
        }
    }

    if expecting_operand {
        return Err(ParseError {
            message: "expression ends with an operator that still expects an operand".to_string(),
            index: line.len(),
            line: line.to_string(),
        });
    }

    while let Some(op) = ops.pop() {
        match op {
            StackOp::BinOp(name) => reduce_binop(&mut output, &name),
            StackOp::LParen => {
                return Err(ParseError { message: "unmatched '('".to_string(), index: 0, line: line.to_string() })
            }
            StackOp::Func { name, arity, .. } => {
                return Err(ParseError {
                    message: format!("'{}' expects {} argument(s) but not enough were given", name, arity),
                    index: 0,
                    line: line.to_string(),
                })
            }
        }
    }

    if output.len() != 1 {
        return Err(ParseError { message: "malformed expression".to_string(), index: 0, line: line.to_string() });
    }
    Ok(output.pop().unwrap())
}

fn is_operator_name(name: &str) -> bool {
    OPERATORS.contains(&name)
}

fn atom_expr(name: &str, sig: &Signature) -> Expr {
    if name == "True" || name == "true" {
        Expr::truth()
    } else if name == "False" || name == "false" {
        Expr::falsehood()
    } else if sig.is_registered(name) {
        Expr::literal(name)
    } else if looks_like_variable(name) {
        Expr::var(name)
    } else {
        Expr::literal(name)
    }
}

/// True when the top of the operator stack is a function marker that still
/// needs more operands than `output_len` has supplied it so far: the
/// next token must itself begin another operand, not an infix operator.
fn awaiting_func_arg(ops: &[StackOp], output_len: usize) -> bool {
    matches!(ops.last(), Some(StackOp::Func { arity, base, .. }) if output_len - base < *arity)
}

/// Pops and reduces operators until (and including) the matching `(`.
fn reduce_to_lparen(ops: &mut Vec<StackOp>, output: &mut Vec<Expr>, tok: &Token) -> Result<()> {
    loop {
        match ops.pop() {
            Some(StackOp::LParen) => return Ok(()),
            Some(StackOp::BinOp(name)) => reduce_binop(output, &name),
            Some(StackOp::Func { name, arity, .. }) => {
                return Err(unexpected(tok, &format!("'{}' expects {} argument(s)", name, arity)))
            }
            None => return Err(unexpected(tok, "unmatched ')'")),
        }
    }
}

/// Reduces any binary operators on top of the stack whose precedence is `>=
/// prec` (left-associativity: equal precedence reduces before pushing the
/// new one), stopping at a paren or a pending function marker.
fn reduce_while_ge(ops: &mut Vec<StackOp>, output: &mut Vec<Expr>, prec: u8, tok: &Token) -> Result<()> {
    loop {
        match ops.last() {
            Some(StackOp::BinOp(name)) => {
                let top_prec = precedence(name).ok_or_else(|| unexpected(tok, "internal: bad operator"))?;
                if top_prec >= prec {
                    let StackOp::BinOp(name) = ops.pop().unwrap() else { unreachable!() };
                    reduce_binop(output, &name);
                } else {
                    return Ok(());
                }
            }
            _ => return Ok(()),
        }
    }
}

fn reduce_binop(output: &mut Vec<Expr>, name: &str) {
    let rhs = output.pop().expect("binop missing right operand");
    let lhs = output.pop().expect("binop missing left operand");
    output.push(Expr::app(name, vec![lhs, rhs]));
}

/// After any new item lands on `output`, reduce every function marker whose
/// argument count has just been satisfied, innermost (topmost) first.
fn reduce_ready_funcs(ops: &mut Vec<StackOp>, output: &mut Vec<Expr>) {
    loop {
        match ops.last() {
            Some(StackOp::Func { arity, base, .. }) if output.len() - base == *arity => {
                let Some(StackOp::Func { name, arity, base }) = ops.pop() else { unreachable!() };
                let args: Vec<Expr> = output.split_off(base);
                debug_assert_eq!(args.len(), arity);
                output.push(Expr::app(name, args));
            }
            _ => return,
        }
    }
}

fn unexpected(tok: &Token, message: &str) -> ParseError {
    ParseError { message: message.to_string(), index: tok.start, line: tok.line.clone() }
}
