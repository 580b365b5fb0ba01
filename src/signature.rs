// The type lattice (component C) and the signature / type-constructor
// tables it sits on top of (part of component A's data model, §3.2).

use fxhash::FxHashMap;

use crate::expr::Expr;

/// A type in the toy `Nat`/`Bool`/wildcard lattice.
///
/// `Top` is the wildcard `⊤`: it subsumes, and is subsumed only by, itself
/// and any other type. `Unknown` is the sentinel returned for a head that
/// isn't registered in the signature at all; it is not a real type and
/// never subsumes or is subsumed by anything, so matching against an
/// unknown head always fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Top,
    Named(String),
    Unknown,
}

impl Type {
    pub fn named(name: impl Into<String>) -> Type {
        Type::Named(name.into())
    }

    /// True iff `self` subsumes `other`: `self` is `⊤`, or the two types
    /// are the same named type. `Unknown` subsumes nothing and is
    /// subsumed by nothing but itself is never compared as equal.
    pub fn subsumes(&self, other: &Type) -> bool {
        matches!(self, Type::Top) || self == other
    }

    /// Narrows a prior constraint to a new one, as `matches` does when it
    /// revisits a variable: the tightest of the two if they're compatible,
    /// `None` if they conflict.
    pub fn tighten(&self, other: &Type) -> Option<Type> {
        if self == &Type::Top {
            return Some(other.clone());
        }
        if other == &Type::Top {
            return Some(self.clone());
        }
        if self == other {
            return Some(self.clone());
        }
        None
    }
}

/// How a registered literal is typed: a value has a single type name; a
/// function has a return type plus one argument-type slot per parameter,
/// any of which may be the wildcard.
#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Value(String),
    Function { ret: String, args: Vec<Type> },
}

impl TypeDescriptor {
    pub fn arity(&self) -> usize {
        match self {
            TypeDescriptor::Value(_) => 0,
            TypeDescriptor::Function { args, .. } => args.len(),
        }
    }

    pub fn return_type(&self) -> Type {
        match self {
            TypeDescriptor::Value(t) => Type::named(t.clone()),
            TypeDescriptor::Function { ret, .. } => Type::named(ret.clone()),
        }
    }
}

/// One constructor schema for an inductive type: either a nullary literal
/// or a literal applied to a fixed sequence of argument type names.
#[derive(Debug, Clone)]
pub enum Constructor {
    Nullary(String),
    Compound(String, Vec<String>),
}

impl Constructor {
    pub fn name(&self) -> &str {
        match self {
            Constructor::Nullary(n) => n,
            Constructor::Compound(n, _) => n,
        }
    }
}

/// A signature maps literal symbols to their type descriptors, and type
/// names to their ordered constructor schemas. Mutated only at startup by
/// the environment loader (§5): once a `prove` call is underway, the
/// signature is read-only.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    literals: FxHashMap<String, TypeDescriptor>,
    constructors: FxHashMap<String, Vec<Constructor>>,
}

impl Signature {
    pub fn new() -> Signature {
        Signature::default()
    }

    pub fn register_value(&mut self, name: impl Into<String>, typ: impl Into<String>) {
        self.literals.insert(name.into(), TypeDescriptor::Value(typ.into()));
    }

    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        ret: impl Into<String>,
        args: Vec<Type>,
    ) {
        self.literals.insert(
            name.into(),
            TypeDescriptor::Function { ret: ret.into(), args },
        );
    }

    pub fn register_constructors(&mut self, type_name: impl Into<String>, ctors: Vec<Constructor>) {
        self.constructors.insert(type_name.into(), ctors);
    }

    pub fn descriptor(&self, literal: &str) -> Option<&TypeDescriptor> {
        self.literals.get(literal)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.literals.contains_key(name)
    }

    pub fn arity(&self, head: &str) -> Option<usize> {
        self.descriptor(head).map(|d| d.arity())
    }

    /// The declared type for argument position `i` of `head`, or `None` if
    /// `head` isn't registered or `i` is out of range.
    pub fn arg_type(&self, head: &str, i: usize) -> Option<Type> {
        match self.descriptor(head)? {
            TypeDescriptor::Value(_) => None,
            TypeDescriptor::Function { args, .. } => args.get(i).cloned(),
        }
    }

    pub fn constructors(&self, type_name: &str) -> Option<&[Constructor]> {
        self.constructors.get(type_name).map(|v| v.as_slice())
    }

    /// `type_of(expr)`: for a literal, its declared type; for an
    /// application, the return type of its head; for a variable, `Top`
    /// (outside of a matching context there is no tighter constraint
    /// available; see [`crate::matcher`] for the context-sensitive case);
    /// `Unknown` if the head isn't registered.
    pub fn type_of(&self, e: &Expr) -> Type {
        match e {
            Expr::Literal(name) => self
                .descriptor(name)
                .map(|d| d.return_type())
                .unwrap_or(Type::Unknown),
            Expr::Variable(_) => Type::Top,
            Expr::App(head, _) => self
                .descriptor(head)
                .map(|d| d.return_type())
                .unwrap_or(Type::Unknown),
        }
    }

    /// Enumerates every registered *function* literal whose return type is
    /// `Bool`. A value literal like `true`/`false` also has return type
    /// `Bool` but is not a predicate: §3.2 defines `predicates()` over
    /// functions, mirroring `utils.py`'s `predicates()`, which only ever
    /// yields entries whose `literals[lit]` is a tuple (a function
    /// descriptor); a bare value literal is a plain string there and is
    /// never yielded.
    pub fn predicates(&self) -> Vec<&str> {
        self.literals
            .iter()
            .filter(|(_, d)| matches!(d, TypeDescriptor::Function { .. }) && d.return_type() == Type::named("Bool"))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// The Peano seed signature: booleans, naturals, and the connectives
    /// and arithmetic operators spec.md's worked examples use.
    pub fn peano() -> Signature {
        let mut sig = Signature::new();

        sig.register_value("true", "Bool");
        sig.register_value("false", "Bool");
        sig.register_value("0", "Nat");

        sig.register_function("s", "Nat", vec![Type::named("Nat")]);
        sig.register_function("+", "Nat", vec![Type::named("Nat"), Type::named("Nat")]);
        sig.register_function("*", "Nat", vec![Type::named("Nat"), Type::named("Nat")]);

        sig.register_function("and", "Bool", vec![Type::named("Bool"), Type::named("Bool")]);
        sig.register_function("or", "Bool", vec![Type::named("Bool"), Type::named("Bool")]);
        sig.register_function("implies", "Bool", vec![Type::named("Bool"), Type::named("Bool")]);
        sig.register_function("=", "Bool", vec![Type::Top, Type::Top]);

        sig.register_constructors(
            "Bool",
            vec![Constructor::Nullary("true".to_string()), Constructor::Nullary("false".to_string())],
        );
        sig.register_constructors(
            "Nat",
            vec![
                Constructor::Nullary("0".to_string()),
                Constructor::Compound("s".to_string(), vec!["Nat".to_string()]),
            ],
        );

        sig
    }
}

/// Lexical test for whether an identifier *looks* like a variable: begins
/// with an uppercase letter. Whether it actually *is* a variable also
/// depends on it not being registered in the signature (see
/// [`crate::parser`], which is the only place that needs both pieces of
/// information at once).
pub fn looks_like_variable(name: &str) -> bool {
    name.chars().next().map(|c| c.is_ascii_uppercase()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsumes() {
        assert!(Type::Top.subsumes(&Type::named("Nat")));
        assert!(Type::named("Nat").subsumes(&Type::named("Nat")));
        assert!(!Type::named("Nat").subsumes(&Type::named("Bool")));
        assert!(!Type::named("Nat").subsumes(&Type::Top));
    }

    #[test]
    fn test_tighten() {
        assert_eq!(Type::Top.tighten(&Type::named("Nat")), Some(Type::named("Nat")));
        assert_eq!(
            Type::named("Nat").tighten(&Type::named("Nat")),
            Some(Type::named("Nat"))
        );
        assert_eq!(Type::named("Nat").tighten(&Type::named("Bool")), None);
    }

    #[test]
    fn test_peano_predicates() {
        let sig = Signature::peano();
        let mut preds: Vec<&str> = sig.predicates();
        preds.sort();
        assert_eq!(preds, vec!["=", "and", "implies", "or"]);
    }

    #[test]
    fn test_type_of_unknown_head() {
        let sig = Signature::peano();
        let e = Expr::app("frobnicate", vec![Expr::literal("0")]);
        assert_eq!(sig.type_of(&e), Type::Unknown);
    }
}
