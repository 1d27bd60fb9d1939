//! Term and predicate representations
//!
//! This module defines the data model the engine reasons over:
//! - Terms: constants (opaque identifiers) and variables
//! - Predicates: a name applied to an ordered list of terms
//! - Clauses: facts and Horn rules built from predicates
//!
//! Whether a token denotes a variable is decided once, when the term is
//! built (see [`Term::from_token`]), so the rest of the engine matches on
//! the variant instead of re-inspecting text.

use std::fmt;

use serde::{Serialize, Serializer};

mod clause;
mod variable;

pub use clause::{Clause, Rule};
pub use variable::{Variable, RENAME_SEPARATOR};

/// Check whether a textual argument names a variable.
///
/// This is the engine's only variable-recognition rule: the first
/// character is an ASCII uppercase letter.
pub fn is_variable_name(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// A term: either a constant or a variable
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// An opaque identifier such as `john`
    Constant(String),
    /// A logic variable such as `X`
    Variable(Variable),
}

impl Term {
    /// Create a constant term
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Constant(name.into())
    }

    /// Create a variable term
    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(Variable::new(name))
    }

    /// Classify a source token as a constant or a variable
    pub fn from_token(token: &str) -> Self {
        if is_variable_name(token) {
            Term::variable(token)
        } else {
            Term::constant(token)
        }
    }

    /// Check if this term is a variable
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Check if this term is a constant
    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }

    /// Get the variable if this is a variable term
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(v) => Some(v),
            Term::Constant(_) => None,
        }
    }

    /// The textual form of the term
    pub fn name(&self) -> &str {
        match self {
            Term::Constant(c) => c,
            Term::Variable(v) => v.name(),
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(c) => write!(f, "{}", c),
            Term::Variable(v) => write!(f, "{:?}", v),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Term {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A predicate: a name applied to an ordered argument list
///
/// Two predicates can only unify when both name and arity agree.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Predicate {
    pub name: String,
    pub args: Vec<Term>,
}

impl Predicate {
    pub fn new(name: impl Into<String>, args: Vec<Term>) -> Self {
        Predicate { name: name.into(), args }
    }

    /// Build a predicate from source tokens, classifying each argument
    pub fn from_tokens<I, S>(name: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Predicate {
            name: name.into(),
            args: tokens.into_iter().map(|t| Term::from_token(t.as_ref())).collect(),
        }
    }

    /// Number of arguments
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Check if this predicate contains no variables
    pub fn is_ground(&self) -> bool {
        self.args.iter().all(Term::is_constant)
    }

    /// Distinct variables in argument order
    pub fn variables(&self) -> Vec<&Variable> {
        let mut vars: Vec<&Variable> = Vec::new();
        for var in self.args.iter().filter_map(Term::as_variable) {
            if !vars.contains(&var) {
                vars.push(var);
            }
        }
        vars
    }

    /// Rename every variable apart using `generation`
    pub fn renamed(&self, generation: usize) -> Predicate {
        Predicate {
            name: self.name.clone(),
            args: self
                .args
                .iter()
                .map(|arg| match arg {
                    Term::Variable(v) => Term::Variable(v.renamed(generation)),
                    Term::Constant(_) => arg.clone(),
                })
                .collect(),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_variable_name() {
        assert!(is_variable_name("X"));
        assert!(is_variable_name("Person"));
        assert!(!is_variable_name("Ärger"));
        assert!(!is_variable_name("john"));
        assert!(!is_variable_name("_x"));
        assert!(!is_variable_name("42"));
        assert!(!is_variable_name(""));
    }

    #[test]
    fn test_term_classification() {
        assert!(Term::from_token("X").is_variable());
        assert!(Term::from_token("mary").is_constant());
        assert_eq!(Term::from_token("Y"), Term::variable("Y"));
        assert_eq!(Term::from_token("ann"), Term::constant("ann"));
    }

    #[test]
    fn test_predicate_display() {
        let p = Predicate::from_tokens("parent", ["john", "X"]);
        assert_eq!(p.to_string(), "parent(john, X)");
        assert_eq!(p.arity(), 2);
        assert!(!p.is_ground());

        let empty = Predicate::new("halt", vec![]);
        assert_eq!(empty.to_string(), "halt()");
        assert!(empty.is_ground());
    }

    #[test]
    fn test_predicate_variables_are_distinct() {
        let p = Predicate::from_tokens("edge", ["X", "a", "X", "Y"]);
        let names: Vec<&str> = p.variables().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn test_predicate_renamed() {
        let p = Predicate::from_tokens("parent", ["X", "mary"]);
        let r = p.renamed(3);
        assert_eq!(r.to_string(), "parent(X#3, mary)");
        assert_eq!(r.args[1], Term::constant("mary"));
    }

    #[test]
    fn test_predicate_serializes_as_strings() {
        let p = Predicate::from_tokens("likes", ["Who", "pizza"]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"name":"likes","args":["Who","pizza"]}"#);
    }
}
