//! Predicate unification
//!
//! Unification is shallow: arguments are compared pairwise,
//! left to right, with no occurs check and no dereferencing of earlier
//! bindings. A variable bound twice within one call keeps the last binding.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::term::{Predicate, Term, Variable};

/// A mapping from variables to terms, in binding order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Substitution {
    bindings: IndexMap<Variable, Term>,
}

impl Substitution {
    /// Create an empty substitution
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `var` to `term`, replacing any earlier binding
    pub fn bind(&mut self, var: Variable, term: Term) {
        self.bindings.insert(var, term);
    }

    /// Look up a variable
    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.bindings.get(var)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// A copy of this substitution extended with `other`'s bindings
    pub fn merged(&self, other: Substitution) -> Substitution {
        let mut merged = self.clone();
        merged.bindings.extend(other.bindings);
        merged
    }

    /// Replace a bound variable by its binding, one step only
    pub fn apply_term(&self, term: &Term) -> Term {
        match term {
            Term::Variable(v) => self.bindings.get(v).cloned().unwrap_or_else(|| term.clone()),
            Term::Constant(_) => term.clone(),
        }
    }

    /// Follow variable-to-variable bindings until a constant or an unbound
    /// variable is reached.
    ///
    /// Without an occurs check a chain may loop back on itself; the walk is
    /// bounded by the number of bindings.
    pub fn walk(&self, term: &Term) -> Term {
        let mut current = term;
        for _ in 0..=self.bindings.len() {
            match current {
                Term::Variable(v) => match self.bindings.get(v) {
                    Some(next) if next != current => current = next,
                    _ => break,
                },
                Term::Constant(_) => break,
            }
        }
        current.clone()
    }

    /// Apply to every argument of a predicate, one step per argument
    pub fn apply(&self, predicate: &Predicate) -> Predicate {
        Predicate {
            name: predicate.name.clone(),
            args: predicate.args.iter().map(|a| self.apply_term(a)).collect(),
        }
    }

    /// Apply to every argument of a predicate, following binding chains
    pub fn resolve(&self, predicate: &Predicate) -> Predicate {
        Predicate {
            name: predicate.name.clone(),
            args: predicate.args.iter().map(|a| self.walk(a)).collect(),
        }
    }

    /// Resolve `query` for reporting as an answer.
    ///
    /// Like [`resolve`](Self::resolve), but a query variable that ends on an
    /// unbound variable is reported under a query variable's name: the first
    /// query variable reaching that end variable names it, so shared ends
    /// stay shared and renamed clause variables never show up in answers.
    pub fn answer(&self, query: &Predicate) -> Predicate {
        let mut names: IndexMap<Variable, Variable> = IndexMap::new();
        let args = query
            .args
            .iter()
            .map(|arg| match (arg, self.walk(arg)) {
                (Term::Variable(original), Term::Variable(end)) => {
                    Term::Variable(names.entry(end).or_insert_with(|| original.clone()).clone())
                }
                (_, value) => value,
            })
            .collect();
        Predicate {
            name: query.name.clone(),
            args,
        }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", var, term)?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(Variable, Term)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (Variable, Term)>>(iter: I) -> Self {
        Substitution { bindings: iter.into_iter().collect() }
    }
}

/// Compute a substitution making `p1` and `p2` equal, or `None`.
///
/// Fails when names or arities differ. For each argument pair, a variable
/// on the left is bound to the right-hand term, otherwise a variable on the
/// right is bound to the left-hand term; two constants must be equal.
pub fn unify(p1: &Predicate, p2: &Predicate) -> Option<Substitution> {
    if p1.name != p2.name || p1.args.len() != p2.args.len() {
        return None;
    }

    let mut substitution = Substitution::new();
    for (a1, a2) in p1.args.iter().zip(&p2.args) {
        match (a1, a2) {
            (Term::Variable(v), _) => substitution.bind(v.clone(), a2.clone()),
            (_, Term::Variable(v)) => substitution.bind(v.clone(), a1.clone()),
            (Term::Constant(c1), Term::Constant(c2)) if c1 != c2 => return None,
            _ => {}
        }
    }
    Some(substitution)
}

/// Replace each bound variable argument of `predicate` with its binding.
///
/// Unbound variables and constants pass through unchanged.
pub fn apply_substitution(predicate: &Predicate, substitution: &Substitution) -> Predicate {
    substitution.apply(predicate)
}
