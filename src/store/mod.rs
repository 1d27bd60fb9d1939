//! Knowledge base (clause store)
//!
//! An insertion-ordered, append-only sequence of clauses. Order is
//! significant: the resolver tries clauses in the order they were added,
//! which decides which solution is found first. Duplicates are kept and
//! each copy is tried independently.

use std::fmt;

use crate::term::Clause;

/// An ordered collection of facts and rules
#[derive(Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    clauses: Vec<Clause>,
}

impl KnowledgeBase {
    /// Create a new empty knowledge base
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause
    pub fn add(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Append multiple clauses, preserving their order
    pub fn add_all(&mut self, clauses: impl IntoIterator<Item = Clause>) {
        self.clauses.extend(clauses);
    }

    /// Clauses concluding the predicate `name`, in insertion order
    pub fn clauses_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Clause> + 'a {
        self.clauses.iter().filter(move |c| c.name() == name)
    }


    /// Get the number of clauses
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Check if the knowledge base is empty
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of facts
    pub fn fact_count(&self) -> usize {
        self.clauses.iter().filter(|c| c.is_fact()).count()
    }

    /// Number of rules
    pub fn rule_count(&self) -> usize {
        self.clauses.iter().filter(|c| c.is_rule()).count()
    }

    /// Remove every clause
    pub fn clear(&mut self) {
        self.clauses.clear();
    }
}

impl<'a> IntoIterator for &'a KnowledgeBase {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

impl FromIterator<Clause> for KnowledgeBase {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        KnowledgeBase { clauses: iter.into_iter().collect() }
    }
}

impl fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "KnowledgeBase {{")?;
        for clause in &self.clauses {
            writeln!(f, "  {}", clause)?;
        }
        write!(f, "}}")
    }
}
