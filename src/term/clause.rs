//! Facts and Horn rules

use std::fmt;

use serde::Serialize;

use super::Predicate;

/// A Horn rule: `head :- body1, body2, ...`
///
/// The head holds when every body predicate holds, checked left to right.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Rule {
    pub head: Predicate,
    pub body: Vec<Predicate>,
}

impl Rule {
    pub fn new(head: Predicate, body: Vec<Predicate>) -> Self {
        Rule { head, body }
    }

    /// Rename every variable in the rule apart using `generation`
    pub fn renamed(&self, generation: usize) -> Rule {
        Rule {
            head: self.head.renamed(generation),
            body: self.body.iter().map(|p| p.renamed(generation)).collect(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :- ", self.head)?;
        for (i, goal) in self.body.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", goal)?;
        }
        write!(f, ".")
    }
}

/// An entry in the knowledge base
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Clause {
    /// An unconditionally true predicate
    Fact { predicate: Predicate },
    /// A conditional clause
    Rule(Rule),
}

impl Clause {
    /// Create a fact
    pub fn fact(predicate: Predicate) -> Self {
        Clause::Fact { predicate }
    }

    /// Create a rule
    pub fn rule(head: Predicate, body: Vec<Predicate>) -> Self {
        Clause::Rule(Rule::new(head, body))
    }

    /// The predicate this clause concludes
    pub fn head(&self) -> &Predicate {
        match self {
            Clause::Fact { predicate } => predicate,
            Clause::Rule(rule) => &rule.head,
        }
    }

    /// Name of the concluded predicate
    pub fn name(&self) -> &str {
        &self.head().name
    }

    pub fn is_fact(&self) -> bool {
        matches!(self, Clause::Fact { .. })
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, Clause::Rule(_))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Fact { predicate } => write!(f, "{}.", predicate),
            Clause::Rule(rule) => write!(f, "{}", rule),
        }
    }
}
