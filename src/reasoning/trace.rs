//! Derivation traces and query results
//!
//! A [`Derivation`] is the ordered chain of clause predicates (facts and
//! rule heads, as written in the knowledge base) that one successful clause
//! application went through. Traces are observational only: they are
//! collected as return values and never influence the search.

use std::fmt;

use serde::Serialize;

use super::strategy::ResolutionStats;
use crate::error::HornetResult;
use crate::term::Predicate;

/// One derivation path, root first
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Derivation {
    steps: Vec<Predicate>,
}

impl Derivation {
    /// An empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this path with `step` appended
    pub fn extended(&self, step: Predicate) -> Derivation {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend(self.steps.iter().cloned());
        steps.push(step);
        Derivation { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.steps.iter()
    }
}

impl From<Vec<Predicate>> for Derivation {
    fn from(steps: Vec<Predicate>) -> Self {
        Derivation { steps }
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// The outcome of resolving one query
#[derive(Clone, Debug, Serialize)]
pub struct Resolution {
    /// The query as parsed
    pub query: Predicate,
    /// Resolved instances of the query, one per proof, in search order
    pub solutions: Vec<Predicate>,
    /// Derivation paths in the order they were completed
    pub derivations: Vec<Derivation>,
    pub stats: ResolutionStats,
}

impl Resolution {
    /// Whether at least one solution was found
    pub fn is_success(&self) -> bool {
        !self.solutions.is_empty()
    }

    /// Solutions as `name(arg, ...)` lines under a `Results:` header, or the
    /// no-solution notice
    pub fn format_solutions(&self) -> String {
        if self.solutions.is_empty() {
            return "No solution found.".to_string();
        }
        let mut output = String::from("Results:");
        for solution in &self.solutions {
            output.push('\n');
            output.push_str(&solution.to_string());
        }
        output
    }

    /// Render every derivation as an indented tree under a `Query` root
    pub fn format_trace(&self) -> String {
        let mut output = String::new();
        for (i, derivation) in self.derivations.iter().enumerate() {
            output.push_str(&format!("Derivation {}:\nQuery\n", i + 1));
            for (depth, step) in derivation.iter().enumerate() {
                output.push_str(&format!("{}└─ {}\n", "   ".repeat(depth), step));
            }
        }
        output
    }

    /// Plain text report, optionally followed by the derivation trees
    pub fn to_text(&self, with_trace: bool) -> String {
        let mut output = self.format_solutions();
        output.push('\n');
        if with_trace && !self.derivations.is_empty() {
            output.push('\n');
            output.push_str(&self.format_trace());
        }
        output
    }

    /// Single-line JSON, one resolution per line in JSON output mode
    pub fn to_json(&self) -> HornetResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
