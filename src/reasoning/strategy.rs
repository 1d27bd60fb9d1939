//! Resolver configuration and statistics

use serde::{Deserialize, Serialize};

/// How the goals of a rule body are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConjunctionMode {
    /// Solve body goals left to right, threading each solution's bindings
    /// into the next goal and backtracking over alternatives. Clause
    /// variables are renamed apart on every use.
    #[default]
    Threaded,
    /// Resolve each body goal independently under the head substitution
    /// only; the rule holds if every goal has at least one solution. Answers
    /// carry only head bindings.
    SinglePass,
}

impl ConjunctionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConjunctionMode::Threaded => "threaded",
            ConjunctionMode::SinglePass => "single-pass",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "threaded" | "sld" | "full" => Some(ConjunctionMode::Threaded),
            "single-pass" | "single_pass" | "singlepass" | "simple" => {
                Some(ConjunctionMode::SinglePass)
            }
            _ => None,
        }
    }
}

/// Configuration for the resolver
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Maximum goal depth (0 = unlimited)
    pub max_depth: usize,
    /// Body conjunction strategy
    pub conjunction: ConjunctionMode,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_conjunction(mut self, conjunction: ConjunctionMode) -> Self {
        self.conjunction = conjunction;
        self
    }

    /// Whether a goal at `depth` may still be expanded
    pub fn allows_depth(&self, depth: usize) -> bool {
        self.max_depth == 0 || depth <= self.max_depth
    }
}

/// Counters collected during one resolution
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// Goals expanded against the knowledge base
    pub goals_attempted: usize,
    /// Unifications against same-named clause heads
    pub unifications_attempted: usize,
    /// Unifications that produced a substitution
    pub unifications_succeeded: usize,
    /// Derivation paths recorded
    pub derivations: usize,
    /// Solutions returned for the top-level query
    pub solutions: usize,
    /// Goals pruned by the depth limit
    pub depth_cutoffs: usize,
    /// Deepest goal expanded
    pub max_depth_reached: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conjunction_from_str() {
        assert_eq!(ConjunctionMode::from_str("threaded"), Some(ConjunctionMode::Threaded));
        assert_eq!(ConjunctionMode::from_str("Single-Pass"), Some(ConjunctionMode::SinglePass));
        assert_eq!(ConjunctionMode::from_str("bogus"), None);
        assert_eq!(ConjunctionMode::SinglePass.as_str(), "single-pass");
    }

    #[test]
    fn test_allows_depth() {
        let unlimited = ResolverConfig::new();
        assert!(unlimited.allows_depth(usize::MAX));

        let limited = ResolverConfig::new().with_max_depth(3);
        assert!(limited.allows_depth(3));
        assert!(!limited.allows_depth(4));
    }
}
