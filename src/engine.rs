//! The query engine: an owned knowledge base with ingest and query entry points
//!
//! An [`Engine`] is the only thing that mutates its [`KnowledgeBase`], and it
//! only ever appends. Queries borrow the knowledge base read-only, so every
//! query sees the same clauses until the next ingest.
//!
//! ```
//! use hornet::Engine;
//!
//! let mut engine = Engine::new();
//! engine.add_knowledge("parent(john, mary).\nparent(mary, ann).").unwrap();
//!
//! let resolution = engine.resolve_query("parent(john, X)").unwrap();
//! assert_eq!(resolution.format_solutions(), "Results:\nparent(john, mary)");
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::HornetConfig;
use crate::error::{ErrorCode, HornetResult};
use crate::parser::{parse_query, statements};
use crate::reasoning::{Resolution, Resolver, ResolverConfig};
use crate::store::KnowledgeBase;
use crate::term::Predicate;

/// What a multi-line submission leaves behind when one of its lines is malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IngestPolicy {
    /// Parse every line before adding anything; a bad line adds nothing
    #[default]
    AllOrNothing,
    /// Keep the statements that precede the bad line
    Prefix,
}

impl IngestPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestPolicy::AllOrNothing => "all-or-nothing",
            IngestPolicy::Prefix => "prefix",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all-or-nothing" | "all_or_nothing" | "atomic" | "all" => {
                Some(IngestPolicy::AllOrNothing)
            }
            "prefix" | "partial" => Some(IngestPolicy::Prefix),
            _ => None,
        }
    }
}

/// Engine settings
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub resolver: ResolverConfig,
    pub ingest: IngestPolicy,
}

impl From<&HornetConfig> for EngineConfig {
    fn from(config: &HornetConfig) -> Self {
        EngineConfig {
            resolver: ResolverConfig::new()
                .with_max_depth(config.resolution.max_depth)
                .with_conjunction(config.resolution.conjunction),
            ingest: config.ingest.policy,
        }
    }
}

/// Knowledge base plus the settings used to query it
#[derive(Debug, Default)]
pub struct Engine {
    kb: KnowledgeBase,
    config: EngineConfig,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Engine {
            kb: KnowledgeBase::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Parse `text` (one statement per non-blank line) and add it to the
    /// knowledge base, returning the number of clauses added.
    ///
    /// A malformed line fails the call with the line's parse error. What was
    /// added before that line depends on the [`IngestPolicy`].
    pub fn add_knowledge(&mut self, text: &str) -> HornetResult<usize> {
        let added = match self.config.ingest {
            IngestPolicy::AllOrNothing => {
                let clauses = statements(text).collect::<Result<Vec<_>, _>>()?;
                let count = clauses.len();
                self.kb.add_all(clauses);
                count
            }
            IngestPolicy::Prefix => {
                let mut count = 0;
                for clause in statements(text) {
                    match clause {
                        Ok(clause) => {
                            self.kb.add(clause);
                            count += 1;
                        }
                        Err(e) => {
                            info!(kept = count, "partial knowledge submission rejected");
                            return Err(e.into());
                        }
                    }
                }
                count
            }
        };

        info!(
            added,
            facts = self.kb.fact_count(),
            rules = self.kb.rule_count(),
            "knowledge added"
        );
        Ok(added)
    }

    /// Parse `text` as a query and resolve it
    ///
    /// Parse failures are errors. A query with no solution is not: it comes
    /// back as a [`Resolution`] with no solutions.
    pub fn resolve_query(&self, text: &str) -> HornetResult<Resolution> {
        crate::hornet_ensure!(!text.trim().is_empty(), ErrorCode::EmptyStatement, "query cannot be empty");
        let query = parse_query(text)?;
        debug!(text = text.trim(), query = %query, "parsed query");
        Ok(self.resolve(&query))
    }

    /// Resolve an already-parsed query
    pub fn resolve(&self, query: &Predicate) -> Resolution {
        Resolver::with_config(&self.kb, self.config.resolver.clone()).answer(query)
    }

    /// Drop every clause
    pub fn clear(&mut self) {
        self.kb.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reasoning::{unify, apply_substitution, ConjunctionMode};
    use crate::term::Term;

    const FAMILY: &str = "parent(john, mary).\n\
                          parent(mary, ann).\n\
                          grandparent(X, Z) :- parent(X, Y), parent(Y, Z).";

    fn family() -> Engine {
        let mut engine = Engine::new();
        engine.add_knowledge(FAMILY).unwrap();
        engine
    }

    fn context<'a>(err: &'a crate::HornetError, key: &str) -> Option<&'a str> {
        err.context.as_ref()?.fields.get(key).map(String::as_str)
    }

    fn solutions(engine: &Engine, query: &str) -> Vec<String> {
        engine
            .resolve_query(query)
            .unwrap()
            .solutions
            .iter()
            .map(|p| p.to_string())
            .collect()
    }

    #[test]
    fn test_add_knowledge_counts() {
        let mut engine = Engine::new();
        assert_eq!(engine.add_knowledge(FAMILY).unwrap(), 3);
        assert_eq!(engine.knowledge_base().fact_count(), 2);
        assert_eq!(engine.knowledge_base().rule_count(), 1);
        assert_eq!(engine.add_knowledge("\n   \n").unwrap(), 0);
    }

    #[test]
    fn test_single_fact_query() {
        let mut engine = Engine::new();
        engine.add_knowledge("parent(john, mary)").unwrap();
        assert_eq!(solutions(&engine, "parent(john, X)"), vec!["parent(john, mary)"]);
    }

    #[test]
    fn test_grandparent_query() {
        assert_eq!(solutions(&family(), "grandparent(john, Z)"), vec!["grandparent(john, ann)"]);
    }

    #[test]
    fn test_answers_never_show_renamed_variables() {
        let mut engine = Engine::new();
        engine.add_knowledge("same(Z, Z).\np(A, B) :- same(A, B).").unwrap();
        assert_eq!(solutions(&engine, "same(X, Y)"), vec!["same(X, X)"]);
        assert_eq!(solutions(&engine, "p(X, Y)"), vec!["p(X, X)"]);

        let json = engine.resolve_query("p(X, Y)").unwrap().to_json().unwrap();
        assert!(!json.contains('#'));
    }

    #[test]
    fn test_non_ascii_argument_is_rejected() {
        let mut engine = Engine::new();
        let err = engine.add_knowledge("likes(j\u{f6}rg, pizza).").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPredicate);
        assert!(engine.knowledge_base().is_empty());
    }

    #[test]
    fn test_query_prefix_and_period() {
        assert_eq!(
            solutions(&family(), "?- grandparent(john, Z)."),
            vec!["grandparent(john, ann)"]
        );
    }

    #[test]
    fn test_unknown_predicate_is_not_an_error() {
        let resolution = family().resolve_query("sibling(john, X)").unwrap();
        assert!(!resolution.is_success());
        assert_eq!(resolution.format_solutions(), "No solution found.");
    }

    #[test]
    fn test_malformed_query_is_parse_error() {
        let err = family().resolve_query("parent john, X)").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPredicate);
        assert!(err.message.contains("parent john, X)"));
    }

    #[test]
    fn test_empty_query() {
        let err = family().resolve_query("   ").unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyStatement);
    }

    #[test]
    fn test_malformed_statement_leaves_kb_unchanged() {
        let mut engine = family();
        let err = engine
            .add_knowledge("parent(ann, bob).\nparent john, mary)")
            .unwrap_err();

        assert!(err.is_parse_error());
        assert_eq!(context(&err, "line"), Some("2"));
        assert_eq!(context(&err, "text"), Some("parent john, mary)"));
        assert_eq!(engine.knowledge_base().len(), 3);
        assert!(solutions(&engine, "parent(ann, X)").is_empty());
    }

    #[test]
    fn test_prefix_policy_keeps_earlier_lines() {
        let mut engine = Engine::with_config(EngineConfig {
            ingest: IngestPolicy::Prefix,
            ..EngineConfig::default()
        });
        let err = engine
            .add_knowledge("parent(ann, bob).\nparent john, mary)\nparent(bob, cy).")
            .unwrap_err();

        assert_eq!(context(&err, "line"), Some("2"));
        assert_eq!(engine.knowledge_base().len(), 1);
        assert_eq!(solutions(&engine, "parent(ann, X)"), vec!["parent(ann, bob)"]);
        assert!(solutions(&engine, "parent(bob, X)").is_empty());
    }

    #[test]
    fn test_repeated_queries_are_deterministic() {
        let engine = family();
        let first = engine.resolve_query("grandparent(X, Y)").unwrap();
        let second = engine.resolve_query("grandparent(X, Y)").unwrap();
        assert_eq!(first.solutions, second.solutions);
        assert_eq!(first.derivations, second.derivations);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn test_unify_properties() {
        let a = Predicate::from_tokens("parent", ["john", "X"]);
        let b = Predicate::from_tokens("parent", ["Y", "mary"]);
        assert_eq!(unify(&a, &b).is_some(), unify(&b, &a).is_some());

        let other_name = Predicate::from_tokens("child", ["john", "X"]);
        let other_arity = Predicate::from_tokens("parent", ["john"]);
        assert!(unify(&a, &other_name).is_none());
        assert!(unify(&a, &other_arity).is_none());

        let ground = Predicate::new("parent", vec![Term::constant("john"), Term::constant("mary")]);
        let subst = unify(&a, &b).unwrap();
        assert_eq!(apply_substitution(&ground, &subst), ground);
    }

    #[test]
    fn test_config_mapping() {
        let mut config = HornetConfig::new();
        config.resolution.max_depth = 7;
        config.resolution.conjunction = ConjunctionMode::SinglePass;
        config.ingest.policy = IngestPolicy::Prefix;

        let engine_config = EngineConfig::from(&config);
        assert_eq!(engine_config.resolver.max_depth, 7);
        assert_eq!(engine_config.resolver.conjunction, ConjunctionMode::SinglePass);
        assert_eq!(engine_config.ingest, IngestPolicy::Prefix);
    }

    #[test]
    fn test_single_pass_engine() {
        let mut engine = Engine::with_config(EngineConfig {
            resolver: ResolverConfig::new().with_conjunction(ConjunctionMode::SinglePass),
            ..EngineConfig::default()
        });
        engine.add_knowledge(FAMILY).unwrap();
        assert_eq!(solutions(&engine, "grandparent(john, Z)"), vec!["grandparent(john, Z)"]);
    }

    #[test]
    fn test_clear() {
        let mut engine = family();
        engine.clear();
        assert!(engine.knowledge_base().is_empty());
        assert!(solutions(&engine, "parent(john, X)").is_empty());
    }

    #[test]
    fn test_ingest_policy_from_str() {
        assert_eq!(IngestPolicy::from_str("prefix"), Some(IngestPolicy::Prefix));
        assert_eq!(IngestPolicy::from_str("ALL-OR-NOTHING"), Some(IngestPolicy::AllOrNothing));
        assert_eq!(IngestPolicy::from_str("sometimes"), None);
        assert_eq!(IngestPolicy::Prefix.as_str(), "prefix");
    }
}
