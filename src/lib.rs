//! hornet - a small Horn-clause engine
//!
//! Facts and rules over flat predicates, queried by depth-first SLD
//! resolution with derivation traces.
//!
//! # Architecture
//!
//! - [`term`] - constants, variables, predicates and clauses
//! - [`store`] - the insertion-ordered [`KnowledgeBase`]
//! - [`parser`] - `name(arg, ...)` facts, `head :- goal, ...` rules and queries
//! - [`reasoning`] - unification and the backward-chaining [`Resolver`]
//! - [`engine`] - an owned knowledge base with ingest and query entry points
//! - [`session`] - line-oriented scripts mixing knowledge and `?-` queries
//!
//! # Example
//!
//! ```
//! use hornet::Engine;
//!
//! let mut engine = Engine::new();
//! engine
//!     .add_knowledge(
//!         "parent(john, mary).\n\
//!          parent(mary, ann).\n\
//!          grandparent(X, Z) :- parent(X, Y), parent(Y, Z).",
//!     )
//!     .unwrap();
//!
//! let resolution = engine.resolve_query("grandparent(john, Z)").unwrap();
//! assert_eq!(resolution.solutions[0].to_string(), "grandparent(john, ann)");
//! assert_eq!(resolution.derivations.len(), 3);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod reasoning;
pub mod session;
pub mod store;
pub mod term;

// Re-export term types
pub use term::{Clause, Predicate, Rule, Term, Variable};

// Re-export store
pub use store::KnowledgeBase;

// Re-export parser
pub use parser::{parse_knowledge_text, parse_predicate, parse_query, parse_statement, ParseError};

// Re-export reasoning
pub use reasoning::{
    apply_substitution, unify, ConjunctionMode, Derivation, Resolution, ResolutionStats,
    Resolver, ResolverConfig, Substitution,
};

// Re-export engine and session
pub use engine::{Engine, EngineConfig, IngestPolicy};
pub use session::{Session, SessionSummary};

// Re-export configuration and errors
pub use config::{ConfigError, HornetConfig};
pub use error::{ErrorCode, HornetError, HornetResult};
