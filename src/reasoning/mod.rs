//! Unification and goal-directed resolution
//!
//! # Usage
//!
//! ```
//! use hornet::{parse_knowledge_text, parse_query, KnowledgeBase, Resolver};
//!
//! let kb: KnowledgeBase = parse_knowledge_text(
//!     "parent(john, mary).\n\
//!      parent(mary, ann).\n\
//!      grandparent(X, Z) :- parent(X, Y), parent(Y, Z).",
//! )
//! .unwrap()
//! .into_iter()
//! .collect();
//!
//! let resolution = Resolver::new(&kb).answer(&parse_query("grandparent(john, Who)").unwrap());
//! assert_eq!(resolution.solutions[0].to_string(), "grandparent(john, ann)");
//! ```
//!
//! # Conjunction modes
//!
//! - `Threaded` (default): body goals share bindings left to right, with
//!   backtracking, and answers carry every binding found on the way.
//! - `SinglePass`: each body goal is checked on its own under the head
//!   substitution; answers carry head bindings only.

mod backward;
mod strategy;
mod trace;
mod unify;

pub use backward::Resolver;
pub use strategy::{ConjunctionMode, ResolutionStats, ResolverConfig};
pub use trace::{Derivation, Resolution};
pub use unify::{apply_substitution, unify, Substitution};
