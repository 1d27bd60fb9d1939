//! Backward chaining (SLD resolution)
//!
//! Top-down, goal-directed proof search:
//! 1. Try every clause of the knowledge base in insertion order
//! 2. A fact proves the goal if it unifies with it
//! 3. A rule proves the goal if its head unifies and every body goal is
//!    proved in turn, depth first
//!
//! There is no memoization and no cycle detection. Mutually recursive
//! rules recurse until the stack is exhausted unless a depth limit is
//! configured.

use tracing::{debug, trace};

use super::strategy::{ConjunctionMode, ResolutionStats, ResolverConfig};
use super::trace::{Derivation, Resolution};
use super::unify::{apply_substitution, unify, Substitution};
use crate::store::KnowledgeBase;
use crate::term::{Clause, Predicate};

/// Depth-first resolver over a borrowed knowledge base
///
/// The knowledge base is only read, so any number of resolvers may share
/// one. Substitutions are threaded by value: sibling branches never see
/// each other's bindings.
#[derive(Debug)]
pub struct Resolver<'kb> {
    kb: &'kb KnowledgeBase,
    config: ResolverConfig,
    stats: ResolutionStats,
    derivations: Vec<Derivation>,
    /// Counter for renaming clause variables apart
    generation: usize,
}

impl<'kb> Resolver<'kb> {
    /// Create a resolver with the default configuration
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self::with_config(kb, ResolverConfig::default())
    }

    /// Create a resolver with a custom configuration
    pub fn with_config(kb: &'kb KnowledgeBase, config: ResolverConfig) -> Self {
        Resolver {
            kb,
            config,
            stats: ResolutionStats::default(),
            derivations: Vec::new(),
            generation: 0,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Derivations recorded so far, in completion order
    pub fn derivations(&self) -> &[Derivation] {
        &self.derivations
    }

    /// Resolve `query`, returning its resolved instance for every proof found.
    ///
    /// `path` is the derivation prefix leading to this query. Derivations
    /// accumulate across calls on the same resolver.
    pub fn resolve(&mut self, query: &Predicate, path: &Derivation) -> Vec<Predicate> {
        match self.config.conjunction {
            ConjunctionMode::Threaded => self
                .solve_goal(query, &Substitution::new(), path, 0)
                .iter()
                .map(|bindings| bindings.answer(query))
                .collect(),
            ConjunctionMode::SinglePass => self.resolve_single_pass(query, path, 0),
        }
    }

    /// Resolve `query` from an empty trace and collect the full outcome
    pub fn answer(mut self, query: &Predicate) -> Resolution {
        debug!(query = %query, mode = self.config.conjunction.as_str(), "resolving query");
        let solutions = self.resolve(query, &Derivation::new());
        self.stats.solutions = solutions.len();
        debug!(
            query = %query,
            solutions = solutions.len(),
            derivations = self.derivations.len(),
            goals = self.stats.goals_attempted,
            "query resolved"
        );
        Resolution {
            query: query.clone(),
            solutions,
            derivations: self.derivations,
            stats: self.stats,
        }
    }

    /// Check the depth limit and update depth statistics
    fn enter(&mut self, goal: &Predicate, depth: usize) -> bool {
        if !self.config.allows_depth(depth) {
            self.stats.depth_cutoffs += 1;
            debug!(goal = %goal, depth, limit = self.config.max_depth, "depth limit reached, pruning goal");
            return false;
        }
        self.stats.goals_attempted += 1;
        self.stats.max_depth_reached = self.stats.max_depth_reached.max(depth);
        trace!(goal = %goal, depth, "solving goal");
        true
    }

    fn try_unify(&mut self, goal: &Predicate, head: &Predicate) -> Option<Substitution> {
        self.stats.unifications_attempted += 1;
        let result = unify(goal, head);
        if result.is_some() {
            self.stats.unifications_succeeded += 1;
        }
        result
    }

    fn record(&mut self, derivation: Derivation) {
        trace!(path = %derivation, "derivation");
        self.stats.derivations += 1;
        self.derivations.push(derivation);
    }

    fn next_generation(&mut self) -> usize {
        self.generation += 1;
        self.generation
    }

    /// Solve one goal under `bindings`, returning every extended substitution
    fn solve_goal(
        &mut self,
        goal: &Predicate,
        bindings: &Substitution,
        path: &Derivation,
        depth: usize,
    ) -> Vec<Substitution> {
        let goal = bindings.resolve(goal);
        if !self.enter(&goal, depth) {
            return vec![];
        }

        let kb = self.kb;
        let mut results = Vec::new();

        for clause in kb.clauses_named(&goal.name) {
            match clause {
                Clause::Fact { predicate } => {
                    let fact = if predicate.is_ground() {
                        predicate.clone()
                    } else {
                        let generation = self.next_generation();
                        predicate.renamed(generation)
                    };
                    if let Some(unifier) = self.try_unify(&goal, &fact) {
                        self.record(path.extended(predicate.clone()));
                        results.push(bindings.merged(unifier));
                    }
                }
                Clause::Rule(rule) => {
                    let generation = self.next_generation();
                    let renamed = rule.renamed(generation);
                    if let Some(unifier) = self.try_unify(&goal, &renamed.head) {
                        let branch = path.extended(rule.head.clone());
                        let proofs = self.solve_conjunction(
                            &renamed.body,
                            bindings.merged(unifier),
                            &branch,
                            depth + 1,
                        );
                        for proof in proofs {
                            self.record(branch.clone());
                            results.push(proof);
                        }
                    }
                }
            }
        }

        results
    }

    /// Solve goals left to right, backtracking over each goal's alternatives
    fn solve_conjunction(
        &mut self,
        goals: &[Predicate],
        bindings: Substitution,
        path: &Derivation,
        depth: usize,
    ) -> Vec<Substitution> {
        let Some((first, rest)) = goals.split_first() else {
            return vec![bindings];
        };

        let mut results = Vec::new();
        for extended in self.solve_goal(first, &bindings, path, depth) {
            results.extend(self.solve_conjunction(rest, extended, path, depth));
        }
        results
    }

    /// Resolve each body goal on its own under the head substitution
    fn resolve_single_pass(
        &mut self,
        query: &Predicate,
        path: &Derivation,
        depth: usize,
    ) -> Vec<Predicate> {
        if !self.enter(query, depth) {
            return vec![];
        }

        let kb = self.kb;
        let mut results = Vec::new();

        for clause in kb.clauses_named(&query.name) {
            match clause {
                Clause::Fact { predicate } => {
                    if let Some(substitution) = self.try_unify(query, predicate) {
                        results.push(apply_substitution(query, &substitution));
                        self.record(path.extended(predicate.clone()));
                    }
                }
                Clause::Rule(rule) => {
                    let Some(substitution) = self.try_unify(query, &rule.head) else {
                        continue;
                    };
                    let branch = path.extended(rule.head.clone());
                    let proved = rule.body.iter().all(|goal| {
                        let subgoal = apply_substitution(goal, &substitution);
                        !self.resolve_single_pass(&subgoal, &branch, depth + 1).is_empty()
                    });
                    if proved {
                        results.push(apply_substitution(query, &substitution));
                        self.record(branch);
                    }
                }
            }
        }

        results
    }
}
