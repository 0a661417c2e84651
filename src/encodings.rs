//! # Encodings of Constraints to CNF
//!
//! Direct encodings without auxiliary variables: parity constraints,
//! cardinality constraints with unit coefficients, and the axioms describing
//! mappings. Every encoding writes its clauses into a [`CollectClauses`]
//! collector, in a fixed and documented order.

use crate::types::{Clause, Lit, RelOp};

pub mod card;
pub mod mapping;
pub mod parity;

/// Trait for collecting clauses. Mainly used when generating encodings and implemented by
/// [`crate::instances::Cnf`], [`crate::instances::Formula`] and plain vectors of clauses.
pub trait CollectClauses: Extend<Clause> {
    /// Gets the number of clauses in the collection
    fn n_clauses(&self) -> usize;

    /// Adds a single clause to the collection
    fn add_clause(&mut self, clause: Clause) {
        self.extend(std::iter::once(clause));
    }

    /// Adds `Σ lits op value`. Collectors without native linear constraints
    /// receive the clauses of [`card::encode`].
    fn add_linear(&mut self, lits: &[Lit], op: RelOp, value: isize)
    where
        Self: Sized,
    {
        card::encode(lits, op, value, self);
    }
}

impl CollectClauses for Vec<Clause> {
    fn n_clauses(&self) -> usize {
        self.len()
    }
}
