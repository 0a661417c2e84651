//! # CNF Formula Store

use std::{borrow::Cow, ops::Index};

use crate::{
    encodings::CollectClauses,
    types::{Clause, Lit, PbConstraint},
};

use super::{apply_permutation, ConstraintStore, ManageVars};

/// Simple type representing a CNF formula: a list of clauses together with
/// the number of variables. The number of variables can be larger than the
/// highest variable in any clause, e.g., when variables were reserved but
/// never used.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cnf {
    pub(super) clauses: Vec<Clause>,
    pub(super) n_vars: u32,
}

impl Cnf {
    /// Creates a new [`Cnf`]
    pub fn new() -> Cnf {
        Cnf::default()
    }

    /// Creates a new [`Cnf`] with a given capacity of clauses
    pub fn with_capacity(capacity: usize) -> Cnf {
        Cnf {
            clauses: Vec::with_capacity(capacity),
            n_vars: 0,
        }
    }

    /// Checks if the CNF is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns the number of clauses in the instance
    #[inline]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Adds a clause and raises the number of variables to the highest
    /// variable of the clause
    pub fn add_clause(&mut self, clause: Clause) {
        if let Some(max) = clause.max_vid() {
            self.update_variable_number(max);
        }
        self.clauses.push(clause);
    }

    /// Returns an iterator over references to the clauses
    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }

    /// Gets the clauses as a slice
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

impl ManageVars for Cnf {
    fn n_vars(&self) -> u32 {
        self.n_vars
    }

    fn update_variable_number(&mut self, n: u32) {
        self.n_vars = self.n_vars.max(n);
    }
}

impl ConstraintStore for Cnf {
    type Constraint = Clause;

    fn constraints(&self) -> &[Clause] {
        &self.clauses
    }

    fn push_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    fn constraint_lits(constraint: &Clause) -> Vec<Lit> {
        constraint.lits().to_vec()
    }

    fn to_pb(constraint: &Clause) -> Cow<'_, PbConstraint> {
        Cow::Owned(PbConstraint::from_clause(constraint.iter().copied()))
    }

    fn substitute<F: Fn(Lit) -> Lit>(&mut self, subst: F) {
        self.clauses
            .iter_mut()
            .flat_map(Clause::iter_mut)
            .for_each(|l| *l = subst(*l));
    }

    fn permute(&mut self, perm: &[usize]) {
        apply_permutation(&mut self.clauses, perm);
    }
}

impl CollectClauses for Cnf {
    fn n_clauses(&self) -> usize {
        self.clauses.len()
    }

    fn add_clause(&mut self, clause: Clause) {
        Cnf::add_clause(self, clause);
    }
}

impl Extend<Clause> for Cnf {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        iter.into_iter().for_each(|cl| self.add_clause(cl));
    }
}

impl FromIterator<Clause> for Cnf {
    fn from_iter<T: IntoIterator<Item = Clause>>(iter: T) -> Self {
        let mut cnf = Cnf::new();
        cnf.extend(iter);
        cnf
    }
}

impl IntoIterator for Cnf {
    type Item = Clause;

    type IntoIter = std::vec::IntoIter<Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl<'a> IntoIterator for &'a Cnf {
    type Item = &'a Clause;

    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

impl Index<usize> for Cnf {
    type Output = Clause;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.clauses[index]
    }
}

#[cfg(test)]
mod tests {
    use super::Cnf;
    use crate::{
        clause,
        encodings::CollectClauses,
        instances::{ConstraintStore, ManageVars},
        lit,
        types::{constraints::PbRel, RelOp},
    };

    #[test]
    fn var_number_follows_clauses() {
        let mut cnf = Cnf::new();
        cnf.add_clause(clause![lit![1], lit![-4]]);
        assert_eq!(cnf.n_vars(), 4);
        cnf.update_variable_number(2);
        assert_eq!(cnf.n_vars(), 4);
        cnf.push_clause(clause![lit![7]]);
        assert_eq!(cnf.n_vars(), 4);
        assert_eq!(cnf.len(), 2);
    }

    #[test]
    fn linear_as_clauses() {
        let mut cnf = Cnf::new();
        cnf.add_linear(&[lit![1], lit![2], lit![3]], RelOp::Le, 1);
        assert_eq!(cnf.n_clauses(), 3);
        assert_eq!(cnf[0], clause![lit![-1], lit![-2]]);
        cnf.push_linear(&[lit![1], lit![2]], RelOp::Ge, 2);
        assert_eq!(cnf.len(), 5);
    }

    #[test]
    fn substitute_and_permute() {
        let mut cnf: Cnf = [clause![lit![1], lit![-2]], clause![lit![3]]]
            .into_iter()
            .collect();
        cnf.substitute(|l| !l);
        cnf.permute(&[1, 0]);
        assert_eq!(cnf.clauses(), &[clause![lit![-3]], clause![lit![-1], lit![2]]]);
    }

    #[test]
    fn clause_as_pb() {
        let cl = clause![lit![1], lit![-2]];
        let pb = Cnf::to_pb(&cl);
        assert!(pb.is_clause());
        assert_eq!(pb.rel(), PbRel::Ge);
        assert_eq!(pb.lits(), &[(lit![1], 1), (lit![-2], 1)]);
    }
}
