//! # Pseudo-Boolean Formula Store

use std::borrow::Cow;

use crate::{
    encodings::CollectClauses,
    types::{Clause, IWLitIter, Lit, PbConstraint, RelOp},
    Error,
};

use super::{apply_permutation, push_linear_as_clauses, ConstraintStore, ManageVars};

/// A list of normalized pseudo-boolean constraints together with the number
/// of variables. Clauses are stored as `Σ l_i >= 1`, linear constraints
/// natively, except for `!=` which is not a pseudo-boolean relation and
/// bounds that overflow when normalized. Both are stored as clauses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Opb {
    pub(super) constraints: Vec<PbConstraint>,
    n_vars: u32,
}

impl Opb {
    /// Creates a new [`Opb`]
    pub fn new() -> Opb {
        Opb::default()
    }

    /// Checks if there are no constraints
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Returns the number of constraints
    #[inline]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Adds the constraint `Σ w_i·l_i op bound` and raises the number of
    /// variables to the highest variable of the constraint. See
    /// [`PbConstraint::new`] for the normalization.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for `!=`, zero coefficients and bounds
    /// overflowing in normalization.
    pub fn add_constraint<LI: IWLitIter>(
        &mut self,
        lits: LI,
        op: RelOp,
        bound: isize,
    ) -> Result<(), Error> {
        let constr = PbConstraint::new(lits, op, bound)?;
        if let Some(max) = constr.max_vid() {
            self.update_variable_number(max);
        }
        self.constraints.push(constr);
        Ok(())
    }

    /// Returns an iterator over references to the constraints
    pub fn iter(&self) -> std::slice::Iter<'_, PbConstraint> {
        self.constraints.iter()
    }
}

impl ManageVars for Opb {
    fn n_vars(&self) -> u32 {
        self.n_vars
    }

    fn update_variable_number(&mut self, n: u32) {
        self.n_vars = self.n_vars.max(n);
    }
}

impl ConstraintStore for Opb {
    type Constraint = PbConstraint;

    fn constraints(&self) -> &[PbConstraint] {
        &self.constraints
    }

    fn push_clause(&mut self, clause: Clause) {
        self.constraints.push(PbConstraint::from_clause(clause));
    }

    fn push_linear(&mut self, lits: &[Lit], op: RelOp, value: isize) {
        match PbConstraint::new(lits.iter().map(|&l| (l, 1)), op, value) {
            Ok(constr) => self.constraints.push(constr),
            Err(_) => push_linear_as_clauses(self, lits, op, value),
        }
    }

    fn constraint_lits(constraint: &PbConstraint) -> Vec<Lit> {
        constraint.iter().map(|&(l, _)| l).collect()
    }

    fn to_pb(constraint: &PbConstraint) -> Cow<'_, PbConstraint> {
        Cow::Borrowed(constraint)
    }

    fn substitute<F: Fn(Lit) -> Lit>(&mut self, subst: F) {
        self.constraints
            .iter_mut()
            .flat_map(PbConstraint::iter_mut)
            .for_each(|(l, _)| *l = subst(*l));
    }

    fn permute(&mut self, perm: &[usize]) {
        apply_permutation(&mut self.constraints, perm);
    }
}

impl CollectClauses for Opb {
    fn n_clauses(&self) -> usize {
        self.constraints.len()
    }

    fn add_clause(&mut self, clause: Clause) {
        if let Some(max) = clause.max_vid() {
            self.update_variable_number(max);
        }
        self.push_clause(clause);
    }

    fn add_linear(&mut self, lits: &[Lit], op: RelOp, value: isize) {
        if let Some(max) = lits.iter().map(Lit::vid).max() {
            self.update_variable_number(max);
        }
        self.push_linear(lits, op, value);
    }
}

impl Extend<Clause> for Opb {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        iter.into_iter().for_each(|cl| self.add_clause(cl));
    }
}

#[cfg(test)]
mod tests {
    use super::Opb;
    use crate::{
        clause,
        encodings::CollectClauses,
        instances::{ConstraintStore, ManageVars},
        lit,
        types::{constraints::PbRel, RelOp},
        Error,
    };

    #[test]
    fn native_linear() {
        let mut opb = Opb::new();
        opb.add_linear(&[lit![1], lit![2], lit![5]], RelOp::Le, 1);
        assert_eq!(opb.len(), 1);
        assert_eq!(opb.n_vars(), 5);
        let constr = &opb.constraints()[0];
        assert_eq!(constr.rel(), PbRel::Ge);
        assert_eq!(constr.bound(), 2);
        assert_eq!(
            constr.lits(),
            &[(lit![-1], 1), (lit![-2], 1), (lit![-5], 1)]
        );
    }

    #[test]
    fn not_equal_as_clauses() {
        let mut opb = Opb::new();
        opb.add_linear(&[lit![1], lit![2]], RelOp::Ne, 1);
        assert_eq!(opb.len(), 2);
        assert!(opb.iter().all(|c| c.is_clause()));
    }

    #[test]
    fn clauses() {
        let mut opb = Opb::new();
        opb.add_clause(clause![lit![3], lit![-1]]);
        assert_eq!(opb.n_vars(), 3);
        assert_eq!(Opb::constraint_lits(&opb.constraints()[0]), vec![lit![3], lit![-1]]);
    }

    #[test]
    fn weighted() {
        let mut opb = Opb::new();
        opb.add_constraint([(lit![1], 2), (lit![2], 3)], RelOp::Eq, 3)
            .unwrap();
        assert_eq!(opb.constraints()[0].rel(), PbRel::Eq);
        assert!(matches!(
            opb.add_constraint([(lit![1], 1)], RelOp::Ne, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            opb.add_constraint([(lit![1], 1), (lit![4], 0)], RelOp::Ge, 1),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(opb.len(), 1);
        assert_eq!(opb.n_vars(), 2);
    }

    #[test]
    fn overflowing_bound_as_clauses() {
        let mut opb = Opb::new();
        opb.add_linear(&[lit![1], lit![2]], RelOp::Gt, isize::MAX);
        assert_eq!(opb.len(), 1);
        assert!(opb.constraints()[0].is_clause());
        assert!(opb.constraints()[0].lits().is_empty());
        opb.add_linear(&[lit![1], lit![2]], RelOp::Le, isize::MIN);
        assert_eq!(opb.len(), 2);
        assert!(opb.constraints()[1].lits().is_empty());
    }
}
