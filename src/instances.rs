//! # Formula Stores and Variable Bookkeeping
//!
//! A formula is an append-only list of constraints over the variables
//! `1..=n_vars`. The list is held by a [`ConstraintStore`] ([`Cnf`] for
//! clauses, [`Opb`] for pseudo-boolean constraints), the variable groups
//! reserving ranges of the variables by a [`VarManager`]. [`Formula`] ties
//! both together and is the type generators work with.

use std::{borrow::Cow, fmt, sync::Arc};

use log::debug;

use crate::{
    encodings::card,
    types::{Clause, Lit, PbConstraint, RelOp},
    utils::LabelFormat,
    variables::VariableGroup,
    Error,
};

mod formula;
mod opb;
mod sat;

pub use formula::{CnfFormula, Formula, OpbFormula};
#[cfg(feature = "rand")]
pub use formula::ShuffleOptions;
pub use opb::Opb;
pub use sat::Cnf;

pub mod fio;

/// Trait for types keeping track of the number of used variables
pub trait ManageVars {
    /// Gets the number of variables, i.e., the highest variable identifier
    /// that was used or reserved
    fn n_vars(&self) -> u32;

    /// Raises the number of variables to at least `n`. The number of
    /// variables never decreases.
    fn update_variable_number(&mut self, n: u32);
}

/// Trait for append-only stores of constraints
pub trait ConstraintStore: ManageVars + Default + Clone + fmt::Debug {
    /// The type of stored constraints
    type Constraint: Clone + fmt::Debug + PartialEq;

    /// All constraints, in insertion order
    fn constraints(&self) -> &[Self::Constraint];

    /// Gets the number of constraints
    fn n_constraints(&self) -> usize {
        self.constraints().len()
    }

    /// Appends a clause without updating the number of variables
    fn push_clause(&mut self, clause: Clause);

    /// Appends `Σ lits op value` without updating the number of variables.
    /// Stores without native linear constraints add the clauses of
    /// [`card::encode`].
    fn push_linear(&mut self, lits: &[Lit], op: RelOp, value: isize) {
        push_linear_as_clauses(self, lits, op, value);
    }

    /// The literals of a constraint, in order
    fn constraint_lits(constraint: &Self::Constraint) -> Vec<Lit>;

    /// A constraint as a pseudo-boolean constraint
    fn to_pb(constraint: &Self::Constraint) -> Cow<'_, PbConstraint>;

    /// Replaces every literal `l` of every constraint with `subst(l)`
    fn substitute<F: Fn(Lit) -> Lit>(&mut self, subst: F);

    /// Reorders the constraints, constraint `i` moves to position `perm[i]`
    fn permute(&mut self, perm: &[usize]);
}

pub(crate) fn push_linear_as_clauses<S: ConstraintStore + ?Sized>(
    store: &mut S,
    lits: &[Lit],
    op: RelOp,
    value: isize,
) {
    let mut clauses: Vec<Clause> = vec![];
    card::encode(lits, op, value, &mut clauses);
    clauses.into_iter().for_each(|cl| store.push_clause(cl));
}

/// Moves element `i` of `items` to position `perm[i]`
pub(crate) fn apply_permutation<T>(items: &mut Vec<T>, perm: &[usize]) {
    debug_assert_eq!(items.len(), perm.len());
    let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
    let mut out: Vec<Option<T>> = (0..slots.len()).map(|_| None).collect();
    for (old, &new) in perm.iter().enumerate() {
        out[new] = slots[old].take();
    }
    items.extend(out.into_iter().flatten());
}

/// Registry of the variable groups of a formula.
///
/// Groups are registered in allocation order and occupy ascending,
/// non-overlapping ranges of variables.
#[derive(Clone, Debug, Default)]
pub struct VarManager {
    groups: Vec<Arc<dyn VariableGroup>>,
}

impl VarManager {
    /// Registers a group and reserves its variables in `vars`.
    ///
    /// Groups without variables are registered without reserving anything.
    /// Otherwise the group must start after the last used variable, or
    /// [`Error::OverlapViolation`] is returned.
    pub fn register<VM: ManageVars + ?Sized>(
        &mut self,
        group: Arc<dyn VariableGroup>,
        vars: &mut VM,
    ) -> Result<(), Error> {
        let ids = group.ids();
        if !ids.is_empty() {
            if ids.start <= vars.n_vars() {
                return Err(Error::OverlapViolation(format!(
                    "group {}..={} starts at or before the last used variable {}",
                    ids.start,
                    ids.end - 1,
                    vars.n_vars()
                )));
            }
            vars.update_variable_number(ids.end - 1);
        }
        debug!(
            "registered variable group {}..{} with {} variables",
            ids.start,
            ids.end,
            group.len()
        );
        self.groups.push(group);
        Ok(())
    }

    /// The registered groups, in allocation order
    pub fn groups(&self) -> impl Iterator<Item = &Arc<dyn VariableGroup>> {
        self.groups.iter()
    }

    /// Gets the number of registered groups
    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    /// Checks whether `group` is one of the registered groups (the same
    /// object, not an equal one)
    pub fn owns(&self, group: &dyn VariableGroup) -> bool {
        self.groups
            .iter()
            .any(|g| std::ptr::addr_eq(Arc::as_ptr(g), group as *const dyn VariableGroup))
    }

    /// Labels of the variables `1..=n_vars`. Variables outside of any group,
    /// and singletons without a name, are labelled with `default`.
    pub(crate) fn labels(&self, n_vars: u32, default: &LabelFormat) -> Vec<String> {
        let mut labels = Vec::with_capacity(n_vars as usize);
        let mut next = 1;
        for group in &self.groups {
            let ids = group.ids();
            if ids.is_empty() {
                continue;
            }
            labels.extend((next..ids.start).map(|id| default.render(&[id])));
            if group.is_anonymous() {
                labels.extend(ids.clone().map(|id| default.render(&[id])));
            } else {
                match group.labels(&[]) {
                    Ok(group_labels) => labels.extend(group_labels),
                    Err(_) => labels.extend(ids.clone().map(|id| default.render(&[id]))),
                }
            }
            next = ids.end;
        }
        labels.extend((next..=n_vars).map(|id| default.render(&[id])));
        labels
    }
}
