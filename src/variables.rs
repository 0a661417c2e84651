//! # Variable Groups
//!
//! A variable group is a view over a contiguous range of variable
//! identifiers that maps structured indices (tuples, k-subsets, graph edges,
//! bit positions) bijectively to the variables of the range.
//!
//! Indices are sequences of positive integers (bit positions of
//! [`BinaryMapping`] start from 0). A _pattern_ is an index where some
//! components are left open (`None`); an empty pattern leaves every
//! component open. Iteration over indices, literals and labels always
//! follows the same fixed order, which is also the order of the variable
//! identifiers when no component is fixed.
//!
//! Groups are created through [`crate::instances::Formula`], which reserves
//! their identifier range.

use std::{fmt, iter, ops::Range};

use crate::{
    types::{Lit, Var},
    Error,
};

mod block;
mod edges;
mod mapping;
mod words;

pub use block::Block;
pub use edges::{BipartiteEdges, DigraphEdges, EdgeOrder, GraphEdges};
pub use mapping::{BinaryMapping, Mapping, UnaryMapping};
pub use words::{WordKind, Words};

/// Iterator over the indices of a group
pub type Indices<'a> = Box<dyn Iterator<Item = Vec<usize>> + 'a>;
/// Iterator over literals of a group
pub type Lits<'a> = Box<dyn Iterator<Item = Lit> + 'a>;
/// Iterator over labels of a group
pub type Labels<'a> = Box<dyn Iterator<Item = String> + 'a>;

/// Common interface of all variable groups
pub trait VariableGroup: fmt::Debug + Send + Sync {
    /// The identifiers reserved by the group
    fn ids(&self) -> Range<u32>;

    /// The number of variables in the group
    fn len(&self) -> usize {
        self.ids().len()
    }

    /// Checks if the group has no variables
    fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    /// Checks if the variable of a literal belongs to the group
    fn contains(&self, lit: Lit) -> bool {
        self.ids().contains(&lit.vid())
    }

    /// The number of components of an index
    fn arity(&self) -> usize;

    /// Iterates over all indices matching a pattern. Returns
    /// [`Error::InvalidArgument`] if the pattern has the wrong arity and
    /// [`Error::IndexOutOfRange`] if a fixed component is out of range.
    fn indices(&self, pattern: &[Option<usize>]) -> Result<Indices<'_>, Error>;

    /// Gets the positive literal of the variable with the given index
    fn evaluate(&self, index: &[usize]) -> Result<Lit, Error>;

    /// Iterates over the positive literals of all indices matching a
    /// pattern, in the order of [`VariableGroup::indices`]
    fn lits(&self, pattern: &[Option<usize>]) -> Result<Lits<'_>, Error>;

    /// Gets the index of the variable of a literal. Returns
    /// [`Error::IndexOutOfRange`] if the variable is not in the group.
    fn to_index(&self, lit: Lit) -> Result<Vec<usize>, Error>;

    /// Formats the label of a valid index
    fn render_label(&self, index: &[usize]) -> String;

    /// Gets the label of the variable with the given index
    fn label(&self, index: &[usize]) -> Result<String, Error> {
        let lit = self.evaluate(index)?;
        Ok(self.render_label(&self.to_index(lit)?))
    }

    /// Iterates over the labels of all indices matching a pattern
    fn labels(&self, pattern: &[Option<usize>]) -> Result<Labels<'_>, Error> {
        Ok(Box::new(
            self.indices(pattern)?
                .map(move |idx| self.render_label(&idx)),
        ))
    }

    /// Whether the group has no label of its own and should be labelled
    /// with the default variable format
    fn is_anonymous(&self) -> bool {
        false
    }
}

/// Expands a pattern to full arity, an empty pattern leaves all components
/// open
pub(crate) fn expand_pattern(
    pattern: &[Option<usize>],
    arity: usize,
) -> Result<Vec<Option<usize>>, Error> {
    if pattern.is_empty() {
        return Ok(vec![None; arity]);
    }
    if pattern.len() != arity {
        return Err(Error::InvalidArgument(format!(
            "pattern has {} components but indices have {arity}",
            pattern.len()
        )));
    }
    Ok(pattern.to_vec())
}

/// Checks that an index has the given arity
pub(crate) fn check_arity(index: &[usize], arity: usize) -> Result<(), Error> {
    if index.len() != arity {
        return Err(Error::InvalidArgument(format!(
            "index has {} components but should have {arity}",
            index.len()
        )));
    }
    Ok(())
}

/// Computes the identifier range of a group of `len` variables starting at
/// `start`
pub(crate) fn id_range(start: u32, len: usize) -> Result<Range<u32>, Error> {
    let end = u32::try_from(len)
        .ok()
        .and_then(|len| start.checked_add(len))
        .filter(|&end| end - 1 <= Var::MAX_ID)
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "{len} variables starting from {start} exceed the maximum variable identifier"
            ))
        })?;
    Ok(start..end)
}

pub(crate) fn out_of_range(lit: Lit, ids: &Range<u32>) -> Error {
    Error::IndexOutOfRange(format!(
        "variable {} is not in the group range {}..={}",
        lit.vid(),
        ids.start,
        ids.end.saturating_sub(1)
    ))
}

/// A single named variable
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Singleton {
    var: Var,
    name: Option<String>,
}

impl Singleton {
    /// Creates a singleton group for the variable with identifier `id`
    pub fn new(id: u32, name: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            var: Var::new_with_error(id)?,
            name: name.map(String::from),
        })
    }

    /// The variable of the group
    pub fn var(&self) -> Var {
        self.var
    }

    /// The name of the variable
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl VariableGroup for Singleton {
    fn ids(&self) -> Range<u32> {
        self.var.id()..self.var.id() + 1
    }

    fn arity(&self) -> usize {
        0
    }

    fn indices(&self, pattern: &[Option<usize>]) -> Result<Indices<'_>, Error> {
        expand_pattern(pattern, 0)?;
        Ok(Box::new(iter::once(vec![])))
    }

    fn evaluate(&self, index: &[usize]) -> Result<Lit, Error> {
        check_arity(index, 0)?;
        Ok(self.var.pos_lit())
    }

    fn lits(&self, pattern: &[Option<usize>]) -> Result<Lits<'_>, Error> {
        expand_pattern(pattern, 0)?;
        Ok(Box::new(iter::once(self.var.pos_lit())))
    }

    fn to_index(&self, lit: Lit) -> Result<Vec<usize>, Error> {
        if lit.var() != self.var {
            return Err(out_of_range(lit, &self.ids()));
        }
        Ok(vec![])
    }

    fn render_label(&self, _: &[usize]) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}", self.var),
        }
    }

    fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{expand_pattern, id_range, Singleton, VariableGroup};
    use crate::{lit, types::Var, Error};

    #[test]
    fn singleton() {
        let s = Singleton::new(3, Some("Z")).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.evaluate(&[]).unwrap(), lit![3]);
        assert_eq!(s.to_index(lit![-3]).unwrap(), Vec::<usize>::new());
        assert!(matches!(s.to_index(lit![2]), Err(Error::IndexOutOfRange(_))));
        assert!(matches!(s.evaluate(&[1]), Err(Error::InvalidArgument(_))));
        assert_eq!(s.labels(&[]).unwrap().collect::<Vec<_>>(), vec!["Z"]);
        assert!(!s.is_anonymous());
        assert!(Singleton::new(4, None).unwrap().is_anonymous());
    }

    #[test]
    fn pattern_expansion() {
        assert_eq!(expand_pattern(&[], 2).unwrap(), vec![None, None]);
        assert_eq!(
            expand_pattern(&[Some(1), None], 2).unwrap(),
            vec![Some(1), None]
        );
        assert!(matches!(
            expand_pattern(&[Some(1)], 2),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn id_ranges() {
        assert_eq!(id_range(4, 3).unwrap(), 4..7);
        assert_eq!(id_range(4, 0).unwrap(), 4..4);
        assert_eq!(id_range(Var::MAX_ID, 1).unwrap(), Var::MAX_ID..Var::MAX_ID + 1);
        assert!(matches!(
            id_range(Var::MAX_ID, 2),
            Err(Error::InvalidArgument(_))
        ));
    }
}
