//! # Mapping Variables
//!
//! Two representations of a mapping from a domain `1..=n` to a range:
//!
//! - [`UnaryMapping`]: one variable `f(u)=v` per allowed pair, with the
//!   allowed pairs given by the edges of a bipartite graph,
//! - [`BinaryMapping`]: each domain element is mapped to a number in `0..m`
//!   written with `ceil(log2(m))` bits.

use std::{
    ops::{Range, RangeInclusive},
    sync::Arc,
};

use super::{
    check_arity, expand_pattern, id_range, out_of_range, BipartiteEdges, Indices, Lits,
    VariableGroup,
};
use crate::{
    graphs::BipartiteGraph,
    types::{Clause, Lit},
    utils::{bits_for, LabelFormat},
    Error,
};

/// A mapping in unary representation, one variable per pair `(u,v)` where
/// `v` is a possible image of `u`
///
/// # Examples
///
/// ```
/// use cnfgen::{graphs::BipartiteGraph, instances::CnfFormula, lit, variables::VariableGroup};
///
/// let mut formula = CnfFormula::new();
/// let f = formula.new_mapping(4, 10, None).unwrap();
/// assert_eq!(f.evaluate(&[2, 1]).unwrap(), lit![11]);
/// assert_eq!(f.label(&[3, 8]).unwrap(), "f(3)=8");
///
/// let mut b = BipartiteGraph::new(5, 3);
/// b.add_edges_from([(2, 1), (1, 3), (2, 2), (3, 3), (4, 3), (4, 2), (5, 1)])
///     .unwrap();
/// let mut formula = CnfFormula::new();
/// let g = formula.new_sparse_mapping(&b, None).unwrap();
/// assert_eq!(g.evaluate(&[2, 2]).unwrap(), lit![3]);
/// assert_eq!(g.evaluate(&[4, 3]).unwrap(), lit![6]);
/// ```
#[derive(Clone, Debug)]
pub struct UnaryMapping {
    edges: BipartiteEdges,
}

impl UnaryMapping {
    /// Creates a mapping whose allowed pairs are the edges of `graph`
    pub fn new(start: u32, graph: &BipartiteGraph, label: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            edges: BipartiteEdges::new(start, graph, Some(label.unwrap_or("f({})={}")))?,
        })
    }

    /// The domain `1..=n`
    pub fn domain(&self) -> RangeInclusive<usize> {
        1..=self.edges.graph().left_order()
    }

    /// The range `1..=m`
    pub fn range(&self) -> RangeInclusive<usize> {
        1..=self.edges.graph().right_order()
    }

    /// The possible images of `u`, in increasing order
    pub fn range_of(&self, u: usize) -> &[usize] {
        self.edges.graph().right_neighbors(u)
    }

    /// The possible preimages of `v`, in increasing order
    pub fn domain_of(&self, v: usize) -> &[usize] {
        self.edges.graph().left_neighbors(v)
    }

    /// The graph of allowed pairs
    pub fn graph(&self) -> &BipartiteGraph {
        self.edges.graph()
    }
}

impl VariableGroup for UnaryMapping {
    fn ids(&self) -> Range<u32> {
        self.edges.ids()
    }

    fn arity(&self) -> usize {
        2
    }

    fn indices(&self, pattern: &[Option<usize>]) -> Result<Indices<'_>, Error> {
        self.edges.indices(pattern)
    }

    fn evaluate(&self, index: &[usize]) -> Result<Lit, Error> {
        self.edges.evaluate(index)
    }

    fn lits(&self, pattern: &[Option<usize>]) -> Result<Lits<'_>, Error> {
        self.edges.lits(pattern)
    }

    fn to_index(&self, lit: Lit) -> Result<Vec<usize>, Error> {
        self.edges.to_index(lit)
    }

    fn render_label(&self, index: &[usize]) -> String {
        self.edges.render_label(index)
    }
}

/// A mapping from `1..=n` to `0..m` in binary representation. Element `i`
/// owns the variables `v(i,bits-1),...,v(i,0)`, most significant bit first.
///
/// # Examples
///
/// ```
/// use cnfgen::{instances::CnfFormula, lit, variables::VariableGroup};
///
/// let mut formula = CnfFormula::new();
/// let f = formula.new_binary_mapping(4, 14, None).unwrap();
/// assert_eq!(formula.number_of_variables(), 16);
/// assert_eq!(f.evaluate(&[2, 3]).unwrap(), lit![5]);
/// assert_eq!(f.evaluate(&[4, 0]).unwrap(), lit![16]);
/// ```
#[derive(Clone, Debug)]
pub struct BinaryMapping {
    ids: Range<u32>,
    n: usize,
    m: usize,
    bits: u32,
    fmt: LabelFormat,
}

impl BinaryMapping {
    /// Creates a binary mapping from `1..=n` to `0..m`. Both `n` and `m` must
    /// be positive.
    pub fn new(start: u32, n: usize, m: usize, label: Option<&str>) -> Result<Self, Error> {
        if n == 0 || m == 0 {
            return Err(Error::InvalidArgument(format!(
                "binary mapping from {n} to {m} elements needs a non-empty domain and range"
            )));
        }
        let bits = bits_for(m);
        let len = n
            .checked_mul(bits as usize)
            .ok_or_else(|| Error::InvalidArgument("binary mapping is too large".to_string()))?;
        Ok(Self {
            ids: id_range(start, len)?,
            n,
            m,
            bits,
            fmt: LabelFormat::parse(label.unwrap_or("v({},{})"), 2)?,
        })
    }

    /// The domain `1..=n`
    pub fn domain(&self) -> RangeInclusive<usize> {
        1..=self.n
    }

    /// The range `0..m`
    pub fn range(&self) -> Range<usize> {
        0..self.m
    }

    /// The number of bits per domain element
    pub fn bits(&self) -> u32 {
        self.bits
    }

    fn check_domain(&self, i: usize) -> Result<(), Error> {
        if i == 0 || i > self.n {
            return Err(Error::IndexOutOfRange(format!(
                "{i} is not in the domain 1..={}",
                self.n
            )));
        }
        Ok(())
    }

    fn check_bit(&self, b: usize) -> Result<(), Error> {
        if b >= self.bits as usize {
            return Err(Error::IndexOutOfRange(format!(
                "bit {b} is not in 0..{}",
                self.bits
            )));
        }
        Ok(())
    }

    fn lit_unchecked(&self, i: usize, b: usize) -> Lit {
        let bits = self.bits as usize;
        let id = self.ids.start as usize - 1 + i * bits - b;
        Lit::new_unchecked(id as u32, false)
    }

    /// Bits of element `i`, most significant first
    fn bit_positions(&self) -> impl Iterator<Item = usize> + Clone {
        (0..self.bits as usize).rev()
    }

    /// The clause that is falsified exactly when `i` is mapped to `j`. With
    /// zero bits this is the empty clause.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::{clause, instances::CnfFormula, lit};
    ///
    /// let mut formula = CnfFormula::new();
    /// let f = formula.new_binary_mapping(4, 6, None).unwrap();
    /// assert_eq!(f.forbid(2, 0).unwrap(), clause![lit![4], lit![5], lit![6]]);
    /// assert_eq!(f.forbid(4, 3).unwrap(), clause![lit![10], lit![-11], lit![-12]]);
    /// ```
    pub fn forbid(&self, i: usize, j: usize) -> Result<Clause, Error> {
        self.check_domain(i)?;
        if self.bits < usize::BITS && j >> self.bits != 0 {
            return Err(Error::InvalidArgument(format!(
                "{j} cannot be written with {} bits",
                self.bits
            )));
        }
        Ok(self
            .bit_positions()
            .map(|b| {
                let lit = self.lit_unchecked(i, b);
                if (j >> b) & 1 == 1 {
                    !lit
                } else {
                    lit
                }
            })
            .collect())
    }
}

impl VariableGroup for BinaryMapping {
    fn ids(&self) -> Range<u32> {
        self.ids.clone()
    }

    fn arity(&self) -> usize {
        2
    }

    fn indices(&self, pattern: &[Option<usize>]) -> Result<Indices<'_>, Error> {
        let pattern = expand_pattern(pattern, 2)?;
        let elems = match pattern[0] {
            Some(i) => {
                self.check_domain(i)?;
                i..=i
            }
            None => self.domain(),
        };
        let bits: Vec<usize> = match pattern[1] {
            Some(b) => {
                self.check_bit(b)?;
                vec![b]
            }
            None => self.bit_positions().collect(),
        };
        Ok(Box::new(elems.flat_map(move |i| {
            bits.clone().into_iter().map(move |b| vec![i, b])
        })))
    }

    fn evaluate(&self, index: &[usize]) -> Result<Lit, Error> {
        check_arity(index, 2)?;
        self.check_domain(index[0])?;
        self.check_bit(index[1])?;
        Ok(self.lit_unchecked(index[0], index[1]))
    }

    fn lits(&self, pattern: &[Option<usize>]) -> Result<Lits<'_>, Error> {
        Ok(Box::new(
            self.indices(pattern)?
                .map(move |idx| self.lit_unchecked(idx[0], idx[1])),
        ))
    }

    fn to_index(&self, lit: Lit) -> Result<Vec<usize>, Error> {
        if !self.contains(lit) {
            return Err(out_of_range(lit, &self.ids));
        }
        let bits = self.bits as usize;
        let v = (lit.vid() - self.ids.start) as usize;
        Ok(vec![v / bits + 1, bits - 1 - v % bits])
    }

    fn render_label(&self, index: &[usize]) -> String {
        self.fmt.render(index)
    }
}

/// A mapping in either representation, as accepted by the mapping
/// constraints of [`crate::instances::Formula`]
#[derive(Clone, Copy, Debug)]
pub enum Mapping<'a> {
    /// Unary representation
    Unary(&'a UnaryMapping),
    /// Binary representation
    Binary(&'a BinaryMapping),
}

impl<'a> From<&'a UnaryMapping> for Mapping<'a> {
    fn from(value: &'a UnaryMapping) -> Self {
        Mapping::Unary(value)
    }
}

impl<'a> From<&'a BinaryMapping> for Mapping<'a> {
    fn from(value: &'a BinaryMapping) -> Self {
        Mapping::Binary(value)
    }
}

impl<'a> From<&'a Arc<UnaryMapping>> for Mapping<'a> {
    fn from(value: &'a Arc<UnaryMapping>) -> Self {
        Mapping::Unary(value)
    }
}

impl<'a> From<&'a Arc<BinaryMapping>> for Mapping<'a> {
    fn from(value: &'a Arc<BinaryMapping>) -> Self {
        Mapping::Binary(value)
    }
}

impl Mapping<'_> {
    /// The mapping as a variable group
    pub fn group(&self) -> &dyn VariableGroup {
        match self {
            Mapping::Unary(f) => *f as &dyn VariableGroup,
            Mapping::Binary(f) => *f,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BinaryMapping, UnaryMapping};
    use crate::{clause, graphs::BipartiteGraph, lit, variables::VariableGroup, Error};

    #[test]
    fn unary_complete() {
        let f = UnaryMapping::new(1, &BipartiteGraph::complete(4, 10), None).unwrap();
        assert_eq!(f.len(), 40);
        assert_eq!(f.evaluate(&[2, 1]).unwrap(), lit![11]);
        assert_eq!(f.evaluate(&[1, 8]).unwrap(), lit![8]);
        assert_eq!(f.label(&[3, 8]).unwrap(), "f(3)=8");
        assert_eq!(f.domain(), 1..=4);
        assert_eq!(f.range(), 1..=10);
        assert_eq!(f.range_of(2).len(), 10);
    }

    #[test]
    fn unary_sparse_labels() {
        let mut b = BipartiteGraph::new(4, 4);
        b.add_edges_from([(1, 2), (1, 4), (2, 3), (4, 2), (4, 3)])
            .unwrap();
        let g = UnaryMapping::new(7, &b, Some("g_{{{},{}}}")).unwrap();
        assert_eq!(
            g.labels(&[]).unwrap().collect::<Vec<_>>(),
            vec!["g_{1,2}", "g_{1,4}", "g_{2,3}", "g_{4,2}", "g_{4,3}"]
        );
        assert!(g.range_of(3).is_empty());
        assert_eq!(g.domain_of(2), &[1, 4]);
    }

    #[test]
    fn binary_layout() {
        let f = BinaryMapping::new(1, 4, 14, None).unwrap();
        assert_eq!(f.bits(), 4);
        assert_eq!(f.len(), 16);
        assert_eq!(f.evaluate(&[2, 3]).unwrap(), lit![5]);
        assert_eq!(f.evaluate(&[4, 0]).unwrap(), lit![16]);
        assert_eq!(f.to_index(lit![5]).unwrap(), vec![2, 3]);
        assert_eq!(f.to_index(lit![16]).unwrap(), vec![4, 0]);
        assert_eq!(
            f.lits(&[Some(1), None]).unwrap().collect::<Vec<_>>(),
            vec![lit![1], lit![2], lit![3], lit![4]]
        );
        assert!(matches!(f.evaluate(&[1, 4]), Err(Error::IndexOutOfRange(_))));
        assert!(matches!(f.evaluate(&[5, 0]), Err(Error::IndexOutOfRange(_))));
    }

    #[test]
    fn binary_forbid() {
        let f = BinaryMapping::new(1, 4, 6, None).unwrap();
        assert_eq!(f.forbid(2, 0).unwrap(), clause![lit![4], lit![5], lit![6]]);
        assert_eq!(
            f.forbid(2, 7).unwrap(),
            clause![lit![-4], lit![-5], lit![-6]]
        );
        assert_eq!(
            f.forbid(4, 3).unwrap(),
            clause![lit![10], lit![-11], lit![-12]]
        );
        assert!(matches!(f.forbid(2, 8), Err(Error::InvalidArgument(_))));
        assert!(matches!(f.forbid(5, 0), Err(Error::IndexOutOfRange(_))));
        let g = BinaryMapping::new(4, 4, 6, None).unwrap();
        assert_eq!(g.forbid(2, 0).unwrap(), clause![lit![7], lit![8], lit![9]]);
    }

    #[test]
    fn binary_single_value() {
        let f = BinaryMapping::new(1, 3, 1, None).unwrap();
        assert_eq!(f.bits(), 0);
        assert!(f.is_empty());
        assert!(f.forbid(2, 0).unwrap().is_empty());
        assert!(matches!(f.forbid(2, 1), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn binary_empty_domain() {
        assert!(matches!(
            BinaryMapping::new(1, 0, 3, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            BinaryMapping::new(1, 3, 0, None),
            Err(Error::InvalidArgument(_))
        ));
    }
}
