//! # Cartesian Blocks of Variables

use std::ops::Range;

use itertools::Itertools;

use super::{check_arity, expand_pattern, id_range, out_of_range, Indices, Lits, VariableGroup};
use crate::{
    types::Lit,
    utils::{default_format, LabelFormat},
    Error,
};

/// A block of variables indexed by tuples `(i_1,...,i_d)` with
/// `1 <= i_j <= ranges[j]`. Variables are laid out in row-major order, the
/// last component varies fastest.
///
/// # Examples
///
/// ```
/// use cnfgen::{instances::CnfFormula, lit, variables::VariableGroup};
///
/// let mut formula = CnfFormula::new();
/// formula.new_variables(3).unwrap();
/// let v = formula.new_block(&[3, 5, 4, 3], None).unwrap();
/// assert_eq!(v.evaluate(&[3, 5, 4, 2]).unwrap(), lit![182]);
/// assert_eq!(v.to_index(lit![-5]).unwrap(), vec![1, 1, 1, 2]);
/// ```
#[derive(Clone, Debug)]
pub struct Block {
    ids: Range<u32>,
    ranges: Vec<usize>,
    weights: Vec<usize>,
    fmt: LabelFormat,
}

impl Block {
    /// Creates a block starting from variable `start`. Every dimension must
    /// be at least one, otherwise [`Error::InvalidArgument`] is returned.
    pub fn new(start: u32, ranges: &[usize], label: Option<&str>) -> Result<Self, Error> {
        if ranges.is_empty() {
            return Err(Error::InvalidArgument(
                "a block needs at least one dimension".to_string(),
            ));
        }
        if let Some(pos) = ranges.iter().position(|&r| r == 0) {
            return Err(Error::InvalidArgument(format!(
                "dimension {} of the block is empty",
                pos + 1
            )));
        }
        let mut weights = vec![1_usize; ranges.len()];
        for d in (0..ranges.len() - 1).rev() {
            weights[d] = weights[d + 1]
                .checked_mul(ranges[d + 1])
                .ok_or_else(|| Error::InvalidArgument("block is too large".to_string()))?;
        }
        let len = weights[0]
            .checked_mul(ranges[0])
            .ok_or_else(|| Error::InvalidArgument("block is too large".to_string()))?;
        let fmt = match label {
            Some(label) => LabelFormat::parse(label, ranges.len())?,
            None => LabelFormat::parse(&default_format("X", ranges.len()), ranges.len())?,
        };
        Ok(Self {
            ids: id_range(start, len)?,
            ranges: ranges.to_vec(),
            weights,
            fmt,
        })
    }

    /// The size of each dimension
    pub fn ranges(&self) -> &[usize] {
        &self.ranges
    }

    fn lit_unchecked(&self, index: &[usize]) -> Lit {
        let offset: usize = index
            .iter()
            .zip(&self.weights)
            .map(|(&i, &w)| (i - 1) * w)
            .sum();
        // offsets are bounded by the length of the range
        Lit::new_unchecked(self.ids.start + offset as u32, false)
    }
}

impl VariableGroup for Block {
    fn ids(&self) -> Range<u32> {
        self.ids.clone()
    }

    fn arity(&self) -> usize {
        self.ranges.len()
    }

    fn indices(&self, pattern: &[Option<usize>]) -> Result<Indices<'_>, Error> {
        let pattern = expand_pattern(pattern, self.arity())?;
        let dims = pattern
            .iter()
            .zip(&self.ranges)
            .enumerate()
            .map(|(d, (&fixed, &range))| match fixed {
                None => Ok(1..=range),
                Some(i) if (1..=range).contains(&i) => Ok(i..=i),
                Some(i) => Err(Error::IndexOutOfRange(format!(
                    "component {} of the index is {i}, not in 1..={range}",
                    d + 1
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(dims.into_iter().multi_cartesian_product()))
    }

    fn evaluate(&self, index: &[usize]) -> Result<Lit, Error> {
        check_arity(index, self.arity())?;
        for (d, (&i, &range)) in index.iter().zip(&self.ranges).enumerate() {
            if i == 0 || i > range {
                return Err(Error::IndexOutOfRange(format!(
                    "component {} of the index is {i}, not in 1..={range}",
                    d + 1
                )));
            }
        }
        Ok(self.lit_unchecked(index))
    }

    fn lits(&self, pattern: &[Option<usize>]) -> Result<Lits<'_>, Error> {
        Ok(Box::new(
            self.indices(pattern)?
                .map(move |idx| self.lit_unchecked(&idx)),
        ))
    }

    fn to_index(&self, lit: Lit) -> Result<Vec<usize>, Error> {
        if !self.contains(lit) {
            return Err(out_of_range(lit, &self.ids));
        }
        let mut residue = (lit.vid() - self.ids.start) as usize;
        Ok(self
            .weights
            .iter()
            .map(|&w| {
                let i = residue / w + 1;
                residue %= w;
                i
            })
            .collect())
    }

    fn render_label(&self, index: &[usize]) -> String {
        self.fmt.render(index)
    }
}
