//! # Constraint Types
//!
//! The constraints stored in formulas. The most important one is [`Clause`],
//! pseudo-boolean formulas store normalized [`PbConstraint`]s. [`RelOp`] is
//! the relational operator accepted by linear constraint builders.

use std::{fmt, ops, str::FromStr};

use super::{Assignment, IWLitIter, Lit, LitIter, TernaryVal};
use crate::Error;

/// Type representing a clause.
/// Wrapper around a std collection to allow for changing the data structure.
/// The order of the literals is preserved, an empty clause is always false.
#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    /// Creates a new empty clause
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clause from DIMACS integers, rejecting zeros with
    /// [`Error::InvalidLiteral`].
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::types::Clause;
    ///
    /// let cl = Clause::from_dimacs(&[1, -2]).unwrap();
    /// assert_eq!(cl.to_dimacs(), vec![1, -2]);
    /// assert!(Clause::from_dimacs(&[1, 0]).is_err());
    /// ```
    pub fn from_dimacs(lits: &[i32]) -> Result<Self, Error> {
        lits.iter()
            .map(|&l| Lit::from_dimacs(l))
            .collect::<Result<Vec<_>, _>>()
            .map(|lits| Self { lits })
    }

    /// Gets the clause as DIMACS integers
    pub fn to_dimacs(&self) -> Vec<i32> {
        self.lits.iter().map(|l| l.to_dimacs()).collect()
    }

    /// Gets the clause as a slice of literals
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the length of the clause
    #[inline]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the clause is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Gets an iterator over the clause
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Lit> {
        self.lits.iter()
    }

    /// Gets a mutable iterator over the clause
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Lit> {
        self.lits.iter_mut()
    }

    /// Adds a literal to the clause
    pub fn add(&mut self, lit: Lit) {
        self.lits.push(lit)
    }

    /// Gets the highest variable identifier in the clause
    pub fn max_vid(&self) -> Option<u32> {
        self.lits.iter().map(Lit::vid).max()
    }

    /// Evaluates a clause under a given assignment
    pub fn evaluate(&self, assignment: &Assignment) -> TernaryVal {
        self.iter()
            .fold(TernaryVal::False, |val, l| match assignment.lit_value(*l) {
                TernaryVal::True => TernaryVal::True,
                TernaryVal::DontCare => {
                    if val == TernaryVal::False {
                        TernaryVal::DontCare
                    } else {
                        val
                    }
                }
                TernaryVal::False => val,
            })
    }

    /// Checks whether the clause is satisfied by an assignment
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        self.lits
            .iter()
            .any(|&lit| assign.lit_value(lit) == TernaryVal::True)
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.lits.iter()).finish()
    }
}

impl<const N: usize> From<[Lit; N]> for Clause {
    fn from(value: [Lit; N]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl From<&[Lit]> for Clause {
    fn from(value: &[Lit]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl From<Vec<Lit>> for Clause {
    fn from(lits: Vec<Lit>) -> Self {
        Self { lits }
    }
}

impl FromIterator<Lit> for Clause {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Self {
            lits: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Clause {
    type Item = Lit;

    type IntoIter = std::vec::IntoIter<Lit>;

    fn into_iter(self) -> Self::IntoIter {
        self.lits.into_iter()
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;

    type IntoIter = std::slice::Iter<'a, Lit>;

    fn into_iter(self) -> Self::IntoIter {
        self.lits.iter()
    }
}

impl Extend<Lit> for Clause {
    fn extend<T: IntoIterator<Item = Lit>>(&mut self, iter: T) {
        self.lits.extend(iter)
    }
}

impl ops::Index<usize> for Clause {
    type Output = Lit;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.lits[index]
    }
}

/// Creates a clause from a list of literals
///
/// # Examples
///
/// ```
/// use cnfgen::{clause, lit};
///
/// let cl = clause![lit![1], lit![-2]];
/// assert_eq!(cl.to_dimacs(), vec![1, -2]);
/// ```
#[macro_export]
macro_rules! clause {
    ( $($l:expr),* ) => {
        {
            let mut tmp_clause = $crate::types::Clause::new();
            $(
                tmp_clause.add($l);
            )*
            tmp_clause
        }
    };
}

/// Relational operators of linear constraints
#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl FromStr for RelOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(RelOp::Lt),
            "<=" => Ok(RelOp::Le),
            ">" => Ok(RelOp::Gt),
            ">=" => Ok(RelOp::Ge),
            "==" => Ok(RelOp::Eq),
            "!=" => Ok(RelOp::Ne),
            _ => Err(Error::InvalidArgument(format!(
                "invalid operator '{s}', only <, <=, >, >=, ==, != allowed"
            ))),
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelOp::Lt => write!(f, "<"),
            RelOp::Le => write!(f, "<="),
            RelOp::Gt => write!(f, ">"),
            RelOp::Ge => write!(f, ">="),
            RelOp::Eq => write!(f, "=="),
            RelOp::Ne => write!(f, "!="),
        }
    }
}

/// The relation of a normalized pseudo-boolean constraint
#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PbRel {
    /// Weighted sum is at least the bound
    Ge,
    /// Weighted sum equals the bound
    Eq,
}

/// Type representing a normalized pseudo-boolean constraint: all
/// coefficients are non-negative and the relation is either `>=` or `=`.
#[derive(Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PbConstraint {
    lits: Vec<(Lit, usize)>,
    rel: PbRel,
    bound: isize,
}

fn overflow() -> Error {
    Error::InvalidArgument(String::from(
        "bound of the pseudo-boolean constraint overflows",
    ))
}

impl PbConstraint {
    /// Converts input literals to positive weights, also returns the sum to
    /// add to the bound
    fn convert_input_lits<LI: IWLitIter>(
        lits: LI,
    ) -> Result<(Vec<(Lit, usize)>, isize), Error> {
        let mut b_add: isize = 0;
        let lits = lits
            .into_iter()
            .map(|(l, w)| match w {
                0 => Err(Error::InvalidArgument(format!(
                    "coefficient of {l} must be nonzero"
                ))),
                w if w > 0 => Ok((l, w.unsigned_abs())),
                _ => {
                    b_add = w
                        .checked_neg()
                        .and_then(|neg| b_add.checked_add(neg))
                        .ok_or_else(overflow)?;
                    Ok((!l, w.unsigned_abs()))
                }
            })
            .collect::<Result<_, _>>()?;
        Ok((lits, b_add))
    }

    /// Constructs a normalized pseudo-boolean constraint
    /// `Σ w_i·l_i op bound`. Strict inequalities are turned into loose ones,
    /// `<=` is turned into `>=` by flipping all signs, and negative
    /// coefficients are moved to the negated literal.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for `!=`, for zero coefficients, and if the
    /// normalized bound does not fit into an `isize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::{lit, types::{PbConstraint, RelOp, constraints::PbRel}};
    ///
    /// let pb = PbConstraint::new([(lit![3], 1), (lit![2], -2), (lit![4], 1)], RelOp::Gt, 3).unwrap();
    /// assert_eq!(pb.lits(), &[(lit![3], 1), (lit![-2], 2), (lit![4], 1)]);
    /// assert_eq!(pb.rel(), PbRel::Ge);
    /// assert_eq!(pb.bound(), 6);
    /// ```
    pub fn new<LI: IWLitIter>(lits: LI, op: RelOp, bound: isize) -> Result<Self, Error> {
        let (flip, rel, bound) = match op {
            RelOp::Ge => (false, PbRel::Ge, Some(bound)),
            RelOp::Gt => (false, PbRel::Ge, bound.checked_add(1)),
            RelOp::Le => (true, PbRel::Ge, bound.checked_neg()),
            RelOp::Lt => (true, PbRel::Ge, bound.checked_sub(1).and_then(isize::checked_neg)),
            RelOp::Eq => (false, PbRel::Eq, Some(bound)),
            RelOp::Ne => {
                return Err(Error::InvalidArgument(String::from(
                    "!= is not a pseudo-boolean relation",
                )))
            }
        };
        let bound = bound.ok_or_else(overflow)?;
        let (lits, b_add) = if flip {
            let negated = lits
                .into_iter()
                .map(|(l, w)| w.checked_neg().map(|w| (l, w)).ok_or_else(overflow))
                .collect::<Result<Vec<_>, _>>()?;
            PbConstraint::convert_input_lits(negated)?
        } else {
            PbConstraint::convert_input_lits(lits)?
        };
        Ok(PbConstraint {
            lits,
            rel,
            bound: bound.checked_add(b_add).ok_or_else(overflow)?,
        })
    }

    /// Constructs the constraint `Σ l_i >= 1` equivalent to a clause
    pub fn from_clause<LI: LitIter>(lits: LI) -> Self {
        PbConstraint {
            lits: lits.into_iter().map(|l| (l, 1)).collect(),
            rel: PbRel::Ge,
            bound: 1,
        }
    }

    /// Gets the weighted literals of the constraint
    pub fn lits(&self) -> &[(Lit, usize)] {
        &self.lits
    }

    /// Gets an iterator over the weighted literals
    pub fn iter(&self) -> impl Iterator<Item = &(Lit, usize)> {
        self.lits.iter()
    }

    /// Gets an iterator over mutable references to the weighted literals
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (Lit, usize)> {
        self.lits.iter_mut()
    }

    /// Gets the relation of the constraint
    pub fn rel(&self) -> PbRel {
        self.rel
    }

    /// Gets the bound of the constraint
    pub fn bound(&self) -> isize {
        self.bound
    }

    /// Gets the number of literals in the constraint
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the constraint has no literals
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Gets the highest variable identifier in the constraint
    pub fn max_vid(&self) -> Option<u32> {
        self.lits.iter().map(|(l, _)| l.vid()).max()
    }

    /// Checks whether the constraint is a clause, i.e. `Σ l_i >= 1` with unit weights
    pub fn is_clause(&self) -> bool {
        self.rel == PbRel::Ge && self.bound == 1 && self.lits.iter().all(|&(_, w)| w == 1)
    }

    /// Checks whether the constraint is satisfied by a total assignment
    pub fn is_sat(&self, assign: &Assignment) -> bool {
        let sum: usize = self
            .lits
            .iter()
            .filter(|&&(l, _)| assign.lit_value(l) == TernaryVal::True)
            .map(|&(_, w)| w)
            .sum();
        let sum = isize::try_from(sum).unwrap_or(isize::MAX);
        match self.rel {
            PbRel::Ge => sum >= self.bound,
            PbRel::Eq => sum == self.bound,
        }
    }
}
