//! # Common Types for Formula Generation
//!
//! Variables, literals and assignments. Variables are identified by positive
//! integers starting from 1, exactly like in the DIMACS format, and literals
//! are variables with a polarity.

use std::{fmt, ops};

pub mod constraints;
pub use constraints::{Clause, PbConstraint, RelOp};

use crate::Error;

/// The hash map to use throughout the library
#[cfg(feature = "fxhash")]
pub type RsHashMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fxhash"))]
pub type RsHashMap<K, V> = std::collections::HashMap<K, V>;

/// Type representing boolean variables. Variable identifiers start from 1
/// and the maximum identifier is `i32::MAX`, so that every literal has a
/// DIMACS representation as an `i32`.
#[derive(Hash, Eq, PartialEq, PartialOrd, Clone, Copy, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Var {
    id: u32,
}

impl Var {
    /// The maximum identifier that can be represented.
    pub const MAX_ID: u32 = i32::MAX as u32;

    /// Creates a new variable with a given identifier.
    /// Panics if `id == 0` or `id > Var::MAX_ID`.
    pub fn new(id: u32) -> Var {
        if id == 0 || id > Var::MAX_ID {
            panic!("invalid variable identifier {id}")
        }
        Var { id }
    }

    /// Creates a new variable with a given identifier.
    /// Returns [`Error::InvalidLiteral`] if `id == 0` or `id > Var::MAX_ID`.
    pub fn new_with_error(id: u32) -> Result<Var, Error> {
        if id == 0 || id > Var::MAX_ID {
            return Err(Error::InvalidLiteral(format!(
                "variable identifier {id} is not in 1..={}",
                Var::MAX_ID
            )));
        }
        Ok(Var { id })
    }

    /// Creates a new variable without checking the identifier.
    /// Only use this if `1 <= id <= Var::MAX_ID` is guaranteed.
    #[inline]
    pub(crate) fn new_unchecked(id: u32) -> Var {
        Var { id }
    }

    /// Creates a literal that is not negated.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::types::{Var, Lit};
    ///
    /// let var = Var::new(5);
    /// let lit = Lit::positive(5);
    ///
    /// assert_eq!(lit, var.pos_lit());
    /// ```
    #[inline]
    pub fn pos_lit(self) -> Lit {
        Lit::new_unchecked(self.id, false)
    }

    /// Creates a negated literal.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::types::{Var, Lit};
    ///
    /// let var = Var::new(5);
    /// let lit = Lit::negative(5);
    ///
    /// assert_eq!(lit, var.neg_lit());
    /// ```
    #[inline]
    pub fn neg_lit(self) -> Lit {
        Lit::new_unchecked(self.id, true)
    }

    /// Returns the (1-based) identifier of the variable.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the 0-based position of the variable, for indexing data
    /// structures like vectors.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::types::Var;
    ///
    /// assert_eq!(Var::new(1).idx(), 0);
    /// ```
    #[inline]
    pub fn idx(&self) -> usize {
        (self.id - 1) as usize
    }
}

/// Variables can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.id)
    }
}

/// More easily creates variables. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use cnfgen::{var, types::Var};
///
/// assert_eq!(var![42], Var::new(42));
/// ```
#[macro_export]
macro_rules! var {
    ($v:expr) => {
        $crate::types::Var::new($v)
    };
}

/// Type representing literals, possibly negated boolean variables.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Lit {
    /// Literal representation is `id << 1` with the last bit representing
    /// whether the literal is negated or not. Sorting literals therefore
    /// sorts by variable first, with the positive literal first.
    lidx: u32,
}

impl Lit {
    /// Represents a literal in memory
    #[inline]
    fn represent(id: u32, negated: bool) -> u32 {
        (id << 1) + (negated as u32)
    }

    /// Creates a new (negated or not) literal of the variable with the given
    /// identifier. Panics if `id == 0` or `id > Var::MAX_ID`.
    pub fn new(id: u32, negated: bool) -> Lit {
        if id == 0 || id > Var::MAX_ID {
            panic!("invalid variable identifier {id}")
        }
        Lit {
            lidx: Lit::represent(id, negated),
        }
    }

    /// Creates a new (negated or not) literal of the variable with the given
    /// identifier. Returns [`Error::InvalidLiteral`] if `id == 0` or
    /// `id > Var::MAX_ID`.
    pub fn new_with_error(id: u32, negated: bool) -> Result<Lit, Error> {
        Ok(Var::new_with_error(id)?.lit(negated))
    }

    #[inline]
    pub(crate) fn new_unchecked(id: u32, negated: bool) -> Lit {
        Lit {
            lidx: Lit::represent(id, negated),
        }
    }

    /// Creates a new positive literal. Panics if the identifier is invalid.
    #[inline]
    pub fn positive(id: u32) -> Lit {
        Lit::new(id, false)
    }

    /// Creates a new negated literal. Panics if the identifier is invalid.
    #[inline]
    pub fn negative(id: u32) -> Lit {
        Lit::new(id, true)
    }

    /// Creates a literal from its DIMACS integer representation. Returns
    /// [`Error::InvalidLiteral`] if the value is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::types::Lit;
    ///
    /// assert_eq!(Lit::from_dimacs(-3).unwrap(), Lit::negative(3));
    /// assert!(Lit::from_dimacs(0).is_err());
    /// ```
    pub fn from_dimacs(val: i32) -> Result<Lit, Error> {
        if val == 0 {
            return Err(Error::InvalidLiteral(String::from(
                "0 is not a valid literal",
            )));
        }
        Lit::new_with_error(val.unsigned_abs(), val < 0)
    }

    /// Converts the literal to its signed DIMACS integer representation.
    pub fn to_dimacs(self) -> i32 {
        // identifiers never exceed `i32::MAX`
        let id = self.vid() as i32;
        if self.is_neg() {
            -id
        } else {
            id
        }
    }

    /// Gets the identifier of the variable of the literal
    #[inline]
    pub fn vid(&self) -> u32 {
        self.lidx >> 1
    }

    /// Gets the variable that the literal corresponds to.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::types::{Var, Lit};
    ///
    /// let var = Var::new(5);
    /// let lit = Lit::negative(5);
    ///
    /// assert_eq!(var, lit.var());
    /// ```
    #[inline]
    pub fn var(&self) -> Var {
        Var::new_unchecked(self.vid())
    }

    /// True if the literal is positive.
    #[inline]
    pub fn is_pos(&self) -> bool {
        (self.lidx & 1u32) == 0
    }

    /// True if the literal is negated.
    #[inline]
    pub fn is_neg(&self) -> bool {
        (self.lidx & 1u32) == 1
    }
}

impl Var {
    /// Creates a literal with the given polarity
    #[inline]
    pub fn lit(self, negated: bool) -> Lit {
        Lit::new_unchecked(self.id, negated)
    }
}

/// Trait implementation allowing for negating literals with the `!` operator.
impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit {
            lidx: self.lidx ^ 1u32,
        }
    }
}

/// Trait implementation allowing for negating literals with the unary `-` operator.
impl ops::Neg for Lit {
    type Output = Lit;

    #[inline]
    fn neg(self) -> Lit {
        Lit {
            lidx: self.lidx ^ 1u32,
        }
    }
}

/// Literals are printed in OPB notation with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.is_neg() {
            true => write!(f, "~x{}", self.vid()),
            false => write!(f, "x{}", self.vid()),
        }
    }
}

/// Literals are debug-printed as DIMACS integers
impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// More easily creates literals from DIMACS integers (negative value is
/// negation). Mainly used in tests.
///
/// # Examples
///
/// ```
/// use cnfgen::{lit, types::Lit};
///
/// assert_eq!(lit![42], Lit::positive(42));
/// assert_eq!(lit![-42], Lit::negative(42));
/// ```
#[macro_export]
macro_rules! lit {
    ($l:expr) => {
        $crate::types::Lit::from_dimacs($l).unwrap()
    };
}

/// Ternary value assigned to a literal or variable, including possible "don't care"
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TernaryVal {
    /// Positive assignment.
    True,
    /// Negative assignment.
    False,
    /// Not assigned.
    DontCare,
}

impl TernaryVal {
    /// Converts a [`TernaryVal`] to a bool with a default value for "don't cares"
    pub fn to_bool_with_def(self, def: bool) -> bool {
        match self {
            TernaryVal::True => true,
            TernaryVal::False => false,
            TernaryVal::DontCare => def,
        }
    }
}

impl fmt::Display for TernaryVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TernaryVal::True => write!(f, "1"),
            TernaryVal::False => write!(f, "0"),
            TernaryVal::DontCare => write!(f, "_"),
        }
    }
}

impl fmt::Debug for TernaryVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<bool> for TernaryVal {
    fn from(value: bool) -> Self {
        if value {
            return TernaryVal::True;
        }
        TernaryVal::False
    }
}

/// Type representing an assignment of variables.
#[derive(Clone, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Assignment {
    assignment: Vec<TernaryVal>,
}

impl Assignment {
    /// Builds a total assignment of the variables `1..=n_vars` from the bits
    /// of `bits`: variable `i` is true iff bit `i-1` is set. Used to
    /// enumerate all assignments of small formulas.
    ///
    /// # Examples
    ///
    /// ```
    /// use cnfgen::{lit, types::{Assignment, TernaryVal}};
    ///
    /// let assign = Assignment::from_bits(3, 0b101);
    /// assert_eq!(assign.lit_value(lit![1]), TernaryVal::True);
    /// assert_eq!(assign.lit_value(lit![2]), TernaryVal::False);
    /// assert_eq!(assign.lit_value(lit![-3]), TernaryVal::False);
    /// ```
    pub fn from_bits(n_vars: u32, bits: u64) -> Self {
        Self {
            assignment: (0..n_vars)
                .map(|i| TernaryVal::from(i < 64 && (bits >> i) & 1 == 1))
                .collect(),
        }
    }

    /// Get the value that the assignment gives to a variable.
    /// If the variable is not included, will return `TernaryVal::DontCare`.
    pub fn var_value(&self, var: Var) -> TernaryVal {
        if var.idx() >= self.assignment.len() {
            TernaryVal::DontCare
        } else {
            self.assignment[var.idx()]
        }
    }

    /// Same as [`Assignment::var_value`], but for literals.
    pub fn lit_value(&self, lit: Lit) -> TernaryVal {
        if lit.is_neg() {
            match self.var_value(lit.var()) {
                TernaryVal::DontCare => TernaryVal::DontCare,
                TernaryVal::True => TernaryVal::False,
                TernaryVal::False => TernaryVal::True,
            }
        } else {
            self.var_value(lit.var())
        }
    }

    /// Assigns a variable in the assignment
    pub fn assign_var(&mut self, var: Var, val: TernaryVal) {
        if self.assignment.len() < var.idx() + 1 {
            self.assignment.resize(var.idx() + 1, TernaryVal::DontCare);
        }
        self.assignment[var.idx()] = val;
    }

    /// Assigns a literal to true
    pub fn assign_lit(&mut self, lit: Lit) {
        self.assign_var(lit.var(), TernaryVal::from(lit.is_pos()))
    }

    /// Get the maximum variable in the assignment
    pub fn max_var(&self) -> Option<Var> {
        u32::try_from(self.assignment.len())
            .ok()
            .filter(|&n| n > 0)
            .map(Var::new_unchecked)
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.assignment
            .iter()
            .try_for_each(|tv| write!(f, "{}", tv))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromIterator<Lit> for Assignment {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        let mut assignment = Assignment::default();
        iter.into_iter().for_each(|l| assignment.assign_lit(l));
        assignment
    }
}

impl From<Vec<TernaryVal>> for Assignment {
    fn from(assignment: Vec<TernaryVal>) -> Self {
        Self { assignment }
    }
}

/// An iterator over literals
pub trait LitIter: IntoIterator<Item = Lit> {}
impl<I: IntoIterator<Item = Lit>> LitIter for I {}

/// An iterator over integer-weighted literals
pub trait IWLitIter: IntoIterator<Item = (Lit, isize)> {}
impl<I: IntoIterator<Item = (Lit, isize)>> IWLitIter for I {}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use super::{Assignment, Lit, TernaryVal, Var};
    use crate::Error;

    #[test]
    fn var_id() {
        let var = Var::new(5);
        assert_eq!(var.id(), 5);
        assert_eq!(var.idx(), 4);
    }

    #[test]
    #[should_panic]
    fn var_zero() {
        Var::new(0);
    }

    #[test]
    fn var_with_error() {
        assert!(matches!(
            Var::new_with_error(0),
            Err(Error::InvalidLiteral(_))
        ));
        assert!(matches!(
            Var::new_with_error(Var::MAX_ID + 1),
            Err(Error::InvalidLiteral(_))
        ));
        assert_eq!(Var::new_with_error(Var::MAX_ID).unwrap().id(), Var::MAX_ID);
    }

    #[test]
    fn var_pos_neg_lit() {
        let var = Var::new(5);
        assert_eq!(var.pos_lit(), Lit::positive(5));
        assert_eq!(var.neg_lit(), Lit::negative(5));
        assert_eq!(var.pos_lit().var(), var);
    }

    #[test]
    fn lit_representation() {
        let lidx = Lit::represent(5, true);
        assert_eq!(lidx, 0b1011);
    }

    #[test]
    fn lit_polarity() {
        let lit = Lit::positive(1);
        assert!(lit.is_pos());
        assert!(!lit.is_neg());
        let lit = !lit;
        assert!(!lit.is_pos());
        assert!(lit.is_neg());
        assert_eq!(-lit, Lit::positive(1));
    }

    #[test]
    fn lit_dimacs() {
        assert_eq!(Lit::from_dimacs(7).unwrap(), Lit::positive(7));
        assert_eq!(Lit::from_dimacs(-7).unwrap(), Lit::negative(7));
        assert_eq!(Lit::negative(7).to_dimacs(), -7);
        assert_eq!(Lit::positive(i32::MAX as u32).to_dimacs(), i32::MAX);
        assert!(matches!(Lit::from_dimacs(0), Err(Error::InvalidLiteral(_))));
    }

    #[test]
    fn lit_order() {
        let mut lits = vec![lit![3], lit![-1], lit![2], lit![1], lit![-3]];
        lits.sort();
        assert_eq!(lits, vec![lit![1], lit![-1], lit![2], lit![3], lit![-3]]);
    }

    #[test]
    fn lit_display() {
        assert_eq!(format!("{}", lit![4]), "x4");
        assert_eq!(format!("{}", lit![-4]), "~x4");
        assert_eq!(format!("{:?}", lit![-4]), "-4");
    }

    #[test]
    fn assignment_values() {
        let assign: Assignment = [lit![1], lit![-3]].into_iter().collect();
        assert_eq!(assign.var_value(var![1]), TernaryVal::True);
        assert_eq!(assign.var_value(var![2]), TernaryVal::DontCare);
        assert_eq!(assign.lit_value(lit![-3]), TernaryVal::True);
        assert_eq!(assign.lit_value(lit![4]), TernaryVal::DontCare);
        assert_eq!(assign.max_var(), Some(var![3]));
        assert_eq!(format!("{}", assign), "1_0");
    }

    #[test]
    fn ternary_val_size() {
        assert_eq!(size_of::<TernaryVal>(), 1);
    }

    #[test]
    fn lit_mem_size() {
        assert_eq!(size_of::<Lit>(), size_of::<u32>());
    }
}
