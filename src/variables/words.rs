//! # Combinatorial Words
//!
//! Variables indexed by sequences of length `k` over `1..=n`, for the four
//! usual sequence families. Sequences are enumerated in lexicographic order
//! and numbered consecutively.

use std::{fmt, ops::Range};

use itertools::Itertools;

use super::{check_arity, expand_pattern, id_range, out_of_range, Indices, Lits, VariableGroup};
use crate::{
    types::{Lit, RsHashMap},
    utils::LabelFormat,
    Error,
};

/// The family of sequences indexing a [`Words`] group
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordKind {
    /// Strictly increasing sequences (k-subsets)
    Combinations,
    /// Non-decreasing sequences (k-multisets)
    CombinationsWithReplacement,
    /// Sequences without repetition
    Permutations,
    /// All sequences
    Words,
}

impl fmt::Display for WordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordKind::Combinations => write!(f, "combinations"),
            WordKind::CombinationsWithReplacement => write!(f, "combinations with replacement"),
            WordKind::Permutations => write!(f, "permutations"),
            WordKind::Words => write!(f, "words"),
        }
    }
}

impl WordKind {
    fn sequences(self, n: usize, k: usize) -> Vec<Vec<usize>> {
        if k == 0 {
            return vec![vec![]];
        }
        match self {
            WordKind::Combinations => (1..=n).combinations(k).collect(),
            WordKind::CombinationsWithReplacement => {
                (1..=n).combinations_with_replacement(k).collect()
            }
            WordKind::Permutations => (1..=n).permutations(k).collect(),
            WordKind::Words => (0..k).map(|_| 1..=n).multi_cartesian_product().collect(),
        }
    }

    fn contains(self, n: usize, seq: &[usize]) -> bool {
        if seq.iter().any(|&i| i == 0 || i > n) {
            return false;
        }
        match self {
            WordKind::Combinations => seq.windows(2).all(|w| w[0] < w[1]),
            WordKind::CombinationsWithReplacement => seq.windows(2).all(|w| w[0] <= w[1]),
            WordKind::Permutations => seq.iter().all_unique(),
            WordKind::Words => true,
        }
    }
}

/// Variables indexed by the sequences of a [`WordKind`] family. The label
/// format has a single placeholder that receives the sequence joined by
/// commas.
///
/// # Examples
///
/// ```
/// use cnfgen::{instances::CnfFormula, lit, variables::{VariableGroup, WordKind}};
///
/// let mut formula = CnfFormula::new();
/// let g = formula
///     .new_words(4, 2, WordKind::Combinations, Some("G_{{{}}}"))
///     .unwrap();
/// assert_eq!(g.evaluate(&[2, 3]).unwrap(), lit![4]);
/// assert_eq!(g.label(&[1, 4]).unwrap(), "G_{1,4}");
/// ```
#[derive(Clone, Debug)]
pub struct Words {
    ids: Range<u32>,
    n: usize,
    k: usize,
    kind: WordKind,
    seqs: Vec<Vec<usize>>,
    seq_ids: RsHashMap<Vec<usize>, u32>,
    fmt: LabelFormat,
}

impl Words {
    /// Creates the group of sequences of length `k` over `1..=n`, starting
    /// from variable `start`
    pub fn new(
        start: u32,
        n: usize,
        k: usize,
        kind: WordKind,
        label: Option<&str>,
    ) -> Result<Self, Error> {
        let seqs = kind.sequences(n, k);
        let ids = id_range(start, seqs.len())?;
        let seq_ids = seqs
            .iter()
            .enumerate()
            .map(|(off, seq)| (seq.clone(), ids.start + off as u32))
            .collect();
        let fmt = LabelFormat::parse(label.unwrap_or("p_{{{}}}"), 1)?;
        Ok(Self {
            ids,
            n,
            k,
            kind,
            seqs,
            seq_ids,
            fmt,
        })
    }

    /// The size of the alphabet
    pub fn alphabet_size(&self) -> usize {
        self.n
    }

    /// The family of sequences
    pub fn kind(&self) -> WordKind {
        self.kind
    }

    fn matching<'a>(
        &'a self,
        pattern: &'a [Option<usize>],
    ) -> impl Iterator<Item = (u32, &'a Vec<usize>)> + 'a {
        self.seqs
            .iter()
            .enumerate()
            .filter(move |(_, seq)| {
                seq.iter()
                    .zip(pattern)
                    .all(|(&i, fixed)| fixed.map_or(true, |f| f == i))
            })
            .map(move |(off, seq)| (self.ids.start + off as u32, seq))
    }

    fn check_pattern(&self, pattern: &[Option<usize>]) -> Result<Vec<Option<usize>>, Error> {
        let pattern = expand_pattern(pattern, self.k)?;
        if let Some(i) = pattern.iter().flatten().find(|&&i| i == 0 || i > self.n) {
            return Err(Error::IndexOutOfRange(format!(
                "{i} is not in the alphabet 1..={}",
                self.n
            )));
        }
        if pattern.iter().all(Option::is_some) {
            let seq: Vec<_> = pattern.iter().flatten().copied().collect();
            self.id_of(&seq)?;
        }
        Ok(pattern)
    }

    fn id_of(&self, seq: &[usize]) -> Result<u32, Error> {
        if !self.kind.contains(self.n, seq) {
            return Err(Error::IndexOutOfRange(format!(
                "{seq:?} is not one of the {} of length {} over 1..={}",
                self.kind, self.k, self.n
            )));
        }
        self.seq_ids.get(seq).copied().ok_or_else(|| {
            Error::IndexOutOfRange(format!("{seq:?} is not an index of the group"))
        })
    }
}

impl VariableGroup for Words {
    fn ids(&self) -> Range<u32> {
        self.ids.clone()
    }

    fn arity(&self) -> usize {
        self.k
    }

    fn indices(&self, pattern: &[Option<usize>]) -> Result<Indices<'_>, Error> {
        let pattern = self.check_pattern(pattern)?;
        let seqs: Vec<_> = self.matching(&pattern).map(|(_, s)| s.clone()).collect();
        Ok(Box::new(seqs.into_iter()))
    }

    fn evaluate(&self, index: &[usize]) -> Result<Lit, Error> {
        check_arity(index, self.k)?;
        Ok(Lit::new_unchecked(self.id_of(index)?, false))
    }

    fn lits(&self, pattern: &[Option<usize>]) -> Result<Lits<'_>, Error> {
        let pattern = self.check_pattern(pattern)?;
        if pattern.iter().all(Option::is_none) {
            return Ok(Box::new(
                self.ids.clone().map(|id| Lit::new_unchecked(id, false)),
            ));
        }
        let lits: Vec<_> = self
            .matching(&pattern)
            .map(|(id, _)| Lit::new_unchecked(id, false))
            .collect();
        Ok(Box::new(lits.into_iter()))
    }

    fn to_index(&self, lit: Lit) -> Result<Vec<usize>, Error> {
        if !self.contains(lit) {
            return Err(out_of_range(lit, &self.ids));
        }
        Ok(self.seqs[(lit.vid() - self.ids.start) as usize].clone())
    }

    fn render_label(&self, index: &[usize]) -> String {
        self.fmt.render(&[index.iter().join(",")])
    }
}
