//! # Parity Constraints
//!
//! Encodes `l_1 xor ... xor l_k = b` by forbidding every assignment of the
//! wrong parity with one clause each, so the encoding has `2^(k-1)` clauses.

use log::trace;

use super::CollectClauses;
use crate::{
    types::{Clause, Lit},
    Error,
};

/// Encodes that the exclusive or of `lits` equals `constant`, which must be
/// 0 or 1.
///
/// Candidate clauses are enumerated by flipping literals, with the flips of
/// the first literal varying slowest and the unflipped literal first. A
/// clause is kept if its number of flipped literals is even when `constant`
/// is 1, and odd when `constant` is 0.
///
/// # Examples
///
/// ```
/// use cnfgen::{clause, encodings::parity, lit, types::Clause};
///
/// let mut clauses: Vec<Clause> = vec![];
/// parity::encode(&[lit![-1], lit![2]], 1, &mut clauses).unwrap();
/// assert_eq!(clauses, vec![clause![lit![-1], lit![2]], clause![lit![1], lit![-2]]]);
/// ```
pub fn encode<Col: CollectClauses>(
    lits: &[Lit],
    constant: usize,
    collector: &mut Col,
) -> Result<(), Error> {
    let cls = clauses(lits, constant)?;
    trace!(
        "encoding parity of {} literals with constant {constant}",
        lits.len()
    );
    collector.extend(cls);
    Ok(())
}

/// Lazily generates the clauses of [`encode`], in the same order
///
/// # Errors
///
/// [`Error::InvalidArgument`] for an empty list of literals or a constant
/// other than 0 and 1.
pub fn clauses(
    lits: &[Lit],
    constant: usize,
) -> Result<impl Iterator<Item = Clause> + '_, Error> {
    let Some((_, prefix)) = lits.split_last() else {
        return Err(Error::InvalidArgument(
            "parity constraint over no literals".to_string(),
        ));
    };
    if constant > 1 {
        return Err(Error::InvalidArgument(format!(
            "parity constant must be 0 or 1, not {constant}"
        )));
    }
    let keep_even = constant == 1;
    // flips of all but the last literal, the last flip fixes the parity
    let mut flips = Some(vec![false; prefix.len()]);
    Ok(std::iter::from_fn(move || {
        let current = flips.as_mut()?;
        let odd = current.iter().filter(|&&f| f).count() % 2 == 1;
        let clause = lits
            .iter()
            .zip(current.iter().copied().chain([odd == keep_even]))
            .map(|(&l, f)| if f { !l } else { l })
            .collect::<Clause>();
        match current.iter().rposition(|&f| !f) {
            Some(pos) => {
                current[pos] = true;
                current[pos + 1..].iter_mut().for_each(|f| *f = false);
            }
            None => flips = None,
        }
        Some(clause)
    }))
}
