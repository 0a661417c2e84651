//! # Cardinality Constraints With Unit Coefficients
//!
//! Direct (binomial) encodings of `Σ l_i op c` for the six relational
//! operators. Every encoding is a set of clauses over the input literals
//! only.
//!
//! ## References
//!
//! - Steven D. Prestwich: _CNF Encodings_, in Handbook of Satisfiability 2021.

use itertools::Itertools;
use log::trace;

use super::CollectClauses;
use crate::types::{Clause, Lit, RelOp};

/// Encodes `Σ lits op value`.
///
/// - `>= c`: nothing if `c <= 0`, the empty clause if `c > k`, otherwise one
///   clause per `(k-c+1)`-subset of the literals, in lexicographic order,
/// - `<= c`: the encoding of `>= k-c` over the negated literals,
/// - `< c` and `> c`: `<= c-1` and `>= c+1`,
/// - `== c`: the clauses of `<= c` followed by those of `>= c`,
/// - `!= c`: for every `c`-subset of positions, the clause with exactly those
///   literals negated. Nothing if `c < 0` or `c > k`.
///
/// # Examples
///
/// ```
/// use cnfgen::{clause, encodings::card, lit, types::{Clause, RelOp}};
///
/// let mut clauses: Vec<Clause> = vec![];
/// card::encode(&[lit![-1], lit![2], lit![-3]], RelOp::Lt, 2, &mut clauses);
/// assert_eq!(
///     clauses,
///     vec![
///         clause![lit![1], lit![-2]],
///         clause![lit![1], lit![3]],
///         clause![lit![-2], lit![3]],
///     ]
/// );
/// ```
pub fn encode<Col: CollectClauses>(
    lits: &[Lit],
    op: RelOp,
    value: isize,
    collector: &mut Col,
) {
    trace!("encoding {} literals {op} {value}", lits.len());
    match op {
        RelOp::Ge => encode_at_least(lits, value, collector),
        RelOp::Gt => encode_at_least(lits, value.saturating_add(1), collector),
        RelOp::Le => encode_at_most(lits, value, collector),
        RelOp::Lt => encode_at_most(lits, value.saturating_sub(1), collector),
        RelOp::Eq => {
            encode_at_most(lits, value, collector);
            encode_at_least(lits, value, collector);
        }
        RelOp::Ne => encode_not_equal(lits, value, collector),
    }
}

fn n_lits(lits: &[Lit]) -> isize {
    isize::try_from(lits.len()).unwrap_or(isize::MAX)
}

/// Encodes `Σ lits >= value`
pub fn encode_at_least<Col: CollectClauses>(lits: &[Lit], value: isize, collector: &mut Col) {
    let k = n_lits(lits);
    if value <= 0 {
        return;
    }
    if value > k {
        collector.add_clause(Clause::new());
        return;
    }
    // value is in 1..=k here
    let size = (k - value + 1) as usize;
    collector.extend(
        lits.iter()
            .copied()
            .combinations(size)
            .map(Clause::from),
    );
}

/// Encodes `Σ lits <= value`
pub fn encode_at_most<Col: CollectClauses>(lits: &[Lit], value: isize, collector: &mut Col) {
    let negated: Vec<Lit> = lits.iter().map(|&l| !l).collect();
    encode_at_least(&negated, n_lits(lits).saturating_sub(value), collector);
}

/// Encodes `Σ lits != value`
pub fn encode_not_equal<Col: CollectClauses>(lits: &[Lit], value: isize, collector: &mut Col) {
    if value < 0 || value > n_lits(lits) {
        return;
    }
    collector.extend((0..lits.len()).combinations(value as usize).map(|flipped| {
        let mut flipped = flipped.into_iter().peekable();
        lits.iter()
            .enumerate()
            .map(|(i, &l)| {
                if flipped.next_if_eq(&i).is_some() {
                    !l
                } else {
                    l
                }
            })
            .collect::<Clause>()
    }));
}

/// Bound `c` such that `Σ lits >= c` states that at least half of the
/// literals are true
pub fn loose_majority_bound(n: usize) -> isize {
    isize::try_from(n.div_ceil(2)).unwrap_or(isize::MAX)
}

/// Bound `c` such that `Σ lits <= c` states that at most half of the
/// literals are true
pub fn loose_minority_bound(n: usize) -> isize {
    isize::try_from(n / 2).unwrap_or(isize::MAX)
}

/// Bound `c` such that `Σ lits >= c` states that more than half of the
/// literals are true
pub fn strict_majority_bound(n: usize) -> isize {
    isize::try_from(n / 2 + 1).unwrap_or(isize::MAX)
}

/// Bound `c` such that `Σ lits <= c` states that fewer than half of the
/// literals are true
pub fn strict_minority_bound(n: usize) -> isize {
    isize::try_from(n).map_or(isize::MAX, |n| (n - 1).div_euclid(2))
}

#[cfg(test)]
mod tests {
    use super::{encode, loose_majority_bound, strict_minority_bound};
    use crate::{
        clause, lit,
        types::{Assignment, Clause, Lit, RelOp},
    };

    fn enc(lits: &[Lit], op: RelOp, value: isize) -> Vec<Clause> {
        let mut cls = vec![];
        encode(lits, op, value, &mut cls);
        cls
    }

    #[test]
    fn at_least() {
        let lits = [lit![-1], lit![2], lit![-3]];
        assert_eq!(
            enc(&lits, RelOp::Ge, 1),
            vec![clause![lit![-1], lit![2], lit![-3]]]
        );
        assert_eq!(
            enc(&lits, RelOp::Ge, 3),
            vec![clause![lit![-1]], clause![lit![2]], clause![lit![-3]]]
        );
        assert!(enc(&lits, RelOp::Ge, 0).is_empty());
        assert_eq!(enc(&lits, RelOp::Gt, 3), vec![Clause::new()]);
    }

    #[test]
    fn at_most() {
        let lits = [lit![1], lit![2], lit![3]];
        assert_eq!(
            enc(&lits, RelOp::Lt, 2),
            vec![
                clause![lit![-1], lit![-2]],
                clause![lit![-1], lit![-3]],
                clause![lit![-2], lit![-3]]
            ]
        );
        assert_eq!(enc(&lits, RelOp::Le, -1), vec![Clause::new()]);
        assert!(enc(&lits, RelOp::Le, 10).is_empty());
    }

    #[test]
    fn equal() {
        let lits = [lit![1], lit![2], lit![3]];
        let cls = enc(&lits, RelOp::Eq, 1);
        assert_eq!(cls.len(), 4);
        assert_eq!(cls[3], clause![lit![1], lit![2], lit![3]]);
    }

    #[test]
    fn not_equal() {
        let lits = [lit![1], lit![2], lit![3]];
        assert_eq!(
            enc(&lits, RelOp::Ne, 1),
            vec![
                clause![lit![-1], lit![2], lit![3]],
                clause![lit![1], lit![-2], lit![3]],
                clause![lit![1], lit![2], lit![-3]]
            ]
        );
        assert_eq!(enc(&lits, RelOp::Ne, 0), vec![clause![lit![1], lit![2], lit![3]]]);
        assert!(enc(&lits, RelOp::Ne, 4).is_empty());
        assert!(enc(&lits, RelOp::Ne, -1).is_empty());
    }

    #[test]
    fn exhaustive_semantics() {
        let lits: Vec<Lit> = vec![lit![1], lit![-2], lit![3], lit![4]];
        let ops = [
            RelOp::Lt,
            RelOp::Le,
            RelOp::Gt,
            RelOp::Ge,
            RelOp::Eq,
            RelOp::Ne,
        ];
        for op in ops {
            for value in -1..=5 {
                let cls = enc(&lits, op, value);
                for bits in 0..16_u64 {
                    let assign = Assignment::from_bits(4, bits);
                    let sum = lits
                        .iter()
                        .filter(|&&l| assign.lit_value(l).to_bool_with_def(false))
                        .count() as isize;
                    let expected = match op {
                        RelOp::Lt => sum < value,
                        RelOp::Le => sum <= value,
                        RelOp::Gt => sum > value,
                        RelOp::Ge => sum >= value,
                        RelOp::Eq => sum == value,
                        RelOp::Ne => sum != value,
                    };
                    assert_eq!(
                        cls.iter().all(|cl| cl.is_sat(&assign)),
                        expected,
                        "{op} {value} on {bits:b}"
                    );
                }
            }
        }
    }

    #[test]
    fn shorthand_bounds() {
        assert_eq!(loose_majority_bound(5), 3);
        assert_eq!(loose_majority_bound(4), 2);
        assert_eq!(strict_minority_bound(4), 1);
        assert_eq!(strict_minority_bound(5), 2);
        assert_eq!(strict_minority_bound(0), -1);
    }
}
