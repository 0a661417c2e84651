//! # Mapping Axioms
//!
//! Clauses constraining the variables of a [`UnaryMapping`] or a
//! [`BinaryMapping`] to describe a mapping with particular properties.
//!
//! In unary representation a mapping can assign several images to an
//! element, so completeness and functionality are separate axioms. In binary
//! representation every assignment describes a unique number per element;
//! completeness only has to rule out the numbers outside of the range.

use itertools::Itertools;
use log::trace;

use super::CollectClauses;
use crate::{
    types::{Clause, Lit, RelOp},
    variables::{BinaryMapping, UnaryMapping, VariableGroup},
    Error,
};

fn row(f: &UnaryMapping, u: usize) -> Result<Vec<Lit>, Error> {
    Ok(f.lits(&[Some(u), None])?.collect())
}

fn column(f: &UnaryMapping, v: usize) -> Result<Vec<Lit>, Error> {
    Ok(f.lits(&[None, Some(v)])?.collect())
}

fn concat(mut first: Clause, second: Clause) -> Clause {
    first.extend(second);
    first
}

/// Every element of the domain has at least one image: one clause
/// `f(u,*)` per `u`, the empty clause if `u` has no possible image
pub fn complete_unary<Col: CollectClauses>(
    f: &UnaryMapping,
    collector: &mut Col,
) -> Result<(), Error> {
    trace!("complete unary mapping over domain {:?}", f.domain());
    for u in f.domain() {
        collector.add_clause(Clause::from(row(f, u)?));
    }
    Ok(())
}

/// Every element of the domain is mapped into the range: forbids the
/// numbers `m..2^bits` for every element
pub fn complete_binary<Col: CollectClauses>(
    f: &BinaryMapping,
    collector: &mut Col,
) -> Result<(), Error> {
    // with as many bits as `usize` every value is representable
    let last = 1_usize
        .checked_shl(f.bits())
        .map_or(usize::MAX, |top| top - 1);
    for i in f.domain() {
        for j in f.range().end..=last {
            collector.add_clause(f.forbid(i, j)?);
        }
    }
    Ok(())
}

/// Every element of the domain has at most one image
pub fn functional_unary<Col: CollectClauses>(
    f: &UnaryMapping,
    collector: &mut Col,
) -> Result<(), Error> {
    for u in f.domain() {
        collector.add_linear(&row(f, u)?, RelOp::Le, 1);
    }
    Ok(())
}

/// Every element of the range has at least one preimage
pub fn surjective_unary<Col: CollectClauses>(
    f: &UnaryMapping,
    collector: &mut Col,
) -> Result<(), Error> {
    for v in f.range() {
        collector.add_clause(Clause::from(column(f, v)?));
    }
    Ok(())
}

/// Every element of the range has at most one preimage
pub fn injective_unary<Col: CollectClauses>(
    f: &UnaryMapping,
    collector: &mut Col,
) -> Result<(), Error> {
    for v in f.range() {
        collector.add_linear(&column(f, v)?, RelOp::Le, 1);
    }
    Ok(())
}

/// No two elements of the domain are mapped to the same value of the range:
/// for each value `y` and each pair `x1 < x2`, the clause
/// `forbid(x1,y) ∨ forbid(x2,y)`
pub fn injective_binary<Col: CollectClauses>(
    f: &BinaryMapping,
    collector: &mut Col,
) -> Result<(), Error> {
    for y in f.range() {
        for (x1, x2) in f.domain().tuple_combinations() {
            collector.add_clause(concat(f.forbid(x1, y)?, f.forbid(x2, y)?));
        }
    }
    Ok(())
}

/// For `u1 < u2` the image of `u1` is not larger than the image of `u2`
pub fn nondecreasing_unary<Col: CollectClauses>(
    f: &UnaryMapping,
    collector: &mut Col,
) -> Result<(), Error> {
    for (u1, u2) in f.domain().tuple_combinations() {
        for &v1 in f.range_of(u1) {
            for &v2 in f.range_of(u2).iter().take_while(|&&v2| v2 < v1) {
                collector.add_clause(Clause::from([
                    !f.evaluate(&[u1, v1])?,
                    !f.evaluate(&[u2, v2])?,
                ]));
            }
        }
    }
    Ok(())
}

/// For `u1 < u2` the number assigned to `u1` is not larger than the number
/// assigned to `u2`. Only values of the range are considered.
pub fn nondecreasing_binary<Col: CollectClauses>(
    f: &BinaryMapping,
    collector: &mut Col,
) -> Result<(), Error> {
    for (u1, u2) in f.domain().tuple_combinations() {
        for (v1, v2) in f.range().tuple_combinations() {
            collector.add_clause(concat(f.forbid(u1, v2)?, f.forbid(u2, v1)?));
        }
    }
    Ok(())
}
