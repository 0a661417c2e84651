//! # cnfgen - Variable Indexing and Constraint Compilation for Formula Generation
//!
//! `cnfgen` is the engine behind generators of propositional (CNF) and
//! pseudo-boolean formulas used in proof complexity: pigeonhole principles,
//! Tseitin formulas, ordering principles and the like. It provides
//!
//! - a flat, append-only formula store over integer literals with a variable
//!   counter ([`instances::Cnf`], [`instances::Opb`]),
//! - variable groups mapping structured indices (tuples, k-subsets, graph
//!   edges, bit positions) bijectively to contiguous ranges of variables
//!   ([`variables`]),
//! - compilers for parity, cardinality and mapping constraints into plain
//!   clauses ([`encodings`]).
//!
//! The main entry point is [`instances::Formula`].
//!
//! ```
//! use cnfgen::{instances::CnfFormula, types::RelOp, variables::VariableGroup};
//!
//! let mut formula = CnfFormula::new();
//! let x = formula.new_block(&[2, 3], Some("x({},{})")).unwrap();
//! let row: Vec<_> = x.lits(&[Some(1), None]).unwrap().collect();
//! formula.add_linear(&row, RelOp::Eq, 1).unwrap();
//! assert_eq!(formula.number_of_variables(), 6);
//! assert_eq!(formula.number_of_clauses(), 4);
//! ```
//!
//! ## Features
//!
//! | Feature name | Description |
//! | --- | --- |
//! | `fxhash` | Use the faster firefox hash function from `rustc-hash` for internal lookup tables. |
//! | `rand` | Enable randomization features. (Shuffling formulas.) |
//! | `serde` | Serialization of the basic types with `serde`. |
//! | `compression` | Enable reading and writing compressed files. |
//!
//! ## Logging
//!
//! Diagnostics are emitted through the [`log`] facade. No logger is installed
//! by the library.

use thiserror::Error;

pub mod encodings;
pub mod graphs;
pub mod instances;
pub mod types;
pub mod variables;

mod utils;

/// Errors raised by the formula engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A zero literal, or a literal inconsistent with the variable pool
    #[error("invalid literal: {0}")]
    InvalidLiteral(String),
    /// An index or literal outside the domain of a variable group
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),
    /// A malformed argument, such as an unsupported operator or a pattern of
    /// the wrong arity
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A variable group would overlap already reserved variables
    #[error("variable groups overlap: {0}")]
    OverlapViolation(String),
}
