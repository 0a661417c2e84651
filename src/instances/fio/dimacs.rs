//! # Parsing and Writing DIMACS Files
//!
//! Internal module containing functions for parsing and writing DIMACS CNF
//! files. Parsing is strict: a single `p cnf <n> <m>` line has to precede
//! all clauses, every literal has to lie in `1..=n` and the file has to
//! contain exactly `m` clauses. Clauses may span several lines.
//!
//! ## References
//!
//! - [DIMACS CNF](http://www.satcompetition.org/2011/format-benchmarks2011.html)

use crate::{
    types::{Clause, Lit, Var},
    Error as CoreError,
};
use nom::{
    bytes::complete::tag,
    character::complete::{i32, multispace0, multispace1, u64},
    combinator::all_consuming,
    error::{Error as NomError, ErrorKind, ParseError},
    multi::separated_list0,
    sequence::{delimited, terminated, tuple},
    IResult,
};
use std::io::{self, BufRead, Write};
use thiserror::Error;

use super::ascii_text;

/// Errors occuring within the DIMACS parsing module
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid literal in the file
    #[error("invalid literal at line {0}: {1}")]
    Lit(usize, String),
    /// Invalid p line
    #[error("p-line at line {0} should have format 'p cnf <n> <m>'")]
    PLine(usize),
    /// More than one p line
    #[error("there is another p-line at line {0}")]
    DuplicatePLine(usize),
    /// A clause appeared before the p line
    #[error("non comment line {0} before p cnf <n> <m>")]
    ClauseBeforePLine(usize),
    /// The file has no p line
    #[error("missing p-line")]
    MissingPLine,
    /// The last clause is not terminated by `0`
    #[error("the last clause is not terminated by 0")]
    IncompleteClause,
    /// The number of clauses does not match the p line
    #[error("expected {expected} clauses but found {found}")]
    ClauseCount {
        /// The number of clauses in the p line
        expected: usize,
        /// The number of clauses in the file
        found: usize,
    },
    /// P line value is too large for the number of variables or clauses
    #[error("value in p-line too large: {0}")]
    PValTooLarge(u64),
    /// IO error reading file
    #[error("IO error: {0}")]
    IOError(#[from] io::Error),
    /// Base error from nom parsing
    #[error("nom error: {0} ({1:?})")]
    NomError(String, ErrorKind),
    /// Incomplete nom error
    #[error("nom parser requested more data")]
    NomIncomplete,
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Lit(l0, l1), Self::Lit(r0, r1)) => l0 == r0 && l1 == r1,
            (Self::PLine(l0), Self::PLine(r0)) => l0 == r0,
            (Self::DuplicatePLine(l0), Self::DuplicatePLine(r0)) => l0 == r0,
            (Self::ClauseBeforePLine(l0), Self::ClauseBeforePLine(r0)) => l0 == r0,
            (
                Self::ClauseCount {
                    expected: le,
                    found: lf,
                },
                Self::ClauseCount {
                    expected: re,
                    found: rf,
                },
            ) => le == re && lf == rf,
            (Self::PValTooLarge(l0), Self::PValTooLarge(r0)) => l0 == r0,
            (Self::IOError(_), Self::IOError(_)) => true,
            (Self::NomError(l0, l1), Self::NomError(r0, r1)) => l0 == r0 && l1 == r1,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl ParseError<&str> for Error {
    fn from_error_kind(input: &str, kind: ErrorKind) -> Self {
        Self::NomError(String::from(input), kind)
    }

    fn append(_: &str, _: ErrorKind, other: Self) -> Self {
        // Other error always has precedence. This should prefer more meaningful
        // errors than [`Error::NomError`]
        other
    }
}

fn unwrap_dimacs_error(err: nom::Err<Error>) -> Error {
    match err {
        nom::Err::Incomplete(_) => Error::NomIncomplete,
        nom::Err::Error(e) => e,
        nom::Err::Failure(e) => e,
    }
}

/// Parses a DIMACS CNF file from a reader, returns the number of variables
/// of the p line and the clauses in file order
pub fn parse_cnf<R: BufRead>(mut reader: R) -> Result<(u32, Vec<Clause>), Error> {
    let mut preamble: Option<(u32, usize)> = None;
    let mut clauses = vec![];
    let mut buffer = Clause::new();
    let mut line_num = 0;
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        line_num += 1;
        let line = buf.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        if line.starts_with('p') {
            if preamble.is_some() {
                return Err(Error::DuplicatePLine(line_num));
            }
            let (_, p) = parse_p_line(line, line_num).map_err(unwrap_dimacs_error)?;
            preamble = Some(p);
            continue;
        }
        let Some((n_vars, _)) = preamble else {
            return Err(Error::ClauseBeforePLine(line_num));
        };
        let (_, vals) = parse_values(line, line_num).map_err(unwrap_dimacs_error)?;
        for val in vals {
            if val == 0 {
                clauses.push(std::mem::take(&mut buffer));
                continue;
            }
            if val.unsigned_abs() > n_vars {
                return Err(Error::Lit(
                    line_num,
                    format!("{val} is not a literal over {n_vars} variables"),
                ));
            }
            buffer.add(
                Lit::from_dimacs(val).map_err(|e: CoreError| Error::Lit(line_num, e.to_string()))?,
            );
        }
    }
    if !buffer.is_empty() {
        return Err(Error::IncompleteClause);
    }
    let Some((n_vars, n_clauses)) = preamble else {
        return Err(Error::MissingPLine);
    };
    if clauses.len() != n_clauses {
        return Err(Error::ClauseCount {
            expected: n_clauses,
            found: clauses.len(),
        });
    }
    Ok((n_vars, clauses))
}

/// Parses a p line `p cnf <n> <m>`
fn parse_p_line(input: &str, line_num: usize) -> IResult<&str, (u32, usize), Error> {
    let (input, (_, _, _, _, n_vars, _, n_clauses)) =
        all_consuming(tuple::<_, _, NomError<_>, _>((
            tag("p"),
            multispace1,
            tag("cnf"),
            multispace1,
            u64,
            multispace1,
            terminated(u64, multispace0),
        )))(input)
        .map_err(|e| e.map(|_| Error::PLine(line_num)))?;
    let n_vars = match u32::try_from(n_vars) {
        Ok(v) if v <= Var::MAX_ID => v,
        _ => return Err(nom::Err::Error(Error::PValTooLarge(n_vars))),
    };
    let n_clauses = match usize::try_from(n_clauses) {
        Ok(v) => v,
        Err(_) => return Err(nom::Err::Error(Error::PValTooLarge(n_clauses))),
    };
    Ok((input, (n_vars, n_clauses)))
}

/// Parses a line of whitespace separated integers
fn parse_values(input: &str, line_num: usize) -> IResult<&str, Vec<i32>, Error> {
    all_consuming(delimited(
        multispace0,
        separated_list0(multispace1, i32),
        multispace0,
    ))(input)
    .map_err(|e| {
        e.map(|e: NomError<&str>| Error::Lit(line_num, format!("cannot parse '{}'", e.input)))
    })
}

/// Writes a CNF formula to a DIMACS file. With `header`, the fields are
/// written as `c <field>: <value>` comments, with `varnames` every label as
/// a `c varname <id> <label>` comment.
pub fn write_cnf<W: Write>(
    writer: &mut W,
    header: Option<&[(String, String)]>,
    varnames: Option<&[String]>,
    n_vars: u32,
    clauses: &[Clause],
) -> Result<(), io::Error> {
    if let Some(header) = header {
        header.iter().try_for_each(|(field, value)| {
            writeln!(writer, "c {}: {}", ascii_text(field), ascii_text(value))
        })?;
        writeln!(writer, "c")?;
    }
    if let Some(varnames) = varnames {
        varnames
            .iter()
            .enumerate()
            .try_for_each(|(idx, label)| writeln!(writer, "c varname {} {label}", idx + 1))?;
        writeln!(writer, "c")?;
    }
    writeln!(writer, "p cnf {n_vars} {}", clauses.len())?;
    clauses.iter().try_for_each(|cl| write_clause(writer, cl))
}

fn write_clause<W: Write>(writer: &mut W, clause: &Clause) -> Result<(), io::Error> {
    clause
        .iter()
        .try_for_each(|l| write!(writer, "{} ", l.to_dimacs()))?;
    writeln!(writer, "0")
}
