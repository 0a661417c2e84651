//! # Writing OPB Files
//!
//! Internal module containing functions for writing linear OPB files. Every
//! constraint is written in normalized form, as a sum of `+<coeff> x<id>`
//! or `+<coeff> ~x<id>` terms followed by `>=` or `=`, the bound and `;`.
//!
//! ## References
//!
//! - [OPB](https://www.cril.univ-artois.fr/PB12/format.pdf)

use std::{
    borrow::Borrow,
    io::{self, Write},
};

use crate::types::{constraints::PbRel, PbConstraint};

use super::ascii_text;

/// Writes constraints to an OPB file. With `header`, the fields are written
/// as `* <field>: <value>` comments, with `varnames` every label as a
/// `* varname <id> <label>` comment.
pub fn write_opb<W, PI>(
    writer: &mut W,
    header: Option<&[(String, String)]>,
    varnames: Option<&[String]>,
    n_vars: u32,
    constraints: PI,
) -> Result<(), io::Error>
where
    W: Write,
    PI: ExactSizeIterator,
    PI::Item: Borrow<PbConstraint>,
{
    writeln!(
        writer,
        "* #variable= {n_vars} #constraint= {}",
        constraints.len()
    )?;
    if let Some(header) = header {
        header.iter().try_for_each(|(field, value)| {
            writeln!(writer, "* {}: {}", ascii_text(field), ascii_text(value))
        })?;
        writeln!(writer, "*")?;
    }
    if let Some(varnames) = varnames {
        varnames
            .iter()
            .enumerate()
            .try_for_each(|(idx, label)| writeln!(writer, "* varname {} {label}", idx + 1))?;
        writeln!(writer, "*")?;
    }
    for constr in constraints {
        write_constraint(writer, constr.borrow())?;
    }
    Ok(())
}

fn write_constraint<W: Write>(writer: &mut W, constr: &PbConstraint) -> Result<(), io::Error> {
    constr
        .iter()
        .try_for_each(|(l, w)| write!(writer, "+{w} {l} "))?;
    let op = match constr.rel() {
        PbRel::Ge => ">=",
        PbRel::Eq => "=",
    };
    writeln!(writer, "{op} {};", constr.bound())
}
