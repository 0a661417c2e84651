//! # Library-Internal Utilities

use std::fmt::{self, Write};

use crate::Error;

/// A piece of a parsed label format
#[derive(Clone, Debug, PartialEq, Eq)]
enum Piece {
    Text(String),
    Arg(usize),
}

/// A label format string with `{}` placeholders, parsed once.
///
/// Placeholders are `{}` (next argument) or `{N}` (argument `N`), `{{` and
/// `}}` are escaped braces. Anything after a `:` inside a placeholder is
/// ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LabelFormat {
    pieces: Vec<Piece>,
}

impl LabelFormat {
    /// Parses a format that will be rendered with `n_args` arguments.
    /// Returns [`Error::InvalidArgument`] if the format is malformed or
    /// refers to more arguments than available.
    pub fn parse(fmt: &str, n_args: usize) -> Result<Self, Error> {
        let mut pieces = vec![];
        let mut text = String::new();
        let mut next_arg = 0;
        let mut chars = fmt.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '{' => {
                    let mut placeholder = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => placeholder.push(c),
                            None => {
                                return Err(Error::InvalidArgument(format!(
                                    "unterminated placeholder in label '{fmt}'"
                                )))
                            }
                        }
                    }
                    let idx = match placeholder.split(':').next().unwrap_or("") {
                        "" => {
                            next_arg += 1;
                            next_arg - 1
                        }
                        pos => pos.parse::<usize>().map_err(|_| {
                            Error::InvalidArgument(format!(
                                "invalid placeholder '{{{placeholder}}}' in label '{fmt}'"
                            ))
                        })?,
                    };
                    if idx >= n_args {
                        return Err(Error::InvalidArgument(format!(
                            "label '{fmt}' needs more than {n_args} arguments"
                        )));
                    }
                    if !text.is_empty() {
                        pieces.push(Piece::Text(std::mem::take(&mut text)));
                    }
                    pieces.push(Piece::Arg(idx));
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                c => text.push(c),
            }
        }
        if !text.is_empty() {
            pieces.push(Piece::Text(text));
        }
        Ok(Self { pieces })
    }

    /// The default label `x<id>` of variables outside of any group
    pub fn variable() -> Self {
        Self {
            pieces: vec![Piece::Text(String::from("x")), Piece::Arg(0)],
        }
    }

    /// Renders the format with the given arguments. Placeholders without a
    /// matching argument render as nothing.
    pub fn render<T: fmt::Display>(&self, args: &[T]) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Arg(idx) => {
                    if let Some(arg) = args.get(*idx) {
                        // writing to a string never fails
                        let _ = write!(out, "{arg}");
                    }
                }
            }
        }
        out
    }
}

/// Builds the default label format `name(` `{}` `,...)` with `n` placeholders
pub(crate) fn default_format(name: &str, n: usize) -> String {
    format!("{name}({})", vec!["{}"; n].join(","))
}

/// Number of bits needed to write the numbers `0..m`, i.e. `ceil(log2(m))`
pub(crate) fn bits_for(m: usize) -> u32 {
    if m <= 1 {
        return 0;
    }
    usize::BITS - (m - 1).leading_zeros()
}
