//! # Module for File IO (Writing and Parsing)
//!
//! It is recommended to write and parse through the interface of
//! [`crate::instances::Formula`] rather than using these functions directly.

use std::{fs::File, io, path::Path};

pub mod dimacs;

pub mod opb;

/// Options for writing formulas
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct WriteOptions {
    /// Whether to write the header fields of the formula as comments
    pub export_header: bool,
    /// Whether to write the label of every variable as a comment
    pub export_varnames: bool,
}

/// Replaces characters that are not printable ASCII with `?`
pub(crate) fn ascii_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

/// Opens a reader for the file at Path.
/// With feature `compression` supports bzip2, gzip and xz compression.
pub(crate) fn open_compressed_uncompressed_read<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn io::Read>, io::Error> {
    let path = path.as_ref();
    let raw_reader = File::open(path)?;
    #[cfg(feature = "compression")]
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("bz2")) {
            return Ok(Box::new(bzip2::read::BzDecoder::new(raw_reader)));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("gz")) {
            return Ok(Box::new(flate2::read::GzDecoder::new(raw_reader)));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("xz")) {
            return Ok(Box::new(xz2::read::XzDecoder::new(raw_reader)));
        }
    }
    Ok(Box::new(raw_reader))
}

/// Opens a buffered writer for the file at Path.
/// With feature `compression` supports bzip2, gzip and xz compression.
pub(crate) fn open_compressed_uncompressed_write<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn io::Write>, io::Error> {
    let path = path.as_ref();
    let raw_writer = io::BufWriter::new(File::create(path)?);
    #[cfg(feature = "compression")]
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("bz2")) {
            return Ok(Box::new(bzip2::write::BzEncoder::new(
                raw_writer,
                bzip2::Compression::fast(),
            )));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("gz")) {
            return Ok(Box::new(flate2::write::GzEncoder::new(
                raw_writer,
                flate2::Compression::fast(),
            )));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("xz")) {
            return Ok(Box::new(xz2::write::XzEncoder::new(raw_writer, 1)));
        }
    }
    Ok(Box::new(raw_writer))
}
