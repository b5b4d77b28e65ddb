//! Proxies to FS utils that _either_ actually write to files or print to stdout (for dry runs).

use std::{
    io,
    path::{Path, PathBuf},
};

use log::trace;
use miette::Diagnostic;
use thiserror::Error;

use crate::dry_run::DryRun;

/// Writes `contents` to `path` if this is not a dry run, or dumps them to the dry-run sink if it is.
pub(crate) fn write(dry_run: DryRun, path: &Path, contents: &str) -> Result<(), Error> {
    if let Some(stdout) = dry_run {
        return writeln!(stdout, "{contents}").map_err(Error::Stdout);
    }
    trace!("Writing {} bytes to {}", contents.len(), path.display());
    std::fs::write(path, contents).map_err(|source| Error::Write {
        path: path.into(),
        source,
    })
}

pub(crate) fn read_to_string<P: AsRef<Path> + Into<PathBuf>>(path: P) -> Result<String, Error> {
    std::fs::read_to_string(path.as_ref()).map_err(|source| Error::Read {
        path: path.into(),
        source,
    })
}

#[derive(Debug, Diagnostic, Error)]
pub(crate) enum Error {
    #[error("Error writing to {path}: {source}")]
    #[diagnostic(
        code(fs::write),
        help("Make sure you have permission to write to this file.")
    )]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error reading from {path}: {source}")]
    #[diagnostic(
        code(fs::read),
        help("Make sure the file exists and you have permission to read it.")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error writing to stdout: {0}")]
    #[diagnostic(code(fs::stdout))]
    Stdout(#[source] io::Error),
}
