//! Input file checks
//!
//! Existence and readability are checked separately so the user sees which of
//! the two went wrong for a given path.

use crate::error::{GeotagError, Result};
use std::fs::File;
use std::path::Path;

/// Fail with `InputNotFound` if `path` does not exist
pub fn check_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(GeotagError::InputNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Fail with `InputNotReadable` if `path` cannot be opened for reading
pub fn check_readable(path: &Path) -> Result<()> {
    open_input(path).map(|_| ())
}

/// Check existence, then readability
pub fn check_input_path(path: &Path) -> Result<()> {
    check_exists(path)?;
    check_readable(path)
}

/// Open an input file, mapping failures onto the input error variants
pub fn open_input(path: &Path) -> Result<File> {
    match File::open(path) {
        Ok(file) => Ok(file),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Err(GeotagError::InputNotFound(path.to_path_buf()))
        }
        Err(err) => Err(GeotagError::InputNotReadable {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}
