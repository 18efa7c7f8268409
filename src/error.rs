use std::fmt;
use std::path::PathBuf;

use crate::align::MaskLengthPolicy;

/// Errors raised while geotagging a run of frames
#[derive(Debug)]
pub enum GeotagError {
    /// An input file does not exist
    InputNotFound(PathBuf),
    /// An input file exists but cannot be opened for reading
    InputNotReadable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The mask file contains something other than '0' / '1'
    MaskParse { position: usize, found: char },
    /// Mask length does not satisfy the configured policy against the fix count
    LengthMismatch {
        mask_len: usize,
        fix_count: usize,
        policy: MaskLengthPolicy,
    },
    /// A single frame could not be decoded or re-encoded
    Codec { file: String, message: String },
    /// A fix line is missing a coordinate field or holds a non-numeric value
    FieldParse { line: String, field: usize },
    /// Frame extraction from the video failed
    Video(String),
    /// I/O errors
    Io(std::io::Error),
    /// Manifest or report export failed
    Export(String),
    /// The run was cancelled before all frames were written
    Cancelled,
}

impl fmt::Display for GeotagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeotagError::InputNotFound(path) => {
                write!(f, "File in '{}' does not exist", path.display())
            }
            GeotagError::InputNotReadable { path, source } => {
                write!(f, "Cannot read the file '{}': {}", path.display(), source)
            }
            GeotagError::MaskParse { position, found } => write!(
                f,
                "Invalid character {:?} at position {} in selection mask (expected '0' or '1')",
                found, position
            ),
            GeotagError::LengthMismatch {
                mask_len,
                fix_count,
                policy,
            } => {
                let relation = if mask_len < fix_count {
                    "shorter than"
                } else {
                    "longer than"
                };
                write!(
                    f,
                    "Selection mask ({}) is {} the number of fix records ({}) [policy: {}]",
                    mask_len, relation, fix_count, policy
                )
            }
            GeotagError::Codec { file, message } => write!(f, "Codec error in {}: {}", file, message),
            GeotagError::FieldParse { line, field } => {
                write!(f, "Cannot read field {} of fix record '{}'", field, line)
            }
            GeotagError::Video(msg) => write!(f, "Video error: {}", msg),
            GeotagError::Io(err) => write!(f, "I/O error: {}", err),
            GeotagError::Export(msg) => write!(f, "Export error: {}", msg),
            GeotagError::Cancelled => write!(f, "Run cancelled"),
        }
    }
}

impl std::error::Error for GeotagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeotagError::Io(err) => Some(err),
            GeotagError::InputNotReadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GeotagError {
    fn from(err: std::io::Error) -> Self {
        GeotagError::Io(err)
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for GeotagError {
    fn from(err: csv::Error) -> Self {
        GeotagError::Export(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for GeotagError {
    fn from(err: serde_json::Error) -> Self {
        GeotagError::Export(err.to_string())
    }
}

impl GeotagError {
    /// True for errors that must abort a run before any frame is touched
    pub fn is_fatal_input(&self) -> bool {
        matches!(
            self,
            GeotagError::InputNotFound(_)
                | GeotagError::InputNotReadable { .. }
                | GeotagError::MaskParse { .. }
                | GeotagError::LengthMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GeotagError>;
