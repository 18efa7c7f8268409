use crate::types::GeoTag;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A sampled frame on disk, identified by its position in sorted frame order
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameRef {
    pub ordinal: usize,
    pub path: PathBuf,
}

impl FrameRef {
    pub fn new(ordinal: usize, path: impl Into<PathBuf>) -> Self {
        Self {
            ordinal,
            path: path.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
    }

    /// Path of this frame inside `dir`, keeping the same filename
    pub fn destination_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

/// What happened to one frame during merging
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameAction {
    /// Positional metadata merged from the fix at `fix_ordinal`
    Geotagged { fix_ordinal: usize, tag: GeoTag },
    /// The aligned slot was skipped; frame copied unmodified
    Skipped,
    /// No aligned slot exists for this ordinal; frame copied unmodified
    Overflow,
    /// Merging failed; frame copied unmodified
    Failed { fix_ordinal: usize, message: String },
}

impl FrameAction {
    pub fn label(&self) -> &'static str {
        match self {
            FrameAction::Geotagged { .. } => "geotagged",
            FrameAction::Skipped => "skipped",
            FrameAction::Overflow => "overflow",
            FrameAction::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameOutcome {
    pub frame: FrameRef,
    pub action: FrameAction,
}
