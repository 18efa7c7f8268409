//! NMEA Geotag Library
//!
//! Geotags still frames sampled from a video with the positional fixes of a
//! companion NMEA log. Frame `i` gets the coordinates of fix `i`; a selection
//! mask can drop individual fixes while keeping every later frame aligned.
//!
//! # Features
//!
//! - **`csv`** (default): Enable the per-frame CSV manifest
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable the JSON run report
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nmea_geotag::{
//!     run_pipeline, CancelToken, ExifCodec, FfmpegDecoder, PipelineInputs, ProcessOptions,
//!     RunPaths,
//! };
//! use std::path::PathBuf;
//!
//! let inputs = PipelineInputs {
//!     video: PathBuf::from("ride.mp4"),
//!     nmea: PathBuf::from("ride.nmea"),
//!     mask: Some(PathBuf::from("ride.mask")),
//! };
//! let paths = RunPaths::new("frames", "geotagged");
//! let report = run_pipeline(
//!     &inputs,
//!     &paths,
//!     &ProcessOptions::default(),
//!     &FfmpegDecoder::new(),
//!     &ExifCodec::new(),
//!     &CancelToken::new(),
//! )
//! .unwrap();
//! println!("Geotagged {} of {} frames", report.summary.geotagged, report.summary.frames_total);
//! ```
//!
//! # Public API
//!
//! ## Parsing Functions
//! - [`scan_fix_log`] / [`scan_fix_lines`] - Collect fix sentences from a start line
//! - [`read_selection_mask`] / [`parse_selection_mask`] - Read a keep/drop mask
//!
//! ## Alignment and Conversion
//! - [`validate_mask_length`] - Check the mask against the fix count
//! - [`align_fixes`] - One slot per fix, present or skipped
//! - [`encode_dms`] - `dddmm.mmmm` to degrees/minutes/seconds
//! - [`extract_geotag`] - Build a [`GeoTag`] from a fix sentence
//!
//! ## Merging and Orchestration
//! - [`plan_frames`] / [`merge_frames`] - Per-frame geotag or pass-through
//! - [`run_pipeline`] - Validate, extract, align, merge and report in one call
//! - [`MetadataCodec`] / [`VideoDecoder`] - Seams for the image and video backends

// Module declarations
pub mod align;
pub mod codec;
pub mod conversion;
pub mod error;
pub mod export;
pub mod input;
pub mod merge;
pub mod parser;
pub mod pipeline;
pub mod types;
pub mod video;

// Re-export everything from modules for convenience
pub use align::*;
pub use codec::*;
pub use conversion::*;
pub use error::*;
#[allow(unused_imports)]
pub use export::*;
pub use input::*;
pub use merge::*;
pub use parser::*;
pub use pipeline::*;
pub use types::*;
pub use video::*;
