//! Run orchestration
//!
//! A run moves through `Validating -> Aligning -> Merging -> Reporting` and ends
//! `Completed`, or `Aborted` when validation fails. Every input check happens
//! before the first directory is created, so an aborted run leaves nothing
//! behind.

use crate::align::{align_fixes, validate_mask_length, MaskLengthPolicy};
use crate::codec::MetadataCodec;
use crate::error::GeotagError;
use crate::input::check_input_path;
use crate::merge::{merge_frames, plan_frames, CancelToken};
use crate::parser::{read_selection_mask, scan_fix_log, SelectionMask};
use crate::types::{AlignedSlot, FixRecord, FrameOutcome, FrameRef, RunState, RunSummary};
use crate::video::VideoDecoder;
use crate::Result;
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Prefix of the intermediate frame directory
pub const FRAMES_DIR_PREFIX: &str = "GeoTagTEMP";
/// Prefix of the final output directory
pub const OUTPUT_DIR_PREFIX: &str = "GeoTag";

/// Options for a single run
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// First video frame to sample (0 = from the start)
    pub video_start_frame: u64,
    /// First log line to scan for fixes (0 = from the start)
    pub log_start_line: usize,
    pub mask_policy: MaskLengthPolicy,
    /// Remove the intermediate frame directory after a completed run
    pub clean_up: bool,
    pub frame_extension: String,
    pub manifest_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub parallel: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            video_start_frame: 0,
            log_start_line: 0,
            mask_policy: MaskLengthPolicy::default(),
            clean_up: true,
            frame_extension: "jpg".to_string(),
            manifest_path: None,
            report_path: None,
            parallel: true,
        }
    }
}

/// Input files of a run
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub video: PathBuf,
    pub nmea: PathBuf,
    pub mask: Option<PathBuf>,
}

/// Intermediate and final directories of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub frames_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl RunPaths {
    pub fn new(frames_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            frames_dir: frames_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// `GeoTagTEMP<ddmmYYYYHHMM>` and `GeoTag<ddmmYYYYHHMM>` under `base`
    pub fn timestamped(base: &Path, now: NaiveDateTime) -> Self {
        let stamp = now.format("%d%m%Y%H%M").to_string();
        Self {
            frames_dir: base.join(format!("{}{}", FRAMES_DIR_PREFIX, stamp)),
            output_dir: base.join(format!("{}{}", OUTPUT_DIR_PREFIX, stamp)),
        }
    }
}

/// Everything validation produced, ready for alignment
#[derive(Debug, Clone)]
pub struct ValidatedInputs {
    pub fixes: Vec<FixRecord>,
    pub mask: Option<SelectionMask>,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Always `Completed`; a run that ends `Aborted` returns its error instead
    pub state: RunState,
    pub summary: RunSummary,
    pub outcomes: Vec<FrameOutcome>,
    pub paths: RunPaths,
}

fn enter(state: &mut RunState, next: RunState) {
    debug!("Run state: {} -> {}", state, next);
    *state = next;
}

/// Check every input and the mask/fix-count relation without writing anything
pub fn validate_inputs(inputs: &PipelineInputs, options: &ProcessOptions) -> Result<ValidatedInputs> {
    check_input_path(&inputs.video)?;
    check_input_path(&inputs.nmea)?;

    let fixes = scan_fix_log(&inputs.nmea, options.log_start_line)?;

    let mask = match &inputs.mask {
        Some(mask_path) => {
            check_input_path(mask_path)?;
            let mask = read_selection_mask(mask_path)?;
            validate_mask_length(mask.len(), fixes.len(), options.mask_policy)?;
            debug!(
                "Mask {} selects {} of {} fixes",
                mask_path.display(),
                mask.selected_count(),
                fixes.len()
            );
            Some(mask)
        }
        None => None,
    };

    Ok(ValidatedInputs { fixes, mask })
}

/// Sampled frames in `dir`, sorted, with ordinals assigned in that order.
///
/// Only files named `<digits>.<extension>` count as frames.
pub fn list_frames(dir: &Path, extension: &str) -> Result<Vec<FrameRef>> {
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        extension
    );
    let paths = glob::glob(&pattern)
        .map_err(|e| GeotagError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;

    let mut frames = Vec::new();
    for entry in paths {
        let path = entry.map_err(glob::GlobError::into_error)?;
        let numbered = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|stem| !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(false);
        if numbered && path.is_file() {
            frames.push(path);
        }
    }
    frames.sort();

    Ok(frames
        .into_iter()
        .enumerate()
        .map(|(ordinal, path)| FrameRef::new(ordinal, path))
        .collect())
}

/// Merge stage over an already-extracted frame directory
pub fn geotag_frames(
    frames_dir: &Path,
    output_dir: &Path,
    slots: &[AlignedSlot],
    codec: &dyn MetadataCodec,
    options: &ProcessOptions,
    cancel: &CancelToken,
) -> Result<(Vec<FrameOutcome>, RunSummary)> {
    fs::create_dir_all(output_dir)?;

    let frames = list_frames(frames_dir, &options.frame_extension)?;
    let plans = plan_frames(&frames, slots);
    info!(
        "Merging {} frames against {} aligned slots",
        frames.len(),
        slots.len()
    );

    let outcomes = merge_frames(&plans, codec, output_dir, cancel, options.parallel)?;
    let summary = RunSummary::from_outcomes(&outcomes);
    Ok((outcomes, summary))
}

#[allow(unused_variables)]
fn export_run(outcomes: &[FrameOutcome], summary: &RunSummary, options: &ProcessOptions) -> Result<()> {
    if let Some(path) = &options.manifest_path {
        #[cfg(feature = "csv")]
        crate::export::export_manifest_csv(outcomes, path)?;
        #[cfg(not(feature = "csv"))]
        warn!(
            "Manifest {} requested but CSV support is not compiled in",
            path.display()
        );
    }

    if let Some(path) = &options.report_path {
        #[cfg(feature = "json")]
        crate::export::export_report_json(summary, path)?;
        #[cfg(not(feature = "json"))]
        warn!(
            "Report {} requested but JSON support is not compiled in",
            path.display()
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_stages(
    validated: ValidatedInputs,
    inputs: &PipelineInputs,
    paths: &RunPaths,
    options: &ProcessOptions,
    decoder: &dyn VideoDecoder,
    codec: &dyn MetadataCodec,
    cancel: &CancelToken,
    state: &mut RunState,
) -> Result<(Vec<FrameOutcome>, RunSummary)> {
    info!(
        "Found {} fix records in {}",
        validated.fixes.len(),
        inputs.nmea.display()
    );

    fs::create_dir_all(&paths.frames_dir)?;
    let extracted = decoder.extract_frames(&inputs.video, options.video_start_frame, &paths.frames_dir)?;
    info!(
        "Extracted {} frames into {}",
        extracted,
        paths.frames_dir.display()
    );

    enter(state, RunState::Aligning);
    let slots = align_fixes(validated.fixes, validated.mask.as_ref());

    enter(state, RunState::Merging);
    let (outcomes, summary) = geotag_frames(
        &paths.frames_dir,
        &paths.output_dir,
        &slots,
        codec,
        options,
        cancel,
    )?;

    enter(state, RunState::Reporting);
    if let Some(first) = &summary.first_overflow {
        warn!("No metadata written from image {} onward", first);
    }
    for failure in &summary.codec_failures {
        warn!("Frame {} copied without metadata: {}", failure.file, failure.message);
    }
    export_run(&outcomes, &summary, options)?;

    if options.clean_up {
        fs::remove_dir_all(&paths.frames_dir)?;
        debug!("Removed {}", paths.frames_dir.display());
    }

    Ok((outcomes, summary))
}

/// Run the whole pipeline: validate, extract, align, merge, report.
///
/// Validation failures abort before any directory is created. Per-frame codec
/// failures do not abort; they are listed in the summary. Any other failure
/// moves the run to `Aborted` and is returned as the error; files written up to
/// that point are left in place.
pub fn run_pipeline(
    inputs: &PipelineInputs,
    paths: &RunPaths,
    options: &ProcessOptions,
    decoder: &dyn VideoDecoder,
    codec: &dyn MetadataCodec,
    cancel: &CancelToken,
) -> Result<RunReport> {
    let mut state = RunState::Validating;

    let result = validate_inputs(inputs, options).and_then(|validated| {
        run_stages(
            validated, inputs, paths, options, decoder, codec, cancel, &mut state,
        )
    });

    match result {
        Ok((outcomes, summary)) => {
            enter(&mut state, RunState::Completed);
            Ok(RunReport {
                state,
                summary,
                outcomes,
                paths: paths.clone(),
            })
        }
        Err(e) => {
            warn!("Run aborted while {}: {}", state, e);
            enter(&mut state, RunState::Aborted);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_timestamped_paths() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 0))
            .expect("valid date");
        let paths = RunPaths::timestamped(Path::new("/data"), now);
        assert_eq!(paths.frames_dir, PathBuf::from("/data/GeoTagTEMP070320240905"));
        assert_eq!(paths.output_dir, PathBuf::from("/data/GeoTag070320240905"));
    }

    #[test]
    fn test_list_frames_sorted_and_filtered() {
        let dir = TempDir::new().expect("temp dir");
        for name in ["00002.jpg", "00000.jpg", "00001.jpg", "notes.jpg", "00003.png"] {
            fs::write(dir.path().join(name), b"x").expect("write");
        }

        let frames = list_frames(dir.path(), "jpg").expect("list");
        let names: Vec<&str> = frames.iter().map(FrameRef::file_name).collect();
        assert_eq!(names, vec!["00000.jpg", "00001.jpg", "00002.jpg"]);
        assert_eq!(frames[2].ordinal, 2);
    }

    #[test]
    fn test_list_frames_empty_dir() {
        let dir = TempDir::new().expect("temp dir");
        assert!(list_frames(dir.path(), "jpg").expect("list").is_empty());
    }

    #[test]
    fn test_validate_missing_log() {
        let dir = TempDir::new().expect("temp dir");
        let video = dir.path().join("clip.mp4");
        fs::write(&video, b"video").expect("write");

        let inputs = PipelineInputs {
            video,
            nmea: dir.path().join("missing.nmea"),
            mask: None,
        };
        let result = validate_inputs(&inputs, &ProcessOptions::default());
        assert!(matches!(result, Err(GeotagError::InputNotFound(_))));
    }

    #[test]
    fn test_validate_uses_start_line_for_count() {
        let dir = TempDir::new().expect("temp dir");
        let video = dir.path().join("clip.mp4");
        let nmea = dir.path().join("track.nmea");
        let mask = dir.path().join("mask.txt");
        fs::write(&video, b"video").expect("write");
        fs::write(&nmea, "$GPGGA,1\n$GPGGA,2\n$GPGGA,3\n").expect("write");
        fs::write(&mask, "10\n").expect("write");

        let inputs = PipelineInputs {
            video,
            nmea,
            mask: Some(mask),
        };
        let options = ProcessOptions {
            log_start_line: 1,
            ..ProcessOptions::default()
        };
        let validated = validate_inputs(&inputs, &options).expect("valid");
        assert_eq!(validated.fixes.len(), 2);
        assert_eq!(validated.mask.map(|m| m.len()), Some(2));
    }
}
