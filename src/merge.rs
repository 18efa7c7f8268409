//! Per-frame metadata merging
//!
//! Frame `i` is paired with aligned slot `i` purely by position; both streams
//! are assumed to advance one sample per second, and no timestamps are compared.
//! Planning is pure. Execution writes exactly one file per frame into the
//! destination directory and never touches the source frame.

use crate::codec::MetadataCodec;
use crate::conversion::extract_geotag;
use crate::error::GeotagError;
use crate::types::{AlignedSlot, FixRecord, FrameAction, FrameOutcome, FrameRef};
use crate::Result;
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared flag that stops further frame writes once set
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What to do with one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameDecision<'a> {
    /// Merge the positional metadata of this fix
    Geotag(&'a FixRecord),
    /// Slot skipped by the mask: copy unmodified
    PassThrough,
    /// No slot for this ordinal: copy unmodified
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePlan<'a> {
    pub frame: &'a FrameRef,
    pub decision: FrameDecision<'a>,
}

/// Decide, for every frame, whether it gets geodata or passes through
pub fn plan_frames<'a>(frames: &'a [FrameRef], slots: &'a [AlignedSlot]) -> Vec<FramePlan<'a>> {
    frames
        .iter()
        .map(|frame| {
            let decision = match slots.get(frame.ordinal) {
                Some(AlignedSlot::Present(fix)) => FrameDecision::Geotag(fix),
                Some(AlignedSlot::Skipped) => FrameDecision::PassThrough,
                None => FrameDecision::Overflow,
            };
            FramePlan { frame, decision }
        })
        .collect()
}

fn process_frame(
    plan: &FramePlan<'_>,
    codec: &dyn MetadataCodec,
    destination_dir: &Path,
    cancel: &CancelToken,
) -> Result<FrameOutcome> {
    if cancel.is_cancelled() {
        return Err(GeotagError::Cancelled);
    }

    let frame = plan.frame;
    let destination = frame.destination_in(destination_dir);

    let action = match plan.decision {
        FrameDecision::Geotag(fix) => {
            let merged = extract_geotag(fix)
                .and_then(|tag| codec.merge_geotag(&frame.path, &destination, &tag).map(|()| tag));
            match merged {
                Ok(tag) => {
                    debug!("{} <- fix {} ({})", frame.file_name(), fix.ordinal, tag);
                    FrameAction::Geotagged {
                        fix_ordinal: fix.ordinal,
                        tag,
                    }
                }
                Err(e @ (GeotagError::Codec { .. } | GeotagError::FieldParse { .. })) => {
                    warn!("Copying {} unmodified: {}", frame.file_name(), e);
                    codec.copy_raw(&frame.path, &destination)?;
                    FrameAction::Failed {
                        fix_ordinal: fix.ordinal,
                        message: e.to_string(),
                    }
                }
                Err(e) => return Err(e),
            }
        }
        FrameDecision::PassThrough => {
            codec.copy_raw(&frame.path, &destination)?;
            FrameAction::Skipped
        }
        FrameDecision::Overflow => {
            codec.copy_raw(&frame.path, &destination)?;
            FrameAction::Overflow
        }
    };

    Ok(FrameOutcome {
        frame: frame.clone(),
        action,
    })
}

/// Execute frame plans, writing one output file per frame.
///
/// Frames are independent, so `parallel` only changes scheduling, never the
/// files written. Outcomes come back in plan order. Per-frame codec failures are
/// folded into the outcomes; I/O errors and cancellation stop the run, leaving
/// already-written files in place.
pub fn merge_frames(
    plans: &[FramePlan<'_>],
    codec: &dyn MetadataCodec,
    destination_dir: &Path,
    cancel: &CancelToken,
    parallel: bool,
) -> Result<Vec<FrameOutcome>> {
    let work = |plan: &FramePlan<'_>| process_frame(plan, codec, destination_dir, cancel);

    if parallel {
        plans.par_iter().map(work).collect()
    } else {
        plans.iter().map(work).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(count: usize) -> Vec<FrameRef> {
        (0..count)
            .map(|i| FrameRef::new(i, format!("/frames/{:05}.jpg", i)))
            .collect()
    }

    #[test]
    fn test_plan_follows_slots() {
        let fix_a = FixRecord::new(0, 0, "A");
        let fix_c = FixRecord::new(2, 2, "C");
        let slots = vec![
            AlignedSlot::Present(fix_a.clone()),
            AlignedSlot::Skipped,
            AlignedSlot::Present(fix_c.clone()),
        ];
        let frames = frames(3);
        let plans = plan_frames(&frames, &slots);

        assert_eq!(plans[0].decision, FrameDecision::Geotag(&fix_a));
        assert_eq!(plans[1].decision, FrameDecision::PassThrough);
        assert_eq!(plans[2].decision, FrameDecision::Geotag(&fix_c));
    }

    #[test]
    fn test_extra_frames_overflow() {
        let slots = vec![AlignedSlot::Skipped, AlignedSlot::Skipped];
        let frames = frames(3);
        let plans = plan_frames(&frames, &slots);
        assert_eq!(plans[2].decision, FrameDecision::Overflow);
        assert_eq!(plans[2].frame.file_name(), "00002.jpg");
    }

    #[test]
    fn test_no_fixes_everything_overflows() {
        let frames = frames(4);
        let plans = plan_frames(&frames, &[]);
        assert!(plans.iter().all(|p| p.decision == FrameDecision::Overflow));
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
