use crate::types::{FrameAction, FrameOutcome};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stage of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunState {
    Validating,
    Aligning,
    Merging,
    Reporting,
    Completed,
    Aborted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Validating => "validating",
            RunState::Aligning => "aligning",
            RunState::Merging => "merging",
            RunState::Reporting => "reporting",
            RunState::Completed => "completed",
            RunState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// A frame whose metadata could not be merged
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodecFailure {
    pub file: String,
    pub message: String,
}

/// End-of-run counts and notices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunSummary {
    pub frames_total: usize,
    pub geotagged: usize,
    pub skipped: usize,
    pub overflow: usize,
    /// Filename of the lowest-ordinal overflow frame
    pub first_overflow: Option<String>,
    pub codec_failures: Vec<CodecFailure>,
}

impl RunSummary {
    /// Fold per-frame outcomes into a summary.
    ///
    /// Outcomes may arrive in any order; the overflow notice always names the
    /// overflow frame with the smallest ordinal and failures are listed by ordinal.
    pub fn from_outcomes(outcomes: &[FrameOutcome]) -> Self {
        let (mut summary, first_overflow, mut failures) = outcomes.iter().fold(
            (RunSummary::default(), None::<&FrameOutcome>, Vec::new()),
            |(mut summary, first, mut failures), outcome| {
                summary.frames_total += 1;
                let first = match &outcome.action {
                    FrameAction::Geotagged { .. } => {
                        summary.geotagged += 1;
                        first
                    }
                    FrameAction::Skipped => {
                        summary.skipped += 1;
                        first
                    }
                    FrameAction::Overflow => {
                        summary.overflow += 1;
                        match first {
                            Some(current) if current.frame.ordinal <= outcome.frame.ordinal => {
                                Some(current)
                            }
                            _ => Some(outcome),
                        }
                    }
                    FrameAction::Failed { message, .. } => {
                        failures.push((outcome.frame.ordinal, outcome.frame.file_name(), message));
                        first
                    }
                };
                (summary, first, failures)
            },
        );

        failures.sort_by_key(|(ordinal, _, _)| *ordinal);
        summary.first_overflow = first_overflow.map(|o| o.frame.file_name().to_string());
        summary.codec_failures = failures
            .into_iter()
            .map(|(_, file, message)| CodecFailure {
                file: file.to_string(),
                message: message.clone(),
            })
            .collect();
        summary
    }

    pub fn has_failures(&self) -> bool {
        !self.codec_failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameRef;

    fn outcome(ordinal: usize, action: FrameAction) -> FrameOutcome {
        FrameOutcome {
            frame: FrameRef::new(ordinal, format!("/frames/{:05}.jpg", ordinal)),
            action,
        }
    }

    #[test]
    fn test_first_overflow_is_minimum_ordinal() {
        // completion order deliberately scrambled
        let outcomes = vec![
            outcome(4, FrameAction::Overflow),
            outcome(0, FrameAction::Skipped),
            outcome(2, FrameAction::Overflow),
            outcome(3, FrameAction::Overflow),
            outcome(1, FrameAction::Skipped),
        ];
        let summary = RunSummary::from_outcomes(&outcomes);
        assert_eq!(summary.frames_total, 5);
        assert_eq!(summary.overflow, 3);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.first_overflow.as_deref(), Some("00002.jpg"));
    }

    #[test]
    fn test_failures_sorted_by_ordinal() {
        let outcomes = vec![
            outcome(
                3,
                FrameAction::Failed {
                    fix_ordinal: 3,
                    message: "bad jpeg".to_string(),
                },
            ),
            outcome(
                1,
                FrameAction::Failed {
                    fix_ordinal: 1,
                    message: "truncated".to_string(),
                },
            ),
        ];
        let summary = RunSummary::from_outcomes(&outcomes);
        assert!(summary.has_failures());
        assert_eq!(summary.codec_failures[0].file, "00001.jpg");
        assert_eq!(summary.codec_failures[1].file, "00003.jpg");
        assert_eq!(summary.first_overflow, None);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(RunState::Aborted.to_string(), "aborted");
        assert_eq!(RunState::Validating.to_string(), "validating");
    }
}
