//! Fix / mask alignment
//!
//! Turns the discovered fix sequence into one [`AlignedSlot`] per fix. The
//! result always has exactly as many slots as there are fixes; mask entries
//! past the last fix are never consulted.

use crate::error::GeotagError;
use crate::parser::SelectionMask;
use crate::types::{AlignedSlot, FixRecord};
use crate::Result;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the mask length must relate to the number of discovered fixes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MaskLengthPolicy {
    /// Mask length must equal the fix count
    #[default]
    Exact,
    /// Mask may be longer than the fix count, never shorter
    AtLeast,
}

impl fmt::Display for MaskLengthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskLengthPolicy::Exact => f.write_str("exact"),
            MaskLengthPolicy::AtLeast => f.write_str("at-least"),
        }
    }
}

/// Check a mask length against the fix count under `policy`
pub fn validate_mask_length(
    mask_len: usize,
    fix_count: usize,
    policy: MaskLengthPolicy,
) -> Result<()> {
    let ok = match policy {
        MaskLengthPolicy::Exact => mask_len == fix_count,
        MaskLengthPolicy::AtLeast => mask_len >= fix_count,
    };

    if ok {
        Ok(())
    } else {
        Err(GeotagError::LengthMismatch {
            mask_len,
            fix_count,
            policy,
        })
    }
}

/// Pair every fix with its mask flag.
///
/// Without a mask every fix is present. With a mask, `slot[i]` is present iff
/// `mask[i]` is set; the caller is expected to have run
/// [`validate_mask_length`] first, and any ordinal the mask does not cover is
/// treated as skipped.
pub fn align_fixes(fixes: Vec<FixRecord>, mask: Option<&SelectionMask>) -> Vec<AlignedSlot> {
    fixes
        .into_iter()
        .enumerate()
        .map(|(i, fix)| match mask {
            Some(mask) if !mask.is_selected(i) => AlignedSlot::Skipped,
            _ => AlignedSlot::Present(fix),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixes(texts: &[&str]) -> Vec<FixRecord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| FixRecord::new(i, i, *t))
            .collect()
    }

    #[test]
    fn test_mask_selects_slots() {
        let mask = SelectionMask::from_flags(vec![true, false, true]);
        let aligned = align_fixes(fixes(&["A", "B", "C"]), Some(&mask));
        assert_eq!(
            aligned,
            vec![
                AlignedSlot::Present(FixRecord::new(0, 0, "A")),
                AlignedSlot::Skipped,
                AlignedSlot::Present(FixRecord::new(2, 2, "C")),
            ]
        );
    }

    #[test]
    fn test_length_follows_fixes_not_mask() {
        let mask = SelectionMask::from_flags(vec![true; 10]);
        let aligned = align_fixes(fixes(&["A", "B"]), Some(&mask));
        assert_eq!(aligned.len(), 2);

        let aligned = align_fixes(Vec::new(), Some(&mask));
        assert!(aligned.is_empty());
    }

    #[test]
    fn test_uncovered_ordinals_are_skipped() {
        let mask = SelectionMask::from_flags(vec![true]);
        let aligned = align_fixes(fixes(&["A", "B", "C"]), Some(&mask));
        assert_eq!(aligned.len(), 3);
        assert!(aligned[0].is_present());
        assert!(!aligned[1].is_present());
        assert!(!aligned[2].is_present());
    }

    #[test]
    fn test_no_mask_keeps_every_fix() {
        let aligned = align_fixes(fixes(&["A", "B", "C"]), None);
        assert!(aligned.iter().all(AlignedSlot::is_present));
    }

    #[test]
    fn test_all_false_mask_skips_everything() {
        let mask = SelectionMask::from_flags(vec![false; 4]);
        let aligned = align_fixes(fixes(&["A", "B", "C", "D"]), Some(&mask));
        assert!(aligned.iter().all(|slot| *slot == AlignedSlot::Skipped));
    }

    #[test]
    fn test_exact_policy() {
        assert!(validate_mask_length(5, 5, MaskLengthPolicy::Exact).is_ok());
        assert!(validate_mask_length(4, 5, MaskLengthPolicy::Exact).is_err());
        assert!(validate_mask_length(6, 5, MaskLengthPolicy::Exact).is_err());
    }

    #[test]
    fn test_at_least_policy() {
        assert!(validate_mask_length(5, 5, MaskLengthPolicy::AtLeast).is_ok());
        assert!(validate_mask_length(6, 5, MaskLengthPolicy::AtLeast).is_ok());
        match validate_mask_length(4, 5, MaskLengthPolicy::AtLeast) {
            Err(GeotagError::LengthMismatch {
                mask_len,
                fix_count,
                ..
            }) => {
                assert_eq!(mask_len, 4);
                assert_eq!(fix_count, 5);
            }
            other => panic!("expected LengthMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatch_message_names_both_lengths() {
        let err = validate_mask_length(4, 5, MaskLengthPolicy::Exact).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("(4)"));
        assert!(message.contains("(5)"));
        assert!(message.contains("shorter"));
    }
}
