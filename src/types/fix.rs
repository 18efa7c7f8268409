#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Field positions inside a comma-separated fix sentence
pub const FIELD_LATITUDE: usize = 2;
pub const FIELD_LATITUDE_REF: usize = 3;
pub const FIELD_LONGITUDE: usize = 4;
pub const FIELD_LONGITUDE_REF: usize = 5;

/// One qualifying fix sentence discovered in the location log
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixRecord {
    /// Position in the discovered-fix sequence (0-based)
    pub ordinal: usize,
    /// Line number in the log file (0-based)
    pub line_number: usize,
    /// Original sentence text without the line terminator
    pub text: String,
}

impl FixRecord {
    pub fn new(ordinal: usize, line_number: usize, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            line_number,
            text: text.into(),
        }
    }

    /// Raw comma-separated field at `index`, if the sentence has that many fields
    pub fn field(&self, index: usize) -> Option<&str> {
        self.text.split(',').nth(index)
    }

    pub fn latitude_field(&self) -> Option<&str> {
        self.field(FIELD_LATITUDE)
    }

    pub fn latitude_ref_field(&self) -> Option<&str> {
        self.field(FIELD_LATITUDE_REF)
    }

    pub fn longitude_field(&self) -> Option<&str> {
        self.field(FIELD_LONGITUDE)
    }

    pub fn longitude_ref_field(&self) -> Option<&str> {
        self.field(FIELD_LONGITUDE_REF)
    }
}

/// Per-ordinal decision produced by combining the fix sequence with the mask
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AlignedSlot {
    /// The fix at this ordinal is applied to the matching frame
    Present(FixRecord),
    /// The mask deselected this ordinal; the matching frame passes through
    Skipped,
}

impl AlignedSlot {
    pub fn is_present(&self) -> bool {
        matches!(self, AlignedSlot::Present(_))
    }

    pub fn fix(&self) -> Option<&FixRecord> {
        match self {
            AlignedSlot::Present(fix) => Some(fix),
            AlignedSlot::Skipped => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_record_fields() {
        let fix = FixRecord::new(
            0,
            4,
            "$GPGGA,095805.000,5247.568,N,01309.697,E,1,12,1.0,0.0,M,0.0,M,,*63",
        );
        assert_eq!(fix.latitude_field(), Some("5247.568"));
        assert_eq!(fix.latitude_ref_field(), Some("N"));
        assert_eq!(fix.longitude_field(), Some("01309.697"));
        assert_eq!(fix.longitude_ref_field(), Some("E"));
        assert_eq!(fix.field(42), None);
    }

    #[test]
    fn test_short_sentence_has_no_longitude() {
        let fix = FixRecord::new(0, 0, "$GPGGA, line 1");
        assert_eq!(fix.field(1), Some(" line 1"));
        assert_eq!(fix.latitude_field(), None);
        assert_eq!(fix.longitude_ref_field(), None);
    }

    #[test]
    fn test_aligned_slot_accessors() {
        let fix = FixRecord::new(2, 7, "$GPGGA,C");
        let present = AlignedSlot::Present(fix.clone());
        assert!(present.is_present());
        assert_eq!(present.fix(), Some(&fix));
        assert!(!AlignedSlot::Skipped.is_present());
        assert_eq!(AlignedSlot::Skipped.fix(), None);
    }
}
