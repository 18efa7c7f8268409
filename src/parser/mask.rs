//! Selection mask parsing
//!
//! A mask file is a flat run of `'0'` / `'1'` characters, one per fix record.
//! Surrounding whitespace (a trailing newline from an editor, say) is ignored;
//! anything else that is not a flag character is rejected.

use crate::error::GeotagError;
use crate::input::open_input;
use crate::Result;
use std::io::Read;
use std::path::Path;

/// Ordered keep/drop flags, one per fix record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMask {
    flags: Vec<bool>,
}

impl SelectionMask {
    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Flag at `index`; positions beyond the mask are never selected
    pub fn is_selected(&self, index: usize) -> bool {
        self.flags.get(index).copied().unwrap_or(false)
    }

    pub fn selected_count(&self) -> usize {
        self.flags.iter().filter(|&&flag| flag).count()
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }
}

/// Parse mask text into flags
pub fn parse_selection_mask(text: &str) -> Result<SelectionMask> {
    let flags = text
        .trim()
        .chars()
        .enumerate()
        .map(|(position, c)| match c {
            '1' => Ok(true),
            '0' => Ok(false),
            found => Err(GeotagError::MaskParse { position, found }),
        })
        .collect::<Result<Vec<bool>>>()?;

    Ok(SelectionMask::from_flags(flags))
}

/// Read and parse a mask file
pub fn read_selection_mask(path: &Path) -> Result<SelectionMask> {
    let mut text = String::new();
    open_input(path)?.read_to_string(&mut text)?;
    parse_selection_mask(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_flags_in_order() {
        let mask = parse_selection_mask("1011").expect("parse");
        assert_eq!(mask.flags(), &[true, false, true, true]);
        assert_eq!(mask.len(), 4);
        assert_eq!(mask.selected_count(), 3);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let mask = parse_selection_mask("  0110\n").expect("parse");
        assert_eq!(mask.flags(), &[false, true, true, false]);
    }

    #[test]
    fn test_rejects_non_binary_characters() {
        match parse_selection_mask("10x1") {
            Err(GeotagError::MaskParse { position, found }) => {
                assert_eq!(position, 2);
                assert_eq!(found, 'x');
            }
            other => panic!("expected MaskParse, got {other:?}"),
        }
        // separators are malformed too
        assert!(parse_selection_mask("1,0,1").is_err());
        assert!(parse_selection_mask("10\n01").is_err());
    }

    #[test]
    fn test_empty_mask() {
        let mask = parse_selection_mask("").expect("parse");
        assert!(mask.is_empty());
        assert!(!mask.is_selected(0));
    }

    #[test]
    fn test_out_of_bounds_is_not_selected() {
        let mask = SelectionMask::from_flags(vec![true, true]);
        assert!(mask.is_selected(1));
        assert!(!mask.is_selected(2));
    }

    #[test]
    fn test_read_mask_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "1011").expect("write");
        let mask = read_selection_mask(file.path()).expect("read");
        assert_eq!(mask.flags(), &[true, false, true, true]);
    }
}
