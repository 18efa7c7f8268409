//! Fix sentence scanning
//!
//! Collects the positional-fix sentences of an NMEA log, in file order, starting
//! at a given line. Only lines that begin with [`FIX_TAG`] qualify; everything
//! else in the log (other sentence types, blank lines, junk) is ignored.

use crate::input::open_input;
use crate::types::FixRecord;
use crate::Result;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Tag that starts every qualifying fix sentence
pub const FIX_TAG: &str = "$GPGGA";

/// Scan already-loaded lines.
///
/// Lines before `start_line` are ignored even if they qualify. An out-of-range
/// start line yields an empty sequence.
pub fn scan_fix_lines<I, S>(lines: I, start_line: usize) -> Vec<FixRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .skip(start_line)
        .filter_map(|(line_number, line)| {
            let line = line.as_ref();
            line.starts_with(FIX_TAG)
                .then(|| (line_number, line.trim_end().to_string()))
        })
        .enumerate()
        .map(|(ordinal, (line_number, text))| FixRecord::new(ordinal, line_number, text))
        .collect()
}

/// Scan a log file from disk.
///
/// Lines are split on raw bytes and decoded lossily, so serial noise that is
/// not valid UTF-8 still counts as a line and never fails the scan.
pub fn scan_fix_log(path: &Path, start_line: usize) -> Result<Vec<FixRecord>> {
    let reader = BufReader::new(open_input(path)?);
    let lines = reader
        .split(b'\n')
        .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
        .collect::<std::io::Result<Vec<String>>>()?;
    let fixes = scan_fix_lines(&lines, start_line);

    debug!(
        "Scanned {} lines of {}, found {} fix records from line {}",
        lines.len(),
        path.display(),
        fixes.len(),
        start_line
    );

    Ok(fixes)
}
