//! Export functionality for run results
//!
//! A run can leave two artifacts next to (never inside) the output directory:
//! a CSV manifest with one row per frame, and a JSON report of the run summary.

#[cfg(any(feature = "csv", feature = "json"))]
use crate::Result;
#[cfg(any(feature = "csv", feature = "json"))]
use std::path::Path;

#[cfg(feature = "csv")]
use crate::types::{FrameAction, FrameOutcome};

#[cfg(feature = "json")]
use crate::types::RunSummary;

#[cfg(any(feature = "csv", feature = "json"))]
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Column order of the manifest
#[cfg(feature = "csv")]
pub const MANIFEST_HEADER: [&str; 8] = [
    "frame",
    "ordinal",
    "action",
    "fix_ordinal",
    "latitude_ref",
    "latitude",
    "longitude_ref",
    "longitude",
];

#[cfg(feature = "csv")]
fn manifest_row(outcome: &FrameOutcome) -> [String; 8] {
    let frame = outcome.frame.file_name().to_string();
    let ordinal = outcome.frame.ordinal.to_string();
    let action = outcome.action.label().to_string();

    match &outcome.action {
        FrameAction::Geotagged { fix_ordinal, tag } => [
            frame,
            ordinal,
            action,
            fix_ordinal.to_string(),
            tag.latitude_ref.to_string(),
            tag.latitude.to_string(),
            tag.longitude_ref.to_string(),
            tag.longitude.to_string(),
        ],
        FrameAction::Failed { fix_ordinal, .. } => [
            frame,
            ordinal,
            action,
            fix_ordinal.to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ],
        FrameAction::Skipped | FrameAction::Overflow => [
            frame,
            ordinal,
            action,
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ],
    }
}

/// Write one CSV row per frame outcome
#[cfg(feature = "csv")]
pub fn export_manifest_csv(outcomes: &[FrameOutcome], path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(MANIFEST_HEADER)?;
    for outcome in outcomes {
        writer.write_record(manifest_row(outcome))?;
    }
    writer.flush()?;

    tracing::info!("Exported frame manifest to: {}", path.display());
    Ok(())
}

/// Write the run summary as pretty-printed JSON
#[cfg(feature = "json")]
pub fn export_report_json(summary: &RunSummary, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;

    tracing::info!("Exported run report to: {}", path.display());
    Ok(())
}

#[cfg(all(test, feature = "csv"))]
mod tests {
    use super::*;
    use crate::types::{Dms, FrameRef, GeoTag};

    #[test]
    fn test_manifest_rows() {
        let tag = GeoTag {
            latitude: Dms::new(52, 47, 34),
            latitude_ref: 'N',
            longitude: Dms::new(13, 9, 41),
            longitude_ref: 'E',
        };
        let geotagged = FrameOutcome {
            frame: FrameRef::new(0, "/f/00000.jpg"),
            action: FrameAction::Geotagged {
                fix_ordinal: 0,
                tag,
            },
        };
        let row = manifest_row(&geotagged);
        assert_eq!(row[0], "00000.jpg");
        assert_eq!(row[2], "geotagged");
        assert_eq!(row[4], "N");
        assert_eq!(row[5], "52°47'34\"");

        let overflow = FrameOutcome {
            frame: FrameRef::new(7, "/f/00007.jpg"),
            action: FrameAction::Overflow,
        };
        let row = manifest_row(&overflow);
        assert_eq!(row[1], "7");
        assert_eq!(row[2], "overflow");
        assert!(row[3].is_empty());
    }
}
