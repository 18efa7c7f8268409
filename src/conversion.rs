//! Coordinate conversion utilities
//!
//! NMEA sentences carry coordinates as `dddmm.mmmm`: whole degrees in the
//! hundreds-and-above place, minutes (with fraction) in the remainder. EXIF
//! wants degrees, minutes and seconds as separate rationals.

use crate::error::GeotagError;
use crate::types::{Dms, FixRecord, GeoTag};
use crate::types::{FIELD_LATITUDE, FIELD_LATITUDE_REF, FIELD_LONGITUDE, FIELD_LONGITUDE_REF};
use crate::Result;

/// Convert a `dddmm.mmmm` value into whole degrees, minutes and seconds.
///
/// Every step truncates, so 6724.449 (67°24.449') becomes 67°24'26", not 27".
/// Inputs are non-negative in valid sentences; negative values saturate to zero.
pub fn encode_dms(value: f64) -> Dms {
    let degrees = (value / 100.0).trunc();
    let remainder = value - degrees * 100.0;
    let minutes = remainder.trunc();
    let fractional_minutes = remainder - minutes;
    let seconds = (fractional_minutes * 60.0).trunc();

    Dms::new(degrees as u32, minutes as u32, seconds as u32)
}

fn numeric_field(fix: &FixRecord, index: usize) -> Result<f64> {
    fix.field(index)
        .map(str::trim)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .ok_or_else(|| GeotagError::FieldParse {
            line: fix.text.clone(),
            field: index,
        })
}

fn hemisphere_field(fix: &FixRecord, index: usize) -> Result<char> {
    fix.field(index)
        .and_then(|raw| raw.trim().chars().next())
        .ok_or_else(|| GeotagError::FieldParse {
            line: fix.text.clone(),
            field: index,
        })
}

/// Build the geotag for a fix from its fixed-position fields
pub fn extract_geotag(fix: &FixRecord) -> Result<GeoTag> {
    Ok(GeoTag {
        latitude: encode_dms(numeric_field(fix, FIELD_LATITUDE)?),
        latitude_ref: hemisphere_field(fix, FIELD_LATITUDE_REF)?,
        longitude: encode_dms(numeric_field(fix, FIELD_LONGITUDE)?),
        longitude_ref: hemisphere_field(fix, FIELD_LONGITUDE_REF)?,
    })
}
