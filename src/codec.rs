//! Image metadata codec
//!
//! The merge step only needs two things from an image library: write a frame
//! to a new location with GPS tags merged into whatever EXIF it already has,
//! and copy a frame byte for byte. [`MetadataCodec`] is that seam;
//! [`ExifCodec`] is the implementation used by the CLI.

use crate::error::GeotagError;
use crate::types::{Dms, GeoTag};
use crate::Result;
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Merges positional metadata into frame images
pub trait MetadataCodec: Sync {
    /// Write `source` to `destination` with `tag` merged into its metadata.
    ///
    /// All other metadata in `source` is kept. Failures to decode or encode the
    /// image are reported as [`GeotagError::Codec`].
    fn merge_geotag(&self, source: &Path, destination: &Path, tag: &GeoTag) -> Result<()>;

    /// Copy `source` to `destination` without touching its contents
    fn copy_raw(&self, source: &Path, destination: &Path) -> Result<()> {
        fs::copy(source, destination)?;
        Ok(())
    }
}

/// EXIF codec backed by `little_exif`, with `image` used to reject frames that
/// do not decode
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifCodec;

impl ExifCodec {
    pub fn new() -> Self {
        Self
    }
}

fn codec_error(path: &Path, message: impl ToString) -> GeotagError {
    GeotagError::Codec {
        file: path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string(),
        message: message.to_string(),
    }
}

fn to_exif_rationals(dms: &Dms) -> Vec<uR64> {
    dms.as_array()
        .iter()
        .map(|r| uR64 {
            nominator: r.numerator,
            denominator: r.denominator,
        })
        .collect()
}

impl MetadataCodec for ExifCodec {
    fn merge_geotag(&self, source: &Path, destination: &Path, tag: &GeoTag) -> Result<()> {
        image::image_dimensions(source).map_err(|e| codec_error(source, e))?;

        let mut metadata = match Metadata::new_from_path(source) {
            Ok(metadata) => metadata,
            Err(e) => {
                // freshly extracted frames usually carry no EXIF block at all
                debug!("No readable EXIF in {}: {}", source.display(), e);
                Metadata::new()
            }
        };

        metadata.set_tag(ExifTag::GPSLatitudeRef(tag.latitude_ref.to_string()));
        metadata.set_tag(ExifTag::GPSLatitude(to_exif_rationals(&tag.latitude)));
        metadata.set_tag(ExifTag::GPSLongitudeRef(tag.longitude_ref.to_string()));
        metadata.set_tag(ExifTag::GPSLongitude(to_exif_rationals(&tag.longitude)));

        fs::copy(source, destination)?;
        if let Err(e) = metadata.write_to_file(destination) {
            // leave no half-written frame behind for the raw fallback to trip over
            let _ = fs::remove_file(destination);
            return Err(codec_error(source, e));
        }

        Ok(())
    }
}
