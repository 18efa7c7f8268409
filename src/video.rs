//! Frame sampling from video
//!
//! Frames are sampled once per second of video: the sampling interval is the
//! integer part of the stream's frame rate, and a frame is kept when its
//! absolute index is at or after the start frame and a multiple of the
//! interval. Kept frames are written as `00000.jpg`, `00001.jpg`, ... so that
//! lexicographic order equals sampling order.

use crate::error::GeotagError;
use crate::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Width of the zero-padded frame number in extracted filenames
pub const FRAME_NUMBER_WIDTH: usize = 5;

/// Filename for the `ordinal`-th sampled frame
pub fn frame_file_name(ordinal: usize, extension: &str) -> String {
    format!("{:0width$}.{}", ordinal, extension, width = FRAME_NUMBER_WIDTH)
}

/// Produces ordered still frames from a video
pub trait VideoDecoder {
    /// Write sampled frames of `video` into `output_dir`, returning how many were written
    fn extract_frames(&self, video: &Path, start_frame: u64, output_dir: &Path) -> Result<usize>;
}

/// Parse an ffprobe rate such as `30000/1001` or `25`
pub fn parse_frame_rate(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let rate = match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => raw.parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Frames between two samples: one second's worth, at least one
pub fn sampling_interval(frame_rate: f64) -> u64 {
    (frame_rate.trunc() as u64).max(1)
}

/// ffmpeg `select` expression keeping frame `n` when `n >= start` and `n % interval == 0`
pub fn select_filter(start_frame: u64, interval: u64) -> String {
    format!("select='gte(n,{})*not(mod(n,{}))'", start_frame, interval)
}

/// Decoder that shells out to the `ffmpeg` / `ffprobe` binaries
#[derive(Debug, Clone)]
pub struct FfmpegDecoder {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    extension: String,
}

impl Default for FfmpegDecoder {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            extension: "jpg".to_string(),
        }
    }
}

impl FfmpegDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binaries(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            ..Self::default()
        }
    }

    /// Image format of the extracted frames, by file extension
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Check if ffmpeg is available.
    pub fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Frame rate of the first video stream
    pub fn probe_frame_rate(&self, video: &Path) -> Result<f64> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=r_frame_rate",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(video)
            .output()
            .map_err(|e| GeotagError::Video(format!("ffprobe execution failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GeotagError::Video(format!(
                "ffprobe failed: {}",
                stderr.lines().last().unwrap_or("unknown error")
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .find_map(parse_frame_rate)
            .ok_or_else(|| {
                GeotagError::Video(format!(
                    "No video frame rate reported for {}",
                    video.display()
                ))
            })
    }
}

impl VideoDecoder for FfmpegDecoder {
    fn extract_frames(&self, video: &Path, start_frame: u64, output_dir: &Path) -> Result<usize> {
        let frame_rate = self.probe_frame_rate(video)?;
        let interval = sampling_interval(frame_rate);
        info!(
            "Sampling {} at {:.3} fps: every {} frames from frame {}",
            video.display(),
            frame_rate,
            interval,
            start_frame
        );

        let pattern = output_dir.join(format!("%0{}d.{}", FRAME_NUMBER_WIDTH, self.extension));
        let output = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(video)
            .arg("-vf")
            .arg(select_filter(start_frame, interval))
            .args(["-fps_mode", "vfr", "-q:v", "2", "-start_number", "0"])
            .arg(&pattern)
            .output()
            .map_err(|e| GeotagError::Video(format!("FFmpeg execution failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GeotagError::Video(format!(
                "FFmpeg failed: {}",
                stderr.lines().last().unwrap_or("unknown error")
            )));
        }

        let suffix = format!(".{}", self.extension);
        let written = std::fs::read_dir(output_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(&suffix))
            .count();
        debug!("FFmpeg wrote {} frames to {}", written, output_dir.display());

        Ok(written)
    }
}
