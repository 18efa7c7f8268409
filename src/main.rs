use anyhow::{Context, Result};
use clap::{value_parser, Arg, Command};
use nmea_geotag::{
    run_pipeline, CancelToken, ExifCodec, FfmpegDecoder, MaskLengthPolicy, PipelineInputs,
    ProcessOptions, RunPaths, RunReport,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("VERGEN_GIT_SHA"),
        " ",
        env!("VERGEN_GIT_COMMIT_DATE"),
        ")"
    )
}

fn build_command() -> Command {
    Command::new("NMEA Geotag")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version())
        .about("Sample one frame per second from a video and write GPS positions from an NMEA log into them.")
        .arg(
            Arg::new("video")
                .help("Path to the video file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("nmea")
                .help("Path to the NMEA log ($GPGGA sentences are used)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("mask")
                .long("mask")
                .help("Bit mask file of '0'/'1' characters, one per $GPGGA sentence (1 = use the fix)")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("video-start-frame")
                .long("video-start-frame")
                .help("First video frame to sample (0 to begin from the start)")
                .value_name("N")
                .value_parser(value_parser!(u64))
                .default_value("0"),
        )
        .arg(
            Arg::new("nmea-start-line")
                .long("nmea-start-line")
                .help("First line of the NMEA log to use (0 to begin from the start)")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory in which the frame and geotagged directories are created (default: current directory)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("keep-frames")
                .long("keep-frames")
                .help("Keep the intermediate directory of extracted frames")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("allow-longer-mask")
                .long("allow-longer-mask")
                .help("Accept a mask longer than the number of $GPGGA sentences (shorter is always an error)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("manifest")
                .long("manifest")
                .help("Write a CSV manifest with one row per frame")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("Write the run summary as JSON (requires the json feature)")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("sequential")
                .long("sequential")
                .help("Process frames one at a time instead of in parallel")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed per-frame information")
                .action(clap::ArgAction::SetTrue),
        )
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn display_run_summary(report: &RunReport) {
    let summary = &report.summary;

    println!("\nStatistics");
    println!("Frames     {:6}", summary.frames_total);
    println!("Geotagged  {:6}", summary.geotagged);
    println!("Skipped    {:6}", summary.skipped);
    if summary.overflow > 0 {
        println!("Overflow   {:6}", summary.overflow);
    }
    if !summary.codec_failures.is_empty() {
        println!("Failed     {:6}", summary.codec_failures.len());
    }

    if let Some(first) = &summary.first_overflow {
        println!("\nNo metadata written from image {first} onward");
    }

    if summary.has_failures() {
        println!("\nFrames copied without metadata:");
        for failure in &summary.codec_failures {
            println!("  {}: {}", failure.file, failure.message);
        }
    }

    println!("\nOutput: {}", report.paths.output_dir.display());
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug);

    let video = matches
        .get_one::<String>("video")
        .map(PathBuf::from)
        .context("missing video path")?;
    let nmea = matches
        .get_one::<String>("nmea")
        .map(PathBuf::from)
        .context("missing NMEA path")?;
    let mask = matches.get_one::<String>("mask").map(PathBuf::from);
    let output_base = matches
        .get_one::<String>("output-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let options = ProcessOptions {
        video_start_frame: matches
            .get_one::<u64>("video-start-frame")
            .copied()
            .unwrap_or(0),
        log_start_line: matches
            .get_one::<usize>("nmea-start-line")
            .copied()
            .unwrap_or(0),
        mask_policy: if matches.get_flag("allow-longer-mask") {
            MaskLengthPolicy::AtLeast
        } else {
            MaskLengthPolicy::Exact
        },
        clean_up: !matches.get_flag("keep-frames"),
        manifest_path: matches.get_one::<String>("manifest").map(PathBuf::from),
        report_path: matches.get_one::<String>("report").map(PathBuf::from),
        parallel: !matches.get_flag("sequential"),
        ..ProcessOptions::default()
    };

    let inputs = PipelineInputs { video, nmea, mask };
    let paths = RunPaths::timestamped(&output_base, chrono::Local::now().naive_local());

    if debug {
        println!("Inputs: {inputs:?}");
        println!("Options: {options:?}");
        println!("Frames directory: {}", paths.frames_dir.display());
    }

    let decoder = FfmpegDecoder::new().with_extension(options.frame_extension.clone());
    if !decoder.is_available() {
        eprintln!("Error: ffmpeg not found in PATH (needed to extract frames from the video)");
        eprintln!("No frames were written.");
        std::process::exit(1);
    }
    let codec = ExifCodec::new();
    let cancel = CancelToken::new();

    match run_pipeline(&inputs, &paths, &options, &decoder, &codec, &cancel) {
        Ok(report) => {
            display_run_summary(&report);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            if e.is_fatal_input() {
                eprintln!("No frames were written.");
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        build_command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let matches = build_command()
            .try_get_matches_from(["nmea_geotag", "ride.mp4", "ride.nmea"])
            .expect("parse");
        assert_eq!(matches.get_one::<u64>("video-start-frame"), Some(&0));
        assert_eq!(matches.get_one::<usize>("nmea-start-line"), Some(&0));
        assert!(matches.get_one::<String>("mask").is_none());
        assert!(!matches.get_flag("keep-frames"));
    }

    #[test]
    fn test_all_options() {
        let matches = build_command()
            .try_get_matches_from([
                "nmea_geotag",
                "ride.mp4",
                "ride.nmea",
                "--mask",
                "ride.mask",
                "--video-start-frame",
                "48",
                "--nmea-start-line",
                "12",
                "--keep-frames",
                "--allow-longer-mask",
            ])
            .expect("parse");
        assert_eq!(
            matches.get_one::<String>("mask").map(String::as_str),
            Some("ride.mask")
        );
        assert_eq!(matches.get_one::<u64>("video-start-frame"), Some(&48));
        assert_eq!(matches.get_one::<usize>("nmea-start-line"), Some(&12));
        assert!(matches.get_flag("keep-frames"));
        assert!(matches.get_flag("allow-longer-mask"));
    }

    #[test]
    fn test_missing_nmea_is_rejected() {
        assert!(build_command()
            .try_get_matches_from(["nmea_geotag", "ride.mp4"])
            .is_err());
    }

    #[test]
    fn test_start_frame_must_be_numeric() {
        assert!(build_command()
            .try_get_matches_from([
                "nmea_geotag",
                "ride.mp4",
                "ride.nmea",
                "--video-start-frame",
                "nan"
            ])
            .is_err());
    }
}
