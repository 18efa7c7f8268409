use anyhow::Result;
use vergen::EmitBuilder;

// VERGEN_GIT_SHA / VERGEN_GIT_COMMIT_DATE end up in `nmea_geotag --version`
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    EmitBuilder::builder()
        .git_sha(true)
        .git_commit_date()
        .emit()?;
    Ok(())
}
