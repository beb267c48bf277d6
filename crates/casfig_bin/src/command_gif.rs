use anyhow::Result;
use casfig::figure::assemble_gif;
use log::info;

pub fn command_gif(frames_dir: &str, output: &str, duration_ms: u32) -> Result<()> {
    let n = assemble_gif(frames_dir, output, duration_ms)?;
    info!("Frames: {n}");
    info!("Duration: {duration_ms}ms per frame");
    Ok(())
}
