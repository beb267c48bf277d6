use crate::load::load_pair;
use anyhow::{Context, Result};
use casfig::prelude::*;
use log::{info, warn};
use std::path::PathBuf;

pub fn command_movie(files: &[String], names: &[String], outdir: &str) -> Result<()> {
    let (reference, mobile) = load_pair(files, names)?;

    let sup = superpose(&mobile, &reference)?;
    info!(
        "Alignment RMSD: {:.2} \u{212B} over {} residues",
        sup.rmsd, sup.n_aligned
    );
    if !sup.is_confident() {
        warn!("{}", sup.summary());
    }
    let mobile = mobile.transformed(&sup.transform);

    let ref_scheme = DomainScheme::preset(reference.name())
        .unwrap_or_else(|| DomainScheme::plain(reference.name(), "firebrick"));
    let mob_scheme = DomainScheme::preset(mobile.name())
        .unwrap_or_else(|| DomainScheme::plain(mobile.name(), "marine"));

    let prims = PrimitiveCollector::new()
        .collect_tube(&reference, &ref_scheme.paint_plain(&reference)?)
        .collect_tube(&mobile, &mob_scheme.paint_plain(&mobile)?)
        .build();

    let base_cam = Camera::orient(
        reference.iter_pos().chain(mobile.iter_pos()),
        ZOOM_BUFFER,
    )?;
    let settings = RenderSettings::new(FRAME_WIDTH, FRAME_HEIGHT);

    let out = PathBuf::from(outdir);
    std::fs::create_dir_all(&out).with_context(|| format!("creating '{}'", out.display()))?;

    info!("Generating movie frames in {}...", out.display());
    let cams = rotation_sweep(&base_cam, MOVIE_FRAMES, MOVIE_STEP_DEG);
    for (i, cam) in cams.iter().enumerate() {
        let frame_path = out.join(format!("frame_{i:03}.png"));
        render_to_png(&prims, cam, &settings, &frame_path)?;
        info!("  Frame {}/{}: {}", i + 1, cams.len(), frame_path.display());
    }

    info!("Generated {} frames in {}", cams.len(), out.display());
    Ok(())
}
