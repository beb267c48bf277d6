//! End-to-end run of the comparison pipeline on the miniature two-model
//! fixture: load, superpose, color, render the view set, assemble the
//! rotation movie and the composite panel.

use anyhow::Result;
use casfig::prelude::*;
use std::path::PathBuf;

fn workdir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("casfig_pipeline_{tag}"));
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn load_fixture() -> Result<(Structure, Structure)> {
    let mut structs = PdbFileHandler::open("tests/mini_pair.pdb")?.read_structures()?;
    let mobile = structs.swap_remove(1);
    let reference = structs.swap_remove(0);
    Ok((reference, mobile))
}

#[test]
fn superposition_recovers_the_fixture_pose() -> Result<()> {
    let (reference, mobile) = load_fixture()?;
    assert_eq!(reference.ca_trace().len(), 20);

    let sup = superpose(&mobile, &reference)?;
    assert_eq!(sup.n_aligned, 20);
    assert!(sup.rmsd < 0.01, "rmsd was {}", sup.rmsd);
    assert!((sup.seq_identity - 100.0).abs() < 1e-6);
    assert!(sup.is_confident());

    // The displayed copy lands on the reference
    let fitted = mobile.transformed(&sup.transform);
    let d = (fitted.nth_pos(0) - reference.nth_pos(0)).norm();
    assert!(d < 0.01);
    Ok(())
}

#[test]
fn view_set_renders_and_composites() -> Result<()> {
    let dir = workdir("views");
    let (reference, mobile) = load_fixture()?;
    let sup = superpose(&mobile, &reference)?;
    let mobile = mobile.transformed(&sup.transform);

    let ref_scheme = DomainScheme::plain(reference.name(), "firebrick");
    let mob_scheme = DomainScheme::plain(mobile.name(), "marine");
    let prims = PrimitiveCollector::new()
        .collect_tube(&reference, &ref_scheme.paint_plain(&reference)?)
        .collect_tube(&mobile, &mob_scheme.paint_plain(&mobile)?)
        .build();
    assert!(!prims.is_empty());

    let cam = Camera::orient(reference.iter_pos().chain(mobile.iter_pos()), ZOOM_BUFFER)?;
    // Keep test renders small; geometry not resolution is under test
    let settings = RenderSettings::new(160, 120);

    for (name, view_cam) in still_views(&cam) {
        render_to_png(&prims, &view_cam, &settings, dir.join(format!("{name}_view.png")))?;
    }
    render_to_png(&prims, &cam, &settings, dir.join("domains_colored.png"))?;

    let done = composite_panel(
        &[
            ("front", dir.join("front_view.png").as_path()),
            ("side", dir.join("side_view.png").as_path()),
            ("top", dir.join("top_view.png").as_path()),
            ("domains", dir.join("domains_colored.png").as_path()),
        ],
        dir.join("composite_panel.png"),
    )?;
    assert!(done);
    assert!(dir.join("composite_panel.png").exists());

    std::fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[test]
fn rotation_movie_assembles_to_gif() -> Result<()> {
    let dir = workdir("movie");
    let (reference, mobile) = load_fixture()?;
    let sup = superpose(&mobile, &reference)?;
    let mobile = mobile.transformed(&sup.transform);

    let scheme = DomainScheme::plain("pair", "firebrick");
    let prims = PrimitiveCollector::new()
        .collect_tube(&reference, &scheme.paint_plain(&reference)?)
        .collect_tube(&mobile, &scheme.paint_plain(&mobile)?)
        .build();
    let cam = Camera::orient(reference.iter_pos().chain(mobile.iter_pos()), ZOOM_BUFFER)?;
    let settings = RenderSettings::new(80, 60);

    // A short sweep keeps the test fast; the step count is what matters
    let frames = 6;
    for (i, view_cam) in rotation_sweep(&cam, frames, 60.0).iter().enumerate() {
        render_to_png(&prims, view_cam, &settings, dir.join(format!("frame_{i:03}.png")))?;
    }

    let gif = dir.join("rotation.gif");
    let n = assemble_gif(&dir, &gif, FRAME_DURATION_MS)?;
    assert_eq!(n, frames);
    assert!(gif.exists());

    std::fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[test]
fn identical_runs_are_pixel_identical() -> Result<()> {
    let (reference, mobile) = load_fixture()?;
    let sup = superpose(&mobile, &reference)?;
    let mobile = mobile.transformed(&sup.transform);

    let scheme = DomainScheme::plain("pair", "marine");
    let prims = PrimitiveCollector::new()
        .collect_tube(&reference, &scheme.paint_plain(&reference)?)
        .collect_tube(&mobile, &scheme.paint_plain(&mobile)?)
        .build();
    let cam = Camera::orient(reference.iter_pos().chain(mobile.iter_pos()), ZOOM_BUFFER)?;
    let settings = RenderSettings::new(128, 96);

    let a = render(&prims, &cam, &settings)?;
    let b = render(&prims, &cam, &settings)?;
    assert_eq!(a.as_raw(), b.as_raw());
    Ok(())
}
