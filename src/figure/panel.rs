use image::{imageops, Rgba, RgbaImage};
use log::{info, warn};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("can't write panel '{0}'")]
    Io(String, #[source] std::io::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

const MARGIN: u32 = 20;

/// Composes four rendered views into a 2x2 panel on a white canvas.
///
/// Missing inputs don't fail the run: a warning is emitted, the panel is
/// skipped and `Ok(false)` is returned so the rest of the pipeline can
/// continue. Returns `Ok(true)` when the panel was written.
pub fn composite_panel(
    inputs: &[(&str, &Path); 4],
    output: impl AsRef<Path>,
) -> Result<bool, PanelError> {
    let output = output.as_ref();

    let missing: Vec<&str> = inputs
        .iter()
        .filter(|(_, p)| !p.exists())
        .map(|(label, _)| *label)
        .collect();
    if !missing.is_empty() {
        warn!(
            "skipping composite panel: missing view image(s) {}",
            missing.join(", ")
        );
        return Ok(false);
    }

    let mut images = Vec::with_capacity(4);
    for (_, p) in inputs {
        images.push(image::open(p)?.to_rgba8());
    }

    let cell_w = images.iter().map(|i| i.width()).max().unwrap_or(1);
    let cell_h = images.iter().map(|i| i.height()).max().unwrap_or(1);
    let canvas_w = 2 * cell_w + 3 * MARGIN;
    let canvas_h = 2 * cell_h + 3 * MARGIN;
    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([255, 255, 255, 255]));

    for (k, img) in images.iter().enumerate() {
        let col = (k % 2) as u32;
        let row = (k / 2) as u32;
        // Center each view in its cell
        let x = MARGIN + col * (cell_w + MARGIN) + (cell_w - img.width()) / 2;
        let y = MARGIN + row * (cell_h + MARGIN) + (cell_h - img.height()) / 2;
        imageops::overlay(&mut canvas, img, x as i64, y as i64);
    }

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| PanelError::Io(output.display().to_string(), e))?;
    }
    canvas.save(output)?;
    info!("Created composite panel: {}", output.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("casfig_panel_{tag}"));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn view(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let p = dir.join(name);
        RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]))
            .save(&p)
            .unwrap();
        p
    }

    #[test]
    fn test_panel_from_four_views() -> Result<(), PanelError> {
        let dir = temp_dir("full");
        let a = view(&dir, "front.png", 40, 30);
        let b = view(&dir, "side.png", 40, 30);
        let c = view(&dir, "top.png", 40, 30);
        let d = view(&dir, "domains.png", 40, 30);
        let out = dir.join("panel.png");

        let done = composite_panel(
            &[
                ("front", a.as_path()),
                ("side", b.as_path()),
                ("top", c.as_path()),
                ("domains", d.as_path()),
            ],
            &out,
        )?;
        assert!(done);

        let panel = image::open(&out).unwrap();
        assert_eq!(panel.width(), 2 * 40 + 3 * MARGIN);
        assert_eq!(panel.height(), 2 * 30 + 3 * MARGIN);
        std::fs::remove_dir_all(&dir).ok();
        Ok(())
    }

    #[test]
    fn test_missing_view_skips_without_failing() -> Result<(), PanelError> {
        let dir = temp_dir("partial");
        let a = view(&dir, "front.png", 40, 30);
        let b = view(&dir, "side.png", 40, 30);
        let c = view(&dir, "top.png", 40, 30);
        let ghost = dir.join("domains.png");
        let out = dir.join("panel.png");

        let done = composite_panel(
            &[
                ("front", a.as_path()),
                ("side", b.as_path()),
                ("top", c.as_path()),
                ("domains", ghost.as_path()),
            ],
            &out,
        )?;
        assert!(!done);
        assert!(!out.exists());
        std::fs::remove_dir_all(&dir).ok();
        Ok(())
    }
}
