use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Uniform per-frame display duration of the rotation movies.
pub const FRAME_DURATION_MS: u32 = 100;

#[derive(Error, Debug)]
pub enum MovieError {
    #[error("can't access '{0}'")]
    Io(String, #[source] std::io::Error),
    #[error("no frames found in {0}")]
    NoFrames(String),
    #[error("frame '{frame}' is {got_w}x{got_h}, expected {want_w}x{want_h}")]
    FrameSize {
        frame: String,
        want_w: u32,
        want_h: u32,
        got_w: u32,
        got_h: u32,
    },
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, MovieError> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| MovieError::Io(dir.display().to_string(), e))?;
    let mut frames: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("frame_") && n.ends_with(".png"))
                .unwrap_or(false)
        })
        .collect();
    frames.sort();
    Ok(frames)
}

/// Assembles `frame_*.png` files of a directory (in lexical order) into a
/// single looping GIF with a uniform per-frame duration.
///
/// An empty frame sequence is an error and no output file is written.
/// Returns the number of encoded frames.
pub fn assemble_gif(
    frames_dir: impl AsRef<Path>,
    output: impl AsRef<Path>,
    duration_ms: u32,
) -> Result<usize, MovieError> {
    let frames_dir = frames_dir.as_ref();
    let output = output.as_ref();

    let frame_files = list_frames(frames_dir)?;
    if frame_files.is_empty() {
        return Err(MovieError::NoFrames(frames_dir.display().to_string()));
    }

    // Decode everything up front so a bad frame aborts before the output
    // file exists
    let mut images = Vec::with_capacity(frame_files.len());
    for f in &frame_files {
        let img = image::open(f)?.to_rgba8();
        images.push((f, img));
    }
    let (want_w, want_h) = images[0].1.dimensions();
    for (f, img) in &images {
        let (got_w, got_h) = img.dimensions();
        if (got_w, got_h) != (want_w, want_h) {
            return Err(MovieError::FrameSize {
                frame: f.display().to_string(),
                want_w,
                want_h,
                got_w,
                got_h,
            });
        }
    }

    let file =
        File::create(output).map_err(|e| MovieError::Io(output.display().to_string(), e))?;
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite)?;

    let n = images.len();
    let delay = Delay::from_numer_denom_ms(duration_ms, 1);
    for (_, img) in images {
        encoder.encode_frame(Frame::from_parts(img, 0, 0, delay))?;
    }

    info!(
        "Created GIF: {} ({} frames, {} ms per frame)",
        output.display(),
        n,
        duration_ms
    );
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{AnimationDecoder, Rgba, RgbaImage};

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("casfig_movie_{tag}"));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn solid_frame(dir: &Path, i: usize, w: u32, h: u32, rgba: [u8; 4]) {
        let img = RgbaImage::from_pixel(w, h, Rgba(rgba));
        img.save(dir.join(format!("frame_{i:03}.png"))).unwrap();
    }

    #[test]
    fn test_gif_has_all_frames_and_duration() -> anyhow::Result<()> {
        let dir = temp_dir("ok");
        for i in 0..5 {
            solid_frame(&dir, i, 16, 12, [50 * i as u8, 0, 0, 255]);
        }
        let out = dir.join("rotation.gif");
        let n = assemble_gif(&dir, &out, FRAME_DURATION_MS)?;
        assert_eq!(n, 5);

        let decoder =
            image::codecs::gif::GifDecoder::new(std::io::BufReader::new(File::open(&out)?))?;
        let frames = decoder.into_frames().collect_frames()?;
        assert_eq!(frames.len(), 5);
        for fr in &frames {
            assert_eq!(fr.delay().numer_denom_ms(), (100, 1));
        }
        std::fs::remove_dir_all(&dir).ok();
        Ok(())
    }

    #[test]
    fn test_empty_sequence_writes_nothing() {
        let dir = temp_dir("empty");
        let out = dir.join("rotation.gif");
        let res = assemble_gif(&dir, &out, FRAME_DURATION_MS);
        assert!(matches!(res, Err(MovieError::NoFrames(_))));
        assert!(!out.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_size_mismatch_is_an_error() {
        let dir = temp_dir("mismatch");
        solid_frame(&dir, 0, 16, 12, [255, 0, 0, 255]);
        solid_frame(&dir, 1, 8, 12, [0, 255, 0, 255]);
        let out = dir.join("rotation.gif");
        let res = assemble_gif(&dir, &out, FRAME_DURATION_MS);
        assert!(matches!(res, Err(MovieError::FrameSize { .. })));
        assert!(!out.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_non_frame_files_are_ignored() -> anyhow::Result<()> {
        let dir = temp_dir("mixed");
        solid_frame(&dir, 0, 8, 8, [10, 10, 10, 255]);
        std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();
        let out = dir.join("rotation.gif");
        assert_eq!(assemble_gif(&dir, &out, 50)?, 1);
        std::fs::remove_dir_all(&dir).ok();
        Ok(())
    }
}
