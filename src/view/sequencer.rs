use super::{Axis, Camera};

/// Still image resolution (the `ray 1600, 1200` call sites).
pub const STILL_WIDTH: u32 = 1600;
pub const STILL_HEIGHT: u32 = 1200;

/// Movie frame resolution, smaller for GIF assembly.
pub const FRAME_WIDTH: u32 = 800;
pub const FRAME_HEIGHT: u32 = 600;

/// Full rotation sweep: 36 frames of 10 degrees each.
pub const MOVIE_FRAMES: usize = 36;
pub const MOVIE_STEP_DEG: f32 = 10.0;

/// Zoom buffer around the whole overlay, in Angstrom.
pub const ZOOM_BUFFER: f32 = 5.0;
/// Wider buffer for the active-site close-up.
pub const ACTIVE_SITE_BUFFER: f32 = 15.0;

/// The fixed still set: front (as oriented), side (y 90) and top (x 90).
/// Given the same base camera this always produces the same sequence.
pub fn still_views(base: &Camera) -> Vec<(&'static str, Camera)> {
    vec![
        ("front", base.clone()),
        ("side", base.turned(Axis::Y, 90.0)),
        ("top", base.turned(Axis::X, 90.0)),
    ]
}

/// Equal-angle rotation sweep around the camera y axis. The first frame
/// is already turned by one step, matching the movie scripts.
pub fn rotation_sweep(base: &Camera, frames: usize, step_deg: f32) -> Vec<Camera> {
    let mut out = Vec::with_capacity(frames);
    let mut cam = base.clone();
    for _ in 0..frames {
        cam.turn(Axis::Y, step_deg);
        out.push(cam.clone());
    }
    out
}
