mod camera;
mod sequencer;

pub use camera::{Axis, Camera, ViewError};
pub use sequencer::{
    rotation_sweep, still_views, ACTIVE_SITE_BUFFER, FRAME_HEIGHT, FRAME_WIDTH, MOVIE_FRAMES,
    MOVIE_STEP_DEG, STILL_HEIGHT, STILL_WIDTH, ZOOM_BUFFER,
};
