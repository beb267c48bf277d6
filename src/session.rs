//! Saved sessions.
//!
//! Stands in for the rendering tool's interactive session files: a TOML
//! document recording what was loaded, how it is colored and where the
//! camera points, so a comparison can be reopened and re-rendered later.

use crate::view::Camera;
use nalgebra::Rotation3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("can't access session file '{0}'")]
    Io(String, #[source] std::io::Error),
    #[error("bad session file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("can't serialize session: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("session view rotation is not a valid rotation matrix")]
    BadRotation,
}

/// One loaded structure and its display state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionObject {
    pub name: String,
    pub path: String,
    pub color: String,
    /// Domain scheme preset applied to this object, if any.
    pub scheme: Option<String>,
}

/// Camera state as stored on disk: rotation matrix rows, target and the
/// framed vertical half-extent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewState {
    pub rotation: [[f32; 3]; 3],
    pub target: [f32; 3],
    pub half_height: f32,
}

impl ViewState {
    pub fn from_camera(camera: &Camera) -> Self {
        let m = camera.rotation().matrix();
        Self {
            rotation: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
            target: [camera.target().x, camera.target().y, camera.target().z],
            half_height: camera.half_height(),
        }
    }

    pub fn to_camera(&self) -> Result<Camera, SessionError> {
        let m = nalgebra::Matrix3::from_fn(|r, c| self.rotation[r][c]);
        // Reject matrices that are not close to orthonormal
        let det = m.determinant();
        if (det - 1.0).abs() > 1e-3 {
            return Err(SessionError::BadRotation);
        }
        let target =
            crate::core::Pos::new(self.target[0], self.target[1], self.target[2]);
        Ok(Camera::from_parts(
            Rotation3::from_matrix_unchecked(m),
            target,
            self.half_height,
        ))
    }
}

/// A reloadable figure session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub objects: Vec<SessionObject>,
    pub view: ViewState,
}

impl Session {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|e| SessionError::Io(path.display().to_string(), e))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Io(path.display().to_string(), e))?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pos;
    use crate::view::Axis;

    #[test]
    fn test_session_roundtrip() -> anyhow::Result<()> {
        let pts = vec![Pos::new(-3.0, 0.0, 0.0), Pos::new(3.0, 2.0, 1.0)];
        let mut cam = Camera::orient(pts.iter(), 5.0)?;
        cam.turn(Axis::Y, 35.0);

        let session = Session {
            objects: vec![SessionObject {
                name: "FnCas9".to_string(),
                path: "data/pdb/5B2O.pdb".to_string(),
                color: "firebrick".to_string(),
                scheme: Some("FnCas9".to_string()),
            }],
            view: ViewState::from_camera(&cam),
        };

        let path = std::env::temp_dir().join("casfig_session_roundtrip.cfs");
        session.save(&path)?;
        let again = Session::load(&path)?;
        assert_eq!(again.objects.len(), 1);
        assert_eq!(again.objects[0].color, "firebrick");

        let cam2 = again.view.to_camera()?;
        let p = Pos::new(1.0, 2.0, 3.0);
        assert!((cam.world_to_view(&p) - cam2.world_to_view(&p)).norm() < 1e-4);
        std::fs::remove_file(&path).ok();
        Ok(())
    }

    #[test]
    fn test_bad_rotation_rejected() {
        let vs = ViewState {
            rotation: [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]],
            target: [0.0; 3],
            half_height: 10.0,
        };
        assert!(matches!(vs.to_camera(), Err(SessionError::BadRotation)));
    }
}
