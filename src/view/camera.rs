use crate::core::{min_max, Pos, Vector3f};
use nalgebra::Rotation3;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("can't orient the camera on an empty selection")]
    EmptyTarget,
}

/// Camera-frame rotation axes for `turn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Orthographic camera state.
///
/// View space is `rotation * (p - target)`: the camera looks down the
/// negative view z axis, image x points right, image y points up.
/// `half_height` is the vertical half-extent of the framed volume in
/// Angstrom; the renderer derives the horizontal extent from the aspect
/// ratio.
#[derive(Debug, Clone)]
pub struct Camera {
    rotation: Rotation3<f32>,
    target: Pos,
    half_height: f32,
}

impl Camera {
    /// Rebuilds a camera from stored state.
    pub fn from_parts(rotation: Rotation3<f32>, target: Pos, half_height: f32) -> Self {
        Self {
            rotation,
            target,
            half_height: half_height.max(1e-3),
        }
    }

    /// Centers the camera on the bounding box of the given points with a
    /// zoom buffer in Angstrom, facing the default (front) direction.
    pub fn orient<'a>(
        points: impl Iterator<Item = &'a Pos> + Clone,
        buffer: f32,
    ) -> Result<Self, ViewError> {
        let mut cam = Self {
            rotation: Rotation3::identity(),
            target: Pos::origin(),
            half_height: 1.0,
        };
        cam.zoom_on(points, buffer)?;
        Ok(cam)
    }

    /// Re-frames the camera on a sub-selection, keeping the current
    /// orientation. The framed extent is the largest half-extent of the
    /// bounding box plus the buffer, so the target fits at any rotation.
    pub fn zoom_on<'a>(
        &mut self,
        points: impl Iterator<Item = &'a Pos> + Clone,
        buffer: f32,
    ) -> Result<(), ViewError> {
        if points.clone().next().is_none() {
            return Err(ViewError::EmptyTarget);
        }
        let (lo, hi) = min_max(points);
        self.target = Pos::from((lo.coords + hi.coords) * 0.5);
        let ext = hi - lo;
        let half = 0.5 * ext.x.max(ext.y).max(ext.z);
        self.half_height = half + buffer;
        Ok(())
    }

    /// Rotates the view about the given camera-frame axis by the given
    /// angle in degrees, like `turn y, 90`.
    pub fn turn(&mut self, axis: Axis, degrees: f32) {
        let ax = match axis {
            Axis::X => Vector3f::x_axis(),
            Axis::Y => Vector3f::y_axis(),
            Axis::Z => Vector3f::z_axis(),
        };
        self.rotation = Rotation3::from_axis_angle(&ax, degrees.to_radians()) * self.rotation;
    }

    /// A turned copy, leaving this camera untouched.
    pub fn turned(&self, axis: Axis, degrees: f32) -> Self {
        let mut out = self.clone();
        out.turn(axis, degrees);
        out
    }

    pub fn world_to_view(&self, p: &Pos) -> Pos {
        Pos::from(self.rotation * (p - self.target))
    }

    /// View-space direction expressed in world coordinates.
    pub fn view_dir_to_world(&self, v: &Vector3f) -> Vector3f {
        self.rotation.inverse() * v
    }

    pub fn rotation(&self) -> &Rotation3<f32> {
        &self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation3<f32>) {
        self.rotation = rotation;
    }

    pub fn target(&self) -> &Pos {
        &self.target
    }

    pub fn set_target(&mut self, target: Pos) {
        self.target = target;
    }

    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    pub fn set_half_height(&mut self, half_height: f32) {
        self.half_height = half_height.max(1e-3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orient_centers_target() -> Result<(), ViewError> {
        let pts = vec![Pos::new(0.0, 0.0, 0.0), Pos::new(10.0, 4.0, 2.0)];
        let cam = Camera::orient(pts.iter(), 5.0)?;
        assert_eq!(*cam.target(), Pos::new(5.0, 2.0, 1.0));
        assert!((cam.half_height() - 10.0).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn test_orient_empty_fails() {
        let pts: Vec<Pos> = vec![];
        assert!(Camera::orient(pts.iter(), 5.0).is_err());
    }

    #[test]
    fn test_turn_y_quarter() -> Result<(), ViewError> {
        let pts = vec![Pos::new(-1.0, 0.0, 0.0), Pos::new(1.0, 0.0, 0.0)];
        let mut cam = Camera::orient(pts.iter(), 0.0)?;
        cam.turn(Axis::Y, 90.0);
        // A point on +x moves to view -z after a quarter turn about y
        let v = cam.world_to_view(&Pos::new(1.0, 0.0, 0.0));
        assert!(v.x.abs() < 1e-5);
        assert!((v.z - -1.0).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn test_turn_accumulates() -> Result<(), ViewError> {
        let pts = vec![Pos::new(0.0, 0.0, 0.0), Pos::new(1.0, 1.0, 1.0)];
        let mut a = Camera::orient(pts.iter(), 0.0)?;
        let mut b = a.clone();
        for _ in 0..9 {
            a.turn(Axis::Y, 10.0);
        }
        b.turn(Axis::Y, 90.0);
        let pa = a.world_to_view(&Pos::new(1.0, 2.0, 3.0));
        let pb = b.world_to_view(&Pos::new(1.0, 2.0, 3.0));
        assert!((pa - pb).norm() < 1e-4);
        Ok(())
    }
}
