use super::{Matrix3f, Pos, Vector3f};
use anyhow::{bail, Result};
use itertools::izip;
use nalgebra::{Rotation3, Unit, SVD};
use num_traits::Bounded;
use num_traits::Zero;

//---------------------------------------------------
// Free functions for computing properties
//---------------------------------------------------

pub fn min_max<'a>(pos: impl Iterator<Item = &'a Pos>) -> (Pos, Pos) {
    let mut lower = Pos::max_value();
    let mut upper = Pos::min_value();
    for p in pos {
        for d in 0..3 {
            if p[d] < lower[d] {
                lower[d] = p[d]
            }
            if p[d] > upper[d] {
                upper[d] = p[d]
            }
        }
    }
    (lower, upper)
}

pub fn center_of_geometry<'a>(pos: impl ExactSizeIterator<Item = &'a Pos>) -> Result<Pos> {
    let n = pos.len();
    if n == 0 {
        bail!("No points in center of geometry")
    }
    let mut cog = Vector3f::zero();
    for c in pos {
        cog += c.coords;
    }
    Ok(Pos::from(cog / n as f32))
}

//-------------------------------------------------------
// Free functions for modifying coordinates
//-------------------------------------------------------

pub fn translate<'a>(pos: impl Iterator<Item = &'a mut Pos>, shift: Vector3f) {
    for el in pos {
        *el += shift;
    }
}

pub fn rotate<'a>(pos: impl Iterator<Item = &'a mut Pos>, ax: &Unit<Vector3f>, ang: f32) {
    let tr = Rotation3::<f32>::from_axis_angle(ax, ang);
    for p in pos {
        p.coords = tr * p.coords;
    }
}

pub fn apply_transform<'a>(
    pos: impl Iterator<Item = &'a mut Pos>,
    tr: &nalgebra::IsometryMatrix3<f32>,
) {
    for p in pos {
        *p = tr * (*p);
    }
}

//---------------------------------------------------
// Free functions for RMSD and fitting
//---------------------------------------------------

// Straightforward implementation of the Kabsch algorithm
pub fn rot_transform(
    pos1: impl Iterator<Item = Vector3f>,
    pos2: impl Iterator<Item = Vector3f>,
) -> Rotation3<f32> {
    // Calculate the covariance matrix
    let mut cov = Matrix3f::zeros();
    for (p1, p2) in izip!(pos1, pos2) {
        cov += p2 * p1.transpose();
    }

    // Perform Singular Value Decomposition (SVD) on the covariance matrix
    let svd = SVD::new(cov, true, true);
    let u = svd.u.unwrap();
    let v_t = svd.v_t.unwrap();

    // Determine if a reflection is necessary
    let d = if (u * v_t).determinant() < 0.0 {
        -1.0
    } else {
        1.0
    };

    // Create a diagonal matrix for correcting the reflection
    let mut d_matrix = Matrix3f::identity();
    d_matrix[(2, 2)] = d;

    // Compute the optimal rotation matrix
    Rotation3::from_matrix_unchecked(u * d_matrix * v_t)
}

/// Transform fitting `pos1` onto `pos2`. Points are paired by position
/// in the slices, which must have equal lengths.
pub fn fit_transform(pos1: &[Pos], pos2: &[Pos]) -> Result<nalgebra::IsometryMatrix3<f32>> {
    if pos1.len() != pos2.len() {
        bail!(
            "Different sizes in fit_transform: {} and {}",
            pos1.len(),
            pos2.len()
        );
    }
    let cm1 = center_of_geometry(pos1.iter())?;
    let cm2 = center_of_geometry(pos2.iter())?;

    let rot = rot_transform(
        pos1.iter().map(|p| *p - cm1),
        pos2.iter().map(|p| *p - cm2),
    );

    Ok(nalgebra::Translation3::from(cm2) * rot * nalgebra::Translation3::from(-cm1))
}

/// Plain positional RMSD.
pub fn rmsd(pos1: &[Pos], pos2: &[Pos]) -> Result<f32> {
    if pos1.len() != pos2.len() {
        bail!("Different sizes in rmsd: {} and {}", pos1.len(), pos2.len());
    }
    let n = pos1.len();
    if n == 0 {
        bail!("No atoms in rmsd")
    }

    let mut res = 0.0;
    for (p1, p2) in izip!(pos1, pos2) {
        res += (p2 - p1).norm_squared();
    }

    Ok((res / n as f32).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_3;

    fn helix(n: usize) -> Vec<Pos> {
        // Synthetic CA helix: 100 degrees and 1.5 A rise per residue
        (0..n)
            .map(|i| {
                let a = i as f32 * 100.0_f32.to_radians();
                Pos::new(2.3 * a.cos(), 2.3 * a.sin(), 1.5 * i as f32)
            })
            .collect()
    }

    #[test]
    fn test_fit_recovers_rotation() -> Result<()> {
        let reference = helix(25);
        let mut mobile = reference.clone();
        rotate(mobile.iter_mut(), &Vector3f::y_axis(), FRAC_PI_3);
        translate(mobile.iter_mut(), Vector3f::new(5.0, -3.0, 11.0));

        let tr = fit_transform(&mobile, &reference)?;
        let fitted: Vec<Pos> = mobile.iter().map(|p| tr * p).collect();
        assert!(rmsd(&fitted, &reference)? < 1e-4);
        Ok(())
    }

    #[test]
    fn test_rmsd_size_mismatch() {
        assert!(rmsd(&helix(4), &helix(5)).is_err());
    }

    #[test]
    fn test_min_max() {
        let (lo, hi) = min_max(helix(10).iter());
        assert!(lo.z == 0.0 && hi.z == 13.5);
    }
}
