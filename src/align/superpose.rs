use super::{global_align_affine, AlignOp};
use crate::core::{fit_transform, rmsd, Pos, Structure};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuperposeError {
    #[error("too few CA correspondences between '{mobile}' and '{reference}': {found}")]
    NoCorrespondence {
        mobile: String,
        reference: String,
        found: usize,
    },
    #[error(transparent)]
    Fit(#[from] anyhow::Error),
}

/// Result of a best-fit superposition of a mobile structure onto a
/// reference. A poor fit is a valid outcome: dissimilar structures still
/// get a transform and a (bad) score, never an error.
#[derive(Debug, Clone)]
pub struct Superposition {
    /// Rigid transform mapping the mobile frame onto the reference frame.
    pub transform: nalgebra::IsometryMatrix3<f32>,
    /// RMSD over aligned CA pairs after fitting, in Angstrom.
    pub rmsd: f32,
    /// Number of aligned CA pairs used for the fit.
    pub n_aligned: usize,
    /// TM-score normalized by the reference length.
    pub tm_score: f32,
    /// Sequence identity over the aligned pairs, in percent.
    pub seq_identity: f32,
}

impl Superposition {
    /// Whether the structural alignment is considered meaningful.
    /// Scores below 0.3 indicate no common fold.
    pub fn is_confident(&self) -> bool {
        self.tm_score >= 0.3
    }

    /// One-line report in the form the figure captions use.
    pub fn summary(&self) -> String {
        if self.is_confident() {
            format!(
                "RMSD {:.2} \u{212B} over {} aligned residues (TM-score {:.3})",
                self.rmsd, self.n_aligned, self.tm_score
            )
        } else {
            format!(
                "RMSD {:.2} \u{212B}, no structural alignment (TM-score {:.3})",
                self.rmsd, self.tm_score
            )
        }
    }
}

const GAP_OPEN: i32 = -10;
const GAP_EXTEND: i32 = -1;

fn residue_score(a: &char, b: &char) -> i32 {
    if a == b {
        3
    } else {
        -1
    }
}

/// Superposes `mobile` onto `reference`.
///
/// CA traces are paired by global sequence alignment, then the paired
/// coordinates go through a least-squares rigid-body fit. The returned
/// transform is meant for a displayed copy of the mobile structure; the
/// input structures are left untouched.
pub fn superpose(
    mobile: &Structure,
    reference: &Structure,
) -> Result<Superposition, SuperposeError> {
    let trace_m = mobile.ca_trace();
    let trace_r = reference.ca_trace();
    let seq_m: Vec<char> = trace_m.iter().map(|c| c.code).collect();
    let seq_r: Vec<char> = trace_r.iter().map(|c| c.code).collect();

    let alignment = global_align_affine(&seq_m, &seq_r, GAP_OPEN, GAP_EXTEND, residue_score);

    let mut pos_m: Vec<Pos> = vec![];
    let mut pos_r: Vec<Pos> = vec![];
    let mut matches = 0usize;
    let (mut i, mut j) = (0usize, 0usize);
    for op in &alignment.operations {
        match op {
            AlignOp::Match | AlignOp::Subst => {
                pos_m.push(*mobile.nth_pos(trace_m[i].index));
                pos_r.push(*reference.nth_pos(trace_r[j].index));
                if *op == AlignOp::Match {
                    matches += 1;
                }
                i += 1;
                j += 1;
            }
            AlignOp::Ins => i += 1,
            AlignOp::Del => j += 1,
        }
    }

    let n_aligned = pos_m.len();
    if n_aligned < 3 {
        return Err(SuperposeError::NoCorrespondence {
            mobile: mobile.name().to_string(),
            reference: reference.name().to_string(),
            found: n_aligned,
        });
    }

    let transform = fit_transform(&pos_m, &pos_r)?;
    let fitted: Vec<Pos> = pos_m.iter().map(|p| transform * p).collect();
    let fit_rmsd = rmsd(&fitted, &pos_r)?;

    // TM-score with the standard length-dependent distance scale,
    // normalized by the reference length
    let l_ref = trace_r.len().max(1);
    let d0 = (1.24 * (l_ref as f32 - 15.0).max(0.0).cbrt() - 1.8).max(0.5);
    let tm_sum: f32 = fitted
        .iter()
        .zip(pos_r.iter())
        .map(|(p, q)| {
            let d = (p - q).norm();
            1.0 / (1.0 + (d / d0).powi(2))
        })
        .sum();
    let tm_score = tm_sum / l_ref as f32;

    let seq_identity = 100.0 * matches as f32 / n_aligned as f32;

    debug!(
        "superpose {} -> {}: {} pairs, rmsd {:.3}, tm {:.3}",
        mobile.name(),
        reference.name(),
        n_aligned,
        fit_rmsd,
        tm_score
    );

    Ok(Superposition {
        transform,
        rmsd: fit_rmsd,
        n_aligned,
        tm_score,
        seq_identity,
    })
}
