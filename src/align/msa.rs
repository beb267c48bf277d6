use crate::io::FastaRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MsaError {
    #[error("aligned sequences differ in length: {0} vs {1}")]
    LengthMismatch(usize, usize),
    #[error("alignment needs at least two sequences, got {0}")]
    TooFewSequences(usize),
}

/// Identity over a pair of gapped, aligned sequences.
#[derive(Debug, Clone, Copy)]
pub struct IdentityStats {
    /// Columns where both sequences carry a residue.
    pub aligned: usize,
    /// Aligned columns with identical residues.
    pub matches: usize,
}

impl IdentityStats {
    pub fn percent(&self) -> f32 {
        if self.aligned == 0 {
            0.0
        } else {
            100.0 * self.matches as f32 / self.aligned as f32
        }
    }
}

/// Position-wise identity of two equal-length gapped sequences.
/// Columns where either side is a gap don't count as aligned positions.
pub fn percent_identity(a: &str, b: &str) -> Result<IdentityStats, MsaError> {
    if a.chars().count() != b.chars().count() {
        return Err(MsaError::LengthMismatch(
            a.chars().count(),
            b.chars().count(),
        ));
    }
    let mut aligned = 0;
    let mut matches = 0;
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca == '-' || cb == '-' {
            continue;
        }
        aligned += 1;
        if ca.eq_ignore_ascii_case(&cb) {
            matches += 1;
        }
    }
    Ok(IdentityStats { aligned, matches })
}

/// Per-column conservation score over an MSA:
/// 1.0 where all non-gap residues are identical, 0.5 where they differ,
/// 0.0 for all-gap columns.
pub fn conservation_profile(records: &[FastaRecord]) -> Result<Vec<f32>, MsaError> {
    if records.len() < 2 {
        return Err(MsaError::TooFewSequences(records.len()));
    }
    let len = records[0].seq.chars().count();
    for rec in &records[1..] {
        let l = rec.seq.chars().count();
        if l != len {
            return Err(MsaError::LengthMismatch(len, l));
        }
    }

    let seqs: Vec<Vec<char>> = records.iter().map(|r| r.seq.chars().collect()).collect();
    let mut profile = Vec::with_capacity(len);
    for i in 0..len {
        let mut first: Option<char> = None;
        let mut identical = true;
        let mut non_gap = 0;
        for seq in &seqs {
            let c = seq[i];
            if c == '-' {
                continue;
            }
            non_gap += 1;
            match first {
                None => first = Some(c),
                Some(f) => {
                    if !f.eq_ignore_ascii_case(&c) {
                        identical = false;
                    }
                }
            }
        }
        profile.push(if non_gap == 0 {
            0.0
        } else if identical {
            1.0
        } else {
            0.5
        });
    }
    Ok(profile)
}
