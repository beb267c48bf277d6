mod msa;
mod seq;
mod superpose;

pub use msa::{conservation_profile, percent_identity, IdentityStats, MsaError};
pub use seq::{global_align_affine, AlignOp, Alignment};
pub use superpose::{superpose, Superposition, SuperposeError};
