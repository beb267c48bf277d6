mod fasta_handler;
mod pdb_handler;

pub use fasta_handler::{FastaFileHandler, FastaHandlerError, FastaRecord};
pub use pdb_handler::{write_overlay, PdbFileHandler, PdbHandlerError};
