use crate::core::{Atom, Pos, Structure, StructureError};
use log::debug;
use std::{
    fs::File,
    io::{BufRead, BufReader, Read, Write},
    path::Path,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdbHandlerError {
    #[error("can't access PDB file '{0}'")]
    Io(String, #[source] std::io::Error),
    #[error("malformed {record} record at line {line}")]
    Malformed { record: &'static str, line: usize },
    #[error("no atoms found in '{0}'")]
    NoAtoms(String),
    #[error(transparent)]
    Structure(#[from] StructureError),
}

enum PdbRecord {
    Atom,
    Hetatm,
    Model,
    Endmdl,
    End,
    Other,
}

fn get_pdb_record(line: &str) -> PdbRecord {
    if line.starts_with("ATOM") {
        PdbRecord::Atom
    } else if line.starts_with("HETATM") {
        PdbRecord::Hetatm
    } else if line.starts_with("MODEL") {
        PdbRecord::Model
    } else if line.starts_with("ENDMDL") {
        PdbRecord::Endmdl
    } else if line.starts_with("END") {
        PdbRecord::End
    } else {
        PdbRecord::Other
    }
}

/// Reader for PDB structure files.
///
/// Multi-model files (such as TM-align overlay output, where model 1 is
/// the reference and model 2 the superposed mobile structure) are split
/// into separate structures named `<stem>_0001`, `<stem>_0002`, ...
pub struct PdbFileHandler {
    reader: BufReader<File>,
    file_name: String,
    stem: String,
}

impl PdbFileHandler {
    pub fn open(fname: impl AsRef<Path>) -> Result<Self, PdbHandlerError> {
        let path = fname.as_ref();
        let file = File::open(path)
            .map_err(|e| PdbHandlerError::Io(path.display().to_string(), e))?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "structure".to_string());
        Ok(Self {
            reader: BufReader::new(file),
            file_name: path.display().to_string(),
            stem,
        })
    }

    /// Reads all models. A file without MODEL records yields a single
    /// structure named after the file stem.
    pub fn read_structures(&mut self) -> Result<Vec<Structure>, PdbHandlerError> {
        let mut models: Vec<(Vec<Atom>, Vec<Pos>)> = vec![];
        let mut atoms_buf: Vec<Atom> = vec![];
        let mut coord_buf: Vec<Pos> = vec![];
        let mut seen_model_record = false;

        for (line_no, line) in self.reader.by_ref().lines().enumerate() {
            let line = line.map_err(|e| PdbHandlerError::Io(self.file_name.clone(), e))?;
            match get_pdb_record(&line) {
                PdbRecord::Atom | PdbRecord::Hetatm => {
                    if line.len() < 66 {
                        return Err(PdbHandlerError::Malformed {
                            record: "ATOM",
                            line: line_no + 1,
                        });
                    }
                    // Skip if altloc or insertion code is set
                    if line.as_bytes()[16] != b' ' && line.as_bytes()[16] != b'A' {
                        continue;
                    }
                    if line.as_bytes()[26] != b' ' {
                        continue;
                    }

                    let malformed = || PdbHandlerError::Malformed {
                        record: "ATOM",
                        line: line_no + 1,
                    };

                    let at = Atom {
                        name: line[12..=15].trim().to_string(),
                        resname: line[17..=19].trim().to_string(),
                        chain: line.as_bytes()[21] as char,
                        resid: line[22..=25].trim().parse().map_err(|_| malformed())?,
                        occupancy: line[54..=59].trim().parse().map_err(|_| malformed())?,
                        bfactor: line[60..=65].trim().parse().map_err(|_| malformed())?,
                        ..Default::default()
                    };
                    atoms_buf.push(at);

                    let v = Pos::new(
                        line[30..=37].trim().parse().map_err(|_| malformed())?,
                        line[38..=45].trim().parse().map_err(|_| malformed())?,
                        line[46..=53].trim().parse().map_err(|_| malformed())?,
                    );
                    coord_buf.push(v);
                }
                PdbRecord::Model => {
                    seen_model_record = true;
                    // Close any model left open by a missing ENDMDL
                    if !atoms_buf.is_empty() {
                        models.push((std::mem::take(&mut atoms_buf), std::mem::take(&mut coord_buf)));
                    }
                }
                PdbRecord::Endmdl => {
                    if !atoms_buf.is_empty() {
                        models.push((std::mem::take(&mut atoms_buf), std::mem::take(&mut coord_buf)));
                    }
                }
                PdbRecord::End => break,
                PdbRecord::Other => {}
            }
        }
        if !atoms_buf.is_empty() {
            models.push((atoms_buf, coord_buf));
        }

        if models.is_empty() {
            return Err(PdbHandlerError::NoAtoms(self.file_name.clone()));
        }

        debug!("{}: {} model(s)", self.file_name, models.len());

        let multi = seen_model_record && models.len() > 1;
        let mut out = Vec::with_capacity(models.len());
        for (i, (atoms, coords)) in models.into_iter().enumerate() {
            let name = if multi {
                format!("{}_{:04}", self.stem, i + 1)
            } else {
                self.stem.clone()
            };
            out.push(Structure::new(name, atoms, coords)?);
        }
        Ok(out)
    }

    /// Reads the first (or only) model.
    pub fn read_structure(&mut self) -> Result<Structure, PdbHandlerError> {
        Ok(self.read_structures()?.remove(0))
    }
}

/// Writes structures as a multi-model PDB overlay (one MODEL block per
/// structure), the same layout TM-align produces for superposed pairs.
pub fn write_overlay(
    fname: impl AsRef<Path>,
    structures: &[&Structure],
) -> Result<(), PdbHandlerError> {
    let path = fname.as_ref();
    let mut file =
        File::create(path).map_err(|e| PdbHandlerError::Io(path.display().to_string(), e))?;
    let io_err = |e| PdbHandlerError::Io(path.display().to_string(), e);

    for (model, s) in structures.iter().enumerate() {
        writeln!(file, "MODEL     {:>4}", model + 1).map_err(io_err)?;
        for (i, (at, pos)) in s.iter_atoms().zip(s.iter_pos()).enumerate() {
            // PDB name column convention: short names start one column in
            let name = if at.name.len() < 4 {
                format!(" {:<3}", at.name)
            } else {
                at.name.clone()
            };
            writeln!(
                file,
                "ATOM  {:>5} {}{}{:>3} {}{:>4}    {:8.3}{:8.3}{:8.3}{:6.2}{:6.2}          {:>2}",
                (i + 1) % 100_000,
                name,
                ' ',
                at.resname,
                at.chain,
                at.resid,
                pos.x,
                pos.y,
                pos.z,
                at.occupancy,
                at.bfactor,
                at.element_name().to_ascii_uppercase(),
            )
            .map_err(io_err)?;
        }
        writeln!(file, "TER").map_err(io_err)?;
        writeln!(file, "ENDMDL").map_err(io_err)?;
    }
    writeln!(file, "END").map_err(io_err)?;
    Ok(())
}
