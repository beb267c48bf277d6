use super::{Atom, Pos};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("number of atoms {0} doesn't match number of coordinates {1}")]
    SizeMismatch(usize, usize),
    #[error("structure '{0}' contains no atoms")]
    Empty(String),
}

/// A single CA atom of the backbone trace.
#[derive(Debug, Clone, Copy)]
pub struct CaRef {
    /// Index of the CA atom in the structure.
    pub index: usize,
    pub resid: i32,
    pub chain: char,
    /// One-letter residue code.
    pub code: char,
}

/// A named molecular structure: atoms plus their coordinates.
/// Loaded once per run and immutable except for whole-structure transforms
/// applied after superposition.
#[derive(Debug, Clone)]
pub struct Structure {
    name: String,
    atoms: Vec<Atom>,
    coords: Vec<Pos>,
}

impl Structure {
    /// Builds a structure from parsed atoms and coordinates.
    /// Assigns residue indexes and guesses elements from atom names.
    pub fn new(
        name: impl Into<String>,
        mut atoms: Vec<Atom>,
        coords: Vec<Pos>,
    ) -> Result<Self, StructureError> {
        let name = name.into();
        if atoms.len() != coords.len() {
            return Err(StructureError::SizeMismatch(atoms.len(), coords.len()));
        }
        if atoms.is_empty() {
            return Err(StructureError::Empty(name));
        }

        for at in atoms.iter_mut() {
            if at.atomic_number == 0 {
                at.guess_element_from_name();
            }
        }
        assign_resindex(&mut atoms);

        Ok(Self { name, atoms, coords })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn coords(&self) -> &[Pos] {
        &self.coords
    }

    pub fn iter_atoms(&self) -> impl ExactSizeIterator<Item = &Atom> {
        self.atoms.iter()
    }

    pub fn iter_pos(&self) -> impl ExactSizeIterator<Item = &Pos> + Clone {
        self.coords.iter()
    }

    pub fn nth_atom(&self, i: usize) -> &Atom {
        &self.atoms[i]
    }

    pub fn nth_pos(&self, i: usize) -> &Pos {
        &self.coords[i]
    }

    /// Number of residues (distinct resindex spans).
    pub fn num_residues(&self) -> usize {
        self.atoms.last().map(|at| at.resindex + 1).unwrap_or(0)
    }

    /// CA backbone trace in residue order.
    /// Residues without a CA atom (ligands, ions) are simply absent.
    pub fn ca_trace(&self) -> Vec<CaRef> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, at)| at.name == "CA" && at.atomic_number == 6)
            .map(|(index, at)| CaRef {
                index,
                resid: at.resid,
                chain: at.chain,
                code: super::resname_to_one_letter(&at.resname),
            })
            .collect()
    }

    /// Applies a rigid-body transform to all coordinates.
    pub fn apply_transform(&mut self, tr: &nalgebra::IsometryMatrix3<f32>) {
        for p in self.coords.iter_mut() {
            *p = tr * (*p);
        }
    }

    /// A transformed displayed copy, leaving the original untouched.
    pub fn transformed(&self, tr: &nalgebra::IsometryMatrix3<f32>) -> Self {
        let mut out = self.clone();
        out.apply_transform(tr);
        out
    }
}

fn assign_resindex(atoms: &mut [Atom]) {
    let mut resindex = 0usize;
    let mut iter = atoms.iter_mut();
    if let Some(at0) = iter.next() {
        let mut cur_resid = at0.resid;
        let mut cur_chain = at0.chain;
        at0.resindex = resindex;
        for at in iter {
            if at.resid != cur_resid || at.chain != cur_chain {
                cur_resid = at.resid;
                cur_chain = at.chain;
                resindex += 1;
            }
            at.resindex = resindex;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mini() -> Structure {
        let mut atoms = vec![];
        let mut coords = vec![];
        for (i, (name, resname)) in [("N", "ALA"), ("CA", "ALA"), ("CA", "GLY")]
            .iter()
            .enumerate()
        {
            atoms.push(Atom {
                name: name.to_string(),
                resname: resname.to_string(),
                resid: i as i32 / 2 + 1,
                chain: 'A',
                occupancy: 1.0,
                ..Default::default()
            });
            coords.push(Pos::new(i as f32, 0.0, 0.0));
        }
        Structure::new("mini", atoms, coords).unwrap()
    }

    #[test]
    fn test_resindex_assignment() {
        let s = mini();
        assert_eq!(s.nth_atom(0).resindex, 0);
        assert_eq!(s.nth_atom(1).resindex, 0);
        assert_eq!(s.nth_atom(2).resindex, 1);
        assert_eq!(s.num_residues(), 2);
    }

    #[test]
    fn test_ca_trace() {
        let s = mini();
        let trace = s.ca_trace();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].code, 'A');
        assert_eq!(trace[1].code, 'G');
        assert_eq!(trace[1].index, 2);
    }

    #[test]
    fn test_size_mismatch() {
        let atoms = vec![Atom::new()];
        assert!(Structure::new("bad", atoms, vec![]).is_err());
    }
}
