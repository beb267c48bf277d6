use super::{center_of_geometry, min_max, Atom, Pos, SelectionExpr, SelectionParserError, Structure};
use anyhow::Result;

/// A set of atom indexes selected from a structure.
#[derive(Debug)]
pub struct Selection<'a> {
    structure: &'a Structure,
    indices: Vec<usize>,
}

impl Structure {
    /// Evaluates a selection expression string against this structure.
    /// An expression that matches nothing yields an empty selection,
    /// not an error.
    pub fn select(&self, sel_str: &str) -> Result<Selection<'_>, SelectionParserError> {
        let expr = SelectionExpr::new(sel_str)?;
        Ok(self.select_expr(&expr))
    }

    pub fn select_expr(&self, expr: &SelectionExpr) -> Selection<'_> {
        let indices = self
            .iter_atoms()
            .enumerate()
            .filter(|(_, at)| expr.ast().matches(at))
            .map(|(i, _)| i)
            .collect();
        Selection {
            structure: self,
            indices,
        }
    }
}

impl<'a> Selection<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter_atoms(&self) -> impl Iterator<Item = &'a Atom> + '_ {
        self.indices.iter().map(|i| self.structure.nth_atom(*i))
    }

    pub fn iter_pos(&self) -> impl ExactSizeIterator<Item = &'a Pos> + '_ {
        self.indices.iter().map(|i| self.structure.nth_pos(*i))
    }

    pub fn center_of_geometry(&self) -> Result<Pos> {
        center_of_geometry(self.iter_pos())
    }

    pub fn min_max(&self) -> (Pos, Pos) {
        min_max(self.iter_pos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Structure {
        let mut atoms = vec![];
        let mut coords = vec![];
        for i in 0..n {
            atoms.push(Atom {
                name: "CA".to_string(),
                resname: "ALA".to_string(),
                resid: i as i32 + 1,
                chain: 'A',
                ..Default::default()
            });
            coords.push(Pos::new(i as f32 * 3.8, 0.0, 0.0));
        }
        Structure::new("chain", atoms, coords).unwrap()
    }

    #[test]
    fn test_select_range() -> Result<()> {
        let s = chain(100);
        let sel = s.select("resi 10-20")?;
        assert_eq!(sel.len(), 11);
        assert_eq!(sel.iter_atoms().next().unwrap().resid, 10);
        Ok(())
    }

    #[test]
    fn test_out_of_range_matches_nothing() -> Result<()> {
        let s = chain(10);
        // The window extends far past the last residue: silently empty
        let sel = s.select("resi 800-1100")?;
        assert!(sel.is_empty());
        Ok(())
    }

    #[test]
    fn test_cog_of_selection() -> Result<()> {
        let s = chain(3);
        let sel = s.select("all")?;
        let c = sel.center_of_geometry()?;
        assert!((c.x - 3.8).abs() < 1e-5);
        Ok(())
    }
}
