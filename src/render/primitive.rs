use crate::core::{Pos, Structure};
use crate::style::Color;

/// Tube radius for the CA backbone trace, in Angstrom.
const TUBE_RADIUS: f32 = 0.8;
/// CA-CA distances above this are chain breaks, not bonds.
const TUBE_BREAK: f32 = 4.5;
/// Stick rendering of side chains: joint spheres and bond cylinders.
const STICK_SPHERE_RADIUS: f32 = 0.45;
const STICK_RADIUS: f32 = 0.25;
/// Heavy-atom pairs closer than this are drawn as bonded.
const BOND_CUTOFF: f32 = 1.9;

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Pos,
    pub radius: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct Cylinder {
    pub a: Pos,
    pub b: Pos,
    pub radius: f32,
    pub color: Color,
}

/// Renderable primitives collected from one or more structures.
#[derive(Debug, Default)]
pub struct Primitives {
    pub spheres: Vec<Sphere>,
    pub cylinders: Vec<Cylinder>,
}

impl Primitives {
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty() && self.cylinders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spheres.len() + self.cylinders.len()
    }
}

/// Builds primitives from structures: tube representation for backbones,
/// sticks for highlighted side chains.
#[derive(Debug, Default)]
pub struct PrimitiveCollector {
    prims: Primitives,
}

impl PrimitiveCollector {
    pub fn new() -> Self {
        Default::default()
    }

    /// CA backbone tube: one sphere per CA plus a cylinder to the next CA
    /// of the same chain. Colors are per-atom as produced by the painter.
    pub fn collect_tube(mut self, structure: &Structure, colors: &[Color]) -> Self {
        let trace = structure.ca_trace();
        for (k, ca) in trace.iter().enumerate() {
            let p = *structure.nth_pos(ca.index);
            let color = colors[ca.index];
            self.prims.spheres.push(Sphere {
                center: p,
                radius: TUBE_RADIUS,
                color,
            });
            if let Some(next) = trace.get(k + 1) {
                let q = *structure.nth_pos(next.index);
                if next.chain == ca.chain && (q - p).norm() <= TUBE_BREAK {
                    self.prims.cylinders.push(Cylinder {
                        a: p,
                        b: q,
                        radius: TUBE_RADIUS,
                        color,
                    });
                }
            }
        }
        self
    }

    /// Stick representation for a set of atoms (catalytic side chains).
    /// Bonds are guessed by distance within the same residue.
    pub fn collect_sticks(mut self, structure: &Structure, indices: &[usize], color: Color) -> Self {
        for &i in indices {
            self.prims.spheres.push(Sphere {
                center: *structure.nth_pos(i),
                radius: STICK_SPHERE_RADIUS,
                color,
            });
        }
        for (k, &i) in indices.iter().enumerate() {
            for &j in &indices[k + 1..] {
                if structure.nth_atom(i).resindex != structure.nth_atom(j).resindex {
                    continue;
                }
                let p = *structure.nth_pos(i);
                let q = *structure.nth_pos(j);
                if (q - p).norm() <= BOND_CUTOFF {
                    self.prims.cylinders.push(Cylinder {
                        a: p,
                        b: q,
                        radius: STICK_RADIUS,
                        color,
                    });
                }
            }
        }
        self
    }

    pub fn build(self) -> Primitives {
        self.prims
    }
}
