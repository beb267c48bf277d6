mod atom;
mod structure;
mod algorithms;
mod periodic_table;
mod selection;
mod selection_parser;

pub use {
    atom::*,
    structure::*,
    algorithms::*,
    periodic_table::*,
    selection::*,
    selection_parser::{IntValue, SelectionAst, SelectionExpr, SelectionParserError, StrValue},
};

// Aliases for vectors and points
pub type Vector3f = nalgebra::Vector3<f32>;
pub type Matrix3f = nalgebra::Matrix3<f32>;
pub type Pos = nalgebra::Point3<f32>; // Atom position
