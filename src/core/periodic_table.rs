const NUM_ELEMENTS: usize = 31;

/// Translation from atomic number to element name.
/// Protein structures only need the first few rows of the table,
/// so it stops at Zn. Index 0 is the "unknown" element.
pub const ELEMENT_NAME: [&str; NUM_ELEMENTS] = [
    "X", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", "Sc",
    "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
];

pub const ELEMENT_NAME_UPPER: [&str; NUM_ELEMENTS] = [
    "X", "H", "HE", "LI", "BE", "B", "C", "N", "O", "F", "NE",
    "NA", "MG", "AL", "SI", "P", "S", "CL", "AR", "K", "CA", "SC",
    "TI", "V", "CR", "MN", "FE", "CO", "NI", "CU", "ZN",
];

/// Translation from atomic number to element mass.
pub const ELEMENT_MASS: [f32; NUM_ELEMENTS] = [
    /* X  */ 0.0, 1.00794, 4.00260, 6.941, 9.012182, 10.811,
    /* C  */ 12.0107, 14.0067, 15.9994, 18.9984032, 20.1797,
    /* Na */ 22.989770, 24.3050, 26.981538, 28.0855, 30.973761,
    /* S  */ 32.065, 35.453, 39.948, 39.0983, 40.078, 44.955910,
    /* Ti */ 47.867, 50.9415, 51.9961, 54.938049, 55.845, 58.9332,
    /* Ni */ 58.6934, 63.546, 65.409,
];

/// Van der Waals radii (index is atomic number).
/// Taken from A. Bondi, J. Phys. Chem., 68, 441-452, 1964.
/// Unknown and metals without a Bondi value default to 2.0.
pub const ELEMENT_VDW: [f32; NUM_ELEMENTS] = [
    /* X  */ 2.0, 1.2, 1.4, 1.82, 2.0, 2.0,
    /* C  */ 1.7, 1.55, 1.52, 1.47, 1.54,
    /* Na */ 2.27, 1.73, 2.0, 2.1, 1.8,
    /* S  */ 1.8, 1.75, 1.88, 2.75, 2.0, 2.0,
    /* Ti */ 2.0, 2.0, 2.0, 2.0, 2.0, 2.0,
    /* Ni */ 1.63, 1.4, 1.39,
];
