use anyhow::{bail, Context, Result};
use casfig::io::PdbFileHandler;
use casfig::prelude::Structure;
use log::info;

/// Loads a comparison pair: either two single-model PDB files (reference
/// first) or one multi-model overlay file where model 1 is the reference
/// and model 2 the mobile structure. Optional display names are applied
/// reference-first.
pub(crate) fn load_pair(files: &[String], names: &[String]) -> Result<(Structure, Structure)> {
    let (mut reference, mut mobile) = match files {
        [overlay] => {
            let mut structs = PdbFileHandler::open(overlay)?
                .read_structures()
                .with_context(|| format!("loading overlay '{overlay}'"))?;
            if structs.len() < 2 {
                bail!("overlay file '{overlay}' contains a single model; pass two files instead");
            }
            let mobile = structs.swap_remove(1);
            let reference = structs.swap_remove(0);
            info!("Loaded overlay models from {overlay}");
            (reference, mobile)
        }
        [ref_file, mob_file] => {
            let reference = PdbFileHandler::open(ref_file)?
                .read_structure()
                .with_context(|| format!("loading reference '{ref_file}'"))?;
            let mobile = PdbFileHandler::open(mob_file)?
                .read_structure()
                .with_context(|| format!("loading mobile '{mob_file}'"))?;
            info!("Reference loaded from {ref_file}");
            info!("Mobile loaded from {mob_file}");
            (reference, mobile)
        }
        _ => bail!("expected one overlay file or two structure files"),
    };

    if let Some(name) = names.first() {
        reference.set_name(name.clone());
    }
    if let Some(name) = names.get(1) {
        mobile.set_name(name.clone());
    }
    info!(
        "Structures: {} ({} atoms), {} ({} atoms)",
        reference.name(),
        reference.len(),
        mobile.name(),
        mobile.len()
    );
    Ok((reference, mobile))
}
