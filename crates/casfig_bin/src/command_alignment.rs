use anyhow::{Context, Result};
use casfig::figure::conservation_figure;
use casfig::io::FastaFileHandler;
use log::info;
use std::path::Path;

pub fn command_alignment(input: &str, output: &str) -> Result<()> {
    let records = FastaFileHandler::open(input)?
        .read_records()
        .with_context(|| format!("reading alignment '{input}'"))?;
    info!(
        "{} sequences, {} positions",
        records.len(),
        records.first().map(|r| r.seq.len()).unwrap_or(0)
    );

    let stats = conservation_figure(&records, output)?;

    if let Some(id) = stats.identity {
        info!(
            "Sequence identity: {:.1}% ({} / {} aligned residues)",
            id.percent(),
            id.matches,
            id.aligned
        );
    }

    // Numeric annotations go next to the figure; the plot itself carries
    // no text
    let sidecar = Path::new(output).with_extension("txt");
    std::fs::write(&sidecar, stats.annotation_text())
        .with_context(|| format!("writing '{}'", sidecar.display()))?;
    info!("Wrote {}", sidecar.display());
    Ok(())
}
