use crate::align::{conservation_profile, percent_identity, IdentityStats, MsaError};
use crate::io::FastaRecord;
use image::{Rgba, RgbaImage};
use log::info;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error(transparent)]
    Msa(#[from] MsaError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("can't write '{0}'")]
    Io(String, #[source] std::io::Error),
}

const FIG_WIDTH: u32 = 1600;
const FIG_HEIGHT: u32 = 600;
const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 40;
const MARGIN_BOTTOM: u32 = 60;

// Matplotlib's default bar blue, plot area in the light grey the
// alignment figures use
const BAR_COLOR: Rgba<u8> = Rgba([31, 119, 180, 255]);
const PLOT_BG: Rgba<u8> = Rgba([245, 245, 245, 255]);
const GRID_COLOR: Rgba<u8> = Rgba([210, 210, 210, 255]);
const AXIS_COLOR: Rgba<u8> = Rgba([60, 60, 60, 255]);

/// Summary numbers for the sidecar annotation file.
#[derive(Debug, Clone, Copy)]
pub struct ConservationStats {
    pub n_sequences: usize,
    pub alignment_length: usize,
    /// Pairwise identity; present only for two-sequence alignments.
    pub identity: Option<IdentityStats>,
}

impl ConservationStats {
    /// Caption text written next to the figure, mirroring the plot title
    /// ("N sequences, M positions") plus the identity line.
    pub fn annotation_text(&self) -> String {
        let mut text = format!(
            "Sequence conservation\n{} sequences, {} positions\n",
            self.n_sequences, self.alignment_length
        );
        if let Some(id) = self.identity {
            text.push_str(&format!(
                "Sequence identity: {:.1}% ({} / {} aligned residues)\n",
                id.percent(),
                id.matches,
                id.aligned
            ));
        }
        text
    }
}

/// Renders the per-column conservation profile of an MSA as a bar strip:
/// one bar per alignment column, height proportional to the score.
pub fn conservation_figure(
    records: &[FastaRecord],
    output: impl AsRef<Path>,
) -> Result<ConservationStats, PlotError> {
    let output = output.as_ref();
    let profile = conservation_profile(records)?;

    let plot_w = FIG_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = FIG_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let mut img = RgbaImage::from_pixel(FIG_WIDTH, FIG_HEIGHT, Rgba([255, 255, 255, 255]));

    // Plot background
    for y in MARGIN_TOP..MARGIN_TOP + plot_h {
        for x in MARGIN_LEFT..MARGIN_LEFT + plot_w {
            img.put_pixel(x, y, PLOT_BG);
        }
    }

    // Horizontal gridlines every 0.25
    for k in 1..4u32 {
        let y = MARGIN_TOP + plot_h - plot_h * k / 4;
        for x in MARGIN_LEFT..MARGIN_LEFT + plot_w {
            img.put_pixel(x, y, GRID_COLOR);
        }
    }

    // Bars, one per column; width 1.0 means adjacent columns touch
    let n = profile.len();
    for (i, score) in profile.iter().enumerate() {
        let x0 = MARGIN_LEFT + (i as u64 * plot_w as u64 / n as u64) as u32;
        let x1 = MARGIN_LEFT + (((i + 1) as u64) * plot_w as u64 / n as u64).max(1) as u32;
        let h = (*score * plot_h as f32).round() as u32;
        for x in x0..x1.max(x0 + 1).min(MARGIN_LEFT + plot_w) {
            for y in (MARGIN_TOP + plot_h - h)..(MARGIN_TOP + plot_h) {
                img.put_pixel(x, y, BAR_COLOR);
            }
        }
    }

    // Axes
    for x in MARGIN_LEFT..MARGIN_LEFT + plot_w {
        img.put_pixel(x, MARGIN_TOP + plot_h, AXIS_COLOR);
    }
    for y in MARGIN_TOP..=MARGIN_TOP + plot_h {
        img.put_pixel(MARGIN_LEFT - 1, y, AXIS_COLOR);
    }

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| PlotError::Io(output.display().to_string(), e))?;
    }
    img.save(output)?;
    info!("Alignment plot saved to {}", output.display());

    let identity = if records.len() == 2 {
        Some(percent_identity(&records[0].seq, &records[1].seq)?)
    } else {
        None
    };

    Ok(ConservationStats {
        n_sequences: records.len(),
        alignment_length: profile.len(),
        identity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, seq: &str) -> FastaRecord {
        FastaRecord {
            id: id.to_string(),
            seq: seq.to_string(),
        }
    }

    #[test]
    fn test_figure_and_stats() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join("casfig_conservation");
        std::fs::create_dir_all(&dir)?;
        let out = dir.join("plot.png");

        let records = vec![rec("a", "MKLVAG-T"), rec("b", "MKIVAG-A")];
        let stats = conservation_figure(&records, &out)?;
        assert_eq!(stats.n_sequences, 2);
        assert_eq!(stats.alignment_length, 8);
        let id = stats.identity.unwrap();
        // 7 aligned columns (one all-gap), 5 identical
        assert_eq!(id.aligned, 7);
        assert_eq!(id.matches, 5);

        let img = image::open(&out)?;
        assert_eq!(img.width(), 1600);
        assert_eq!(img.height(), 600);
        assert!(stats.annotation_text().contains("2 sequences"));
        std::fs::remove_dir_all(&dir).ok();
        Ok(())
    }

    #[test]
    fn test_single_sequence_is_an_error() {
        let out = std::env::temp_dir().join("casfig_conservation_single.png");
        let res = conservation_figure(&[rec("a", "MKL")], &out);
        assert!(matches!(res, Err(PlotError::Msa(_))));
    }
}
