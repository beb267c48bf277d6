use anyhow::Result;
use clap::{Parser, Subcommand};

mod command_alignment;
mod command_gif;
mod command_movie;
mod command_overlay;
mod command_panel;
mod load;

use command_alignment::command_alignment;
use command_gif::command_gif;
use command_movie::command_movie;
use command_overlay::{command_overlay, OverlayArgs};
use command_panel::command_panel;

/// CasFig binary utility
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cmd {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Renders the standard comparison views of two superposed structures
    Overlay(OverlayArgs),

    /// Generates rotation movie frames for a superposed pair
    MovieFrames {
        /// Two structure files (reference first), or a single multi-model
        /// overlay file
        #[arg(short, num_args = 1..=2, required = true)]
        files: Vec<String>,
        /// Display names for the structures, reference first
        #[arg(short, long, num_args = 0..=2)]
        names: Vec<String>,
        /// Output directory for the frames
        #[arg(short, default_value = "results/pymol/movie_frames")]
        outdir: String,
    },

    /// Assembles movie frames into a looping GIF
    Gif {
        /// Directory with frame_*.png files
        #[arg(default_value = "results/pymol/movie_frames")]
        frames_dir: String,
        /// Output GIF path
        #[arg(default_value = "results/pymol/rotation.gif")]
        output: String,
        /// Per-frame display duration in milliseconds
        #[arg(long, default_value_t = 100)]
        duration_ms: u32,
    },

    /// Composes the four standard views into one 2x2 panel
    Panel {
        /// Directory with the rendered view images
        #[arg(short, default_value = "results/pymol/views")]
        views_dir: String,
        /// Output panel path
        #[arg(short, default_value = "results/pymol/annotated/composite_panel.png")]
        output: String,
    },

    /// Conservation plot and identity stats from an aligned FASTA file
    AlignmentPlot {
        /// Aligned FASTA input
        #[arg(short, default_value = "results/alignment/cas_dual_mafft.fasta")]
        input: String,
        /// Output figure path
        #[arg(short, default_value = "results/alignment/cas_dual_mafft.png")]
        output: String,
    },
}

fn main() -> Result<()> {
    env_logger::builder()
        .format_timestamp(None)
        .format_indent(Some(8))
        .filter_level(log::LevelFilter::Info)
        .init();

    let cmd = Cmd::parse();

    // Greeting
    casfig::greeting(env!("CARGO_PKG_NAME"));

    match &cmd.command {
        Commands::Overlay(args) => {
            println!("▶ Action: overlay");
            command_overlay(args)?;
        }
        Commands::MovieFrames {
            files,
            names,
            outdir,
        } => {
            println!("▶ Action: movie-frames");
            command_movie(files, names, outdir)?;
        }
        Commands::Gif {
            frames_dir,
            output,
            duration_ms,
        } => {
            println!("▶ Action: gif");
            command_gif(frames_dir, output, *duration_ms)?;
        }
        Commands::Panel { views_dir, output } => {
            println!("▶ Action: panel");
            command_panel(views_dir, output)?;
        }
        Commands::AlignmentPlot { input, output } => {
            println!("▶ Action: alignment-plot");
            command_alignment(input, output)?;
        }
    }
    Ok(())
}
