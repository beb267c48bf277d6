mod conservation;
mod movie;
mod panel;

pub use conservation::{conservation_figure, ConservationStats, PlotError};
pub use movie::{assemble_gif, MovieError, FRAME_DURATION_MS};
pub use panel::{composite_panel, PanelError};
