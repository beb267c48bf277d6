use anyhow::Result;
use casfig::figure::composite_panel;
use log::info;
use std::path::PathBuf;

/// The four views every overlay run renders. A missing one downgrades the
/// panel to a warning; partial success is normal here.
const PANEL_VIEWS: [&str; 4] = [
    "front_view.png",
    "side_view.png",
    "top_view.png",
    "domains_colored.png",
];

pub fn command_panel(views_dir: &str, output: &str) -> Result<()> {
    let dir = PathBuf::from(views_dir);
    let paths: Vec<PathBuf> = PANEL_VIEWS.iter().map(|v| dir.join(v)).collect();
    let inputs = [
        ("front", paths[0].as_path()),
        ("side", paths[1].as_path()),
        ("top", paths[2].as_path()),
        ("domains", paths[3].as_path()),
    ];
    if composite_panel(&inputs, output)? {
        info!("Panel written to {output}");
    }
    Ok(())
}
