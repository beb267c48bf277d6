pub mod align;
pub mod core;
pub mod figure;
pub mod io;
pub mod render;
pub mod session;
pub mod style;
pub mod view;

pub mod prelude {
    pub use crate::align::*;
    pub use crate::core::*;
    pub use crate::figure::*;
    pub use crate::io::*;
    pub use crate::render::*;
    pub use crate::session::*;
    pub use crate::style::*;
    pub use crate::view::*;
}

pub fn greeting(tool: &str) {
    use comfy_table::modifiers::UTF8_ROUND_CORNERS;
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Attribute, Cell, Table};

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .add_row(vec![Cell::new("CasFig - CRISPR nuclease comparison figures")
            .add_attributes(vec![Attribute::Bold])])
        .add_row(vec![format!(
            "{}\n{}",
            env!("CARGO_PKG_HOMEPAGE"),
            env!("CARGO_PKG_AUTHORS")
        )])
        .add_row(vec![format!("CasFig version: {}", env!("CARGO_PKG_VERSION"))])
        .add_row(vec![format!("Tool: {tool}")]);
    println!("{table}");
}
