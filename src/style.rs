mod color;
mod domains;

pub use color::Color;
pub use domains::{DomainRule, DomainScheme, SiteRule, StyleError};
