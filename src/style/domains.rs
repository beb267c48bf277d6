use super::Color;
use crate::core::{SelectionParserError, Structure};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StyleError {
    #[error("unknown color name '{0}'")]
    UnknownColor(String),
    #[error(transparent)]
    Selection(#[from] SelectionParserError),
    #[error("can't access scheme file '{0}'")]
    Io(String, #[source] std::io::Error),
    #[error("bad scheme file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// One colored region: a label, a selection and a color name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRule {
    pub label: String,
    pub select: String,
    pub color: String,
}

/// A named site used for camera targeting (active sites, nuclease
/// domains); not painted by itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteRule {
    pub label: String,
    pub select: String,
}

/// Domain coloring scheme for one protein.
///
/// The residue windows are literature-sourced constants, not derived from
/// the structure, and are deliberately not validated against the actual
/// sequence length: a window past the last residue just matches nothing.
///
/// Schemes can also be loaded from TOML:
///
/// ```toml
/// protein = "SpCas9"
/// base = "firebrick"
///
/// [[domains]]
/// label = "REC lobe"
/// select = "resi 1-500"
/// color = "salmon"
///
/// [[sites]]
/// label = "catalytic"
/// select = "resi 10+840+863+866+986"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainScheme {
    pub protein: String,
    /// Base color applied to every residue before domain rules.
    pub base: String,
    #[serde(default)]
    pub domains: Vec<DomainRule>,
    #[serde(default)]
    pub sites: Vec<SiteRule>,
}

impl DomainScheme {
    /// Built-in scheme for one of the compared nucleases.
    /// Residue windows follow the published domain boundaries.
    pub fn preset(protein: &str) -> Option<Self> {
        match protein {
            "SpCas9" => Some(Self {
                protein: protein.to_string(),
                base: "firebrick".to_string(),
                domains: vec![
                    rule("REC lobe", "resi 1-500", "salmon"),
                    rule("NUC lobe", "resi 501-1362", "tv_red"),
                ],
                sites: vec![
                    site("RuvC", "resi 1-180 or resi 500-800"),
                    site("HNH", "resi 800-1000"),
                    site("catalytic", "resi 10+840+863+866+986"),
                ],
            }),
            "FnCas9" => Some(Self {
                protein: protein.to_string(),
                base: "firebrick".to_string(),
                domains: vec![
                    rule("REC lobe", "resi 1-500", "salmon"),
                    rule("NUC lobe", "resi 501-1455", "tv_red"),
                ],
                sites: vec![
                    site("RuvC", "resi 1-200 or resi 500-800"),
                    site("HNH", "resi 800-1000"),
                    site("catalytic", "resi 10+840+863+866+986"),
                ],
            }),
            "FnCas12a" => Some(Self {
                protein: protein.to_string(),
                base: "marine".to_string(),
                domains: vec![
                    rule("REC", "resi 1-600", "lightblue"),
                    rule("NUC", "resi 601-1282", "tv_blue"),
                ],
                sites: vec![
                    site("RuvC-like", "resi 800-1100"),
                    site("catalytic", "resi 908+911+1226"),
                ],
            }),
            _ => None,
        }
    }

    /// A minimal scheme with just a base color and no domain windows.
    pub fn plain(protein: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            protein: protein.into(),
            base: base.into(),
            domains: vec![],
            sites: vec![],
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, StyleError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, StyleError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| StyleError::Io(path.display().to_string(), e))?;
        Self::from_toml_str(&s)
    }

    pub fn base_color(&self) -> Result<Color, StyleError> {
        Color::named(&self.base).ok_or_else(|| StyleError::UnknownColor(self.base.clone()))
    }

    pub fn site(&self, label: &str) -> Option<&SiteRule> {
        self.sites.iter().find(|s| s.label == label)
    }

    /// Assigns a display color to every atom of the structure: the base
    /// color first, then each domain rule in list order. An atom covered
    /// by several rules ends up with the color of the last matching one.
    pub fn paint(&self, structure: &Structure) -> Result<Vec<Color>, StyleError> {
        let mut colors = vec![self.base_color()?; structure.len()];
        for r in &self.domains {
            let c =
                Color::named(&r.color).ok_or_else(|| StyleError::UnknownColor(r.color.clone()))?;
            let sel = structure.select(&r.select)?;
            for i in sel.indices() {
                colors[*i] = c;
            }
        }
        Ok(colors)
    }

    /// Base-color-only painting for overview renders.
    pub fn paint_plain(&self, structure: &Structure) -> Result<Vec<Color>, StyleError> {
        Ok(vec![self.base_color()?; structure.len()])
    }
}

fn rule(label: &str, select: &str, color: &str) -> DomainRule {
    DomainRule {
        label: label.to_string(),
        select: select.to_string(),
        color: color.to_string(),
    }
}

fn site(label: &str, select: &str) -> SiteRule {
    SiteRule {
        label: label.to_string(),
        select: select.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Atom, Pos};

    fn chain(n: usize) -> Structure {
        let mut atoms = vec![];
        let mut coords = vec![];
        for i in 0..n {
            atoms.push(Atom {
                name: "CA".to_string(),
                resname: "ALA".to_string(),
                resid: i as i32 + 1,
                chain: 'A',
                ..Default::default()
            });
            coords.push(Pos::new(i as f32 * 3.8, 0.0, 0.0));
        }
        Structure::new("chain", atoms, coords).unwrap()
    }

    #[test]
    fn test_last_write_wins_on_overlap() -> Result<(), StyleError> {
        let s = chain(300);
        let scheme = DomainScheme {
            protein: "test".to_string(),
            base: "white".to_string(),
            domains: vec![
                rule("first", "resi 1-200", "red"),
                rule("second", "resi 150-300", "blue"),
            ],
            sites: vec![],
        };
        let colors = scheme.paint(&s)?;
        // Residues 150-200 are covered by both ranges: the later rule wins
        let blue = Color::named("blue").unwrap();
        let red = Color::named("red").unwrap();
        assert_eq!(colors[148], red); // resid 149
        assert_eq!(colors[149], blue); // resid 150
        assert_eq!(colors[199], blue); // resid 200
        assert_eq!(colors[249], blue); // resid 250
        Ok(())
    }

    #[test]
    fn test_out_of_range_window_is_silent() -> Result<(), StyleError> {
        let s = chain(50);
        let scheme = DomainScheme {
            protein: "test".to_string(),
            base: "white".to_string(),
            domains: vec![rule("ghost", "resi 800-1100", "red")],
            sites: vec![],
        };
        let colors = scheme.paint(&s)?;
        assert!(colors.iter().all(|c| *c == Color::WHITE));
        Ok(())
    }

    #[test]
    fn test_unknown_color_is_an_error() {
        let s = chain(5);
        let scheme = DomainScheme::plain("test", "no_such_color");
        assert!(matches!(
            scheme.paint(&s),
            Err(StyleError::UnknownColor(_))
        ));
    }

    #[test]
    fn test_presets_parse() -> Result<(), StyleError> {
        for name in ["SpCas9", "FnCas9", "FnCas12a"] {
            let scheme = DomainScheme::preset(name).unwrap();
            scheme.base_color()?;
            let s = chain(10);
            scheme.paint(&s)?;
            assert!(scheme.site("catalytic").is_some());
        }
        assert!(DomainScheme::preset("AsCas12b").is_none());
        Ok(())
    }

    #[test]
    fn test_toml_roundtrip() -> Result<(), StyleError> {
        let text = r#"
            protein = "SpCas9"
            base = "firebrick"

            [[domains]]
            label = "REC lobe"
            select = "resi 1-500"
            color = "salmon"

            [[sites]]
            label = "catalytic"
            select = "resi 10+840"
        "#;
        let scheme = DomainScheme::from_toml_str(text)?;
        assert_eq!(scheme.protein, "SpCas9");
        assert_eq!(scheme.domains.len(), 1);
        assert_eq!(scheme.site("catalytic").unwrap().select, "resi 10+840");
        Ok(())
    }
}
