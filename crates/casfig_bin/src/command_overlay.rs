use crate::load::load_pair;
use anyhow::{Context, Result};
use casfig::prelude::*;
use casfig::session::{Session, SessionObject, ViewState};
use clap::Args;
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct OverlayArgs {
    /// Two structure files (reference first), or a single multi-model
    /// overlay file
    #[arg(short, num_args = 1..=2, required = true)]
    pub files: Vec<String>,
    /// Display names for the structures, reference first. Known nuclease
    /// names (SpCas9, FnCas9, FnCas12a) pick the built-in domain scheme
    #[arg(short, long, num_args = 0..=2)]
    pub names: Vec<String>,
    /// Output directory for the view set and side artifacts
    #[arg(short, default_value = "results/pymol")]
    pub outdir: String,
    /// Main overview image
    #[arg(short = 'O', long, default_value = "results/pymol/overlay.png")]
    pub output: String,
    /// Domain scheme TOML files overriding the presets, reference first
    #[arg(long, num_args = 0..=2)]
    pub schemes: Vec<String>,
}

fn scheme_for(structure: &Structure, file: Option<&String>, fallback: &str) -> Result<DomainScheme> {
    if let Some(path) = file {
        return DomainScheme::from_toml_file(path)
            .with_context(|| format!("loading scheme '{path}'"));
    }
    Ok(DomainScheme::preset(structure.name())
        .unwrap_or_else(|| DomainScheme::plain(structure.name(), fallback)))
}

fn stats_table(sup: &Superposition) -> comfy_table::Table {
    use comfy_table::modifiers::UTF8_ROUND_CORNERS;
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::Table;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Metric".to_string(), "Value".to_string()])
        .add_row(vec!["RMSD".to_string(), format!("{:.2} \u{212B}", sup.rmsd)])
        .add_row(vec!["TM-score".to_string(), format!("{:.3}", sup.tm_score)])
        .add_row(vec!["Aligned residues".to_string(), sup.n_aligned.to_string()])
        .add_row(vec![
            "Sequence identity".to_string(),
            format!("{:.1}%", sup.seq_identity),
        ])
        .add_row(vec![
            "Structural alignment".to_string(),
            if sup.is_confident() { "yes" } else { "no" }.to_string(),
        ]);
    table
}

fn annotation_text(
    reference: &Structure,
    mobile: &Structure,
    ref_scheme: &DomainScheme,
    mob_scheme: &DomainScheme,
    sup: &Superposition,
) -> String {
    let mut text = format!(
        "{} vs {}\n{}\n\nDomain windows:\n",
        reference.name(),
        mobile.name(),
        sup.summary()
    );
    for (name, scheme) in [
        (reference.name(), ref_scheme),
        (mobile.name(), mob_scheme),
    ] {
        for d in &scheme.domains {
            text.push_str(&format!("  {} {}: {}\n", name, d.label, d.select));
        }
        for s in &scheme.sites {
            text.push_str(&format!("  {} {}: {}\n", name, s.label, s.select));
        }
    }
    text
}

pub fn command_overlay(args: &OverlayArgs) -> Result<()> {
    let (reference, mobile) = load_pair(&args.files, &args.names)?;

    // Superpose the mobile structure onto the reference; a poor fit is
    // reported, not fatal
    let sup = superpose(&mobile, &reference)?;
    info!(
        "Alignment RMSD: {:.2} \u{212B} over {} residues",
        sup.rmsd, sup.n_aligned
    );
    if !sup.is_confident() {
        warn!("{}", sup.summary());
    }
    println!("{}", stats_table(&sup));

    let mobile = mobile.transformed(&sup.transform);

    let ref_scheme = scheme_for(&reference, args.schemes.first(), "firebrick")?;
    let mob_scheme = scheme_for(&mobile, args.schemes.get(1), "marine")?;

    let views_dir = PathBuf::from(&args.outdir).join("views");
    std::fs::create_dir_all(&views_dir)
        .with_context(|| format!("creating '{}'", views_dir.display()))?;

    let base_cam = Camera::orient(
        reference.iter_pos().chain(mobile.iter_pos()),
        ZOOM_BUFFER,
    )?;
    let settings = RenderSettings::new(STILL_WIDTH, STILL_HEIGHT);

    // Base-colored overlay for the front/side/top set
    let plain_prims = PrimitiveCollector::new()
        .collect_tube(&reference, &ref_scheme.paint_plain(&reference)?)
        .collect_tube(&mobile, &mob_scheme.paint_plain(&mobile)?)
        .build();

    for (view_name, cam) in still_views(&base_cam) {
        let path = views_dir.join(format!("{view_name}_view.png"));
        render_to_png(&plain_prims, &cam, &settings, &path)?;
        info!("Rendered {}", path.display());
    }

    // Domain-colored view
    let domain_prims = PrimitiveCollector::new()
        .collect_tube(&reference, &ref_scheme.paint(&reference)?)
        .collect_tube(&mobile, &mob_scheme.paint(&mobile)?)
        .build();
    let domains_path = views_dir.join("domains_colored.png");
    render_to_png(&domain_prims, &base_cam, &settings, &domains_path)?;
    info!("Rendered {}", domains_path.display());

    // Active-site close-up: catalytic residues as sticks. Schemes without
    // a catalytic site just skip this view
    render_active_site(
        &reference,
        &mobile,
        &ref_scheme,
        &mob_scheme,
        &base_cam,
        &settings,
        &views_dir,
    )?;

    // Main overview with a slight turn for depth
    let overview_cam = base_cam.turned(Axis::Y, 15.0);
    let output = Path::new(&args.output);
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    render_to_png(&plain_prims, &overview_cam, &settings, output)?;
    info!("Rendered {}", output.display());

    // Side artifacts: aligned overlay PDB, annotations, session
    let overlay_pdb = PathBuf::from(&args.outdir).join("overlay_aligned.pdb");
    casfig::io::write_overlay(&overlay_pdb, &[&reference, &mobile])?;
    info!("Wrote {}", overlay_pdb.display());

    let notes = PathBuf::from(&args.outdir).join("annotations.txt");
    std::fs::write(
        &notes,
        annotation_text(&reference, &mobile, &ref_scheme, &mob_scheme, &sup),
    )?;
    info!("Wrote {}", notes.display());

    let session = Session {
        objects: vec![
            SessionObject {
                name: reference.name().to_string(),
                path: args.files.first().cloned().unwrap_or_default(),
                color: ref_scheme.base.clone(),
                scheme: DomainScheme::preset(reference.name()).map(|s| s.protein),
            },
            SessionObject {
                name: mobile.name().to_string(),
                path: args.files.get(1).cloned().unwrap_or_default(),
                color: mob_scheme.base.clone(),
                scheme: DomainScheme::preset(mobile.name()).map(|s| s.protein),
            },
        ],
        view: ViewState::from_camera(&base_cam),
    };
    let session_path = PathBuf::from(&args.outdir).join("session.cfs");
    session.save(&session_path)?;
    info!("Saved session {}", session_path.display());

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn render_active_site(
    reference: &Structure,
    mobile: &Structure,
    ref_scheme: &DomainScheme,
    mob_scheme: &DomainScheme,
    base_cam: &Camera,
    settings: &RenderSettings,
    views_dir: &Path,
) -> Result<()> {
    let ref_site = ref_scheme.site("catalytic");
    let mob_site = mob_scheme.site("catalytic");
    if ref_site.is_none() && mob_site.is_none() {
        warn!("no catalytic site defined for either structure, skipping active-site view");
        return Ok(());
    }

    let mut site_points: Vec<Pos> = vec![];
    let mut collector = PrimitiveCollector::new()
        .collect_tube(reference, &ref_scheme.paint_plain(reference)?)
        .collect_tube(mobile, &mob_scheme.paint_plain(mobile)?);

    for (structure, site, color_name) in [
        (reference, ref_site, "yellow"),
        (mobile, mob_site, "cyan"),
    ] {
        if let Some(site) = site {
            let sel = structure.select(&site.select)?;
            if sel.is_empty() {
                warn!(
                    "catalytic selection '{}' matches nothing in {}",
                    site.select,
                    structure.name()
                );
                continue;
            }
            site_points.extend(sel.iter_pos().copied());
            let color = Color::named(color_name)
                .unwrap_or(Color::WHITE);
            collector = collector.collect_sticks(structure, sel.indices(), color);
        }
    }

    if site_points.is_empty() {
        warn!("catalytic selections are all empty, skipping active-site view");
        return Ok(());
    }

    let mut cam = base_cam.clone();
    cam.zoom_on(site_points.iter(), ACTIVE_SITE_BUFFER)?;
    let path = views_dir.join("active_site_zoom.png");
    render_to_png(&collector.build(), &cam, settings, &path)?;
    info!("Rendered {}", path.display());
    Ok(())
}
