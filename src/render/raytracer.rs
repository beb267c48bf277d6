use super::{Cylinder, Primitives, Sphere};
use crate::core::{Pos, Vector3f};
use crate::style::Color;
use crate::view::Camera;
use image::RgbaImage;
use log::debug;
use rayon::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no primitives to render")]
    NoPrimitives,
    #[error("pixel buffer size mismatch")]
    BufferSize,
    #[error("can't write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Rasterizer settings. The lighting defaults are the ones the overlay
/// figures are rendered with: soft ambient, mild specular, shadows off,
/// white background.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Ambient light intensity.
    pub ambient: f32,
    /// Direct (diffuse) light intensity.
    pub direct: f32,
    /// Specular intensity.
    pub specular: f32,
    /// Specular shininess exponent.
    pub shininess: f32,
    /// Light direction in view space, pointing from the surface toward
    /// the light.
    pub light_dir: Vector3f,
    /// Background color.
    pub bg_color: Color,
    /// Occlusion shadows toward the light.
    pub shadows: bool,
}

impl RenderSettings {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ambient: 0.4,
            direct: 0.6,
            specular: 0.2,
            shininess: 40.0,
            light_dir: Vector3f::new(-0.4, 0.4, 1.0).normalize(),
            bg_color: Color::WHITE,
            shadows: false,
        }
    }
}

// View-space copies of the primitives; rays then run along -z and the
// sphere test collapses to a 2D distance check.
struct ViewScene {
    spheres: Vec<Sphere>,
    cylinders: Vec<Cylinder>,
    z_far: f32,
}

impl ViewScene {
    fn new(prims: &Primitives, camera: &Camera) -> Self {
        let spheres: Vec<Sphere> = prims
            .spheres
            .iter()
            .map(|s| Sphere {
                center: camera.world_to_view(&s.center),
                ..*s
            })
            .collect();
        let cylinders: Vec<Cylinder> = prims
            .cylinders
            .iter()
            .map(|c| Cylinder {
                a: camera.world_to_view(&c.a),
                b: camera.world_to_view(&c.b),
                ..*c
            })
            .collect();
        let z_far = spheres
            .iter()
            .map(|s| s.center.z + s.radius)
            .chain(
                cylinders
                    .iter()
                    .flat_map(|c| [c.a.z + c.radius, c.b.z + c.radius]),
            )
            .fold(f32::NEG_INFINITY, f32::max);
        Self {
            spheres,
            cylinders,
            z_far,
        }
    }
}

struct Hit {
    z: f32,
    normal: Vector3f,
    color: Color,
}

// Sphere hit for a -z ray through (x, y): pure 2D footprint test.
fn hit_sphere(s: &Sphere, x: f32, y: f32) -> Option<Hit> {
    let dx = x - s.center.x;
    let dy = y - s.center.y;
    let rr = s.radius * s.radius - dx * dx - dy * dy;
    if rr <= 0.0 {
        return None;
    }
    let dz = rr.sqrt();
    let z = s.center.z + dz;
    Some(Hit {
        z,
        normal: Vector3f::new(dx, dy, dz) / s.radius,
        color: s.color,
    })
}

// Cylinder hit for a -z ray: quadratic on the axis-perpendicular
// components, clamped to the finite segment (caps come from the joint
// spheres).
fn hit_cylinder(c: &Cylinder, x: f32, y: f32) -> Option<Hit> {
    let axis = c.b - c.a;
    let len = axis.norm();
    if len < 1e-6 {
        return None;
    }
    let u = axis / len;
    let d = Vector3f::new(0.0, 0.0, -1.0);
    let o = Pos::new(x, y, 0.0) - c.a;

    let d_perp = d - u * d.dot(&u);
    let o_perp = o - u * o.dot(&u);

    let aa = d_perp.dot(&d_perp);
    if aa < 1e-10 {
        // Ray parallel to the axis
        return None;
    }
    let bb = 2.0 * o_perp.dot(&d_perp);
    let cc = o_perp.dot(&o_perp) - c.radius * c.radius;
    let disc = bb * bb - 4.0 * aa * cc;
    if disc <= 0.0 {
        return None;
    }
    // The smaller t is the surface facing the camera (ray runs along -z,
    // so smaller t means larger z)
    let t = (-bb - disc.sqrt()) / (2.0 * aa);
    let hit = Pos::new(x, y, -t);
    let s = (hit - c.a).dot(&u);
    if s < 0.0 || s > len {
        return None;
    }
    let on_axis = c.a + u * s;
    Some(Hit {
        z: hit.z,
        normal: (hit - on_axis) / c.radius,
        color: c.color,
    })
}

fn closest_hit(scene: &ViewScene, x: f32, y: f32) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    for s in &scene.spheres {
        if let Some(h) = hit_sphere(s, x, y) {
            if best.as_ref().map_or(true, |b| h.z > b.z) {
                best = Some(h);
            }
        }
    }
    for c in &scene.cylinders {
        if let Some(h) = hit_cylinder(c, x, y) {
            if best.as_ref().map_or(true, |b| h.z > b.z) {
                best = Some(h);
            }
        }
    }
    best
}

// Occlusion test along the light direction, used only when shadows are on.
fn occluded(scene: &ViewScene, p: &Pos, light_dir: &Vector3f) -> bool {
    // March the shadow ray out of the scene in fixed steps; coarse but
    // only the silhouette matters at figure resolution
    let steps = 64;
    let span = (scene.z_far - p.z).abs().max(1.0) * 2.0;
    for k in 1..=steps {
        let q = *p + light_dir * (span * k as f32 / steps as f32);
        for s in &scene.spheres {
            if (q - s.center).norm_squared() < s.radius * s.radius {
                return true;
            }
        }
    }
    false
}

fn shade(scene: &ViewScene, hit: &Hit, x: f32, y: f32, settings: &RenderSettings) -> [u8; 4] {
    let n = hit.normal;
    let l = settings.light_dir;
    let mut diffuse = settings.direct * n.dot(&l).max(0.0);

    if settings.shadows && diffuse > 0.0 {
        let p = Pos::new(x, y, hit.z) + n * 1e-3;
        if occluded(scene, &p, &l) {
            diffuse = 0.0;
        }
    }

    // Blinn specular against the fixed view direction +z
    let h = (l + Vector3f::new(0.0, 0.0, 1.0)).normalize();
    let spec = settings.specular * n.dot(&h).max(0.0).powf(settings.shininess);

    let k = settings.ambient + diffuse;
    let c = hit.color;
    let rgb = [
        (c.r * k + spec).clamp(0.0, 1.0),
        (c.g * k + spec).clamp(0.0, 1.0),
        (c.b * k + spec).clamp(0.0, 1.0),
    ];
    [
        (rgb[0] * 255.0).round() as u8,
        (rgb[1] * 255.0).round() as u8,
        (rgb[2] * 255.0).round() as u8,
        255,
    ]
}

/// Renders the primitives for the current camera and settings.
///
/// Blocking: returns only when the full frame is rasterized. Scanlines
/// are computed in parallel; every pixel depends only on the scene, so
/// identical inputs produce pixel-identical output.
pub fn render(
    prims: &Primitives,
    camera: &Camera,
    settings: &RenderSettings,
) -> Result<RgbaImage, RenderError> {
    if prims.is_empty() {
        return Err(RenderError::NoPrimitives);
    }
    let scene = ViewScene::new(prims, camera);

    let width = settings.width;
    let height = settings.height;
    let aspect = width as f32 / height as f32;
    let half_h = camera.half_height();
    let half_w = half_h * aspect;
    let bg = settings.bg_color.to_rgba8();

    let row_bytes = width as usize * 4;
    let mut buf = vec![0u8; row_bytes * height as usize];
    buf.par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(py, row)| {
            let y = (1.0 - 2.0 * (py as f32 + 0.5) / height as f32) * half_h;
            for px in 0..width as usize {
                let x = (2.0 * (px as f32 + 0.5) / width as f32 - 1.0) * half_w;
                let rgba = match closest_hit(&scene, x, y) {
                    Some(hit) => shade(&scene, &hit, x, y, settings),
                    None => bg,
                };
                row[px * 4..px * 4 + 4].copy_from_slice(&rgba);
            }
        });

    debug!(
        "rendered {}x{} frame, {} primitives",
        width,
        height,
        prims.len()
    );
    RgbaImage::from_raw(width, height, buf).ok_or(RenderError::BufferSize)
}

/// Renders and writes a PNG in one blocking call.
pub fn render_to_png(
    prims: &Primitives,
    camera: &Camera,
    settings: &RenderSettings,
    path: impl AsRef<Path>,
) -> Result<(), RenderError> {
    let img = render(prims, camera, settings)?;
    img.save(path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    fn single_sphere() -> Primitives {
        Primitives {
            spheres: vec![Sphere {
                center: Pos::origin(),
                radius: 1.0,
                color: Color::named("red").unwrap(),
            }],
            cylinders: vec![],
        }
    }

    fn camera() -> Camera {
        let pts = vec![Pos::new(-2.0, -2.0, -2.0), Pos::new(2.0, 2.0, 2.0)];
        Camera::orient(pts.iter(), 0.0).unwrap()
    }

    #[test]
    fn test_sphere_covers_center() -> Result<(), RenderError> {
        let img = render(&single_sphere(), &camera(), &RenderSettings::new(64, 64))?;
        let center = img.get_pixel(32, 32);
        // Red-ish sphere on white background
        assert!(center[0] > center[2]);
        let corner = img.get_pixel(0, 0);
        assert_eq!(corner.0, [255, 255, 255, 255]);
        Ok(())
    }

    #[test]
    fn test_cylinder_hit() {
        let c = Cylinder {
            a: Pos::new(-1.0, 0.0, 0.0),
            b: Pos::new(1.0, 0.0, 0.0),
            radius: 0.5,
            color: Color::WHITE,
        };
        assert!(hit_cylinder(&c, 0.0, 0.0).is_some());
        assert!(hit_cylinder(&c, 0.0, 0.6).is_none());
        // Beyond the segment end
        assert!(hit_cylinder(&c, 1.2, 0.0).is_none());
    }

    #[test]
    fn test_deterministic_output() -> Result<(), RenderError> {
        let settings = RenderSettings::new(96, 72);
        let a = render(&single_sphere(), &camera(), &settings)?;
        let b = render(&single_sphere(), &camera(), &settings)?;
        assert_eq!(a.as_raw(), b.as_raw());
        Ok(())
    }

    #[test]
    fn test_empty_scene_is_an_error() {
        let prims = Primitives::default();
        assert!(matches!(
            render(&prims, &camera(), &RenderSettings::new(8, 8)),
            Err(RenderError::NoPrimitives)
        ));
    }
}
