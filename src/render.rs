mod primitive;
mod raytracer;

pub use primitive::{Cylinder, PrimitiveCollector, Primitives, Sphere};
pub use raytracer::{render, render_to_png, RenderError, RenderSettings};
