//! Built-in ellipsoid-shell generator
//!
//! A small parametric scaffold: an ellipsoid surface tessellated on a
//! latitude/longitude grid, plus outline circles tracing its principal
//! sections. The export follows the service's resource convention: the first
//! blob is a JSON array of per-graphics metadata objects, the remaining
//! blobs carry the corresponding payloads in the same order.

use std::f64::consts::PI;

use serde::Serialize;

use crate::options::{MeshOptions, OptionValue};
use crate::{Blob, GeneratorError, MeshGenerator};

const OPT_ELEMENTS_UP: &str = "Number of elements up";
const OPT_ELEMENTS_AROUND: &str = "Number of elements around";
const OPT_LONG_AXIS: &str = "Long axis length";
const OPT_SHORT_AXIS: &str = "Short axis length";
const OPT_CROSS_DERIVATIVES: &str = "Use cross derivatives";

/// Ellipsoid shell scaffold generator.
///
/// The two axis lengths given at construction become the option defaults, so
/// one implementation serves several registered mesh types (a sphere shell
/// and an elongated ventricle-like shell differ only in their defaults).
#[derive(Debug, Clone)]
pub struct EllipsoidShellGenerator {
    long_axis: f64,
    short_axis: f64,
}

/// Surface payload: indexed triangle mesh, CCW winding viewed from outside.
#[derive(Debug, Serialize)]
struct SurfacePayload {
    vertices: Vec<[f64; 3]>,
    faces: Vec<[u32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    normals: Option<Vec<[f64; 3]>>,
}

/// Lines payload: closed outline polylines.
#[derive(Debug, Serialize)]
struct LinesPayload {
    polylines: Vec<Vec<[f64; 3]>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct GraphicsEntry {
    #[serde(rename = "Type")]
    kind: &'static str,
    material_name: &'static str,
    vertices_count: usize,
    faces_count: usize,
}

impl EllipsoidShellGenerator {
    pub fn new(long_axis: f64, short_axis: f64) -> Self {
        Self {
            long_axis,
            short_axis,
        }
    }

    /// Unit sphere shell.
    pub fn sphere() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Elongated shell roughly proportioned like a ventricle chamber.
    pub fn ventricle() -> Self {
        Self::new(1.4, 0.8)
    }
}

fn shell_point(long_axis: f64, short_axis: f64, theta: f64, phi: f64) -> [f64; 3] {
    [
        short_axis * theta.sin() * phi.cos(),
        short_axis * theta.sin() * phi.sin(),
        long_axis * theta.cos(),
    ]
}

fn shell_surface(
    long_axis: f64,
    short_axis: f64,
    elements_up: u32,
    elements_around: u32,
    with_normals: bool,
) -> SurfacePayload {
    let rows = elements_up + 1;
    let mut vertices = Vec::with_capacity((rows * elements_around) as usize);
    for i in 0..rows {
        let theta = PI * f64::from(i) / f64::from(elements_up);
        for j in 0..elements_around {
            let phi = 2.0 * PI * f64::from(j) / f64::from(elements_around);
            vertices.push(shell_point(long_axis, short_axis, theta, phi));
        }
    }

    let mut faces = Vec::with_capacity((elements_up * elements_around * 2) as usize);
    for i in 0..elements_up {
        for j in 0..elements_around {
            let next_j = (j + 1) % elements_around;
            let a = i * elements_around + j;
            let b = i * elements_around + next_j;
            let c = (i + 1) * elements_around + j;
            let d = (i + 1) * elements_around + next_j;
            faces.push([a, c, d]);
            faces.push([a, d, b]);
        }
    }

    let normals = with_normals.then(|| {
        vertices
            .iter()
            .map(|&[x, y, z]| {
                // Ellipsoid gradient direction, normalized.
                let nx = x / (short_axis * short_axis);
                let ny = y / (short_axis * short_axis);
                let nz = z / (long_axis * long_axis);
                let len = (nx * nx + ny * ny + nz * nz).sqrt().max(f64::MIN_POSITIVE);
                [nx / len, ny / len, nz / len]
            })
            .collect()
    });

    SurfacePayload {
        vertices,
        faces,
        normals,
    }
}

fn shell_outlines(long_axis: f64, short_axis: f64, segments: u32) -> LinesPayload {
    let closed_circle = |point_at: &dyn Fn(f64) -> [f64; 3]| -> Vec<[f64; 3]> {
        let mut points: Vec<[f64; 3]> = (0..segments)
            .map(|k| point_at(2.0 * PI * f64::from(k) / f64::from(segments)))
            .collect();
        points.push(points[0]);
        points
    };

    // Principal sections: equator plus the two meridian great circles.
    let equator = closed_circle(&|t: f64| [short_axis * t.cos(), short_axis * t.sin(), 0.0]);
    let meridian_xz = closed_circle(&|t: f64| [short_axis * t.sin(), 0.0, long_axis * t.cos()]);
    let meridian_yz = closed_circle(&|t: f64| [0.0, short_axis * t.sin(), long_axis * t.cos()]);

    LinesPayload {
        polylines: vec![equator, meridian_xz, meridian_yz],
    }
}

impl MeshGenerator for EllipsoidShellGenerator {
    fn default_options(&self) -> MeshOptions {
        let mut options = MeshOptions::new();
        options.insert(OPT_ELEMENTS_UP.to_string(), OptionValue::Int(8));
        options.insert(OPT_ELEMENTS_AROUND.to_string(), OptionValue::Int(12));
        options.insert(
            OPT_LONG_AXIS.to_string(),
            OptionValue::Float(self.long_axis),
        );
        options.insert(
            OPT_SHORT_AXIS.to_string(),
            OptionValue::Float(self.short_axis),
        );
        options.insert(
            OPT_CROSS_DERIVATIVES.to_string(),
            OptionValue::Bool(false),
        );
        options
    }

    fn generate(&self, options: &MeshOptions) -> Result<Vec<Blob>, GeneratorError> {
        let elements_up = int_option(options, OPT_ELEMENTS_UP)?;
        let elements_around = int_option(options, OPT_ELEMENTS_AROUND)?;
        let long_axis = float_option(options, OPT_LONG_AXIS)?;
        let short_axis = float_option(options, OPT_SHORT_AXIS)?;
        let with_normals = bool_option(options, OPT_CROSS_DERIVATIVES)?;

        let elements_up = bounded(OPT_ELEMENTS_UP, elements_up, 2, 256)?;
        let elements_around = bounded(OPT_ELEMENTS_AROUND, elements_around, 3, 256)?;
        positive(OPT_LONG_AXIS, long_axis)?;
        positive(OPT_SHORT_AXIS, short_axis)?;

        let surface = shell_surface(
            long_axis,
            short_axis,
            elements_up,
            elements_around,
            with_normals,
        );
        let lines = shell_outlines(long_axis, short_axis, elements_around);

        let metadata = vec![
            GraphicsEntry {
                kind: "Surfaces",
                material_name: "muscle",
                vertices_count: surface.vertices.len(),
                faces_count: surface.faces.len(),
            },
            GraphicsEntry {
                kind: "Lines",
                material_name: "copper",
                vertices_count: lines.polylines.iter().map(Vec::len).sum(),
                faces_count: 0,
            },
        ];

        tracing::debug!(
            vertices = surface.vertices.len(),
            faces = surface.faces.len(),
            polylines = lines.polylines.len(),
            "Generated ellipsoid shell"
        );

        Ok(vec![
            serde_json::to_vec(&metadata)?,
            serde_json::to_vec(&surface)?,
            serde_json::to_vec(&lines)?,
        ])
    }
}

fn int_option(options: &MeshOptions, name: &str) -> Result<i64, GeneratorError> {
    options
        .get(name)
        .and_then(OptionValue::as_i64)
        .ok_or_else(|| {
            GeneratorError::Generation(format!("merged options missing integer '{}'", name))
        })
}

fn float_option(options: &MeshOptions, name: &str) -> Result<f64, GeneratorError> {
    options
        .get(name)
        .and_then(OptionValue::as_f64)
        .ok_or_else(|| {
            GeneratorError::Generation(format!("merged options missing float '{}'", name))
        })
}

fn bool_option(options: &MeshOptions, name: &str) -> Result<bool, GeneratorError> {
    options
        .get(name)
        .and_then(OptionValue::as_bool)
        .ok_or_else(|| {
            GeneratorError::Generation(format!("merged options missing boolean '{}'", name))
        })
}

fn bounded(name: &str, value: i64, min: i64, max: i64) -> Result<u32, GeneratorError> {
    if value < min || value > max {
        return Err(GeneratorError::InvalidValue {
            name: name.to_string(),
            reason: format!("must be between {} and {}", min, max),
        });
    }
    Ok(value as u32)
}

fn positive(name: &str, value: f64) -> Result<(), GeneratorError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GeneratorError::InvalidValue {
            name: name.to_string(),
            reason: "must be a positive finite length".to_string(),
        })
    }
}
