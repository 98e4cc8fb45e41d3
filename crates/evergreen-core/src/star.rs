//! Star ornament geometry
//!
//! The ornament is a five-pointed star outline built from straight line
//! segments only, then extruded into a solid with a beveled rim. Everything
//! here is plain data so it can be checked without a renderer.

use glam::{Vec2, Vec3};
use serde::Serialize;
use std::f32::consts::{FRAC_PI_2, TAU};
use thiserror::Error;

use crate::config::StarConfig;

/// Number of outline vertices (five outer tips, five inner notches)
pub const PENTAGRAM_VERTICES: usize = 10;

/// Angle between consecutive outline vertices (36°)
pub const PENTAGRAM_ANGLE_STEP: f32 = TAU / PENTAGRAM_VERTICES as f32;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Path must have at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    #[error("Path must be closed before it can be extruded")]
    OpenPath,
    #[error("Path outline is not star-shaped around its centroid")]
    NotStarShaped,
    #[error("Invalid extrusion parameter: {0}")]
    InvalidParameter(String),
}

/// A single step of a planar path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    Close,
}

/// Planar path made of straight segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path2d {
    commands: Vec<PathCommand>,
}

impl Path2d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, point: Vec2) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(point));
        self
    }

    pub fn line_to(&mut self, point: Vec2) -> &mut Self {
        self.commands.push(PathCommand::LineTo(point));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// Vertex positions in drawing order, without the implicit closing vertex
    pub fn vertices(&self) -> Vec<Vec2> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
                PathCommand::Close => None,
            })
            .collect()
    }

    /// Vertex `index` with wrap-around, so `len()` maps back to the first vertex
    pub fn vertex_wrapping(&self, index: usize) -> Option<Vec2> {
        let vertices = self.vertices();
        if vertices.is_empty() {
            return None;
        }
        Some(vertices[index % vertices.len()])
    }

    /// Straight segments including the closing one, if the path is closed
    pub fn segments(&self) -> Vec<(Vec2, Vec2)> {
        let vertices = self.vertices();
        let mut segments: Vec<_> = vertices.windows(2).map(|w| (w[0], w[1])).collect();
        if self.is_closed() && vertices.len() > 1 {
            segments.push((vertices[vertices.len() - 1], vertices[0]));
        }
        segments
    }
}

/// Closed five-pointed star outline with outer radius `size`
///
/// Even vertices sit on the outer radius, odd vertices on half of it, at 36°
/// steps starting from the positive Y axis.
pub fn pentagram_path(size: f32) -> Path2d {
    let mut path = Path2d::new();

    for i in 0..PENTAGRAM_VERTICES {
        let angle = i as f32 * PENTAGRAM_ANGLE_STEP;
        let radius = if i % 2 == 0 { size } else { size / 2.0 };
        let point = Vec2::new(radius * angle.sin(), radius * angle.cos());

        if i == 0 {
            path.move_to(point);
        } else {
            path.line_to(point);
        }
    }

    path.close();
    path
}

/// Extrusion parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtrudeSettings {
    pub depth: f32,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: u32,
}

impl ExtrudeSettings {
    /// Bevel thickness and size both equal to the star's outer radius
    pub fn for_size(size: f32) -> Self {
        Self {
            depth: 0.01,
            bevel_thickness: size,
            bevel_size: size,
            bevel_segments: 1,
        }
    }

    pub fn from_config(config: &StarConfig) -> Self {
        Self {
            depth: config.depth,
            bevel_thickness: config.bevel_thickness,
            bevel_size: config.bevel_size,
            bevel_segments: config.bevel_segments,
        }
    }

    pub fn bevel_enabled(&self) -> bool {
        self.bevel_thickness > 0.0 || self.bevel_size > 0.0
    }

    fn validate(&self) -> Result<(), GeometryError> {
        if !(self.depth > 0.0) {
            return Err(GeometryError::InvalidParameter(format!("depth must be positive, got {}", self.depth)));
        }
        if self.bevel_thickness < 0.0 || self.bevel_size < 0.0 {
            return Err(GeometryError::InvalidParameter("bevel dimensions must not be negative".to_string()));
        }
        if self.bevel_enabled() && self.bevel_segments == 0 {
            return Err(GeometryError::InvalidParameter("bevel needs at least one segment".to_string()));
        }
        Ok(())
    }

    /// Cross-section profile as `(z, outward offset)` pairs, front to back
    fn profile(&self) -> Vec<(f32, f32)> {
        if !self.bevel_enabled() {
            return vec![(0.0, 0.0), (self.depth, 0.0)];
        }

        let steps = self.bevel_segments;
        let bevel = |k: u32| {
            let t = k as f32 / steps as f32 * FRAC_PI_2;
            (self.bevel_thickness * t.cos(), self.bevel_size * t.sin())
        };

        let mut profile = Vec::with_capacity(2 * steps as usize + 2);
        for k in 0..steps {
            let (z, offset) = bevel(k);
            profile.push((-z, offset));
        }
        profile.push((0.0, self.bevel_size));
        profile.push((self.depth, self.bevel_size));
        for k in (0..steps).rev() {
            let (z, offset) = bevel(k);
            profile.push((self.depth + z, offset));
        }
        profile
    }
}

/// Triangle mesh buffers ready to upload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: Vec2) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.uvs.push(uv.to_array());
        index
    }

    /// Push a triangle, flipping it if needed so it faces along `normal`
    fn push_triangle(&mut self, a: u32, b: u32, c: u32, normal: Vec3) {
        let pa = Vec3::from_array(self.positions[a as usize]);
        let pb = Vec3::from_array(self.positions[b as usize]);
        let pc = Vec3::from_array(self.positions[c as usize]);
        if (pb - pa).cross(pc - pa).dot(normal) >= 0.0 {
            self.indices.extend([a, b, c]);
        } else {
            self.indices.extend([a, c, b]);
        }
    }
}

/// Extrude a closed outline along +Z into a flat-shaded solid
///
/// The front cap lies at `z = -bevel_thickness`, the back cap at
/// `z = depth + bevel_thickness`; the rim between them is expanded outward by
/// `bevel_size`. Caps are fan-triangulated from the centroid, so the outline
/// must be star-shaped around it.
pub fn extrude(path: &Path2d, settings: &ExtrudeSettings) -> Result<MeshData, GeometryError> {
    if !path.is_closed() {
        return Err(GeometryError::OpenPath);
    }
    let mut contour = path.vertices();
    if contour.len() < 3 {
        return Err(GeometryError::TooFewVertices(contour.len()));
    }
    settings.validate()?;

    // Counter-clockwise from here on, so the right-hand edge normal points out.
    if signed_area(&contour) < 0.0 {
        contour.reverse();
    }

    let centroid = contour.iter().copied().sum::<Vec2>() / contour.len() as f32;
    if !is_star_shaped(&contour, centroid) {
        return Err(GeometryError::NotStarShaped);
    }

    let count = contour.len();
    let edge_normals: Vec<Vec2> = (0..count)
        .map(|i| {
            let d = contour[(i + 1) % count] - contour[i];
            Vec2::new(d.y, -d.x).normalize_or_zero()
        })
        .collect();
    let bevel_dirs: Vec<Vec2> = (0..count)
        .map(|i| miter(edge_normals[(i + count - 1) % count], edge_normals[i]))
        .collect();

    let rings: Vec<Vec<Vec3>> = settings
        .profile()
        .into_iter()
        .map(|(z, offset)| {
            contour
                .iter()
                .zip(&bevel_dirs)
                .map(|(p, dir)| (*p + *dir * offset).extend(z))
                .collect()
        })
        .collect();

    let mut mesh = MeshData::default();

    let front = &rings[0];
    let back = &rings[rings.len() - 1];
    push_cap(&mut mesh, front, centroid, Vec3::NEG_Z);
    push_cap(&mut mesh, back, centroid, Vec3::Z);

    let ring_count = rings.len();
    for (r, pair) in rings.windows(2).enumerate() {
        let (near, far) = (&pair[0], &pair[1]);
        let v0 = r as f32 / (ring_count - 1) as f32;
        let v1 = (r + 1) as f32 / (ring_count - 1) as f32;

        for i in 0..count {
            let j = (i + 1) % count;
            let outward = edge_normals[i].extend(0.0);
            let mut normal = (near[j] - near[i]).cross(far[i] - near[i]).normalize_or_zero();
            if normal == Vec3::ZERO {
                normal = outward;
            } else if normal.dot(outward) < 0.0 {
                normal = -normal;
            }

            let u0 = i as f32 / count as f32;
            let u1 = (i + 1) as f32 / count as f32;
            let a = mesh.push_vertex(near[i], normal, Vec2::new(u0, v0));
            let b = mesh.push_vertex(near[j], normal, Vec2::new(u1, v0));
            let c = mesh.push_vertex(far[j], normal, Vec2::new(u1, v1));
            let d = mesh.push_vertex(far[i], normal, Vec2::new(u0, v1));
            mesh.push_triangle(a, b, c, normal);
            mesh.push_triangle(a, c, d, normal);
        }
    }

    Ok(mesh)
}

/// Build the ornament mesh for the configured star
pub fn star_mesh(config: &StarConfig) -> Result<MeshData, GeometryError> {
    if !(config.size > 0.0) {
        return Err(GeometryError::InvalidParameter(format!("star size must be positive, got {}", config.size)));
    }
    extrude(&pentagram_path(config.size), &ExtrudeSettings::from_config(config))
}

fn push_cap(mesh: &mut MeshData, ring: &[Vec3], centroid: Vec2, normal: Vec3) {
    let z = ring[0].z;
    let center = mesh.push_vertex(centroid.extend(z), normal, centroid);
    let first = mesh.positions.len() as u32;
    for p in ring {
        mesh.push_vertex(*p, normal, p.truncate());
    }
    let count = ring.len() as u32;
    for i in 0..count {
        mesh.push_triangle(center, first + i, first + (i + 1) % count, normal);
    }
}

/// Offset direction at a corner whose adjacent edges have outward normals
/// `a` and `b`; scaled so both offset edges sit at unit distance.
fn miter(a: Vec2, b: Vec2) -> Vec2 {
    let bisector = (a + b).normalize_or_zero();
    if bisector == Vec2::ZERO {
        return b;
    }
    let cos_half = bisector.dot(b).max(0.1);
    bisector / cos_half
}

fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f32>()
        / 2.0
}

fn is_star_shaped(points: &[Vec2], center: Vec2) -> bool {
    let n = points.len();
    (0..n).all(|i| (points[i] - center).perp_dot(points[(i + 1) % n] - center) > 0.0)
}
