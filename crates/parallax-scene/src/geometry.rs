//! Parametric solids, generated on the CPU as indexed triangle lists.
//!
//! Vertex order and triangle winding follow the usual grid layout: rows of
//! `segments + 1` vertices (the seam is duplicated so every row closes), two
//! counter-clockwise triangles per grid cell.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use parallax_engine::render::{MeshData, MeshVertex};

/// The solid drawn in a mesh slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
    },
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

impl Shape {
    pub fn build(&self) -> MeshData {
        match *self {
            Shape::Torus { radius, tube, radial_segments, tubular_segments } => {
                torus(radius, tube, radial_segments, tubular_segments)
            }
            Shape::Cone { radius, height, radial_segments } => cone(radius, height, radial_segments),
            Shape::TorusKnot { radius, tube, tubular_segments, radial_segments, p, q } => {
                torus_knot(radius, tube, tubular_segments, radial_segments, p, q)
            }
            Shape::Sphere { radius, width_segments, height_segments } => {
                sphere(radius, width_segments, height_segments)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Torus { .. } => "torus",
            Shape::Cone { .. } => "cone",
            Shape::TorusKnot { .. } => "torus knot",
            Shape::Sphere { .. } => "sphere",
        }
    }
}

fn vertex(position: Vec3, normal: Vec3) -> MeshVertex {
    MeshVertex {
        position: position.to_array(),
        normal: normal.normalize_or(Vec3::Y).to_array(),
    }
}

/// Ring torus in the XY plane, axis along Z.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let radial = radial_segments.max(2);
    let tubular = tubular_segments.max(3);
    let mut mesh = MeshData::default();

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = radius + tube * v.cos();
            let p = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.vertices.push(vertex(p, p - center));
        }
    }

    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

/// Cone along Y, apex at `+height/2`, closed by a disc at `-height/2`.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> MeshData {
    let radial = radial_segments.max(3);
    let half = height * 0.5;
    let slope = if height > 0.0 { radius / height } else { 0.0 };
    let mut mesh = MeshData::default();

    // Side: two rings, the apex ring collapses to a point but keeps per-segment
    // normals so shading stays smooth around the axis.
    for y in 0..=1u32 {
        let r = y as f32 * radius;
        let py = half - y as f32 * height;
        for x in 0..=radial {
            let theta = x as f32 / radial as f32 * TAU;
            let (s, c) = theta.sin_cos();
            mesh.vertices.push(vertex(Vec3::new(r * s, py, r * c), Vec3::new(s, slope, c)));
        }
    }

    let row = radial + 1;
    for x in 0..radial {
        let b = row + x;
        let c = row + x + 1;
        let d = x + 1;
        mesh.indices.extend_from_slice(&[b, c, d]);
    }

    // Base cap: one center vertex per segment, then the rim.
    let down = Vec3::NEG_Y;
    let center_start = mesh.vertices.len() as u32;
    for _ in 0..radial {
        mesh.vertices.push(vertex(Vec3::new(0.0, -half, 0.0), down));
    }
    let rim_start = mesh.vertices.len() as u32;
    for x in 0..=radial {
        let theta = x as f32 / radial as f32 * TAU;
        let (s, c) = theta.sin_cos();
        mesh.vertices.push(vertex(Vec3::new(radius * s, -half, radius * c), down));
    }
    for x in 0..radial {
        let c = center_start + x;
        let i = rim_start + x;
        mesh.indices.extend_from_slice(&[i + 1, i, c]);
    }

    mesh
}

/// UV sphere centered on the origin, poles on Y.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width = width_segments.max(3);
    let height = height_segments.max(2);
    let mut mesh = MeshData::default();

    for iy in 0..=height {
        let v = iy as f32 / height as f32;
        for ix in 0..=width {
            let u = ix as f32 / width as f32;
            let p = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.vertices.push(vertex(p, p));
        }
    }

    // Pole rows are fans; skip the degenerate half of each cell there.
    let row = width + 1;
    for iy in 0..height {
        for ix in 0..width {
            let a = row * iy + ix + 1;
            let b = row * iy + ix;
            let c = row * (iy + 1) + ix;
            let d = row * (iy + 1) + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}

/// (p, q) torus knot tube.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshData {
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (p, q) = (p.max(1) as f32, q as f32);
    let mut mesh = MeshData::default();

    let curve = |u: f32| {
        let qu_over_p = q / p * u;
        let cs = qu_over_p.cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * u.cos(),
            radius * (2.0 + cs) * 0.5 * u.sin(),
            radius * qu_over_p.sin() * 0.5,
        )
    };

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * p * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Frame from the finite-difference tangent.
        let t = p2 - p1;
        let n = p2 + p1;
        let b = t.cross(n).normalize_or(Vec3::Z);
        let n = b.cross(t).normalize_or(Vec3::X);

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let pos = p1 + n * cx + b * cy;
            mesh.vertices.push(vertex(pos, pos - p1));
        }
    }

    let row = radial + 1;
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = row * (j - 1) + (i - 1);
            let b = row * j + (i - 1);
            let c = row * j + i;
            let d = row * (j - 1) + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(mesh: &MeshData) {
        assert_eq!(mesh.indices.len() % 3, 0);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n), "index out of range");
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.normal).length();
            assert!((len - 1.0).abs() < 1e-4, "normal length {len}");
        }
    }

    #[test]
    fn torus_counts() {
        let m = torus(1.0, 0.4, 16, 60);
        assert_eq!(m.vertices.len(), 17 * 61);
        assert_eq!(m.triangle_count(), 16 * 60 * 2);
        assert_well_formed(&m);
    }

    #[test]
    fn torus_stays_within_outer_radius() {
        let m = torus(1.0, 0.4, 16, 60);
        for v in &m.vertices {
            let [x, y, z] = v.position;
            let ring = (x * x + y * y).sqrt();
            assert!(ring <= 1.4 + 1e-5 && ring >= 0.6 - 1e-5);
            assert!(z.abs() <= 0.4 + 1e-5);
        }
    }

    #[test]
    fn cone_counts_and_extent() {
        let m = cone(1.0, 2.0, 32);
        assert_eq!(m.vertices.len(), 2 * 33 + 32 + 33);
        assert_eq!(m.triangle_count(), 64);
        assert_well_formed(&m);

        let (lo, hi) = m
            .vertices
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), v| (lo.min(v.position[1]), hi.max(v.position[1])));
        assert_eq!((lo, hi), (-1.0, 1.0));
    }

    #[test]
    fn sphere_counts() {
        let m = sphere(1.0, 32, 32);
        assert_eq!(m.vertices.len(), 33 * 33);
        assert_eq!(m.triangle_count(), 32 * 32 * 2 - 2 * 32);
        assert_well_formed(&m);
    }

    #[test]
    fn sphere_vertices_lie_on_surface() {
        let m = sphere(2.0, 8, 6);
        for v in &m.vertices {
            assert!((Vec3::from_array(v.position).length() - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn torus_knot_counts() {
        let m = torus_knot(0.8, 0.35, 100, 16, 2, 3);
        assert_eq!(m.vertices.len(), 101 * 17);
        assert_eq!(m.triangle_count(), 100 * 16 * 2);
        assert_well_formed(&m);
    }

    #[test]
    fn shape_build_dispatches() {
        let s = Shape::Sphere { radius: 1.0, width_segments: 4, height_segments: 3 };
        assert_eq!(s.build(), sphere(1.0, 4, 3));
        assert_eq!(s.name(), "sphere");
    }
}
