use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::EngineError;

/// Primitive shape descriptions, centred on the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Geometry {
    /// Flat rectangle in the XY plane facing +Z.
    Plane { width: f32, height: f32 },
    Box { width: f32, height: f32, depth: f32 },
    /// Upright cylinder (or cone when one radius is zero) along Y.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
}

/// Vertex layout shared by every backend.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Tessellated triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let i = self.vertices.len() as u32;
        self.vertices.push(MeshVertex {
            position: position.to_array(),
            normal: normal.to_array(),
        });
        i
    }

    fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }
}

fn positive(name: &str, v: f32) -> Result<(), EngineError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidGeometry(format!("{name} must be positive, got {v}")))
    }
}

impl Geometry {
    /// Rejects zero, negative and non-finite extents.
    pub fn validate(&self) -> Result<(), EngineError> {
        match *self {
            Geometry::Plane { width, height } => {
                positive("width", width)?;
                positive("height", height)
            }
            Geometry::Box { width, height, depth } => {
                positive("width", width)?;
                positive("height", height)?;
                positive("depth", depth)
            }
            Geometry::Cylinder { radius_top, radius_bottom, height, radial_segments } => {
                positive("height", height)?;
                let radius_ok = |r: f32| r.is_finite() && r >= 0.0;
                if !radius_ok(radius_top) || !radius_ok(radius_bottom) {
                    return Err(EngineError::InvalidGeometry(
                        "cylinder radii must be finite and non-negative".to_string(),
                    ));
                }
                if radius_top == 0.0 && radius_bottom == 0.0 {
                    return Err(EngineError::InvalidGeometry(
                        "cylinder needs at least one non-zero radius".to_string(),
                    ));
                }
                if radial_segments < 3 {
                    return Err(EngineError::InvalidGeometry(format!(
                        "cylinder needs at least 3 radial segments, got {radial_segments}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Builds the triangle list. Call [`validate`](Self::validate) first.
    pub fn tessellate(&self) -> MeshData {
        let mut mesh = MeshData::default();
        match *self {
            Geometry::Plane { width, height } => {
                let (hw, hh) = (width * 0.5, height * 0.5);
                let a = mesh.push(Vec3::new(-hw, -hh, 0.0), Vec3::Z);
                let b = mesh.push(Vec3::new(hw, -hh, 0.0), Vec3::Z);
                let c = mesh.push(Vec3::new(hw, hh, 0.0), Vec3::Z);
                let d = mesh.push(Vec3::new(-hw, hh, 0.0), Vec3::Z);
                mesh.quad(a, b, c, d);
            }
            Geometry::Box { width, height, depth } => {
                let half = Vec3::new(width, height, depth) * 0.5;
                // (normal, u, v) with u × v = normal so every face winds CCW
                // seen from outside.
                let faces = [
                    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
                    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
                    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
                    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
                    (Vec3::Z, Vec3::X, Vec3::Y),
                    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
                ];
                for (n, u, v) in faces {
                    let corner = |su: f32, sv: f32| (n + u * su + v * sv) * half;
                    let a = mesh.push(corner(-1.0, -1.0), n);
                    let b = mesh.push(corner(1.0, -1.0), n);
                    let c = mesh.push(corner(1.0, 1.0), n);
                    let d = mesh.push(corner(-1.0, 1.0), n);
                    mesh.quad(a, b, c, d);
                }
            }
            Geometry::Cylinder { radius_top, radius_bottom, height, radial_segments } => {
                tessellate_cylinder(&mut mesh, radius_top, radius_bottom, height, radial_segments);
            }
        }
        mesh
    }
}

fn tessellate_cylinder(mesh: &mut MeshData, rt: f32, rb: f32, height: f32, segments: u32) {
    let hh = height * 0.5;
    let slope = (rb - rt) / height;
    let ring = |i: u32| {
        let theta = i as f32 / segments as f32 * TAU;
        (theta.sin(), theta.cos())
    };

    // Side: one top/bottom vertex pair per seam position (first and last
    // coincide so normals stay smooth across the seam).
    let side_start = mesh.vertices.len() as u32;
    for i in 0..=segments {
        let (s, c) = ring(i);
        let normal = Vec3::new(s, slope, c).normalize();
        mesh.push(Vec3::new(rt * s, hh, rt * c), normal);
        mesh.push(Vec3::new(rb * s, -hh, rb * c), normal);
    }
    for i in 0..segments {
        let top = side_start + i * 2;
        let bottom = top + 1;
        let next_top = top + 2;
        let next_bottom = top + 3;
        mesh.indices.extend_from_slice(&[top, bottom, next_top, bottom, next_bottom, next_top]);
    }

    for (radius, y, normal) in [(rt, hh, Vec3::Y), (rb, -hh, Vec3::NEG_Y)] {
        if radius <= 0.0 {
            continue;
        }
        let center = mesh.push(Vec3::new(0.0, y, 0.0), normal);
        let first = mesh.vertices.len() as u32;
        for i in 0..=segments {
            let (s, c) = ring(i);
            mesh.push(Vec3::new(radius * s, y, radius * c), normal);
        }
        for i in 0..segments {
            let (a, b) = (first + i, first + i + 1);
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[center, a, b]);
            } else {
                mesh.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices_in_range(m: &MeshData) -> bool {
        m.indices.iter().all(|&i| (i as usize) < m.vertices.len())
    }

    // ── validate ──────────────────────────────────────────────────────────

    #[test]
    fn rejects_degenerate_extents() {
        assert!(Geometry::Plane { width: 0.0, height: 1.0 }.validate().is_err());
        assert!(Geometry::Box { width: 1.0, height: -1.0, depth: 1.0 }.validate().is_err());
        assert!(Geometry::Plane { width: f32::NAN, height: 1.0 }.validate().is_err());
    }

    #[test]
    fn rejects_bad_cylinders() {
        let base = |rt, rb, segs| Geometry::Cylinder {
            radius_top: rt,
            radius_bottom: rb,
            height: 1.0,
            radial_segments: segs,
        };
        assert!(base(1.0, 1.0, 2).validate().is_err());
        assert!(base(0.0, 0.0, 8).validate().is_err());
        assert!(base(-1.0, 1.0, 8).validate().is_err());
        assert!(base(0.0, 1.0, 8).validate().is_ok());
    }

    // ── tessellate ────────────────────────────────────────────────────────

    #[test]
    fn plane_is_one_quad_facing_z() {
        let m = Geometry::Plane { width: 160.0, height: 160.0 }.tessellate();
        assert_eq!(m.vertices.len(), 4);
        assert_eq!(m.indices.len(), 6);
        assert!(m.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        assert!(m.vertices.iter().all(|v| v.position[0].abs() == 80.0));
    }

    #[test]
    fn box_has_six_faces_within_extents() {
        let m = Geometry::Box { width: 2.0, height: 4.0, depth: 6.0 }.tessellate();
        assert_eq!(m.vertices.len(), 24);
        assert_eq!(m.indices.len(), 36);
        assert!(indices_in_range(&m));
        for v in &m.vertices {
            assert!((v.position[0].abs() - 1.0).abs() < 1e-6);
            assert!((v.position[1].abs() - 2.0).abs() < 1e-6);
            assert!((v.position[2].abs() - 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn box_faces_wind_outward() {
        let m = Geometry::Box { width: 1.0, height: 1.0, depth: 1.0 }.tessellate();
        for tri in m.indices.chunks(3) {
            let p = |i: u32| Vec3::from_array(m.vertices[i as usize].position);
            let n = Vec3::from_array(m.vertices[tri[0] as usize].normal);
            let face = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            assert!(face.dot(n) > 0.0);
        }
    }

    #[test]
    fn cylinder_counts_with_both_caps() {
        let n = 8;
        let m = Geometry::Cylinder {
            radius_top: 1.0,
            radius_bottom: 1.0,
            height: 0.4,
            radial_segments: n,
        }
        .tessellate();
        assert_eq!(m.vertices.len() as u32, 2 * (n + 1) + 2 * (n + 2));
        assert_eq!(m.indices.len() as u32, 12 * n);
        assert!(indices_in_range(&m));
    }

    #[test]
    fn cone_skips_the_missing_cap() {
        let n = 6;
        let m = Geometry::Cylinder {
            radius_top: 0.0,
            radius_bottom: 1.0,
            height: 1.0,
            radial_segments: n,
        }
        .tessellate();
        assert_eq!(m.vertices.len() as u32, 2 * (n + 1) + (n + 2));
        assert_eq!(m.indices.len() as u32, 9 * n);
    }
}
