use cgmath::{InnerSpace, Vector3};
use std::f32::consts::{PI, TAU};

// Cylinders are always generated with this many segments around the axis.
pub const CYLINDER_RADIAL_SEGMENTS: u32 = 32;

/// Local-space triangle mesh. Winding is counter-clockwise seen from outside.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Primitive shapes a mesh can be built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32, width_segments: u32, height_segments: u32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
}

impl Shape {
    pub fn build(&self) -> Geometry {
        match *self {
            Shape::Box { width, height, depth } => box_geometry(width, height, depth),
            Shape::Sphere { radius, width_segments, height_segments } => {
                sphere_geometry(radius, width_segments, height_segments)
            }
            Shape::Cylinder { radius_top, radius_bottom, height } => {
                cylinder_geometry(radius_top, radius_bottom, height, CYLINDER_RADIAL_SEGMENTS)
            }
        }
    }
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        index
    }
}

pub fn box_geometry(width: f32, height: f32, depth: f32) -> Geometry {
    let hw = width * 0.5;
    let hh = height * 0.5;
    let hd = depth * 0.5;
    let corners = [
        [-hw, -hh, -hd], [ hw, -hh, -hd], [ hw,  hh, -hd], [-hw,  hh, -hd],
        [-hw, -hh,  hd], [ hw, -hh,  hd], [ hw,  hh,  hd], [-hw,  hh,  hd],
    ];
    let faces = [
        [4, 5, 6, 7], [1, 0, 3, 2], [7, 6, 2, 3],
        [0, 1, 5, 4], [5, 1, 2, 6], [0, 4, 7, 3],
    ];

    let mut geometry = Geometry::default();
    for face in faces.iter() {
        let p0 = Vector3::from(corners[face[0]]);
        let p1 = Vector3::from(corners[face[1]]);
        let p2 = Vector3::from(corners[face[2]]);
        let normal: [f32; 3] = (p1 - p0).cross(p2 - p0).normalize().into();

        let base = geometry.positions.len() as u32;
        for &idx in face.iter() {
            geometry.push_vertex(corners[idx], normal);
        }
        geometry
            .indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    geometry
}

/// UV sphere. The poles collapse to a single ring so no triangles are emitted there twice.
pub fn sphere_geometry(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut geometry = Geometry::default();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let position = [
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            ];
            let n = Vector3::from(position);
            let normal: [f32; 3] = if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                [0.0, if iy == 0 { 1.0 } else { -1.0 }, 0.0]
            };
            row.push(geometry.push_vertex(position, normal));
        }
        grid.push(row);
    }

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 {
                geometry.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                geometry.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    geometry
}

/// Capped (truncated) cone centered on the origin along Y.
pub fn cylinder_geometry(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> Geometry {
    let radial_segments = radial_segments.max(3);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;
    let mut geometry = Geometry::default();

    // Side wall: one ring at the top, one at the bottom.
    let mut rings: [Vec<u32>; 2] = [Vec::new(), Vec::new()];
    for (y, ring) in rings.iter_mut().enumerate() {
        let v = y as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            let position = [radius * sin, -v * height + half, radius * cos];
            let normal: [f32; 3] = Vector3::new(sin, slope, cos).normalize().into();
            ring.push(geometry.push_vertex(position, normal));
        }
    }
    for x in 0..radial_segments as usize {
        let a = rings[0][x];
        let b = rings[1][x];
        let c = rings[1][x + 1];
        let d = rings[0][x + 1];
        geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    push_cap(&mut geometry, radius_top, half, radial_segments, true);
    push_cap(&mut geometry, radius_bottom, -half, radial_segments, false);
    geometry
}

fn push_cap(geometry: &mut Geometry, radius: f32, y: f32, radial_segments: u32, top: bool) {
    if radius <= 0.0 {
        return;
    }
    let normal = [0.0, if top { 1.0 } else { -1.0 }, 0.0];
    let center = geometry.push_vertex([0.0, y, 0.0], normal);
    let first = geometry.positions.len() as u32;
    for x in 0..=radial_segments {
        let theta = x as f32 / radial_segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        geometry.push_vertex([radius * sin, y, radius * cos], normal);
    }
    for x in 0..radial_segments {
        let i = first + x;
        if top {
            geometry.indices.extend_from_slice(&[i, i + 1, center]);
        } else {
            geometry.indices.extend_from_slice(&[i + 1, i, center]);
        }
    }
}
