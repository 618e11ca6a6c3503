use crate::scene::DrawItem;
use cgmath::{InnerSpace, Matrix, Matrix3, SquareMatrix, Vector3, Vector4};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position: location 0
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // color: location 1
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // normal: location 2
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// World-space vertices and indices for one frame.
#[derive(Default)]
pub struct FrameMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl FrameMesh {
    /// Bakes every draw item into one vertex/index list.
    pub fn bake(items: &[DrawItem<'_>]) -> Self {
        let vertex_total: usize = items.iter().map(|i| i.mesh.geometry.vertex_count()).sum();
        let index_total: usize = items.iter().map(|i| i.mesh.geometry.indices.len()).sum();
        let mut frame = Self {
            vertices: Vec::with_capacity(vertex_total),
            indices: Vec::with_capacity(index_total),
        };

        for item in items {
            let geometry = &item.mesh.geometry;
            let color = item.mesh.material.color.to_array();
            let normal_matrix = normal_matrix(&item.world);
            let base = frame.vertices.len() as u32;

            for (p, n) in geometry.positions.iter().zip(geometry.normals.iter()) {
                let world = item.world * Vector4::new(p[0], p[1], p[2], 1.0);
                let normal = (normal_matrix * Vector3::from(*n)).normalize();
                frame.vertices.push(Vertex {
                    position: [world.x, world.y, world.z],
                    color,
                    normal: normal.into(),
                });
            }
            frame.indices.extend(geometry.indices.iter().map(|i| base + i));
        }
        frame
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Inverse-transpose of the upper 3x3, so normals survive non-uniform scale.
fn normal_matrix(world: &cgmath::Matrix4<f32>) -> Matrix3<f32> {
    let m = Matrix3::from_cols(world.x.truncate(), world.y.truncate(), world.z.truncate());
    m.invert().map(|inv| inv.transpose()).unwrap_or(m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geometry::Shape;
    use crate::scene::{Material, Mesh, Scene};

    fn scene_with_two_boxes() -> Scene {
        let mut scene = Scene::new();
        let shape = Shape::Box { width: 1.0, height: 1.0, depth: 1.0 };
        let a = scene.create_mesh("a", Mesh::new(shape, Material::lambert(Color::WHITE)));
        let b = scene.create_mesh("b", Mesh::new(shape, Material::lambert(Color::from_hex(0x44445c))));
        let root = scene.root();
        scene.add(root, a);
        scene.add(root, b);
        scene.transform_mut(b).position = Vector3::new(0.0, 2.0, 0.0);
        scene.transform_mut(b).rotation.z = std::f32::consts::FRAC_PI_2;
        scene
    }

    #[test]
    fn indices_are_offset_per_mesh() {
        let scene = scene_with_two_boxes();
        let frame = FrameMesh::bake(&scene.draw_list());
        assert_eq!(frame.vertices.len(), 48);
        assert_eq!(frame.indices.len(), 72);
        assert!(frame.indices[36..].iter().all(|&i| i >= 24));
        assert!(frame.indices.iter().all(|&i| (i as usize) < frame.vertices.len()));
    }

    #[test]
    fn positions_and_normals_are_in_world_space() {
        let scene = scene_with_two_boxes();
        let frame = FrameMesh::bake(&scene.draw_list());
        let second = &frame.vertices[24..];
        let min_y = second.iter().map(|v| v.position[1]).fold(f32::MAX, f32::min);
        assert!((min_y - 1.5).abs() < 1e-5);

        // The +Z face keeps pointing at +Z under a rotation about Z.
        assert!((second[0].normal[2] - 1.0).abs() < 1e-5);
        // The +Y face (third in build order) now points at -X.
        let top = &second[8];
        assert!((top.normal[0] + 1.0).abs() < 1e-5, "{:?}", top.normal);
    }

    #[test]
    fn material_color_is_copied() {
        let scene = scene_with_two_boxes();
        let frame = FrameMesh::bake(&scene.draw_list());
        assert_eq!(frame.vertices[0].color, Color::WHITE.to_array());
        assert_eq!(frame.vertices[30].color, Color::from_hex(0x44445c).to_array());
    }

    #[test]
    fn empty_scene_bakes_nothing() {
        let scene = Scene::new();
        assert!(FrameMesh::bake(&scene.draw_list()).is_empty());
    }
}
