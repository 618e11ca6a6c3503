use crate::color::Color;
use crate::geometry::{Geometry, Shape};
use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};
use std::rc::Rc;

/// Handle into the scene's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Local transform. Rotation is Euler angles in radians applied X, then Y, then Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Matrix4<f32> {
        let rotation = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        Matrix4::from_translation(self.position)
            * rotation
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// Diffuse-only (Lambert) surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Color,
}

impl Material {
    pub fn lambert(color: Color) -> Self {
        Self { color }
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Rc<Geometry>,
    pub material: Material,
}

impl Mesh {
    pub fn new(shape: Shape, material: Material) -> Self {
        Self { geometry: Rc::new(shape.build()), material }
    }

    /// A second mesh drawing the same geometry buffer.
    pub fn sharing(geometry: &Rc<Geometry>, material: Material) -> Self {
        Self { geometry: Rc::clone(geometry), material }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: &'static str,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[cfg(test)]
impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// One mesh ready to draw, with its world transform resolved.
pub struct DrawItem<'a> {
    pub world: Matrix4<f32>,
    pub mesh: &'a Mesh,
}

/// Arena-backed scene graph. Node 0 is the scene root; only nodes reachable
/// from it are drawn. Every node has at most one parent.
pub struct Scene {
    nodes: Vec<Node>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: "scene",
                transform: Transform::default(),
                mesh: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn create_group(&mut self, name: &'static str) -> NodeId {
        self.push(name, None)
    }

    pub fn create_mesh(&mut self, name: &'static str, mesh: Mesh) -> NodeId {
        self.push(name, Some(mesh))
    }

    fn push(&mut self, name: &'static str, mesh: Option<Mesh>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            transform: Transform::default(),
            mesh,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Attach `child` under `parent`. A node that already has a parent is moved,
    /// not duplicated.
    pub fn add(&mut self, parent: NodeId, child: NodeId) {
        if parent == child {
            log::warn!("Refusing to parent {} to itself", self.nodes[child.0].name);
            return;
        }
        if let Some(previous) = self.nodes[child.0].parent.take() {
            log::debug!(
                "Re-parenting {} from {} to {}",
                self.nodes[child.0].name,
                self.nodes[previous.0].name,
                self.nodes[parent.0].name
            );
            self.nodes[previous.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    #[cfg(test)]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[cfg(test)]
    pub fn transform(&self, id: NodeId) -> &Transform {
        &self.nodes[id.0].transform
    }

    pub fn transform_mut(&mut self, id: NodeId) -> &mut Transform {
        &mut self.nodes[id.0].transform
    }

    /// Depth-first, children in insertion order.
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        let mut items = Vec::new();
        let mut stack = vec![(self.root(), Matrix4::identity())];
        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            let world = parent_world * node.transform.matrix();
            if let Some(mesh) = &node.mesh {
                items.push(DrawItem { world, mesh });
            }
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }
        items
    }
}
