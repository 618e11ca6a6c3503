use crate::animation::Tweenable;
use crate::color::Color;
use crate::geometry::Shape;
use crate::scene::{Material, Mesh, NodeId, Scene};
use cgmath::Vector3;
use rand::Rng;
use std::rc::Rc;

// ── Dimensions ──────────────────────────────────────────────
const TORSO_W: f32 = 1.0;
const TORSO_H: f32 = 1.5;
const TORSO_D: f32 = 1.0;

const HEAD_RADIUS: f32 = 0.8;
const HEAD_Y: f32 = 1.65;

const EYE_RADIUS: f32 = 0.15;
const EYE_SPREAD: f32 = 0.36;
const EYES_Y: f32 = -0.1;
const EYES_Z: f32 = 0.7;

const ARM_W: f32 = 0.25;
const ARM_H: f32 = 0.85;
const ARM_D: f32 = 0.25;
const ARM_X: f32 = 0.8;
const ARM_Y: f32 = 0.6;
const ARM_TILT_DEG: f32 = 30.0;
// Gap between the shoulder pivot and the top of each arm. Tuned separately per arm.
const ARM_SPACING_1: f32 = 0.1;
const ARM_SPACING_2: f32 = 0.1;

const LEG_RADIUS_TOP: f32 = 0.20;
const LEG_RADIUS_BOTTOM: f32 = 0.12;
const LEG_H: f32 = 0.75;
const LEG_X: f32 = 0.30;
const LEG_SPACING: f32 = 0.3;

// ── Colors ──────────────────────────────────────────────────
const HEAD_SATURATION: f32 = 30.0;
const BODY_SATURATION: f32 = 85.0;
const BODY_LIGHTNESS: f32 = 50.0;
const EYE_COLOR: u32 = 0x44445c;

/// Left/right multiplier for the `i`th of a mirrored pair.
fn mirror(i: usize) -> f32 {
    if i % 2 == 0 { 1.0 } else { -1.0 }
}

// ── Pose ────────────────────────────────────────────────────

/// The few numbers every visual update is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseParameters {
    pub position: Vector3<f32>,
    /// Radians about +Y.
    pub yaw: f32,
    /// Radians about +Y, always within `[-π/2, π/2]`.
    pub target_yaw: f32,
    /// Radians about Z; the second arm gets the negated value.
    pub arm_swing: f32,
}

impl Default for PoseParameters {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            yaw: 0.0,
            target_yaw: 0.0,
            arm_swing: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseField {
    Y,
    Yaw,
    TargetYaw,
    ArmSwing,
}

impl Tweenable for PoseParameters {
    type Field = PoseField;

    fn get(&self, field: PoseField) -> f32 {
        match field {
            PoseField::Y => self.position.y,
            PoseField::Yaw => self.yaw,
            PoseField::TargetYaw => self.target_yaw,
            PoseField::ArmSwing => self.arm_swing,
        }
    }

    fn set(&mut self, field: PoseField, value: f32) {
        match field {
            PoseField::Y => self.position.y = value,
            PoseField::Yaw => self.yaw = value,
            PoseField::TargetYaw => self.target_yaw = value,
            PoseField::ArmSwing => self.arm_swing = value,
        }
    }
}

// ── Palette ─────────────────────────────────────────────────

/// Randomly chosen cosmetic colors. Hues are whole degrees, lightness whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub head_hue: u32,
    pub head_lightness: u32,
    pub body_hue: u32,
}

impl Palette {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let head_hue = rng.gen_range(0..360);
        let head_lightness = rng.gen_range(40..65);
        let body_hue = rng.gen_range(0..360);
        Self { head_hue, head_lightness, body_hue }
    }

    /// Shared by head, arms and legs.
    pub fn head_material(&self) -> Material {
        Material::lambert(Color::from_hsl(
            self.head_hue as f32,
            HEAD_SATURATION,
            self.head_lightness as f32,
        ))
    }

    pub fn body_material(&self) -> Material {
        Material::lambert(Color::from_hsl(self.body_hue as f32, BODY_SATURATION, BODY_LIGHTNESS))
    }
}

// ── Figure ──────────────────────────────────────────────────

/// A humanoid made of primitives hanging off one root group.
pub struct Figure {
    group: NodeId,
    body: Option<NodeId>,
    arms: Vec<NodeId>,
    head_material: Material,
    body_material: Material,
}

impl Figure {
    /// Adds the (still empty) root group to `scene` and places it at `initial.position`.
    pub fn new<R: Rng + ?Sized>(scene: &mut Scene, initial: &PoseParameters, rng: &mut R) -> Self {
        let group = scene.create_group("figure");
        let root = scene.root();
        scene.add(root, group);
        scene.transform_mut(group).position = initial.position;

        let palette = Palette::random(rng);
        log::debug!("Figure palette: {:?}", palette);

        Self {
            group,
            body: None,
            arms: Vec::new(),
            head_material: palette.head_material(),
            body_material: palette.body_material(),
        }
    }

    /// Builds the parts. Only the first call does anything.
    pub fn assemble(&mut self, scene: &mut Scene) {
        if self.body.is_some() {
            log::warn!("Figure already assembled, ignoring");
            return;
        }
        self.create_body(scene);
        self.create_head(scene);
        self.create_arms(scene);
        log::info!("Figure assembled ({} scene nodes)", scene.len());
    }

    fn create_body(&mut self, scene: &mut Scene) {
        let body = scene.create_group("body");
        let torso = scene.create_mesh(
            "torso",
            Mesh::new(
                Shape::Box { width: TORSO_W, height: TORSO_H, depth: TORSO_D },
                self.body_material,
            ),
        );
        scene.add(body, torso);
        scene.add(self.group, body);
        self.body = Some(body);

        self.create_legs(scene, body);
    }

    fn create_head(&mut self, scene: &mut Scene) {
        let head = scene.create_group("head");
        let sphere = scene.create_mesh(
            "head_main",
            Mesh::new(
                Shape::Sphere { radius: HEAD_RADIUS, width_segments: 32, height_segments: 16 },
                self.head_material,
            ),
        );
        scene.add(head, sphere);
        scene.add(self.group, head);
        scene.transform_mut(head).position.y = HEAD_Y;

        self.create_eyes(scene, head);
    }

    fn create_arms(&mut self, scene: &mut Scene) {
        let Some(body) = self.body else { return };

        for i in 0..2 {
            let arm_group = scene.create_group("arm_group");
            let arm = scene.create_mesh(
                "arm",
                Mesh::new(
                    Shape::Box { width: ARM_W, height: ARM_H, depth: ARM_D },
                    self.head_material,
                ),
            );
            let m = mirror(i);

            scene.add(arm_group, arm);
            scene.add(body, arm_group);

            let spacing = if i == 0 { ARM_SPACING_1 } else { ARM_SPACING_2 };
            scene.transform_mut(arm).position.y = ARM_H * -0.5 - spacing;

            let t = scene.transform_mut(arm_group);
            t.position.x = m * ARM_X;
            t.position.y = ARM_Y;
            t.rotation.z = (ARM_TILT_DEG * m).to_radians();
            log::debug!(
                "Arm {} position: x={}, y={}, z={}",
                i + 1,
                t.position.x,
                t.position.y,
                t.position.z
            );

            self.arms.push(arm_group);
        }
    }

    fn create_eyes(&mut self, scene: &mut Scene, head: NodeId) {
        let eyes = scene.create_group("eyes");
        let shape = Shape::Sphere { radius: EYE_RADIUS, width_segments: 12, height_segments: 8 };
        let material = Material::lambert(Color::from_hex(EYE_COLOR));
        let geometry = Rc::new(shape.build());

        for i in 0..2 {
            let eye = scene.create_mesh("eye", Mesh::sharing(&geometry, material));
            scene.add(eyes, eye);
            scene.transform_mut(eye).position.x = EYE_SPREAD * mirror(i);
        }

        scene.add(head, eyes);
        let t = scene.transform_mut(eyes);
        t.position.y = EYES_Y;
        t.position.z = EYES_Z;
    }

    /// Each leg is handed to the root group and then to the body. A node keeps
    /// a single parent, so the body is where the legs end up.
    fn create_legs(&mut self, scene: &mut Scene, body: NodeId) {
        let shape = Shape::Cylinder {
            radius_top: LEG_RADIUS_TOP,
            radius_bottom: LEG_RADIUS_BOTTOM,
            height: LEG_H,
        };
        let geometry = Rc::new(shape.build());

        for i in 0..2 {
            let leg = scene.create_mesh("leg", Mesh::sharing(&geometry, self.head_material));

            scene.transform_mut(leg).position.x = mirror(i) * LEG_X;
            scene.add(self.group, leg);
            scene.transform_mut(leg).position.y = -1.0 - LEG_SPACING;
            scene.add(body, leg);

        }
    }

    /// Yaw and height from the live pose; arms swing mirrored.
    pub fn apply_bounce_pose(&self, pose: &PoseParameters, scene: &mut Scene) {
        let t = scene.transform_mut(self.group);
        t.rotation.y = pose.yaw;
        t.position.y = pose.position.y;

        for (i, &arm) in self.arms.iter().enumerate() {
            scene.transform_mut(arm).rotation.z = pose.arm_swing * mirror(i);
        }
    }

    /// Yaw from the turn target, height from the live pose.
    pub fn apply_direction_pose(&self, pose: &PoseParameters, scene: &mut Scene) {
        let t = scene.transform_mut(self.group);
        t.rotation.y = pose.target_yaw;
        t.position.y = pose.position.y;
    }

    #[cfg(test)]
    pub fn arms(&self) -> &[NodeId] {
        &self.arms
    }
}
