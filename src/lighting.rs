use crate::color::Color;
use crate::config::LightConfig;
use cgmath::{InnerSpace, Vector3};

pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Parallel light shining from `position` toward the origin.
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vector3<f32>,
}

impl DirectionalLight {
    /// Unit vector pointing from the surface toward the light.
    pub fn to_light(&self) -> Vector3<f32> {
        if self.position.magnitude2() > 0.0 {
            self.position.normalize()
        } else {
            Vector3::unit_y()
        }
    }
}

pub struct Lights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl Lights {
    pub fn from_config(config: &LightConfig) -> Self {
        Self {
            ambient: AmbientLight {
                color: Color::from_hex(config.ambient_color),
                intensity: config.ambient_intensity,
            },
            directional: DirectionalLight {
                color: Color::from_hex(config.directional_color),
                intensity: config.directional_intensity,
                position: Vector3::from(config.directional_position),
            },
        }
    }

    pub fn uniform(&self) -> LightUniform {
        let dir = self.directional.to_light();
        LightUniform {
            ambient: extend(self.ambient.color.scaled(self.ambient.intensity)),
            direction: [dir.x, dir.y, dir.z, 0.0],
            directional: extend(self.directional.color.scaled(self.directional.intensity)),
        }
    }
}

fn extend(rgb: [f32; 3]) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], 1.0]
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub ambient: [f32; 4],
    pub direction: [f32; 4],
    pub directional: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lights_point_from_corner() {
        let lights = Lights::from_config(&LightConfig::default());
        let u = lights.uniform();
        let expected = 1.0 / 3f32.sqrt();
        for c in &u.direction[..3] {
            assert!((c - expected).abs() < 1e-6);
        }
        assert!((u.directional[0] - 0.8).abs() < 1e-4);
        assert!(u.ambient[2] > u.ambient[0], "ambient is bluish");
    }

    #[test]
    fn light_at_origin_falls_back_to_up() {
        let light = DirectionalLight {
            color: Color::WHITE,
            intensity: 1.0,
            position: Vector3::new(0.0, 0.0, 0.0),
        };
        assert_eq!(light.to_light(), Vector3::unit_y());
    }
}
