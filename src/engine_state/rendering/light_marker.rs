//! The point light and the small cube drawn where it sits.

use cgmath::Point3;

use crate::config::LightConfig;
use crate::engine_state::{
    rendering::{meshing::Face, Vertex},
    voxels::block::{block_side::BlockSide, block_type::BlockType},
};

/// Edge length of the marker cube relative to one voxel.
pub const SCALE: f32 = 0.4;

/// A point light with a position and color, optionally orbiting the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightMarker {
    pub position: Point3<f32>,
    pub color: [f32; 3],
    /// Whether [`LightMarker::update`] moves the light
    pub orbit: bool,
    /// Orbit radius in voxels
    pub radius: f32,
}

impl LightMarker {
    /// Creates a light from configuration orbiting at `radius`.
    pub fn new(config: &LightConfig, radius: f32) -> Self {
        Self {
            position: Point3::from(config.position),
            color: config.color,
            orbit: config.orbit,
            radius,
        }
    }

    /// Advances the orbit to time `t` in seconds. Height is left untouched.
    pub fn update(&mut self, t: f32) {
        if !self.orbit {
            return;
        }
        self.position.x = self.radius * t.cos();
        self.position.z = self.radius * t.sin();
    }

    /// Flips orbiting on or off and returns the new state.
    pub fn toggle_orbit(&mut self) -> bool {
        self.orbit = !self.orbit;
        self.orbit
    }
}

/// A cube of edge [`SCALE`] centered on the origin, 36 vertices with outward winding.
///
/// The light shader offsets it by the light position from the scene uniform, so it is
/// uploaded once and never rebuilt.
pub fn cube_vertices() -> Vec<Vertex> {
    let id = BlockType::AIR.voxel_id();
    BlockSide::all()
        .into_iter()
        .flat_map(|side| {
            let normal = side.normal();
            Face::new(Point3::new(0, 0, 0), id, side)
                .triangle_vertices()
                .map(move |corner| {
                    Vertex::new(
                        [
                            (corner.x as f32 - 0.5) * SCALE,
                            (corner.y as f32 - 0.5) * SCALE,
                            (corner.z as f32 - 0.5) * SCALE,
                        ],
                        normal,
                        id as u32,
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn light(orbit: bool) -> LightMarker {
        LightMarker::new(
            &LightConfig {
                position: [1.0, 20.0, 1.0],
                color: [1.0, 0.9, 0.8],
                orbit,
            },
            32.0,
        )
    }

    #[test]
    fn orbit_follows_the_circle() {
        let mut marker = light(true);
        marker.update(0.0);
        assert!((marker.position.x - 32.0).abs() < 1e-4);
        assert!(marker.position.z.abs() < 1e-4);

        marker.update(FRAC_PI_2);
        assert!(marker.position.x.abs() < 1e-3);
        assert!((marker.position.z - 32.0).abs() < 1e-3);
        assert_eq!(marker.position.y, 20.0);
    }

    #[test]
    fn stationary_light_ignores_time() {
        let mut marker = light(false);
        marker.update(3.0);
        assert_eq!(marker.position, Point3::new(1.0, 20.0, 1.0));

        assert!(marker.toggle_orbit());
        marker.update(0.0);
        assert_eq!(marker.position, Point3::new(32.0, 20.0, 0.0));
    }

    #[test]
    fn cube_is_closed_and_centered() {
        let vertices = cube_vertices();
        assert_eq!(vertices.len(), 36);
        let half = SCALE / 2.0;
        for vertex in &vertices {
            assert!(vertex.position.iter().all(|c| (c.abs() - half).abs() < 1e-6));
            // Outward: every corner lies on the side its normal points to
            let along: f32 = (0..3).map(|i| vertex.position[i] * vertex.normal[i]).sum();
            assert!((along - half).abs() < 1e-6);
        }
    }
}
