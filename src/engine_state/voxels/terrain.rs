//! # Terrain Generator
//!
//! Maps a world-space voxel coordinate to a voxel id. Generation is a pure function of
//! the coordinate and the [`TerrainConfig`]: the generator holds only immutable noise
//! tables, so any chunk can be regenerated (or generated on another thread) and will
//! always produce the same voxels.
//!
//! ## Layers
//!
//! * Below `elevation_threshold` a 3D Perlin density field carves caves: samples under
//!   `density_cutoff` are air, everything else is stone.
//! * At or above the threshold a 2D Perlin height field describes the surface: voxels
//!   under the height are solid (grass on the top-most layer, dirt below), everything
//!   above is air.

use cgmath::Point3;
use noise::{NoiseFn, Perlin};

use crate::config::TerrainConfig;

use super::block::{block_type::BlockType, VoxelId};

/// Deterministic voxel source for world generation.
#[derive(Clone)]
pub struct TerrainGenerator {
    perlin: Perlin,
    config: TerrainConfig,
}

impl TerrainGenerator {
    /// Creates a generator seeded from `config.seed`.
    pub fn new(config: TerrainConfig) -> Self {
        Self {
            perlin: Perlin::new(config.seed),
            config,
        }
    }

    /// The parameters this generator was built with.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Returns the voxel id at the given world-space voxel coordinate.
    pub fn voxel_at(&self, position: Point3<i32>) -> VoxelId {
        let block_type = if position.y < self.config.elevation_threshold {
            let density = self
                .perlin
                .get(Self::to_perlin_pos(position, self.config.density_scale));
            if density < self.config.density_cutoff {
                BlockType::AIR
            } else {
                BlockType::STONE
            }
        } else {
            let height = self.surface_height(position.x, position.z);
            let y = position.y as f64;
            if y >= height {
                BlockType::AIR
            } else if y + 1.0 >= height {
                BlockType::GRASS
            } else {
                BlockType::DIRT
            }
        };

        block_type.voxel_id()
    }

    /// Height of the terrain surface over the world-space column `(x, z)`.
    pub fn surface_height(&self, x: i32, z: i32) -> f64 {
        let scale = self.config.surface_scale;
        let sample = self.perlin.get([x as f64 * scale, z as f64 * scale]);
        self.config.surface_base_height + self.config.surface_amplitude * sample
    }

    fn to_perlin_pos(pos: Point3<i32>, scale_factor: f64) -> [f64; 3] {
        [
            pos.x as f64 * scale_factor,
            pos.y as f64 * scale_factor,
            pos.z as f64 * scale_factor,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::AIR;

    fn generator() -> TerrainGenerator {
        TerrainGenerator::new(TerrainConfig::default())
    }

    #[test]
    fn identical_coordinates_yield_identical_voxels() {
        let first = generator();
        let second = generator();
        for x in -20..20 {
            for y in [-5, 0, 10, 23, 24, 30, 40] {
                for z in [-7, 0, 3, 19] {
                    let p = Point3::new(x, y, z);
                    let id = first.voxel_at(p);
                    assert_eq!(id, first.voxel_at(p));
                    assert_eq!(id, second.voxel_at(p));
                }
            }
        }
    }

    #[test]
    fn underground_only_holds_stone_or_air() {
        let generator = generator();
        let threshold = generator.config().elevation_threshold;
        for x in 0..16 {
            for y in 0..threshold {
                for z in 0..16 {
                    let id = generator.voxel_at(Point3::new(x, y, z));
                    assert!(id == AIR || id == BlockType::STONE.voxel_id());
                }
            }
        }
    }

    #[test]
    fn surface_columns_are_grass_over_dirt_under_air() {
        let generator = generator();
        let config = *generator.config();
        let top = (config.surface_base_height + config.surface_amplitude) as i32 + 2;
        for x in 0..8 {
            for z in 0..8 {
                let height = generator.surface_height(x, z);
                for y in config.elevation_threshold..top {
                    let id = generator.voxel_at(Point3::new(x, y, z));
                    let y = y as f64;
                    if y >= height {
                        assert_eq!(id, AIR);
                    } else if y + 1.0 >= height {
                        assert_eq!(id, BlockType::GRASS.voxel_id());
                    } else {
                        assert_eq!(id, BlockType::DIRT.voxel_id());
                    }
                }
            }
        }
    }

    #[test]
    fn density_cutoff_controls_carving() {
        let solid = TerrainGenerator::new(TerrainConfig {
            density_cutoff: -2.0,
            ..TerrainConfig::default()
        });
        let hollow = TerrainGenerator::new(TerrainConfig {
            density_cutoff: 2.0,
            ..TerrainConfig::default()
        });
        let p = Point3::new(3, 5, 7);
        assert_eq!(solid.voxel_at(p), BlockType::STONE.voxel_id());
        assert_eq!(hollow.voxel_at(p), AIR);
    }
}
