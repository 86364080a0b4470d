//! # World Module
//!
//! This module provides the `World` struct which owns every chunk of the voxel world.
//!
//! ## Architecture
//!
//! The world is a fixed W×W×W grid of chunks, each N×N×N voxels, covering world-space
//! voxel coordinates `[0, W·N)` on every axis. Chunks live in a flat arena indexed
//! row-major from their chunk coordinate, so a chunk coordinate maps to exactly one slot
//! and lookups are O(1). The extent never changes after construction.
//!
//! ## Addressing
//!
//! A world-space voxel coordinate resolves to `(chunk index, local coordinate)` by floor
//! division and Euclidean remainder by N. Anything outside the grid is void: reads return
//! air and writes are ignored.

use cgmath::Point3;

use super::{
    block::{block_side::BlockSide, block_type::BlockType, VoxelId, AIR},
    chunk::Chunk,
    VoxelSource,
};
use crate::{
    config::{ConfigError, WorldConfig},
    engine_state::rendering::{backend::RenderBackend, meshing},
};

/// Solid voxel counts per material.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaterialCensus {
    pub stone: usize,
    pub dirt: usize,
    pub grass: usize,
    /// Solid ids that name no known material
    pub unknown: usize,
}

/// Represents a voxel world composed of a fixed grid of chunks.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_engine::config::WorldConfig;
/// use voxel_engine::engine_state::voxels::world::World;
///
/// let config = WorldConfig { chunk_size: 4, world_size: 2 };
/// let mut world = World::new(config, &|p: Point3<i32>| (p.y == 0) as u8).unwrap();
///
/// assert_eq!(world.len(), 8);
/// assert_eq!(world.voxel_at(Point3::new(5, 0, 5)), 1);
/// assert_eq!(world.voxel_at(Point3::new(-1, 0, 0)), 0);
/// ```
#[derive(Debug)]
pub struct World {
    chunks: Vec<Chunk>,
    chunk_size: i32,
    world_size: i32,
}

impl World {
    /// Creates every chunk of the world and fills it from `source`.
    ///
    /// Generation of all chunks completes before this returns, so the first mesh build
    /// always sees fully populated neighbors.
    pub fn new<S: VoxelSource + ?Sized>(
        config: WorldConfig,
        source: &S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let WorldConfig {
            chunk_size,
            world_size,
        } = config;

        let mut chunks = Vec::with_capacity((world_size as usize).pow(3));
        for z in 0..world_size {
            for y in 0..world_size {
                for x in 0..world_size {
                    let mut chunk = Chunk::new(Point3::new(x, y, z), chunk_size);
                    chunk.generate(source);
                    chunks.push(chunk);
                }
            }
        }

        let world = World {
            chunks,
            chunk_size,
            world_size,
        };
        log::info!(
            "Generated {} chunks of {}^3 voxels: {:?}",
            world.len(),
            chunk_size,
            world.material_census()
        );
        Ok(world)
    }

    /// Counts every solid voxel in the world by material.
    pub fn material_census(&self) -> MaterialCensus {
        let mut census = MaterialCensus::default();
        for (_, id) in self.chunks.iter().flat_map(Chunk::solid_voxels) {
            match BlockType::from_voxel_id(id) {
                Some(BlockType::STONE) => census.stone += 1,
                Some(BlockType::DIRT) => census.dirt += 1,
                Some(BlockType::GRASS) => census.grass += 1,
                Some(BlockType::AIR) | None => census.unknown += 1,
            }
        }
        census
    }

    /// Edge length of a chunk in voxels.
    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Edge length of the world in chunks.
    pub fn world_size(&self) -> i32 {
        self.world_size
    }

    /// Number of chunks in the world.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub fn chunk_mut(&mut self, index: usize) -> Option<&mut Chunk> {
        self.chunks.get_mut(index)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter()
    }

    /// Arena slot of the chunk at `chunk_position`, `None` outside the grid.
    pub fn chunk_index(&self, chunk_position: Point3<i32>) -> Option<usize> {
        let w = self.world_size;
        let in_range = |c: i32| (0..w).contains(&c);
        if !(in_range(chunk_position.x) && in_range(chunk_position.y) && in_range(chunk_position.z))
        {
            return None;
        }
        Some((chunk_position.x + w * chunk_position.y + w * w * chunk_position.z) as usize)
    }

    /// Resolves a world-space voxel coordinate to `(chunk index, local coordinate)`.
    pub fn resolve(&self, position: Point3<i32>) -> Option<(usize, Point3<i32>)> {
        let n = self.chunk_size;
        let chunk_position = Point3::new(
            position.x.div_euclid(n),
            position.y.div_euclid(n),
            position.z.div_euclid(n),
        );
        let local = Point3::new(
            position.x.rem_euclid(n),
            position.y.rem_euclid(n),
            position.z.rem_euclid(n),
        );
        self.chunk_index(chunk_position).map(|index| (index, local))
    }

    /// Reads the voxel at a world-space coordinate. Void reads as air.
    pub fn voxel_at(&self, position: Point3<i32>) -> VoxelId {
        self.resolve(position)
            .and_then(|(index, local)| self.chunks[index].get_voxel(local))
            .unwrap_or(AIR)
    }

    /// Writes the voxel at a world-space coordinate.
    ///
    /// The owning chunk is marked dirty, and so is every neighboring chunk whose mesh
    /// has a face against the written voxel. Returns `false` for void coordinates.
    pub fn set_voxel(&mut self, position: Point3<i32>, id: VoxelId) -> bool {
        let Some((index, local)) = self.resolve(position) else {
            return false;
        };
        if self.chunks[index].get_voxel(local) == Some(id) {
            return true;
        }
        self.chunks[index].set_voxel(local, id);

        let last = self.chunk_size - 1;
        for side in BlockSide::all() {
            let offset = side.offset();
            let on_boundary = [
                (offset.x, local.x),
                (offset.y, local.y),
                (offset.z, local.z),
            ]
            .iter()
            .any(|&(step, coordinate)| {
                (step < 0 && coordinate == 0) || (step > 0 && coordinate == last)
            });
            if !on_boundary {
                continue;
            }
            let neighbor = self.chunks[index].position + offset;
            if let Some(neighbor_index) = self.chunk_index(neighbor) {
                self.chunks[neighbor_index].mark_dirty();
            }
        }
        true
    }

    /// Rebuilds the mesh of chunk `index` if it is dirty. Returns `true` when a rebuild
    /// happened.
    pub fn rebuild_if_dirty(&mut self, index: usize) -> bool {
        let Some(chunk) = self.chunks.get(index) else {
            return false;
        };
        if !chunk.is_dirty() {
            return false;
        }
        let mesh = meshing::build_chunk_mesh(chunk, self);
        log::trace!(
            "Rebuilt chunk {:?}: {} faces",
            chunk.position,
            mesh.face_count()
        );
        self.chunks[index].install_mesh(mesh);
        true
    }

    /// Frees every chunk's GPU mesh.
    pub fn release_gpu_meshes<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        for chunk in &mut self.chunks {
            chunk.release_gpu_mesh(backend);
        }
    }

    /// World-space edge length in voxels.
    pub fn extent(&self) -> i32 {
        self.world_size * self.chunk_size
    }
}

impl VoxelSource for World {
    fn voxel_at(&self, position: Point3<i32>) -> VoxelId {
        World::voxel_at(self, position)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::engine_state::voxels::chunk::MeshState;

    fn flat_world(chunk_size: i32, world_size: i32) -> World {
        World::new(
            WorldConfig {
                chunk_size,
                world_size,
            },
            &|p: Point3<i32>| if p.y < 2 { 1 } else { AIR },
        )
        .unwrap()
    }

    #[test]
    fn invalid_extents_are_rejected() {
        let result = World::new(
            WorldConfig {
                chunk_size: 0,
                world_size: 2,
            },
            &|_: Point3<i32>| AIR,
        );
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        let overflowing = World::new(
            WorldConfig {
                chunk_size: 1300,
                world_size: 1,
            },
            &|_: Point3<i32>| AIR,
        );
        assert!(matches!(overflowing, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn every_chunk_is_generated_and_dirty() {
        let world = flat_world(4, 3);
        assert_eq!(world.len(), 27);
        assert!(world.chunks().all(|c| c.mesh_state() == MeshState::Dirty));
        assert_eq!(world.chunk(0).map(Chunk::solid_count), Some(2 * 4 * 4));
    }

    #[test]
    fn chunk_coordinates_map_to_unique_slots() {
        let world = flat_world(2, 3);
        let mut seen = vec![false; world.len()];
        for z in 0..3 {
            for y in 0..3 {
                for x in 0..3 {
                    let index = world.chunk_index(Point3::new(x, y, z)).unwrap();
                    assert!(!seen[index]);
                    seen[index] = true;
                    assert_eq!(world.chunk(index).unwrap().position, Point3::new(x, y, z));
                }
            }
        }
        assert!(world.chunk_index(Point3::new(3, 0, 0)).is_none());
        assert!(world.chunk_index(Point3::new(0, -1, 0)).is_none());
    }

    #[test]
    fn resolve_uses_euclidean_addressing() {
        let world = flat_world(4, 2);
        assert_eq!(world.resolve(Point3::new(5, 2, 7)), Some((5, Point3::new(1, 2, 3))));
        assert_eq!(world.resolve(Point3::new(-1, 0, 0)), None);
        assert_eq!(world.resolve(Point3::new(0, 8, 0)), None);
    }

    #[test]
    fn stepping_below_local_zero_lands_in_the_previous_chunk() {
        let world = flat_world(4, 2);
        let n = world.chunk_size();
        let chunk = world.chunk_index(Point3::new(1, 1, 1)).unwrap();
        let origin = world.chunk(chunk).unwrap().origin();

        let below = origin + Vector3::new(0, -1, 0);
        let (index, local) = world.resolve(below).unwrap();
        assert_eq!(index, world.chunk_index(Point3::new(1, 0, 1)).unwrap());
        assert_eq!(local, Point3::new(0, n - 1, 0));

        assert_eq!((-1i32).rem_euclid(n), n - 1);
        assert_eq!((-1i32).div_euclid(n), -1);
    }

    #[test]
    fn void_reads_as_air_and_rejects_writes() {
        let mut world = flat_world(2, 2);
        assert_eq!(world.voxel_at(Point3::new(0, 0, 0)), 1);
        assert_eq!(world.voxel_at(Point3::new(0, -1, 0)), AIR);
        assert!(!world.set_voxel(Point3::new(4, 0, 0), 1));
    }

    #[test]
    fn boundary_writes_dirty_the_neighbor() {
        let mut world = flat_world(4, 2);
        for i in 0..world.len() {
            world.rebuild_if_dirty(i);
        }
        assert!(world.chunks().all(|c| !c.is_dirty()));

        // x == 3 is the +X face of chunk (0,0,0), bordering chunk (1,0,0)
        assert!(world.set_voxel(Point3::new(3, 1, 1), 2));
        let owner = world.chunk_index(Point3::new(0, 0, 0)).unwrap();
        let right = world.chunk_index(Point3::new(1, 0, 0)).unwrap();
        let above = world.chunk_index(Point3::new(0, 1, 0)).unwrap();
        assert!(world.chunk(owner).unwrap().is_dirty());
        assert!(world.chunk(right).unwrap().is_dirty());
        assert!(!world.chunk(above).unwrap().is_dirty());
    }

    #[test]
    fn interior_writes_only_dirty_the_owner() {
        let mut world = flat_world(4, 2);
        for i in 0..world.len() {
            world.rebuild_if_dirty(i);
        }
        assert!(world.set_voxel(Point3::new(5, 2, 6), 3));
        let dirty: Vec<_> = world
            .chunks()
            .enumerate()
            .filter(|(_, c)| c.is_dirty())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(dirty, vec![world.chunk_index(Point3::new(1, 0, 1)).unwrap()]);
    }

    #[test]
    fn rebuild_is_gated_by_the_dirty_flag() {
        let mut world = flat_world(2, 1);
        assert!(world.rebuild_if_dirty(0));
        assert!(!world.rebuild_if_dirty(0));
        assert!(!world.rebuild_if_dirty(5));
        world.set_voxel(Point3::new(1, 1, 1), 2);
        assert!(world.rebuild_if_dirty(0));
    }

    #[test]
    fn census_counts_solids_by_material() {
        let mut world = World::new(
            WorldConfig {
                chunk_size: 2,
                world_size: 2,
            },
            &|p: Point3<i32>| match p.y {
                0 => BlockType::STONE.voxel_id(),
                1 => BlockType::DIRT.voxel_id(),
                2 => BlockType::GRASS.voxel_id(),
                _ => AIR,
            },
        )
        .unwrap();

        let layer = 4 * 4;
        assert_eq!(
            world.material_census(),
            MaterialCensus {
                stone: layer,
                dirt: layer,
                grass: layer,
                unknown: 0,
            }
        );

        world.set_voxel(Point3::new(3, 3, 3), 200);
        world.set_voxel(Point3::new(0, 0, 0), AIR);
        let census = world.material_census();
        assert_eq!(census.unknown, 1);
        assert_eq!(census.stone, layer - 1);
    }
}
