//! Per-face culled meshing.
//!
//! Every solid voxel is tested against its six axis-aligned neighbors and a quad is
//! emitted for each neighbor that is empty. Neighbors inside the chunk are answered by the
//! chunk's solidity mask; neighbors outside it are looked up in world space through a
//! [`VoxelSource`], which reports void (air) past the edge of the world so boundary
//! chunks always close their outer faces.

use cgmath::EuclideanSpace;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, is_solid},
    chunk::Chunk,
    VoxelSource,
};

use super::{ChunkMesh, Face};

/// Builds the culled mesh of `chunk`, resolving out-of-chunk neighbors through
/// `neighbors`.
pub fn build_chunk_mesh<S: VoxelSource + ?Sized>(chunk: &Chunk, neighbors: &S) -> ChunkMesh {
    let origin = chunk.origin().to_vec();
    let mut mesh = ChunkMesh::new();

    for (local, voxel_id) in chunk.solid_voxels() {
        for side in BlockSide::all() {
            let adjacent = local + side.offset();
            let occluded = if chunk.contains(adjacent) {
                chunk.is_block_solid(adjacent)
            } else {
                is_solid(neighbors.voxel_at(adjacent + origin))
            };
            if !occluded {
                mesh.push_face(&Face::new(local + origin, voxel_id, side));
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use cgmath::{Point3, Vector3};

    use super::*;
    use crate::config::WorldConfig;
    use crate::engine_state::voxels::{
        block::{VoxelId, AIR},
        world::World,
    };

    fn void(_: Point3<i32>) -> VoxelId {
        AIR
    }

    fn solid(_: Point3<i32>) -> VoxelId {
        1
    }

    fn filled_chunk(dimension: i32, id: VoxelId) -> Chunk {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0), dimension);
        chunk.generate(&move |_: Point3<i32>| id);
        chunk
    }

    /// Reconstructs the voxel a face was emitted for and the neighbor it faces.
    fn face_voxels(mesh: &ChunkMesh, face: usize) -> (Point3<i32>, Point3<i32>) {
        let normal = Vector3::new(
            mesh.normals[face * 18] as i32,
            mesh.normals[face * 18 + 1] as i32,
            mesh.normals[face * 18 + 2] as i32,
        );
        let mut min = Point3::new(i32::MAX, i32::MAX, i32::MAX);
        for vertex in 0..6 {
            let base = face * 18 + vertex * 3;
            min.x = min.x.min(mesh.positions[base] as i32);
            min.y = min.y.min(mesh.positions[base + 1] as i32);
            min.z = min.z.min(mesh.positions[base + 2] as i32);
        }
        // The quad's min corner is the voxel's min corner, except on positive faces
        // where it sits one step further along the normal.
        let voxel = if normal.x + normal.y + normal.z > 0 {
            min - normal
        } else {
            min
        };
        (voxel, voxel + normal)
    }

    #[test]
    fn empty_chunk_has_no_vertices() {
        let chunk = filled_chunk(4, AIR);
        assert!(build_chunk_mesh(&chunk, &void).is_empty());
    }

    #[test]
    fn solid_chunk_surrounded_by_solid_has_no_vertices() {
        let chunk = filled_chunk(4, 2);
        assert_eq!(build_chunk_mesh(&chunk, &solid).vertex_count, 0);
    }

    #[test]
    fn solid_chunk_in_the_void_draws_its_hull() {
        let chunk = filled_chunk(3, 2);
        let mesh = build_chunk_mesh(&chunk, &void);
        assert_eq!(mesh.face_count(), 6 * 3 * 3);
        assert!(mesh.voxel_ids.iter().all(|&id| id == 2));
    }

    #[test]
    fn single_voxel_draws_six_faces_with_outward_normals() {
        let mut chunk = filled_chunk(3, AIR);
        chunk.set_voxel(Point3::new(1, 1, 1), 5);
        let mesh = build_chunk_mesh(&chunk, &void);
        assert_eq!(mesh.vertex_count, 36);
        for face in 0..6 {
            let (voxel, neighbor) = face_voxels(&mesh, face);
            assert_eq!(voxel, Point3::new(1, 1, 1));
            assert_ne!(neighbor, voxel);
        }
    }

    #[test]
    fn every_face_separates_solid_from_empty() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..16 {
            let mut chunk = filled_chunk(6, AIR);
            for z in 0..6 {
                for y in 0..6 {
                    for x in 0..6 {
                        if rng.f32() < 0.45 {
                            chunk.set_voxel(Point3::new(x, y, z), rng.u8(1..=3));
                        }
                    }
                }
            }

            let mesh = build_chunk_mesh(&chunk, &void);
            let mut expected = 0;
            for (local, _) in chunk.solid_voxels() {
                for side in BlockSide::all() {
                    if !chunk.is_block_solid(local + side.offset()) {
                        expected += 1;
                    }
                }
            }
            assert_eq!(mesh.face_count(), expected);

            for face in 0..mesh.face_count() as usize {
                let (voxel, neighbor) = face_voxels(&mesh, face);
                assert!(chunk.is_block_solid(voxel));
                assert!(!chunk.is_block_solid(neighbor));
                assert_eq!(
                    Some(mesh.voxel_ids[face * 6] as VoxelId),
                    chunk.get_voxel(voxel)
                );
            }
        }
    }

    #[test]
    fn adjacent_solid_chunks_hide_their_shared_wall() {
        let config = WorldConfig {
            chunk_size: 4,
            world_size: 2,
        };
        let mut world = World::new(config, &|p: Point3<i32>| (p.y < 4) as VoxelId).unwrap();

        let left = world.chunk_index(Point3::new(0, 0, 0)).unwrap();
        let right = world.chunk_index(Point3::new(1, 0, 0)).unwrap();
        world.rebuild_if_dirty(left);
        world.rebuild_if_dirty(right);

        let left_mesh = world.chunk(left).unwrap().mesh();
        let right_mesh = world.chunk(right).unwrap().mesh();
        let on_wall = |mesh: &ChunkMesh| {
            (0..mesh.face_count() as usize)
                .filter(|&face| (0..6).all(|v| mesh.positions[face * 18 + v * 3] == 4.0))
                .count()
        };
        assert_eq!(on_wall(left_mesh), 0);
        assert_eq!(on_wall(right_mesh), 0);
        assert_eq!(left_mesh.face_count(), right_mesh.face_count());

        // Carving one voxel on the right exposes exactly one face on the left
        world.set_voxel(Point3::new(4, 1, 1), AIR);
        world.rebuild_if_dirty(left);
        world.rebuild_if_dirty(right);
        let left_mesh = world.chunk(left).unwrap().mesh();
        let right_mesh = world.chunk(right).unwrap().mesh();
        assert_eq!(on_wall(left_mesh), 1);
        assert_eq!(on_wall(right_mesh), 0);
    }
}
