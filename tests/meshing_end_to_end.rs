use cgmath::Point3;
use voxel_engine::{
    config::{TerrainConfig, WorldConfig},
    engine_state::voxels::{
        block::VoxelId,
        chunk::MeshState,
        terrain::TerrainGenerator,
        world::World,
    },
};

fn floor_point(x: f32, y: f32, z: f32) -> Point3<i32> {
    Point3::new(x.floor() as i32, y.floor() as i32, z.floor() as i32)
}

#[test]
fn hollow_two_cube_chunk_meshes_to_24_faces() {
    let hollow = |p: Point3<i32>| -> VoxelId {
        if p == Point3::new(1, 1, 1) {
            0
        } else {
            1
        }
    };
    let mut world = World::new(
        WorldConfig {
            chunk_size: 2,
            world_size: 1,
        },
        &hollow,
    )
    .unwrap();

    assert_eq!(world.chunk(0).unwrap().mesh_state(), MeshState::Dirty);
    assert!(world.rebuild_if_dirty(0));

    let chunk = world.chunk(0).unwrap();
    assert_eq!(chunk.mesh_state(), MeshState::Drawable);
    // 7 voxels × 3 outward faces, plus 3 faces around the carved corner
    assert_eq!(chunk.mesh().vertex_count, 144);
    assert_eq!(chunk.mesh().face_count(), 24);

    assert!(!world.rebuild_if_dirty(0));
}

#[test]
fn terrain_worlds_are_reproducible() {
    let config = WorldConfig {
        chunk_size: 8,
        world_size: 2,
    };
    let terrain = TerrainGenerator::new(TerrainConfig::default());
    let mut first = World::new(config, &terrain).unwrap();
    let mut second = World::new(config, &terrain).unwrap();

    for index in 0..first.len() {
        first.rebuild_if_dirty(index);
        second.rebuild_if_dirty(index);
        assert_eq!(
            first.chunk(index).unwrap().mesh(),
            second.chunk(index).unwrap().mesh()
        );
    }
}

#[test]
fn every_face_separates_solid_from_empty() {
    let config = WorldConfig {
        chunk_size: 8,
        world_size: 2,
    };
    let terrain = TerrainGenerator::new(TerrainConfig {
        seed: 7,
        elevation_threshold: 8,
        surface_base_height: 10.0,
        surface_amplitude: 4.0,
        ..TerrainConfig::default()
    });
    let mut world = World::new(config, &terrain).unwrap();

    let mut faces = 0;
    for index in 0..world.len() {
        world.rebuild_if_dirty(index);
        let mesh = world.chunk(index).unwrap().mesh().clone();

        for (positions, normals) in mesh.positions.chunks_exact(18).zip(mesh.normals.chunks_exact(18)) {
            let mut center = [0.0f32; 3];
            for vertex in positions.chunks_exact(3) {
                for axis in 0..3 {
                    center[axis] += vertex[axis] / 6.0;
                }
            }
            let n = &normals[..3];
            let inside = floor_point(
                center[0] - n[0] * 0.5,
                center[1] - n[1] * 0.5,
                center[2] - n[2] * 0.5,
            );
            let outside = floor_point(
                center[0] + n[0] * 0.5,
                center[1] + n[1] * 0.5,
                center[2] + n[2] * 0.5,
            );
            assert_ne!(world.voxel_at(inside), 0, "face at {:?} has no solid voxel", center);
            assert_eq!(world.voxel_at(outside), 0, "face at {:?} is not exposed", center);
            faces += 1;
        }
    }
    assert!(faces > 0);
}

#[test]
fn editing_across_a_chunk_wall_rebuilds_both_sides() {
    let mut world = World::new(
        WorldConfig {
            chunk_size: 4,
            world_size: 2,
        },
        &|_: Point3<i32>| -> VoxelId { 1 },
    )
    .unwrap();
    for index in 0..world.len() {
        world.rebuild_if_dirty(index);
    }
    let before: Vec<u32> = world.chunks().map(|c| c.mesh().vertex_count).collect();

    // Last voxel of chunk (0,0,0) along X, bordering chunk (1,0,0)
    assert!(world.set_voxel(Point3::new(3, 1, 1), 0));
    let left = world.chunk_index(Point3::new(0, 0, 0)).unwrap();
    let right = world.chunk_index(Point3::new(1, 0, 0)).unwrap();
    assert!(world.chunk(left).unwrap().is_dirty());
    assert!(world.chunk(right).unwrap().is_dirty());

    assert!(world.rebuild_if_dirty(left));
    assert!(world.rebuild_if_dirty(right));
    // The carved voxel exposes 5 faces of its solid neighbors in its own chunk and one
    // face in the chunk across the wall
    assert_eq!(world.chunk(left).unwrap().mesh().vertex_count, before[left] + 5 * 6);
    assert_eq!(world.chunk(right).unwrap().mesh().vertex_count, before[right] + 6);
}
