//! # View Frustum
//!
//! Six half-space planes extracted from a combined projection×view matrix
//! (Gribb/Hartmann). Each plane is `row3 ± rowN` of the matrix, so a point `p` is on the
//! inner side when `dot(normal, p) + d >= 0`.
//!
//! The matrix must use the OpenGL clip convention (Z in `[-w, w]`); the near and far
//! planes are only exact for that convention.

use cgmath::{InnerSpace, Matrix, Matrix4, Point3, Vector3, Vector4};

/// A plane `dot(normal, p) + d = 0`, normalized so that the result is a distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub d: f32,
}

impl Plane {
    fn from_row(row: Vector4<f32>) -> Self {
        let normal = row.truncate();
        let length = normal.magnitude();
        if length > f32::EPSILON {
            Plane {
                normal: normal / length,
                d: row.w / length,
            }
        } else {
            Plane { normal, d: row.w }
        }
    }

    /// Signed distance from the plane, positive on the inner side.
    pub fn distance(&self, point: Point3<f32>) -> f32 {
        self.normal.x * point.x + self.normal.y * point.y + self.normal.z * point.z + self.d
    }
}

/// Indices into [`Frustum::planes`].
pub const LEFT: usize = 0;
pub const RIGHT: usize = 1;
pub const BOTTOM: usize = 2;
pub const TOP: usize = 3;
pub const NEAR: usize = 4;
pub const FAR: usize = 5;

/// The six planes bounding the visible volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the planes of `view_proj`.
    pub fn from_matrix(view_proj: Matrix4<f32>) -> Self {
        let r0 = view_proj.row(0);
        let r1 = view_proj.row(1);
        let r2 = view_proj.row(2);
        let r3 = view_proj.row(3);

        let mut planes = [Plane::from_row(r3); 6];
        planes[LEFT] = Plane::from_row(r3 + r0);
        planes[RIGHT] = Plane::from_row(r3 - r0);
        planes[BOTTOM] = Plane::from_row(r3 + r1);
        planes[TOP] = Plane::from_row(r3 - r1);
        planes[NEAR] = Plane::from_row(r3 + r2);
        planes[FAR] = Plane::from_row(r3 - r2);

        Frustum { planes }
    }

    /// Re-extracts the planes after the camera moved.
    pub fn update(&mut self, view_proj: Matrix4<f32>) {
        *self = Self::from_matrix(view_proj);
    }

    /// Returns `true` when `point` is on the inner side of every plane.
    pub fn point_in(&self, point: Point3<f32>) -> bool {
        self.planes.iter().all(|plane| plane.distance(point) >= 0.0)
    }

    /// Conservative box test over the box's eight corners.
    ///
    /// A plane with every corner outside rejects the box. A plane with corners on both
    /// sides means the box straddles the frustum and it is accepted immediately.
    pub fn box_in(&self, corners: &[Point3<f32>; 8]) -> bool {
        for plane in &self.planes {
            let mut outside = 0;
            let mut inside = 0;
            for &corner in corners {
                if plane.distance(corner) < 0.0 {
                    outside += 1;
                } else {
                    inside += 1;
                }
            }
            if inside == 0 {
                return false;
            } else if outside > 0 {
                return true;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{perspective, Deg, EuclideanSpace};

    use super::*;

    /// Camera at the origin looking down -Z, 90° vertical field of view, near 1, far 100.
    fn frustum() -> Frustum {
        let projection = perspective(Deg(90.0), 1.0, 1.0, 100.0);
        let view = Matrix4::look_to_rh(Point3::origin(), -Vector3::unit_z(), Vector3::unit_y());
        Frustum::from_matrix(projection * view)
    }

    fn cube(center: Point3<f32>, half: f32) -> [Point3<f32>; 8] {
        let mut corners = [center; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            corner.x += if i & 1 != 0 { half } else { -half };
            corner.y += if i & 2 != 0 { half } else { -half };
            corner.z += if i & 4 != 0 { half } else { -half };
        }
        corners
    }

    #[test]
    fn planes_are_normalized() {
        for plane in frustum().planes {
            assert!((plane.normal.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn near_and_far_planes_sit_at_the_clip_distances() {
        let f = frustum();
        assert!(f.planes[NEAR].distance(Point3::new(0.0, 0.0, -1.0)).abs() < 1e-4);
        assert!(f.planes[FAR].distance(Point3::new(0.0, 0.0, -100.0)).abs() < 1e-3);
    }

    #[test]
    fn points_inside_and_outside() {
        let f = frustum();
        assert!(f.point_in(Point3::new(0.0, 0.0, -10.0)));
        assert!(f.point_in(Point3::new(9.0, -9.0, -10.0)));
        assert!(!f.point_in(Point3::new(0.0, 0.0, 10.0)));
        assert!(!f.point_in(Point3::new(11.0, 0.0, -10.0)));
        assert!(!f.point_in(Point3::new(0.0, 0.0, -0.5)));
        assert!(!f.point_in(Point3::new(0.0, 0.0, -150.0)));
    }

    #[test]
    fn box_fully_outside_one_plane_is_rejected() {
        let f = frustum();
        assert!(!f.box_in(&cube(Point3::new(0.0, 0.0, 20.0), 2.0)));
        assert!(!f.box_in(&cube(Point3::new(50.0, 0.0, -10.0), 2.0)));
        assert!(!f.box_in(&cube(Point3::new(0.0, 0.0, -200.0), 2.0)));
    }

    #[test]
    fn box_fully_inside_is_accepted() {
        assert!(frustum().box_in(&cube(Point3::new(0.0, 0.0, -20.0), 2.0)));
    }

    #[test]
    fn box_straddling_a_plane_is_accepted() {
        let f = frustum();
        // Crosses the right plane (x = -z) at z = -10
        let corners = cube(Point3::new(10.0, 0.0, -10.0), 2.0);
        assert!(corners.iter().any(|c| f.point_in(*c)));
        assert!(corners.iter().any(|c| !f.point_in(*c)));
        assert!(f.box_in(&corners));
    }

    #[test]
    fn update_tracks_the_camera() {
        let mut f = frustum();
        let target = Point3::new(0.0, 0.0, 20.0);
        assert!(!f.point_in(target));

        let projection = perspective(Deg(90.0), 1.0, 1.0, 100.0);
        let view = Matrix4::look_to_rh(Point3::origin(), Vector3::unit_z(), Vector3::unit_y());
        f.update(projection * view);
        assert!(f.point_in(target));
    }
}
