//! # Voxel Raycasting
//!
//! Exact grid traversal (Amanatides & Woo DDA) of a ray through the voxel
//! grid. The ray visits cells in strict distance order and stops at the first
//! occupied one, which makes it suitable for block picking and placement.

use cgmath::{InnerSpace, Point3, Vector3};

use super::voxel::voxel_type::VoxelType;

/// Default reach for edit gestures, in world units.
pub const MAX_REACH: f32 = 8.0;

/// Anything that can answer "what occupies this cell?".
///
/// `None` means no data is available (outside the world or not loaded) and is
/// traversed like air.
pub trait VoxelQuery {
    fn voxel_at(&self, x: i32, y: i32, z: i32) -> Option<VoxelType>;
}

/// The first occupied cell along a ray.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastHit {
    /// Exact point where the ray enters the cell.
    pub position: Point3<f32>,
    /// Outward normal of the entered face. Zero when the ray starts inside an
    /// occupied cell.
    pub normal: Vector3<i32>,
    /// The occupied cell.
    pub cell: Point3<i32>,
    /// What occupies the cell.
    pub voxel: VoxelType,
    /// Distance travelled from the origin.
    pub distance: f32,
}

impl RaycastHit {
    /// The cell in front of the hit face, where a new voxel would be placed.
    pub fn place_target(&self) -> Point3<i32> {
        self.offset_cell(0.5)
    }

    /// The cell behind the hit face, i.e. the voxel that was hit.
    pub fn inspect_target(&self) -> Point3<i32> {
        self.offset_cell(-0.5)
    }

    fn offset_cell(&self, amount: f32) -> Point3<i32> {
        let n = Vector3::new(
            self.normal.x as f32,
            self.normal.y as f32,
            self.normal.z as f32,
        );
        let p = self.position + n * amount;
        Point3::new(p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32)
    }
}

/// Casts a ray from `origin` along `direction` for at most `max_distance`.
///
/// `direction` does not need to be normalized. Returns `None` for a zero
/// direction, for non-finite inputs, or when nothing occupied lies within
/// range.
pub fn raycast<Q: VoxelQuery + ?Sized>(
    query: &Q,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
) -> Option<RaycastHit> {
    let finite = [origin.x, origin.y, origin.z, direction.x, direction.y, direction.z]
        .iter()
        .all(|c| c.is_finite());
    if !finite || !max_distance.is_finite() || direction.magnitude2() < f32::EPSILON {
        return None;
    }
    let dir = direction.normalize();
    let origin_arr = [origin.x, origin.y, origin.z];
    let dir_arr = [dir.x, dir.y, dir.z];

    let mut cell = origin_arr.map(|c| c.floor() as i32);
    let mut step = [0i32; 3];
    let mut t_delta = [f32::INFINITY; 3];
    let mut t_max = [f32::INFINITY; 3];

    for axis in 0..3 {
        let d = dir_arr[axis];
        if d > 0.0 {
            step[axis] = 1;
            t_delta[axis] = 1.0 / d;
            t_max[axis] = ((cell[axis] + 1) as f32 - origin_arr[axis]) / d;
        } else if d < 0.0 {
            step[axis] = -1;
            t_delta[axis] = -1.0 / d;
            t_max[axis] = (origin_arr[axis] - cell[axis] as f32) / -d;
        }
    }

    let occupied = |c: [i32; 3]| match query.voxel_at(c[0], c[1], c[2]) {
        Some(voxel) if !voxel.is_air() => Some(voxel),
        _ => None,
    };

    if let Some(voxel) = occupied(cell) {
        return Some(RaycastHit {
            position: origin,
            normal: Vector3::new(0, 0, 0),
            cell: Point3::new(cell[0], cell[1], cell[2]),
            voxel,
            distance: 0.0,
        });
    }

    loop {
        let axis = if t_max[0] <= t_max[1] && t_max[0] <= t_max[2] {
            0
        } else if t_max[1] <= t_max[2] {
            1
        } else {
            2
        };

        let t = t_max[axis];
        if t > max_distance {
            return None;
        }

        cell[axis] += step[axis];
        t_max[axis] += t_delta[axis];

        if let Some(voxel) = occupied(cell) {
            let mut normal = [0i32; 3];
            normal[axis] = -step[axis];
            return Some(RaycastHit {
                position: origin + dir * t,
                normal: Vector3::from(normal),
                cell: Point3::from(cell),
                voxel,
                distance: t,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Grid(HashMap<(i32, i32, i32), VoxelType>);

    impl VoxelQuery for Grid {
        fn voxel_at(&self, x: i32, y: i32, z: i32) -> Option<VoxelType> {
            Some(self.0.get(&(x, y, z)).copied().unwrap_or_default())
        }
    }

    fn grid(cells: &[(i32, i32, i32, VoxelType)]) -> Grid {
        Grid(cells.iter().map(|&(x, y, z, v)| ((x, y, z), v)).collect())
    }

    #[test]
    fn hits_voxel_in_front() {
        let g = grid(&[(5, 10, 5, VoxelType::STONE)]);
        let hit = raycast(
            &g,
            Point3::new(5.5, 10.5, 1.5),
            Vector3::new(0.0, 0.0, 1.0),
            MAX_REACH,
        )
        .unwrap();

        assert_eq!(hit.cell, Point3::new(5, 10, 5));
        assert_eq!(hit.voxel, VoxelType::STONE);
        assert_eq!(hit.normal, Vector3::new(0, 0, -1));
        assert!((hit.distance - 3.5).abs() < 1e-5);
        assert!((5.0..=6.0).contains(&hit.position.z));
        assert_eq!(hit.place_target(), Point3::new(5, 10, 4));
        assert_eq!(hit.inspect_target(), Point3::new(5, 10, 5));
    }

    #[test]
    fn negative_direction_normal_faces_origin() {
        let g = grid(&[(-3, 0, 0, VoxelType::DIRT)]);
        let hit = raycast(
            &g,
            Point3::new(2.5, 0.5, 0.5),
            Vector3::new(-2.0, 0.0, 0.0),
            MAX_REACH,
        )
        .unwrap();

        assert_eq!(hit.cell, Point3::new(-3, 0, 0));
        assert_eq!(hit.normal, Vector3::new(1, 0, 0));
        assert!((hit.position.x - -2.0).abs() < 1e-5);
        assert!((hit.distance - 4.5).abs() < 1e-5);
        assert_eq!(hit.place_target(), Point3::new(-2, 0, 0));
    }

    #[test]
    fn oblique_ray_hits_wall() {
        let mut cells = Vec::new();
        for y in -5..10 {
            for z in -5..10 {
                cells.push((6, y, z, VoxelType::BRICK));
            }
        }
        let g = grid(&cells);
        let hit = raycast(
            &g,
            Point3::new(0.2, 0.5, 0.7),
            Vector3::new(1.0, 0.3, 0.1),
            20.0,
        )
        .unwrap();

        assert_eq!(hit.cell.x, 6);
        assert_eq!(hit.normal, Vector3::new(-1, 0, 0));
        assert!((hit.position.x - 6.0).abs() < 1e-4);
        assert_eq!(hit.inspect_target(), hit.cell);
    }

    #[test]
    fn out_of_range_misses() {
        let g = grid(&[(0, 0, 20, VoxelType::STONE)]);
        let hit = raycast(
            &g,
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(0.0, 0.0, 1.0),
            MAX_REACH,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn zero_direction_misses() {
        let g = grid(&[(0, 0, 0, VoxelType::STONE)]);
        let origin = Point3::new(0.5, 0.5, 0.5);
        assert!(raycast(&g, origin, Vector3::new(0.0, 0.0, 0.0), 5.0).is_none());
    }

    #[test]
    fn non_finite_inputs_miss() {
        let g = grid(&[(0, 0, 0, VoxelType::STONE)]);
        let origin = Point3::new(0.5, 300.5, 0.5);
        let up = Vector3::new(0.0, 1.0, 0.0);

        assert!(raycast(&g, origin, up, f32::NAN).is_none());
        assert!(raycast(&g, origin, up, f32::INFINITY).is_none());
        assert!(raycast(&g, Point3::new(f32::NAN, 0.5, 0.5), up, 5.0).is_none());
        assert!(raycast(&g, origin, Vector3::new(f32::NAN, 1.0, 0.0), 5.0).is_none());
    }

    #[test]
    fn starting_inside_solid_hits_immediately() {
        let g = grid(&[(0, 0, 0, VoxelType::STONE)]);
        let hit = raycast(
            &g,
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(1.0, 0.0, 0.0),
            5.0,
        )
        .unwrap();
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.normal, Vector3::new(0, 0, 0));
        assert_eq!(hit.cell, Point3::new(0, 0, 0));
    }

    #[test]
    fn water_counts_as_occupied() {
        let g = grid(&[(0, 3, 0, VoxelType::WATER)]);
        let hit = raycast(
            &g,
            Point3::new(0.5, 6.5, 0.5),
            Vector3::new(0.0, -1.0, 0.0),
            5.0,
        )
        .unwrap();
        assert_eq!(hit.voxel, VoxelType::WATER);
        assert_eq!(hit.normal, Vector3::new(0, 1, 0));
        assert_eq!(hit.place_target(), Point3::new(0, 4, 0));
    }
}
