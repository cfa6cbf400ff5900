//! Poisson-disk point sampling (Bridson's algorithm) over a rectangle.
//!
//! Points are never closer than `min_distance`; new candidates are spawned in
//! the annulus `[min_distance, max_distance]` around an active point. All
//! randomness comes from the caller's generator, so the result is fully
//! determined by its seed.

use std::f64::consts::TAU;

/// Slack for candidates spawned exactly `min_distance` away from their parent.
const DISTANCE_EPSILON: f64 = 1e-9;

/// Samples points in `[0, width) x [0, height)`.
pub fn sample(
    rng: &mut fastrand::Rng,
    width: f64,
    height: f64,
    min_distance: f64,
    max_distance: f64,
    tries: u32,
) -> Vec<[f64; 2]> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(width) || !usable(height) || !usable(min_distance) {
        return Vec::new();
    }
    let max_distance = max_distance.max(min_distance);

    let cell_size = min_distance / std::f64::consts::SQRT_2;
    let grid_width = (width / cell_size).ceil() as usize;
    let grid_height = (height / cell_size).ceil() as usize;
    let mut grid: Vec<Option<usize>> = vec![None; grid_width * grid_height];

    let cell_of = |p: [f64; 2]| -> (usize, usize) {
        (
            ((p[0] / cell_size) as usize).min(grid_width - 1),
            ((p[1] / cell_size) as usize).min(grid_height - 1),
        )
    };

    let mut points: Vec<[f64; 2]> = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    let first = [rng.f64() * width, rng.f64() * height];
    let (gx, gy) = cell_of(first);
    grid[gx + gy * grid_width] = Some(0);
    points.push(first);
    active.push(0);

    while !active.is_empty() {
        let slot = rng.usize(..active.len());
        let parent = points[active[slot]];
        let mut accepted = false;

        for _ in 0..tries {
            let angle = rng.f64() * TAU;
            let distance = min_distance + rng.f64() * (max_distance - min_distance);
            let candidate = [
                parent[0] + angle.cos() * distance,
                parent[1] + angle.sin() * distance,
            ];

            if !(0.0..width).contains(&candidate[0]) || !(0.0..height).contains(&candidate[1]) {
                continue;
            }

            let (cx, cy) = cell_of(candidate);
            let too_close = (cy.saturating_sub(2)..(cy + 3).min(grid_height)).any(|y| {
                (cx.saturating_sub(2)..(cx + 3).min(grid_width)).any(|x| {
                    grid[x + y * grid_width].is_some_and(|index| {
                        let other = points[index];
                        let dx = other[0] - candidate[0];
                        let dy = other[1] - candidate[1];
                        dx * dx + dy * dy < min_distance * min_distance - DISTANCE_EPSILON
                    })
                })
            });
            if too_close {
                continue;
            }

            let index = points.len();
            grid[cx + cy * grid_width] = Some(index);
            points.push(candidate);
            active.push(index);
            accepted = true;
            break;
        }

        if !accepted {
            active.swap_remove(slot);
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_respect_minimum_spacing() {
        let mut rng = fastrand::Rng::with_seed(42);
        let points = sample(&mut rng, 64.0, 64.0, 4.0, 8.0, 30);
        assert!(points.len() > 20, "expected a dense fill, got {}", points.len());

        for (i, a) in points.iter().enumerate() {
            assert!((0.0..64.0).contains(&a[0]) && (0.0..64.0).contains(&a[1]));
            for b in &points[i + 1..] {
                let d = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
                assert!(d >= 4.0 - 1e-6, "points {a:?} and {b:?} are {d} apart");
            }
        }
    }

    #[test]
    fn same_seed_same_points() {
        let a = sample(&mut fastrand::Rng::with_seed(9), 16.0, 16.0, 13.0, 13.0, 10);
        let b = sample(&mut fastrand::Rng::with_seed(9), 16.0, 16.0, 13.0, 13.0, 10);
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn degenerate_domain_is_empty() {
        let mut rng = fastrand::Rng::with_seed(1);
        assert!(sample(&mut rng, 0.0, 16.0, 2.0, 4.0, 10).is_empty());
        assert!(sample(&mut rng, 16.0, 16.0, 0.0, 4.0, 10).is_empty());
        assert!(sample(&mut rng, 16.0, 16.0, f64::NAN, 4.0, 10).is_empty());
    }
}
