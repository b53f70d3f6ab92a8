//! Melee cone sweep
//!
//! # Geometry
//!
//! ```text
//!            left edge        right edge
//!                 \     ...     /
//!                  \   rays    /
//!                   \ ±arc/2 /
//!                    \       /
//!                     origin (position + origin_height)
//! ```
//!
//! `rays` directions are spread evenly by angle between the two edges of the
//! arc (±arc/2 around Y from the attack direction), so arcs wider than 180°
//! still center on the attack direction. Every
//! ray is cast up to `range`; the hit set is deduplicated so a target struck
//! by several rays is damaged once.

use bevy::prelude::*;

use crate::collaborators::SpatialQuery;

/// Ray directions across the arc, left edge first.
///
/// A single ray points straight along `forward`.
pub fn sweep_directions(forward: Vec3, arc_degrees: f32, rays: usize) -> Vec<Vec3> {
    let forward = forward.try_normalize().unwrap_or(Vec3::NEG_Z);
    if rays <= 1 {
        return vec![forward];
    }

    let arc = arc_degrees.to_radians();
    let half_arc = arc * 0.5;

    (0..rays)
        .map(|i| {
            let t = i as f32 / (rays - 1) as f32;
            Quat::from_rotation_y(half_arc - t * arc) * forward
        })
        .collect()
}

/// Cast every direction from `origin` and collect distinct targets, in first
/// hit order.
pub fn melee_sweep<Q: SpatialQuery>(
    query: &Q,
    origin: Vec3,
    directions: &[Vec3],
    range: f32,
) -> Vec<Q::Target> {
    let mut hits: Vec<Q::Target> = Vec::new();
    for direction in directions {
        if let Some(target) = query.raycast(origin, *direction, range) {
            if !hits.contains(&target) {
                hits.push(target);
            }
        }
    }
    hits
}

/// Distance along a normalized ray to a sphere, `None` if missed or beyond
/// `max_distance`. A ray starting inside the sphere hits at distance 0.
pub fn ray_sphere_distance(
    origin: Vec3,
    direction: Vec3,
    center: Vec3,
    radius: f32,
    max_distance: f32,
) -> Option<f32> {
    let offset = origin - center;
    let b = offset.dot(direction);
    let c = offset.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let far = -b + root;
    if far < 0.0 {
        return None;
    }

    let near = (-b - root).max(0.0);
    (near <= max_distance).then_some(near)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Spheres on the XZ plane; returns the nearest one hit.
    struct Spheres(Vec<(u32, Vec3, f32)>);

    impl SpatialQuery for Spheres {
        type Target = u32;

        fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<u32> {
            self.0
                .iter()
                .filter_map(|(id, center, radius)| {
                    ray_sphere_distance(origin, direction, *center, *radius, max_distance)
                        .map(|distance| (distance, *id))
                })
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(_, id)| id)
        }
    }

    #[test]
    fn test_sweep_directions_span_arc() {
        let directions = sweep_directions(Vec3::Z, 90.0, 10);
        assert_eq!(directions.len(), 10);

        for direction in &directions {
            assert!((direction.length() - 1.0).abs() < 1e-5);
        }

        // Edges are ±45° from forward
        let first = directions[0];
        let last = directions[9];
        assert!((first.angle_between(Vec3::Z).to_degrees() - 45.0).abs() < 1e-3);
        assert!((last.angle_between(Vec3::Z).to_degrees() - 45.0).abs() < 1e-3);
        assert!((first.angle_between(last).to_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_single_ray_points_forward() {
        let directions = sweep_directions(Vec3::new(0.0, 0.0, 3.0), 90.0, 1);
        assert_eq!(directions, vec![Vec3::Z]);
    }

    #[test]
    fn test_wide_arc_stays_centered_on_forward() {
        let config = crate::config::PlayerConfig::from_ron_str("(melee: (arc_degrees: 270.0))").unwrap();
        let directions = sweep_directions(Vec3::NEG_Z, config.melee.arc_degrees, config.melee.rays);

        let ahead = Spheres(vec![(1, Vec3::new(0.0, 0.0, -1.5), 0.5)]);
        let behind = Spheres(vec![(2, Vec3::new(0.0, 0.0, 1.5), 0.5)]);
        assert_eq!(melee_sweep(&ahead, Vec3::ZERO, &directions, 2.0), vec![1]);
        assert!(melee_sweep(&behind, Vec3::ZERO, &directions, 2.0).is_empty());

        // Edges 135° to each side, every ray within the arc
        for direction in &directions {
            assert!(direction.angle_between(Vec3::NEG_Z).to_degrees() <= 135.0 + 1e-3);
        }
        assert!((directions[0].angle_between(Vec3::NEG_Z).to_degrees() - 135.0).abs() < 1e-3);
    }

    #[test]
    fn test_sweep_deduplicates_targets() {
        // One big target right in front: every ray hits it
        let world = Spheres(vec![(7, Vec3::new(0.0, 0.0, 1.5), 1.5)]);
        let directions = sweep_directions(Vec3::Z, 90.0, 10);

        let hits = melee_sweep(&world, Vec3::ZERO, &directions, 2.0);
        assert_eq!(hits, vec![7]);
    }

    #[test]
    fn test_sweep_respects_range() {
        let world = Spheres(vec![(1, Vec3::new(0.0, 0.0, 5.0), 0.5)]);
        let directions = sweep_directions(Vec3::Z, 90.0, 10);

        assert!(melee_sweep(&world, Vec3::ZERO, &directions, 2.0).is_empty());
        assert_eq!(melee_sweep(&world, Vec3::ZERO, &directions, 5.0), vec![1]);
    }

    #[test]
    fn test_ray_sphere_distance() {
        let hit = ray_sphere_distance(Vec3::ZERO, Vec3::X, Vec3::new(3.0, 0.0, 0.0), 1.0, 10.0);
        assert_eq!(hit, Some(2.0));

        // Behind the origin
        assert_eq!(
            ray_sphere_distance(Vec3::ZERO, Vec3::X, Vec3::new(-3.0, 0.0, 0.0), 1.0, 10.0),
            None
        );

        // Inside
        assert_eq!(
            ray_sphere_distance(Vec3::ZERO, Vec3::X, Vec3::ZERO, 1.0, 10.0),
            Some(0.0)
        );
    }
}
