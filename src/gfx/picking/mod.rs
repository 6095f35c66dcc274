//! # Ray Picking
//!
//! Rays and axis-aligned boxes for hit-testing scene objects and gizmo
//! handles. The input collaborator is responsible for turning a pointer
//! position into a world-space [`Ray`]; everything here works in world
//! space only.
//!
//! ## Usage
//!
//! ```
//! use archgraph::gfx::picking::{Aabb, Ray};
//! use cgmath::Vector3;
//!
//! let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 2.0));
//! let cube = Aabb::from_center(Vector3::new(0.0, 0.0, 0.0), 0.5);
//! assert_eq!(cube.intersect_ray(&ray), Some(4.5));
//! ```

use cgmath::{ElementWise, InnerSpace, Vector3};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a ray; `direction` is normalized
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point along the ray at distance `t`
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Cube of half-size `half_extent` around `center`
    pub fn from_center(center: Vector3<f32>, half_extent: f32) -> Self {
        Self::from_center_extents(center, Vector3::new(half_extent, half_extent, half_extent))
    }

    pub fn from_center_extents(center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vector3<f32>) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }

    /// Slab test. Returns the distance along the ray to the entry point, or
    /// to the exit point when the origin is inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y).max(t1.z);
        let t_far = t2.x.min(t2.y).min(t2.z);

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }
}

/// Result of a pick
#[derive(Debug, Clone, PartialEq)]
pub struct PickResult<K> {
    /// What was hit
    pub key: K,
    /// Distance from the ray origin to the hit
    pub distance: f32,
    /// World space intersection point
    pub point: Vector3<f32>,
}

/// Nearest of `candidates` hit by `ray`.
pub fn pick_nearest<K, I>(ray: &Ray, candidates: I) -> Option<PickResult<K>>
where
    I: IntoIterator<Item = (K, Aabb)>,
{
    let mut closest: Option<PickResult<K>> = None;

    for (key, bounds) in candidates {
        let Some(distance) = bounds.intersect_ray(ray) else {
            continue;
        };
        if closest.as_ref().map_or(true, |best| distance < best.distance) {
            closest = Some(PickResult {
                key,
                distance,
                point: ray.point_at(distance),
            });
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_aabb_intersection() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(aabb.intersect_ray(&ray), Some(4.0));

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());

        let behind = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&behind).is_none());

        let inside = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(aabb.intersect_ray(&inside), Some(1.0));
    }

    #[test]
    fn test_pick_nearest_prefers_closer_box() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        let candidates = vec![
            ("far", Aabb::from_center(Vector3::new(0.0, 0.0, -3.0), 0.5)),
            ("near", Aabb::from_center(Vector3::new(0.0, 0.0, 3.0), 0.5)),
            ("off", Aabb::from_center(Vector3::new(4.0, 0.0, 5.0), 0.5)),
        ];

        let hit = pick_nearest(&ray, candidates).unwrap();
        assert_eq!(hit.key, "near");
        assert_eq!(hit.distance, 6.5);
        assert_eq!(hit.point, Vector3::new(0.0, 0.0, 3.5));
    }

    #[test]
    fn test_pick_nothing() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 1.0, 0.0));
        let hit = pick_nearest(&ray, vec![(1, Aabb::from_center(Vector3::new(0.0, 0.0, 0.0), 1.0))]);
        assert!(hit.is_none());
    }
}
