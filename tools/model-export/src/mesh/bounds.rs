use glam::Vec3;
use model_common::BoundingSphere;

/// Fast enclosing sphere: center is the mean of the points, radius the
/// largest distance from it. Not minimal. An empty set gives a zero sphere.
pub fn bounding_sphere(points: &[Vec3]) -> BoundingSphere {
    if points.is_empty() {
        return BoundingSphere::default();
    }

    let center = points.iter().copied().sum::<Vec3>() / points.len() as f32;
    let radius = points
        .iter()
        .map(|p| p.distance(center))
        .fold(0.0f32, f32::max);

    BoundingSphere {
        center: center.to_array(),
        radius,
    }
}
