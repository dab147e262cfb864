//! Per-vertex tangents from positions, normals and the first UV set.

use glam::{Vec2, Vec3};

/// Accumulate per-triangle tangent and bitangent directions onto vertices,
/// then orthogonalize against the normal.
///
/// Output is xyz = tangent, w = handedness (+1 or -1). Vertices without a
/// usable UV gradient get an arbitrary tangent perpendicular to the normal.
pub fn calculate_tangents(
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
    uvs: &[[f32; 2]],
    indices: &[u32],
) -> Vec<[f32; 4]> {
    let count = positions.len();
    let mut tangents = vec![Vec3::ZERO; count];
    let mut bitangents = vec![Vec3::ZERO; count];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        if a >= count || b >= count || c >= count || a >= uvs.len() || b >= uvs.len() || c >= uvs.len()
        {
            continue;
        }

        let p0 = Vec3::from(positions[a]);
        let edge1 = Vec3::from(positions[b]) - p0;
        let edge2 = Vec3::from(positions[c]) - p0;

        let uv0 = Vec2::from(uvs[a]);
        let duv1 = Vec2::from(uvs[b]) - uv0;
        let duv2 = Vec2::from(uvs[c]) - uv0;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() <= f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (edge1 * duv2.y - edge2 * duv1.y) * r;
        let bitangent = (edge2 * duv1.x - edge1 * duv2.x) * r;

        for vertex in [a, b, c] {
            tangents[vertex] += tangent;
            bitangents[vertex] += bitangent;
        }
    }

    (0..count)
        .map(|i| {
            let normal = normals
                .get(i)
                .map(|n| Vec3::from(*n).normalize_or_zero())
                .filter(|n| *n != Vec3::ZERO)
                .unwrap_or(Vec3::Z);

            // Gram-Schmidt
            let tangent = (tangents[i] - normal * normal.dot(tangents[i])).normalize_or_zero();
            let tangent = if tangent == Vec3::ZERO {
                normal.any_orthonormal_vector()
            } else {
                tangent
            };

            let handedness = if normal.cross(tangent).dot(bitangents[i]) < 0.0 {
                -1.0
            } else {
                1.0
            };
            [tangent.x, tangent.y, tangent.z, handedness]
        })
        .collect()
}
