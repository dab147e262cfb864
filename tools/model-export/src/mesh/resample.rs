//! Per-corner and per-vertex attribute conversion.
//!
//! Editor attributes are stored per face corner; records store one value per
//! vertex. Going to per-vertex is lossy where corners of the same vertex
//! disagree (hard UV seams, split normals).

/// Collapse per-corner values onto vertices.
///
/// Untouched vertices get `T::default()`. When several corners share a
/// vertex, the last corner in corner order wins: faces in order, corners in
/// order within each face. Corners whose vertex is out of range are ignored;
/// callers validate indices first.
pub fn per_corner_to_per_vertex<T: Copy + Default>(
    corner_values: &[T],
    corner_vertices: &[u32],
    vertex_count: usize,
) -> Vec<T> {
    let mut per_vertex = vec![T::default(); vertex_count];
    for (value, &vertex) in corner_values.iter().zip(corner_vertices) {
        if let Some(slot) = per_vertex.get_mut(vertex as usize) {
            *slot = *value;
        }
    }
    per_vertex
}

/// Expand per-vertex values to one value per corner.
pub fn per_vertex_to_per_corner<T: Copy + Default>(values: &[T], corner_vertices: &[u32]) -> Vec<T> {
    corner_vertices
        .iter()
        .map(|&v| values.get(v as usize).copied().unwrap_or_default())
        .collect()
}

/// Record UV to editor UV, flipping V between the two texture origins.
///
/// Editor UVs are `f64`: `1 - v` is exact for any `f32` V of magnitude at
/// least 2^-29, so [`uv_to_record`] restores the record value bit for bit.
/// Smaller nonzero V values round on the way back.
#[inline]
pub fn uv_to_editor([u, v]: [f32; 2]) -> [f64; 2] {
    [f64::from(u), 1.0 - f64::from(v)]
}

/// Editor UV to record UV. Inverse of [`uv_to_editor`].
#[inline]
pub fn uv_to_record([u, v]: [f64; 2]) -> [f32; 2] {
    [u as f32, (1.0 - v) as f32]
}
