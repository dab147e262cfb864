//! Matrix conventions between skeleton records and the editor.
//!
//! Skeleton records store each transform with the translation in the last
//! row, so a record's rows are the columns of the math matrix. The editor
//! additionally uses a bone basis rotated a quarter turn about Z relative to
//! the engine, which [`reorient`] and [`unreorient`] convert between.

use fighter_shared::Matrix4x4;
use glam::{Mat4, Vec4};

/// Editor orientation every root bone is given on import.
///
/// Rows: `[0, 1, 0, 0]`, `[0, 0, -1, 0]`, `[-1, 0, 0, 0]`, `[0, 0, 0, 1]`.
pub const ROOT_BASIS: Mat4 = Mat4::from_cols(
    Vec4::new(0.0, 0.0, -1.0, 0.0),
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, -1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.0, 1.0),
);

/// Record layout to math matrix.
pub fn record_to_mat4(m: &Matrix4x4) -> Mat4 {
    Mat4::from_cols_array_2d(&m.rows)
}

/// Math matrix to record layout.
pub fn mat4_to_record(m: Mat4) -> Matrix4x4 {
    Matrix4x4::from_rows(m.to_cols_array_2d())
}

/// Row-major element access: `rows[i][j]` is row `i`, column `j`.
fn to_rows(m: Mat4) -> [[f32; 4]; 4] {
    m.transpose().to_cols_array_2d()
}

fn from_rows(rows: [[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols_array_2d(&rows).transpose()
}

/// Engine to editor basis change for a non-root local transform.
///
/// With `transpose`, `m` is in record layout (rows are math columns).
/// Otherwise `m` is already given as math rows.
pub fn reorient(m: &[[f32; 4]; 4], transpose: bool) -> Mat4 {
    let c = if transpose {
        to_rows(Mat4::from_cols_array_2d(m))
    } else {
        *m
    };

    from_rows([
        [c[1][1], -c[1][0], -c[1][2], -c[1][3]],
        [-c[0][1], c[0][0], c[0][2], c[0][3]],
        [-c[2][1], c[2][0], c[2][2], c[2][3]],
        [c[3][0], c[3][1], c[3][2], c[3][3]],
    ])
}

/// Inverse of [`reorient`]. With `transpose`, the result is in record layout.
pub fn unreorient(m: Mat4, transpose: bool) -> [[f32; 4]; 4] {
    let o = to_rows(m);
    let rows = [
        [o[1][1], -o[1][0], o[1][2], o[1][3]],
        [-o[0][1], o[0][0], -o[0][2], -o[0][3]],
        [o[2][1], -o[2][0], o[2][2], o[2][3]],
        [o[3][0], o[3][1], o[3][2], o[3][3]],
    ];

    if transpose {
        from_rows(rows).to_cols_array_2d()
    } else {
        rows
    }
}

/// Root bones are not converted: the input is ignored and [`ROOT_BASIS`] is
/// returned, dropping any root translation.
pub fn reorient_root(_m: &[[f32; 4]; 4], _transpose: bool) -> Mat4 {
    ROOT_BASIS
}

/// World transform of a bone from its parent's world transform.
pub fn compose_world(parent_world: Mat4, local: Mat4) -> Mat4 {
    parent_world * local
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    const EPSILON: f32 = 1e-5;

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        assert!(a.abs_diff_eq(b, EPSILON), "{a:?} != {b:?}");
    }

    fn sample_local() -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(1.0, 1.0, 1.0),
            Quat::from_euler(glam::EulerRot::XYZ, 0.3, -1.1, 0.7),
            Vec3::new(1.5, -2.0, 0.25),
        )
    }

    #[test]
    fn test_record_layout_puts_translation_in_last_row() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let record = mat4_to_record(m);
        assert_eq!(record.rows[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(record_to_mat4(&record), m);
    }

    #[test]
    fn test_reorient_swaps_axes() {
        // Engine +Y translation maps to editor -X.
        let local = Mat4::from_translation(Vec3::new(0.0, 4.0, 0.0));
        let editor = reorient(&mat4_to_record(local).rows, true);
        assert_mat_eq(editor, Mat4::from_translation(Vec3::new(-4.0, 0.0, 0.0)));
    }

    #[test]
    fn test_reorient_is_conjugation_for_affine_matrices() {
        // L * M * L^-1 with L a quarter turn about Z.
        let l = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let m = sample_local();
        let expected = l * m * l.inverse();
        assert_mat_eq(reorient(&mat4_to_record(m).rows, true), expected);
    }

    #[test]
    fn test_unreorient_inverts_reorient() {
        let record = mat4_to_record(sample_local());
        let editor = reorient(&record.rows, true);
        let back = unreorient(editor, true);
        assert_mat_eq(
            Mat4::from_cols_array_2d(&back),
            Mat4::from_cols_array_2d(&record.rows),
        );
    }

    #[test]
    fn test_untransposed_inputs() {
        let rows = to_rows(sample_local());
        let editor = reorient(&rows, false);
        assert_eq!(unreorient(editor, false), rows);
    }

    #[test]
    fn test_reorient_root_ignores_input() {
        let a = reorient_root(&mat4_to_record(sample_local()).rows, true);
        let b = reorient_root(&Matrix4x4::IDENTITY.rows, false);
        assert_eq!(a, ROOT_BASIS);
        assert_eq!(b, ROOT_BASIS);
        assert_eq!(
            to_rows(ROOT_BASIS),
            [
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, -1.0, 0.0],
                [-1.0, 0.0, 0.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn test_parent_relative_roundtrip() {
        // world = parent * reorient(local); local = unreorient(parent^-1 * world)
        let parent_world = ROOT_BASIS * Mat4::from_translation(Vec3::new(0.0, 9.0, 1.0));
        let local = mat4_to_record(sample_local());
        let world = compose_world(parent_world, reorient(&local.rows, true));
        let relative = parent_world.inverse() * world;
        let recovered = unreorient(relative, true);
        assert_mat_eq(
            Mat4::from_cols_array_2d(&recovered),
            record_to_mat4(&local),
        );
    }

    #[test]
    fn test_compose_world_is_associative() {
        let a = Mat4::from_rotation_x(0.4);
        let b = sample_local();
        let c = Mat4::from_translation(Vec3::new(3.0, 0.0, -1.0));
        assert_mat_eq(
            compose_world(compose_world(a, b), c),
            compose_world(a, compose_world(b, c)),
        );
    }
}
