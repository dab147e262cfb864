//! Math types for fighter model records
//!
//! Provides POD (Plain Old Data) math types that are serializable and
//! can be shared across crates without requiring glam as a dependency.

use bitcode::{Decode, Encode};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 4x4 bone transform as stored in skeleton records (POD type)
///
/// The record layout puts the translation in `rows[3]`, so each stored row is
/// one column of the equivalent column-vector matrix.
///
/// Memory layout (64 bytes):
/// - rows[0..3]: basis vectors X, Y, Z with w = 0
/// - rows[3]: translation with w = 1
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Encode, Decode, Pod, Zeroable)]
#[repr(C)]
pub struct Matrix4x4 {
    pub rows: [[f32; 4]; 4],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4x4 {
    /// Identity matrix (no transformation)
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Create from row arrays
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Convert to flat f32 array (row-major)
    pub fn to_array(&self) -> [f32; 16] {
        bytemuck::cast(self.rows)
    }

    /// Create from flat f32 array (row-major)
    pub fn from_array(arr: [f32; 16]) -> Self {
        Self {
            rows: bytemuck::cast(arr),
        }
    }

    /// Translation stored in the last row
    pub fn translation(&self) -> [f32; 3] {
        let [x, y, z, _] = self.rows[3];
        [x, y, z]
    }

    /// Swap rows and columns
    pub fn transposed(&self) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = self.rows[j][i];
            }
        }
        Self { rows }
    }
}
