//! Slot layout tables for material parameters.
//!
//! Vector parameters do not follow one naming pattern: some are a single
//! color slot, some split into RGB and Alpha, some into four floats, and many
//! carry legacy descriptions in their slot names. Every layout is listed here
//! with its arity so import and export never infer it from the graph.

use std::sync::OnceLock;

use indexmap::IndexMap;
use model_common::{ParamId, ParamKind};

/// Bumped whenever a slot name or arity in this module changes.
pub const SLOT_SCHEMA_VERSION: u32 = 1;

pub const BLEND_SOURCE_SLOT: &str = "BlendState0 Field1 (Source Color)";
pub const BLEND_DESTINATION_SLOT: &str = "BlendState0 Field3 (Destination Color)";
pub const BLEND_ALPHA_TO_COVERAGE_SLOT: &str = "BlendState0 Field7 (Alpha to Coverage)";

pub const RASTERIZER_FILL_SLOT: &str = "RasterizerState0 Field1 (Polygon Fill)";
pub const RASTERIZER_CULL_SLOT: &str = "RasterizerState0 Field2 (Cull Mode)";
pub const RASTERIZER_DEPTH_BIAS_SLOT: &str = "RasterizerState0 Field3 (Depth Bias)";

/// Highest `CustomVectorN` with a slot in the shader graph.
pub const LAST_GRAPH_VECTOR: u32 = 60;

/// How a vector parameter's four components map onto slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorArity {
    /// One color slot holding (x, y, z, w)
    Single,
    /// Color slot (x, y, z, 1) plus a float slot for w
    ColorAlpha,
    /// Four float slots
    Components,
}

impl VectorArity {
    pub const fn slot_count(self) -> usize {
        match self {
            VectorArity::Single => 1,
            VectorArity::ColorAlpha => 2,
            VectorArity::Components => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorLayout {
    pub param: ParamId,
    pub arity: VectorArity,
    /// Full slot names, `arity.slot_count()` of them
    pub slots: Vec<String>,
}

/// Vector parameters whose slots are not a bare `CustomVectorN`.
const NAMED_VECTORS: &[(u32, VectorArity, &[&str])] = &[
    (
        0,
        VectorArity::Components,
        &["X (Min Texture Alpha)", "Y (???)", "Z (???)", "W (???)"],
    ),
    (3, VectorArity::Single, &["(Emission Color Multiplier)"]),
    (
        6,
        VectorArity::Components,
        &[
            "X (UV Transform Layer 1)",
            "Y (UV Transform Layer 1)",
            "Z (UV Transform Layer 1)",
            "W (UV Transform Layer 1)",
        ],
    ),
    (8, VectorArity::Single, &["(Final Color Multiplier)"]),
    (11, VectorArity::Single, &["(Fake SSS Color)"]),
    (13, VectorArity::Single, &["(Diffuse Color Multiplier)"]),
    (
        14,
        VectorArity::ColorAlpha,
        &["RGB (Rim Lighting Color)", "Alpha (Rim Lighting Blend Factor)"],
    ),
    (15, VectorArity::ColorAlpha, &["RGB", "Alpha"]),
    (
        18,
        VectorArity::Components,
        &[
            "X (Sprite Sheet Column Count)",
            "Y (Sprite Sheet Row Count)",
            "Z (Sprite Sheet Frames Per Sprite)",
            "W (Sprite Sheet Sprite Count)",
        ],
    ),
    (27, VectorArity::Single, &["(Controls Distant Fog, X = Intensity)"]),
    (
        30,
        VectorArity::Components,
        &[
            "X (SSS Blend Factor)",
            "Y (SSS Diffuse Shading Smooth Factor)",
            "Z (Unused)",
            "W (Unused)",
        ],
    ),
    (
        31,
        VectorArity::Components,
        &[
            "X (UV Transform Layer 2)",
            "Y (UV Transform Layer 2)",
            "Z (UV Transform Layer 2)",
            "W (UV Transform Layer 2)",
        ],
    ),
    (
        32,
        VectorArity::Components,
        &[
            "X (UV Transform Layer 3)",
            "Y (UV Transform Layer 3)",
            "Z (UV Transform Layer 3)",
            "W (UV Transform Layer 3)",
        ],
    ),
    (
        33,
        VectorArity::Components,
        &[
            "X (UV Transform ?)",
            "Y (UV Transform ?)",
            "Z (UV Transform ?)",
            "W (UV Transform ?)",
        ],
    ),
    (
        34,
        VectorArity::Components,
        &[
            "X (UV Transform ?)",
            "Y (UV Transform ?)",
            "Z (UV Transform ?)",
            "W (UV Transform ?)",
        ],
    ),
    (47, VectorArity::ColorAlpha, &["RGB", "Alpha"]),
];

fn build_layouts() -> IndexMap<ParamId, VectorLayout> {
    (0..=LAST_GRAPH_VECTOR)
        .filter_map(|index| ParamId::new(ParamKind::CustomVector, index))
        .map(|param| {
            let (arity, slots) = match NAMED_VECTORS.iter().find(|(i, _, _)| *i == param.index()) {
                Some(&(_, arity, suffixes)) => (
                    arity,
                    suffixes.iter().map(|s| format!("{param} {s}")).collect(),
                ),
                None => (VectorArity::Single, vec![param.to_string()]),
            };
            (param, VectorLayout { param, arity, slots })
        })
        .collect()
}

/// Every vector layout, in parameter order.
pub fn vector_layouts() -> &'static IndexMap<ParamId, VectorLayout> {
    static LAYOUTS: OnceLock<IndexMap<ParamId, VectorLayout>> = OnceLock::new();
    LAYOUTS.get_or_init(build_layouts)
}

pub fn vector_layout(param: ParamId) -> Option<&'static VectorLayout> {
    vector_layouts().get(&param)
}
