//! Material record (.numatb)
//!
//! Each entry is a flat list of parameters. A parameter is identified by a
//! [`ParamId`] (kind + index, e.g. `CustomVector3`) and carries a payload typed
//! by that kind.

use std::fmt;
use std::str::FromStr;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::ModelRecord;

/// Error returned when a canonical name does not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} name: {value:?}")]
pub struct ParseNameError {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a fieldless enum whose variants round-trip through their names.
macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = ParseNameError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == s)
                    .ok_or_else(|| ParseNameError {
                        kind: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }
    };
}

named_enum!(BlendFactor {
    Zero,
    One,
    SourceAlpha,
    DestinationAlpha,
    SourceColor,
    DestinationColor,
    OneMinusSourceAlpha,
    OneMinusDestinationAlpha,
    OneMinusSourceColor,
    OneMinusDestinationColor,
    SourceAlphaSaturate,
});

named_enum!(FillMode { Line, Solid });

named_enum!(CullMode {
    Back,
    Front,
    Disabled,
});

named_enum!(WrapMode {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
    ClampToBorder,
});

named_enum!(MinFilter {
    Nearest,
    LinearMipmapLinear,
    LinearMipmapLinear2,
});

named_enum!(MagFilter {
    Nearest,
    Linear,
    Linear2,
});

named_enum!(MaxAnisotropy {
    One,
    Two,
    Four,
    Eight,
    Sixteen,
});

named_enum!(
    /// Parameter kinds. Each kind owns a contiguous block of numeric ids.
    ParamKind {
        BlendState,
        RasterizerState,
        Texture,
        Sampler,
        CustomBoolean,
        CustomFloat,
        CustomVector,
        UvTransform,
    }
);

impl ParamKind {
    /// Number of indices available for this kind.
    pub const fn count(self) -> u32 {
        match self {
            ParamKind::BlendState | ParamKind::RasterizerState => 1,
            ParamKind::Texture
            | ParamKind::Sampler
            | ParamKind::CustomBoolean
            | ParamKind::CustomFloat => 20,
            ParamKind::CustomVector => 64,
            ParamKind::UvTransform => 5,
        }
    }

    /// First numeric id of this kind's block.
    const fn base(self) -> u32 {
        let mut base = 0;
        let mut i = 0;
        while i < Self::ALL.len() {
            let kind = Self::ALL[i];
            if kind as u8 == self as u8 {
                break;
            }
            base += kind.count();
            i += 1;
        }
        base
    }
}

/// Parameter identity, displayed as `<Kind><index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct ParamId {
    kind: ParamKind,
    index: u32,
}

impl ParamId {
    pub const BLEND_STATE0: ParamId = ParamId {
        kind: ParamKind::BlendState,
        index: 0,
    };
    pub const RASTERIZER_STATE0: ParamId = ParamId {
        kind: ParamKind::RasterizerState,
        index: 0,
    };

    /// Returns `None` when `index` is outside the kind's range.
    pub fn new(kind: ParamKind, index: u32) -> Option<Self> {
        (index < kind.count()).then_some(Self { kind, index })
    }

    pub fn kind(self) -> ParamKind {
        self.kind
    }

    pub fn index(self) -> u32 {
        self.index
    }

    /// Stable numeric id across all kinds.
    pub fn id(self) -> u32 {
        self.kind.base() + self.index
    }

    /// The `SamplerN` paired with a `TextureN`.
    pub fn paired_sampler(self) -> Option<ParamId> {
        match self.kind {
            ParamKind::Texture => ParamId::new(ParamKind::Sampler, self.index),
            _ => None,
        }
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.name(), self.index)
    }
}

impl FromStr for ParamId {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNameError {
            kind: "ParamId",
            value: s.to_string(),
        };
        let digits_at = s.find(|c: char| c.is_ascii_digit()).ok_or_else(err)?;
        let (prefix, digits) = s.split_at(digits_at);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let kind = ParamKind::from_str(prefix).map_err(|_| err())?;
        let index = digits.parse().map_err(|_| err())?;
        ParamId::new(kind, index).ok_or_else(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct BlendStateData {
    pub source_color: BlendFactor,
    pub destination_color: BlendFactor,
    pub alpha_sample_to_coverage: bool,
}

impl Default for BlendStateData {
    fn default() -> Self {
        Self {
            source_color: BlendFactor::One,
            destination_color: BlendFactor::Zero,
            alpha_sample_to_coverage: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct RasterizerStateData {
    pub fill_mode: FillMode,
    pub cull_mode: CullMode,
    pub depth_bias: f32,
}

impl Default for RasterizerStateData {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Solid,
            cull_mode: CullMode::Back,
            depth_bias: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct SamplerData {
    pub wraps: WrapMode,
    pub wrapt: WrapMode,
    pub wrapr: WrapMode,
    pub min_filter: MinFilter,
    pub mag_filter: MagFilter,
    pub border_color: [f32; 4],
    pub lod_bias: f32,
    /// `None` disables anisotropic filtering
    pub max_anisotropy: Option<MaxAnisotropy>,
}

impl Default for SamplerData {
    fn default() -> Self {
        Self {
            wraps: WrapMode::Repeat,
            wrapt: WrapMode::Repeat,
            wrapr: WrapMode::Repeat,
            min_filter: MinFilter::LinearMipmapLinear,
            mag_filter: MagFilter::Linear,
            border_color: [0.0; 4],
            lod_bias: 0.0,
            max_anisotropy: None,
        }
    }
}

/// Kind-typed parameter payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub enum ParamData {
    BlendState(BlendStateData),
    RasterizerState(RasterizerStateData),
    Sampler(SamplerData),
    /// Texture file name without extension
    Texture(String),
    Boolean(bool),
    Float(f32),
    Vector4([f32; 4]),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MatlParam {
    pub param_id: ParamId,
    pub data: ParamData,
}

impl MatlParam {
    pub fn new(param_id: ParamId, data: ParamData) -> Self {
        Self { param_id, data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MatlEntryData {
    pub material_label: String,
    pub shader_label: String,
    pub parameters: Vec<MatlParam>,
}

impl MatlEntryData {
    pub fn new(material_label: impl Into<String>, shader_label: impl Into<String>) -> Self {
        Self {
            material_label: material_label.into(),
            shader_label: shader_label.into(),
            parameters: Vec::new(),
        }
    }

    pub fn get(&self, param_id: ParamId) -> Option<&ParamData> {
        self.parameters
            .iter()
            .find(|p| p.param_id == param_id)
            .map(|p| &p.data)
    }

    /// Texture names referenced by this entry.
    pub fn texture_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().filter_map(|p| match &p.data {
            ParamData::Texture(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct MatlData {
    pub entries: Vec<MatlEntryData>,
}

impl MatlData {
    pub fn find(&self, material_label: &str) -> Option<&MatlEntryData> {
        self.entries
            .iter()
            .find(|e| e.material_label == material_label)
    }
}

impl ModelRecord for MatlData {
    const MAGIC: [u8; 4] = *b"LTAM";
}
