//! Skeleton conversion between skeleton records and editor armatures.

mod export;
mod hierarchy;
mod import;
mod lengths;

pub use export::{export_skeleton, LinkMode};
pub use hierarchy::Hierarchy;
pub use import::{import_skeleton, record_hierarchy, record_world_transforms};
pub use lengths::{bone_lengths, DEFAULT_BONE_LENGTH};
