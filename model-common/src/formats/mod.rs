//! Fighter model binary records
//!
//! Every record is a plain decoded structure. The byte layout is owned by the
//! [`RecordCodec`] implementation, so conversion code never touches bytes.
//!
//! File naming constants (extensions, stem) are defined in `fighter_shared::ModelFormat`.

mod codec;
pub mod matl;
pub mod mesh;
pub mod meshex;
pub mod modl;
pub mod skel;

pub use codec::{BitcodeCodec, CodecError, ModelRecord, RecordCodec, read_record, write_record};
pub use matl::*;
pub use mesh::*;
pub use meshex::*;
pub use modl::*;
pub use skel::*;
