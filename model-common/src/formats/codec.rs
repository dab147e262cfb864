//! Record codec seam.
//!
//! Records are framed as a 4-byte magic followed by a bitcode payload. Callers
//! go through [`RecordCodec`] so the framing can be swapped without touching
//! the converters.

use std::fs;
use std::path::Path;

use bitcode::{DecodeOwned, Encode};

/// A decoded record that can be written to and read from a model folder.
pub trait ModelRecord: Encode + DecodeOwned {
    /// Magic bytes at the start of the encoded record
    const MAGIC: [u8; 4];
}

/// Errors raised while reading or writing records.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record too short: {0} bytes")]
    Truncated(usize),

    #[error("bad magic: expected {expected:?}, found {found:?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },

    #[error("invalid record payload: {0}")]
    Payload(#[from] bitcode::Error),
}

/// Encodes and decodes typed records.
pub trait RecordCodec {
    fn encode<R: ModelRecord>(&self, record: &R) -> Vec<u8>;

    fn decode<R: ModelRecord>(&self, bytes: &[u8]) -> Result<R, CodecError>;
}

/// Default codec: magic + bitcode payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct BitcodeCodec;

impl RecordCodec for BitcodeCodec {
    fn encode<R: ModelRecord>(&self, record: &R) -> Vec<u8> {
        let payload = bitcode::encode(record);
        let mut bytes = Vec::with_capacity(4 + payload.len());
        bytes.extend_from_slice(&R::MAGIC);
        bytes.extend_from_slice(&payload);
        bytes
    }

    fn decode<R: ModelRecord>(&self, bytes: &[u8]) -> Result<R, CodecError> {
        if bytes.len() < 4 {
            return Err(CodecError::Truncated(bytes.len()));
        }
        let found = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if found != R::MAGIC {
            return Err(CodecError::BadMagic {
                expected: R::MAGIC,
                found,
            });
        }
        Ok(bitcode::decode(&bytes[4..])?)
    }
}

/// Read a record from disk with the default codec.
pub fn read_record<R: ModelRecord>(path: &Path) -> Result<R, CodecError> {
    let bytes = fs::read(path)?;
    BitcodeCodec.decode(&bytes)
}

/// Write a record to disk with the default codec.
pub fn write_record<R: ModelRecord>(path: &Path, record: &R) -> Result<(), CodecError> {
    fs::write(path, BitcodeCodec.encode(record))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{BoneData, SkelData};
    use fighter_shared::Matrix4x4;

    fn sample_skel() -> SkelData {
        SkelData {
            bones: vec![BoneData {
                name: "Trans".to_string(),
                transform: Matrix4x4::IDENTITY,
                parent_index: None,
            }],
        }
    }

    #[test]
    fn test_encode_starts_with_magic() {
        let bytes = BitcodeCodec.encode(&sample_skel());
        assert_eq!(&bytes[0..4], &SkelData::MAGIC);
    }

    #[test]
    fn test_decode_rejects_wrong_magic() {
        let mut bytes = BitcodeCodec.encode(&sample_skel());
        bytes[0] = b'X';
        let err = BitcodeCodec.decode::<SkelData>(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::BadMagic { .. }));
    }

    #[test]
    fn test_decode_rejects_short_input() {
        let err = BitcodeCodec.decode::<SkelData>(&[1, 2]).unwrap_err();
        assert!(matches!(err, CodecError::Truncated(2)));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.nusktb");
        write_record(&path, &sample_skel()).unwrap();
        let skel: SkelData = read_record(&path).unwrap();
        assert_eq!(skel, sample_skel());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_record::<SkelData>(&dir.path().join("missing.nusktb")).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }
}
