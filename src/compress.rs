//! The compression wrapper around encoded payloads.
//!
//! Every payload is a single standard zstd frame, compressed at [`COMPRESSION_LEVEL`], with the
//! content size written into the frame header and a content checksum at the end. The decoded
//! length is always taken from the frame itself.

use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};

/// The zstd compression level used for every payload.
pub const COMPRESSION_LEVEL: i32 = 3;

#[derive(Debug, Clone)]
pub enum CompressionError {
    ExceededSize { max: usize, actual: usize },
    ZstdInner(usize),
    Parsing(&'static str),
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionError::ExceededSize { max, actual } => write!(
                f,
                "Decompressed size is {} bytes, larger than max of {} bytes",
                actual, max
            ),
            CompressionError::ZstdInner(v) => write!(
                f,
                "zstd failure, code {} ({})",
                v,
                zstd_safe::get_error_name(*v)
            ),
            CompressionError::Parsing(s) => f.write_str(s),
        }
    }
}

impl std::error::Error for CompressionError {}

impl From<zstd_safe::ErrorCode> for CompressionError {
    fn from(value: zstd_safe::ErrorCode) -> Self {
        CompressionError::ZstdInner(value)
    }
}

impl From<CompressionError> for Error {
    fn from(value: CompressionError) -> Self {
        match value {
            CompressionError::ExceededSize { max, actual } => Error::LengthTooLong { max, actual },
            other => Error::FailDecompress(other.to_string()),
        }
    }
}

/// Compress a payload. The output is deterministic for a given input.
pub fn compress(src: &[u8]) -> Result<Vec<u8>> {
    let out = zstd_compress(src).map_err(|e| Error::BadEncode(e.to_string()))?;
    trace!(raw = src.len(), compressed = out.len(), "compressed payload");
    Ok(out)
}

/// Decompress a payload produced by [`compress`]. Fails if the input isn't exactly one complete,
/// uncorrupted frame, or if the frame declares more than `max_size` bytes of content.
pub fn decompress(src: &[u8], max_size: usize) -> Result<Vec<u8>> {
    let out = zstd_decompress(src, max_size)?;
    trace!(compressed = src.len(), raw = out.len(), "decompressed payload");
    Ok(out)
}

fn zstd_compress(input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    use zstd_safe::{compress_bound, CCtx, CParameter};
    let mut ctx = CCtx::create();
    ctx.set_parameter(CParameter::CompressionLevel(COMPRESSION_LEVEL))?;
    ctx.set_parameter(CParameter::ChecksumFlag(true))?;
    ctx.set_parameter(CParameter::ContentSizeFlag(true))?;
    ctx.set_parameter(CParameter::DictIdFlag(false))?;
    ctx.set_pledged_src_size(Some(input.len() as u64))?;

    let mut output = Vec::with_capacity(compress_bound(input.len()));
    ctx.compress2(&mut output, input)?;
    Ok(output)
}

fn zstd_decompress(input: &[u8], max_size: usize) -> Result<Vec<u8>, CompressionError> {
    use zstd_safe::{find_frame_compressed_size, get_frame_content_size, DCtx};

    let out_size = match get_frame_content_size(input) {
        Ok(Some(size)) => size,
        Ok(None) => return Err(CompressionError::Parsing("Missing frame content size")),
        Err(_) => return Err(CompressionError::Parsing("Not a complete zstd frame header")),
    };
    if out_size > max_size as u64 {
        return Err(CompressionError::ExceededSize {
            max: max_size,
            actual: usize::try_from(out_size).unwrap_or(usize::MAX),
        });
    }
    // Also catches truncation inside the frame before any output is allocated.
    let frame_size = find_frame_compressed_size(input)?;
    if frame_size != input.len() {
        return Err(CompressionError::Parsing("Trailing bytes after compressed frame"));
    }

    let out_size = out_size as usize;
    let mut output = Vec::with_capacity(out_size);
    let mut dtx = DCtx::create();
    let used_len = dtx.decompress(&mut output, input)?;
    if used_len != out_size {
        return Err(CompressionError::Parsing(
            "Decompressed size doesn't match promised size",
        ));
    }
    Ok(output)
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut raw = Vec::new();
        for i in 0..200 {
            raw.extend_from_slice(format!("{{\"line\":{},\"text\":\"hover {}\"}}", i, i % 7).as_bytes());
        }
        raw
    }

    #[test]
    fn roundtrip() {
        let raw = sample();
        let enc = compress(&raw).unwrap();
        assert!(enc.len() < raw.len(), "Compression should shrink repetitive input");
        let dec = decompress(&enc, usize::MAX).unwrap();
        assert_eq!(dec, raw);
    }

    #[test]
    fn empty_roundtrip() {
        let enc = compress(&[]).unwrap();
        assert!(!enc.is_empty());
        assert!(decompress(&enc, 0).unwrap().is_empty());
    }

    #[test]
    fn deterministic() {
        let raw = sample();
        assert_eq!(compress(&raw).unwrap(), compress(&raw).unwrap());
    }

    #[test]
    fn every_truncation_fails() {
        let enc = compress(&sample()).unwrap();
        for len in 0..enc.len() {
            match decompress(&enc[..len], usize::MAX) {
                Err(Error::FailDecompress(_)) => (),
                other => panic!("Prefix of length {} gave {:?}", len, other),
            }
        }
    }

    #[test]
    fn trailing_bytes_fail() {
        let mut enc = compress(&sample()).unwrap();
        enc.push(0);
        assert!(matches!(
            decompress(&enc, usize::MAX),
            Err(Error::FailDecompress(_))
        ));
    }

    #[test]
    fn corrupt_body_fails() {
        let enc = compress(&sample()).unwrap();
        // Flip a byte in the middle of the block data; the checksum or block parser must notice.
        let mut bad = enc.clone();
        let mid = bad.len() / 2;
        bad[mid] ^= 0xFF;
        assert!(decompress(&bad, usize::MAX).is_err());
    }

    #[test]
    fn garbage_fails() {
        let garbage = b"{\"ranges\": not compressed at all}";
        assert!(matches!(
            decompress(garbage, usize::MAX),
            Err(Error::FailDecompress(_))
        ));
    }

    #[test]
    fn size_limit() {
        let raw = sample();
        let enc = compress(&raw).unwrap();
        match decompress(&enc, raw.len() - 1) {
            Err(Error::LengthTooLong { max, actual }) => {
                assert_eq!(max, raw.len() - 1);
                assert_eq!(actual, raw.len());
            }
            other => panic!("Expected a length error, got {:?}", other),
        }
        assert_eq!(decompress(&enc, raw.len()).unwrap(), raw);
    }
}
