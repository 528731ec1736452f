//! Marshaling records to and from compressed bytes.
//!
//! Encoding serializes a record to JSON and compresses the result. Decoding decompresses, parses
//! the JSON into an untyped tree, then converts that tree into the record type in a second pass.
//! Either way the call completes fully or fails with no partial output.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::deferred::Deferred;
use crate::document::{decode_document, DocumentData};
use crate::error::{Error, Result};
use crate::result_chunk::{decode_result_chunk, ResultChunkData};
use crate::{compress, CodecConfig};

/// Converts bundle records to and from their stored byte form.
///
/// Implementations are pure: they hold no mutable state and can be shared freely between threads.
pub trait Codec {
    fn marshal_document_data(&self, document: &DocumentData) -> Result<Vec<u8>>;
    fn unmarshal_document_data(&self, data: &[u8]) -> Result<DocumentData>;
    fn marshal_result_chunk_data(&self, chunk: &ResultChunkData) -> Result<Vec<u8>>;
    fn unmarshal_result_chunk_data(&self, data: &[u8]) -> Result<ResultChunkData>;
}

/// The zstd-compressed JSON codec.
#[derive(Clone, Debug, Default)]
pub struct JsonCodec {
    config: CodecConfig,
}

impl JsonCodec {
    /// Create a codec with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn marshal<T: Serialize>(&self, record: &T) -> Result<Vec<u8>> {
        let encoded = serde_json::to_vec(record).map_err(|e| Error::BadEncode(e.to_string()))?;
        compress::compress(&encoded)
    }

    fn unmarshal<T>(
        &self,
        data: &[u8],
        decode: impl FnOnce(&Deferred<'_, '_>) -> Result<T>,
    ) -> Result<T> {
        let raw = compress::decompress(data, self.config.max_decompressed_size)?;
        let payload: Value = serde_json::from_slice(&raw).map_err(|e| Error::BadFormat {
            path: "$".into(),
            reason: e.to_string(),
        })?;
        decode(&Deferred::root(&payload))
    }
}

impl Codec for JsonCodec {
    fn marshal_document_data(&self, document: &DocumentData) -> Result<Vec<u8>> {
        let data = self.marshal(document)?;
        debug!(
            ranges = document.ranges.len(),
            hover_results = document.hover_results.len(),
            monikers = document.monikers.len(),
            package_information = document.package_information.len(),
            bytes = data.len(),
            "marshaled document data"
        );
        Ok(data)
    }

    fn unmarshal_document_data(&self, data: &[u8]) -> Result<DocumentData> {
        let document = self
            .unmarshal(data, decode_document)
            .inspect_err(|err| {
                debug!(bytes = data.len(), %err, "failed to unmarshal document data")
            })?;
        debug!(
            ranges = document.ranges.len(),
            hover_results = document.hover_results.len(),
            monikers = document.monikers.len(),
            package_information = document.package_information.len(),
            bytes = data.len(),
            "unmarshaled document data"
        );
        Ok(document)
    }

    fn marshal_result_chunk_data(&self, chunk: &ResultChunkData) -> Result<Vec<u8>> {
        let data = self.marshal(chunk)?;
        debug!(
            document_paths = chunk.document_paths.len(),
            document_id_range_ids = chunk.document_id_range_ids.len(),
            bytes = data.len(),
            "marshaled result chunk data"
        );
        Ok(data)
    }

    fn unmarshal_result_chunk_data(&self, data: &[u8]) -> Result<ResultChunkData> {
        let chunk = self
            .unmarshal(data, decode_result_chunk)
            .inspect_err(|err| {
                debug!(bytes = data.len(), %err, "failed to unmarshal result chunk data")
            })?;
        debug!(
            document_paths = chunk.document_paths.len(),
            document_id_range_ids = chunk.document_id_range_ids.len(),
            bytes = data.len(),
            "unmarshaled result chunk data"
        );
        Ok(chunk)
    }
}
