//! Result chunks: shards of the cross-document reference index.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::deferred::Deferred;
use crate::error::Result;
use crate::id::Id;
use crate::tagged;

/// One occurrence of a result: a range within a document.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentIdRangeId {
    pub document_id: Id,
    pub range_id: Id,
}

/// A shard of the definition and reference results in a bundle.
///
/// The occurrence lists in `document_id_range_ids` are ordered, and may hold the same pair more
/// than once; both properties survive encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultChunkData {
    #[serde(serialize_with = "tagged::serialize_map")]
    pub document_paths: BTreeMap<Id, String>,
    #[serde(serialize_with = "tagged::serialize_map")]
    pub document_id_range_ids: BTreeMap<Id, Vec<DocumentIdRangeId>>,
}

/// Build a result chunk from the first-pass parse of a payload.
pub(crate) fn decode_result_chunk(root: &Deferred<'_, '_>) -> Result<ResultChunkData> {
    Ok(ResultChunkData {
        document_paths: tagged::decode_map(&root.field("documentPaths")?, |node| {
            node.as_str().map(str::to_owned)
        })?,
        document_id_range_ids: tagged::decode_map(
            &root.field("documentIdRangeIds")?,
            decode_document_id_range_ids,
        )?,
    })
}

fn decode_document_id_range_ids(node: &Deferred<'_, '_>) -> Result<Vec<DocumentIdRangeId>> {
    if node.is_null() {
        return Ok(Vec::new());
    }
    node.elements()?
        .map(|pair| -> Result<DocumentIdRangeId> {
            Ok(DocumentIdRangeId {
                document_id: pair.field("documentId")?.to_id()?,
                range_id: pair.field("rangeId")?.to_id()?,
            })
        })
        .collect()
}
