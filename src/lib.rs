//! codeintel-pack stores the records of a code-intelligence bundle as compact, self-describing
//! byte blobs, and reads them back without losing any of their structure.
//!
//! A bundle is split into two kinds of record:
//!
//! - [`DocumentData`]: everything indexed about one source file. Its ranges, hover text, monikers,
//!   and package information, each keyed by a bundle-local [`Id`].
//! - [`ResultChunkData`]: a shard of the definition/reference index, mapping result identifiers to
//!   the ordered list of document ranges where they occur.
//!
//! Records are encoded as JSON and compressed with zstd. JSON objects can only have string keys,
//! and JSON has no notion of a set, so every identifier-keyed map and every identifier set is
//! written as a tagged collection (`{"type": "map", "value": [[key, value], ...]}` or
//! `{"type": "set", "value": [...]}`). On decode, the tag is checked against what each field is
//! supposed to hold, and any mismatch is reported along with the path to the offending field.
//!
//! ```
//! use codeintel_pack::{Codec, DocumentData, JsonCodec, RangeData};
//!
//! let codec = JsonCodec::new();
//! let mut doc = DocumentData::default();
//! let mut range = RangeData::new(0, 0, 1, 5);
//! range.hover_result_id = Some("h1".parse().unwrap());
//! doc.ranges.insert("r1".parse().unwrap(), range);
//! doc.hover_results.insert("h1".parse().unwrap(), "docstring".into());
//!
//! let bytes = codec.marshal_document_data(&doc).unwrap();
//! assert_eq!(codec.unmarshal_document_data(&bytes).unwrap(), doc);
//! ```
//!
//! All operations are pure and the codec holds no mutable state, so a single [`JsonCodec`] can be
//! shared across any number of threads.

mod codec;
mod config;
mod deferred;
mod document;
mod error;
mod id;
mod result_chunk;
mod tagged;

pub mod compress;

pub use codec::{Codec, JsonCodec};
pub use config::CodecConfig;
pub use document::{DocumentData, MonikerData, MonikerKind, PackageInformationData, RangeData};
pub use error::{Error, Result};
pub use id::Id;
pub use result_chunk::{DocumentIdRangeId, ResultChunkData};

/// The default maximum size of a decompressed payload, 64 MiB. Larger payloads are rejected
/// before any memory is allocated for them.
pub const DEFAULT_MAX_SIZE: usize = 1usize << 26; // 64 MiB
