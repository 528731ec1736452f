//! Per-file document records.
//!
//! A [`DocumentData`] holds everything needed to answer queries about one source file: its
//! ranges, the hover text those ranges point at, and the monikers and package metadata that link
//! its symbols to other repositories. Its `Serialize` implementation produces the wire shape
//! directly, with every identifier-keyed map and every moniker set written as a tagged
//! collection; decoding goes through [`decode_document`] instead, so that errors can be
//! attributed to the field that caused them.

use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::{convert::Infallible, fmt, str::FromStr};

use crate::deferred::Deferred;
use crate::error::Result;
use crate::id::{self, Id};
use crate::tagged;

/// A range of source text, along with the results attached to it.
///
/// Positions are zero-based, as in the Language Server Protocol. `moniker_ids` is a set, so a
/// range with no monikers simply has an empty set; it is never absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeData {
    pub start_line: u32,
    pub start_character: u32,
    pub end_line: u32,
    pub end_character: u32,
    #[serde(serialize_with = "id::serialize_optional")]
    pub definition_result_id: Option<Id>,
    #[serde(serialize_with = "id::serialize_optional")]
    pub reference_result_id: Option<Id>,
    #[serde(serialize_with = "id::serialize_optional")]
    pub hover_result_id: Option<Id>,
    #[serde(serialize_with = "tagged::serialize_set")]
    pub moniker_ids: BTreeSet<Id>,
}

impl RangeData {
    /// Create a range with no results and no monikers attached.
    pub fn new(start_line: u32, start_character: u32, end_line: u32, end_character: u32) -> Self {
        Self {
            start_line,
            start_character,
            end_line,
            end_character,
            ..Default::default()
        }
    }
}

/// Whether a moniker names a symbol imported from, exported to, or local to its package.
///
/// Indexers are free to emit other kinds (`implementation`, for one); those are kept verbatim in
/// [`MonikerKind::Other`] so they survive a round trip.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MonikerKind {
    Import,
    Export,
    Local,
    /// Any kind not listed above. Never holds `import`, `export`, or `local` when built through
    /// `From` or `FromStr`.
    Other(String),
}

impl MonikerKind {
    pub fn as_str(&self) -> &str {
        match self {
            MonikerKind::Import => "import",
            MonikerKind::Export => "export",
            MonikerKind::Local => "local",
            MonikerKind::Other(kind) => kind.as_str(),
        }
    }
}

impl From<&str> for MonikerKind {
    fn from(kind: &str) -> Self {
        match kind {
            "import" => MonikerKind::Import,
            "export" => MonikerKind::Export,
            "local" => MonikerKind::Local,
            other => MonikerKind::Other(other.to_owned()),
        }
    }
}

impl Serialize for MonikerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for MonikerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonikerKind {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Infallible> {
        Ok(MonikerKind::from(s))
    }
}

/// A cross-repository symbol identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonikerData {
    pub kind: MonikerKind,
    pub scheme: String,
    pub identifier: String,
    #[serde(serialize_with = "id::serialize_optional")]
    pub package_information_id: Option<Id>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PackageInformationData {
    pub name: String,
    pub version: String,
}

/// Everything indexed about a single source file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentData {
    #[serde(serialize_with = "tagged::serialize_map")]
    pub ranges: BTreeMap<Id, RangeData>,
    #[serde(serialize_with = "tagged::serialize_map")]
    pub hover_results: BTreeMap<Id, String>,
    #[serde(serialize_with = "tagged::serialize_map")]
    pub monikers: BTreeMap<Id, MonikerData>,
    #[serde(serialize_with = "tagged::serialize_map")]
    pub package_information: BTreeMap<Id, PackageInformationData>,
}

/// Build a document from the first-pass parse of a payload.
pub(crate) fn decode_document(root: &Deferred<'_, '_>) -> Result<DocumentData> {
    Ok(DocumentData {
        ranges: tagged::decode_map(&root.field("ranges")?, decode_range)?,
        hover_results: tagged::decode_map(&root.field("hoverResults")?, |node| {
            node.as_str().map(str::to_owned)
        })?,
        monikers: tagged::decode_map(&root.field("monikers")?, decode_moniker)?,
        package_information: tagged::decode_map(
            &root.field("packageInformation")?,
            decode_package_information,
        )?,
    })
}

fn decode_range(node: &Deferred<'_, '_>) -> Result<RangeData> {
    // Older writers left the field out entirely when a range had no monikers.
    let moniker_ids = match node.optional_field("monikerIds")? {
        Some(ids) => tagged::decode_set(&ids)?,
        None => BTreeSet::new(),
    };
    Ok(RangeData {
        start_line: node.field("startLine")?.as_u32()?,
        start_character: node.field("startCharacter")?.as_u32()?,
        end_line: node.field("endLine")?.as_u32()?,
        end_character: node.field("endCharacter")?.as_u32()?,
        definition_result_id: node.optional_id("definitionResultId")?,
        reference_result_id: node.optional_id("referenceResultId")?,
        hover_result_id: node.optional_id("hoverResultId")?,
        moniker_ids,
    })
}

fn decode_moniker(node: &Deferred<'_, '_>) -> Result<MonikerData> {
    Ok(MonikerData {
        kind: MonikerKind::from(node.field("kind")?.as_str()?),
        scheme: node.field("scheme")?.as_str()?.to_owned(),
        identifier: node.field("identifier")?.as_str()?.to_owned(),
        package_information_id: node.optional_id("packageInformationId")?,
    })
}

fn decode_package_information(node: &Deferred<'_, '_>) -> Result<PackageInformationData> {
    Ok(PackageInformationData {
        name: node.field("name")?.as_str()?.to_owned(),
        version: node.field("version")?.as_str()?.to_owned(),
    })
}
