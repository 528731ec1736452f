//! Tagged collections.
//!
//! JSON objects only have string keys and JSON has no set type, so every identifier-keyed map and
//! every identifier set is written as an explicit envelope naming its kind:
//!
//! ```text
//! { "type": "map", "value": [ [key, value], ... ] }
//! { "type": "set", "value": [ element, ... ] }
//! ```
//!
//! Decoding checks the tag against the kind the field is supposed to hold before looking at any
//! entries.

use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::deferred::Deferred;
use crate::error::Result;
use crate::id::Id;

/// The kind of collection held in a tagged envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Map,
    Set,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Map => "map",
            Kind::Set => "set",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct Tagged<T> {
    #[serde(rename = "type")]
    kind: Kind,
    value: T,
}

struct MapEntries<'a, V>(&'a BTreeMap<Id, V>);

impl<V: Serialize> Serialize for MapEntries<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

/// Serialize an identifier-keyed map as a tagged list of `[key, value]` pairs.
pub(crate) fn serialize_map<S: Serializer, V: Serialize>(
    map: &BTreeMap<Id, V>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Tagged {
        kind: Kind::Map,
        value: MapEntries(map),
    }
    .serialize(serializer)
}

/// Serialize an identifier set as a tagged list of elements.
pub(crate) fn serialize_set<S: Serializer>(
    set: &BTreeSet<Id>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Tagged {
        kind: Kind::Set,
        value: set,
    }
    .serialize(serializer)
}

/// Check an envelope's tag and return its entry list.
fn open<'v, 'c>(node: &'c Deferred<'v, '_>, expected: Kind) -> Result<Deferred<'v, 'c>> {
    let tag = node.field("type")?;
    let kind = tag.as_str()?;
    if kind != expected.as_str() {
        return Err(tag.format_error(format!(
            "expected a tagged {}, found {:?}",
            expected, kind
        )));
    }
    node.field("value")
}

/// Decode a tagged map, converting each value with `decode_value`. When a key repeats, the last
/// entry wins.
pub(crate) fn decode_map<V, F>(node: &Deferred<'_, '_>, mut decode_value: F) -> Result<BTreeMap<Id, V>>
where
    F: FnMut(&Deferred<'_, '_>) -> Result<V>,
{
    let entries = open(node, Kind::Map)?;
    let mut map = BTreeMap::new();
    for entry in entries.elements()? {
        let (key, value) = entry.pair()?;
        let key = key.to_id()?;
        map.insert(key, decode_value(&value)?);
    }
    Ok(map)
}

/// Decode a tagged identifier set. Repeated elements collapse.
pub(crate) fn decode_set(node: &Deferred<'_, '_>) -> Result<BTreeSet<Id>> {
    let elements = open(node, Kind::Set)?;
    let set = elements
        .elements()?
        .map(|element| element.to_id())
        .collect::<Result<BTreeSet<Id>>>()?;
    Ok(set)
}
