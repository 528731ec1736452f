//! Bundle-local identifiers.

use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::error::{Error, Result};

/// An opaque key naming a range, result, moniker, package, or document within one bundle.
///
/// Identifiers are compared as text. Any non-empty string is a valid identifier; indexers that
/// number their vertices produce identifiers from integers, which are kept as their decimal text.
/// The empty string is reserved: on the wire it marks an absent optional identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(String);

impl Id {
    /// Create a new identifier, failing if the text is empty.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::BadType {
                path: "$".into(),
                reason: "identifier must not be empty".into(),
            });
        }
        Ok(Id(id))
    }

    /// The identifier's canonical text, as used for wire map keys.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for Id {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Id::new(s)
    }
}

impl From<u64> for Id {
    fn from(v: u64) -> Self {
        Id(v.to_string())
    }
}

impl From<i64> for Id {
    fn from(v: i64) -> Self {
        Id(v.to_string())
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Serialize an optional identifier, writing `None` as the empty string.
pub(crate) fn serialize_optional<S: Serializer>(
    id: &Option<Id>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(id.as_ref().map_or("", Id::as_str))
}
