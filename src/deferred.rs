//! Deferred values: the untyped first pass of decoding.
//!
//! A decompressed payload is parsed once into a [`serde_json::Value`] tree that only captures its
//! shape. Records are then built on a second, type-directed pass that walks that tree through
//! [`Deferred`] nodes. Each node remembers how it was reached from the root, so a failure deep in
//! the payload reports exactly which field was at fault.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::id::Id;

#[derive(Clone, Copy, Debug)]
enum Segment {
    Root,
    Field(&'static str),
    Index(usize),
}

/// A not-yet-converted piece of the payload, along with its location.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Deferred<'v, 'p> {
    value: &'v Value,
    segment: Segment,
    parent: Option<&'p Deferred<'v, 'p>>,
}

impl<'v, 'p> Deferred<'v, 'p> {
    pub(crate) fn root(value: &'v Value) -> Self {
        Self {
            value,
            segment: Segment::Root,
            parent: None,
        }
    }

    fn child<'c>(&'c self, value: &'v Value, segment: Segment) -> Deferred<'v, 'c> {
        Deferred {
            value,
            segment,
            parent: Some(self),
        }
    }

    /// The location of this value, written JSONPath-style (`$.ranges.value[0][1]`).
    pub(crate) fn path(&self) -> String {
        let mut segments = Vec::new();
        let mut node = Some(self);
        while let Some(n) = node {
            segments.push(n.segment);
            node = n.parent;
        }
        let mut path = String::new();
        for segment in segments.iter().rev() {
            match segment {
                Segment::Root => path.push('$'),
                Segment::Field(name) => {
                    path.push('.');
                    path.push_str(name);
                }
                Segment::Index(i) => {
                    path.push_str(&format!("[{}]", i));
                }
            }
        }
        path
    }

    pub(crate) fn format_error(&self, reason: impl Into<String>) -> Error {
        Error::BadFormat {
            path: self.path(),
            reason: reason.into(),
        }
    }

    pub(crate) fn type_error(&self, reason: impl Into<String>) -> Error {
        Error::BadType {
            path: self.path(),
            reason: reason.into(),
        }
    }

    fn object(&self) -> Result<&'v Map<String, Value>> {
        self.value
            .as_object()
            .ok_or_else(|| self.format_error(format!("expected an object, found {}", describe(self.value))))
    }

    /// Get a required field of an object.
    pub(crate) fn field<'c>(&'c self, name: &'static str) -> Result<Deferred<'v, 'c>> {
        match self.object()?.get(name) {
            Some(value) => Ok(self.child(value, Segment::Field(name))),
            None => Err(self.format_error(format!("missing field `{}`", name))),
        }
    }

    /// Get a field of an object, treating `null` the same as an absent field.
    pub(crate) fn optional_field<'c>(&'c self, name: &'static str) -> Result<Option<Deferred<'v, 'c>>> {
        match self.object()?.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(self.child(value, Segment::Field(name)))),
        }
    }

    pub(crate) fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Iterate over the elements of an array.
    pub(crate) fn elements<'c>(&'c self) -> Result<impl Iterator<Item = Deferred<'v, 'c>> + 'c> {
        let array = self
            .value
            .as_array()
            .ok_or_else(|| self.format_error(format!("expected an array, found {}", describe(self.value))))?;
        let parent: &'c Deferred<'v, 'c> = self;
        Ok(array
            .iter()
            .enumerate()
            .map(move |(i, value)| parent.child(value, Segment::Index(i))))
    }

    /// Split a 2-element array into its key and value.
    pub(crate) fn pair<'c>(&'c self) -> Result<(Deferred<'v, 'c>, Deferred<'v, 'c>)> {
        match self.value.as_array().map(Vec::as_slice) {
            Some([key, value]) => Ok((
                self.child(key, Segment::Index(0)),
                self.child(value, Segment::Index(1)),
            )),
            Some(other) => Err(self.format_error(format!(
                "expected a [key, value] pair, found {} elements",
                other.len()
            ))),
            None => Err(self.format_error(format!(
                "expected a [key, value] pair, found {}",
                describe(self.value)
            ))),
        }
    }

    pub(crate) fn as_str(&self) -> Result<&'v str> {
        self.value
            .as_str()
            .ok_or_else(|| self.format_error(format!("expected a string, found {}", describe(self.value))))
    }

    pub(crate) fn as_u32(&self) -> Result<u32> {
        let Value::Number(n) = self.value else {
            return Err(self.format_error(format!("expected an integer, found {}", describe(self.value))));
        };
        n.as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| self.type_error(format!("{} is not a valid u32", n)))
    }

    /// Convert to an identifier. Identifiers may be strings or integers on the wire.
    pub(crate) fn to_id(&self) -> Result<Id> {
        match self.value {
            Value::String(s) => s.parse().map_err(|e: Error| e.with_path(self.path())),
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Ok(Id::from(v))
                } else if let Some(v) = n.as_i64() {
                    Ok(Id::from(v))
                } else {
                    Err(self.type_error(format!("{} is not an integer identifier", n)))
                }
            }
            other => Err(self.type_error(format!(
                "expected an identifier, found {}",
                describe(other)
            ))),
        }
    }

    /// Convert to an optional identifier, where `null` and the empty string mean "none".
    pub(crate) fn to_optional_id(&self) -> Result<Option<Id>> {
        match self.value {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            _ => self.to_id().map(Some),
        }
    }

    /// Look up an optional identifier field. Absent, `null`, and `""` all mean "none".
    pub(crate) fn optional_id(&self, name: &'static str) -> Result<Option<Id>> {
        match self.optional_field(name)? {
            Some(field) => field.to_optional_id(),
            None => Ok(None),
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths() {
        let value = json!({"ranges": {"value": [["r1", {"startLine": "x"}]]}});
        let root = Deferred::root(&value);
        assert_eq!(root.path(), "$");
        let ranges = root.field("ranges").unwrap();
        let entries = ranges.field("value").unwrap();
        let entry = entries.elements().unwrap().next().unwrap();
        let (key, range) = entry.pair().unwrap();
        assert_eq!(key.path(), "$.ranges.value[0][0]");
        let line = range.field("startLine").unwrap();
        assert_eq!(line.path(), "$.ranges.value[0][1].startLine");
        let err = line.as_u32().unwrap_err();
        assert_eq!(err.path(), Some("$.ranges.value[0][1].startLine"));
        assert!(matches!(err, Error::BadFormat { .. }));
    }

    #[test]
    fn missing_field() {
        let value = json!({"present": 1});
        let root = Deferred::root(&value);
        let err = root.field("absent").unwrap_err();
        assert_eq!(
            err,
            Error::BadFormat {
                path: "$".into(),
                reason: "missing field `absent`".into()
            }
        );
        assert!(root.optional_field("absent").unwrap().is_none());
    }

    #[test]
    fn null_is_absent_for_optional_fields() {
        let value = json!({"field": null});
        let root = Deferred::root(&value);
        assert!(root.optional_field("field").unwrap().is_none());
        assert!(root.field("field").unwrap().is_null());
    }

    #[test]
    fn field_of_non_object() {
        let value = json!([1, 2]);
        let err = Deferred::root(&value).field("x").unwrap_err();
        assert!(matches!(err, Error::BadFormat { .. }));
    }

    #[test]
    fn pair_arity() {
        let value = json!([["a"], ["a", 1, 2], "a", ["a", 1]]);
        let root = Deferred::root(&value);
        let results: Vec<_> = root.elements().unwrap().map(|e| e.pair().is_ok()).collect();
        assert_eq!(results, vec![false, false, false, true]);
    }

    #[test]
    fn integers() {
        let value = json!([0, 4294967295u64, 4294967296u64, -1, 1.5]);
        let root = Deferred::root(&value);
        let results: Vec<_> = root.elements().unwrap().map(|e| e.as_u32()).collect();
        assert_eq!(results[0], Ok(0));
        assert_eq!(results[1], Ok(u32::MAX));
        for result in &results[2..] {
            assert!(matches!(result, Err(Error::BadType { .. })), "got {:?}", result);
        }
    }

    #[test]
    fn identifiers() {
        let value = json!(["r1", 17, -3, "", 1.5, true, null, {"a": 1}]);
        let root = Deferred::root(&value);
        let ids: Vec<_> = root.elements().unwrap().map(|e| e.to_id()).collect();
        assert_eq!(ids[0], Ok("r1".parse().unwrap()));
        assert_eq!(ids[1], Ok(Id::from(17u64)));
        assert_eq!(ids[2], Ok(Id::from(-3i64)));
        for (i, id) in ids.iter().enumerate().skip(3) {
            match id {
                Err(Error::BadType { path, .. }) => assert_eq!(path, &format!("$[{}]", i)),
                other => panic!("Element {} gave {:?}", i, other),
            }
        }
    }

    #[test]
    fn optional_identifiers() {
        let value = json!({"a": "", "b": null, "c": "h1", "d": 3, "e": false});
        let root = Deferred::root(&value);
        assert_eq!(root.optional_id("a").unwrap(), None);
        assert_eq!(root.optional_id("b").unwrap(), None);
        assert_eq!(root.optional_id("missing").unwrap(), None);
        assert_eq!(root.optional_id("c").unwrap(), Some("h1".parse().unwrap()));
        assert_eq!(root.optional_id("d").unwrap(), Some(Id::from(3u64)));
        assert!(matches!(root.optional_id("e"), Err(Error::BadType { .. })));
    }
}
