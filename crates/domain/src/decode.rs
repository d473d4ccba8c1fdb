//! Schema-driven record decoding
//!
//! One generic mechanism replaces per-record field walks: a record's
//! decoder declares each attribute through a typed [`FieldReader`]
//! accessor, and everything the schema does not declare lands in the
//! record's [`Extensions`] bag, fully unwrapped. Schema drift (a
//! missing field, an unexpected tag, a malformed payload) degrades to
//! an absent attribute instead of failing the record, because upstream
//! schemas evolve independently of this library's release cadence.
//!
//! Wire names default to the camelCase transform of the declared
//! snake_case name; the `*_as` accessor variants take an irregular wire
//! spelling verbatim (the service renders some names with hyphens or
//! preserved underscores).

use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value as Json;
use tracing::debug;

use crate::document::Document;
use crate::value::{Value, ValueKind};

/// Residual mapping of document fields not covered by a record's
/// declared schema, in document order.
pub type Extensions = IndexMap<String, Value>;

/// Decodes a top-level document into a typed record.
///
/// Implementations are infallible: field-level problems degrade to
/// absent attributes, and the document-level create/update timestamps
/// are read from the [`Document`] envelope itself.
pub trait FromDocument: Sized {
    fn from_document(document: &Document) -> Self;
}

/// Decodes a nested record from the fields of a map-tagged value.
pub trait FromFields: Sized {
    fn from_fields(fields: FieldReader<'_>) -> Self;
}

/// Translate a declared snake_case attribute name to its default
/// camelCase wire name.
pub fn wire_name(declared: &str) -> String {
    let mut parts = declared.split('_');
    let mut name = String::with_capacity(declared.len());
    if let Some(first) = parts.next() {
        name.push_str(first);
    }
    for part in parts {
        let mut chars = part.chars();
        if let Some(head) = chars.next() {
            name.extend(head.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

fn empty_fields() -> &'static serde_json::Map<String, Json> {
    static EMPTY: OnceLock<serde_json::Map<String, Json>> = OnceLock::new();
    EMPTY.get_or_init(serde_json::Map::new)
}

/// Cursor over a document's fields map.
///
/// Every accessor claims the field it names (whether or not it decodes
/// cleanly), so that [`FieldReader::finish`] can hand back exactly the
/// unclaimed remainder: claimed names and extension keys partition the
/// document's field set with nothing dropped and nothing duplicated.
pub struct FieldReader<'a> {
    fields: &'a serde_json::Map<String, Json>,
    claimed: HashSet<String>,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a serde_json::Map<String, Json>) -> Self {
        Self { fields, claimed: HashSet::new() }
    }

    /// A string attribute under its default camelCase wire name.
    pub fn string(&mut self, declared: &str) -> Option<String> {
        self.string_as(&wire_name(declared))
    }

    /// A string attribute under an irregular wire name.
    pub fn string_as(&mut self, wire: &str) -> Option<String> {
        match self.typed(wire, ValueKind::String)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn integer(&mut self, declared: &str) -> Option<i64> {
        self.integer_as(&wire_name(declared))
    }

    pub fn integer_as(&mut self, wire: &str) -> Option<i64> {
        self.typed(wire, ValueKind::Integer)?.as_i64()
    }

    pub fn double(&mut self, declared: &str) -> Option<f64> {
        self.double_as(&wire_name(declared))
    }

    pub fn double_as(&mut self, wire: &str) -> Option<f64> {
        self.typed(wire, ValueKind::Double)?.as_f64()
    }

    /// A numeric attribute that tolerates either numeric tag: device
    /// firmware is inconsistent about integer vs. double for readings.
    pub fn number(&mut self, declared: &str) -> Option<f64> {
        self.number_as(&wire_name(declared))
    }

    pub fn number_as(&mut self, wire: &str) -> Option<f64> {
        match self.decoded(wire)? {
            value @ (Value::Integer(_) | Value::Double(_)) => value.as_f64(),
            other => {
                debug!(field = %wire, found = ?other.kind(), "expected a numeric tag; treating as absent");
                None
            }
        }
    }

    pub fn boolean(&mut self, declared: &str) -> Option<bool> {
        self.boolean_as(&wire_name(declared))
    }

    pub fn boolean_as(&mut self, wire: &str) -> Option<bool> {
        self.typed(wire, ValueKind::Boolean)?.as_bool()
    }

    pub fn timestamp(&mut self, declared: &str) -> Option<DateTime<Utc>> {
        self.timestamp_as(&wire_name(declared))
    }

    pub fn timestamp_as(&mut self, wire: &str) -> Option<DateTime<Utc>> {
        self.typed(wire, ValueKind::Timestamp)?.as_timestamp()
    }

    /// An attribute of any kind, unwrapped to its native value.
    pub fn value(&mut self, declared: &str) -> Option<Value> {
        self.value_as(&wire_name(declared))
    }

    pub fn value_as(&mut self, wire: &str) -> Option<Value> {
        self.decoded(wire)
    }

    /// A map-tagged attribute as a native ordered map.
    pub fn map(&mut self, declared: &str) -> Option<IndexMap<String, Value>> {
        self.map_as(&wire_name(declared))
    }

    pub fn map_as(&mut self, wire: &str) -> Option<IndexMap<String, Value>> {
        match self.typed(wire, ValueKind::Map)? {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// An array-tagged attribute as a native sequence.
    pub fn array(&mut self, declared: &str) -> Option<Vec<Value>> {
        self.array_as(&wire_name(declared))
    }

    pub fn array_as(&mut self, wire: &str) -> Option<Vec<Value>> {
        match self.typed(wire, ValueKind::Array)? {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// A map of booleans, as used for role and settings toggles.
    /// Entries under a non-boolean tag read as `false`.
    pub fn bool_map(&mut self, declared: &str) -> Option<IndexMap<String, bool>> {
        let entries = self.map(declared)?;
        Some(entries.into_iter().map(|(name, value)| (name, value.as_bool().unwrap_or(false))).collect())
    }

    /// A nested record held in a map-tagged attribute.
    pub fn nested<T: FromFields>(&mut self, declared: &str) -> Option<T> {
        self.nested_as(&wire_name(declared))
    }

    pub fn nested_as<T: FromFields>(&mut self, wire: &str) -> Option<T> {
        let fields = self.raw_map_as(wire)?;
        Some(T::from_fields(FieldReader::new(fields)))
    }

    /// The raw field envelopes inside a map-tagged attribute, for walks
    /// the typed accessors cannot express (e.g. map-of-array-of-record).
    pub fn raw_map(&mut self, declared: &str) -> Option<&'a serde_json::Map<String, Json>> {
        self.raw_map_as(&wire_name(declared))
    }

    pub fn raw_map_as(&mut self, wire: &str) -> Option<&'a serde_json::Map<String, Json>> {
        let raw = self.claim(wire)?;
        let envelope = raw.as_object()?;
        if envelope.len() != 1 {
            debug!(field = %wire, tags = envelope.len(), "malformed field envelope; treating as absent");
            return None;
        }
        let body = envelope.get(ValueKind::Map.wire_tag())?.as_object()?;
        match body.get("fields") {
            Some(fields) => fields.as_object(),
            None => Some(empty_fields()),
        }
    }

    /// Unwrap every unclaimed field into the extensions bag.
    ///
    /// A field whose unwrap fails is dropped (with a log line) rather
    /// than failing the record.
    pub fn finish(self) -> Extensions {
        let mut extensions = Extensions::new();
        for (name, raw) in self.fields {
            if self.claimed.contains(name) {
                continue;
            }
            match Value::from_wire(raw) {
                Ok(value) => {
                    extensions.insert(name.clone(), value);
                }
                Err(error) => {
                    debug!(field = %name, %error, "dropping undecodable extension field");
                }
            }
        }
        extensions
    }

    /// Look up a field and mark it claimed. Present-but-undecodable
    /// fields stay claimed so they never resurface as extensions.
    fn claim(&mut self, wire: &str) -> Option<&'a Json> {
        let raw = self.fields.get(wire)?;
        self.claimed.insert(wire.to_owned());
        Some(raw)
    }

    fn decoded(&mut self, wire: &str) -> Option<Value> {
        let raw = self.claim(wire)?;
        match Value::from_wire(raw) {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(field = %wire, %error, "malformed field; treating as absent");
                None
            }
        }
    }

    fn typed(&mut self, wire: &str, expected: ValueKind) -> Option<Value> {
        let value = self.decoded(wire)?;
        if value.kind() == expected {
            Some(value)
        } else {
            debug!(
                field = %wire,
                expected = ?expected,
                found = ?value.kind(),
                "field carries an unexpected tag; treating as absent"
            );
            None
        }
    }
}

impl Document {
    /// Begin decoding this document's fields.
    pub fn reader(&self) -> FieldReader<'_> {
        FieldReader::new(&self.fields)
    }
}
