//! Tagged-value model for the document-store wire format
//!
//! Every value in a document arrives wrapped in a single-key envelope
//! naming its type, e.g. `{"stringValue": "x"}` or
//! `{"integerValue": "5"}`. [`Value`] is the closed union of everything
//! an envelope can carry; [`Value::from_wire`] is the unwrapper.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as Json;

use crate::errors::DecodeError;

/// The set of wire type tags an envelope can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    String,
    Integer,
    Double,
    Boolean,
    Timestamp,
    Reference,
    GeoPoint,
    Map,
    Array,
}

impl ValueKind {
    /// The envelope key used for this kind on the wire.
    pub const fn wire_tag(self) -> &'static str {
        match self {
            Self::Null => "nullValue",
            Self::String => "stringValue",
            Self::Integer => "integerValue",
            Self::Double => "doubleValue",
            Self::Boolean => "booleanValue",
            Self::Timestamp => "timestampValue",
            Self::Reference => "referenceValue",
            Self::GeoPoint => "geoPointValue",
            Self::Map => "mapValue",
            Self::Array => "arrayValue",
        }
    }
}

/// A fully unwrapped native value.
///
/// Serializes as natural JSON (no envelopes), so decoded data can be
/// re-exported directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// An explicit null marker, distinct from an absent field.
    Null,
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    /// An opaque reference to another document.
    Reference(String),
    GeoPoint { latitude: f64, longitude: f64 },
    /// Ordered mapping, preserving document field order.
    Map(IndexMap<String, Value>),
    Array(Vec<Value>),
}

impl Value {
    /// Decode a single tagged-value envelope into a native value.
    ///
    /// The envelope must be a JSON object carrying exactly one of the
    /// known type tags. Integers arrive as decimal strings per the wire
    /// convention (a bare JSON integer is also accepted); timestamps are
    /// RFC 3339 strings. Map and array envelopes recurse.
    ///
    /// # Errors
    /// Returns [`DecodeError`] if the envelope carries zero or more than
    /// one tag, the tag is unrecognized, or a scalar payload fails to
    /// parse as its declared type.
    pub fn from_wire(raw: &Json) -> Result<Self, DecodeError> {
        let envelope = raw.as_object().ok_or(DecodeError::NotAnObject)?;
        if envelope.len() != 1 {
            return Err(DecodeError::TagCount(envelope.len()));
        }
        let (tag, payload) = match envelope.iter().next() {
            Some(entry) => entry,
            None => return Err(DecodeError::TagCount(0)),
        };

        match tag.as_str() {
            "nullValue" => Ok(Self::Null),
            "stringValue" => payload
                .as_str()
                .map(|s| Self::String(s.to_owned()))
                .ok_or_else(|| DecodeError::payload("stringValue", "expected a string")),
            "integerValue" => Self::integer_from_payload(payload),
            "doubleValue" => payload
                .as_f64()
                .map(Self::Double)
                .ok_or_else(|| DecodeError::payload("doubleValue", "expected a number")),
            "booleanValue" => payload
                .as_bool()
                .map(Self::Boolean)
                .ok_or_else(|| DecodeError::payload("booleanValue", "expected a boolean")),
            "timestampValue" => Self::timestamp_from_payload(payload),
            "referenceValue" => payload
                .as_str()
                .map(|s| Self::Reference(s.to_owned()))
                .ok_or_else(|| DecodeError::payload("referenceValue", "expected a string")),
            "geoPointValue" => Self::geo_point_from_payload(payload),
            "mapValue" => Self::map_from_payload(payload),
            "arrayValue" => Self::array_from_payload(payload),
            other => Err(DecodeError::UnknownTag(other.to_owned())),
        }
    }

    fn integer_from_payload(payload: &Json) -> Result<Self, DecodeError> {
        match payload {
            Json::String(text) => text
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|e| DecodeError::payload("integerValue", e.to_string())),
            Json::Number(number) => number
                .as_i64()
                .map(Self::Integer)
                .ok_or_else(|| DecodeError::payload("integerValue", "not a 64-bit integer")),
            _ => Err(DecodeError::payload("integerValue", "expected a decimal string")),
        }
    }

    fn timestamp_from_payload(payload: &Json) -> Result<Self, DecodeError> {
        let text = payload
            .as_str()
            .ok_or_else(|| DecodeError::payload("timestampValue", "expected a string"))?;
        DateTime::parse_from_rfc3339(text)
            .map(|instant| Self::Timestamp(instant.with_timezone(&Utc)))
            .map_err(|e| DecodeError::payload("timestampValue", e.to_string()))
    }

    fn geo_point_from_payload(payload: &Json) -> Result<Self, DecodeError> {
        let point = payload
            .as_object()
            .ok_or_else(|| DecodeError::payload("geoPointValue", "expected an object"))?;
        // The service omits zero-valued coordinates.
        let coordinate = |axis: &str| -> Result<f64, DecodeError> {
            match point.get(axis) {
                None => Ok(0.0),
                Some(value) => value
                    .as_f64()
                    .ok_or_else(|| DecodeError::payload("geoPointValue", format!("non-numeric {axis}"))),
            }
        };
        Ok(Self::GeoPoint { latitude: coordinate("latitude")?, longitude: coordinate("longitude")? })
    }

    fn map_from_payload(payload: &Json) -> Result<Self, DecodeError> {
        let body = payload
            .as_object()
            .ok_or_else(|| DecodeError::payload("mapValue", "expected an object"))?;
        let mut entries = IndexMap::new();
        if let Some(fields) = body.get("fields") {
            let fields = fields
                .as_object()
                .ok_or_else(|| DecodeError::payload("mapValue", "`fields` is not an object"))?;
            for (name, raw) in fields {
                entries.insert(name.clone(), Self::from_wire(raw)?);
            }
        }
        Ok(Self::Map(entries))
    }

    fn array_from_payload(payload: &Json) -> Result<Self, DecodeError> {
        let body = payload
            .as_object()
            .ok_or_else(|| DecodeError::payload("arrayValue", "expected an object"))?;
        let mut items = Vec::new();
        if let Some(values) = body.get("values") {
            let values = values
                .as_array()
                .ok_or_else(|| DecodeError::payload("arrayValue", "`values` is not an array"))?;
            for raw in values {
                items.push(Self::from_wire(raw)?);
            }
        }
        Ok(Self::Array(items))
    }

    /// The kind of value this is.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::String(_) => ValueKind::String,
            Self::Integer(_) => ValueKind::Integer,
            Self::Double(_) => ValueKind::Double,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Timestamp(_) => ValueKind::Timestamp,
            Self::Reference(_) => ValueKind::Reference,
            Self::GeoPoint { .. } => ValueKind::GeoPoint,
            Self::Map(_) => ValueKind::Map,
            Self::Array(_) => ValueKind::Array,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Reference(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view: integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(n) => Some(*n),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the tagged-value unwrapper.
    use serde_json::json;

    use super::*;

    /// Unwrapping a freshly constructed single-tag envelope yields the
    /// original native value, for every scalar kind.
    #[test]
    fn scalar_round_trips() {
        assert_eq!(
            Value::from_wire(&json!({"stringValue": "probe-1"})),
            Ok(Value::String("probe-1".to_owned()))
        );
        assert_eq!(Value::from_wire(&json!({"integerValue": "42"})), Ok(Value::Integer(42)));
        assert_eq!(Value::from_wire(&json!({"doubleValue": 98.6})), Ok(Value::Double(98.6)));
        assert_eq!(Value::from_wire(&json!({"booleanValue": true})), Ok(Value::Boolean(true)));
        let reference =
            Value::from_wire(&json!({"referenceValue": "devices/abc"})).expect("reference decodes");
        assert_eq!(reference, Value::Reference("devices/abc".to_owned()));
        assert_eq!(reference.as_str(), Some("devices/abc"));
        assert_eq!(Value::from_wire(&json!({"nullValue": null})), Ok(Value::Null));

        let instant = Value::from_wire(&json!({"timestampValue": "2024-03-01T12:30:00Z"}))
            .expect("timestamp decodes");
        assert_eq!(instant.as_timestamp().map(|t| t.timestamp()), Some(1_709_296_200));
    }

    #[test]
    fn integer_accepts_bare_number() {
        assert_eq!(Value::from_wire(&json!({"integerValue": 7})), Ok(Value::Integer(7)));
    }

    #[test]
    fn integer_rejects_non_numeric_text() {
        let err = Value::from_wire(&json!({"integerValue": "forty-two"})).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload { tag: "integerValue", .. }));
    }

    #[test]
    fn timestamp_rejects_non_iso_text() {
        let err = Value::from_wire(&json!({"timestampValue": "yesterday"})).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload { tag: "timestampValue", .. }));
    }

    /// An envelope with zero tags or two tags is malformed for any kind.
    #[test]
    fn envelope_must_carry_exactly_one_tag() {
        assert_eq!(Value::from_wire(&json!({})), Err(DecodeError::TagCount(0)));
        assert_eq!(
            Value::from_wire(&json!({"stringValue": "x", "integerValue": "1"})),
            Err(DecodeError::TagCount(2))
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            Value::from_wire(&json!({"decimalValue": "1.5"})),
            Err(DecodeError::UnknownTag("decimalValue".to_owned()))
        );
    }

    #[test]
    fn envelope_must_be_an_object() {
        assert_eq!(Value::from_wire(&json!("bare")), Err(DecodeError::NotAnObject));
    }

    #[test]
    fn map_recurses_and_preserves_field_order() {
        let decoded = Value::from_wire(&json!({
            "mapValue": {
                "fields": {
                    "zeta": {"integerValue": "1"},
                    "alpha": {"stringValue": "first"}
                }
            }
        }))
        .expect("map decodes");

        let map = decoded.as_map().expect("is a map");
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta".to_owned(), "alpha".to_owned()]);
        assert_eq!(map["zeta"], Value::Integer(1));
    }

    #[test]
    fn empty_map_envelope_decodes_to_empty_map() {
        let decoded = Value::from_wire(&json!({"mapValue": {}})).expect("map decodes");
        assert_eq!(decoded, Value::Map(IndexMap::new()));
    }

    #[test]
    fn array_recurses_element_by_element() {
        let decoded = Value::from_wire(&json!({
            "arrayValue": {"values": [
                {"integerValue": "1"},
                {"stringValue": "two"}
            ]}
        }))
        .expect("array decodes");
        assert_eq!(
            decoded,
            Value::Array(vec![Value::Integer(1), Value::String("two".to_owned())])
        );
    }

    #[test]
    fn nested_malformation_fails_the_whole_unwrap() {
        let err = Value::from_wire(&json!({
            "arrayValue": {"values": [{"integerValue": "oops"}]}
        }))
        .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload { .. }));
    }

    #[test]
    fn geo_point_defaults_omitted_axes_to_zero() {
        let decoded =
            Value::from_wire(&json!({"geoPointValue": {"latitude": 45.5}})).expect("decodes");
        assert_eq!(decoded, Value::GeoPoint { latitude: 45.5, longitude: 0.0 });
    }

    /// Native values serialize as plain JSON with no envelopes.
    #[test]
    fn serializes_to_natural_json() {
        let mut map = IndexMap::new();
        map.insert("count".to_owned(), Value::Integer(3));
        map.insert("tags".to_owned(), Value::Array(vec![Value::String("a".to_owned())]));
        let rendered = serde_json::to_value(Value::Map(map)).expect("serializes");
        assert_eq!(rendered, json!({"count": 3, "tags": ["a"]}));
    }
}
