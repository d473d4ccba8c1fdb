//! Device channel records
//!
//! A channel is one probe/sensor on a device. Firmware is inconsistent
//! about numeric tags for readings, so reading values accept either
//! integer or double envelopes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::decode::{Extensions, FieldReader, FromDocument, FromFields};
use crate::document::Document;

/// A temperature reading from a device channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reading {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Temperature unit symbol, e.g. `"F"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl FromFields for Reading {
    fn from_fields(mut fields: FieldReader<'_>) -> Self {
        Self {
            value: fields.number("value"),
            units: fields.string("units"),
            extensions: fields.finish(),
        }
    }
}

/// An alarm threshold configured on a device channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Alarm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl FromFields for Alarm {
    fn from_fields(mut fields: FieldReader<'_>) -> Self {
        Self {
            enabled: fields.boolean("enabled"),
            alarming: fields.boolean("alarming"),
            value: fields.integer("value"),
            units: fields.string("units"),
            extensions: fields.finish(),
        }
    }
}

/// A minimum or maximum reading observed on a device channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MinMaxReading {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<Reading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_reading: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl FromFields for MinMaxReading {
    fn from_fields(mut fields: FieldReader<'_>) -> Self {
        Self {
            reading: fields.nested("reading"),
            date_reading: fields.timestamp("date_reading"),
            extensions: fields.finish(),
        }
    }
}

/// One channel on a device.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceChannel {
    /// Last time a telemetry packet arrived from this channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_telemetry_saved: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Only `"NORMAL"` has been observed here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<String>,
    /// Customer-provided name for this channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_high: Option<Alarm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_low: Option<Alarm>,
    /// The channel number, one-indexed, as a string on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<MinMaxReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<MinMaxReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_avg_temp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    /// Fields present in the document but not declared above.
    #[serde(skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl FromDocument for DeviceChannel {
    fn from_document(document: &Document) -> Self {
        let mut fields = document.reader();
        Self {
            last_telemetry_saved: fields.timestamp("last_telemetry_saved"),
            value: fields.number("value"),
            units: fields.string("units"),
            status: fields.string("status"),
            channel_type: fields.string_as("type"),
            label: fields.string("label"),
            last_seen: fields.timestamp("last_seen"),
            alarm_high: fields.nested("alarm_high"),
            alarm_low: fields.nested("alarm_low"),
            number: fields.string("number"),
            minimum: fields.nested("minimum"),
            maximum: fields.nested("maximum"),
            show_avg_temp: fields.boolean("show_avg_temp"),
            create_time: document.create_time,
            update_time: document.update_time,
            extensions: fields.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for device channel decoding.
    use serde_json::json;

    use super::*;

    fn sample_document() -> Document {
        serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/devices/AB123/channels/1",
            "fields": {
                "value": {"doubleValue": 225.4},
                "units": {"stringValue": "F"},
                "status": {"stringValue": "NORMAL"},
                "type": {"stringValue": "probe"},
                "label": {"stringValue": "Brisket"},
                "number": {"stringValue": "1"},
                "showAvgTemp": {"booleanValue": true},
                "lastSeen": {"timestampValue": "2024-02-01T08:30:00Z"},
                "alarmHigh": {"mapValue": {"fields": {
                    "enabled": {"booleanValue": true},
                    "alarming": {"booleanValue": false},
                    "value": {"integerValue": "250"},
                    "units": {"stringValue": "F"}
                }}},
                "minimum": {"mapValue": {"fields": {
                    "reading": {"mapValue": {"fields": {
                        "value": {"integerValue": "180"},
                        "units": {"stringValue": "F"}
                    }}},
                    "dateReading": {"timestampValue": "2024-02-01T05:00:00Z"}
                }}}
            },
            "updateTime": "2024-02-01T08:30:00Z"
        }))
        .expect("fixture parses")
    }

    #[test]
    fn decodes_declared_attributes() {
        let channel = DeviceChannel::from_document(&sample_document());

        assert_eq!(channel.value, Some(225.4));
        assert_eq!(channel.units.as_deref(), Some("F"));
        assert_eq!(channel.channel_type.as_deref(), Some("probe"));
        assert_eq!(channel.label.as_deref(), Some("Brisket"));
        assert_eq!(channel.number.as_deref(), Some("1"));
        assert_eq!(channel.show_avg_temp, Some(true));
        assert!(channel.update_time.is_some());
        assert!(channel.create_time.is_none());
    }

    #[test]
    fn decodes_nested_alarm() {
        let channel = DeviceChannel::from_document(&sample_document());

        let alarm = channel.alarm_high.expect("alarm decodes");
        assert_eq!(alarm.enabled, Some(true));
        assert_eq!(alarm.alarming, Some(false));
        assert_eq!(alarm.value, Some(250));
        assert_eq!(alarm.units.as_deref(), Some("F"));
        assert!(channel.alarm_low.is_none());
    }

    /// Readings widen integer envelopes to floats, two levels deep.
    #[test]
    fn decodes_min_max_reading() {
        let channel = DeviceChannel::from_document(&sample_document());

        let minimum = channel.minimum.expect("minimum decodes");
        let reading = minimum.reading.expect("reading decodes");
        assert_eq!(reading.value, Some(180.0));
        assert_eq!(reading.units.as_deref(), Some("F"));
        assert!(minimum.date_reading.is_some());
        assert!(channel.maximum.is_none());
    }

    #[test]
    fn integer_tagged_channel_value_is_accepted() {
        let document: Document = serde_json::from_value(json!({
            "name": "projects/p/databases/(default)/documents/devices/AB123/channels/2",
            "fields": {"value": {"integerValue": "72"}}
        }))
        .expect("fixture parses");

        let channel = DeviceChannel::from_document(&document);
        assert_eq!(channel.value, Some(72.0));
    }
}
