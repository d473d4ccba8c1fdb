//! Device records
//!
//! Every attribute is optional: different device generations report
//! different subsets, and anything a given document carries beyond the
//! declared schema is preserved in `extensions`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::decode::{Extensions, FieldReader, FromDocument, FromFields};
use crate::document::Document;

/// Location of the analytics export table for a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BigQueryInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl FromFields for BigQueryInfo {
    fn from_fields(mut fields: FieldReader<'_>) -> Self {
        Self {
            table_id: fields.string("table_id"),
            dataset_id: fields.string("dataset_id"),
            extensions: fields.finish(),
        }
    }
}

/// A registered device.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    /// Customer-provided display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_display_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iot_device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub big_query: Option<BigQueryInfo>,
    /// Battery charge percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_strength: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_interval_in_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmit_interval_in_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_load: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_alert_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_version: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_purged: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_archive: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_telemetry_saved: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_wifi_connection: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_bluetooth_connection: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    /// Fields present in the document but not declared above.
    #[serde(skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl FromDocument for Device {
    fn from_document(document: &Document) -> Self {
        let mut fields = document.reader();
        Self {
            device_id: fields.string("device_id"),
            serial: fields.string("serial"),
            label: fields.string("label"),
            device_type: fields.string_as("type"),
            firmware: fields.string("firmware"),
            color: fields.string("color"),
            thumbnail: fields.string("thumbnail"),
            device_display_units: fields.string("device_display_units"),
            iot_device_id: fields.string("iot_device_id"),
            // The service stores the device name under plain `device`.
            device_name: fields.string_as("device"),
            account_id: fields.string("account_id"),
            status: fields.string("status"),
            battery_state: fields.string("battery_state"),
            big_query: fields.nested("big_query"),
            battery: fields.integer("battery"),
            // `wifi_stength` is the service's own spelling.
            wifi_strength: fields.integer_as("wifi_stength"),
            recording_interval_in_seconds: fields.integer("recording_interval_in_seconds"),
            transmit_interval_in_seconds: fields.integer("transmit_interval_in_seconds"),
            pending_load: fields.boolean("pending_load"),
            battery_alert_sent: fields.boolean("battery_alert_sent"),
            export_version: fields.double("export_version"),
            last_seen: fields.timestamp("last_seen"),
            last_purged: fields.timestamp("last_purged"),
            last_archive: fields.timestamp("last_archive"),
            last_telemetry_saved: fields.timestamp("last_telemetry_saved"),
            last_wifi_connection: fields.timestamp("last_wifi_connection"),
            last_bluetooth_connection: fields.timestamp("last_bluetooth_connection"),
            session_start: fields.timestamp("session_start"),
            create_time: document.create_time,
            update_time: document.update_time,
            extensions: fields.finish(),
        }
    }
}
