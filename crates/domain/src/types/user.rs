//! User profile records

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::decode::{Extensions, FieldReader, FromDocument, FromFields};
use crate::document::Document;
use crate::value::Value;

/// A device's position within an account's ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceOrderItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl FromFields for DeviceOrderItem {
    fn from_fields(mut fields: FieldReader<'_>) -> Self {
        Self {
            device_id: fields.string("device_id"),
            order: fields.integer("order"),
            extensions: fields.finish(),
        }
    }
}

/// Delivery report for the most recent email sent to a user.
///
/// The mail provider renders several names with hyphens or preserved
/// underscores, hence the explicit wire spellings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmailLastEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce_classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smtp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sg_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sg_event_id: Option<String>,
    #[serde(skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl FromFields for EmailLastEvent {
    fn from_fields(mut fields: FieldReader<'_>) -> Self {
        Self {
            reason: fields.string("reason"),
            event: fields.string("event"),
            email: fields.string("email"),
            bounce_classification: fields.string_as("bounce_classification"),
            tls: fields.integer("tls"),
            timestamp: fields.integer("timestamp"),
            smtp_id: fields.string_as("smtp-id"),
            event_type: fields.string_as("type"),
            sg_message_id: fields.string_as("sg_message_id"),
            sg_event_id: fields.string_as("sg_event_id"),
            extensions: fields.finish(),
        }
    }
}

/// The authenticated user's profile.
#[derive(Debug, Clone, Default, Serialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_24_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<IndexMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_roles: Option<IndexMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<IndexMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_settings: Option<IndexMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fcm_tokens: Option<IndexMap<String, bool>>,
    /// Account id → ordered devices for that account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_order: Option<IndexMap<String, Vec<DeviceOrderItem>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_last_event: Option<EmailLastEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_version: Option<f64>,
    /// Observed only as an explicit null; kept raw.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_in_app: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    /// Fields present in the document but not declared above.
    #[serde(skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

impl FromDocument for User {
    fn from_document(document: &Document) -> Self {
        let mut fields = document.reader();
        Self {
            uid: fields.string("uid"),
            account_id: fields.string("account_id"),
            display_name: fields.string("display_name"),
            email: fields.string("email"),
            provider: fields.string("provider"),
            time_zone: fields.string("time_zone"),
            app_version: fields.string("app_version"),
            preferred_units: fields.string("preferred_units"),
            locale: fields.string("locale"),
            photo_url: fields.string_as("photoURL"),
            use_24_time: fields.boolean("use_24_time"),
            roles: fields.bool_map("roles"),
            account_roles: fields.bool_map("account_roles"),
            system: fields.bool_map("system"),
            notification_settings: fields.bool_map("notification_settings"),
            fcm_tokens: fields.bool_map("fcm_tokens"),
            device_order: decode_device_order(&mut fields),
            email_last_event: fields.nested("email_last_event"),
            export_version: fields.double("export_version"),
            last_seen_in_app: fields.value("last_seen_in_app"),
            last_login: fields.timestamp("last_login"),
            create_time: document.create_time,
            update_time: document.update_time,
            extensions: fields.finish(),
        }
    }
}

/// `deviceOrder` is a map from account id to an array of order entries,
/// each itself a map-tagged record. That is too deep for the typed
/// accessors, so it is walked by hand over the raw envelopes.
fn decode_device_order(
    fields: &mut FieldReader<'_>,
) -> Option<IndexMap<String, Vec<DeviceOrderItem>>> {
    let accounts = fields.raw_map("device_order")?;
    let mut orders = IndexMap::new();

    for (account_id, envelope) in accounts {
        let values = envelope
            .get("arrayValue")
            .and_then(|array| array.get("values"))
            .and_then(|values| values.as_array());
        let values = match values {
            Some(values) => values,
            None => continue,
        };

        let mut items = Vec::new();
        for entry in values {
            let entry_fields = entry
                .get("mapValue")
                .and_then(|map| map.get("fields"))
                .and_then(|fields| fields.as_object());
            if let Some(entry_fields) = entry_fields {
                items.push(DeviceOrderItem::from_fields(FieldReader::new(entry_fields)));
            }
        }

        if !items.is_empty() {
            orders.insert(account_id.clone(), items);
        }
    }

    Some(orders)
}
