//! Document envelope returned by the store's REST API

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as Json;

/// A remote document: a fields map of tagged values plus the
/// document-level create/update timestamps, which are siblings of the
/// fields map rather than fields themselves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    /// Full resource path, e.g.
    /// `projects/p/databases/(default)/documents/devices/ABC123`.
    #[serde(default)]
    pub name: String,

    /// Field name → raw tagged-value envelope, in document order.
    #[serde(default)]
    pub fields: serde_json::Map<String, Json>,

    #[serde(rename = "createTime", default)]
    pub create_time: Option<DateTime<Utc>>,

    #[serde(rename = "updateTime", default)]
    pub update_time: Option<DateTime<Utc>>,
}

impl Document {
    /// The path-derived identifier: the last segment of the resource
    /// path (a device serial, a user id, ...).
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}
