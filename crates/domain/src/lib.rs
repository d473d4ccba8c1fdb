//! # Embercloud Domain
//!
//! Data layer for the embercloud client: the tagged-value model used by
//! the document-store wire format, the document envelope, the
//! schema-driven record decoder, and the typed records themselves.
//!
//! ## Architecture
//! - No dependencies on other embercloud crates
//! - No I/O: everything here is a pure function of already-fetched data
//!
//! The wire format wraps every value in a single-key envelope naming its
//! type (`{"stringValue": "x"}`, `{"integerValue": "5"}`, ...). [`Value`]
//! models that union as a closed enum, [`Document`] models the response
//! envelope, and [`decode::FieldReader`] turns a document into a typed
//! record plus an [`decode::Extensions`] bag of every field the record's
//! schema does not declare.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod decode;
pub mod document;
pub mod errors;
pub mod types;
pub mod value;

// Re-export commonly used items
pub use decode::{Extensions, FieldReader, FromDocument, FromFields};
pub use document::Document;
pub use errors::DecodeError;
pub use types::{Alarm, BigQueryInfo, Device, DeviceChannel, DeviceOrderItem, EmailLastEvent,
                MinMaxReading, Reading, User};
pub use value::{Value, ValueKind};
