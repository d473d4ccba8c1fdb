//! Typed records for the documents the service stores.

pub mod device;
pub mod device_channel;
pub mod user;

pub use device::{BigQueryInfo, Device};
pub use device_channel::{Alarm, DeviceChannel, MinMaxReading, Reading};
pub use user::{DeviceOrderItem, EmailLastEvent, User};
