//! Device model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marker type that asks for a free-form `customDeviceType`.
pub const OTHERS_DEVICE_TYPE: &str = "Others";

/// Device types offered by the handover form besides [`OTHERS_DEVICE_TYPE`].
pub const STANDARD_DEVICE_TYPES: [&str; 4] = ["Laptop", "Monitor", "Keyboard", "Mouse"];

/// One physical item issued as part of a handover
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Token unique within the parent handover
    #[serde(default)]
    pub id: String,
    /// Form choice or an already resolved free-form type
    #[serde(default)]
    pub device_type: String,
    /// Free-form type, only meaningful when `device_type` is `Others`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_device_type: Option<String>,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial_number: String,
}

impl Device {
    /// Create a device with a freshly generated id
    #[must_use]
    pub fn new(
        device_type: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        serial_number: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_device_id(),
            device_type: device_type.into(),
            custom_device_type: None,
            brand: brand.into(),
            model: model.into(),
            serial_number: serial_number.into(),
        }
    }

    /// Create an `Others` device carrying a free-form type
    #[must_use]
    pub fn other(
        custom_device_type: impl Into<String>,
        brand: impl Into<String>,
        model: impl Into<String>,
        serial_number: impl Into<String>,
    ) -> Self {
        Self {
            custom_device_type: Some(custom_device_type.into()),
            ..Self::new(OTHERS_DEVICE_TYPE, brand, model, serial_number)
        }
    }

    /// Whether the device still carries the raw `Others` marker
    #[must_use]
    pub fn is_others(&self) -> bool {
        self.device_type == OTHERS_DEVICE_TYPE
    }

    /// The type shown on exports and requisitions.
    ///
    /// `customDeviceType` when the marker is `Others`, otherwise `deviceType`.
    #[must_use]
    pub fn effective_type(&self) -> &str {
        if self.is_others() {
            self.custom_device_type.as_deref().unwrap_or_default()
        } else {
            &self.device_type
        }
    }

    /// Replace the `Others` marker with the free-form type and drop the
    /// now redundant `custom_device_type`.
    #[must_use]
    pub fn resolved(mut self) -> Self {
        if self.is_others() {
            self.device_type = self.custom_device_type.take().unwrap_or_default();
        } else {
            self.custom_device_type = None;
        }
        self
    }
}

/// Generate a new device id (UUID v7)
#[must_use]
pub fn generate_device_id() -> String {
    Uuid::now_v7().to_string()
}
