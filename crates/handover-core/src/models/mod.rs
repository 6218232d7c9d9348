//! Data models for handover records

mod device;
mod handover;

pub use device::{generate_device_id, Device, OTHERS_DEVICE_TYPE, STANDARD_DEVICE_TYPES};
pub use handover::{Handover, HandoverDraft, HandoverId, Signatures, StaffDetails};
