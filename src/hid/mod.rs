//! Generic HID report exchanged on the HID interrupt endpoints.
//!
//! Every report is a fixed [`GENERIC_REPORT_SIZE`]-byte array whose first
//! byte is the report ID selecting the keyboard, mouse or joystick layout.
//! The typed report structs in the submodules write themselves into a
//! [`GenericReport`] wholesale.

pub mod descriptor;
pub mod joystick;
pub mod keyboard;
pub mod mouse;


pub use crate::config::GENERIC_REPORT_SIZE;
pub use descriptor::GENERIC_REPORT_DESCRIPTOR;
pub use joystick::{JoystickReport, Stick};
pub use keyboard::{keyboard_led_mask, KeyboardReport};
pub use mouse::MouseReport;

/// Report IDs declared by [`GENERIC_REPORT_DESCRIPTOR`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ReportId {
    Mouse = 1,
    Keyboard = 2,
    Joystick = 3,
}

impl ReportId {
    pub fn from_u8(id: u8) -> Option<Self> {
        match id {
            1 => Some(ReportId::Mouse),
            2 => Some(ReportId::Keyboard),
            3 => Some(ReportId::Joystick),
            _ => None,
        }
    }
}

/// Fixed-size generic HID report buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GenericReport([u8; GENERIC_REPORT_SIZE]);

impl GenericReport {
    /// All-zero report.
    pub const fn new() -> Self {
        Self([0; GENERIC_REPORT_SIZE])
    }

    #[cfg(test)]
    pub const fn from_bytes(bytes: [u8; GENERIC_REPORT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; GENERIC_REPORT_SIZE] {
        &self.0
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8; GENERIC_REPORT_SIZE] {
        &mut self.0
    }

    /// Replace the contents with `data`; missing trailing bytes become zero.
    ///
    /// Returns the number of bytes taken from `data`.
    pub fn copy_from(&mut self, data: &[u8]) -> usize {
        let n = data.len().min(GENERIC_REPORT_SIZE);
        self.0.fill(0);
        self.0[..n].copy_from_slice(&data[..n]);
        n
    }

    pub fn clear(&mut self) {
        self.0.fill(0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Report ID from byte 0, if it names a known layout.
    pub fn report_id(&self) -> Option<ReportId> {
        ReportId::from_u8(self.0[0])
    }
}

impl Default for GenericReport {
    fn default() -> Self {
        Self::new()
    }
}
