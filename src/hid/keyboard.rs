//! Keyboard variant of the generic HID report, plus LED output handling.
//!
//! Input layout (9 bytes):
//! ```text
//! Byte 0: Report ID (2)
//! Byte 1: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 2: Reserved (0x00)
//! Byte 3-8: Up to 6 simultaneous key codes (USB HID usage codes)
//! ```
//!
//! Output layout (host → device): `[2, led_bits, 0, 0, 0, 0, 0, 0, 0]`.

use super::{GenericReport, ReportId};
use crate::status::{LED2, LED3, LED4};

/// HID keyboard LED output bits.
pub const LED_NUM_LOCK: u8 = 1 << 0;
pub const LED_CAPS_LOCK: u8 = 1 << 1;
pub const LED_SCROLL_LOCK: u8 = 1 << 2;

/// Keyboard state snapshot carried in the generic report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Reserved byte (always 0x00 per HID spec).
    pub reserved: u8,
    /// Up to 6 simultaneously pressed key codes.
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; 6],
        }
    }

    /// A report with a single key held and no modifiers.
    pub const fn single_key(keycode: u8) -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [keycode, 0, 0, 0, 0, 0],
        }
    }

    /// Overwrite `report` wholesale with this keyboard state.
    pub fn write_to(&self, report: &mut GenericReport) {
        let buf = report.as_mut_bytes();
        buf[0] = ReportId::Keyboard as u8;
        buf[1] = self.modifier;
        buf[2] = self.reserved;
        buf[3..9].copy_from_slice(&self.keycodes);
    }

    /// Decode a generic report tagged with the keyboard report ID.
    #[cfg(test)]
    pub fn from_report(report: &GenericReport) -> Option<Self> {
        if report.report_id() != Some(ReportId::Keyboard) {
            return None;
        }
        let buf = report.as_bytes();
        let mut keycodes = [0u8; 6];
        keycodes.copy_from_slice(&buf[3..9]);
        Some(Self {
            modifier: buf[1],
            reserved: buf[2],
            keycodes,
        })
    }

    /// Returns `true` if no keys are pressed (release event).
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }
}

/// Extract the LED bits from a keyboard output report sent by the host.
pub fn led_status(report: &GenericReport) -> Option<u8> {
    match report.report_id() {
        Some(ReportId::Keyboard) => Some(report.as_bytes()[1]),
        _ => None,
    }
}

/// Translate host keyboard LED bits into the board LED mask.
///
/// LED2 is always lit once the host reports LED state, so Num Lock only
/// adds to it. Caps Lock → LED3, Scroll Lock → LED4.
pub fn keyboard_led_mask(status: u8) -> u8 {
    let mut mask = LED2;

    if status & LED_NUM_LOCK != 0 {
        mask |= LED2;
    }
    if status & LED_CAPS_LOCK != 0 {
        mask |= LED3;
    }
    if status & LED_SCROLL_LOCK != 0 {
        mask |= LED4;
    }

    mask
}
