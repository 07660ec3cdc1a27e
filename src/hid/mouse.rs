//! Mouse variant of the generic HID report.
//!
//! Layout (9 bytes):
//! ```text
//! Byte 0: Report ID (1)
//! Byte 1: Button bitfield
//!         Bit 0 = Left, Bit 1 = Right, Bit 2 = Middle
//! Byte 2: X displacement (signed, -127..127)
//! Byte 3: Y displacement (signed, -127..127)
//! Byte 4: Scroll wheel  (signed, -127..127)
//! Byte 5-8: Unused (0x00)
//! ```

use super::{GenericReport, ReportId};

/// Mouse state snapshot carried in the generic report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// Button bitfield (bit 0 = left, bit 1 = right, bit 2 = middle).
    pub buttons: u8,
    /// Relative X movement (signed).
    pub x: i8,
    /// Relative Y movement (signed).
    pub y: i8,
    /// Scroll wheel delta (signed).
    pub wheel: i8,
}

impl MouseReport {
    /// Create an idle (no movement, no buttons) report.
    #[cfg(test)]
    pub const fn empty() -> Self {
        Self {
            buttons: 0,
            x: 0,
            y: 0,
            wheel: 0,
        }
    }

    /// Overwrite `report` wholesale with this mouse state.
    pub fn write_to(&self, report: &mut GenericReport) {
        let buf = report.as_mut_bytes();
        buf.fill(0);
        buf[0] = ReportId::Mouse as u8;
        buf[1] = self.buttons;
        buf[2] = self.x as u8;
        buf[3] = self.y as u8;
        buf[4] = self.wheel as u8;
    }

    /// Decode a generic report tagged with the mouse report ID.
    #[cfg(test)]
    pub fn from_report(report: &GenericReport) -> Option<Self> {
        if report.report_id() != Some(ReportId::Mouse) {
            return None;
        }
        let buf = report.as_bytes();
        Some(Self {
            buttons: buf[1],
            x: buf[2] as i8,
            y: buf[3] as i8,
            wheel: buf[4] as i8,
        })
    }

    /// Returns `true` when no buttons are pressed and there is no movement.
    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.buttons == 0 && self.x == 0 && self.y == 0 && self.wheel == 0
    }
}
