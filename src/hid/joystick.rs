//! Joystick variant of the generic HID report.
//!
//! Layout (9 bytes):
//! ```text
//! Byte 0: Report ID (3)
//! Byte 1: Buttons 1-8  (bitfield)
//! Byte 2: Buttons 9-16 (bitfield)
//! Byte 3: Left stick X  (signed)
//! Byte 4: Left stick Y  (signed)
//! Byte 5: Right stick X (signed)
//! Byte 6: Right stick Y (signed)
//! Byte 7-8: Unused (0x00)
//! ```

use super::{GenericReport, ReportId};

/// Two-axis stick position.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stick {
    pub x: i8,
    pub y: i8,
}

impl Stick {
    pub const CENTER: Stick = Stick { x: 0, y: 0 };

    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }
}

/// Joystick state snapshot carried in the generic report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickReport {
    /// Buttons 1-8.
    pub buttons1: u8,
    /// Buttons 9-16.
    pub buttons2: u8,
    pub left: Stick,
    pub right: Stick,
}

impl JoystickReport {
    /// Centered sticks, no buttons.
    pub const fn neutral() -> Self {
        Self {
            buttons1: 0,
            buttons2: 0,
            left: Stick::CENTER,
            right: Stick::CENTER,
        }
    }

    /// Overwrite `report` wholesale with this joystick state.
    pub fn write_to(&self, report: &mut GenericReport) {
        let buf = report.as_mut_bytes();
        buf.fill(0);
        buf[0] = ReportId::Joystick as u8;
        buf[1] = self.buttons1;
        buf[2] = self.buttons2;
        buf[3] = self.left.x as u8;
        buf[4] = self.left.y as u8;
        buf[5] = self.right.x as u8;
        buf[6] = self.right.y as u8;
    }

    /// Decode a generic report tagged with the joystick report ID.
    #[cfg(test)]
    pub fn from_report(report: &GenericReport) -> Option<Self> {
        if report.report_id() != Some(ReportId::Joystick) {
            return None;
        }
        let buf = report.as_bytes();
        Some(Self {
            buttons1: buf[1],
            buttons2: buf[2],
            left: Stick::new(buf[3] as i8, buf[4] as i8),
            right: Stick::new(buf[5] as i8, buf[6] as i8),
        })
    }

    #[cfg(test)]
    pub fn is_neutral(&self) -> bool {
        *self == Self::neutral()
    }
}
