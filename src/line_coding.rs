//! CDC-ACM line coding (baud rate, stop bits, parity, data bits).
//!
//! Purely advisory: the virtual serial port moves bytes over bulk
//! endpoints regardless of these values, but the host expects them to be
//! stored and returned by GET_LINE_CODING. A zero baud rate means the
//! host has not opened the port yet.
//!
//! Wire format (7 bytes, little-endian):
//! ```text
//! Byte 0-3: dwDTERate   - baud rate
//! Byte 4:   bCharFormat - 0 = 1 stop bit, 1 = 1.5, 2 = 2
//! Byte 5:   bParityType - 0 = none, 1 = odd, 2 = even, 3 = mark, 4 = space
//! Byte 6:   bDataBits   - 5, 6, 7, 8 or 16
//! ```

use crate::error::{Error, Result};

/// Size of the line coding structure on the wire.
pub const LINE_CODING_SIZE: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One = 0,
    OnePointFive = 1,
    Two = 2,
}

impl TryFrom<u8> for StopBits {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(StopBits::One),
            1 => Ok(StopBits::OnePointFive),
            2 => Ok(StopBits::Two),
            _ => Err(Error::InvalidLineCoding),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None = 0,
    Odd = 1,
    Even = 2,
    Mark = 3,
    Space = 4,
}

impl TryFrom<u8> for Parity {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Parity::None),
            1 => Ok(Parity::Odd),
            2 => Ok(Parity::Even),
            3 => Ok(Parity::Mark),
            4 => Ok(Parity::Space),
            _ => Err(Error::InvalidLineCoding),
        }
    }
}

/// Serial port settings mirrored back to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineEncoding {
    pub baud_rate: u32,
    pub stop_bits: StopBits,
    pub parity: Parity,
    pub data_bits: u8,
}

impl LineEncoding {
    /// Closed port, 8N1.
    pub const fn new() -> Self {
        Self {
            baud_rate: 0,
            stop_bits: StopBits::One,
            parity: Parity::None,
            data_bits: 8,
        }
    }

    /// `true` once the host has set a non-zero baud rate.
    pub fn is_open(&self) -> bool {
        self.baud_rate != 0
    }

    pub fn to_bytes(&self) -> [u8; LINE_CODING_SIZE] {
        let baud = self.baud_rate.to_le_bytes();
        [
            baud[0],
            baud[1],
            baud[2],
            baud[3],
            self.stop_bits as u8,
            self.parity as u8,
            self.data_bits,
        ]
    }

    /// Decode a SET_LINE_CODING payload. Extra trailing bytes are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < LINE_CODING_SIZE {
            return Err(Error::ShortTransfer);
        }

        let data_bits = match data[6] {
            bits @ (5 | 6 | 7 | 8 | 16) => bits,
            _ => return Err(Error::InvalidLineCoding),
        };

        Ok(Self {
            baud_rate: u32::from_le_bytes([data[0], data[1], data[2], data[3]]),
            stop_bits: StopBits::try_from(data[4])?,
            parity: Parity::try_from(data[5])?,
            data_bits,
        })
    }
}

impl Default for LineEncoding {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_closed_8n1() {
        let lc = LineEncoding::default();
        assert!(!lc.is_open());
        assert_eq!(lc.to_bytes(), [0, 0, 0, 0, 0, 0, 8]);
    }

    #[test]
    fn decodes_115200_8n1() {
        // 115200 = 0x0001C200
        let data = [0x00, 0xC2, 0x01, 0x00, 0x00, 0x00, 0x08];
        let lc = LineEncoding::from_bytes(&data).unwrap();
        assert_eq!(lc.baud_rate, 115_200);
        assert_eq!(lc.stop_bits, StopBits::One);
        assert_eq!(lc.parity, Parity::None);
        assert_eq!(lc.data_bits, 8);
        assert!(lc.is_open());
        assert_eq!(lc.to_bytes(), data);
    }

    #[test]
    fn decodes_9600_7e2() {
        let data = [0x80, 0x25, 0x00, 0x00, 0x02, 0x02, 0x07];
        let lc = LineEncoding::from_bytes(&data).unwrap();
        assert_eq!(lc.baud_rate, 9600);
        assert_eq!(lc.stop_bits, StopBits::Two);
        assert_eq!(lc.parity, Parity::Even);
        assert_eq!(lc.data_bits, 7);
    }

    #[test]
    fn short_payload_is_rejected() {
        assert_eq!(
            LineEncoding::from_bytes(&[0x80, 0x25, 0x00]),
            Err(Error::ShortTransfer)
        );
    }

    #[test]
    fn unknown_field_values_are_rejected() {
        let bad_stop = [0x80, 0x25, 0, 0, 3, 0, 8];
        let bad_parity = [0x80, 0x25, 0, 0, 0, 5, 8];
        let bad_bits = [0x80, 0x25, 0, 0, 0, 0, 9];
        assert_eq!(LineEncoding::from_bytes(&bad_stop), Err(Error::InvalidLineCoding));
        assert_eq!(LineEncoding::from_bytes(&bad_parity), Err(Error::InvalidLineCoding));
        assert_eq!(LineEncoding::from_bytes(&bad_bits), Err(Error::InvalidLineCoding));
    }
}
