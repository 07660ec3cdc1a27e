//! Class-specific control requests for the HID and CDC interfaces.
//!
//! Requests are answered synchronously from the shared [`DemoState`]:
//!
//! | request                           | dir | effect                                   |
//! |-----------------------------------|-----|------------------------------------------|
//! | HID GET_REPORT (0x01)             | IN  | return the outbound report, then zero it |
//! | HID SET_REPORT (0x09)             | OUT | replace the inbound report, notify sink  |
//! | CDC SET_LINE_CODING (0x20)        | OUT | store line coding                        |
//! | CDC GET_LINE_CODING (0x21)        | IN  | return line coding                       |
//! | CDC SET_CONTROL_LINE_STATE (0x22) | OUT | record DTR/RTS bits                      |
//!
//! Only class requests addressed to an interface, with the direction
//! listed above, are recognised; everything else is left to the USB stack.

use crate::channels::ReportSink;
use crate::error::{Error, Result};
use crate::hid::GENERIC_REPORT_SIZE;
use crate::line_coding::{LineEncoding, LINE_CODING_SIZE};
use crate::state::DemoState;

pub const HID_REQ_GET_REPORT: u8 = 0x01;
pub const HID_REQ_SET_REPORT: u8 = 0x09;
pub const CDC_REQ_SET_LINE_ENCODING: u8 = 0x20;
pub const CDC_REQ_GET_LINE_ENCODING: u8 = 0x21;
pub const CDC_REQ_SET_CONTROL_LINE_STATE: u8 = 0x22;

/// Control line bits in SET_CONTROL_LINE_STATE's wValue.
pub const CONTROL_LINE_DTR: u16 = 1 << 0;
pub const CONTROL_LINE_RTS: u16 = 1 << 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    HostToDevice,
    DeviceToHost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestType {
    Standard,
    Class,
    Vendor,
    Reserved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Recipient {
    Device,
    Interface,
    Endpoint,
    Other,
}

/// Fields of a SETUP packet, as handed over by the USB stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetupPacket {
    pub direction: Direction,
    pub request_type: RequestType,
    pub recipient: Recipient,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

/// The class requests this device answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClassRequest {
    GetReport,
    SetReport,
    GetLineEncoding,
    SetLineEncoding,
    SetControlLineState { lines: u16 },
}

impl ClassRequest {
    /// Recognise a class request addressed to an interface.
    pub fn decode(setup: &SetupPacket) -> Option<Self> {
        if setup.request_type != RequestType::Class || setup.recipient != Recipient::Interface {
            return None;
        }

        let request = match (setup.request, setup.direction) {
            (HID_REQ_GET_REPORT, Direction::DeviceToHost) => ClassRequest::GetReport,
            (HID_REQ_SET_REPORT, Direction::HostToDevice) => ClassRequest::SetReport,
            (CDC_REQ_GET_LINE_ENCODING, Direction::DeviceToHost) => ClassRequest::GetLineEncoding,
            (CDC_REQ_SET_LINE_ENCODING, Direction::HostToDevice) => ClassRequest::SetLineEncoding,
            (CDC_REQ_SET_CONTROL_LINE_STATE, Direction::HostToDevice) => {
                ClassRequest::SetControlLineState { lines: setup.value }
            }
            _ => return None,
        };
        Some(request)
    }
}

/// Answer a device→host request by filling `buf`.
///
/// Returns the number of bytes to send, truncated to `buf.len()` (the
/// host's wLength).
pub fn handle_control_in(state: &mut DemoState, request: ClassRequest, buf: &mut [u8]) -> Result<usize> {
    match request {
        ClassRequest::GetReport => {
            let n = buf.len().min(GENERIC_REPORT_SIZE);
            buf[..n].copy_from_slice(&state.report_out.as_bytes()[..n]);
            // Clean out report data after sending
            state.report_out.clear();
            Ok(n)
        }
        ClassRequest::GetLineEncoding => {
            let n = buf.len().min(LINE_CODING_SIZE);
            buf[..n].copy_from_slice(&state.line_encoding.to_bytes()[..n]);
            Ok(n)
        }
        _ => Err(Error::UnsupportedRequest),
    }
}

/// Apply a host→device request carrying `data`.
pub fn handle_control_out<S: ReportSink>(
    state: &mut DemoState,
    request: ClassRequest,
    data: &[u8],
    sink: &mut S,
) -> Result<()> {
    match request {
        ClassRequest::SetReport => {
            state.report_in.copy_from(data);
            sink.process_inbound_report(&state.report_in);
            Ok(())
        }
        ClassRequest::SetLineEncoding => {
            state.line_encoding = LineEncoding::from_bytes(data)?;
            #[cfg(feature = "defmt")]
            defmt::debug!("line coding: {}", state.line_encoding);
            Ok(())
        }
        ClassRequest::SetControlLineState { lines } => {
            state.control_line_state = lines;
            Ok(())
        }
        _ => Err(Error::UnsupportedRequest),
    }
}
