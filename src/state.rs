//! The demo's shared mutable context.
//!
//! Everything the scheduler, the two endpoint tasks and the control
//! request handler touch lives in one owned [`DemoState`], passed by
//! `&mut` to each operation. The firmware wraps it in a mutex; host tests
//! own it directly.

use crate::config::{LOCAL_ECHO_DEFAULT, SERIAL_BUFFER_CAPACITY};
use crate::hid::GenericReport;
use crate::line_coding::LineEncoding;
use crate::ring_buffer::RingBuffer;
use crate::status::{DeviceEvent, UsbStatus};

/// Serial ring buffer type used for both directions.
pub type SerialBuffer = RingBuffer<SERIAL_BUFFER_CAPACITY>;

pub struct DemoState {
    /// Bytes received from the host, waiting for the application.
    pub host_rx: SerialBuffer,
    /// Bytes waiting to be sent to the host.
    pub host_tx: SerialBuffer,
    /// Most recent report received from the host.
    pub report_in: GenericReport,
    /// Report to send on the next IN opportunity; zeroed after each send.
    pub report_out: GenericReport,
    pub line_encoding: LineEncoding,
    /// DTR/RTS bitmask from the last SET_CONTROL_LINE_STATE.
    pub control_line_state: u16,
    pub local_echo: bool,
    /// Free-running loop counter, wraps on overflow.
    pub tick: u32,
    pub status: UsbStatus,
}

impl DemoState {
    pub const fn new() -> Self {
        Self {
            host_rx: RingBuffer::new(),
            host_tx: RingBuffer::new(),
            report_in: GenericReport::new(),
            report_out: GenericReport::new(),
            line_encoding: LineEncoding::new(),
            control_line_state: 0,
            local_echo: LOCAL_ECHO_DEFAULT,
            tick: 0,
            status: UsbStatus::NotReady,
        }
    }

    /// Apply a bus event and return the resulting status.
    ///
    /// A new configuration resets the baud rate to zero so the host has to
    /// send fresh line coding before serial output resumes.
    pub fn on_device_event(&mut self, event: DeviceEvent) -> UsbStatus {
        self.status = match event {
            DeviceEvent::Connect => UsbStatus::Enumerating,
            DeviceEvent::Disconnect => UsbStatus::NotReady,
            DeviceEvent::ConfigurationChanged { success } => {
                self.line_encoding.baud_rate = 0;
                if success {
                    UsbStatus::Ready
                } else {
                    UsbStatus::Error
                }
            }
        };

        #[cfg(feature = "defmt")]
        defmt::info!("USB event {} -> {}", event, self.status);

        self.status
    }
}

impl Default for DemoState {
    fn default() -> Self {
        Self::new()
    }
}
