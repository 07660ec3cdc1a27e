//! Seams between the demo core and the outside world.
//!
//! The USB device stack (enumeration, descriptors, endpoint hardware) is
//! reached only through [`UsbChannels`]. The firmware implements it on top
//! of embassy-usb; the tests implement it with an in-memory mock.
//! Inbound HID reports are handed to a [`ReportSink`].

use crate::hid::keyboard::{keyboard_led_mask, led_status};
use crate::hid::GenericReport;

/// Logical data channels of the composite device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endpoint {
    /// CDC bulk IN (device → host serial data).
    CdcTx,
    /// CDC bulk OUT (host → device serial data).
    CdcRx,
    /// Generic HID interrupt IN.
    HidIn,
    /// Generic HID interrupt OUT.
    HidOut,
}

/// Packet-level access to the device's endpoints.
///
/// Calls other than [`is_configured`](UsbChannels::is_configured) and
/// [`select`](UsbChannels::select) act on the currently selected endpoint.
/// OUT-side methods are meaningful for [`Endpoint::CdcRx`] and
/// [`Endpoint::HidOut`], IN-side methods for the other two.
#[allow(async_fn_in_trait)]
pub trait UsbChannels {
    /// `true` once the host has selected a configuration.
    fn is_configured(&self) -> bool;

    fn select(&mut self, endpoint: Endpoint);

    /// OUT: a packet from the host is waiting.
    fn has_data(&mut self) -> bool;

    /// IN: the endpoint can accept another packet.
    fn is_writable(&self) -> bool;

    /// OUT: unread bytes left in the received packet.
    /// IN: bytes staged in the packet being built.
    fn bytes_available(&self) -> usize;

    /// OUT: next byte of the received packet.
    fn read_byte(&mut self) -> Option<u8>;

    /// IN: stage one byte into the packet being built.
    fn write_byte(&mut self, byte: u8);

    /// OUT: copy up to `buf.len()` bytes of the received packet.
    fn read_stream(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() {
            match self.read_byte() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        n
    }

    /// IN: stage every byte of `data`.
    fn write_stream(&mut self, data: &[u8]) {
        for &byte in data {
            self.write_byte(byte);
        }
    }

    /// OUT: release the received packet so the host can send the next one.
    fn finalize_out(&mut self);

    /// IN: hand the staged packet (possibly empty) to the host.
    fn finalize_in(&mut self);

    /// IN: wait until the endpoint can accept another packet.
    ///
    /// There is no timeout; a host that never polls stalls the caller.
    async fn wait_until_ready(&mut self);
}

/// Consumer of reports received from the host.
pub trait ReportSink {
    fn process_inbound_report(&mut self, report: &GenericReport);
}

/// Reports are accepted and ignored.
impl ReportSink for () {
    fn process_inbound_report(&mut self, _report: &GenericReport) {}
}

/// Physical indicator output for the host's keyboard LED state.
pub trait KeyboardLeds {
    /// `mask` is a board LED mask (see [`crate::status`]).
    fn apply_keyboard_led_state(&mut self, mask: u8);
}

/// Report sink that mirrors keyboard LED output reports onto the board LEDs.
pub struct KeyboardLedSink<L> {
    leds: L,
}

impl<L: KeyboardLeds> KeyboardLedSink<L> {
    pub fn new(leds: L) -> Self {
        Self { leds }
    }

    pub fn leds(&self) -> &L {
        &self.leds
    }
}

impl<L: KeyboardLeds> ReportSink for KeyboardLedSink<L> {
    fn process_inbound_report(&mut self, report: &GenericReport) {
        if let Some(status) = led_status(report) {
            self.leds.apply_keyboard_led_state(keyboard_led_mask(status));
        }
    }
}

impl<T: ReportSink + ?Sized> ReportSink for &mut T {
    fn process_inbound_report(&mut self, report: &GenericReport) {
        (**self).process_inbound_report(report)
    }
}
