//! Virtual serial port task.
//!
//! Moves bytes between the two serial ring buffers and the CDC bulk
//! endpoints, once per loop iteration:
//!
//! 1. **Outbound** - when the host has opened the port (non-zero baud rate)
//!    and the IN endpoint is free, up to one packet of queued bytes is sent.
//!    A packet that exactly fills the endpoint must be followed by a
//!    zero-length packet, otherwise the host keeps buffering until a short
//!    packet arrives. The pass only reports that one is owed; the caller
//!    sends it with [`send_zero_length_packet`], which needs no access to
//!    the demo state and so can wait for the endpoint without holding it.
//! 2. **Inbound** - a received packet is copied byte-for-byte into the
//!    host→device buffer and, with local echo on, into the device→host buffer
//!    as well. Echoed bytes go out on the next pass.

use crate::channels::{Endpoint, UsbChannels};
use crate::config::CDC_TXRX_EPSIZE;
use crate::state::DemoState;

/// What one pass of the serial task did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialPass {
    /// Bytes handed to the IN endpoint.
    pub sent: usize,
    /// A full packet went out and a zero-length packet must follow it.
    pub zlp_pending: bool,
    /// Bytes read from the OUT endpoint.
    pub received: usize,
    /// Received bytes that did not fit in the host→device buffer.
    pub rx_dropped: usize,
}

pub fn run_serial_task<U: UsbChannels>(state: &mut DemoState, usb: &mut U) -> SerialPass {
    let mut pass = SerialPass::default();

    // Device must be connected and configured for the task to run
    if !usb.is_configured() {
        return pass;
    }

    if !state.host_tx.is_empty() && state.line_encoding.is_open() {
        usb.select(Endpoint::CdcTx);

        if usb.is_writable() {
            while pass.sent < CDC_TXRX_EPSIZE {
                let Some(byte) = state.host_tx.remove() else {
                    break;
                };
                usb.write_byte(byte);
                pass.sent += 1;
            }

            pass.zlp_pending = usb.bytes_available() == CDC_TXRX_EPSIZE;
            usb.finalize_in();
        }
    }

    usb.select(Endpoint::CdcRx);

    if usb.has_data() {
        while let Some(byte) = usb.read_byte() {
            pass.received += 1;
            if state.host_rx.insert(byte).is_err() {
                pass.rx_dropped += 1;
            }
            if state.local_echo {
                // Overflow is counted by the ring buffer itself.
                let _ = state.host_tx.insert(byte);
            }
        }
        usb.finalize_out();

        #[cfg(feature = "defmt")]
        if pass.rx_dropped > 0 {
            defmt::warn!("serial RX full, {} bytes dropped", pass.rx_dropped);
        }
    }

    pass
}

/// Terminate a full CDC packet with a zero-length one.
///
/// Waits until the IN endpoint can take another packet; there is no timeout.
pub async fn send_zero_length_packet<U: UsbChannels>(usb: &mut U) {
    usb.select(Endpoint::CdcTx);
    usb.wait_until_ready().await;
    usb.finalize_in();
}
