//! In-memory USB endpoints for exercising the demo tasks on the host.
//!
//! OUT endpoints hold a queue of packets "sent by the host"; IN endpoints
//! record every finalized packet so tests can inspect what went on the wire.

#![allow(dead_code)]

use std::collections::VecDeque;

use cdc_hid_demo::channels::{Endpoint, KeyboardLeds, UsbChannels};

#[derive(Default)]
pub struct OutEndpoint {
    packets: VecDeque<Vec<u8>>,
    cursor: usize,
    pub finalized: usize,
}

pub struct InEndpoint {
    staging: Vec<u8>,
    pub sent: Vec<Vec<u8>>,
    pub writable: bool,
}

impl Default for InEndpoint {
    fn default() -> Self {
        Self {
            staging: Vec::new(),
            sent: Vec::new(),
            writable: true,
        }
    }
}

pub struct MockUsb {
    pub configured: bool,
    selected: Endpoint,
    pub cdc_tx: InEndpoint,
    pub cdc_rx: OutEndpoint,
    pub hid_in: InEndpoint,
    pub hid_out: OutEndpoint,
    /// Times a task waited for an IN endpoint to drain.
    pub waits: usize,
}

impl MockUsb {
    /// A configured device with every IN endpoint free.
    pub fn configured() -> Self {
        Self {
            configured: true,
            selected: Endpoint::CdcTx,
            cdc_tx: InEndpoint::default(),
            cdc_rx: OutEndpoint::default(),
            hid_in: InEndpoint::default(),
            hid_out: OutEndpoint::default(),
            waits: 0,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::configured()
        }
    }

    /// Queue a packet from the host on the CDC OUT endpoint.
    pub fn host_sends_serial(&mut self, data: &[u8]) {
        self.cdc_rx.packets.push_back(data.to_vec());
    }

    /// Queue a report from the host on the HID OUT endpoint.
    pub fn host_sends_report(&mut self, data: &[u8]) {
        self.hid_out.packets.push_back(data.to_vec());
    }

    /// Every byte sent on the CDC IN endpoint, packets concatenated.
    pub fn serial_output(&self) -> Vec<u8> {
        self.cdc_tx.sent.concat()
    }

    fn out_ep(&mut self) -> &mut OutEndpoint {
        match self.selected {
            Endpoint::CdcRx => &mut self.cdc_rx,
            Endpoint::HidOut => &mut self.hid_out,
            other => panic!("{:?} is not an OUT endpoint", other),
        }
    }

    fn in_ep(&mut self) -> &mut InEndpoint {
        match self.selected {
            Endpoint::CdcTx => &mut self.cdc_tx,
            Endpoint::HidIn => &mut self.hid_in,
            other => panic!("{:?} is not an IN endpoint", other),
        }
    }

    fn in_ep_ref(&self) -> &InEndpoint {
        match self.selected {
            Endpoint::CdcTx => &self.cdc_tx,
            Endpoint::HidIn => &self.hid_in,
            other => panic!("{:?} is not an IN endpoint", other),
        }
    }
}

impl UsbChannels for MockUsb {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn select(&mut self, endpoint: Endpoint) {
        self.selected = endpoint;
    }

    fn has_data(&mut self) -> bool {
        !self.out_ep().packets.is_empty()
    }

    fn is_writable(&self) -> bool {
        self.in_ep_ref().writable
    }

    fn bytes_available(&self) -> usize {
        match self.selected {
            Endpoint::CdcRx | Endpoint::HidOut => {
                let ep = if self.selected == Endpoint::CdcRx {
                    &self.cdc_rx
                } else {
                    &self.hid_out
                };
                ep.packets
                    .front()
                    .map_or(0, |p| p.len().saturating_sub(ep.cursor))
            }
            Endpoint::CdcTx | Endpoint::HidIn => self.in_ep_ref().staging.len(),
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        let ep = self.out_ep();
        let byte = *ep.packets.front()?.get(ep.cursor)?;
        ep.cursor += 1;
        Some(byte)
    }

    fn write_byte(&mut self, byte: u8) {
        self.in_ep().staging.push(byte);
    }

    fn finalize_out(&mut self) {
        let ep = self.out_ep();
        ep.packets.pop_front();
        ep.cursor = 0;
        ep.finalized += 1;
    }

    fn finalize_in(&mut self) {
        let ep = self.in_ep();
        let packet = core::mem::take(&mut ep.staging);
        ep.sent.push(packet);
    }

    /// The host is taken to drain the endpoint during the wait.
    async fn wait_until_ready(&mut self) {
        self.waits += 1;
        self.in_ep().writable = true;
    }
}

/// Board LEDs that remember the last mask written.
#[derive(Default)]
pub struct RecordingLeds {
    pub history: Vec<u8>,
}

impl KeyboardLeds for RecordingLeds {
    fn apply_keyboard_led_state(&mut self, mask: u8) {
        self.history.push(mask);
    }
}
