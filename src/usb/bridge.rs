//! Packet bridge between the async endpoints and the polling loop.
//!
//! One pump task per endpoint moves whole packets through a bounded
//! channel. [`EmbassyChannels`] gives the loop the select/stage/finalize
//! view of those channels that the library tasks expect. An IN channel
//! with room counts as a writable endpoint.

use core::sync::atomic::{AtomicBool, Ordering};

use cdc_hid_demo::channels::{Endpoint, UsbChannels};
use cdc_hid_demo::config::CDC_TXRX_EPSIZE;
use defmt::{info, warn};
use embassy_futures::yield_now;
use embassy_nrf::peripherals;
use embassy_nrf::usb::{Endpoint as NrfEndpoint, In, Out};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_usb::class::hid::{HidReader, HidWriter};
use embassy_usb::driver::{Endpoint as _, EndpointError, EndpointIn, EndpointOut};
use heapless::Vec;

use crate::usb::device::{UsbDriver, HID_PACKET_SIZE};

/// One USB packet.
pub type Packet = Vec<u8, CDC_TXRX_EPSIZE>;

type InChannel = Channel<CriticalSectionRawMutex, Packet, 1>;
type OutChannel = Channel<CriticalSectionRawMutex, Packet, 2>;

static CDC_TX: InChannel = Channel::new();
static CDC_RX: OutChannel = Channel::new();
static HID_IN: InChannel = Channel::new();
static HID_OUT: OutChannel = Channel::new();
static CONFIGURED: AtomicBool = AtomicBool::new(false);

/// Called from the USB stack's bus event handler.
pub fn set_configured(configured: bool) {
    CONFIGURED.store(configured, Ordering::Relaxed);
}

#[derive(Default)]
struct OutSlot {
    packet: Option<Packet>,
    cursor: usize,
}

impl OutSlot {
    fn fill_from(&mut self, channel: &OutChannel) -> bool {
        if self.packet.is_none() {
            self.packet = channel.try_receive().ok();
            self.cursor = 0;
        }
        self.packet.is_some()
    }

    fn remaining(&self) -> usize {
        self.packet
            .as_ref()
            .map_or(0, |p| p.len().saturating_sub(self.cursor))
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.packet.as_ref()?.get(self.cursor)?;
        self.cursor += 1;
        Some(byte)
    }

    fn release(&mut self) {
        self.packet = None;
        self.cursor = 0;
    }
}

/// [`UsbChannels`] over the pump task channels.
pub struct EmbassyChannels {
    selected: Endpoint,
    cdc_rx: OutSlot,
    hid_out: OutSlot,
    cdc_tx_staging: Packet,
    hid_in_staging: Packet,
}

impl EmbassyChannels {
    pub fn new() -> Self {
        Self {
            selected: Endpoint::CdcTx,
            cdc_rx: OutSlot::default(),
            hid_out: OutSlot::default(),
            cdc_tx_staging: Packet::new(),
            hid_in_staging: Packet::new(),
        }
    }

    fn in_channel(&self) -> &'static InChannel {
        match self.selected {
            Endpoint::HidIn => &HID_IN,
            _ => &CDC_TX,
        }
    }

    fn staging(&mut self) -> &mut Packet {
        match self.selected {
            Endpoint::HidIn => &mut self.hid_in_staging,
            _ => &mut self.cdc_tx_staging,
        }
    }

    fn out_slot(&mut self) -> (&mut OutSlot, &'static OutChannel) {
        match self.selected {
            Endpoint::HidOut => (&mut self.hid_out, &HID_OUT),
            _ => (&mut self.cdc_rx, &CDC_RX),
        }
    }
}

impl UsbChannels for EmbassyChannels {
    fn is_configured(&self) -> bool {
        CONFIGURED.load(Ordering::Relaxed)
    }

    fn select(&mut self, endpoint: Endpoint) {
        self.selected = endpoint;
    }

    fn has_data(&mut self) -> bool {
        let (slot, channel) = self.out_slot();
        slot.fill_from(channel)
    }

    fn is_writable(&self) -> bool {
        !self.in_channel().is_full()
    }

    fn bytes_available(&self) -> usize {
        match self.selected {
            Endpoint::CdcRx => self.cdc_rx.remaining(),
            Endpoint::HidOut => self.hid_out.remaining(),
            Endpoint::CdcTx => self.cdc_tx_staging.len(),
            Endpoint::HidIn => self.hid_in_staging.len(),
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.out_slot().0.next_byte()
    }

    fn write_byte(&mut self, byte: u8) {
        if self.staging().push(byte).is_err() {
            warn!("{} packet full, byte dropped", self.selected);
        }
    }

    fn finalize_out(&mut self) {
        self.out_slot().0.release();
    }

    fn finalize_in(&mut self) {
        let packet = core::mem::take(self.staging());
        if self.in_channel().try_send(packet).is_err() {
            warn!("{} busy, packet dropped", self.selected);
        }
    }

    async fn wait_until_ready(&mut self) {
        while self.in_channel().is_full() {
            yield_now().await;
        }
    }
}

/// CDC bulk IN pump. Zero-length packets are written as-is.
#[embassy_executor::task]
pub async fn cdc_in_task(mut ep: NrfEndpoint<'static, peripherals::USBD, In>) -> ! {
    loop {
        let packet = CDC_TX.receive().await;
        ep.wait_enabled().await;
        if let Err(_e) = ep.write(&packet).await {
            warn!("CDC IN write failed");
        }
    }
}

/// CDC bulk OUT pump.
#[embassy_executor::task]
pub async fn cdc_out_task(mut ep: NrfEndpoint<'static, peripherals::USBD, Out>) -> ! {
    let mut buf = [0u8; CDC_TXRX_EPSIZE];
    loop {
        ep.wait_enabled().await;
        info!("CDC data endpoint enabled");
        loop {
            match ep.read(&mut buf).await {
                Ok(n) => {
                    if let Ok(packet) = Packet::from_slice(&buf[..n]) {
                        CDC_RX.send(packet).await;
                    }
                }
                Err(EndpointError::Disabled) => break,
                Err(_e) => warn!("CDC OUT read failed"),
            }
        }
    }
}

/// Generic HID interrupt IN pump.
#[embassy_executor::task]
pub async fn hid_in_task(mut writer: HidWriter<'static, UsbDriver, HID_PACKET_SIZE>) -> ! {
    loop {
        let packet = HID_IN.receive().await;
        writer.ready().await;
        if let Err(_e) = writer.write(&packet).await {
            warn!("HID IN write failed");
        }
    }
}

/// Generic HID interrupt OUT pump.
#[embassy_executor::task]
pub async fn hid_out_task(mut reader: HidReader<'static, UsbDriver, HID_PACKET_SIZE>) -> ! {
    let mut buf = [0u8; HID_PACKET_SIZE];
    loop {
        reader.ready().await;
        match reader.read(&mut buf).await {
            Ok(n) => {
                if let Ok(packet) = Packet::from_slice(&buf[..n]) {
                    HID_OUT.send(packet).await;
                }
            }
            Err(_e) => warn!("HID OUT read failed"),
        }
    }
}
