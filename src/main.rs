//! Composite USB demo firmware for the nRF52840-DK.
//!
//! Enumerates as a CDC-ACM virtual serial port plus a generic HID device
//! and runs the demo loop: one iteration every `LOOP_TICK_US`, which
//! makes a full mouse/keyboard/joystick/serial cycle last one second.

#![no_std]
#![no_main]

mod leds;
mod usb;

use cdc_hid_demo::app::{complete_pending, poll};
use cdc_hid_demo::channels::KeyboardLedSink;
use cdc_hid_demo::config;
use cdc_hid_demo::status::UsbStatus;
use cdc_hid_demo::DemoState;
use defmt::{debug, info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::Pin;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Ticker};
use {defmt_rtt as _, panic_probe as _};

use crate::leds::{BoardLeds, LedRequests};
use crate::usb::bridge::{self, EmbassyChannels};
use crate::usb::device;

/// Shared between the polling loop and the control request callbacks.
pub static STATE: Mutex<CriticalSectionRawMutex, DemoState> = Mutex::new(DemoState::new());

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("cdc-hid-demo starting");

    let leds = BoardLeds::new(
        p.P0_13.degrade(),
        p.P0_14.degrade(),
        p.P0_15.degrade(),
        p.P0_16.degrade(),
    );
    unwrap!(spawner.spawn(leds::led_task(leds)));
    leds::request(UsbStatus::NotReady.led_mask());

    let usb = device::init(p.USBD);
    unwrap!(spawner.spawn(device::usb_device_task(usb.device)));
    unwrap!(spawner.spawn(bridge::cdc_in_task(usb.cdc_in)));
    unwrap!(spawner.spawn(bridge::cdc_out_task(usb.cdc_out)));
    unwrap!(spawner.spawn(bridge::hid_in_task(usb.hid_writer)));
    unwrap!(spawner.spawn(bridge::hid_out_task(usb.hid_reader)));

    let mut channels = EmbassyChannels::new();
    let mut sink = KeyboardLedSink::new(LedRequests);
    let mut ticker = Ticker::every(Duration::from_micros(config::LOOP_TICK_US));

    loop {
        // The guard is dropped before anything awaits, so control callbacks
        // running in the USB task never find the state locked.
        let outcome = {
            let mut state = STATE.lock().await;

            while let Ok(event) = device::device_events().try_receive() {
                let status = state.on_device_event(event);
                leds::request(status.led_mask());
            }

            let tick = state.tick;
            let outcome = poll(&mut state, &mut channels, &mut sink);
            if let Some(action) = outcome.action {
                debug!("tick {}: {}", tick, action);
            }
            outcome
        };

        complete_pending(&mut channels, &outcome).await;
        ticker.next().await;
    }
}
