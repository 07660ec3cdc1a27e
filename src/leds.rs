//! Board LEDs (nRF52840-DK LED1..LED4, active low).
//!
//! Status changes and host keyboard LED reports both post a mask here; the
//! LED task owns the pins and shows whichever mask arrived last.

use cdc_hid_demo::channels::KeyboardLeds;
use defmt::warn;
use embassy_nrf::gpio::{AnyPin, Level, Output, OutputDrive};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

static LED_MASKS: Channel<CriticalSectionRawMutex, u8, 4> = Channel::new();

/// Queue a new LED mask for display.
pub fn request(mask: u8) {
    if LED_MASKS.try_send(mask).is_err() {
        warn!("LED queue full, mask {=u8:#x} dropped", mask);
    }
}

/// Keyboard LED output routed to the board LEDs.
pub struct LedRequests;

impl KeyboardLeds for LedRequests {
    fn apply_keyboard_led_state(&mut self, mask: u8) {
        request(mask);
    }
}

pub struct BoardLeds {
    pins: [Output<'static>; 4],
}

impl BoardLeds {
    pub fn new(led1: AnyPin, led2: AnyPin, led3: AnyPin, led4: AnyPin) -> Self {
        let off = |pin| Output::new(pin, Level::High, OutputDrive::Standard);
        Self {
            pins: [off(led1), off(led2), off(led3), off(led4)],
        }
    }

    /// Bit `n` of `mask` lights LED `n + 1`.
    pub fn set_mask(&mut self, mask: u8) {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            if mask & (1 << i) != 0 {
                pin.set_low();
            } else {
                pin.set_high();
            }
        }
    }
}

#[embassy_executor::task]
pub async fn led_task(mut leds: BoardLeds) -> ! {
    loop {
        let mask = LED_MASKS.receive().await;
        leds.set_mask(mask);
    }
}
