//! USB device status and its four-LED indication.
//!
//! The firmware drives the board LEDs from [`UsbStatus::led_mask`]; the
//! keyboard LED report from the host reuses the same LEDs (see
//! [`keyboard_led_mask`](crate::hid::keyboard::keyboard_led_mask)).

/// Board LED bits.
pub const LED1: u8 = 1 << 0;
pub const LED2: u8 = 1 << 1;
pub const LED3: u8 = 1 << 2;
pub const LED4: u8 = 1 << 3;

/// Lifecycle of the device as seen from the host side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbStatus {
    /// Not attached, or detached from the host.
    NotReady,
    /// Attached; host is enumerating.
    Enumerating,
    /// Configured; endpoints are live.
    Ready,
    /// Endpoint configuration failed. The loop keeps running regardless.
    Error,
}

impl UsbStatus {
    pub fn led_mask(self) -> u8 {
        match self {
            UsbStatus::NotReady => LED1,
            UsbStatus::Enumerating => LED2 | LED3,
            UsbStatus::Ready => LED2 | LED4,
            UsbStatus::Error => LED1 | LED3,
        }
    }

    pub fn is_configured(self) -> bool {
        self == UsbStatus::Ready
    }
}

/// Bus-level events reported by the USB stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceEvent {
    /// VBUS present / controller enabled.
    Connect,
    /// VBUS lost / controller disabled.
    Disconnect,
    /// Host selected a configuration; `success` is the endpoint setup result.
    ConfigurationChanged { success: bool },
}
