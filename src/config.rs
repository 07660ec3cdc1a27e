//! Application-wide constants and compile-time configuration.
//!
//! USB identity, endpoint sizes, buffer capacities and the demo schedule
//! live here so they can be tuned in one place.

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "cdc-hid-demo";
pub const USB_PRODUCT: &str = "Serial + Generic HID (KMJ) Demo";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// Maximum bus current drawn (mA).
pub const USB_MAX_POWER_MA: u16 = 100;

/// Control endpoint 0 packet size.
pub const USB_EP0_SIZE: u8 = 64;

/// CDC bulk IN/OUT endpoint packet size.
pub const CDC_TXRX_EPSIZE: usize = 64;

/// CDC notification (interrupt IN) endpoint packet size.
pub const CDC_NOTIFICATION_EPSIZE: u16 = 8;

/// CDC notification endpoint polling interval (ms). The endpoint is never used.
pub const CDC_NOTIFICATION_POLL_MS: u8 = 255;

/// Generic HID report size: one report-ID byte plus eight payload bytes.
pub const GENERIC_REPORT_SIZE: usize = 9;

/// Generic HID interrupt endpoint packet size.
pub const GENERIC_EPSIZE: u16 = 16;

/// Generic HID polling interval (ms).
pub const GENERIC_POLL_MS: u8 = 5;

// Serial path

/// Capacity of each serial ring buffer (host→device and device→host).
pub const SERIAL_BUFFER_CAPACITY: usize = 128;

/// Echo bytes received from the host back to it.
pub const LOCAL_ECHO_DEFAULT: bool = true;

// Demo schedule

/// Number of ticks in one demo cycle.
pub const TICK_PERIOD: u32 = 10_000;

/// Tick residues (modulo [`TICK_PERIOD`]) at which each demo action fires.
pub const TICK_SERIAL_MESSAGE: u32 = 1_000;
pub const TICK_MOUSE_MOVE: u32 = 3_000;
pub const TICK_KEYBOARD_PRESS: u32 = 5_000;
pub const TICK_KEYBOARD_RELEASE: u32 = 6_000;
pub const TICK_JOYSTICK_MOVE: u32 = 7_000;
pub const TICK_JOYSTICK_RELEASE: u32 = 8_000;

/// Mouse demo: relative movement per step and wheel delta.
pub const MOUSE_STEP: i8 = 10;
pub const MOUSE_WHEEL_STEP: i8 = -1;

/// Keyboard demo: usage code of the first key in the cycle (`a`).
pub const KEYBOARD_BASE_KEYCODE: u8 = 0x04;

/// Keyboard demo: number of keys cycled through (`a` to `z`).
pub const KEYBOARD_KEY_COUNT: u32 = 26;

/// Joystick demo: stick deflection.
pub const JOYSTICK_STEP: i8 = 5;

/// Firmware loop pacing. 100 µs per tick makes one demo cycle last a second.
pub const LOOP_TICK_US: u64 = 100;
