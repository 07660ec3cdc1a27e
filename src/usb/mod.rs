//! USB device subsystem - presents a composite CDC-ACM + HID device to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. The composite device has three interfaces:
//!
//! - Interface 0: CDC communication (class requests, notification endpoint)
//! - Interface 1: CDC data (bulk IN/OUT, 64 bytes)
//! - Interface 2: Generic HID with mouse, keyboard and joystick report IDs
//!
//! [`device`] builds the stack and answers class control requests.
//! [`bridge`] moves whole packets between the endpoints and the polling
//! loop, which sees them through the library's `UsbChannels` trait.

pub mod bridge;
pub mod device;
