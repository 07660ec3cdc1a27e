//! Composite USB demo core: virtual serial port plus generic HID.
//!
//! Everything here is hardware-independent and runs on the host under
//! `cargo test`. The USB stack is reached through the
//! [`channels::UsbChannels`] trait; the nRF52840 firmware in `main.rs`
//! implements it on top of embassy-usb.
//!
//! Per loop iteration ([`app::poll`]):
//!
//! 1. [`demo`] picks at most one action from the tick counter and mutates
//!    the serial TX buffer or the outbound HID report.
//! 2. [`serial`] drains the TX ring buffer to the CDC IN endpoint and
//!    fills the RX ring buffer (and the echo) from the CDC OUT endpoint.
//! 3. [`report`] exchanges generic HID reports on the interrupt endpoints.
//!
//! Class control requests ([`control`]) read and write the same
//! [`state::DemoState`] from the USB stack's control callback.
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].
//! This lib.rs is shared by the firmware and the host tests.

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod channels;
pub mod config;
pub mod control;
pub mod demo;
pub mod error;
pub mod hid;
pub mod line_coding;
pub mod report;
pub mod ring_buffer;
pub mod serial;
pub mod state;
pub mod status;

pub use error::{Error, Result};
pub use state::DemoState;
