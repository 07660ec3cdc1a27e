//! Generic HID report task.
//!
//! Inbound: a non-empty report from the host replaces the inbound report
//! buffer and is handed to the [`ReportSink`].
//! Outbound: whenever the IN endpoint is free the current outbound report
//! is written wholesale and then zeroed, so each report the scheduler
//! builds is sent exactly once.

use crate::channels::{Endpoint, ReportSink, UsbChannels};
use crate::hid::GENERIC_REPORT_SIZE;
use crate::state::DemoState;

/// What one pass of the report task did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportPass {
    pub received: bool,
    pub sent: bool,
}

pub fn run_report_task<U, S>(state: &mut DemoState, usb: &mut U, sink: &mut S) -> ReportPass
where
    U: UsbChannels,
    S: ReportSink,
{
    let mut pass = ReportPass::default();

    // Device must be connected and configured for the task to run
    if !usb.is_configured() {
        return pass;
    }

    usb.select(Endpoint::HidOut);

    if usb.has_data() {
        // A zero-length packet carries no report.
        if usb.bytes_available() > 0 {
            let mut buf = [0u8; GENERIC_REPORT_SIZE];
            let n = usb.read_stream(&mut buf);
            state.report_in.copy_from(&buf[..n]);
            sink.process_inbound_report(&state.report_in);
            pass.received = true;
        }
        usb.finalize_out();
    }

    usb.select(Endpoint::HidIn);

    if usb.is_writable() {
        usb.write_stream(state.report_out.as_bytes());
        state.report_out.clear();
        usb.finalize_in();
        pass.sent = true;
    }

    pass
}
