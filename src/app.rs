//! One iteration of the demo's polling loop.
//!
//! [`poll`] does all the work that touches [`DemoState`] and never waits.
//! [`complete_pending`] then finishes transfers that have to wait for an
//! endpoint; it only needs the channels, so the firmware runs it after
//! releasing the state and control requests keep being answered.

use crate::channels::{ReportSink, UsbChannels};
use crate::demo::{run_scheduler, DemoAction};
use crate::report::{run_report_task, ReportPass};
use crate::serial::{run_serial_task, send_zero_length_packet, SerialPass};
use crate::state::DemoState;

/// Everything one loop iteration did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollOutcome {
    pub action: Option<DemoAction>,
    pub serial: SerialPass,
    pub report: ReportPass,
}

/// Run the scheduler for the current tick, service both endpoint pairs,
/// then advance the tick counter (wrapping).
pub fn poll<U, S>(state: &mut DemoState, usb: &mut U, sink: &mut S) -> PollOutcome
where
    U: UsbChannels,
    S: ReportSink,
{
    let action = run_scheduler(state);
    let serial = run_serial_task(state, usb);
    let report = run_report_task(state, usb, sink);
    state.tick = state.tick.wrapping_add(1);

    PollOutcome {
        action,
        serial,
        report,
    }
}

/// Finish what `outcome` left owed on the wire. Must run before the next
/// [`poll`].
pub async fn complete_pending<U: UsbChannels>(usb: &mut U, outcome: &PollOutcome) {
    if outcome.serial.zlp_pending {
        send_zero_length_packet(usb).await;
    }
}
