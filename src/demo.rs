//! Demo tick scheduler.
//!
//! A pure function of the loop counter picks at most one action per tick:
//!
//! | `tick % 10000` | action                                        |
//! |----------------|-----------------------------------------------|
//! | 1000           | queue `"Tick N\n\r"` on the serial port        |
//! | 3000           | mouse: dx = +10, dy = +10, wheel = -1          |
//! | 5000           | keyboard: press one key, `a`..`z` in turn      |
//! | 6000           | keyboard: release all keys                     |
//! | 7000           | joystick: button 1, left (+5,+5), right (-5,-5)|
//! | 8000           | joystick: release                              |
//!
//! `N` and the key advance once per cycle, derived from
//! `(tick - 1000) / 10000`.
//!
//! At the `u32` wrap boundary the cycle restarts mid-period because
//! 2^32 is not a multiple of 10000; at most one cycle is shortened.

use crate::config::{
    JOYSTICK_STEP, KEYBOARD_BASE_KEYCODE, KEYBOARD_KEY_COUNT, MOUSE_STEP, MOUSE_WHEEL_STEP,
    TICK_JOYSTICK_MOVE, TICK_JOYSTICK_RELEASE, TICK_KEYBOARD_PRESS, TICK_KEYBOARD_RELEASE,
    TICK_MOUSE_MOVE, TICK_PERIOD, TICK_SERIAL_MESSAGE,
};
use crate::hid::{JoystickReport, KeyboardReport, MouseReport, Stick};
use crate::state::DemoState;

/// Length of the serial tick message.
pub const TICK_MESSAGE_LEN: usize = 8;

/// One scheduled mutation of the shared buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DemoAction {
    /// Queue the tick message ending in ASCII `digit`.
    SerialMessage { digit: u8 },
    MouseMove,
    KeyboardPress { keycode: u8 },
    KeyboardRelease,
    JoystickMove,
    JoystickRelease,
}

/// Completed demo cycles as counted from the first serial message.
pub fn cycle_index(tick: u32) -> u32 {
    tick.wrapping_sub(TICK_SERIAL_MESSAGE) / TICK_PERIOD
}

/// Select the action for `tick`, if any.
pub fn action_for_tick(tick: u32) -> Option<DemoAction> {
    let action = match tick % TICK_PERIOD {
        TICK_SERIAL_MESSAGE => DemoAction::SerialMessage {
            digit: b'0' + (cycle_index(tick) % 10) as u8,
        },
        TICK_MOUSE_MOVE => DemoAction::MouseMove,
        TICK_KEYBOARD_PRESS => DemoAction::KeyboardPress {
            keycode: KEYBOARD_BASE_KEYCODE + (cycle_index(tick) % KEYBOARD_KEY_COUNT) as u8,
        },
        TICK_KEYBOARD_RELEASE => DemoAction::KeyboardRelease,
        TICK_JOYSTICK_MOVE => DemoAction::JoystickMove,
        TICK_JOYSTICK_RELEASE => DemoAction::JoystickRelease,
        _ => return None,
    };
    Some(action)
}

/// Serial bytes for the tick message: `T i c k ' ' digit LF CR`.
pub fn tick_message(digit: u8) -> [u8; TICK_MESSAGE_LEN] {
    [b'T', b'i', b'c', b'k', b' ', digit, b'\n', b'\r']
}

impl DemoAction {
    /// Mutate `state` for this action.
    ///
    /// Report actions overwrite the outbound report wholesale. The serial
    /// message is queued all-or-nothing; if the outbound buffer lacks room
    /// it is dropped and counted by the ring buffer.
    pub fn apply(self, state: &mut DemoState) {
        match self {
            DemoAction::SerialMessage { digit } => {
                if state.host_tx.try_extend(&tick_message(digit)).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("serial TX full, tick message dropped");
                }
            }
            DemoAction::MouseMove => MouseReport {
                buttons: 0,
                x: MOUSE_STEP,
                y: MOUSE_STEP,
                wheel: MOUSE_WHEEL_STEP,
            }
            .write_to(&mut state.report_out),
            DemoAction::KeyboardPress { keycode } => {
                KeyboardReport::single_key(keycode).write_to(&mut state.report_out)
            }
            DemoAction::KeyboardRelease => KeyboardReport::empty().write_to(&mut state.report_out),
            DemoAction::JoystickMove => JoystickReport {
                buttons1: 1,
                buttons2: 0,
                left: Stick::new(JOYSTICK_STEP, JOYSTICK_STEP),
                right: Stick::new(-JOYSTICK_STEP, -JOYSTICK_STEP),
            }
            .write_to(&mut state.report_out),
            DemoAction::JoystickRelease => {
                JoystickReport::neutral().write_to(&mut state.report_out)
            }
        }
    }
}

/// Run the scheduler for the current `state.tick`.
pub fn run_scheduler(state: &mut DemoState) -> Option<DemoAction> {
    let action = action_for_tick(state.tick)?;
    action.apply(state);
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::ReportId;

    fn drain(state: &mut DemoState) -> heapless::Vec<u8, 128> {
        let mut out = heapless::Vec::new();
        while let Some(b) = state.host_tx.remove() {
            out.push(b).unwrap();
        }
        out
    }

    #[test]
    fn off_schedule_ticks_do_nothing() {
        for tick in [0u32, 1, 999, 1001, 2000, 4000, 9000, 9999, 10_000, 12_345] {
            assert_eq!(action_for_tick(tick), None, "tick {tick}");
        }
    }

    #[test]
    fn each_trigger_selects_its_action() {
        assert!(matches!(action_for_tick(1000), Some(DemoAction::SerialMessage { .. })));
        assert_eq!(action_for_tick(3000), Some(DemoAction::MouseMove));
        assert!(matches!(action_for_tick(5000), Some(DemoAction::KeyboardPress { .. })));
        assert_eq!(action_for_tick(6000), Some(DemoAction::KeyboardRelease));
        assert_eq!(action_for_tick(7000), Some(DemoAction::JoystickMove));
        assert_eq!(action_for_tick(8000), Some(DemoAction::JoystickRelease));
    }

    #[test]
    fn selection_depends_only_on_residue() {
        for cycle in 0..50u32 {
            for residue in [1000u32, 3000, 5000, 6000, 7000, 8000, 4321] {
                let a = action_for_tick(residue);
                let b = action_for_tick(cycle * TICK_PERIOD + residue);
                assert_eq!(
                    a.as_ref().map(core::mem::discriminant),
                    b.as_ref().map(core::mem::discriminant)
                );
            }
        }
    }

    #[test]
    fn tick_1000_queues_message_with_digit_zero() {
        let mut state = DemoState::new();
        state.tick = 1000;
        run_scheduler(&mut state);
        assert_eq!(state.host_tx.count(), 8);
        assert_eq!(drain(&mut state).as_slice(), b"Tick 0\n\r");
    }

    #[test]
    fn tick_11000_queues_message_with_digit_one() {
        let mut state = DemoState::new();
        state.tick = 11_000;
        run_scheduler(&mut state);
        assert_eq!(drain(&mut state).as_slice(), &[b'T', b'i', b'c', b'k', b' ', 48 + 1, 10, 13]);
    }

    #[test]
    fn message_digit_wraps_after_nine() {
        assert_eq!(
            action_for_tick(91_000),
            Some(DemoAction::SerialMessage { digit: b'9' })
        );
        assert_eq!(
            action_for_tick(101_000),
            Some(DemoAction::SerialMessage { digit: b'0' })
        );
    }

    #[test]
    fn tick_3000_sets_mouse_report() {
        let mut state = DemoState::new();
        state.tick = 3000;
        run_scheduler(&mut state);
        assert_eq!(
            state.report_out.as_bytes(),
            &[ReportId::Mouse as u8, 0, 10, 10, 255, 0, 0, 0, 0]
        );
    }

    #[test]
    fn keyboard_press_cycles_through_alphabet() {
        assert_eq!(
            action_for_tick(5000),
            Some(DemoAction::KeyboardPress { keycode: 0x04 })
        );
        assert_eq!(
            action_for_tick(15_000),
            Some(DemoAction::KeyboardPress { keycode: 0x05 })
        );
        // 25th cycle is 'z', then back to 'a'.
        assert_eq!(
            action_for_tick(255_000),
            Some(DemoAction::KeyboardPress { keycode: 0x1D })
        );
        assert_eq!(
            action_for_tick(265_000),
            Some(DemoAction::KeyboardPress { keycode: 0x04 })
        );
    }

    #[test]
    fn keyboard_press_and_release_reports() {
        let mut state = DemoState::new();
        state.tick = 15_000;
        run_scheduler(&mut state);
        assert_eq!(
            state.report_out.as_bytes(),
            &[ReportId::Keyboard as u8, 0, 0, 0x05, 0, 0, 0, 0, 0]
        );

        state.tick = 16_000;
        run_scheduler(&mut state);
        assert_eq!(
            state.report_out.as_bytes(),
            &[ReportId::Keyboard as u8, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn joystick_move_and_release_reports() {
        let mut state = DemoState::new();
        state.tick = 7000;
        run_scheduler(&mut state);
        assert_eq!(
            state.report_out.as_bytes(),
            &[ReportId::Joystick as u8, 1, 0, 5, 5, 0xFB, 0xFB, 0, 0]
        );

        state.tick = 8000;
        run_scheduler(&mut state);
        assert_eq!(
            state.report_out.as_bytes(),
            &[ReportId::Joystick as u8, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn same_tick_reproduces_same_mutation() {
        for tick in [1000u32, 3000, 25_000, 47_000, 58_000] {
            let mut a = DemoState::new();
            let mut b = DemoState::new();
            a.tick = tick;
            b.tick = tick;
            assert_eq!(run_scheduler(&mut a), run_scheduler(&mut b));
            assert_eq!(a.report_out, b.report_out);
            assert_eq!(drain(&mut a), drain(&mut b));
        }
    }

    #[test]
    fn full_tx_buffer_drops_whole_message() {
        let mut state = DemoState::new();
        for _ in 0..(state.host_tx.capacity() - 4) {
            state.host_tx.insert(b'x').unwrap();
        }
        state.tick = 1000;
        run_scheduler(&mut state);
        assert_eq!(state.host_tx.count(), state.host_tx.capacity() - 4);
        assert_eq!(state.host_tx.dropped(), TICK_MESSAGE_LEN as u32);
    }
}
