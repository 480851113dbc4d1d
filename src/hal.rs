//! Hardware capability traits.
//!
//! The engine never touches registers. Board support code implements these
//! traits for its pins, buzzer timer and fault LED, and hands the result to
//! [`Game`](crate::game::Game).

use crate::time::Clock;

/// Four indicator LEDs, one per [`Step`](crate::types::Step).
pub trait Leds {
    /// Switches LED `index` (0..4) on or off. Must be idempotent.
    fn set_led(&mut self, index: usize, on: bool);
}

/// Four push buttons, pull-down biased.
pub trait Buttons {
    /// Returns the current electrical level of button `index` (0..4).
    ///
    /// `true` means the button is pressed.
    fn read_button(&mut self, index: usize) -> bool;
}

/// Tone output.
///
/// Frequency-to-timer math belongs to the implementation.
pub trait Buzzer {
    /// Starts a tone at `freq_hz`.
    ///
    /// With `Some(ms)` the call blocks for `ms` milliseconds and silences the
    /// output before returning. With `None` the tone sustains until
    /// [`stop_tone`](Buzzer::stop_tone).
    fn play_tone(&mut self, freq_hz: u32, duration_ms: Option<u32>);

    /// Silences the output. Must be idempotent.
    fn stop_tone(&mut self);
}

/// Dedicated fault LED driven only by the seed store.
pub trait FaultIndicator {
    /// Turns the fault LED on or off.
    fn set_fault_indicator(&mut self, on: bool);
}

/// Everything the game loop needs from the board.
///
/// Blanket-implemented for any type providing the individual capabilities.
pub trait Console: Leds + Buttons + Buzzer + Clock {
    /// Switches every LED off and silences the buzzer.
    fn all_off(&mut self) {
        for index in 0..crate::STEP_COUNT {
            self.set_led(index, false);
        }
        self.stop_tone();
    }
}

impl<T: Leds + Buttons + Buzzer + Clock + ?Sized> Console for T {}
