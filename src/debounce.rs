//! Settle-and-resample button debouncing with a single press owner.
//!
//! A level change is only accepted if it is still present after the settle
//! interval. At most one button owns a press at any time: while it is held,
//! the other buttons produce no events. Simultaneous presses are not
//! supported, which keeps validation to one active step at a time.

use crate::STEP_COUNT;
use crate::hal::Buttons;
use crate::time::Clock;
use crate::types::{ButtonEvent, Step};

/// Per-button debounce state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonChannel {
    /// Level seen on the last sample.
    pub raw_level: bool,
    /// Debounced state.
    pub debounced_pressed: bool,
}

/// Debouncer for the four game buttons.
#[derive(Debug, Clone)]
pub struct Debouncer {
    channels: [ButtonChannel; STEP_COUNT],
    owner: Option<usize>,
    settle_ms: u32,
}

impl Debouncer {
    pub fn new(settle_ms: u32) -> Self {
        Self {
            channels: [ButtonChannel::default(); STEP_COUNT],
            owner: None,
            settle_ms,
        }
    }

    /// Samples button `index` once and reports a debounced transition.
    ///
    /// Blocks for the settle interval whenever a candidate transition is
    /// seen. Out-of-range indices never produce events.
    pub fn poll<H>(&mut self, index: usize, hw: &mut H) -> Option<ButtonEvent>
    where
        H: Buttons + Clock + ?Sized,
    {
        let step = Step::from_index(index)?;
        let raw = hw.read_button(index);
        self.channels[index].raw_level = raw;

        match self.owner {
            None if raw => {
                hw.sleep_ms(self.settle_ms);
                let settled = hw.read_button(index);
                self.channels[index].raw_level = settled;
                if !settled {
                    return None;
                }

                self.owner = Some(index);
                self.channels[index].debounced_pressed = true;
                trace!("button {} pressed", index);
                Some(ButtonEvent::Pressed(step))
            }
            Some(owner) if owner == index && !raw => {
                hw.sleep_ms(self.settle_ms);
                let settled = hw.read_button(index);
                self.channels[index].raw_level = settled;
                if settled {
                    return None;
                }

                self.owner = None;
                self.channels[index].debounced_pressed = false;
                trace!("button {} released", index);
                Some(ButtonEvent::Released(step))
            }
            _ => None,
        }
    }

    /// Index of the button currently owning a press.
    pub fn owner(&self) -> Option<usize> {
        self.owner
    }

    /// Debounce state of button `index`.
    pub fn channel(&self, index: usize) -> Option<&ButtonChannel> {
        self.channels.get(index)
    }

    /// Forgets every press, as after power-up.
    pub fn reset(&mut self) {
        self.channels = [ButtonChannel::default(); STEP_COUNT];
        self.owner = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::collections::VecDeque;
    use std::vec::Vec;

    /// Buttons fed from a per-channel queue of samples; an empty queue reads
    /// the held level.
    struct Pins {
        held: [bool; STEP_COUNT],
        samples: [VecDeque<bool>; STEP_COUNT],
        slept: Vec<u32>,
    }

    impl Pins {
        fn new() -> Self {
            Self {
                held: [false; STEP_COUNT],
                samples: Default::default(),
                slept: Vec::new(),
            }
        }
    }

    impl Buttons for Pins {
        fn read_button(&mut self, index: usize) -> bool {
            self.samples[index].pop_front().unwrap_or(self.held[index])
        }
    }

    impl Clock for Pins {
        fn sleep_ms(&mut self, ms: u32) {
            self.slept.push(ms);
        }
    }

    #[test]
    fn idle_button_produces_nothing_and_never_waits() {
        let mut pins = Pins::new();
        let mut debouncer = Debouncer::new(50);

        for index in 0..STEP_COUNT {
            assert_eq!(debouncer.poll(index, &mut pins), None);
        }
        assert!(pins.slept.is_empty());
    }

    #[test]
    fn stable_press_and_release_produce_one_event_each() {
        let mut pins = Pins::new();
        let mut debouncer = Debouncer::new(50);

        pins.held[2] = true;
        assert_eq!(
            debouncer.poll(2, &mut pins),
            Some(ButtonEvent::Pressed(Step::Yellow))
        );
        assert_eq!(debouncer.poll(2, &mut pins), None);
        assert_eq!(debouncer.owner(), Some(2));
        assert!(debouncer.channel(2).unwrap().debounced_pressed);

        pins.held[2] = false;
        assert_eq!(
            debouncer.poll(2, &mut pins),
            Some(ButtonEvent::Released(Step::Yellow))
        );
        assert_eq!(debouncer.poll(2, &mut pins), None);
        assert_eq!(debouncer.owner(), None);
        assert_eq!(pins.slept, [50, 50]);
    }

    #[test]
    fn glitch_shorter_than_settle_interval_is_rejected() {
        let mut pins = Pins::new();
        let mut debouncer = Debouncer::new(50);

        pins.samples[0].extend([true, false]);
        assert_eq!(debouncer.poll(0, &mut pins), None);
        assert_eq!(debouncer.owner(), None);
    }

    #[test]
    fn release_bounce_is_rejected() {
        let mut pins = Pins::new();
        let mut debouncer = Debouncer::new(50);

        pins.held[1] = true;
        assert!(debouncer.poll(1, &mut pins).is_some());

        pins.samples[1].extend([false, true]);
        assert_eq!(debouncer.poll(1, &mut pins), None);
        assert_eq!(debouncer.owner(), Some(1));
    }

    #[test]
    fn second_button_is_ignored_while_first_is_held() {
        let mut pins = Pins::new();
        let mut debouncer = Debouncer::new(50);

        pins.held[0] = true;
        pins.held[3] = true;
        assert_eq!(
            debouncer.poll(0, &mut pins),
            Some(ButtonEvent::Pressed(Step::Green))
        );
        assert_eq!(debouncer.poll(3, &mut pins), None);

        pins.held[0] = false;
        assert_eq!(
            debouncer.poll(0, &mut pins),
            Some(ButtonEvent::Released(Step::Green))
        );
        assert_eq!(
            debouncer.poll(3, &mut pins),
            Some(ButtonEvent::Pressed(Step::Blue))
        );
    }

    #[test]
    fn reset_drops_the_owner() {
        let mut pins = Pins::new();
        let mut debouncer = Debouncer::new(50);

        pins.held[0] = true;
        debouncer.poll(0, &mut pins);
        debouncer.reset();

        assert_eq!(debouncer.owner(), None);
        assert!(!debouncer.channel(0).unwrap().debounced_pressed);
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut pins = Pins::new();
        let mut debouncer = Debouncer::new(50);
        assert_eq!(debouncer.poll(STEP_COUNT, &mut pins), None);
    }
}
