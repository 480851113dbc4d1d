//! The growing step sequence and the rules for extending, replaying and
//! checking it.

use crate::config::{GameConfig, MAX_LEVELS};
use crate::hal::{Buzzer, Leds};
use crate::time::Clock;
use crate::types::{InputMode, Step, Validation};
use heapless::Vec;
use rand::RngCore;

/// Sequence errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// Sequence capacity exceeded.
    CapacityExceeded,
}

impl core::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SequenceError::CapacityExceeded => write!(f, "sequence capacity exceeded"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SequenceError {}

/// Append-only list of steps.
///
/// Steps never change once pushed; the only way to shrink a sequence is
/// [`clear`](Sequence::clear) on game reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence<const N: usize> {
    steps: Vec<Step, N>,
}

impl<const N: usize> Sequence<N> {
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends a step.
    ///
    /// # Errors
    /// * `CapacityExceeded` - the sequence already holds `N` steps
    pub fn push(&mut self, step: Step) -> Result<(), SequenceError> {
        self.steps
            .push(step)
            .map_err(|_| SequenceError::CapacityExceeded)
    }

    pub fn get(&self, index: usize) -> Option<Step> {
        self.steps.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn as_slice(&self) -> &[Step] {
        &self.steps
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

impl<const N: usize> Default for Sequence<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// All mutable state of one game.
///
/// `sequence[..level]` holds the steps revealed so far and
/// `current_step_index` is the last step reproduced in this level, `-1`
/// before the first press. During play it never exceeds `level - 1`.
///
/// # Type Parameters
/// * `N` - Sequence capacity, at least the configured number of levels
#[derive(Debug, Clone)]
pub struct GameState<const N: usize = MAX_LEVELS> {
    config: GameConfig,
    level: u8,
    sequence: Sequence<N>,
    current_step_index: i16,
    tone_duration_ms: u32,
    loop_count: u32,
    input_mode: InputMode,
}

impl<const N: usize> GameState<N> {
    /// Creates the state of a fresh game.
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            level: 1,
            sequence: Sequence::new(),
            current_step_index: -1,
            tone_duration_ms: config.initial_tone_ms(),
            loop_count: 0,
            input_mode: InputMode::Playback,
        }
    }

    /// Returns to level 1 with an empty sequence and the initial speed.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Draws one new step, appends it and replays the whole sequence.
    ///
    /// Leaves the state in [`InputMode::AwaitingInput`] with no steps
    /// reproduced yet.
    ///
    /// # Errors
    /// * `CapacityExceeded` - no room for another step; nothing is played
    pub fn extend_and_play<H, R>(&mut self, rng: &mut R, hw: &mut H) -> Result<(), SequenceError>
    where
        H: Leds + Buzzer + Clock + ?Sized,
        R: RngCore + ?Sized,
    {
        self.input_mode = InputMode::Playback;
        let step = Step::from_random(rng.next_u32());
        self.sequence.push(step)?;
        debug!("level {} appended {}", self.level, step.index());

        self.play_sequence(hw);

        self.current_step_index = -1;
        self.input_mode = InputMode::AwaitingInput;
        Ok(())
    }

    /// Plays every step so far: LED and tone on, hold, both off, gap.
    pub fn play_sequence<H>(&self, hw: &mut H)
    where
        H: Leds + Buzzer + Clock + ?Sized,
    {
        for step in self.sequence.as_slice() {
            hw.set_led(step.index(), true);
            hw.play_tone(step.tone_hz(), None);
            hw.sleep_ms(self.tone_duration_ms);
            hw.set_led(step.index(), false);
            hw.stop_tone();
            hw.sleep_ms(self.config.step_gap_ms());
        }
    }

    /// Checks a released button against the next expected step.
    ///
    /// The step index advances before the comparison, so after a
    /// [`Validation::Mismatch`] it points at the step the player got wrong.
    /// On a completed level the level advances, the speed-up is applied and
    /// the state returns to [`InputMode::Playback`].
    pub fn validate_step(&mut self, pressed: Step) -> Validation {
        if self.input_mode != InputMode::AwaitingInput {
            return Validation::Ignored;
        }

        let next = self.current_step_index + 1;
        let Some(expected) = self.sequence.get(next as usize) else {
            return Validation::Ignored;
        };
        self.current_step_index = next;

        if expected != pressed {
            return Validation::Mismatch;
        }

        if next < i16::from(self.level) - 1 {
            return Validation::Correct;
        }

        self.input_mode = InputMode::Playback;
        if self.level >= self.config.max_levels() {
            return Validation::GameWon;
        }

        self.level += 1;
        self.current_step_index = -1;
        self.apply_speed_up();
        Validation::LevelComplete
    }

    /// Shortens the tone at the first level of every level group.
    ///
    /// Entering group `g` (levels `g * per + 1`) removes `g * step` ms,
    /// never going below the configured minimum.
    fn apply_speed_up(&mut self) {
        let per = self.config.levels_per_speedup();
        let reached = self.level - 1;
        if reached % per != 0 {
            return;
        }

        let group = u32::from(reached / per);
        self.tone_duration_ms = self
            .tone_duration_ms
            .saturating_sub(self.config.speed_step_ms().saturating_mul(group))
            .max(self.config.min_tone_ms());
        info!("level {}: tone {} ms", self.level, self.tone_duration_ms);
    }

    pub(crate) fn count_idle_loop(&mut self) {
        self.loop_count = self.loop_count.saturating_add(1);
    }

    pub(crate) fn clear_idle_loops(&mut self) {
        self.loop_count = 0;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn sequence(&self) -> &Sequence<N> {
        &self.sequence
    }

    pub fn current_step_index(&self) -> i16 {
        self.current_step_index
    }

    pub fn tone_duration_ms(&self) -> u32 {
        self.tone_duration_ms
    }

    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }
}

impl<const N: usize> Default for GameState<N> {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
