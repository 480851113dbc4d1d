//! Game controller: the single cooperative main loop.
//!
//! Provides [`Game`], which owns the board, the generator, the game state and
//! the debouncer, and moves between the [`Phase`]s one loop iteration at a
//! time. Buttons are never sampled while the sequence is being played, and a
//! released button is validated exactly once.

use crate::STEP_COUNT;
use crate::config::{ConfigError, GameConfig, MAX_LEVELS};
use crate::debounce::Debouncer;
use crate::hal::{Console, FaultIndicator};
use crate::seed::{SeedStorage, SeedStore, step_generator};
use crate::sequence::GameState;
use crate::types::{ButtonEvent, GameEvent, Phase, Step, Validation};
use rand::rngs::SmallRng;
use rand::RngCore;

/// Buzz played on a lost round.
pub const LOSS_TONE_HZ: u32 = 42;

/// Length of the loss buzz.
pub const LOSS_TONE_MS: u32 = 1500;

/// Rounds of the win flourish.
pub const WIN_ROUNDS: u32 = 3;

/// Length of each note in the win flourish.
pub const WIN_NOTE_MS: u32 = 80;

/// Runs a complete game on a board.
///
/// # Type Parameters
/// * `C` - Board implementation
/// * `R` - Step generator, `SmallRng` when booted from a [`SeedStore`]
/// * `N` - Sequence capacity
pub struct Game<C: Console, R: RngCore = SmallRng, const N: usize = MAX_LEVELS> {
    console: C,
    rng: R,
    state: GameState<N>,
    debouncer: Debouncer,
    phase: Phase,
}

impl<C: Console + FaultIndicator, const N: usize> Game<C, SmallRng, N> {
    /// Boots the game: advances the persisted seed, seeds the generator and
    /// waits the startup pause.
    ///
    /// # Errors
    /// * `LevelsExceedCapacity` - `config` asks for more levels than `N`;
    ///   storage is left untouched
    pub fn boot<S: SeedStorage>(
        mut console: C,
        store: &mut SeedStore<S>,
        config: GameConfig,
    ) -> Result<Self, ConfigError> {
        config.check_capacity(N)?;

        let seed = store.load_and_advance_seed(&mut console);
        let rng = step_generator(seed);
        console.all_off();
        console.sleep_ms(config.startup_pause_ms());

        Self::new(console, rng, config)
    }
}

impl<C: Console, R: RngCore, const N: usize> Game<C, R, N> {
    /// Creates a game in the `Playback` phase of level 1.
    ///
    /// # Errors
    /// * `LevelsExceedCapacity` - `config` asks for more levels than `N`
    pub fn new(console: C, rng: R, config: GameConfig) -> Result<Self, ConfigError> {
        config.check_capacity(N)?;

        Ok(Self {
            console,
            rng,
            state: GameState::new(config),
            debouncer: Debouncer::new(config.settle_ms()),
            phase: Phase::Playback,
        })
    }

    /// Runs one main-loop iteration.
    pub fn tick(&mut self) -> Option<GameEvent> {
        match self.phase {
            Phase::Playback => self.play_next_level(),
            Phase::AwaitingInput => self.collect_input(),
            Phase::GameOver => {
                self.play_penalty();
                self.restart();
                Some(GameEvent::Reset)
            }
            Phase::GameWon => {
                self.play_flourish();
                self.restart();
                Some(GameEvent::Reset)
            }
        }
    }

    /// Runs the main loop forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }

    fn play_next_level(&mut self) -> Option<GameEvent> {
        let level = self.state.level();
        if let Err(e) = self.state.extend_and_play(&mut self.rng, &mut self.console) {
            warn!("level {} not started: {}", level, e);
            self.restart();
            return None;
        }

        info!(
            "level {} played at {} ms per step",
            level,
            self.state.tone_duration_ms()
        );
        self.state.clear_idle_loops();
        self.phase = Phase::AwaitingInput;
        Some(GameEvent::LevelStarted { level })
    }

    fn collect_input(&mut self) -> Option<GameEvent> {
        self.state.count_idle_loop();

        for index in 0..STEP_COUNT {
            match self.debouncer.poll(index, &mut self.console) {
                Some(ButtonEvent::Pressed(step)) => {
                    self.state.clear_idle_loops();
                    self.console.set_led(step.index(), true);
                    self.console.play_tone(step.tone_hz(), None);
                }
                Some(ButtonEvent::Released(step)) => {
                    self.console.set_led(step.index(), false);
                    self.console.stop_tone();
                    return self.handle_release(step);
                }
                None => {}
            }
        }

        if self.state.loop_count() >= self.state.config().max_idle_loops() {
            let level = self.state.level();
            info!("idle timeout at level {}", level);
            self.phase = Phase::GameOver;
            return Some(GameEvent::TimedOut { level });
        }

        None
    }

    fn handle_release(&mut self, step: Step) -> Option<GameEvent> {
        let outcome = self.state.validate_step(step);
        debug!("step {} -> {}", step.index(), outcome);

        match outcome {
            Validation::Correct | Validation::Ignored => None,
            Validation::LevelComplete => {
                let completed = self.state.level() - 1;
                self.console.sleep_ms(self.state.config().level_pause_ms());
                self.phase = Phase::Playback;
                Some(GameEvent::LevelComplete { level: completed })
            }
            Validation::GameWon => {
                info!("game won");
                self.phase = Phase::GameWon;
                Some(GameEvent::GameWon)
            }
            Validation::Mismatch => {
                let level = self.state.level();
                let step_index = self.state.current_step_index();
                info!("game over at level {}, step {}", level, step_index);
                self.phase = Phase::GameOver;
                Some(GameEvent::GameOver { level, step_index })
            }
        }
    }

    /// All LEDs on with a low buzz.
    fn play_penalty(&mut self) {
        for index in 0..STEP_COUNT {
            self.console.set_led(index, true);
        }
        self.console.play_tone(LOSS_TONE_HZ, Some(LOSS_TONE_MS));
        self.console.all_off();
        self.console.sleep_ms(self.state.config().level_pause_ms());
    }

    /// Runs each step's LED and tone around the board a few times.
    fn play_flourish(&mut self) {
        for _ in 0..WIN_ROUNDS {
            for step in Step::ALL {
                self.console.set_led(step.index(), true);
                self.console.play_tone(step.tone_hz(), Some(WIN_NOTE_MS));
                self.console.set_led(step.index(), false);
            }
        }
        self.console.all_off();
        self.console.sleep_ms(self.state.config().level_pause_ms());
    }

    fn restart(&mut self) {
        self.state.reset();
        self.debouncer.reset();
        self.console.all_off();
        self.phase = Phase::Playback;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState<N> {
        &self.state
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Mutable board access, e.g. for test scripting.
    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }
}
