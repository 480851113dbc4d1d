#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Game`**: Single-threaded main loop; call `tick()` repeatedly or `run()` forever
//! - **`GameState`**: Level, revealed sequence, reproduced steps and current speed
//! - **`Step`**: One of four LED + tone pairs a sequence is made of
//! - **`Debouncer`**: Turns raw button levels into press/release events, one owner at a time
//! - **`SeedStore`**: Advances a persisted 32-bit seed once per power cycle
//! - **`GameConfig`**: Timing and difficulty, validated by its builder
//! - **`Leds`**, **`Buttons`**, **`Buzzer`**, **`FaultIndicator`**: Traits to implement for your board
//! - **`Clock`**: Trait to implement for blocking delays
//! - **`SeedStorage`**: Trait to implement for your non-volatile memory
//!
//! Every delay is a blocking sleep and nothing runs concurrently with the
//! loop, so no part of the engine needs interrupts or an executor.

#[macro_use]
mod fmt;

pub mod config;
pub mod debounce;
pub mod game;
pub mod hal;
pub mod seed;
pub mod sequence;
pub mod time;
pub mod types;

pub use config::{
    ConfigError, GameConfig, GameConfigBuilder, INCREASE_SPEED_LEVELS, INITIAL_TONE_DURATION,
    MAX_LEVELS, MAX_LOOPS, MAX_SPEED,
};
pub use debounce::{ButtonChannel, Debouncer};
pub use game::Game;
pub use hal::{Buttons, Buzzer, Console, FaultIndicator, Leds};
pub use seed::{SEED_ADDRESS, SeedStorage, SeedStore};
pub use sequence::{GameState, Sequence, SequenceError};
pub use time::Clock;
pub use types::{ButtonEvent, GameEvent, InputMode, Phase, Step, StorageFault, Validation};

/// Number of LED/button/tone channels.
pub const STEP_COUNT: usize = Step::ALL.len();
