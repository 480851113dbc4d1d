//! Game timing and difficulty configuration.

/// Levels to reproduce before the game is won.
pub const MAX_LEVELS: usize = 20;

/// Tone duration at level 1, in milliseconds.
pub const INITIAL_TONE_DURATION: u32 = 500;

/// Shortest tone duration the speed-up may reach, in milliseconds.
pub const MAX_SPEED: u32 = 200;

/// Speed-up applied per level group, multiplied by the group number.
pub const SPEED_STEP_MS: u32 = 20;

/// Number of levels between two speed-ups.
pub const INCREASE_SPEED_LEVELS: u8 = 3;

/// Debounce settle interval.
pub const SETTLE_MS: u32 = 50;

/// Silence between two played steps.
pub const STEP_GAP_MS: u32 = 250;

/// Pause between a completed level and the next playback.
pub const LEVEL_PAUSE_MS: u32 = 500;

/// Pause after boot before the first playback.
pub const STARTUP_PAUSE_MS: u32 = 2000;

/// Core clock of the reference board (HSI at 4 MHz).
pub const CORE_CLOCK_HZ: u32 = 4_000_000;

/// Idle loop iterations before the player is considered gone.
///
/// One idle iteration polls four buttons, roughly 400 core cycles, so this
/// comes to about four seconds of silence at 4 MHz.
pub const MAX_LOOPS: u32 = CORE_CLOCK_HZ / 100;

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `max_levels` is zero.
    NoLevels,
    /// `max_levels` does not fit the sequence capacity.
    LevelsExceedCapacity { levels: u8, capacity: usize },
    /// Minimum tone duration is zero or above the initial duration.
    InvalidToneRange,
    /// `levels_per_speedup` is zero.
    ZeroSpeedupInterval,
    /// `max_idle_loops` is zero.
    ZeroIdleTimeout,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::NoLevels => write!(f, "at least one level is required"),
            ConfigError::LevelsExceedCapacity { levels, capacity } => {
                write!(
                    f,
                    "{} levels do not fit a sequence capacity of {}",
                    levels, capacity
                )
            }
            ConfigError::InvalidToneRange => {
                write!(
                    f,
                    "minimum tone duration must be non-zero and not above the initial duration"
                )
            }
            ConfigError::ZeroSpeedupInterval => {
                write!(f, "speed-up interval must be at least one level")
            }
            ConfigError::ZeroIdleTimeout => write!(f, "idle timeout must be non-zero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Validated game configuration.
///
/// `Default` yields the classic timing; use [`GameConfig::builder`] to tune it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameConfig {
    max_levels: u8,
    initial_tone_ms: u32,
    min_tone_ms: u32,
    speed_step_ms: u32,
    levels_per_speedup: u8,
    settle_ms: u32,
    step_gap_ms: u32,
    level_pause_ms: u32,
    startup_pause_ms: u32,
    max_idle_loops: u32,
}

impl GameConfig {
    /// Starts a builder pre-filled with the defaults.
    pub fn builder() -> GameConfigBuilder {
        GameConfigBuilder::new()
    }

    pub fn max_levels(&self) -> u8 {
        self.max_levels
    }

    pub fn initial_tone_ms(&self) -> u32 {
        self.initial_tone_ms
    }

    pub fn min_tone_ms(&self) -> u32 {
        self.min_tone_ms
    }

    pub fn speed_step_ms(&self) -> u32 {
        self.speed_step_ms
    }

    pub fn levels_per_speedup(&self) -> u8 {
        self.levels_per_speedup
    }

    pub fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    pub fn step_gap_ms(&self) -> u32 {
        self.step_gap_ms
    }

    pub fn level_pause_ms(&self) -> u32 {
        self.level_pause_ms
    }

    pub fn startup_pause_ms(&self) -> u32 {
        self.startup_pause_ms
    }

    pub fn max_idle_loops(&self) -> u32 {
        self.max_idle_loops
    }

    /// Checks that `max_levels` fits a sequence of capacity `capacity`.
    pub(crate) fn check_capacity(&self, capacity: usize) -> Result<(), ConfigError> {
        if self.max_levels as usize > capacity {
            return Err(ConfigError::LevelsExceedCapacity {
                levels: self.max_levels,
                capacity,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_levels: MAX_LEVELS as u8,
            initial_tone_ms: INITIAL_TONE_DURATION,
            min_tone_ms: MAX_SPEED,
            speed_step_ms: SPEED_STEP_MS,
            levels_per_speedup: INCREASE_SPEED_LEVELS,
            settle_ms: SETTLE_MS,
            step_gap_ms: STEP_GAP_MS,
            level_pause_ms: LEVEL_PAUSE_MS,
            startup_pause_ms: STARTUP_PAUSE_MS,
            max_idle_loops: MAX_LOOPS,
        }
    }
}

/// Builder for [`GameConfig`].
#[derive(Debug, Clone, Copy)]
pub struct GameConfigBuilder {
    config: GameConfig,
}

impl GameConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
        }
    }

    /// Number of levels to win.
    pub fn max_levels(mut self, levels: u8) -> Self {
        self.config.max_levels = levels;
        self
    }

    /// Tone duration at level 1.
    pub fn initial_tone_ms(mut self, ms: u32) -> Self {
        self.config.initial_tone_ms = ms;
        self
    }

    /// Floor for the tone duration.
    pub fn min_tone_ms(mut self, ms: u32) -> Self {
        self.config.min_tone_ms = ms;
        self
    }

    pub fn speed_step_ms(mut self, ms: u32) -> Self {
        self.config.speed_step_ms = ms;
        self
    }

    pub fn levels_per_speedup(mut self, levels: u8) -> Self {
        self.config.levels_per_speedup = levels;
        self
    }

    pub fn settle_ms(mut self, ms: u32) -> Self {
        self.config.settle_ms = ms;
        self
    }

    pub fn step_gap_ms(mut self, ms: u32) -> Self {
        self.config.step_gap_ms = ms;
        self
    }

    pub fn level_pause_ms(mut self, ms: u32) -> Self {
        self.config.level_pause_ms = ms;
        self
    }

    pub fn startup_pause_ms(mut self, ms: u32) -> Self {
        self.config.startup_pause_ms = ms;
        self
    }

    /// Idle loop iterations before the round is lost.
    pub fn max_idle_loops(mut self, loops: u32) -> Self {
        self.config.max_idle_loops = loops;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `NoLevels` - `max_levels` is zero
    /// * `InvalidToneRange` - `min_tone_ms` is zero or above `initial_tone_ms`
    /// * `ZeroSpeedupInterval` - `levels_per_speedup` is zero
    /// * `ZeroIdleTimeout` - `max_idle_loops` is zero
    pub fn build(self) -> Result<GameConfig, ConfigError> {
        let config = self.config;

        if config.max_levels == 0 {
            return Err(ConfigError::NoLevels);
        }
        if config.min_tone_ms == 0 || config.min_tone_ms > config.initial_tone_ms {
            return Err(ConfigError::InvalidToneRange);
        }
        if config.levels_per_speedup == 0 {
            return Err(ConfigError::ZeroSpeedupInterval);
        }
        if config.max_idle_loops == 0 {
            return Err(ConfigError::ZeroIdleTimeout);
        }

        Ok(config)
    }
}

impl Default for GameConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_classic_timing() {
        let config = GameConfig::default();
        assert_eq!(config.max_levels(), 20);
        assert_eq!(config.initial_tone_ms(), 500);
        assert_eq!(config.min_tone_ms(), 200);
        assert_eq!(config.levels_per_speedup(), 3);
        assert_eq!(config.max_idle_loops(), MAX_LOOPS);
    }

    #[test]
    fn builder_without_changes_equals_default() {
        assert_eq!(GameConfig::builder().build(), Ok(GameConfig::default()));
    }

    #[test]
    fn builder_rejects_inverted_tone_range() {
        let result = GameConfig::builder()
            .initial_tone_ms(150)
            .min_tone_ms(200)
            .build();
        assert_eq!(result, Err(ConfigError::InvalidToneRange));
    }

    #[test]
    fn builder_rejects_zero_values() {
        assert_eq!(
            GameConfig::builder().max_levels(0).build(),
            Err(ConfigError::NoLevels)
        );
        assert_eq!(
            GameConfig::builder().min_tone_ms(0).build(),
            Err(ConfigError::InvalidToneRange)
        );
        assert_eq!(
            GameConfig::builder().levels_per_speedup(0).build(),
            Err(ConfigError::ZeroSpeedupInterval)
        );
        assert_eq!(
            GameConfig::builder().max_idle_loops(0).build(),
            Err(ConfigError::ZeroIdleTimeout)
        );
    }

    #[test]
    fn capacity_check_rejects_oversized_level_count() {
        let config = GameConfig::builder().max_levels(8).build().unwrap();
        assert!(config.check_capacity(8).is_ok());
        assert_eq!(
            config.check_capacity(4),
            Err(ConfigError::LevelsExceedCapacity {
                levels: 8,
                capacity: 4
            })
        );
    }
}
