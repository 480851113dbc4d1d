//! Core types shared by the engine components.

/// One of the four symbols a sequence is built from.
///
/// Each step owns a fixed LED and tone frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Green,
    Red,
    Yellow,
    Blue,
}

impl Step {
    /// All steps, ordered by LED/button index.
    pub const ALL: [Step; 4] = [Step::Green, Step::Red, Step::Yellow, Step::Blue];

    /// Returns the step wired to LED/button `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Maps a raw generator output onto a step.
    #[inline]
    pub fn from_random(value: u32) -> Self {
        Self::ALL[(value % Self::ALL.len() as u32) as usize]
    }

    /// LED and button index of this step.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Tone frequency in hertz.
    pub fn tone_hz(self) -> u32 {
        match self {
            Step::Green => 415,
            Step::Red => 310,
            Step::Yellow => 252,
            Step::Blue => 209,
        }
    }
}

/// Whether the device is showing the sequence or listening for buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    #[default]
    Playback,
    AwaitingInput,
}

/// Result of checking one released button against the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Validation {
    /// Right step, more steps of this level remain.
    Correct,
    /// Right step and the whole level has been reproduced.
    LevelComplete,
    /// Right step and the final level has been reproduced.
    GameWon,
    /// Wrong step.
    Mismatch,
    /// No input is expected right now; state unchanged.
    Ignored,
}

/// Debounced button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Pressed(Step),
    Released(Step),
}

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Sequence is being replayed, buttons are ignored.
    Playback,
    /// Player is reproducing the sequence.
    AwaitingInput,
    /// Round lost, penalty pending.
    GameOver,
    /// Round won, flourish pending.
    GameWon,
}

/// Notable things that happened during a single [`Game::tick`](crate::game::Game::tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameEvent {
    /// A step was appended and the sequence for `level` was played.
    LevelStarted { level: u8 },
    /// All steps of `level` were reproduced.
    LevelComplete { level: u8 },
    /// Wrong button. `step_index` is the position of the failed step.
    GameOver { level: u8, step_index: i16 },
    /// No button activity for too long.
    TimedOut { level: u8 },
    /// Final level reproduced.
    GameWon,
    /// Penalty or flourish finished, a fresh game starts.
    Reset,
}

/// Seed persistence failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageFault {
    /// Page erase did not complete.
    Erase,
    /// Word programming did not complete.
    Program,
    /// Read-back differs from the value written.
    Verify,
}

impl core::fmt::Display for StorageFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageFault::Erase => write!(f, "storage page erase failed"),
            StorageFault::Program => write!(f, "storage word program failed"),
            StorageFault::Verify => {
                write!(f, "stored word does not match the value written")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StorageFault {}
