//! Shared test infrastructure for simon-engine integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::collections::VecDeque;

use rand::RngCore;
use simon_engine::{
    Buttons, Buzzer, Clock, FaultIndicator, Game, GameEvent, Leds, STEP_COUNT, SeedStorage, Step,
    StorageFault,
};

// ============================================================================
// Mock Board
// ============================================================================

/// Output calls recorded by the mock board, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Led(usize, bool),
    Tone(u32, Option<u32>),
    Stop,
    Sleep(u32),
    Fault(bool),
}

/// Mock board with scripted buttons and recorded outputs
///
/// Each button reads from its bounce queue first and falls back to the held
/// level once the queue is empty.
pub struct MockConsole {
    pub held: [bool; STEP_COUNT],
    pub bounce: [VecDeque<bool>; STEP_COUNT],
    pub leds: [bool; STEP_COUNT],
    pub tone: Option<u32>,
    pub fault: bool,
    pub outputs: Vec<Output>,
    pub button_reads: usize,
    pub elapsed_ms: u64,
}

impl MockConsole {
    pub fn new() -> Self {
        Self {
            held: [false; STEP_COUNT],
            bounce: Default::default(),
            leds: [false; STEP_COUNT],
            tone: None,
            fault: false,
            outputs: Vec::new(),
            button_reads: 0,
            elapsed_ms: 0,
        }
    }

    /// LEDs switched on since the output log was last cleared
    pub fn lit_steps(&self) -> Vec<Step> {
        self.outputs
            .iter()
            .filter_map(|o| match o {
                Output::Led(index, true) => Step::from_index(*index),
                _ => None,
            })
            .collect()
    }

    pub fn slept(&self) -> Vec<u32> {
        self.outputs
            .iter()
            .filter_map(|o| match o {
                Output::Sleep(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }
}

impl Leds for MockConsole {
    fn set_led(&mut self, index: usize, on: bool) {
        self.leds[index] = on;
        self.outputs.push(Output::Led(index, on));
    }
}

impl Buttons for MockConsole {
    fn read_button(&mut self, index: usize) -> bool {
        self.button_reads += 1;
        self.bounce[index].pop_front().unwrap_or(self.held[index])
    }
}

impl Buzzer for MockConsole {
    fn play_tone(&mut self, freq_hz: u32, duration_ms: Option<u32>) {
        self.outputs.push(Output::Tone(freq_hz, duration_ms));
        match duration_ms {
            Some(ms) => {
                self.elapsed_ms += u64::from(ms);
                self.tone = None;
            }
            None => self.tone = Some(freq_hz),
        }
    }

    fn stop_tone(&mut self) {
        self.tone = None;
        self.outputs.push(Output::Stop);
    }
}

impl Clock for MockConsole {
    fn sleep_ms(&mut self, ms: u32) {
        self.elapsed_ms += u64::from(ms);
        self.outputs.push(Output::Sleep(ms));
    }
}

impl FaultIndicator for MockConsole {
    fn set_fault_indicator(&mut self, on: bool) {
        self.fault = on;
        self.outputs.push(Output::Fault(on));
    }
}

// ============================================================================
// Mock Generator
// ============================================================================

/// Generator cycling through a fixed list of raw values
pub struct ScriptedRng {
    values: Vec<u32>,
    at: usize,
}

impl ScriptedRng {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.to_vec(),
            at: 0,
        }
    }

    /// Generator producing exactly these steps, in order
    pub fn steps(steps: &[Step]) -> Self {
        let values: Vec<u32> = steps.iter().map(|s| s.index() as u32).collect();
        Self::new(&values)
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let value = self.values[self.at % self.values.len()];
        self.at += 1;
        value
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

// ============================================================================
// Mock Storage
// ============================================================================

/// Single-page flash emulation with fault injection
pub struct MemoryFlash {
    pub word: u32,
    pub erase_cycles: u32,
    pub fail: Option<StorageFault>,
    /// Value actually stored on program, to emulate a bad cell
    pub corrupt: Option<u32>,
}

impl MemoryFlash {
    pub fn new(word: u32) -> Self {
        Self {
            word,
            erase_cycles: 0,
            fail: None,
            corrupt: None,
        }
    }
}

impl SeedStorage for MemoryFlash {
    fn read_word(&mut self, _addr: u32) -> u32 {
        self.word
    }

    fn erase_and_program(&mut self, _addr: u32, value: u32) -> Result<(), StorageFault> {
        self.erase_cycles += 1;
        if let Some(fault) = self.fail {
            return Err(fault);
        }
        self.word = self.corrupt.unwrap_or(value);
        Ok(())
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Presses and releases the button of `step`; returns the event of the release tick
pub fn tap<R: RngCore, const N: usize>(
    game: &mut Game<MockConsole, R, N>,
    step: Step,
) -> Option<GameEvent> {
    game.console_mut().held[step.index()] = true;
    assert_eq!(game.tick(), None, "press must not produce a game event");
    game.console_mut().held[step.index()] = false;
    game.tick()
}

/// Reproduces the whole revealed sequence; returns the event of the last release
pub fn play_back_sequence<R: RngCore, const N: usize>(
    game: &mut Game<MockConsole, R, N>,
) -> Option<GameEvent> {
    let steps: Vec<Step> = game.state().sequence().as_slice().to_vec();
    let mut last = None;
    for step in steps {
        last = tap(game, step);
    }
    last
}

/// Any step other than `step`
pub fn other_than(step: Step) -> Step {
    Step::from_index((step.index() + 1) % STEP_COUNT).unwrap()
}
