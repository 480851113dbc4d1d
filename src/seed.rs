//! Power-cycle persistent generator seed.
//!
//! A single 32-bit word in non-volatile storage is read at boot, advanced
//! through the generator and written back, so that every power cycle starts
//! a different pseudo-random stream.
//!
//! Every boot costs exactly one erase and one program cycle of the storage
//! page. Nothing else in the engine writes to storage.

use crate::hal::FaultIndicator;
use crate::types::StorageFault;
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

/// Address of the seed word: first word of the last 1 KiB page of a 32 KiB
/// flash.
pub const SEED_ADDRESS: u32 = 0x0800_7C00;

/// Word-addressed non-volatile storage.
pub trait SeedStorage {
    /// Reads the word at `addr`.
    ///
    /// On a device that never stored a seed the value is whatever the erased
    /// or factory state holds.
    fn read_word(&mut self, addr: u32) -> u32;

    /// Erases the page containing `addr` and programs `value` at `addr`.
    fn erase_and_program(&mut self, addr: u32, value: u32) -> Result<(), StorageFault>;
}

/// Owns the seed slot and advances it once per boot.
pub struct SeedStore<S: SeedStorage> {
    storage: S,
    address: u32,
}

impl<S: SeedStorage> SeedStore<S> {
    /// Creates a store using the default [`SEED_ADDRESS`].
    pub fn new(storage: S) -> Self {
        Self::with_address(storage, SEED_ADDRESS)
    }

    /// Creates a store for a board with a different flash layout.
    pub fn with_address(storage: S, address: u32) -> Self {
        Self { storage, address }
    }

    /// Reads the stored seed, derives the next one and persists it.
    ///
    /// Returns the next seed, which the caller uses to seed its generator.
    /// Storage faults are not propagated: the fault indicator is switched on
    /// and the derived seed is returned regardless.
    pub fn load_and_advance_seed<F: FaultIndicator + ?Sized>(&mut self, fault: &mut F) -> u32 {
        let stored = self.storage.read_word(self.address);
        let next = derive_next_seed(stored);
        info!("seed loaded: {=u32:#x}, next: {=u32:#x}", stored, next);

        if let Err(e) = self.persist(next) {
            warn!("seed not persisted: {}", e);
            fault.set_fault_indicator(true);
        }

        next
    }

    fn persist(&mut self, value: u32) -> Result<(), StorageFault> {
        self.storage.erase_and_program(self.address, value)?;

        if self.storage.read_word(self.address) != value {
            return Err(StorageFault::Verify);
        }
        Ok(())
    }

    /// Returns the underlying storage.
    pub fn into_inner(self) -> S {
        self.storage
    }
}

/// Seeds a generator with `stored` and takes its first output as the next seed.
///
/// One draw per boot. Consecutive boots therefore walk a chain
/// `s, f(s), f(f(s)), ...` where `f` is this function.
pub fn derive_next_seed(stored: u32) -> u32 {
    SmallRng::seed_from_u64(u64::from(stored)).next_u32()
}

/// Low half of the step generator's 64-bit seed.
const STEP_STREAM: u64 = 0x5EED;

/// Step generator for a game booted with `seed`.
///
/// The seed fills the high half of the generator state, so the step stream
/// is separate from the [`derive_next_seed`] chain and the first step drawn
/// is not the seed stored for the next boot.
pub fn step_generator(seed: u32) -> SmallRng {
    SmallRng::seed_from_u64((u64::from(seed) << 32) | STEP_STREAM)
}
