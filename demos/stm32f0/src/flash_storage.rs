use simon_engine::{SeedStorage, StorageFault};
use stm32f0xx_hal::pac;

const KEY1: u32 = 0x4567_0123;
const KEY2: u32 = 0xCDEF_89AB;

/// Seed storage in internal flash
///
/// Erases one page and programs one word per call. The flash is unlocked only
/// for the duration of the operation.
pub struct FlashSeedStorage {
    flash: pac::FLASH,
}

impl FlashSeedStorage {
    pub fn new(flash: pac::FLASH) -> Self {
        Self { flash }
    }

    fn unlock(&mut self) {
        if self.flash.cr.read().lock().bit_is_set() {
            self.flash.keyr.write(|w| unsafe { w.fkeyr().bits(KEY1) });
            self.flash.keyr.write(|w| unsafe { w.fkeyr().bits(KEY2) });
        }
    }

    fn lock(&mut self) {
        self.flash.cr.modify(|_, w| w.lock().set_bit());
    }

    /// Waits for the current operation and checks its end-of-operation flag.
    fn wait_complete(&mut self) -> bool {
        while self.flash.sr.read().bsy().bit_is_set() {}

        let sr = self.flash.sr.read();
        let complete = sr.eop().bit_is_set() && sr.pgerr().bit_is_clear() && sr.wrprt().bit_is_clear();
        // Status bits are cleared by writing one.
        self.flash
            .sr
            .write(|w| w.eop().set_bit().pgerr().set_bit().wrprt().set_bit());
        complete
    }

    fn erase_page(&mut self, addr: u32) -> Result<(), StorageFault> {
        self.flash.cr.modify(|_, w| w.per().set_bit());
        self.flash.ar.write(|w| unsafe { w.far().bits(addr) });
        self.flash.cr.modify(|_, w| w.strt().set_bit());
        let complete = self.wait_complete();
        self.flash.cr.modify(|_, w| w.per().clear_bit());

        if complete { Ok(()) } else { Err(StorageFault::Erase) }
    }

    /// Programs a word as two half-words, low half first.
    fn program_word(&mut self, addr: u32, value: u32) -> Result<(), StorageFault> {
        self.flash.cr.modify(|_, w| w.pg().set_bit());

        let mut complete = true;
        for (offset, half) in [(0u32, value as u16), (2, (value >> 16) as u16)] {
            unsafe { core::ptr::write_volatile((addr + offset) as *mut u16, half) };
            complete &= self.wait_complete();
        }
        self.flash.cr.modify(|_, w| w.pg().clear_bit());

        if complete { Ok(()) } else { Err(StorageFault::Program) }
    }
}

impl SeedStorage for FlashSeedStorage {
    fn read_word(&mut self, addr: u32) -> u32 {
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    fn erase_and_program(&mut self, addr: u32, value: u32) -> Result<(), StorageFault> {
        self.unlock();
        let result = self
            .erase_page(addr)
            .and_then(|_| self.program_word(addr, value));
        self.lock();
        result
    }
}
