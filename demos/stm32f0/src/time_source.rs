use core::cell::Cell;
use critical_section::Mutex;
use simon_engine::Clock;

/// Global millisecond counter incremented by SysTick interrupt
///
/// This counter is automatically incremented every millisecond by the SysTick
/// interrupt handler. It wraps after ~49.7 days of continuous operation.
static MILLIS_COUNTER: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

/// Increments the global millisecond counter.
///
/// This function should be called from the SysTick interrupt handler every 1ms.
pub fn tick() {
    critical_section::with(|cs| {
        let counter = MILLIS_COUNTER.borrow(cs);
        let current = counter.get();
        counter.set(current.wrapping_add(1));
    });
}

/// Milliseconds since startup
pub fn millis() -> u32 {
    critical_section::with(|cs| MILLIS_COUNTER.borrow(cs).get())
}

/// Blocking delay on top of the SysTick millisecond counter
///
/// Sleeps with WFI between ticks instead of spinning on a cycle count, so the
/// delay does not depend on the core clock or on optimization level.
pub struct SysTickClock;

impl SysTickClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SysTickClock {
    fn sleep_ms(&mut self, ms: u32) {
        let start = millis();
        while millis().wrapping_sub(start) < ms {
            cortex_m::asm::wfi();
        }
    }
}
