#![no_std]
#![no_main]

use cortex_m_rt::entry;
use panic_halt as _;
use rtt_target::{rprintln, rtt_init_print};

use simon_engine::{Game, GameConfig, SeedStore};

mod hardware_setup;

/// SysTick interrupt handler - called every 1ms
#[cortex_m_rt::exception]
fn SysTick() {
    stm32f0_simon::time_source::tick();
}

#[entry]
fn main() -> ! {
    rtt_init_print!();
    rprintln!("=== Simon ===");
    rprintln!("Starting initialization...");

    let hw = hardware_setup::init_hardware();
    rprintln!("Hardware initialized successfully");

    let mut store = SeedStore::new(hw.storage);
    let mut game: Game<_> = match Game::boot(hw.board, &mut store, GameConfig::default()) {
        Ok(game) => game,
        Err(err) => {
            rprintln!("Invalid game configuration: {}", err);
            loop {
                cortex_m::asm::wfi();
            }
        }
    };

    rprintln!("=== System Ready ===");
    rprintln!("Watch the lights, then repeat them on the buttons.");

    // Run the game loop (never returns)
    game.run()
}
