use cortex_m::peripheral::SYST;
use rtt_target::rprintln;
use stm32f0xx_hal::{
    gpio::{gpioa, Floating, Input},
    pac,
    prelude::*,
    pwm,
    time::Hertz,
};

use stm32f0_simon::board::{Board, PwmBuzzer};
use stm32f0_simon::flash_storage::FlashSeedStorage;

/// Core clock: the 8 MHz HSI divided down to the game's 4 MHz
pub const SYSCLK_HZ: u32 = simon_engine::config::CORE_CLOCK_HZ;

/// Container for all initialized hardware peripherals
pub struct HardwareContext {
    pub board: Board,
    pub storage: FlashSeedStorage,
}

/// Initialize all hardware peripherals
///
/// - System clock configuration (4 MHz)
/// - SysTick timer setup (1ms interrupts)
/// - LED, button and fault LED pins
/// - Buzzer PWM on TIM1
///
/// # Returns
/// A `HardwareContext` with the game board and the seed flash
pub fn init_hardware() -> HardwareContext {
    let mut dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    let mut rcc = configure_clock(&mut dp.FLASH, dp.RCC);
    configure_systick(&rcc, &mut cp.SYST);

    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpiob = dp.GPIOB.split(&mut rcc);

    let board = cortex_m::interrupt::free(|cs| {
        let leds = [
            gpioa.pa0.into_push_pull_output(cs).downgrade(),
            gpioa.pa1.into_push_pull_output(cs).downgrade(),
            gpioa.pa2.into_push_pull_output(cs).downgrade(),
            gpioa.pa3.into_push_pull_output(cs).downgrade(),
        ];
        let buttons = [
            gpioa.pa4.into_pull_down_input(cs).downgrade(),
            gpioa.pa5.into_pull_down_input(cs).downgrade(),
            gpioa.pa6.into_pull_down_input(cs).downgrade(),
            gpioa.pa7.into_pull_down_input(cs).downgrade(),
        ];
        let fault_led = gpiob.pb1.into_push_pull_output(cs).downgrade();
        let buzzer = setup_buzzer(gpioa.pa10, dp.TIM1, &mut rcc, cs);

        Board::new(leds, buttons, buzzer, fault_led)
    });
    rprintln!("LEDs on PA0-PA3, buttons on PA4-PA7, fault LED on PB1");

    HardwareContext {
        board,
        storage: FlashSeedStorage::new(dp.FLASH),
    }
}

/// Configure the system clock to the game's 4 MHz
///
/// # Returns
/// The configured RCC (Reset and Clock Control) peripheral
fn configure_clock(flash: &mut pac::FLASH, rcc: pac::RCC) -> stm32f0xx_hal::rcc::Rcc {
    let rcc = rcc.configure().sysclk(Hertz(SYSCLK_HZ)).freeze(flash);

    let sysclk_freq = rcc.clocks.sysclk();
    rprintln!("System clock configured: {} Hz", sysclk_freq.0);

    rcc
}

/// Configure SysTick timer for 1ms interrupts
///
/// The SysTick interrupt handler increments a global millisecond counter
/// used by every blocking delay of the game.
fn configure_systick(rcc: &stm32f0xx_hal::rcc::Rcc, syst: &mut SYST) {
    let sysclk_freq = rcc.clocks.sysclk();

    syst.set_clock_source(cortex_m::peripheral::syst::SystClkSource::Core);
    syst.set_reload((sysclk_freq.0 / 1_000) - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();

    rprintln!("SysTick configured for 1ms interrupts");
}

/// Configure the buzzer on PA10 (TIM1_CH3, AF2)
fn setup_buzzer(
    pa10: gpioa::PA10<Input<Floating>>,
    tim1: pac::TIM1,
    rcc: &mut stm32f0xx_hal::rcc::Rcc,
    cs: &cortex_m::interrupt::CriticalSection,
) -> PwmBuzzer {
    let pin = pa10.into_alternate_af2(cs);
    let channel = pwm::tim1(tim1, pin, rcc, Hertz(1_000));
    let timer_clock = rcc.clocks.pclk().0;

    rprintln!("Buzzer configured on TIM1 CH3 (PA10)");
    PwmBuzzer::new(channel, timer_clock)
}
