use embedded_hal::PwmPin;
use embedded_hal::digital::v2::{InputPin, OutputPin};
use simon_engine::{Buttons, Buzzer, Clock, FaultIndicator, Leds, STEP_COUNT};
use stm32f0xx_hal::gpio::{Input, Output, Pin, PullDown, PushPull};
use stm32f0xx_hal::pac;
use stm32f0xx_hal::pwm::{C3, PwmChannels};

use crate::time_source::SysTickClock;

/// Timer tick rate after the prescaler
const TIMER_TICK_HZ: u32 = 1_000_000;

/// PWM buzzer on TIM1 channel 3
///
/// The HAL fixes the PWM frequency at construction, so each tone rewrites the
/// auto-reload register directly and keeps a 50% duty cycle.
pub struct PwmBuzzer {
    channel: PwmChannels<pac::TIM1, C3>,
    timer_clock_hz: u32,
}

impl PwmBuzzer {
    pub fn new(mut channel: PwmChannels<pac::TIM1, C3>, timer_clock_hz: u32) -> Self {
        channel.disable();
        Self {
            channel,
            timer_clock_hz,
        }
    }

    fn set_frequency(&mut self, freq_hz: u32) {
        let prescaler = (self.timer_clock_hz / TIMER_TICK_HZ).saturating_sub(1) as u16;
        let reload = (TIMER_TICK_HZ / freq_hz.max(16)).saturating_sub(1) as u16;

        // TIM1 is owned by `channel`; only PSC and ARR are touched here.
        let tim = unsafe { &*pac::TIM1::ptr() };
        tim.psc.write(|w| w.psc().bits(prescaler));
        tim.arr.write(|w| unsafe { w.arr().bits(reload) });
        tim.egr.write(|w| w.ug().set_bit());

        let max = self.channel.get_max_duty();
        self.channel.set_duty(max / 2);
    }
}

/// Board wiring for the game
///
/// - LEDs: PA0-PA3 (active high)
/// - Buttons: PA4-PA7 (pull-down, high when pressed)
/// - Buzzer: PA10 (TIM1_CH3)
/// - Fault LED: PB1
pub struct Board {
    leds: [Pin<Output<PushPull>>; STEP_COUNT],
    buttons: [Pin<Input<PullDown>>; STEP_COUNT],
    buzzer: PwmBuzzer,
    fault_led: Pin<Output<PushPull>>,
    clock: SysTickClock,
}

impl Board {
    pub fn new(
        leds: [Pin<Output<PushPull>>; STEP_COUNT],
        buttons: [Pin<Input<PullDown>>; STEP_COUNT],
        buzzer: PwmBuzzer,
        fault_led: Pin<Output<PushPull>>,
    ) -> Self {
        Self {
            leds,
            buttons,
            buzzer,
            fault_led,
            clock: SysTickClock::new(),
        }
    }
}

impl Leds for Board {
    fn set_led(&mut self, index: usize, on: bool) {
        if let Some(led) = self.leds.get_mut(index) {
            let _ = if on { led.set_high() } else { led.set_low() };
        }
    }
}

impl Buttons for Board {
    fn read_button(&mut self, index: usize) -> bool {
        self.buttons
            .get(index)
            .and_then(|button| button.is_high().ok())
            .unwrap_or(false)
    }
}

impl Buzzer for Board {
    fn play_tone(&mut self, freq_hz: u32, duration_ms: Option<u32>) {
        self.buzzer.set_frequency(freq_hz);
        self.buzzer.channel.enable();

        if let Some(ms) = duration_ms {
            self.clock.sleep_ms(ms);
            self.stop_tone();
        }
    }

    fn stop_tone(&mut self) {
        self.buzzer.channel.disable();
    }
}

impl Clock for Board {
    fn sleep_ms(&mut self, ms: u32) {
        self.clock.sleep_ms(ms);
    }
}

impl FaultIndicator for Board {
    fn set_fault_indicator(&mut self, on: bool) {
        let _ = if on {
            self.fault_led.set_high()
        } else {
            self.fault_led.set_low()
        };
    }
}
