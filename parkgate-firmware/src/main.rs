//! Parkgate - Parking Gate Controller Firmware
//!
//! Main firmware binary for STM32F103C8 ("Blue Pill") boards. Two HC-SR04
//! sensors watch the entry and exit lanes, two servos lift the barriers, a
//! two-digit seven-segment display shows the free spaces and USART1
//! reports status.
//!
//! Pin map:
//!
//! | Function          | Pin        |
//! |-------------------|------------|
//! | Entry trigger     | PC13       |
//! | Entry echo        | PA2 (EXTI2)|
//! | Exit trigger      | PC14       |
//! | Exit echo         | PA1 (EXTI1)|
//! | Entry servo       | PA8 (TIM1 CH1) |
//! | Exit servo        | PA0 (TIM2 CH1) |
//! | Units segments    | PB0-PB6    |
//! | Tens segments     | PB8-PB14   |
//! | Telemetry TX      | PA9 (USART1) |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::exti::{self, ExtiInput};
use embassy_stm32::gpio::{Level, Output, OutputType, Pull, Speed};
use embassy_stm32::peripherals::USART1;
use embassy_stm32::time::{hz, Hertz};
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm};
use embassy_stm32::usart::{self, Uart};
use embassy_stm32::{bind_interrupts, Config};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use parkgate_core::config::ParkingConfig;
use parkgate_core::controller::ParkingController;
use parkgate_core::telemetry::{TelemetryDrain, TelemetryWriter, TxQueue};
use parkgate_core::Lane;
use parkgate_drivers::{Hcsr04Trigger, SegmentPort, ServoGate};

mod channels;
mod clock;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    USART1 => usart::InterruptHandler<USART1>;
    EXTI1 => exti::InterruptHandler<embassy_stm32::interrupt::typelevel::EXTI1>;
    EXTI2 => exti::InterruptHandler<embassy_stm32::interrupt::typelevel::EXTI2>;
});

/// Servo frame rate
const SERVO_FRAME_HZ: Hertz = hz(50);

// Telemetry ring (must live forever, split between two tasks)
static TX_QUEUE: StaticCell<TxQueue> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Parkgate firmware starting...");

    let p = embassy_stm32::init(rcc_config());
    release_jtag_pins();
    info!("Peripherals initialized");

    let config = config::load_config();
    log_config(&config);

    // SysTick drives the echo timing clock; the embassy time driver uses TIM4
    let cp = unwrap!(cortex_m::Peripherals::take());
    clock::start(cp.SYST);
    info!("SysTick clock started");

    // Servos (50 Hz PWM)
    let entry_pwm = SimplePwm::new(
        p.TIM1,
        Some(PwmPin::new(p.PA8, OutputType::PushPull)),
        None,
        None,
        None,
        SERVO_FRAME_HZ,
        CountingMode::EdgeAlignedUp,
    );
    let exit_pwm = SimplePwm::new(
        p.TIM2,
        Some(PwmPin::new(p.PA0, OutputType::PushPull)),
        None,
        None,
        None,
        SERVO_FRAME_HZ,
        CountingMode::EdgeAlignedUp,
    );
    let mut entry_channel = entry_pwm.split().ch1;
    let mut exit_channel = exit_pwm.split().ch1;
    entry_channel.enable();
    exit_channel.enable();

    let entry_gate = unwrap!(ServoGate::new(entry_channel, config.gate.entry));
    let exit_gate = unwrap!(ServoGate::new(exit_channel, config.gate.exit));
    info!("Servo gates initialized (closed)");

    // Segment display (PB3/PB4 are plain GPIO once JTAG is off)
    let units = [
        Output::new(p.PB0, Level::Low, Speed::Low),
        Output::new(p.PB1, Level::Low, Speed::Low),
        Output::new(p.PB2, Level::Low, Speed::Low),
        Output::new(p.PB3, Level::Low, Speed::Low),
        Output::new(p.PB4, Level::Low, Speed::Low),
        Output::new(p.PB5, Level::Low, Speed::Low),
        Output::new(p.PB6, Level::Low, Speed::Low),
    ];
    let tens = [
        Output::new(p.PB8, Level::Low, Speed::Low),
        Output::new(p.PB9, Level::Low, Speed::Low),
        Output::new(p.PB10, Level::Low, Speed::Low),
        Output::new(p.PB11, Level::Low, Speed::Low),
        Output::new(p.PB12, Level::Low, Speed::Low),
        Output::new(p.PB13, Level::Low, Speed::Low),
        Output::new(p.PB14, Level::Low, Speed::Low),
    ];
    let segments = SegmentPort::new(units, tens);

    // Telemetry UART (TX only is wired)
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = config.telemetry.baudrate;

    let uart = unwrap!(Uart::new(
        p.USART1,
        p.PA10, // RX
        p.PA9,  // TX
        Irqs,
        p.DMA1_CH4,
        p.DMA1_CH5,
        uart_config,
    ));
    let (tx, _rx) = uart.split();

    let queue = TX_QUEUE.init(TxQueue::new());
    let (producer, consumer) = queue.split();
    info!("Telemetry UART initialized at {} baud", config.telemetry.baudrate);

    // Ultrasonic sensors
    let entry_trigger = unwrap!(Hcsr04Trigger::new(
        Output::new(p.PC13, Level::Low, Speed::Low),
        Delay,
        config.sensor.trigger_pulse_us,
    ));
    let exit_trigger = unwrap!(Hcsr04Trigger::new(
        Output::new(p.PC14, Level::Low, Speed::Low),
        Delay,
        config.sensor.trigger_pulse_us,
    ));
    let entry_echo = ExtiInput::new(p.PA2, p.EXTI2, Pull::Down, Irqs);
    let exit_echo = ExtiInput::new(p.PA1, p.EXTI1, Pull::Down, Irqs);
    info!("Ultrasonic sensors initialized");

    let controller: tasks::Controller = ParkingController::new(
        config,
        entry_gate,
        exit_gate,
        segments,
        TelemetryWriter::new(producer),
        clock::now_us(),
    );

    // Spawn tasks
    let speed = config.sensor.speed_of_sound_m_s;
    spawner.spawn(tasks::echo_task(entry_echo, Lane::Entry, speed)).unwrap();
    spawner.spawn(tasks::echo_task(exit_echo, Lane::Exit, speed)).unwrap();
    spawner
        .spawn(tasks::trigger_task(entry_trigger, exit_trigger, config.trigger_interval_us()))
        .unwrap();
    spawner
        .spawn(tasks::telemetry_tx_task(tx, TelemetryDrain::new(consumer)))
        .unwrap();
    spawner.spawn(tasks::controller_task(controller)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// 8 MHz HSE through the PLL to 72 MHz
fn rcc_config() -> Config {
    use embassy_stm32::rcc::*;

    let mut config = Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(8_000_000),
        mode: HseMode::Oscillator,
    });
    config.rcc.pll = Some(Pll {
        src: PllSource::HSE,
        prediv: PllPreDiv::DIV1,
        mul: PllMul::MUL9,
    });
    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV2;
    config.rcc.apb2_pre = APBPrescaler::DIV1;
    config
}

/// Hand PA15, PB3 and PB4 back to GPIO, keeping SWD for the debugger
///
/// Out of reset they belong to JTAG, which leaves units segments d and e
/// (PB3, PB4) dark.
fn release_jtag_pins() {
    use embassy_stm32::pac;

    /// SWJ_CFG: JTAG-DP disabled, SW-DP enabled
    const SWJ_SWD_ONLY: u8 = 0b010;

    pac::RCC.apb2enr().modify(|w| w.set_afioen(true));
    pac::AFIO.mapr().modify(|w| w.set_swj_cfg(SWJ_SWD_ONLY));
}

fn log_config(config: &ParkingConfig) {
    info!(
        "Lot: {} spaces, threshold {} m, hold {} ms",
        config.capacity, config.sensor.threshold_m, config.gate.hold_ms
    );
    info!(
        "Triggers every {} ms, status every {} ms",
        config.sensor.trigger_interval_ms, config.telemetry.status_interval_ms
    );
}
