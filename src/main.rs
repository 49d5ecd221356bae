//! rcsense firmware: main entry point.
//!
//! Hexagonal layout with a cooperative, tick-driven acquisition loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Potentiometer  TemperatureProbe  RpmSource   PowerSource      │
//! │  (RawSource)    (RawSource)       (RawSource) (RawSource)      │
//! │  LogSink (PublishSink + AlarmSink)   MonotonicClock (Clock)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │     Sensor × N (history · calibration · alarms)        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  esp_timer base tick → TickScheduler → ShipSensors delegate    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::gpio::{Gpio16, Input, PinDriver};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::FromValueType;
use log::{info, warn};

use rcsense::adapters::log_sink::LogSink;
use rcsense::adapters::time::MonotonicClock;
use rcsense::app::ports::SchedulerDelegate;
use rcsense::drivers::pwm::{Light, PwmOutput};
use rcsense::drivers::{hw_init, hw_timer};
use rcsense::sensors::potentiometer::Potentiometer;
use rcsense::sensors::power::{CurrentMeter, PowerSource, VoltageMeter};
use rcsense::sensors::rpm::{RpmSource, SHAFT_PULSES};
use rcsense::sensors::temperature::{ProbeKind, TemperatureProbe};
use rcsense::sensors::water_level::WaterSensor;
use rcsense::sensors::{LinearAdc, full_scale_tracker};
use rcsense::{ScheduleId, Sensor, SensorConfig, TickScheduler, pins};

type BilgeProbe = WaterSensor<PinDriver<'static, Gpio16, Input>>;

// ── Scheduler delegate ────────────────────────────────────────
//
// Owns every sensor plus the sink.  The scheduler only knows schedule
// ids; each sensor recognises the ids of the handles it holds.

struct ShipSensors {
    rudder: Sensor<f32, Potentiometer>,
    motor_temp: Sensor<f32, TemperatureProbe>,
    shaft: Sensor<f32, RpmSource<'static, MonotonicClock>>,
    power: Sensor<f32, PowerSource<VoltageMeter, CurrentMeter>>,
    bilge: Sensor<i32, BilgeProbe>,
    sink: LogSink,
}

impl SchedulerDelegate for ShipSensors {
    fn on_schedule_fired(&mut self, id: ScheduleId, label: &str) {
        let handled = self.rudder.on_schedule_fired(id, &mut self.sink).is_some()
            || self.motor_temp.on_schedule_fired(id, &mut self.sink).is_some()
            || self.shaft.on_schedule_fired(id, &mut self.sink).is_some()
            || self.power.on_schedule_fired(id, &mut self.sink).is_some()
            || self.bilge.on_schedule_fired(id, &mut self.sink).is_some();
        if !handled {
            warn!("Schedule '{}' #{} has no owner", label, id.raw());
        }
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  rcsense v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals().map_err(rcsense::Error::from) {
        log::error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    if let Err(e) = hw_init::init_isr_service() {
        log::error!("ISR service init failed: {}, shaft RPM will read 0", e);
    }

    let peripherals = Peripherals::take()?;
    let light_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default().frequency(pins::LIGHT_PWM_FREQ_HZ.Hz()),
    )?;
    let light_channel = LedcDriver::new(
        peripherals.ledc.channel0,
        &light_timer,
        peripherals.pins.gpio17, // pins::NAV_LIGHT_PWM_GPIO
    )?;
    let mut nav_light = Light::new(PwmOutput::new(light_channel, "Navigation light")?);
    nav_light.switch_on()?;

    // pins::BILGE_WATER_GPIO
    let bilge_pin = PinDriver::input(peripherals.pins.gpio16)?;

    // ── 3. Build sensors ──────────────────────────────────────
    let clock = MonotonicClock::new();

    let rudder_cfg = SensorConfig::new("Rudder", "°")
        .with_read_frequency(50.0)
        .with_broadcast(true);
    let mut rudder = Sensor::new(&rudder_cfg, Potentiometer::new(pins::RUDDER_ADC_CHANNEL))?
        .with_tracker(full_scale_tracker());
    rudder.set_limits(-45.0, 45.0);

    let mut motor_temp = Sensor::new(
        &SensorConfig::temperature("Motor temperature"),
        TemperatureProbe::new(ProbeKind::AnalogVoltage, pins::MOTOR_TEMP_ADC_CHANNEL),
    )?
    .with_tracker(full_scale_tracker());
    // LM35 behind 3.3 V full scale: 0–330 °C
    motor_temp.set_limits(0.0, 330.0);
    motor_temp.set_max_alarm(60.0);

    let mut shaft = Sensor::new(
        &SensorConfig::rpm("Shaft"),
        RpmSource::new(&SHAFT_PULSES, clock, pins::SHAFT_IMPULSES_PER_ROTATION),
    )?;
    shaft.set_max_alarm(12_000.0);

    let mut power = Sensor::new(
        &SensorConfig::power(),
        PowerSource::new(
            VoltageMeter::new(LinearAdc::spanning(pins::BATTERY_VOLTAGE_ADC_CHANNEL, 19.8)),
            CurrentMeter::new(LinearAdc::spanning(pins::BATTERY_CURRENT_ADC_CHANNEL, 30.0)),
        ),
    )?;
    power.set_max_alarm(250.0);

    let bilge_cfg = SensorConfig {
        passthrough: true,
        ..SensorConfig::new("Bilge", "").with_read_frequency(1.0)
    };
    let mut bilge = Sensor::new(&bilge_cfg, WaterSensor::new(bilge_pin))?;
    bilge.set_max_alarm(0);

    // ── 4. Start schedules ────────────────────────────────────
    let mut sched = TickScheduler::new();
    rudder.start(&mut sched)?;
    motor_temp.start(&mut sched)?;
    shaft.start(&mut sched)?;
    power.start(&mut sched)?;
    bilge.start(&mut sched)?;

    let mut ship = ShipSensors {
        rudder,
        motor_temp,
        shaft,
        power,
        bilge,
        sink: LogSink::new(),
    };

    hw_timer::start_timer();
    info!("System ready. Entering acquisition loop.");

    // ── 5. Acquisition loop ───────────────────────────────────
    loop {
        let elapsed_ms = hw_timer::take_elapsed_ms();
        if elapsed_ms > 0 {
            sched.tick(elapsed_ms, &mut ship);
        }

        // Yield to the idle task for one base tick.
        esp_idf_hal::delay::FreeRtos::delay_ms(hw_timer::BASE_TICK_MS);
    }
}
