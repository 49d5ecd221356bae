//! End-to-end host simulation of the firmware acquisition loop.
//!
//! Simulated ADC channels and shaft pulses feed the real source drivers;
//! base ticks go through `hw_timer`'s pending-tick counter into the
//! scheduler, exactly as the firmware main loop drains them.

use std::cell::Cell;

use rcsense::adapters::log_sink::LogSink;
use rcsense::app::ports::{Clock, SchedulerDelegate};
use rcsense::drivers::hw_timer;
use rcsense::sensors::potentiometer::Potentiometer;
use rcsense::sensors::rpm::{PulseTimer, RpmSource};
use rcsense::sensors::temperature::{ProbeKind, TemperatureProbe};
use rcsense::sensors::{full_scale_tracker, sim_set_adc};
use rcsense::{AlarmStatus, ScheduleId, Sensor, SensorConfig, TickScheduler, pins};

const RUDDER_CHANNEL: u32 = 3;

struct SimClock<'a>(&'a Cell<u32>);

impl Clock for SimClock<'_> {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}

struct Boat<'a> {
    rudder: Sensor<f32, Potentiometer>,
    shaft: Sensor<f32, RpmSource<'a, SimClock<'a>>>,
    sink: LogSink,
}

impl SchedulerDelegate for Boat<'_> {
    fn on_schedule_fired(&mut self, id: ScheduleId, _label: &str) {
        if self.rudder.on_schedule_fired(id, &mut self.sink).is_none() {
            self.shaft.on_schedule_fired(id, &mut self.sink);
        }
    }
}

#[test]
fn simulated_boat_runs_from_drained_ticks() {
    let pulses = PulseTimer::new();
    let now = Cell::new(0_u32);

    let rudder_cfg = SensorConfig::new("Rudder", "°").with_broadcast(true);
    let mut rudder = Sensor::new(&rudder_cfg, Potentiometer::new(RUDDER_CHANNEL))
        .unwrap()
        .with_tracker(full_scale_tracker());
    rudder.set_limits(-45.0, 45.0);

    let mut shaft = Sensor::new(
        &SensorConfig::rpm("Shaft"),
        RpmSource::new(&pulses, SimClock(&now), 2),
    )
    .unwrap();
    shaft.set_max_alarm(5_000.0);

    let mut sched = TickScheduler::new();
    rudder.start(&mut sched).unwrap();
    shaft.start(&mut sched).unwrap();
    let mut boat = Boat {
        rudder,
        shaft,
        sink: LogSink::new(),
    };

    // rudder hard over, shaft edges every 5ms → 6000 RPM on two magnets
    sim_set_adc(RUDDER_CHANNEL, u16::MAX);
    hw_timer::take_pending_ticks();
    for step in 0..100_u32 {
        let t = step * hw_timer::BASE_TICK_MS;
        pulses.on_edge(t);
        pulses.on_edge(t + 5);
        now.set(t + 5);

        hw_timer::sim_advance_ticks(1);
        let elapsed = hw_timer::take_elapsed_ms();
        sched.tick(elapsed, &mut boat);
    }

    assert!((boat.rudder.get_value() - 45.0).abs() < 1e-3);
    assert_eq!(boat.rudder.get_max_read_value(), Some(boat.rudder.get_value()));

    assert!((boat.shaft.get_value() - 6_000.0).abs() < 1e-2);
    assert!(boat.shaft.get_avg_value().is_ok());

    // 1s of running: one broadcast per sensor, shaft over its alarm point
    // on every one of its 10 samples
    assert_eq!(boat.sink.published(), 2);
    assert_eq!(boat.sink.alarms(), 10);
}

#[test]
fn motor_temperature_maps_linearly_from_the_first_reading() {
    let channel = pins::MOTOR_TEMP_ADC_CHANNEL;
    let mut motor_temp = Sensor::new(
        &SensorConfig::temperature("Motor temperature"),
        TemperatureProbe::new(ProbeKind::AnalogVoltage, channel),
    )
    .unwrap()
    .with_tracker(full_scale_tracker());
    // LM35 behind 3.3 V full scale, as wired in the firmware
    motor_temp.set_limits(0.0, 330.0);
    motor_temp.set_max_alarm(60.0);

    // ~25 °C, then a one-count change
    sim_set_adc(channel, 4_965);
    assert_eq!(motor_temp.sample(), AlarmStatus::Ok);
    assert!((motor_temp.get_value() - 25.0).abs() < 0.1);

    sim_set_adc(channel, 4_966);
    assert_eq!(motor_temp.sample(), AlarmStatus::Ok);
    assert!((motor_temp.get_value() - 25.0).abs() < 0.1);

    // ~66 °C
    sim_set_adc(channel, 13_107);
    assert!(matches!(motor_temp.sample(), AlarmStatus::High(_)));
    assert!((motor_temp.get_value() - 66.0).abs() < 0.1);
}
