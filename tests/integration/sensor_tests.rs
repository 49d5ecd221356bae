//! Integration tests for the Sensor → scheduler → sink pipeline.
//!
//! A real `TickScheduler` drives sensors fed by scripted sources, and a
//! recording sink captures broadcasts and alarms.

use super::mock_hw::{RecordingSink, ScriptedSource, SensorDelegate};

use rcsense::{
    AlarmKind, AlarmStatus, CalibrationTracker, ReadState, Reading, Sensor, SensorConfig,
    TelemetryError, TickOutcome, TickScheduler, TimerPort,
};

fn passthrough_config(name: &str, unit: &str) -> SensorConfig {
    SensorConfig {
        passthrough: true,
        ..SensorConfig::new(name, unit)
    }
}

// ── Low alarm on the second tick ─────────────────────────────

#[test]
fn low_alarm_fires_on_second_tick_only() {
    let source = ScriptedSource::new(&[20_i32, 5]);
    let mut sensor = Sensor::new(&passthrough_config("Ballast pump", "l/min"), source).unwrap();
    sensor.set_min_alarm(10);

    let mut sched = TickScheduler::new();
    sensor.start_reading(&mut sched).unwrap();
    let mut sink = RecordingSink::new();

    {
        let mut delegate = SensorDelegate::new(&mut sensor, &mut sink);
        // 10 Hz → 100ms period
        sched.tick(100, &mut delegate);
        assert_eq!(delegate.outcomes, vec![TickOutcome::Sampled(AlarmStatus::Ok)]);

        sched.tick(100, &mut delegate);
        assert_eq!(delegate.outcomes.len(), 2);
        assert!(matches!(
            delegate.outcomes[1],
            TickOutcome::Sampled(AlarmStatus::Low(_))
        ));
    }

    assert_eq!(sink.alarms.len(), 1);
    let alarm = &sink.alarms[0];
    assert_eq!(alarm.kind, AlarmKind::Low);
    assert_eq!(alarm.value, Reading::Integer(5));
    assert_eq!(alarm.threshold, Reading::Integer(10));
    assert_eq!(
        alarm.message,
        "Ballast pump: measured value 5 l/min below set alarm point of 10 l/min."
    );
}

#[test]
fn alarms_repeat_while_the_condition_holds() {
    let source = ScriptedSource::new(&[70.0_f32, 71.0, 50.0]);
    let mut sensor = Sensor::new(&passthrough_config("Motor temperature", "°C"), source).unwrap();
    sensor.set_max_alarm(60.0);

    let statuses: Vec<_> = (0..3).map(|_| sensor.sample()).collect();
    assert!(matches!(statuses[0], AlarmStatus::High(_)));
    assert!(matches!(statuses[1], AlarmStatus::High(_)));
    assert_eq!(statuses[2], AlarmStatus::Ok);
}

// ── History ───────────────────────────────────────────────────

#[test]
fn zero_queue_length_reports_no_history() {
    let mut sensor = Sensor::new(
        &passthrough_config("Rudder", "°").with_queue_length(0),
        ScriptedSource::new(&[1.0_f64, 2.0]),
    )
    .unwrap();
    sensor.sample();
    sensor.sample();
    assert_eq!(sensor.get_avg_value(), Err(TelemetryError::NoHistory));
}

#[test]
fn average_covers_only_the_retained_window() {
    let mut sensor = Sensor::new(
        &passthrough_config("Shaft", "RPM").with_queue_length(3),
        ScriptedSource::new(&[100_i64, 200, 300, 400, 500]),
    )
    .unwrap();
    for _ in 0..5 {
        sensor.sample();
    }
    assert_eq!(sensor.get_avg_value(), Ok(400));
    assert_eq!(sensor.get_min_read_value(), Some(100));
    assert_eq!(sensor.get_max_read_value(), Some(500));

    sensor.reset_history();
    assert_eq!(sensor.get_avg_value(), Err(TelemetryError::EmptyBuffer));
    assert_eq!(sensor.get_min_read_value(), Some(100));
}

// ── Calibration through the sensor ───────────────────────────

#[test]
fn seeded_tracker_maps_a_sweep_into_limits() {
    let mut sensor = Sensor::new(
        &SensorConfig::new("Throttle", "%"),
        ScriptedSource::new(&[0_i32, 50, 100]),
    )
    .unwrap()
    .with_tracker(CalibrationTracker::new(0, 0).with_raw_range(0, 100));
    sensor.set_limits(0, 100);

    let values: Vec<i32> = (0..3)
        .map(|_| {
            sensor.sample();
            sensor.get_value()
        })
        .collect();
    assert_eq!(values, vec![0, 50, 100]);
    assert_eq!(sensor.tracker().raw_range(), Some((0, 100)));
}

#[test]
fn unseeded_tracker_auto_ranges() {
    let mut sensor = Sensor::new(
        &SensorConfig::new("Throttle", "%"),
        ScriptedSource::new(&[0_i32, 50, 100, 50]),
    )
    .unwrap();
    sensor.set_limits(0, 100);

    let values: Vec<i32> = (0..4)
        .map(|_| {
            sensor.sample();
            sensor.get_value()
        })
        .collect();
    // the span only reaches full width once the top has been seen
    assert_eq!(values, vec![0, 100, 100, 50]);
}

#[test]
fn limits_default_to_zero_until_set() {
    let mut sensor = Sensor::new(
        &SensorConfig::new("Rudder", "°"),
        ScriptedSource::new(&[10.0_f32, 90.0, 50.0]),
    )
    .unwrap();
    for _ in 0..3 {
        sensor.sample();
    }
    assert_eq!(sensor.get_value(), 0.0);

    sensor.set_limits(-45.0, 45.0);
    sensor.sample();
    assert!(sensor.get_value().abs() < 1e-4);
}

// ── Broadcasting ──────────────────────────────────────────────

#[test]
fn broadcasting_while_idle_republishes_cached_value() {
    let source = ScriptedSource::new(&[42_i32]);
    let mut sensor = Sensor::new(&passthrough_config("Depth", "cm"), source.clone()).unwrap();
    sensor.sample();

    let mut sched = TickScheduler::new();
    sensor.start_broadcasting(&mut sched).unwrap();
    assert_eq!(sensor.read_state(), ReadState::Idle);
    let mut sink = RecordingSink::new();

    {
        let mut delegate = SensorDelegate::new(&mut sensor, &mut sink);
        for _ in 0..3 {
            sched.tick(1000, &mut delegate);
        }
        assert_eq!(delegate.outcomes, vec![TickOutcome::Broadcast; 3]);
    }

    assert_eq!(source.reads(), 1, "broadcasting must not sample");
    assert_eq!(sink.published.len(), 3);
    let last = sink.last_published().unwrap();
    assert_eq!(last.name, "Depth");
    assert_eq!(last.unit, "cm");
    assert_eq!(last.value, Reading::Integer(42));
}

#[test]
fn broadcast_period_change_restarts_broadcasting() {
    let mut sensor = Sensor::new(
        &passthrough_config("Voltage", "V"),
        ScriptedSource::new(&[12.0_f32]),
    )
    .unwrap();
    let mut sched = TickScheduler::new();
    assert!(!sensor.is_broadcasting());

    sensor.set_broadcast_period(250, &mut sched).unwrap();
    assert!(sensor.is_broadcasting());
    assert_eq!(sensor.broadcast_period_ms(), 250);
    assert_eq!(sched.active_count(), 1);

    let mut sink = RecordingSink::new();
    {
        let mut delegate = SensorDelegate::new(&mut sensor, &mut sink);
        sched.tick(250, &mut delegate);
        sched.tick(250, &mut delegate);
    }
    assert_eq!(sink.published.len(), 2);

    sensor.stop_broadcasting();
    sensor.stop_broadcasting();
    assert_eq!(sched.active_count(), 0);
}

#[test]
fn config_broadcast_flag_applies_on_start() {
    let cfg = SensorConfig::temperature("Cooling water");
    let mut sensor = Sensor::new(&cfg, ScriptedSource::new(&[1.0_f32])).unwrap();
    assert!(!sensor.is_broadcasting(), "construction alone schedules nothing");

    let mut sched = TickScheduler::new();
    sensor.start(&mut sched).unwrap();
    assert!(sensor.is_reading());
    assert!(sensor.is_broadcasting());
    assert_eq!(sched.active_count(), 2);
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn stop_reading_is_idempotent_and_silences_sampling() {
    let source = ScriptedSource::new(&[1_i32]);
    let mut sensor = Sensor::new(&passthrough_config("x", "u"), source.clone()).unwrap();
    let mut sched = TickScheduler::new();

    sensor.stop_reading();
    sensor.start_reading(&mut sched).unwrap();
    sensor.stop_reading();
    sensor.stop_reading();
    assert_eq!(sensor.read_state(), ReadState::Idle);

    let mut sink = RecordingSink::new();
    {
        let mut delegate = SensorDelegate::new(&mut sensor, &mut sink);
        for _ in 0..10 {
            sched.tick(100, &mut delegate);
        }
        assert!(delegate.outcomes.is_empty());
    }
    assert_eq!(source.reads(), 0);
}

#[test]
fn frequency_change_while_reading_reschedules() {
    let source = ScriptedSource::new(&[1_i32]);
    let mut sensor = Sensor::new(&passthrough_config("x", "u"), source.clone()).unwrap();
    let mut sched = TickScheduler::new();
    sensor.start_reading(&mut sched).unwrap();
    sensor.set_read_frequency(100.0, &mut sched).unwrap();

    let mut sink = RecordingSink::new();
    {
        let mut delegate = SensorDelegate::new(&mut sensor, &mut sink);
        for _ in 0..10 {
            sched.tick(10, &mut delegate);
        }
        assert!(delegate.unrouted.is_empty());
    }
    // 100 Hz for 100ms, and the old 10 Hz slot is gone
    assert_eq!(source.reads(), 10);
    assert_eq!(sched.active_count(), 1);
}

#[test]
fn frequency_set_while_idle_applies_on_next_start() {
    let mut sensor = Sensor::new(&passthrough_config("x", "u"), ScriptedSource::new(&[1_i32])).unwrap();
    let mut sched = TickScheduler::new();
    sensor.set_read_frequency(2.0, &mut sched).unwrap();
    assert_eq!(sched.active_count(), 0);
    assert!((sensor.read_frequency_hz() - 2.0).abs() < f32::EPSILON);
}

#[test]
fn dropping_a_sensor_cancels_its_schedules() {
    let mut sched = TickScheduler::new();
    let keep = sched.start_periodic("other", 100).unwrap();
    {
        let mut sensor =
            Sensor::new(&passthrough_config("x", "u"), ScriptedSource::new(&[1_i32])).unwrap();
        sensor.start_reading(&mut sched).unwrap();
        sensor.start_broadcasting(&mut sched).unwrap();
        assert_eq!(sched.active_count(), 3);
    }
    assert_eq!(sched.active_count(), 1);
    assert!(keep.is_armed());
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let cfg = SensorConfig::new("x", "u").with_read_frequency(-1.0);
    assert!(Sensor::new(&cfg, ScriptedSource::new(&[1_i32])).is_err());
}
