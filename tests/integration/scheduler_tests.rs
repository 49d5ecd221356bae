//! Integration tests for several sensors sharing one scheduler.

use super::mock_hw::{RecordingSink, ScriptedSource};

use rcsense::app::ports::SchedulerDelegate;
use rcsense::scheduler::MAX_SCHEDULES;
use rcsense::{
    AlarmStatus, Reading, ScheduleId, SchedulerError, Sensor, SensorConfig, TickOutcome,
    TickScheduler,
};

type IntSensor = Sensor<i32, ScriptedSource<i32>>;
type FloatSensor = Sensor<f32, ScriptedSource<f32>>;

/// Two differently-typed sensors behind one delegate, as in the firmware.
struct Pair {
    depth: IntSensor,
    temp: FloatSensor,
    sink: RecordingSink,
    log: Vec<(&'static str, TickOutcome)>,
}

impl SchedulerDelegate for Pair {
    fn on_schedule_fired(&mut self, id: ScheduleId, _label: &str) {
        if let Some(o) = self.depth.on_schedule_fired(id, &mut self.sink) {
            self.log.push(("depth", o));
        } else if let Some(o) = self.temp.on_schedule_fired(id, &mut self.sink) {
            self.log.push(("temp", o));
        }
    }
}

fn pair() -> Pair {
    let depth_cfg = SensorConfig {
        passthrough: true,
        ..SensorConfig::new("Depth", "cm").with_read_frequency(20.0)
    };
    let temp_cfg = SensorConfig {
        passthrough: true,
        ..SensorConfig::temperature("Motor temperature").with_read_frequency(5.0)
    };
    Pair {
        depth: Sensor::new(&depth_cfg, ScriptedSource::new(&[30])).unwrap(),
        temp: Sensor::new(&temp_cfg, ScriptedSource::new(&[40.0, 65.0])).unwrap(),
        sink: RecordingSink::new(),
        log: Vec::new(),
    }
}

#[test]
fn sensors_run_at_independent_rates() {
    let mut sched = TickScheduler::new();
    let mut p = pair();
    p.depth.start_reading(&mut sched).unwrap();
    p.temp.start_reading(&mut sched).unwrap();

    for _ in 0..20 {
        sched.tick(10, &mut p);
    }
    let depth = p.log.iter().filter(|(n, _)| *n == "depth").count();
    let temp = p.log.iter().filter(|(n, _)| *n == "temp").count();
    // 200ms: 20 Hz → 4, 5 Hz → 1
    assert_eq!(depth, 4);
    assert_eq!(temp, 1);
}

#[test]
fn alarms_and_broadcasts_reach_the_shared_sink() {
    let mut sched = TickScheduler::new();
    let mut p = pair();
    p.temp.set_max_alarm(60.0);
    p.temp.start(&mut sched).unwrap();

    // two 200ms reads, then the 1s broadcast
    for _ in 0..5 {
        sched.tick(200, &mut p);
    }
    assert!(matches!(p.log[1].1, TickOutcome::Sampled(AlarmStatus::High(_))));
    assert_eq!(p.sink.alarms.len(), 4, "65 °C stays above the alarm point");
    assert_eq!(p.sink.published.len(), 1);
    assert_eq!(p.sink.published[0].value, Reading::Float(65.0));
}

#[test]
fn stall_is_coalesced_into_one_sample() {
    let mut sched = TickScheduler::new();
    let mut p = pair();
    p.depth.start_reading(&mut sched).unwrap();

    sched.tick(1_000, &mut p);
    assert_eq!(p.log.len(), 1);
}

#[test]
fn scheduler_capacity_surfaces_as_an_error() {
    let mut sched = TickScheduler::new();
    let mut sensors: Vec<IntSensor> = (0..MAX_SCHEDULES)
        .map(|_| {
            Sensor::new(&SensorConfig::new("x", "u"), ScriptedSource::new(&[0])).unwrap()
        })
        .collect();
    for s in &mut sensors {
        s.start_reading(&mut sched).unwrap();
    }

    let mut extra: IntSensor =
        Sensor::new(&SensorConfig::new("extra", "u"), ScriptedSource::new(&[0])).unwrap();
    assert_eq!(extra.start_reading(&mut sched), Err(SchedulerError::Full));
    assert!(!extra.is_reading());

    sensors[0].stop_reading();
    assert!(extra.start_reading(&mut sched).is_ok());
}
