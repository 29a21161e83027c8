//! Integration tests for turntable-motion.
//!
//! These tests drive the complete workflow from form parameters to the
//! textual report, against a simulated clock and motor.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

use turntable_motion::config::units::{StepsPerSec, StepsPerSecSquared};
use turntable_motion::error::RequestError;
use turntable_motion::{
    Degrees, Direction, Error, MotionRequest, MotionService, PulseGenerator, Result, Rpm, Steps,
    StepDirDriverBuilder, TurntableConfig,
};

// =============================================================================
// Simulated hardware
// =============================================================================

/// Shared simulated time in microseconds.
#[derive(Clone, Default)]
struct SimTime(Rc<Cell<u64>>);

impl SimTime {
    fn now(&self) -> u64 {
        self.0.get()
    }

    fn advance(&self, us: u64) {
        self.0.set(self.0.get() + us);
    }

    fn reader(&self) -> impl Fn() -> u64 {
        let time = self.clone();
        move || time.now()
    }

    /// A clock that moves forward one microsecond every time it is read.
    fn ticking_reader(&self) -> impl Fn() -> u64 {
        let time = self.clone();
        move || {
            time.advance(1);
            time.now()
        }
    }
}

/// Delay that advances simulated time and records millisecond pauses.
#[derive(Clone)]
struct SimDelay {
    time: SimTime,
    pauses_ms: Rc<RefCell<Vec<u32>>>,
}

impl SimDelay {
    fn new(time: &SimTime) -> Self {
        Self {
            time: time.clone(),
            pauses_ms: Rc::default(),
        }
    }

    fn pauses(&self) -> Vec<u32> {
        self.pauses_ms.borrow().clone()
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.time.advance(u64::from(ns) / 1000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.pauses_ms.borrow_mut().push(ms);
        self.time.advance(u64::from(ms) * 1000);
    }
}

/// Motor double: one step per tick, each tick costs `tick_us` of simulated time.
///
/// With `stall_after` set, the motor stops responding once it has moved that
/// many steps in total, as a jammed table would.
struct SimMotor {
    time: SimTime,
    tick_us: u64,
    current: i64,
    target: i64,
    moved: u64,
    stall_after: Option<u64>,
    max_speed: Rc<Cell<f32>>,
}

impl SimMotor {
    fn new(time: &SimTime, tick_us: u64) -> Self {
        Self {
            time: time.clone(),
            tick_us,
            current: 0,
            target: 0,
            moved: 0,
            stall_after: None,
            max_speed: Rc::default(),
        }
    }

    fn stalling_after(mut self, steps: u64) -> Self {
        self.stall_after = Some(steps);
        self
    }
}

impl PulseGenerator for SimMotor {
    fn set_max_speed(&mut self, rate: StepsPerSec) {
        self.max_speed.set(rate.0);
    }

    fn set_acceleration(&mut self, _acceleration: StepsPerSecSquared) {}

    fn move_by(&mut self, delta: Steps) -> Result<()> {
        self.target = self.current + delta.value();
        Ok(())
    }

    fn distance_to_go(&self) -> Steps {
        Steps::new(self.target - self.current)
    }

    fn run(&mut self) -> Result<()> {
        self.time.advance(self.tick_us);
        if matches!(self.stall_after, Some(limit) if self.moved >= limit) {
            return Ok(());
        }
        if self.current != self.target {
            self.current += (self.target - self.current).signum();
            self.moved += 1;
        }
        Ok(())
    }

    fn current_position(&self) -> Steps {
        Steps::new(self.current)
    }

    fn set_current_position(&mut self, position: Steps) {
        self.current = position.value();
        self.target = position.value();
    }
}

/// STEP pin that only counts pulses.
#[derive(Clone, Default)]
struct PulseCounter(Rc<Cell<u64>>);

impl embedded_hal::digital::ErrorType for PulseCounter {
    type Error = core::convert::Infallible;
}

impl OutputPin for PulseCounter {
    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.0.set(self.0.get() + 1);
        Ok(())
    }

    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// No enable line activity at all.
fn no_writes() -> [PinTransaction; 0] {
    []
}

/// Enable line expectations for one active-low request: assert, then release.
fn enable_cycle() -> [PinTransaction; 2] {
    [PinTransaction::set(State::Low), PinTransaction::set(State::High)]
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_reverse_sequence_with_pauses() {
    let config = TurntableConfig::default();
    let time = SimTime::default();
    let delay = SimDelay::new(&time);
    let mut enable = PinMock::new(&enable_cycle());

    let mut service = MotionService::new(
        &config,
        SimMotor::new(&time, 100),
        enable.clone(),
        time.reader(),
        delay.clone(),
    )
    .unwrap();

    let report = service
        .execute_query("angle=90&time=2000&direction=reverse&repetitions=3&repDelay=500")
        .unwrap();

    // Pauses after repetitions 1 and 2 only
    assert_eq!(delay.pauses(), vec![500, 500]);

    assert_eq!(report.repetitions, 3);
    assert_eq!(report.direction, Direction::Reverse);
    assert_eq!(report.expected_angle, Degrees(270.0));
    assert_eq!(report.total_steps, 3 * 2400);
    assert_eq!(report.aborted_segments, 0);
    assert!(!report.has_warnings());

    // 2400 steps at 100 us per tick, three times, plus two pauses
    assert_eq!(report.elapsed_ms, 3 * 240 + 1000);

    let text = report.to_string();
    assert!(text.contains("Expected total angle: 270.0°"));
    assert!(text.contains("Angle per repetition: 90.0° reverse"));

    let plan = service.planner()
        .plan(&MotionRequest::new(Degrees(90.0), 2000, Direction::Reverse))
        .unwrap();
    assert_eq!(plan.step_delta, Steps::new(-2400));
    assert!((plan.step_rate.0 - 1200.0).abs() < 1e-3);

    enable.done();
}

#[test]
fn test_zero_angle_never_enables() {
    let config = TurntableConfig::default();
    let time = SimTime::default();
    let delay = SimDelay::new(&time);
    let mut enable = PinMock::new(&no_writes());

    let mut service = MotionService::new(
        &config,
        SimMotor::new(&time, 100),
        enable.clone(),
        time.reader(),
        delay.clone(),
    )
    .unwrap();

    let report = service
        .execute([("angle", "0"), ("time", "1000"), ("direction", "forward"), ("repetitions", "4")])
        .unwrap();

    assert!(report.noop);
    assert_eq!(report.total_steps, 0);
    assert!(delay.pauses().is_empty());
    assert_eq!(time.now(), 0);

    enable.done();
}

#[test]
fn test_repetitions_default_to_one() {
    let config = TurntableConfig::default();
    let time = SimTime::default();
    let delay = SimDelay::new(&time);
    let mut enable = PinMock::new(&enable_cycle());

    let mut service = MotionService::new(
        &config,
        SimMotor::new(&time, 10),
        enable.clone(),
        time.reader(),
        delay.clone(),
    )
    .unwrap();

    // Empty form fields count as absent
    let report = service
        .execute_query("angle=45&time=1000&direction=forward&repetitions=&repDelay=250")
        .unwrap();

    assert_eq!(report.repetitions, 1);
    assert_eq!(report.total_steps, 1200);
    assert!(delay.pauses().is_empty());

    enable.done();
}

#[test]
fn test_overspeed_is_clamped_and_reported() {
    let config = TurntableConfig::default();
    let time = SimTime::default();
    let motor = SimMotor::new(&time, 10);
    let commanded = motor.max_speed.clone();
    let mut enable = PinMock::new(&enable_cycle());

    let mut service =
        MotionService::new(&config, motor, enable.clone(), time.reader(), SimDelay::new(&time)).unwrap();

    // A full turn in one second is 60 RPM against a 20 RPM limit
    let report = service.execute_query("angle=360&time=1000&direction=forward").unwrap();

    let max_rate = config.constants().rpm_to_steps(config.limits.max_speed);
    assert_eq!(commanded.get(), max_rate.0);
    assert_eq!(report.speed, Rpm(20.0));
    assert_eq!(report.warnings.len(), 1);
    assert!(report.to_string().starts_with("WARNING"));
    assert!(report.warnings[0].contains("60.0 RPM"));

    enable.done();
}

#[test]
fn test_runaway_segments_count_actual_distance() {
    let config = TurntableConfig::default();
    let time = SimTime::default();
    let mut enable = PinMock::new(&enable_cycle());

    // Jams after 1000 steps; each tick takes 10 us
    let motor = SimMotor::new(&time, 10).stalling_after(1000);
    let mut service =
        MotionService::new(&config, motor, enable.clone(), time.reader(), SimDelay::new(&time)).unwrap();

    let report = service
        .execute_query("angle=90&time=100&direction=forward&repetitions=2")
        .unwrap();

    assert_eq!(report.total_steps, 1000);
    assert_eq!(report.aborted_segments, 2);
    assert_eq!(report.actual_angle, Degrees(37.5));
    assert_eq!(report.expected_angle, Degrees(180.0));
    // Each segment gave up at its first reading past 200 ms
    assert!(report.elapsed_ms >= 400 && report.elapsed_ms <= 402);
    assert!(report.to_string().contains("Aborted segments: 2"));

    // Enable line was still released exactly once
    enable.done();
}

#[test]
fn test_missing_parameter_leaves_motor_untouched() {
    let config = TurntableConfig::default();
    let time = SimTime::default();
    let mut enable = PinMock::new(&no_writes());

    let mut service = MotionService::new(
        &config,
        SimMotor::new(&time, 10),
        enable.clone(),
        time.reader(),
        SimDelay::new(&time),
    )
    .unwrap();

    let err = service.execute([("angle", "90"), ("time", "2000")]).unwrap_err();
    assert_eq!(err, Error::Request(RequestError::MissingParameter("direction")));

    let err = service.execute_query("time=2000&direction=forward").unwrap_err();
    assert_eq!(err, Error::Request(RequestError::MissingParameter("angle")));

    assert!(service.last_report().is_none());
    assert_eq!(time.now(), 0);

    enable.done();
}

#[test]
fn test_last_report_tracks_latest_request() {
    let config = TurntableConfig::default();
    let time = SimTime::default();
    let mut enable = PinMock::new(&[
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ]);

    let mut service = MotionService::new(
        &config,
        SimMotor::new(&time, 10),
        enable.clone(),
        time.reader(),
        SimDelay::new(&time),
    )
    .unwrap();

    service.execute_query("angle=10&time=500&direction=forward").unwrap();
    service.execute_query("angle=20&time=500&direction=reverse").unwrap();

    let last = service.last_report().unwrap();
    assert_eq!(last.angle, Degrees(20.0));
    assert_eq!(last.direction, Direction::Reverse);

    enable.done();
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = TurntableConfig::default();
    config.limits.runaway_factor = 0.5;
    let time = SimTime::default();
    let mut enable = PinMock::new(&no_writes());

    let result = MotionService::new(
        &config,
        SimMotor::new(&time, 10),
        enable.clone(),
        time.reader(),
        SimDelay::new(&time),
    );

    assert!(matches!(result, Err(Error::Config(_))));
    enable.done();
}

// =============================================================================
// End to end through the STEP/DIR driver
// =============================================================================

#[test]
fn test_step_dir_driver_end_to_end() {
    let config = TurntableConfig::default();
    let time = SimTime::default();
    let pulses = PulseCounter::default();

    // Reverse with non-inverted wiring drives DIR low, once
    let mut dir = PinMock::new(&[PinTransaction::set(State::Low)]);
    let mut enable = PinMock::new(&enable_cycle());

    let driver = StepDirDriverBuilder::new()
        .from_driver_config(&config.driver)
        .step_pin(pulses.clone())
        .dir_pin(dir.clone())
        .delay(SimDelay::new(&time))
        .clock(time.ticking_reader())
        .build()
        .unwrap();

    let mut service = MotionService::new(
        &config,
        driver,
        enable.clone(),
        time.ticking_reader(),
        SimDelay::new(&time),
    )
    .unwrap();

    let report = service
        .execute_query("angle=30&time=1000&direction=reverse&repetitions=2&repDelay=100")
        .unwrap();

    // 30° on a 3:1 table with 3200 steps/rev
    assert_eq!(report.total_steps, 2 * 800);
    assert_eq!(pulses.0.get(), 1600);
    assert_eq!(report.aborted_segments, 0);
    assert_eq!(
        service.executor().pulses().current_position(),
        Steps::new(-1600)
    );

    dir.done();
    enable.done();
}

#[test]
fn test_oversized_angle_rejected_before_motion() {
    let config = TurntableConfig::default();
    let time = SimTime::default();
    let pulses = PulseCounter::default();
    let mut dir = PinMock::new(&no_writes());
    let mut enable = PinMock::new(&no_writes());

    let driver = StepDirDriverBuilder::new()
        .from_driver_config(&config.driver)
        .step_pin(pulses.clone())
        .dir_pin(dir.clone())
        .delay(SimDelay::new(&time))
        .clock(time.ticking_reader())
        .build()
        .unwrap();

    let mut service = MotionService::new(
        &config,
        driver,
        enable.clone(),
        time.ticking_reader(),
        SimDelay::new(&time),
    )
    .unwrap();

    let err = service
        .execute_query("angle=1e18&time=5&direction=forward&repetitions=2")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Request(RequestError::InvalidParameter { name: "angle", .. })
    ));

    assert_eq!(pulses.0.get(), 0);
    assert!(service.last_report().is_none());

    dir.done();
    enable.done();
}

#[test]
fn test_stalled_motor_reports_zero_speed() {
    let config = TurntableConfig::default();
    let time = SimTime::default();
    let mut enable = PinMock::new(&enable_cycle());

    // Never takes a step
    let motor = SimMotor::new(&time, 10).stalling_after(0);
    let mut service =
        MotionService::new(&config, motor, enable.clone(), time.reader(), SimDelay::new(&time)).unwrap();

    let report = service
        .execute_query("angle=90&time=100&direction=forward")
        .unwrap();

    assert_eq!(report.total_steps, 0);
    assert_eq!(report.aborted_segments, 1);
    assert_eq!(report.speed, Rpm(0.0));
    assert!(report.to_string().contains("Speed: 0.0 RPM"));

    enable.done();
}
