//! Property tests for unit conversion, clamping and planning.

use proptest::prelude::*;

use turntable_motion::{
    Degrees, Direction, MechanicalConstants, MotionPlanner, MotionRequest, Rpm, SafetyClamp,
    SafetyLimits, StepsPerSec, StepsPerSecSquared,
};

fn mechanism() -> impl Strategy<Value = MechanicalConstants> {
    (prop::sample::select(vec![200u32, 400, 1600, 3200, 6400]), 0.5f32..20.0)
        .prop_map(|(steps, gear)| MechanicalConstants::new(steps, gear))
}

proptest! {
    #[test]
    fn rpm_round_trip(constants in mechanism(), rpm in 0.01f32..500.0) {
        let back = constants.steps_to_rpm(constants.rpm_to_steps(Rpm(rpm)));
        prop_assert!((back.0 - rpm).abs() <= rpm * 1e-5);
    }

    #[test]
    fn clamp_is_idempotent(
        constants in mechanism(),
        rate in 0.0f32..100_000.0,
        accel in 0.0f32..100_000.0,
        decel in 0.0f32..100_000.0,
    ) {
        let clamp = SafetyClamp::new(constants, &SafetyLimits::default());
        let first = clamp.apply(StepsPerSec(rate), StepsPerSecSquared(accel), StepsPerSecSquared(decel));
        let second = clamp.apply(first.step_rate, first.acceleration, first.deceleration);

        prop_assert_eq!(second.step_rate, first.step_rate);
        prop_assert_eq!(second.acceleration, first.acceleration);
        prop_assert_eq!(second.deceleration, first.deceleration);
        prop_assert!(second.warnings.is_empty());
        prop_assert!(first.step_rate.0 <= clamp.max_step_rate().0);
    }

    #[test]
    fn plan_sign_follows_direction(angle in 0.0f32..720.0, duration in 1u32..60_000, reverse in any::<bool>()) {
        let direction = if reverse { Direction::Reverse } else { Direction::Forward };
        let planner = MotionPlanner::new(MechanicalConstants::new(3200, 3.0), SafetyLimits::default());
        let plan = planner.plan(&MotionRequest::new(Degrees(angle), duration, direction)).unwrap();

        if plan.is_noop() {
            prop_assert_eq!(plan.step_rate, StepsPerSec(0.0));
        } else if reverse {
            prop_assert!(plan.step_delta.0 < 0);
        } else {
            prop_assert!(plan.step_delta.0 > 0);
        }
    }
}
