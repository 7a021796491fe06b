//! Property tests for the health state machine

use inodewatch_core::{
    HealthState, HealthStateMachine, MeasuredValue, TargetHealthState, TriggerId, parse_threshold,
};
use proptest::prelude::*;

fn measurement() -> impl Strategy<Value = MeasuredValue> {
    prop_oneof![
        8 => (0u8..=100).prop_map(MeasuredValue::Percentage),
        1 => Just(MeasuredValue::NotApplicable),
        1 => Just(MeasuredValue::Unavailable),
    ]
}

proptest! {
    /// Property: Transitions alternate and each one changes the state
    #[test]
    fn transitions_alternate(
        limit in 1u8..100,
        readings in prop::collection::vec(measurement(), 1..40),
    ) {
        let threshold = parse_threshold(&format!("{limit}%")).unwrap();
        let machine = HealthStateMachine::new(TriggerId::default());
        let mut target = TargetHealthState::new("t");
        let mut expect_offline = true;

        for reading in readings {
            let before = target.state.is_offline();
            match machine.apply(&mut target, reading, threshold) {
                Some(event) => {
                    prop_assert_eq!(event.went_offline(), expect_offline);
                    prop_assert_ne!(before, target.state.is_offline());
                    expect_offline = !expect_offline;
                }
                None => prop_assert_eq!(before, target.state.is_offline()),
            }
            prop_assert_eq!(target.last_known_value, reading);
            prop_assert!(target.last_checked.is_some());
        }
    }

    /// Property: Sentinel readings never change state
    #[test]
    fn sentinels_hold_state(
        start_offline in any::<bool>(),
        sentinels in prop::collection::vec(
            prop_oneof![Just(MeasuredValue::NotApplicable), Just(MeasuredValue::Unavailable)],
            1..10,
        ),
    ) {
        let threshold = parse_threshold("50%").unwrap();
        let machine = HealthStateMachine::new(TriggerId::default());
        let mut target = TargetHealthState::new("t");
        if start_offline {
            machine.apply(&mut target, MeasuredValue::Percentage(99), threshold);
        }
        let state = target.state.clone();

        for s in sentinels {
            prop_assert!(machine.apply(&mut target, s, threshold).is_none());
            prop_assert_eq!(&target.state, &state);
        }
    }

    /// Property: A monitor never clears an offline state set by another
    #[test]
    fn foreign_offline_never_cleared(
        readings in prop::collection::vec(measurement(), 1..30),
    ) {
        let threshold = parse_threshold("80%").unwrap();
        let owner = HealthStateMachine::new(TriggerId::new("a"));
        let other = HealthStateMachine::new(TriggerId::new("b"));
        let mut target = TargetHealthState::new("t");
        owner.apply(&mut target, MeasuredValue::Percentage(90), threshold);

        for reading in readings {
            prop_assert!(other.apply(&mut target, reading, threshold).is_none());
            match &target.state {
                HealthState::Offline(cause) => prop_assert_eq!(cause.triggered_by.as_str(), "a"),
                HealthState::Online => prop_assert!(false, "target came back online"),
            }
        }
    }
}
