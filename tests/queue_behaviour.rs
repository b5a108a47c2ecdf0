use std::error::Error;

use uibuild::engine::{CycleQueue, WhileRunningBehaviour};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn queue_mode_coalesces_changes_into_one_follow_up_cycle() -> TestResult {
    let mut q = CycleQueue::new(WhileRunningBehaviour::Queue, 1);

    q.record_change();
    q.record_change();
    q.record_change();

    assert!(!q.is_empty());
    assert!(q.pop_pending(), "one follow-up cycle is owed");
    assert!(!q.pop_pending(), "changes coalesced into a single cycle");
    assert!(q.is_empty());

    Ok(())
}

#[test]
fn queue_length_caps_pending_cycles() -> TestResult {
    let mut q = CycleQueue::new(WhileRunningBehaviour::Queue, 2);

    for _ in 0..5 {
        q.record_change();
    }

    assert!(q.pop_pending());
    assert!(q.pop_pending());
    assert!(!q.pop_pending());

    Ok(())
}

#[test]
fn drop_mode_ignores_mid_cycle_changes() -> TestResult {
    let mut q = CycleQueue::new(WhileRunningBehaviour::Drop, 1);

    q.record_change();
    q.record_change();

    assert!(q.is_empty());
    assert!(!q.pop_pending());
    assert!(matches!(q.behaviour(), WhileRunningBehaviour::Drop));

    Ok(())
}

#[test]
fn zero_max_pending_is_clamped_to_one() -> TestResult {
    let mut q = CycleQueue::new(WhileRunningBehaviour::Queue, 0);

    q.record_change();
    assert!(q.pop_pending());
    assert!(!q.pop_pending());

    Ok(())
}

#[test]
fn while_running_behaviour_parses_known_values_only() -> TestResult {
    assert_eq!(
        "queue".parse::<WhileRunningBehaviour>()?,
        WhileRunningBehaviour::Queue
    );
    assert_eq!(
        " Drop ".parse::<WhileRunningBehaviour>()?,
        WhileRunningBehaviour::Drop
    );
    assert!("cancel".parse::<WhileRunningBehaviour>().is_err());

    Ok(())
}
