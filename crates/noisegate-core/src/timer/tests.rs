//! Tests for the timer engine.

use super::*;
use crate::models::{Decomposition, Plan};

fn create_test_plan(steps: usize) -> Plan {
    Plan::from_decomposition(
        Decomposition {
            one_thing: "Finish the quarterly report".to_string(),
            steps: (1..=steps).map(|i| format!("Step {i}")).collect(),
            call_to_action: "Execute now.".to_string(),
        },
        1500,
    )
}

fn step_id(engine: &TimerEngine, index: usize) -> String {
    engine.plan().steps[index].id.clone()
}

fn active_count(engine: &TimerEngine) -> usize {
    engine.plan().steps.iter().filter(|s| s.is_active).count()
}

#[test]
fn test_new_plan_starts_without_active_step() {
    let engine = TimerEngine::new(create_test_plan(3));
    assert_eq!(engine.state(), TimerState::NoActiveStep);
    assert!(!engine.is_running());
    assert_eq!(active_count(&engine), 0);
}

#[test]
fn test_start_activates_and_runs() {
    let mut engine = TimerEngine::new(create_test_plan(3));
    let first = step_id(&engine, 0);

    let outcome = engine.start(&first);
    assert!(outcome.changed);
    assert_eq!(outcome.event, None);
    assert_eq!(engine.state(), TimerState::ActiveRunning(first.clone()));
    assert!(engine.plan().steps[0].is_active);

    // Starting again is a no-op.
    assert_eq!(engine.start(&first), Outcome::default());
}

#[test]
fn test_start_rejected_while_other_step_active() {
    let mut engine = TimerEngine::new(create_test_plan(3));
    let first = step_id(&engine, 0);
    let second = step_id(&engine, 1);

    let _ = engine.start(&first);
    let outcome = engine.start(&second);

    assert!(!outcome.changed);
    assert_eq!(engine.state(), TimerState::ActiveRunning(first));
    assert_eq!(active_count(&engine), 1);
}

#[test]
fn test_start_unknown_or_completed_step_is_noop() {
    let mut engine = TimerEngine::new(create_test_plan(2));
    let first = step_id(&engine, 0);

    assert!(!engine.start("no-such-step").changed);
    let _ = engine.complete(&first);
    assert!(!engine.start(&first).changed);
    assert_eq!(engine.state(), TimerState::NoActiveStep);
}

#[test]
fn test_toggle_pauses_and_resumes_active_step() {
    let mut engine = TimerEngine::new(create_test_plan(3));
    let first = step_id(&engine, 0);

    let _ = engine.toggle(&first);
    assert_eq!(engine.state(), TimerState::ActiveRunning(first.clone()));

    let _ = engine.toggle(&first);
    assert_eq!(engine.state(), TimerState::ActivePaused(first.clone()));

    let _ = engine.toggle(&first);
    assert_eq!(engine.state(), TimerState::ActiveRunning(first));
}

#[test]
fn test_toggle_other_step_while_active_is_ignored() {
    let mut engine = TimerEngine::new(create_test_plan(3));
    let first = step_id(&engine, 0);
    let second = step_id(&engine, 1);

    let _ = engine.start(&first);
    let _ = engine.tick();
    let before = engine.plan().clone();

    let outcome = engine.toggle(&second);

    assert_eq!(outcome, Outcome::default());
    assert_eq!(engine.plan(), &before);
    assert_eq!(engine.state(), TimerState::ActiveRunning(first));
}

#[test]
fn test_tick_decrements_only_while_running() {
    let mut engine = TimerEngine::new(create_test_plan(2));
    let first = step_id(&engine, 0);

    assert!(!engine.tick().changed);

    let _ = engine.start(&first);
    let _ = engine.tick();
    let _ = engine.tick();
    assert_eq!(engine.plan().steps[0].time_left, 1498);

    let _ = engine.toggle(&first);
    assert!(!engine.tick().changed);
    assert_eq!(engine.plan().steps[0].time_left, 1498);
    assert_eq!(engine.plan().steps[1].time_left, 1500);
}

#[test]
fn test_expiry_fires_exactly_once() {
    let mut engine = TimerEngine::new(create_test_plan(3));
    let first = step_id(&engine, 0);
    let _ = engine.start(&first);

    let mut expiries = 0;
    for _ in 0..1500 {
        if let Some(TimerEvent::Expired { step_id, .. }) = engine.tick().event {
            assert_eq!(step_id, first);
            expiries += 1;
        }
    }
    assert_eq!(expiries, 1);
    assert_eq!(engine.plan().steps[0].time_left, 0);
    assert_eq!(engine.state(), TimerState::ActivePaused(first.clone()));

    // Further ticks at zero fire nothing, even after resuming.
    let _ = engine.toggle(&first);
    for _ in 0..5 {
        assert_eq!(engine.tick().event, None);
    }
    assert_eq!(engine.plan().steps[0].time_left, 0);
    assert_eq!(engine.state(), TimerState::ActivePaused(first));
}

#[test]
fn test_expire_then_complete_first_of_three() {
    let mut engine = TimerEngine::new(create_test_plan(3));
    let first = step_id(&engine, 0);
    let _ = engine.start(&first);
    for _ in 0..1500 {
        let _ = engine.tick();
    }

    let outcome = engine.complete(&first);

    assert!(outcome.changed);
    assert_eq!(outcome.event, None);
    assert_eq!(engine.state(), TimerState::NoActiveStep);
    let step = &engine.plan().steps[0];
    assert!(step.is_completed);
    assert!(!step.is_active);
    assert_eq!(step.time_left, 0);
}

#[test]
fn test_mission_complete_fires_once() {
    let mut engine = TimerEngine::new(create_test_plan(2));
    let first = step_id(&engine, 0);
    let second = step_id(&engine, 1);

    assert_eq!(engine.complete(&first).event, None);
    let outcome = engine.complete(&second);
    assert!(matches!(
        outcome.event,
        Some(TimerEvent::MissionComplete { ref plan_id, .. }) if *plan_id == engine.plan().id
    ));

    // Completing again is a no-op and fires nothing.
    assert_eq!(engine.complete(&second), Outcome::default());
    assert_eq!(engine.complete(&first), Outcome::default());
}

#[test]
fn test_restored_complete_plan_never_signals() {
    let mut plan = create_test_plan(2);
    for step in &mut plan.steps {
        step.is_completed = true;
        step.time_left = 0;
    }
    let mut engine = TimerEngine::new(plan);
    let first = step_id(&engine, 0);
    assert_eq!(engine.complete(&first), Outcome::default());
}

#[test]
fn test_edit_sets_both_durations() {
    let mut engine = TimerEngine::new(create_test_plan(3));
    let second = step_id(&engine, 1);

    let prefill = engine.request_edit(&second);
    assert_eq!(prefill.as_deref(), Some("00:25:00"));
    assert_eq!(engine.state(), TimerState::Editing(second.clone()));

    let outcome = engine.commit_edit(&second, "01:02:03");
    assert!(outcome.changed);
    let step = &engine.plan().steps[1];
    assert_eq!(step.time_left, 3723);
    assert_eq!(step.original_focus_time, 3723);
    assert_eq!(engine.state(), TimerState::NoActiveStep);
}

#[test]
fn test_edit_active_step_pauses_then_resumes() {
    let mut engine = TimerEngine::new(create_test_plan(3));
    let first = step_id(&engine, 0);
    let _ = engine.start(&first);
    let _ = engine.tick();

    engine.request_edit(&first);
    assert_eq!(engine.state(), TimerState::Editing(first.clone()));
    assert!(!engine.tick().changed, "ticking must stop during edits");
    // Toggles are ignored during edits.
    assert!(!engine.toggle(&first).changed);

    let _ = engine.commit_edit(&first, "10:00");
    assert_eq!(engine.state(), TimerState::ActiveRunning(first));
    assert_eq!(engine.plan().steps[0].time_left, 600);
}

#[test]
fn test_edit_other_step_keeps_active_step_paused() {
    let mut engine = TimerEngine::new(create_test_plan(3));
    let first = step_id(&engine, 0);
    let third = step_id(&engine, 2);
    let _ = engine.start(&first);

    engine.request_edit(&third);
    let _ = engine.commit_edit(&third, "5");

    assert_eq!(engine.state(), TimerState::ActivePaused(first));
    assert_eq!(engine.plan().steps[2].time_left, 5);
    assert_eq!(active_count(&engine), 1);
}

#[test]
fn test_invalid_edit_falls_back_to_default() {
    let mut engine = TimerEngine::new(create_test_plan(1));
    let first = step_id(&engine, 0);

    engine.request_edit(&first);
    let _ = engine.commit_edit(&first, "1:2:3:4");
    assert_eq!(engine.plan().steps[0].time_left, 1500);
    assert_eq!(engine.plan().steps[0].original_focus_time, 1500);
}

#[test]
fn test_cancel_edit_leaves_step_untouched() {
    let mut engine = TimerEngine::new(create_test_plan(2));
    let first = step_id(&engine, 0);
    let _ = engine.start(&first);
    let before = engine.plan().clone();

    engine.request_edit(&first);
    assert!(engine.cancel_edit(&first).changed);

    assert_eq!(engine.plan(), &before);
    assert_eq!(engine.state(), TimerState::ActivePaused(first.clone()));
    assert!(!engine.cancel_edit(&first).changed);
}

#[test]
fn test_edit_completed_step_is_rejected() {
    let mut engine = TimerEngine::new(create_test_plan(2));
    let first = step_id(&engine, 0);
    let _ = engine.complete(&first);

    assert_eq!(engine.request_edit(&first), None);
    assert!(!engine.commit_edit(&first, "10:00").changed);
    assert_eq!(engine.plan().steps[0].time_left, 0);
}

#[test]
fn test_abort_clears_active_state_only() {
    let mut engine = TimerEngine::new(create_test_plan(2));
    let first = step_id(&engine, 0);
    let _ = engine.start(&first);
    let _ = engine.tick();

    assert!(engine.abort().changed);
    assert_eq!(engine.state(), TimerState::NoActiveStep);
    assert_eq!(engine.plan().steps[0].time_left, 1499);
    assert_eq!(active_count(&engine), 0);
    assert_eq!(engine.abort(), Outcome::default());
}

#[test]
fn test_restore_resumes_paused() {
    let mut plan = create_test_plan(3);
    plan.steps[0].is_completed = true;
    plan.steps[0].time_left = 0;
    plan.steps[1].is_active = true;
    plan.steps[1].time_left = 900;

    let engine = TimerEngine::new(plan);
    let second = step_id(&engine, 1);
    assert_eq!(engine.state(), TimerState::ActivePaused(second));
    assert!(!engine.is_running());
    assert_eq!(engine.plan().steps[1].time_left, 900);
}

#[test]
fn test_restore_repairs_invariants() {
    let mut plan = create_test_plan(3);
    plan.steps[0].is_completed = true;
    plan.steps[0].is_active = true;
    plan.steps[0].time_left = 42;
    plan.steps[1].is_active = true;
    plan.steps[2].is_active = true;
    plan.steps[2].time_left = 99_999;

    let engine = TimerEngine::new(plan);
    let steps = &engine.plan().steps;

    assert!(!steps[0].is_active);
    assert_eq!(steps[0].time_left, 0);
    assert!(steps[1].is_active);
    assert!(!steps[2].is_active);
    assert_eq!(steps[2].time_left, 1500);
    assert_eq!(engine.state(), TimerState::ActivePaused(steps[1].id.clone()));
}

#[test]
fn test_single_active_step_across_mixed_sequence() {
    let mut engine = TimerEngine::new(create_test_plan(4));
    let ids: Vec<String> = (0..4).map(|i| step_id(&engine, i)).collect();

    // A fixed pseudo-random walk over every transition.
    let mut seed: u32 = 7;
    for _ in 0..2000 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let id = &ids[(seed >> 8) as usize % ids.len()];
        match (seed >> 16) % 8 {
            0 => {
                let _ = engine.start(id);
            }
            1 => {
                let _ = engine.toggle(id);
            }
            2 | 3 => {
                let _ = engine.tick();
            }
            4 => {
                engine.request_edit(id);
            }
            5 => {
                let _ = engine.commit_edit(id, "3");
            }
            6 => {
                let _ = engine.cancel_edit(id);
            }
            _ => {
                if (seed >> 24) % 4 == 0 {
                    let _ = engine.complete(id);
                }
            }
        }

        assert!(active_count(&engine) <= 1);
        for step in &engine.plan().steps {
            assert!(step.time_left <= step.original_focus_time);
            if step.is_completed {
                assert!(!step.is_active);
                assert_eq!(step.time_left, 0);
            }
        }
    }
}

#[test]
fn test_edit_active_step_to_zero_expires_on_next_tick() {
    let mut engine = TimerEngine::new(create_test_plan(2));
    let first = step_id(&engine, 0);
    let _ = engine.start(&first);

    engine.request_edit(&first);
    let _ = engine.commit_edit(&first, "");
    assert_eq!(engine.state(), TimerState::ActiveRunning(first.clone()));
    assert_eq!(engine.plan().steps[0].time_left, 0);

    let events: Vec<_> = (0..3).map(|_| engine.tick().event).collect();
    assert!(matches!(
        &events[0],
        Some(TimerEvent::Expired { step_id, .. }) if *step_id == first
    ));
    assert_eq!(events[1], None);
    assert_eq!(events[2], None);
    assert_eq!(engine.state(), TimerState::ActivePaused(first));
}

#[test]
fn test_new_countdown_after_expiry_fires_again() {
    let mut engine = TimerEngine::new(create_test_plan(2));
    let first = step_id(&engine, 0);
    let _ = engine.start(&first);
    let _ = engine.commit_edit(&first, "1");
    assert!(engine.tick().event.is_some());

    // Giving the step more time starts a fresh countdown.
    engine.request_edit(&first);
    let _ = engine.commit_edit(&first, "2");
    assert_eq!(engine.tick().event, None);
    assert!(matches!(engine.tick().event, Some(TimerEvent::Expired { .. })));
}

#[test]
fn test_restored_step_at_zero_expires_when_resumed() {
    let mut plan = create_test_plan(2);
    plan.steps[0].is_active = true;
    plan.steps[0].time_left = 0;
    let mut engine = TimerEngine::new(plan);
    let first = step_id(&engine, 0);
    assert_eq!(engine.state(), TimerState::ActivePaused(first.clone()));

    let _ = engine.start(&first);
    assert!(matches!(engine.tick().event, Some(TimerEvent::Expired { .. })));
    assert_eq!(engine.state(), TimerState::ActivePaused(first));
}
