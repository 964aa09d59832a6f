// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! End-to-end scheduling behaviour: resume counts, round-robin order,
//! delegation transparency, completion detection and failure policies.

use std::cell::RefCell;
use std::rc::Rc;

use rondo_rt::{
    from_fn, Countdown, Delegate, ErrorKind, FailurePolicy, Outcome, RoutineExt, Scheduler,
    Stages, Step, Task, TaskId, TaskState,
};

fn traced() -> Scheduler {
    Scheduler::builder().record_trace(true).build()
}

fn traced_with(policy: FailurePolicy) -> Scheduler {
    Scheduler::builder()
        .record_trace(true)
        .failure_policy(policy)
        .build()
}

/// A task that suspends `k` times and then fails on its last resume.
fn failing_after(k: u32) -> Task {
    let mut left = k;
    Task::named(
        "flaky",
        from_fn(move |_| {
            if left == 0 {
                return Err("simulated fault".into());
            }
            left -= 1;
            Ok(Step::Suspended)
        }),
    )
}

#[test]
fn total_resumes_is_sum_of_suspensions_plus_one() {
    let counts = [0u32, 1, 4, 2, 7, 3];
    let sched = traced();
    let ids: Vec<TaskId> = counts
        .iter()
        .map(|&k| sched.register(Task::new(Countdown::new(k))).unwrap())
        .collect();

    let report = sched.run().unwrap();
    let expected: u64 = counts.iter().map(|&k| u64::from(k) + 1).sum();
    assert_eq!(report.turns, expected);
    assert_eq!(report.completed, counts.len());

    // First resumes follow registration order.
    let firsts: Vec<TaskId> = report.trace.iter().take(ids.len()).map(|t| t.task).collect();
    assert_eq!(firsts, ids);

    for (id, &k) in ids.iter().zip(&counts) {
        assert_eq!(report.turns_of(*id).count() as u64, u64::from(k) + 1);
    }
}

#[test]
fn round_robin_fairness() {
    let sched = traced();
    let a = sched.register(Task::named("a", Countdown::new(4))).unwrap();
    let b = sched.register(Task::named("b", Countdown::new(4))).unwrap();
    let c = sched.register(Task::named("c", Countdown::new(4))).unwrap();

    let report = sched.run().unwrap();
    let order: Vec<TaskId> = report.trace.iter().map(|t| t.task).collect();
    let expected: Vec<TaskId> = (0..5).flat_map(|_| [a, b, c]).collect();
    assert_eq!(order, expected);

    // a's (r+1)-th resume always precedes b's.
    let a_seqs: Vec<u64> = report.turns_of(a).map(|t| t.seq).collect();
    let b_seqs: Vec<u64> = report.turns_of(b).map(|t| t.seq).collect();
    assert!(a_seqs.iter().zip(&b_seqs).all(|(x, y)| x < y));
}

#[test]
fn scenario_single_task_one_suspension() {
    let sched = Scheduler::new();
    sched.register(Task::new(Countdown::new(1))).unwrap();
    let report = sched.run().unwrap();
    assert_eq!(report.turns, 2);
    assert!(sched.is_empty());
}

#[test]
fn scenario_three_tasks_two_three_five() {
    let sched = traced();
    let first = sched.register(Task::named("two", Countdown::new(2))).unwrap();
    let second = sched.register(Task::named("three", Countdown::new(3))).unwrap();
    let five = sched.register(Task::named("five", Countdown::new(5))).unwrap();

    let report = sched.run().unwrap();
    assert_eq!(report.turns, 13);
    assert_eq!(report.last_finished(), Some(five));

    let completion_order: Vec<TaskId> = report
        .trace
        .iter()
        .filter(|t| t.outcome == Outcome::Completed)
        .map(|t| t.task)
        .collect();
    assert_eq!(completion_order, vec![first, second, five]);
}

#[test]
fn scenario_whole_delegation_is_transparent() {
    let inline = traced();
    inline.register(Task::named("inline", Countdown::new(1))).unwrap();
    let inline_report = inline.run().unwrap();

    let delegating = traced();
    delegating.register(Task::named("delegating", Delegate::new(Countdown::new(1)))).unwrap();
    let delegated_report = delegating.run().unwrap();

    assert_eq!(inline_report.turns, delegated_report.turns);
    let outcomes = |r: &rondo_rt::RunReport| r.trace.iter().map(|t| t.outcome).collect::<Vec<_>>();
    assert_eq!(outcomes(&inline_report), outcomes(&delegated_report));
}

#[test]
fn delegation_suspends_k_times_before_proceeding() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sched = Scheduler::new();

    let (before, after) = (log.clone(), log.clone());
    let body = Stages::new()
        .stage(move |_| {
            before.borrow_mut().push("before");
            Ok(())
        })
        .then(Countdown::new(3))
        .then(from_fn(move |_| {
            after.borrow_mut().push("after");
            Ok(Step::Completed)
        }));
    let id = sched.register(Task::named("outer", body)).unwrap();

    let mut suspensions = 0;
    while let Some(turn) = sched.turn().unwrap() {
        assert_eq!(turn.task, id);
        if turn.outcome == Outcome::Suspended {
            suspensions += 1;
        }
    }
    // One from the stage, three forwarded from the sub-task.
    assert_eq!(suspensions, 4);
    assert_eq!(*log.borrow(), vec!["before", "after"]);
}

#[test]
fn completed_task_cannot_be_resumed_and_others_are_untouched() {
    let mut done = Task::new(Countdown::new(0));
    assert_eq!(done.resume().unwrap(), Step::Completed);

    let sched = Scheduler::new();
    let other = sched.register(Task::new(Countdown::new(1))).unwrap();

    let err = done.resume().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(done.state(), TaskState::Completed);
    assert_eq!(sched.queued(), vec![other]);
    assert_eq!(sched.run().unwrap().turns, 2);
}

#[test]
fn finished_task_is_refused_and_run_still_isolates() {
    let sched = traced_with(FailurePolicy::Isolate);
    let a = sched.register(Task::named("a", Countdown::new(2))).unwrap();

    let mut done = Task::named("done", Countdown::new(0));
    done.resume().unwrap();
    let err = sched.register(done).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let bad = sched.register(failing_after(0)).unwrap();
    let c = sched.register(Task::named("c", Countdown::new(2))).unwrap();
    assert_eq!(sched.queued(), vec![a, bad, c]);

    let report = sched.run().unwrap();
    assert_eq!(report.completed, 2);
    assert_eq!(report.failures.len(), 1);
    assert!(sched.is_empty());
}

#[test]
fn abort_policy_stops_at_first_failure() {
    let sched = traced_with(FailurePolicy::Abort);
    let a = sched.register(Task::named("a", Countdown::new(3))).unwrap();
    let bad = sched.register(failing_after(1)).unwrap();
    let c = sched.register(Task::named("c", Countdown::new(3))).unwrap();

    let err = sched.run().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TaskExecutionFailure);
    assert_eq!(err.task_id(), Some(bad));

    // Failed task dropped, survivors keep their order, scheduler usable again.
    assert!(!sched.contains(bad));
    assert_eq!(sched.queued(), vec![c, a]);
    assert!(!sched.is_running());

    let report = sched.run().unwrap();
    assert_eq!(report.completed, 2);
    assert!(report.is_clean());
    // Only the turns of this run are in its trace.
    assert_eq!(report.trace.len() as u64, report.turns);
    assert!(report.trace.iter().all(|t| t.task == a || t.task == c));
}

#[test]
fn isolate_policy_keeps_running_the_rest() {
    let sched = traced_with(FailurePolicy::Isolate);
    let a = sched.register(Task::named("a", Countdown::new(3))).unwrap();
    let bad = sched.register(failing_after(1)).unwrap();
    let c = sched.register(Task::named("c", Countdown::new(3))).unwrap();

    let report = sched.run().unwrap();
    assert_eq!(report.completed, 2);
    assert_eq!(report.failures.len(), 1);

    let failure = &report.failures[0];
    assert_eq!(failure.task, bad);
    assert_eq!(failure.name, "flaky");
    assert_eq!(failure.error.kind(), ErrorKind::TaskExecutionFailure);
    assert!(failure.error.to_string().contains("simulated fault"));

    assert_eq!(report.turns_of(a).count(), 4);
    assert_eq!(report.turns_of(c).count(), 4);
    assert_eq!(report.turns_of(bad).last().map(|t| t.outcome), Some(Outcome::Failed));
    assert!(sched.is_empty());
}

#[test]
fn run_returns_only_when_everything_finished() {
    let finished = Rc::new(RefCell::new(0));
    let sched = Scheduler::new();
    for k in 0..10 {
        let finished = finished.clone();
        sched
            .register(Task::new(Countdown::new(k).then(from_fn(move |_| {
                *finished.borrow_mut() += 1;
                Ok(Step::Completed)
            }))))
            .unwrap();
    }
    sched.run().unwrap();
    assert_eq!(*finished.borrow(), 10);
    assert!(sched.is_empty());
}
