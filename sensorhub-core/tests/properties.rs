//! Property tests for the scheduling invariants

mod common;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool as StdAtomicBool, Ordering as StdOrdering};
use std::sync::Arc;
use std::thread;

use common::{board, MemoryFiles, MemoryNet};
use proptest::prelude::*;
use sensorhub_core::{
    Detection, DispatchConfig, InterruptOutcome, Job, MotionState, QueueId, SinkKind,
};

#[derive(Debug, Clone)]
enum Op {
    Tick(u64),
    Complete,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u64..3000).prop_map(Op::Tick),
        Just(Op::Complete),
    ]
}

proptest! {
    /// While a slot's job is in flight, no second job for it is queued
    #[test]
    fn at_most_one_job_in_flight(
        period_s in 1u32..4,
        ops in prop::collection::vec(op(), 1..120),
    ) {
        let b = board(DispatchConfig::default());
        let mut files = MemoryFiles::default();
        let mut net = MemoryNet::default();
        b.hub.start_periodic("hts221", SinkKind::File, "temp.log", period_s, 0).unwrap();
        b.hub.start_periodic("hts221", SinkKind::Network, "host/env", period_s, 0).unwrap();

        let mut now = 0u64;
        let mut queued: Vec<Job> = Vec::new();
        for op in ops {
            match op {
                Op::Tick(dt) => {
                    now += dt;
                    b.hub.on_timer_tick(now);
                    while let Some(job) = b.hub.try_next_job(QueueId::Periodic) {
                        queued.push(job);
                    }
                    let mut per_sink: HashMap<SinkKind, usize> = HashMap::new();
                    for job in &queued {
                        *per_sink.entry(job.sink_kind()).or_default() += 1;
                    }
                    for count in per_sink.values() {
                        prop_assert!(*count <= 1);
                    }
                }
                Op::Complete => {
                    if !queued.is_empty() {
                        let job = queued.remove(0);
                        let _ = b.hub.execute(&job, &mut files, &mut net);
                    }
                }
            }
        }
    }

    /// Every motion job carries a pair that was published as one snapshot
    #[test]
    fn motion_jobs_carry_published_pairs(
        cmds in prop::collection::vec((0u8..3, 0u8..3), 1..60),
    ) {
        let b = board(DispatchConfig {
            min_network_interval_ms: 0,
            ..Default::default()
        });
        let mut published = HashMap::new();
        published.insert(b.hub.motion_state().generation, b.hub.motion_state().state);

        let mut now = 0;
        for (cmd, interrupts) in cmds {
            match cmd {
                0 => b
                    .hub
                    .start_motion(Detection::Step, SinkKind::Network, "example.com/steps")
                    .unwrap(),
                1 => b
                    .hub
                    .start_motion(Detection::Tap, SinkKind::File, "tap.log")
                    .unwrap(),
                _ => b.hub.stop_motion().unwrap(),
            }
            let snap = b.hub.motion_state();
            published.insert(snap.generation, snap.state);

            for _ in 0..interrupts {
                now += 1;
                b.hub.on_motion_interrupt(now);
            }
            while let Some(job) = b.hub.try_next_job(QueueId::Motion) {
                let Job::MotionEvent { detection, action, generation, .. } = job else {
                    panic!("periodic job on the motion queue");
                };
                let expected = published.get(&generation).cloned();
                prop_assert_eq!(expected, Some(MotionState::Armed { detection, action }));
            }
        }
    }
}

#[test]
fn concurrent_mode_switches_never_tear() {
    let b = board(DispatchConfig {
        min_network_interval_ms: 0,
        ..Default::default()
    });
    let hub = Arc::new(b.hub);
    let done = Arc::new(StdAtomicBool::new(false));

    let writer = {
        let hub = Arc::clone(&hub);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 0..2000 {
                if i % 2 == 0 {
                    hub.start_motion(Detection::Step, SinkKind::Network, "example.com/steps")
                        .unwrap();
                } else {
                    hub.start_motion(Detection::Tap, SinkKind::File, "tap.log")
                        .unwrap();
                }
            }
            hub.stop_motion().unwrap();
            done.store(true, StdOrdering::Release);
        })
    };

    let mut now = 0;
    while !done.load(StdOrdering::Acquire) {
        now += 1;
        if hub.on_motion_interrupt(now) != InterruptOutcome::Enqueued {
            continue;
        }
        if let Some(Job::MotionEvent {
            detection, action, ..
        }) = hub.try_next_job(QueueId::Motion)
        {
            match detection {
                Detection::Step => {
                    assert_eq!(action.kind(), SinkKind::Network);
                    assert_eq!(action.destination(), "example.com/steps");
                }
                Detection::Tap => {
                    assert_eq!(action.kind(), SinkKind::File);
                    assert_eq!(action.destination(), "tap.log");
                }
            }
        }
    }
    writer.join().unwrap();
    assert_eq!(hub.motion_state().state, MotionState::Disabled);
}
