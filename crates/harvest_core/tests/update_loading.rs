use std::sync::Once;
use std::time::Duration;

use harvest_core::{update, Effect, HarvestRun, LoadState, Msg, Stage, Timings};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(harvest_logging::initialize_for_tests);
}

fn timings(stall_threshold: u32, max_attempts: Option<u32>) -> Timings {
    Timings {
        start_delay: Duration::from_millis(3_000),
        readiness_poll_interval: Duration::from_millis(1_000),
        readiness_max_attempts: max_attempts,
        scroll_interval: Duration::from_millis(2_000),
        stall_threshold,
        settle_delay: Duration::from_millis(6_000),
    }
}

fn started(timings: Timings) -> HarvestRun {
    let (run, effects) = update(HarvestRun::new(timings), Msg::Start);
    assert_eq!(
        effects,
        vec![Effect::ProbeContainer {
            after: Duration::from_millis(3_000)
        }]
    );
    run
}

fn found(run: HarvestRun) -> HarvestRun {
    let (run, effects) = update(run, Msg::ContainerProbed { found: true });
    assert_eq!(
        effects,
        vec![Effect::ScrollAndCount {
            after: Duration::from_millis(2_000)
        }]
    );
    run
}

/// Feeds counts and returns the tick index at which loading completed.
fn completion_tick(mut run: HarvestRun, counts: &[usize]) -> Option<usize> {
    for (tick, &count) in counts.iter().enumerate() {
        let (next, effects) = update(run, Msg::ItemsCounted { count });
        run = next;
        if effects.contains(&Effect::ListItems) {
            return Some(tick);
        }
        assert_eq!(
            effects,
            vec![Effect::ScrollAndCount {
                after: Duration::from_millis(2_000)
            }]
        );
    }
    None
}

#[test]
fn start_is_only_honoured_once() {
    init_logging();
    let run = started(timings(3, None));
    let (run, effects) = update(run, Msg::Start);
    assert!(effects.is_empty());
    assert_eq!(run.stage(), Stage::Loading(LoadState::Waiting { attempts: 0 }));
}

#[test]
fn missing_container_is_polled_at_the_poll_interval() {
    init_logging();
    let run = started(timings(3, None));
    let (run, effects) = update(run, Msg::ContainerProbed { found: false });
    assert_eq!(
        effects,
        vec![Effect::ProbeContainer {
            after: Duration::from_millis(1_000)
        }]
    );
    assert_eq!(run.stage(), Stage::Loading(LoadState::Waiting { attempts: 1 }));
}

#[test]
fn readiness_bound_aborts_the_run() {
    init_logging();
    let mut run = started(timings(3, Some(3)));
    for _ in 0..2 {
        let (next, effects) = update(run, Msg::ContainerProbed { found: false });
        assert_eq!(effects.len(), 1);
        run = next;
    }
    let (run, effects) = update(run, Msg::ContainerProbed { found: false });
    assert_eq!(effects, vec![Effect::ContainerMissing { attempts: 3 }]);
    assert_eq!(run.stage(), Stage::Aborted);

    let (_, effects) = update(run, Msg::ContainerProbed { found: true });
    assert!(effects.is_empty());
}

#[test]
fn loading_completes_after_threshold_quiet_ticks() {
    init_logging();
    let run = found(started(timings(3, None)));
    assert_eq!(completion_tick(run, &[10, 20, 20, 20, 20]), Some(4));
}

#[test]
fn loading_never_completes_while_count_grows() {
    init_logging();
    let run = found(started(timings(3, None)));
    let growing: Vec<usize> = (1..=200).collect();
    assert_eq!(completion_tick(run, &growing), None);
}

#[test]
fn completion_requires_the_latest_ticks_to_be_quiet() {
    init_logging();
    // Growth sequences paired with the first tick where the last 3 ticks saw no increase.
    let cases: Vec<(Vec<usize>, Option<usize>)> = vec![
        (vec![0, 0, 0], Some(2)),
        (vec![4, 4, 5, 5, 5], None),
        (vec![4, 4, 5, 5, 5, 5], Some(5)),
        (vec![4, 4, 4, 4], Some(3)),
        (vec![9, 3, 3, 3], Some(3)),
        (vec![2, 1, 2, 3, 3, 3, 3], Some(6)),
    ];
    for (counts, expected) in cases {
        let run = found(started(timings(3, None)));
        assert_eq!(completion_tick(run, &counts), expected, "counts {counts:?}");
    }
}

#[test]
fn view_tracks_stall_progress() {
    init_logging();
    let run = found(started(timings(5, None)));
    let (run, _) = update(run, Msg::ItemsCounted { count: 7 });
    let (run, _) = update(run, Msg::ItemsCounted { count: 7 });
    let view = run.view();
    assert_eq!(view.item_count, 7);
    assert_eq!(view.stalled, 1);
    assert_eq!(view.stall_threshold, 5);
}

#[test]
fn counts_after_completion_do_not_reopen_loading() {
    init_logging();
    let run = found(started(timings(1, None)));
    let (run, effects) = update(run, Msg::ItemsCounted { count: 0 });
    assert_eq!(effects, vec![Effect::ListItems]);
    let (run, effects) = update(run, Msg::ItemsCounted { count: 12 });
    assert!(effects.is_empty());
    assert_eq!(run.stage(), Stage::Loading(LoadState::Complete { count: 0 }));
}
