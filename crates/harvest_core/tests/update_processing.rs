use harvest_core::{
    update, Effect, HarvestRun, ItemOutcome, Msg, RunSummary, SkipReason, Stage, Timings, Visit,
};
use pretty_assertions::assert_eq;

fn loaded(count: usize) -> (HarvestRun, Vec<Effect>) {
    let run = HarvestRun::new(Timings::immediate(1));
    let (run, _) = update(run, Msg::Start);
    let (run, _) = update(run, Msg::ContainerProbed { found: true });
    let (run, effects) = update(run, Msg::ItemsCounted { count: 0 });
    assert_eq!(effects, vec![Effect::ListItems]);
    update(run, Msg::ItemsListed { count })
}

fn saved(snapshot: &str) -> ItemOutcome {
    ItemOutcome::Saved {
        snapshot: snapshot.to_string(),
        assets_saved: 0,
        assets_failed: 0,
    }
}

/// Completes every visit with `outcome_for` and returns the visits in order.
fn drain(
    mut run: HarvestRun,
    mut effects: Vec<Effect>,
    outcome_for: impl Fn(Visit) -> ItemOutcome,
) -> (Vec<Visit>, RunSummary) {
    let mut visits = Vec::new();
    loop {
        assert_eq!(effects.len(), 1, "one effect per step: {effects:?}");
        match effects.remove(0) {
            Effect::Visit(visit) => {
                assert_eq!(run.stage(), Stage::Processing { current: visit });
                visits.push(visit);
                let outcome = outcome_for(visit);
                let (next, next_effects) = update(run, Msg::VisitFinished { visit, outcome });
                run = next;
                effects = next_effects;
            }
            Effect::Finished(summary) => {
                assert_eq!(run.stage(), Stage::Finished);
                return (visits, summary);
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }
}

#[test]
fn visits_run_from_last_rendered_to_first() {
    let (run, effects) = loaded(3);
    let (visits, summary) = drain(run, effects, |v| saved(&format!("{}", v.reverse_index)));

    assert_eq!(
        visits,
        vec![
            Visit { render_index: 2, reverse_index: 1 },
            Visit { render_index: 1, reverse_index: 2 },
            Visit { render_index: 0, reverse_index: 3 },
        ]
    );
    assert_eq!(summary.items_total, 3);
    assert_eq!(summary.saved, 3);
}

#[test]
fn every_list_size_visits_each_item_once() {
    for count in 0..25 {
        let (run, effects) = loaded(count);
        let (visits, summary) = drain(run, effects, |_| saved("x"));
        let reverse: Vec<usize> = visits.iter().map(|v| v.reverse_index).collect();
        assert_eq!(reverse, (1..=count).collect::<Vec<_>>());
        assert_eq!(summary.visited(), count);
    }
}

#[test]
fn empty_list_finishes_immediately() {
    let (run, effects) = loaded(0);
    assert_eq!(effects, vec![Effect::Finished(RunSummary::default())]);
    assert_eq!(run.stage(), Stage::Finished);
}

#[test]
fn skipped_and_failed_items_do_not_stop_later_visits() {
    let (run, effects) = loaded(4);
    let (visits, summary) = drain(run, effects, |v| match v.reverse_index {
        2 => ItemOutcome::Skipped(SkipReason::ActivationHandleMissing),
        3 => ItemOutcome::Failed {
            reason: "capture failed".to_string(),
        },
        _ => ItemOutcome::Saved {
            snapshot: "s".to_string(),
            assets_saved: 2,
            assets_failed: 1,
        },
    });

    assert_eq!(visits.len(), 4);
    assert_eq!(summary.saved, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.assets_saved, 4);
    assert_eq!(summary.assets_failed, 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].reverse_index, 3);
}

#[test]
fn stale_visit_reports_are_ignored() {
    let (run, effects) = loaded(2);
    assert_eq!(
        effects,
        vec![Effect::Visit(Visit {
            render_index: 1,
            reverse_index: 1
        })]
    );

    let stale = Visit {
        render_index: 0,
        reverse_index: 2,
    };
    let (run, effects) = update(
        run,
        Msg::VisitFinished {
            visit: stale,
            outcome: saved("wrong"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(run.summary().visited(), 0);
}

#[test]
fn listing_is_only_accepted_once_loading_completes() {
    let run = HarvestRun::new(Timings::immediate(1));
    let (run, _) = update(run, Msg::Start);
    let (run, effects) = update(run, Msg::ItemsListed { count: 3 });
    assert!(effects.is_empty());
    assert_eq!(run.summary().items_total, 0);
}
