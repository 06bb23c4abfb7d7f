use crate::{Effect, HarvestRun, LoadAction, LoadState, Msg, Stage};

/// Pure update function: applies a message to the run and returns the effects to execute.
///
/// Observations that do not fit the current stage are ignored, so a stale
/// report can never start a second visit or restart loading.
pub fn update(mut run: HarvestRun, msg: Msg) -> (HarvestRun, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => {
            if run.stage() == Stage::Idle {
                run.set_stage(Stage::Loading(LoadState::default()));
                vec![Effect::ProbeContainer {
                    after: run.timings().start_delay,
                }]
            } else {
                Vec::new()
            }
        }
        Msg::ContainerProbed { found } => match run.load_state() {
            Some(state) => {
                let max_attempts = run.timings().readiness_max_attempts;
                let (next, action) = state.on_probe(found, max_attempts);
                apply_load_action(&mut run, next, action)
            }
            None => Vec::new(),
        },
        Msg::ItemsCounted { count } => match run.load_state() {
            Some(state) => {
                let threshold = run.timings().stall_threshold;
                let (next, action) = state.on_count(count, threshold);
                apply_load_action(&mut run, next, action)
            }
            None => Vec::new(),
        },
        Msg::ItemsListed { count } => match run.stage() {
            Stage::Loading(LoadState::Complete { .. }) => {
                run.plan_visits(count);
                next_visit(&mut run)
            }
            _ => Vec::new(),
        },
        Msg::VisitFinished { visit, outcome } => match run.stage() {
            Stage::Processing { current } if current == visit => {
                run.record_outcome(visit, &outcome);
                next_visit(&mut run)
            }
            _ => Vec::new(),
        },
    };

    (run, effects)
}

fn apply_load_action(run: &mut HarvestRun, next: LoadState, action: LoadAction) -> Vec<Effect> {
    match action {
        LoadAction::Ignore => return Vec::new(),
        LoadAction::GiveUp { attempts } => {
            run.set_stage(Stage::Aborted);
            return vec![Effect::ContainerMissing { attempts }];
        }
        _ => {}
    }

    run.set_stage(Stage::Loading(next));
    match action {
        LoadAction::Probe => vec![Effect::ProbeContainer {
            after: run.timings().readiness_poll_interval,
        }],
        LoadAction::Tick => vec![Effect::ScrollAndCount {
            after: run.timings().scroll_interval,
        }],
        LoadAction::Complete { .. } => vec![Effect::ListItems],
        LoadAction::Ignore | LoadAction::GiveUp { .. } => Vec::new(),
    }
}

fn next_visit(run: &mut HarvestRun) -> Vec<Effect> {
    match run.advance() {
        Some(visit) => vec![Effect::Visit(visit)],
        None => vec![Effect::Finished(run.summary().clone())],
    }
}
