use super::util::{
    clear_diff, is_current, push_diagnostic, push_notification, report_failure, request_refresh,
};
use crate::model::{AppNotificationKind, ChangesState, DiagnosticKind, RefreshTrigger};
use crate::msg::{Effect, IndexAction};
use gitpane_core::domain::{CommitId, DiffArea};
use gitpane_core::error::{Error, ErrorKind};

pub(super) fn stage_paths(state: &mut ChangesState, paths: Vec<String>) -> Vec<Effect> {
    start_index_action(state, IndexAction::Stage, paths)
}

pub(super) fn unstage_paths(state: &mut ChangesState, paths: Vec<String>) -> Vec<Effect> {
    start_index_action(state, IndexAction::Unstage, paths)
}

pub(super) fn stage_selection(state: &mut ChangesState) -> Vec<Effect> {
    let paths = selected_paths(state, DiffArea::Unstaged);
    start_index_action(state, IndexAction::Stage, paths)
}

pub(super) fn unstage_selection(state: &mut ChangesState) -> Vec<Effect> {
    let paths = selected_paths(state, DiffArea::Staged);
    start_index_action(state, IndexAction::Unstage, paths)
}

pub(super) fn stage_all(state: &mut ChangesState) -> Vec<Effect> {
    let paths = all_paths(state, DiffArea::Unstaged);
    start_index_action(state, IndexAction::Stage, paths)
}

pub(super) fn unstage_all(state: &mut ChangesState) -> Vec<Effect> {
    let paths = all_paths(state, DiffArea::Staged);
    start_index_action(state, IndexAction::Unstage, paths)
}

fn selected_paths(state: &ChangesState, area: DiffArea) -> Vec<String> {
    let partition = state.partition(area);
    partition
        .tree()
        .map(|tree| partition.selection.in_tree_order(tree))
        .unwrap_or_default()
}

fn all_paths(state: &ChangesState, area: DiffArea) -> Vec<String> {
    state
        .partition(area)
        .tree()
        .map(|tree| tree.file_paths().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

/// All paths go to the backend in one call, whatever their number.
fn start_index_action(
    state: &mut ChangesState,
    action: IndexAction,
    paths: Vec<String>,
) -> Vec<Effect> {
    let Some(repo) = state.repo.as_ref() else {
        return Vec::new();
    };
    if paths.is_empty() {
        return Vec::new();
    }

    let in_flight = match action {
        IndexAction::Stage => &mut state.ops_in_flight.stage,
        IndexAction::Unstage => &mut state.ops_in_flight.unstage,
    };
    if *in_flight {
        log::debug!("{} already running; request ignored", action.label());
        return Vec::new();
    }
    *in_flight = true;

    let generation = state.generation;
    let workdir = repo.workdir.clone();
    log::debug!("{} {} path(s)", action.label(), paths.len());
    vec![match action {
        IndexAction::Stage => Effect::Stage {
            generation,
            workdir,
            paths,
        },
        IndexAction::Unstage => Effect::Unstage {
            generation,
            workdir,
            paths,
        },
    }]
}

pub(super) fn index_action_finished(
    state: &mut ChangesState,
    generation: u64,
    action: IndexAction,
    result: Result<(), Error>,
) -> Vec<Effect> {
    if !is_current(state, generation, action.label()) {
        return Vec::new();
    }

    match action {
        IndexAction::Stage => state.ops_in_flight.stage = false,
        IndexAction::Unstage => state.ops_in_flight.unstage = false,
    }

    match result {
        Ok(()) => clear_diff(state),
        Err(e) => report_failure(state, action.label(), &e),
    }

    // The backend may have applied part of a failed batch, so reload in both cases.
    let trigger = match action {
        IndexAction::Stage => RefreshTrigger::Staged,
        IndexAction::Unstage => RefreshTrigger::Unstaged,
    };
    request_refresh(state, trigger)
}

pub(super) fn discard_paths(state: &mut ChangesState, paths: Vec<String>) -> Vec<Effect> {
    let error = Error::new(ErrorKind::NotImplemented("Discarding changes"));
    log::info!("discard requested for {} path(s): {error}", paths.len());
    push_notification(state, AppNotificationKind::Error, error.to_string());
    Vec::new()
}

pub(super) fn commit(state: &mut ChangesState) -> Vec<Effect> {
    let Some(repo) = state.repo.as_ref() else {
        return Vec::new();
    };
    if state.ops_in_flight.commit {
        return Vec::new();
    }

    if let Err(e) = state.commit.validate(state.staged.file_count()) {
        log::debug!("commit rejected locally: {e}");
        state.commit_error = Some(e);
        return Vec::new();
    }

    let effect = Effect::Commit {
        generation: state.generation,
        workdir: repo.workdir.clone(),
        message: state.commit.message.clone(),
        description: state.commit.description.clone(),
        amend: state.commit.amend,
    };
    state.commit_error = None;
    state.ops_in_flight.commit = true;
    vec![effect]
}

pub(super) fn commit_finished(
    state: &mut ChangesState,
    generation: u64,
    result: Result<CommitId, Error>,
) -> Vec<Effect> {
    if !is_current(state, generation, "commit result") {
        return Vec::new();
    }
    state.ops_in_flight.commit = false;

    let commit_id = match result {
        Ok(id) => id,
        Err(e) => {
            report_failure(state, "Commit", &e);
            return Vec::new();
        }
    };

    log::info!("created commit {}", commit_id.as_ref());
    push_diagnostic(
        state,
        DiagnosticKind::Info,
        format!("Committed {}", commit_id.as_ref()),
    );
    state.commit.clear();
    state.last_commit = Some(commit_id);
    clear_diff(state);

    let mut effects = request_refresh(state, RefreshTrigger::Committed);
    if let Some(repo) = state.repo.as_ref() {
        effects.push(Effect::RefreshBranchStatus {
            generation,
            workdir: repo.workdir.clone(),
        });
    }
    effects
}

pub(super) fn branch_status_refreshed(
    state: &mut ChangesState,
    generation: u64,
    result: Result<(), Error>,
) -> Vec<Effect> {
    if !is_current(state, generation, "branch status") {
        return Vec::new();
    }
    if let Err(e) = result {
        report_failure(state, "Refreshing branch status", &e);
    }
    Vec::new()
}
