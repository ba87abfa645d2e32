use super::util::{clear_diff, is_current, push_diagnostic, report_failure, request_refresh};
use crate::model::{ChangesState, DiagnosticKind, Loadable, OpsInFlight, RefreshTrigger};
use crate::msg::Effect;
use gitpane_core::domain::{BranchIdentity, ChangeRecord, DiffArea, RepoSpec};
use gitpane_core::error::Error;
use gitpane_core::path_tree::{PathTree, TreeNode};
use gitpane_core::selection::SelectionSet;
use std::path::PathBuf;
use std::sync::Arc;

pub(super) fn set_repo(
    state: &mut ChangesState,
    workdir: PathBuf,
    branch: Option<BranchIdentity>,
) -> Vec<Effect> {
    let same_repo = state.repo.as_ref().is_some_and(|r| r.workdir == workdir);
    if same_repo {
        state.branch = branch;
        return request_refresh(state, RefreshTrigger::Mount);
    }

    log::info!("switching changes view to {}", workdir.display());
    reset_repo_state(state);
    state.repo = Some(RepoSpec { workdir });
    state.branch = branch;
    state.changes = Loadable::Loading;
    state.staged.tree = Loadable::Loading;
    state.unstaged.tree = Loadable::Loading;
    request_refresh(state, RefreshTrigger::Mount)
}

pub(super) fn close_repo(state: &mut ChangesState) -> Vec<Effect> {
    reset_repo_state(state);
    state.repo = None;
    state.branch = None;
    Vec::new()
}

/// Everything tied to one repository goes away before anything of the next one is requested.
fn reset_repo_state(state: &mut ChangesState) {
    state.generation = state.generation.wrapping_add(1);
    state.changes = Loadable::NotLoaded;
    state.staged.reset();
    state.unstaged.reset();
    state.refresh.reset();
    state.last_refresh_trigger = None;
    clear_diff(state);
    state.commit.clear();
    state.commit_error = None;
    state.last_commit = None;
    state.ops_in_flight = OpsInFlight::default();
}

pub(super) fn changes_loaded(
    state: &mut ChangesState,
    generation: u64,
    result: Result<Vec<ChangeRecord>, Error>,
) -> Vec<Effect> {
    if !is_current(state, generation, "change list") {
        return Vec::new();
    }

    match result {
        Ok(records) => apply_changes(state, records),
        Err(e) => {
            report_failure(state, "Loading changes", &e);
            let message = e.to_string();
            if !state.changes.is_ready() {
                state.changes = Loadable::Error(message.clone());
            }
            // Trees that never loaded would otherwise stay `Loading`; ready ones keep their rows.
            for partition in [&mut state.staged, &mut state.unstaged] {
                if matches!(partition.tree, Loadable::Loading | Loadable::NotLoaded) {
                    partition.tree = Loadable::Error(message.clone());
                }
            }
        }
    }

    if state.refresh.finish() {
        let Some(repo) = state.repo.as_ref() else {
            return Vec::new();
        };
        log::debug!("running queued change load for {}", repo.workdir.display());
        return vec![Effect::LoadChanges {
            generation: state.generation,
            workdir: repo.workdir.clone(),
        }];
    }
    Vec::new()
}

fn apply_changes(state: &mut ChangesState, records: Vec<ChangeRecord>) {
    for area in [DiffArea::Staged, DiffArea::Unstaged] {
        let built = PathTree::build(records.iter().filter(|r| r.area() == area));
        match built {
            Ok(tree) => {
                let partition = state.partition_mut(area);
                let dropped = partition.selection.retain_files(&tree);
                partition.expand.retain_dirs(&tree);
                partition.tree = Loadable::Ready(Arc::new(tree));
                if dropped > 0 {
                    log::debug!("dropped {dropped} vanished selection entries ({area:?})");
                }
            }
            Err(e) => {
                // Only this partition shows the error; the other one is still usable.
                let message = e.to_string();
                log::warn!("{area:?} change tree rejected: {message}");
                push_diagnostic(state, DiagnosticKind::Error, message.clone());
                state.partition_mut(area).tree = Loadable::Error(message);
            }
        }
    }

    if let Some(target) = state.diff_target.as_ref() {
        let still_listed = state
            .partition(target.area)
            .tree()
            .is_some_and(|tree| tree.contains_file(&target.path));
        if !still_listed {
            log::debug!("selected diff {} left its partition", target.path);
            clear_diff(state);
        }
    }

    state.changes = Loadable::Ready(Arc::new(records));
}

pub(super) fn toggle_selection(state: &mut ChangesState, area: DiffArea, path: &str) -> Vec<Effect> {
    let partition = state.partition_mut(area);
    let Some(tree) = partition.tree() else {
        return Vec::new();
    };
    let Some(node) = tree.find(path) else {
        log::debug!("toggle for unknown path {path} ignored");
        return Vec::new();
    };
    let next = partition.selection.toggle(path, node);
    partition.selection = next;
    Vec::new()
}

pub(super) fn select_all(state: &mut ChangesState, area: DiffArea) -> Vec<Effect> {
    let partition = state.partition_mut(area);
    let Some(all) = partition.tree().map(SelectionSet::select_all) else {
        return Vec::new();
    };
    partition.selection = all;
    Vec::new()
}

pub(super) fn toggle_expanded(state: &mut ChangesState, area: DiffArea, path: &str) -> Vec<Effect> {
    let partition = state.partition_mut(area);
    let is_dir = partition
        .tree()
        .and_then(|tree| tree.find(path))
        .is_some_and(TreeNode::is_dir);
    if is_dir {
        partition.expand.toggle(path);
    }
    Vec::new()
}
