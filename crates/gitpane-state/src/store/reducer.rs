use crate::model::ChangesState;
use crate::msg::{Effect, Msg};

mod actions;
mod diff_selection;
mod partitions;
mod util;

pub(super) fn reduce(state: &mut ChangesState, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::SetRepo { workdir, branch } => partitions::set_repo(state, workdir, branch),
        Msg::CloseRepo => partitions::close_repo(state),
        Msg::Refresh { trigger } => util::request_refresh(state, trigger),
        Msg::ChangesLoaded { generation, result } => {
            partitions::changes_loaded(state, generation, result)
        }

        Msg::ToggleSelection { area, path } => partitions::toggle_selection(state, area, &path),
        Msg::SelectAll { area } => partitions::select_all(state, area),
        Msg::ClearSelection { area } => {
            state.partition_mut(area).selection.clear();
            Vec::new()
        }
        Msg::ToggleExpanded { area, path } => partitions::toggle_expanded(state, area, &path),

        Msg::StagePaths { paths } => actions::stage_paths(state, paths),
        Msg::UnstagePaths { paths } => actions::unstage_paths(state, paths),
        Msg::StageSelection => actions::stage_selection(state),
        Msg::UnstageSelection => actions::unstage_selection(state),
        Msg::StageAll => actions::stage_all(state),
        Msg::UnstageAll => actions::unstage_all(state),
        Msg::IndexActionFinished {
            generation,
            action,
            result,
        } => actions::index_action_finished(state, generation, action, result),
        Msg::DiscardPaths { paths } => actions::discard_paths(state, paths),

        Msg::SelectDiff { area, path } => diff_selection::select_diff(state, area, path),
        Msg::ClearDiffSelection => {
            util::clear_diff(state);
            Vec::new()
        }
        Msg::DiffLoaded {
            generation,
            target,
            result,
        } => diff_selection::diff_loaded(state, generation, target, result),
        Msg::AssetPreviewLoaded {
            generation,
            target,
            side,
            result,
        } => diff_selection::asset_preview_loaded(state, generation, target, side, result),

        Msg::SetCommitMessage(message) => {
            state.commit.message = message;
            state.commit_error = None;
            Vec::new()
        }
        Msg::SetCommitDescription(description) => {
            state.commit.description = description;
            Vec::new()
        }
        Msg::SetCommitAmend(amend) => {
            state.commit.amend = amend;
            Vec::new()
        }
        Msg::Commit => actions::commit(state),
        Msg::CommitFinished { generation, result } => {
            actions::commit_finished(state, generation, result)
        }
        Msg::BranchStatusRefreshed { generation, result } => {
            actions::branch_status_refreshed(state, generation, result)
        }

        Msg::DismissNotification { id } => {
            state.notifications.retain(|n| n.id != id);
            Vec::new()
        }
    }
}
