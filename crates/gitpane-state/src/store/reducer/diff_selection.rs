use super::util::{is_current, report_failure};
use crate::model::{AssetSlot, ChangesState, DiffAssets, Loadable};
use crate::msg::Effect;
use gitpane_core::diff::DiffView;
use gitpane_core::domain::{AssetPreview, AssetSide, DiffArea, DiffPayload, DiffTarget};
use gitpane_core::error::Error;
use std::sync::Arc;

pub(super) fn select_diff(state: &mut ChangesState, area: DiffArea, path: String) -> Vec<Effect> {
    let Some(repo) = state.repo.as_ref() else {
        return Vec::new();
    };

    let target = DiffTarget::new(path, area);
    let workdir = repo.workdir.clone();
    state.diff_target = Some(target.clone());
    state.diff = Loadable::Loading;
    state.diff_assets = DiffAssets::default();

    vec![Effect::LoadDiff {
        generation: state.generation,
        workdir,
        target,
    }]
}

/// A result is shown only if it still answers the current selection; anything else was
/// superseded while in flight.
fn answers_selection(state: &ChangesState, generation: u64, target: &DiffTarget) -> bool {
    if !is_current(state, generation, "diff") {
        return false;
    }
    let matches = state.diff_target.as_ref() == Some(target);
    if !matches {
        log::debug!("discarding superseded diff for {}", target.path);
    }
    matches
}

pub(super) fn diff_loaded(
    state: &mut ChangesState,
    generation: u64,
    target: DiffTarget,
    result: Result<DiffPayload, Error>,
) -> Vec<Effect> {
    if !answers_selection(state, generation, &target) {
        return Vec::new();
    }

    let payload = match result {
        Ok(payload) => payload,
        Err(e) => {
            report_failure(state, "Loading diff", &e);
            state.diff = Loadable::Error(e.to_string());
            return Vec::new();
        }
    };

    let view = DiffView::from_payload(payload);
    let mut effects = Vec::new();
    if let DiffView::Binary {
        old_asset_ref,
        new_asset_ref,
    } = &view
    {
        for (side, asset_ref) in [
            (AssetSide::Old, old_asset_ref),
            (AssetSide::New, new_asset_ref),
        ] {
            let Some(asset_ref) = asset_ref else {
                *state.diff_assets.slot_mut(side) = AssetSlot::Absent;
                continue;
            };
            *state.diff_assets.slot_mut(side) = AssetSlot::Preview(Loadable::Loading);
            effects.push(Effect::LoadAssetPreview {
                generation,
                target: target.clone(),
                side,
                asset_ref: asset_ref.clone(),
            });
        }
    }

    state.diff = Loadable::Ready(Arc::new(view));
    effects
}

pub(super) fn asset_preview_loaded(
    state: &mut ChangesState,
    generation: u64,
    target: DiffTarget,
    side: AssetSide,
    result: Result<AssetPreview, Error>,
) -> Vec<Effect> {
    if !answers_selection(state, generation, &target) {
        return Vec::new();
    }

    let loaded = match result {
        Ok(preview) => Loadable::Ready(preview),
        Err(e) => {
            report_failure(state, "Loading preview", &e);
            Loadable::Error(e.to_string())
        }
    };
    *state.diff_assets.slot_mut(side) = AssetSlot::Preview(loaded);
    Vec::new()
}
