use crate::model::{
    AppNotification, AppNotificationKind, ChangesState, DiagnosticEntry, DiagnosticKind,
    DiffAssets, Loadable, RefreshTrigger,
};
use crate::msg::Effect;
use std::time::SystemTime;

pub(super) fn request_refresh(state: &mut ChangesState, trigger: RefreshTrigger) -> Vec<Effect> {
    let Some(repo) = state.repo.as_ref() else {
        return Vec::new();
    };

    state.last_refresh_trigger = Some(trigger);
    if state.refresh.request() {
        log::debug!(
            "loading changes for {} ({trigger:?})",
            repo.workdir.display()
        );
        vec![Effect::LoadChanges {
            generation: state.generation,
            workdir: repo.workdir.clone(),
        }]
    } else {
        log::debug!("change load already in flight; queued follow-up ({trigger:?})");
        Vec::new()
    }
}

/// Drops the diff being shown. Results still in flight for it will no longer match.
pub(super) fn clear_diff(state: &mut ChangesState) {
    state.diff_target = None;
    state.diff = Loadable::NotLoaded;
    state.diff_assets = DiffAssets::default();
}

/// Results are only meaningful for the repository that was active when they were requested.
pub(super) fn is_current(state: &ChangesState, generation: u64, what: &str) -> bool {
    let current = state.repo.is_some() && state.generation == generation;
    if !current {
        log::debug!(
            "discarding {what} for generation {generation} (current {})",
            state.generation
        );
    }
    current
}

pub(super) fn push_notification(
    state: &mut ChangesState,
    kind: AppNotificationKind,
    message: String,
) -> u64 {
    const MAX_NOTIFICATIONS: usize = 50;
    let id = state.next_notification_id;
    state.next_notification_id = state.next_notification_id.wrapping_add(1);
    state.notifications.push(AppNotification {
        id,
        time: SystemTime::now(),
        kind,
        message,
    });
    if state.notifications.len() > MAX_NOTIFICATIONS {
        let extra = state.notifications.len() - MAX_NOTIFICATIONS;
        state.notifications.drain(0..extra);
    }
    id
}

pub(super) fn push_diagnostic(state: &mut ChangesState, kind: DiagnosticKind, message: String) {
    const MAX_DIAGNOSTICS: usize = 200;
    state.diagnostics.push(DiagnosticEntry {
        time: SystemTime::now(),
        kind,
        message,
    });
    if state.diagnostics.len() > MAX_DIAGNOSTICS {
        let extra = state.diagnostics.len() - MAX_DIAGNOSTICS;
        state.diagnostics.drain(0..extra);
    }
}

/// Backend failures end up in front of the user and in the diagnostics log.
pub(super) fn report_failure(state: &mut ChangesState, label: &str, error: &impl std::fmt::Display) {
    let message = format!("{label} failed: {error}");
    log::warn!("{message}");
    push_diagnostic(state, DiagnosticKind::Error, message.clone());
    push_notification(state, AppNotificationKind::Error, message);
}
