use crate::msg::{Effect, IndexAction, Msg};
use gitpane_core::error::Error;
use gitpane_core::services::{GitBackend, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, mpsc};

use super::executor::{TaskExecutor, panic_message};

fn send(msg_tx: &mpsc::Sender<Msg>, msg: Msg) {
    if msg_tx.send(msg).is_err() {
        log::debug!("store is gone; dropping backend result");
    }
}

/// A panicking backend call still answers its request, so in-flight flags and the refresh gate
/// are released.
fn guarded<T>(call: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("backend {call} panicked: {message}");
            Err(Error::backend(format!("{call} panicked: {message}")))
        }
    }
}

pub(super) fn schedule_effect(
    executor: &TaskExecutor,
    backend: &Arc<dyn GitBackend>,
    msg_tx: mpsc::Sender<Msg>,
    effect: Effect,
) {
    let backend = Arc::clone(backend);
    match effect {
        Effect::LoadChanges {
            generation,
            workdir,
        } => {
            executor.spawn("list_changes", move || {
                let result = guarded("list_changes", || backend.list_changes(&workdir));
                send(&msg_tx, Msg::ChangesLoaded { generation, result });
            });
        }

        Effect::Stage {
            generation,
            workdir,
            paths,
        } => {
            executor.spawn("stage", move || {
                let paths = dedup(paths);
                let result = guarded("stage", || backend.stage(&workdir, &paths));
                send(
                    &msg_tx,
                    Msg::IndexActionFinished {
                        generation,
                        action: IndexAction::Stage,
                        result,
                    },
                );
            });
        }

        Effect::Unstage {
            generation,
            workdir,
            paths,
        } => {
            executor.spawn("unstage", move || {
                let paths = dedup(paths);
                let result = guarded("unstage", || backend.unstage(&workdir, &paths));
                send(
                    &msg_tx,
                    Msg::IndexActionFinished {
                        generation,
                        action: IndexAction::Unstage,
                        result,
                    },
                );
            });
        }

        Effect::LoadDiff {
            generation,
            workdir,
            target,
        } => {
            executor.spawn("get_diff", move || {
                let result = guarded("get_diff", || {
                    backend.get_diff(&workdir, &target.path, target.area.is_staged())
                });
                send(
                    &msg_tx,
                    Msg::DiffLoaded {
                        generation,
                        target,
                        result,
                    },
                );
            });
        }

        Effect::LoadAssetPreview {
            generation,
            target,
            side,
            asset_ref,
        } => {
            executor.spawn("load_asset_preview", move || {
                let result =
                    guarded("load_asset_preview", || backend.load_asset_preview(&asset_ref));
                send(
                    &msg_tx,
                    Msg::AssetPreviewLoaded {
                        generation,
                        target,
                        side,
                        result,
                    },
                );
            });
        }

        Effect::Commit {
            generation,
            workdir,
            message,
            description,
            amend,
        } => {
            executor.spawn("commit", move || {
                let result = guarded("commit", || {
                    backend.commit(&workdir, &message, &description, amend)
                });
                send(&msg_tx, Msg::CommitFinished { generation, result });
            });
        }

        Effect::RefreshBranchStatus {
            generation,
            workdir,
        } => {
            executor.spawn("refresh_branch_status", move || {
                let result =
                    guarded("refresh_branch_status", || backend.refresh_branch_status(&workdir));
                send(&msg_tx, Msg::BranchStatusRefreshed { generation, result });
            });
        }
    }
}

/// Keeps first-seen order so the backend sees paths the way the tree listed them.
fn dedup(paths: Vec<String>) -> Vec<String> {
    let mut seen = rustc_hash::FxHashSet::default();
    paths
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{dedup, guarded};
    use gitpane_core::error::ErrorKind;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let paths = vec!["b", "a", "b", "c", "a"]
            .into_iter()
            .map(str::to_string)
            .collect();
        assert_eq!(dedup(paths), vec!["b", "a", "c"]);
    }

    #[test]
    fn panicking_backend_call_becomes_an_error() {
        let result: gitpane_core::services::Result<()> =
            guarded("stage", || panic!("index.lock exists"));
        let err = result.expect_err("panic should map to an error");
        assert_eq!(
            err.kind(),
            &ErrorKind::Backend("stage panicked: index.lock exists".to_string())
        );
    }
}
