use gitpane_core::domain::{
    AssetPreview, ChangeRecord, CommitId, DiffArea, DiffPayload, FileStatusKind,
};
use gitpane_core::error::Error;
use gitpane_core::services::{GitBackend, Result};
use gitpane_state::model::{ChangesState, Loadable};
use gitpane_state::msg::{Msg, StoreEvent};
use gitpane_state::store::ChangesStore;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::{Duration, Instant};

/// In-memory index: staging flips the `staged` flag of the matching records.
struct MemoryBackend {
    records: Mutex<Vec<ChangeRecord>>,
    stage_calls: AtomicUsize,
    branch_refreshes: AtomicUsize,
}

impl MemoryBackend {
    fn new(records: Vec<ChangeRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            stage_calls: AtomicUsize::new(0),
            branch_refreshes: AtomicUsize::new(0),
        }
    }

    fn set_staged(&self, paths: &[String], staged: bool) {
        let mut records = self.records.lock().expect("records lock");
        for record in records.iter_mut() {
            if paths.contains(&record.path) {
                record.staged = staged;
            }
        }
    }
}

impl GitBackend for MemoryBackend {
    fn list_changes(&self, _workdir: &Path) -> Result<Vec<ChangeRecord>> {
        Ok(self.records.lock().expect("records lock").clone())
    }

    fn stage(&self, _workdir: &Path, paths: &[String]) -> Result<()> {
        self.stage_calls.fetch_add(1, Ordering::SeqCst);
        self.set_staged(paths, true);
        Ok(())
    }

    fn unstage(&self, _workdir: &Path, paths: &[String]) -> Result<()> {
        self.set_staged(paths, false);
        Ok(())
    }

    fn get_diff(&self, _workdir: &Path, path: &str, _staged: bool) -> Result<DiffPayload> {
        Ok(DiffPayload::text(format!(
            "diff --git a/{path} b/{path}\n@@ -1 +1 @@\n-old\n+new\n"
        )))
    }

    fn commit(
        &self,
        _workdir: &Path,
        _message: &str,
        _description: &str,
        _amend: bool,
    ) -> Result<CommitId> {
        let mut records = self.records.lock().expect("records lock");
        records.retain(|r| !r.staged || r.status == FileStatusKind::Untracked);
        Ok(CommitId("1234abcd".to_string()))
    }

    fn load_asset_preview(&self, _asset_ref: &str) -> Result<AssetPreview> {
        Err(Error::backend("no previews in memory backend"))
    }

    fn refresh_branch_status(&self, _workdir: &Path) -> Result<()> {
        self.branch_refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn fixture() -> Vec<ChangeRecord> {
    vec![
        ChangeRecord::new("src/a.ts", FileStatusKind::Modified, false),
        ChangeRecord::new("src/b.ts", FileStatusKind::Added, true),
        ChangeRecord::new("readme.txt", FileStatusKind::Untracked, false),
    ]
}

fn wait_until(
    store: &ChangesStore,
    events: &mpsc::Receiver<StoreEvent>,
    what: &str,
    done: impl Fn(&ChangesState) -> bool,
) -> ChangesState {
    let start = Instant::now();
    loop {
        let snapshot = store.snapshot();
        if done(&snapshot) {
            return snapshot;
        }
        assert!(
            start.elapsed() < Duration::from_secs(10),
            "timed out waiting for {what}"
        );
        let _ = events.recv_timeout(Duration::from_millis(50));
    }
}

fn files(state: &ChangesState, area: DiffArea) -> Vec<String> {
    state
        .partition(area)
        .tree()
        .map(|t| t.file_paths().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

fn mount(backend: Arc<MemoryBackend>) -> (ChangesStore, mpsc::Receiver<StoreEvent>) {
    let (store, events) = ChangesStore::new(backend, 2);
    store.dispatch(Msg::SetRepo {
        workdir: PathBuf::from("/work/project"),
        branch: None,
    });
    (store, events)
}

#[test]
fn staging_a_directory_moves_its_files_after_refresh() {
    let backend = Arc::new(MemoryBackend::new(fixture()));
    let (store, events) = mount(Arc::clone(&backend));
    wait_until(&store, &events, "initial load", ChangesState::is_authoritative);

    store.dispatch(Msg::ToggleSelection {
        area: DiffArea::Unstaged,
        path: "src".to_string(),
    });
    store.dispatch(Msg::StageSelection);

    let state = wait_until(&store, &events, "staged refresh", |s| {
        s.is_authoritative() && files(s, DiffArea::Unstaged) == vec!["readme.txt"]
    });
    assert_eq!(files(&state, DiffArea::Staged), vec!["src/a.ts", "src/b.ts"]);
    assert!(state.unstaged.selection.is_empty());
    assert_eq!(backend.stage_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn commit_round_trip_clears_draft_and_refreshes_branch() {
    let backend = Arc::new(MemoryBackend::new(fixture()));
    let (store, events) = mount(Arc::clone(&backend));
    wait_until(&store, &events, "initial load", ChangesState::is_authoritative);

    store.dispatch(Msg::SetCommitMessage("Add b".to_string()));
    store.dispatch(Msg::Commit);

    let state = wait_until(&store, &events, "commit", |s| {
        s.last_commit.is_some() && s.is_authoritative() && !s.ops_in_flight.commit
    });
    assert!(state.commit.message.is_empty());
    assert!(files(&state, DiffArea::Staged).is_empty());
    assert_eq!(files(&state, DiffArea::Unstaged), vec!["src/a.ts", "readme.txt"]);

    wait_until(&store, &events, "branch status", |_| {
        backend.branch_refreshes.load(Ordering::SeqCst) == 1
    });
}

#[test]
fn selected_diff_is_parsed_in_the_store() {
    let backend = Arc::new(MemoryBackend::new(fixture()));
    let (store, events) = mount(backend);
    wait_until(&store, &events, "initial load", ChangesState::is_authoritative);

    store.dispatch(Msg::SelectDiff {
        area: DiffArea::Unstaged,
        path: "src/a.ts".to_string(),
    });

    let state = wait_until(&store, &events, "diff", |s| s.diff.is_ready());
    let Loadable::Ready(view) = &state.diff else {
        unreachable!();
    };
    assert!(!view.is_binary());
}
