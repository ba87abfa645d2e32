use gitpane_core::commit::CommitDraft;
use gitpane_core::diff::DiffView;
use gitpane_core::domain::*;
use gitpane_core::error::ValidationError;
use gitpane_core::path_tree::PathTree;
use gitpane_core::selection::{ExpandState, SelectionSet};
use std::sync::Arc;
use std::time::SystemTime;

#[derive(Clone, Debug)]
pub struct ChangesState {
    pub repo: Option<RepoSpec>,
    pub branch: Option<BranchIdentity>,
    /// Bumped on every repository switch; results tagged with an older value are dropped.
    pub generation: u64,

    pub changes: Loadable<Arc<Vec<ChangeRecord>>>,
    pub staged: Partition,
    pub unstaged: Partition,
    pub refresh: RefreshGate,
    pub last_refresh_trigger: Option<RefreshTrigger>,

    pub diff_target: Option<DiffTarget>,
    pub diff: Loadable<Arc<DiffView>>,
    pub diff_assets: DiffAssets,

    pub commit: CommitDraft,
    pub commit_error: Option<ValidationError>,
    pub last_commit: Option<CommitId>,
    pub ops_in_flight: OpsInFlight,

    pub notifications: Vec<AppNotification>,
    pub next_notification_id: u64,
    pub diagnostics: Vec<DiagnosticEntry>,
}

impl Default for ChangesState {
    fn default() -> Self {
        Self {
            repo: None,
            branch: None,
            generation: 0,
            changes: Loadable::NotLoaded,
            staged: Partition::new(DiffArea::Staged),
            unstaged: Partition::new(DiffArea::Unstaged),
            refresh: RefreshGate::default(),
            last_refresh_trigger: None,
            diff_target: None,
            diff: Loadable::NotLoaded,
            diff_assets: DiffAssets::default(),
            commit: CommitDraft::default(),
            commit_error: None,
            last_commit: None,
            ops_in_flight: OpsInFlight::default(),
            notifications: Vec::new(),
            next_notification_id: 1,
            diagnostics: Vec::new(),
        }
    }
}

impl ChangesState {
    pub fn partition(&self, area: DiffArea) -> &Partition {
        match area {
            DiffArea::Staged => &self.staged,
            DiffArea::Unstaged => &self.unstaged,
        }
    }

    pub fn partition_mut(&mut self, area: DiffArea) -> &mut Partition {
        match area {
            DiffArea::Staged => &mut self.staged,
            DiffArea::Unstaged => &mut self.unstaged,
        }
    }

    /// False while a change-list load is running or queued; partition trees may be stale then.
    pub fn is_authoritative(&self) -> bool {
        self.changes.is_ready() && self.refresh.is_idle()
    }
}

#[derive(Clone, Debug)]
pub struct Partition {
    pub area: DiffArea,
    pub tree: Loadable<Arc<PathTree>>,
    pub selection: SelectionSet,
    pub expand: ExpandState,
}

impl Partition {
    pub fn new(area: DiffArea) -> Self {
        Self {
            area,
            tree: Loadable::NotLoaded,
            selection: SelectionSet::default(),
            expand: ExpandState::default(),
        }
    }

    pub fn tree(&self) -> Option<&PathTree> {
        match &self.tree {
            Loadable::Ready(tree) => Some(tree.as_ref()),
            _ => None,
        }
    }

    pub fn file_count(&self) -> usize {
        self.tree().map_or(0, PathTree::len)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.area);
    }
}

/// At most one change-list load runs at a time; requests made meanwhile collapse into a single
/// follow-up load.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RefreshGate {
    in_flight: bool,
    pending: bool,
}

impl RefreshGate {
    /// Returns true when the caller should start a load now.
    pub fn request(&mut self) -> bool {
        if self.in_flight {
            self.pending = true;
            false
        } else {
            self.in_flight = true;
            true
        }
    }

    /// Marks the running load as done. Returns true when a queued request should start now.
    pub fn finish(&mut self) -> bool {
        if self.pending {
            self.pending = false;
            true
        } else {
            self.in_flight = false;
            false
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        !self.in_flight && !self.pending
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RefreshTrigger {
    Mount,
    WindowFocused,
    DocumentVisible,
    Staged,
    Unstaged,
    Committed,
    Manual,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OpsInFlight {
    pub stage: bool,
    pub unstage: bool,
    pub commit: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiffAssets {
    pub old: AssetSlot,
    pub new: AssetSlot,
}

impl DiffAssets {
    pub fn slot(&self, side: AssetSide) -> &AssetSlot {
        match side {
            AssetSide::Old => &self.old,
            AssetSide::New => &self.new,
        }
    }

    pub fn slot_mut(&mut self, side: AssetSide) -> &mut AssetSlot {
        match side {
            AssetSide::Old => &mut self.old,
            AssetSide::New => &mut self.new,
        }
    }
}

/// One side of a binary diff. `Absent` means there is nothing to show on that side, e.g. the
/// old side of a newly added file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum AssetSlot {
    #[default]
    Absent,
    Preview(Loadable<AssetPreview>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppNotification {
    pub id: u64,
    pub time: SystemTime,
    pub kind: AppNotificationKind,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AppNotificationKind {
    Info,
    Error,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiagnosticEntry {
    pub time: SystemTime,
    pub kind: DiagnosticKind,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DiagnosticKind {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Loadable<T> {
    NotLoaded,
    Loading,
    Ready(T),
    Error(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }
}
