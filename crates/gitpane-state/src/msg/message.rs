use crate::model::RefreshTrigger;
use gitpane_core::domain::*;
use gitpane_core::error::Error;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexAction {
    Stage,
    Unstage,
}

impl IndexAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stage => "Stage",
            Self::Unstage => "Unstage",
        }
    }
}

#[derive(Debug)]
pub enum Msg {
    SetRepo {
        workdir: PathBuf,
        branch: Option<BranchIdentity>,
    },
    CloseRepo,
    Refresh {
        trigger: RefreshTrigger,
    },
    ChangesLoaded {
        generation: u64,
        result: Result<Vec<ChangeRecord>, Error>,
    },

    ToggleSelection {
        area: DiffArea,
        path: String,
    },
    SelectAll {
        area: DiffArea,
    },
    ClearSelection {
        area: DiffArea,
    },
    ToggleExpanded {
        area: DiffArea,
        path: String,
    },

    StagePaths {
        paths: Vec<String>,
    },
    UnstagePaths {
        paths: Vec<String>,
    },
    StageSelection,
    UnstageSelection,
    StageAll,
    UnstageAll,
    IndexActionFinished {
        generation: u64,
        action: IndexAction,
        result: Result<(), Error>,
    },
    DiscardPaths {
        paths: Vec<String>,
    },

    SelectDiff {
        area: DiffArea,
        path: String,
    },
    ClearDiffSelection,
    DiffLoaded {
        generation: u64,
        target: DiffTarget,
        result: Result<DiffPayload, Error>,
    },
    AssetPreviewLoaded {
        generation: u64,
        target: DiffTarget,
        side: AssetSide,
        result: Result<AssetPreview, Error>,
    },

    SetCommitMessage(String),
    SetCommitDescription(String),
    SetCommitAmend(bool),
    Commit,
    CommitFinished {
        generation: u64,
        result: Result<CommitId, Error>,
    },
    BranchStatusRefreshed {
        generation: u64,
        result: Result<(), Error>,
    },

    DismissNotification {
        id: u64,
    },
}
