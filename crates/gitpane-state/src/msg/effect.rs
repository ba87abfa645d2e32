use gitpane_core::domain::*;
use std::path::PathBuf;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Effect {
    LoadChanges {
        generation: u64,
        workdir: PathBuf,
    },
    Stage {
        generation: u64,
        workdir: PathBuf,
        paths: Vec<String>,
    },
    Unstage {
        generation: u64,
        workdir: PathBuf,
        paths: Vec<String>,
    },
    LoadDiff {
        generation: u64,
        workdir: PathBuf,
        target: DiffTarget,
    },
    LoadAssetPreview {
        generation: u64,
        target: DiffTarget,
        side: AssetSide,
        asset_ref: String,
    },
    Commit {
        generation: u64,
        workdir: PathBuf,
        message: String,
        description: String,
        amend: bool,
    },
    RefreshBranchStatus {
        generation: u64,
        workdir: PathBuf,
    },
}
