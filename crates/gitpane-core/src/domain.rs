use std::path::PathBuf;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RepoSpec {
    pub workdir: PathBuf,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BranchIdentity(pub String);

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CommitId(pub String);

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FileStatusKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Unmerged,
    Untracked,
    Ignored,
    Unknown,
}

impl FileStatusKind {
    /// Single-character badge shown next to a file row.
    pub fn letter(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
            Self::Copied => 'C',
            Self::Unmerged => 'U',
            Self::Untracked => '?',
            Self::Ignored => '!',
            Self::Unknown => '·',
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChangeRecord {
    pub path: String,
    pub status: FileStatusKind,
    pub staged: bool,
}

impl ChangeRecord {
    pub fn new(path: impl Into<String>, status: FileStatusKind, staged: bool) -> Self {
        Self {
            path: path.into(),
            status,
            staged,
        }
    }

    /// Untracked files always belong to the unstaged partition, whatever the backend says.
    pub fn area(&self) -> DiffArea {
        if self.staged && self.status != FileStatusKind::Untracked {
            DiffArea::Staged
        } else {
            DiffArea::Unstaged
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DiffArea {
    Staged,
    Unstaged,
}

impl DiffArea {
    pub fn is_staged(self) -> bool {
        matches!(self, Self::Staged)
    }
}

/// Identity of a diff request: the selected file and the partition it was selected in.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiffTarget {
    pub path: String,
    pub area: DiffArea,
}

impl DiffTarget {
    pub fn new(path: impl Into<String>, area: DiffArea) -> Self {
        Self {
            path: path.into(),
            area,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiffPayload {
    pub raw_text: Option<String>,
    pub old_asset_ref: Option<String>,
    pub new_asset_ref: Option<String>,
}

impl DiffPayload {
    pub fn text(raw: impl Into<String>) -> Self {
        Self {
            raw_text: Some(raw.into()),
            old_asset_ref: None,
            new_asset_ref: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AssetSide {
    Old,
    New,
}

/// Renderable image reference returned by the backend (typically a data URI).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetPreview(pub String);
