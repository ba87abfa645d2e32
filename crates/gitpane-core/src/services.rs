use crate::domain::*;
use crate::error::Error;
use std::path::Path;

pub type Result<T> = std::result::Result<T, Error>;

/// Version-control collaborator. Calls are blocking and are always issued from worker threads,
/// never from the store thread.
pub trait GitBackend: Send + Sync {
    fn list_changes(&self, workdir: &Path) -> Result<Vec<ChangeRecord>>;

    /// Paths are staged in a single call.
    fn stage(&self, workdir: &Path, paths: &[String]) -> Result<()>;
    fn unstage(&self, workdir: &Path, paths: &[String]) -> Result<()>;

    fn get_diff(&self, workdir: &Path, path: &str, staged: bool) -> Result<DiffPayload>;

    fn commit(
        &self,
        workdir: &Path,
        message: &str,
        description: &str,
        amend: bool,
    ) -> Result<CommitId>;

    fn load_asset_preview(&self, asset_ref: &str) -> Result<AssetPreview>;

    /// Recomputes ahead/behind counters for the checked-out branch.
    fn refresh_branch_status(&self, workdir: &Path) -> Result<()>;
}
