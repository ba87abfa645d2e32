use crate::error::ValidationError;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommitDraft {
    pub message: String,
    pub description: String,
    pub amend: bool,
}

impl CommitDraft {
    /// Checks the local preconditions of a commit. Nothing here talks to the backend.
    pub fn validate(&self, staged_files: usize) -> Result<(), ValidationError> {
        if staged_files == 0 {
            return Err(ValidationError::NothingStaged);
        }
        if self.message.trim().is_empty() {
            return Err(ValidationError::EmptyCommitMessage);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
