use std::fmt;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn tree_conflict(file: impl Into<String>, descendant: impl Into<String>) -> Self {
        Self::new(ErrorKind::TreeConflict {
            file: file.into(),
            descendant: descendant.into(),
        })
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Backend(message.into()))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::TreeConflict { file, descendant } => write!(
                f,
                "`{file}` is listed as a file but is also a directory of `{descendant}`"
            ),
            ErrorKind::InvalidPath(path) => write!(f, "invalid change path `{path}`"),
            ErrorKind::Validation(v) => write!(f, "{v}"),
            ErrorKind::NotImplemented(what) => write!(f, "{what} is not implemented yet"),
            ErrorKind::Backend(message) => write!(f, "{message}"),
            ErrorKind::Unsupported(what) => write!(f, "unsupported: {what}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        Self::new(ErrorKind::Validation(value))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    /// `file` is a leaf in the change list and a strict path prefix of `descendant`.
    TreeConflict {
        file: String,
        descendant: String,
    },
    InvalidPath(String),
    Validation(ValidationError),
    NotImplemented(&'static str),
    Backend(String),
    Unsupported(&'static str),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationError {
    NothingStaged,
    EmptyCommitMessage,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingStaged => write!(f, "nothing is staged for commit"),
            Self::EmptyCommitMessage => write!(f, "commit message is empty"),
        }
    }
}
