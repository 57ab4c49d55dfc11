use crate::CommentId;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Comment content is empty")]
    EmptyContent,

    #[error("Comment content is too long: {len} characters, at most {max} are allowed")]
    ContentTooLong { len: usize, max: usize },

    #[error("Comment not found {0}")]
    NotFound(CommentId),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The submitted content was rejected
    Validation,

    /// The targeted comment is not in the forest
    NotFound,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyContent => ErrorKind::Validation,
            Error::ContentTooLong { .. } => ErrorKind::Validation,
            Error::NotFound(_) => ErrorKind::NotFound,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
