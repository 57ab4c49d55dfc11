use crate::api::{CommentId, Time};

/// A comment as stored in the forest arena
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentNode {
    pub id: CommentId,

    /// Comment this one replies to, `None` for top-level comments
    pub parent: Option<CommentId>,

    pub content: String,
    pub created_at: Time,

    /// Replies, in insertion order
    pub children: im::Vector<CommentId>,
}

impl CommentNode {
    pub fn new(
        id: CommentId,
        parent: Option<CommentId>,
        content: String,
        created_at: Time,
    ) -> CommentNode {
        CommentNode {
            id,
            parent,
            content,
            created_at,
            children: im::Vector::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
