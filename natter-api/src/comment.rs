use std::{fmt, num::ParseIntError, str::FromStr};

use crate::Time;

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = ParseIntError;

    /// Accepts both `42` and `#42`
    fn from_str(s: &str) -> Result<CommentId, ParseIntError> {
        s.strip_prefix('#').unwrap_or(s).parse().map(CommentId)
    }
}

/// A comment along with all its replies, as handed out to the presentation layer
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub created_at: Time,

    /// Replies to this comment
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn new(id: CommentId, content: String, created_at: Time) -> Comment {
        Comment {
            id,
            content,
            created_at,
            replies: Vec::new(),
        }
    }

    pub fn find_in<'a>(comments: &'a mut [Comment], id: &CommentId) -> Option<&'a mut Comment> {
        for c in comments.iter_mut() {
            if c.id == *id {
                return Some(c);
            }
            if let Some(res) = Comment::find_in(&mut c.replies, id) {
                return Some(res);
            }
        }
        None
    }

    /// Sorts `comments` newest first, and all their replies recursively
    pub fn sort_newest_first(comments: &mut [Comment]) {
        comments.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        for c in comments.iter_mut() {
            Comment::sort_newest_first(&mut c.replies);
        }
    }

    /// Number of comments in this thread, including this one
    pub fn count(&self) -> usize {
        1 + self.replies.iter().map(Comment::count).sum::<usize>()
    }

    /// Calls `f` on every comment of this thread in pre-order, with its depth
    pub fn walk<'a>(&'a self, depth: usize, f: &mut impl FnMut(usize, &'a Comment)) {
        f(depth, self);
        for r in &self.replies {
            r.walk(depth + 1, f);
        }
    }
}
