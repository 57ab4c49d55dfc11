pub use chrono;

pub type Time = chrono::DateTime<chrono::Utc>;

mod comment;
pub use comment::{Comment, CommentId};

mod error;
pub use error::{Error, ErrorKind};

/// Maximum length of a comment, in characters
pub const MAX_CONTENT_LEN: usize = 100;

/// Checks that `content` can be the body of a comment or reply
///
/// Only emptiness and length are checked: a whitespace-only comment is valid.
pub fn validate_content(content: &str) -> Result<(), Error> {
    if content.is_empty() {
        return Err(Error::EmptyContent);
    }
    // count chars, not bytes, so that non-ascii text gets the same limit
    let len = content.chars().count();
    if len > MAX_CONTENT_LEN {
        return Err(Error::ContentTooLong {
            len,
            max: MAX_CONTENT_LEN,
        });
    }
    Ok(())
}
