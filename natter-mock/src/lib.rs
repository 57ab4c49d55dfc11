use natter_api::{self as api, Comment, CommentId, Error, Time};

/// Plain nested comment list, rebuilt from scratch on each deletion
///
/// Slow but obviously right, so that it can serve as a reference for the
/// arena-based store.
#[derive(Clone, Debug, Default)]
pub struct MockStore(Vec<Comment>);

impl MockStore {
    pub fn new() -> MockStore {
        MockStore(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(Comment::count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        let mut found = false;
        for c in &self.0 {
            c.walk(0, &mut |_, c| found |= c.id == *id);
        }
        found
    }

    /// `id` is the id the store under test picked for this comment
    pub fn add_root_comment(
        &mut self,
        id: CommentId,
        content: &str,
        now: Time,
    ) -> Result<Comment, Error> {
        api::validate_content(content)?;
        let c = Comment::new(id, content.to_owned(), now);
        self.0.push(c.clone());
        Ok(c)
    }

    pub fn add_reply(
        &mut self,
        id: CommentId,
        parent: &CommentId,
        content: &str,
        now: Time,
    ) -> Result<Comment, Error> {
        if !self.contains(parent) {
            return Err(Error::NotFound(*parent));
        }
        api::validate_content(content)?;
        let c = Comment::new(id, content.to_owned(), now);
        Comment::find_in(&mut self.0, parent)
            .ok_or(Error::NotFound(*parent))?
            .replies
            .push(c.clone());
        Ok(c)
    }

    pub fn edit_content(&mut self, id: &CommentId, content: &str) -> Result<(), Error> {
        if !self.contains(id) {
            return Err(Error::NotFound(*id));
        }
        api::validate_content(content)?;
        Comment::find_in(&mut self.0, id)
            .ok_or(Error::NotFound(*id))?
            .content = content.to_owned();
        Ok(())
    }

    pub fn delete_node(&mut self, id: &CommentId) -> Result<(), Error> {
        if !self.contains(id) {
            return Err(Error::NotFound(*id));
        }
        self.0 = without(&self.0, id);
        Ok(())
    }

    pub fn list_ordered(&self) -> Vec<Comment> {
        let mut res = self.0.clone();
        Comment::sort_newest_first(&mut res);
        res
    }
}

fn without(comments: &[Comment], id: &CommentId) -> Vec<Comment> {
    comments
        .iter()
        .filter(|c| c.id != *id)
        .map(|c| Comment {
            id: c.id,
            content: c.content.clone(),
            created_at: c.created_at,
            replies: without(&c.replies, id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn nested_replies_and_delete() {
        let mut m = MockStore::new();
        let now = Utc::now();
        m.add_root_comment(CommentId(1), "Hello", now).unwrap();
        m.add_reply(CommentId(2), &CommentId(1), "Hi", now).unwrap();
        m.add_reply(CommentId(3), &CommentId(2), "Hey", now).unwrap();
        assert_eq!(m.len(), 3);
        m.delete_node(&CommentId(1)).unwrap();
        assert!(m.list_ordered().is_empty());
        assert_eq!(
            m.delete_node(&CommentId(1)),
            Err(Error::NotFound(CommentId(1)))
        );
    }

    #[test]
    fn edit_nested() {
        let mut m = MockStore::new();
        let now = Utc::now();
        m.add_root_comment(CommentId(1), "a", now).unwrap();
        m.add_reply(CommentId(2), &CommentId(1), "b", now).unwrap();
        m.edit_content(&CommentId(2), "c").unwrap();
        assert_eq!(m.list_ordered()[0].replies[0].content, "c");
        assert_eq!(m.edit_content(&CommentId(2), ""), Err(Error::EmptyContent));
    }
}
