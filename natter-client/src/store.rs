use chrono::Utc;

use crate::{
    api::{self, Comment, CommentId, Error, Time},
    CommentNode, Forest, IdAllocator, IdScheme,
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Config {
    pub id_scheme: IdScheme,
}

/// Owns the comments of one widget instance
///
/// Every operation either fully succeeds or leaves the forest untouched.
#[derive(Clone, Debug)]
pub struct CommentTreeStore {
    forest: Forest,
    ids: IdAllocator,

    /// Bumped on each successful mutation
    generation: u64,
}

impl Default for CommentTreeStore {
    fn default() -> CommentTreeStore {
        CommentTreeStore::new()
    }
}

impl CommentTreeStore {
    pub fn new() -> CommentTreeStore {
        CommentTreeStore::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> CommentTreeStore {
        CommentTreeStore {
            forest: Forest::new(),
            ids: IdAllocator::new(config.id_scheme),
            generation: 0,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// A copy of the current forest that later mutations will not affect
    pub fn snapshot(&self) -> Forest {
        self.forest.clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: &CommentId) -> Option<&CommentNode> {
        self.forest.get(id)
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        self.forest.contains(id)
    }

    pub fn len(&self) -> usize {
        self.forest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    pub fn add_root_comment(&mut self, content: &str) -> Result<CommentNode, Error> {
        self.add_root_comment_at(content, Utc::now())
    }

    pub fn add_root_comment_at(&mut self, content: &str, now: Time) -> Result<CommentNode, Error> {
        api::validate_content(content)?;
        self.create(None, content, now)
    }

    pub fn add_reply(&mut self, parent: &CommentId, content: &str) -> Result<CommentNode, Error> {
        self.add_reply_at(parent, content, Utc::now())
    }

    pub fn add_reply_at(
        &mut self,
        parent: &CommentId,
        content: &str,
        now: Time,
    ) -> Result<CommentNode, Error> {
        if !self.forest.contains(parent) {
            return Err(Error::NotFound(*parent));
        }
        api::validate_content(content)?;
        self.create(Some(*parent), content, now)
    }

    fn create(
        &mut self,
        parent: Option<CommentId>,
        content: &str,
        now: Time,
    ) -> Result<CommentNode, Error> {
        let node = CommentNode::new(self.ids.next(&now), parent, content.to_owned(), now);
        self.forest.insert(node.clone())?;
        self.generation += 1;
        tracing::trace!(id = %node.id, parent = ?parent, "added comment");
        Ok(node)
    }

    pub fn edit_content(&mut self, id: &CommentId, content: &str) -> Result<(), Error> {
        if !self.forest.contains(id) {
            return Err(Error::NotFound(*id));
        }
        api::validate_content(content)?;
        self.forest.set_content(id, content.to_owned())?;
        self.generation += 1;
        tracing::trace!(id = %id, "edited comment");
        Ok(())
    }

    /// Removes `id` along with all its replies
    pub fn delete_node(&mut self, id: &CommentId) -> Result<(), Error> {
        let removed = self.forest.remove(id)?;
        self.generation += 1;
        tracing::trace!(id = %id, num_removed = removed.len(), "deleted comment");
        Ok(())
    }

    /// All the threads, newest first at every level
    pub fn list_ordered(&self) -> Vec<Comment> {
        self.forest.list_ordered()
    }

    /// Drops all the comments; ids handed out so far are still never reused
    pub fn clear(&mut self) {
        if !self.forest.is_empty() {
            self.forest = Forest::new();
            self.generation += 1;
        }
    }
}
