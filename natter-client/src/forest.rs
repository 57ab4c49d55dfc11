use std::cmp::Reverse;

use crate::{
    api::{Comment, CommentId, Error},
    CommentNode,
};

/// An immutable view of all the comments of a widget
///
/// Cloning a `Forest` is cheap: the clone shares every node with the original,
/// and later mutations of one only copy the nodes they touch.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Forest {
    nodes: im::OrdMap<CommentId, CommentNode>,

    /// Top-level comments, in insertion order
    roots: im::Vector<CommentId>,
}

impl Forest {
    pub fn new() -> Forest {
        Forest::default()
    }

    /// Number of comments, replies included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &CommentId) -> Option<&CommentNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        self.nodes.contains_key(id)
    }

    fn node(&self, id: &CommentId) -> Result<&CommentNode, Error> {
        self.nodes.get(id).ok_or(Error::NotFound(*id))
    }

    /// Top-level comments in insertion order
    pub fn roots(&self) -> impl Iterator<Item = &CommentNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Top-level comments, newest first
    pub fn roots_ordered(&self) -> Vec<&CommentNode> {
        let mut res = self.roots().collect::<Vec<_>>();
        res.sort_unstable_by_key(|c| Reverse(c.id));
        res
    }

    /// Direct replies to `id`, newest first
    pub fn children_ordered(&self, id: &CommentId) -> Result<Vec<&CommentNode>, Error> {
        let mut res = self
            .node(id)?
            .children
            .iter()
            .filter_map(|c| self.nodes.get(c))
            .collect::<Vec<_>>();
        res.sort_unstable_by_key(|c| Reverse(c.id));
        Ok(res)
    }

    /// Ids of `id` and all its descendants, in pre-order
    pub fn subtree_ids(&self, id: &CommentId) -> Result<Vec<CommentId>, Error> {
        let mut res = Vec::new();
        let mut stack = vec![self.node(id)?];
        while let Some(n) = stack.pop() {
            res.push(n.id);
            stack.extend(n.children.iter().rev().filter_map(|c| self.nodes.get(c)));
        }
        Ok(res)
    }

    /// Number of ancestors of `id`, 0 for a top-level comment
    pub fn depth(&self, id: &CommentId) -> Result<usize, Error> {
        let mut depth = 0;
        let mut cur = self.node(id)?;
        while let Some(parent) = cur.parent.and_then(|p| self.nodes.get(&p)) {
            depth += 1;
            cur = parent;
        }
        Ok(depth)
    }

    /// The thread rooted at `id`, every level sorted newest first
    pub fn tree(&self, id: &CommentId) -> Result<Comment, Error> {
        let node = self.node(id)?;
        Ok(self.build_tree(node))
    }

    fn build_tree(&self, node: &CommentNode) -> Comment {
        let mut children = node
            .children
            .iter()
            .filter_map(|c| self.nodes.get(c))
            .collect::<Vec<_>>();
        children.sort_unstable_by_key(|c| Reverse(c.id));
        Comment {
            id: node.id,
            content: node.content.clone(),
            created_at: node.created_at,
            replies: children.into_iter().map(|c| self.build_tree(c)).collect(),
        }
    }

    /// All the threads, newest first at each level
    pub fn list_ordered(&self) -> Vec<Comment> {
        self.roots_ordered()
            .into_iter()
            .map(|c| self.build_tree(c))
            .collect()
    }

    /// Adds `node` under its parent, or as a top-level comment
    ///
    /// `node` must not have any children yet and its id must be fresh.
    pub(crate) fn insert(&mut self, node: CommentNode) -> Result<(), Error> {
        debug_assert!(node.children.is_empty(), "inserting a comment with children");
        debug_assert!(!self.contains(&node.id), "inserting a duplicate comment id");
        match node.parent {
            Some(parent_id) => {
                let parent = self
                    .nodes
                    .get_mut(&parent_id)
                    .ok_or(Error::NotFound(parent_id))?;
                parent.children.push_back(node.id);
            }
            None => self.roots.push_back(node.id),
        }
        self.nodes.insert(node.id, node);
        Ok(())
    }

    pub(crate) fn set_content(&mut self, id: &CommentId, content: String) -> Result<(), Error> {
        let node = self.nodes.get_mut(id).ok_or(Error::NotFound(*id))?;
        node.content = content;
        Ok(())
    }

    /// Removes `id` and all its descendants, returning the removed ids
    pub(crate) fn remove(&mut self, id: &CommentId) -> Result<Vec<CommentId>, Error> {
        let removed = self.subtree_ids(id)?;
        let parent = self.node(id)?.parent;
        for r in &removed {
            self.nodes.remove(r);
        }
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent) => parent.children.retain(|c| c != id),
            None => self.roots.retain(|c| c != id),
        }
        Ok(removed)
    }
}
