use std::collections::HashMap;

use crate::{
    api::{CommentId, Error},
    CommentNode, CommentTreeStore, Config,
};

/// What the user is currently doing with one comment
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NodeState {
    pub reply_open: bool,

    /// Reply being typed, kept while the reply box is hidden
    pub reply_draft: String,

    /// `Some` while the comment is being edited
    pub edit_draft: Option<String>,
}

impl NodeState {
    fn is_idle(&self) -> bool {
        *self == NodeState::default()
    }
}

/// A comment store along with the per-comment interaction state of the widget
#[derive(Clone, Debug, Default)]
pub struct CommentWidget {
    store: CommentTreeStore,
    states: HashMap<CommentId, NodeState>,
}

impl CommentWidget {
    pub fn new() -> CommentWidget {
        CommentWidget::default()
    }

    pub fn with_config(config: Config) -> CommentWidget {
        CommentWidget {
            store: CommentTreeStore::with_config(config),
            states: HashMap::new(),
        }
    }

    pub fn store(&self) -> &CommentTreeStore {
        &self.store
    }

    pub fn state(&self, id: &CommentId) -> Option<&NodeState> {
        self.states.get(id)
    }

    pub fn is_reply_open(&self, id: &CommentId) -> bool {
        self.states.get(id).map(|s| s.reply_open).unwrap_or(false)
    }

    pub fn is_editing(&self, id: &CommentId) -> bool {
        self.edit_draft(id).is_some()
    }

    pub fn edit_draft(&self, id: &CommentId) -> Option<&str> {
        self.states.get(id).and_then(|s| s.edit_draft.as_deref())
    }

    pub fn reply_draft(&self, id: &CommentId) -> &str {
        self.states
            .get(id)
            .map(|s| &s.reply_draft as &str)
            .unwrap_or("")
    }

    fn state_mut(&mut self, id: &CommentId) -> Result<&mut NodeState, Error> {
        if !self.store.contains(id) {
            return Err(Error::NotFound(*id));
        }
        Ok(self.states.entry(*id).or_default())
    }

    fn forget_if_idle(&mut self, id: &CommentId) {
        if self.states.get(id).map(NodeState::is_idle).unwrap_or(false) {
            self.states.remove(id);
        }
    }

    pub fn post(&mut self, content: &str) -> Result<CommentNode, Error> {
        self.store.add_root_comment(content)
    }

    /// Shows or hides the reply box of `id`, returning whether it is now shown
    pub fn toggle_reply(&mut self, id: &CommentId) -> Result<bool, Error> {
        let state = self.state_mut(id)?;
        state.reply_open = !state.reply_open;
        let now_open = state.reply_open;
        self.forget_if_idle(id);
        Ok(now_open)
    }

    pub fn set_reply_draft(&mut self, id: &CommentId, text: &str) -> Result<(), Error> {
        self.state_mut(id)?.reply_draft = text.to_owned();
        self.forget_if_idle(id);
        Ok(())
    }

    /// Posts the reply draft of `id`
    ///
    /// On success the draft is cleared and the reply box closed. On failure both
    /// are kept so that the user can fix their reply.
    pub fn submit_reply(&mut self, id: &CommentId) -> Result<CommentNode, Error> {
        let draft = self.reply_draft(id).to_owned();
        let reply = self.store.add_reply(id, &draft)?;
        if let Some(state) = self.states.get_mut(id) {
            state.reply_open = false;
            state.reply_draft.clear();
        }
        self.forget_if_idle(id);
        Ok(reply)
    }

    /// Enters edit mode, starting from the current content
    pub fn begin_edit(&mut self, id: &CommentId) -> Result<(), Error> {
        let content = self
            .store
            .get(id)
            .ok_or(Error::NotFound(*id))?
            .content
            .clone();
        self.state_mut(id)?.edit_draft = Some(content);
        Ok(())
    }

    pub fn set_edit_draft(&mut self, id: &CommentId, text: &str) -> Result<(), Error> {
        self.state_mut(id)?.edit_draft = Some(text.to_owned());
        Ok(())
    }

    /// Saves the edit draft of `id` and leaves edit mode
    ///
    /// Does nothing if `id` is not being edited. On failure the draft is kept.
    pub fn save_edit(&mut self, id: &CommentId) -> Result<(), Error> {
        let draft = match self.edit_draft(id) {
            Some(d) => d.to_owned(),
            None if self.store.contains(id) => return Ok(()),
            None => return Err(Error::NotFound(*id)),
        };
        self.store.edit_content(id, &draft)?;
        self.cancel_edit(id);
        Ok(())
    }

    pub fn cancel_edit(&mut self, id: &CommentId) {
        if let Some(state) = self.states.get_mut(id) {
            state.edit_draft = None;
        }
        self.forget_if_idle(id);
    }

    /// Deletes `id` and its replies, along with everything typed into them
    pub fn delete(&mut self, id: &CommentId) -> Result<(), Error> {
        let removed = self.store.forest().subtree_ids(id)?;
        self.store.delete_node(id)?;
        for r in removed {
            self.states.remove(&r);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::IdScheme;

    use super::*;

    fn widget() -> CommentWidget {
        CommentWidget::with_config(Config {
            id_scheme: IdScheme::Sequential,
        })
    }

    #[test]
    fn reply_flow() {
        let mut w = widget();
        let root = w.post("root").unwrap();
        assert!(!w.is_reply_open(&root.id));
        assert_eq!(w.toggle_reply(&root.id), Ok(true));
        w.set_reply_draft(&root.id, "a reply").unwrap();
        let reply = w.submit_reply(&root.id).unwrap();
        assert_eq!(reply.parent, Some(root.id));
        assert_eq!(reply.content, "a reply");
        assert!(!w.is_reply_open(&root.id));
        assert_eq!(w.reply_draft(&root.id), "");
        assert!(w.state(&root.id).is_none());
    }

    #[test]
    fn failed_reply_keeps_draft() {
        let mut w = widget();
        let root = w.post("root").unwrap();
        w.toggle_reply(&root.id).unwrap();
        let long = "b".repeat(101);
        w.set_reply_draft(&root.id, &long).unwrap();
        assert!(w.submit_reply(&root.id).unwrap_err().is_validation());
        assert!(w.is_reply_open(&root.id));
        assert_eq!(w.reply_draft(&root.id), long);
        assert_eq!(w.store().len(), 1);
    }

    #[test]
    fn empty_reply_is_rejected() {
        let mut w = widget();
        let root = w.post("root").unwrap();
        assert_eq!(w.submit_reply(&root.id), Err(Error::EmptyContent));
    }

    #[test]
    fn toggle_twice_closes() {
        let mut w = widget();
        let root = w.post("root").unwrap();
        assert_eq!(w.toggle_reply(&root.id), Ok(true));
        assert_eq!(w.toggle_reply(&root.id), Ok(false));
        assert_eq!(
            w.toggle_reply(&CommentId(99)),
            Err(Error::NotFound(CommentId(99)))
        );
    }

    #[test]
    fn edit_flow() {
        let mut w = widget();
        let root = w.post("root").unwrap();
        w.begin_edit(&root.id).unwrap();
        assert_eq!(w.edit_draft(&root.id), Some("root"));
        w.set_edit_draft(&root.id, "new root").unwrap();
        w.save_edit(&root.id).unwrap();
        assert!(!w.is_editing(&root.id));
        assert_eq!(w.store().get(&root.id).unwrap().content, "new root");
    }

    #[test]
    fn failed_edit_keeps_draft() {
        let mut w = widget();
        let root = w.post("root").unwrap();
        w.set_edit_draft(&root.id, "").unwrap();
        assert_eq!(w.save_edit(&root.id), Err(Error::EmptyContent));
        assert_eq!(w.edit_draft(&root.id), Some(""));
        w.cancel_edit(&root.id);
        assert!(!w.is_editing(&root.id));
        assert_eq!(w.store().get(&root.id).unwrap().content, "root");
    }

    #[test]
    fn save_without_edit_is_a_noop() {
        let mut w = widget();
        let root = w.post("root").unwrap();
        let generation = w.store().generation();
        assert_eq!(w.save_edit(&root.id), Ok(()));
        assert_eq!(w.store().generation(), generation);
        assert_eq!(
            w.save_edit(&CommentId(7)),
            Err(Error::NotFound(CommentId(7)))
        );
    }

    #[test]
    fn edit_and_reply_drafts_do_not_collide() {
        let mut w = widget();
        let root = w.post("root").unwrap();
        let reply = w.store.add_reply(&root.id, "reply").unwrap();
        w.begin_edit(&root.id).unwrap();
        w.set_reply_draft(&root.id, "replying").unwrap();
        w.begin_edit(&reply.id).unwrap();
        assert_eq!(w.edit_draft(&root.id), Some("root"));
        assert_eq!(w.reply_draft(&root.id), "replying");
        assert_eq!(w.edit_draft(&reply.id), Some("reply"));
        assert_eq!(w.reply_draft(&reply.id), "");
    }

    #[test]
    fn delete_prunes_subtree_state() {
        let mut w = widget();
        let root = w.post("root").unwrap();
        let reply = w.store.add_reply(&root.id, "reply").unwrap();
        let other = w.post("other").unwrap();
        w.toggle_reply(&reply.id).unwrap();
        w.begin_edit(&root.id).unwrap();
        w.toggle_reply(&other.id).unwrap();
        w.delete(&root.id).unwrap();
        assert!(w.state(&root.id).is_none());
        assert!(w.state(&reply.id).is_none());
        assert!(w.is_reply_open(&other.id));
        assert_eq!(w.delete(&root.id), Err(Error::NotFound(root.id)));
    }
}
