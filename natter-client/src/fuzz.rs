#![cfg(test)]

use std::{cmp, collections::HashSet, ops::RangeTo};

use bolero::generator::TypeGenerator;
use chrono::{Duration, Utc};
use natter_mock::MockStore;

use crate::{
    api::{Comment, CommentId, Error, Time},
    CommentNode, CommentTreeStore, CommentWidget, Config, IdScheme,
};

#[derive(Clone, Debug, bolero::generator::TypeGenerator)]
enum FuzzOp {
    Post {
        #[generator(bolero::generator::gen_with::<String>().len(0..110usize))]
        content: String,
    },
    Reply {
        parent: usize,
        #[generator(bolero::generator::gen_with::<String>().len(0..110usize))]
        content: String,
    },
    Edit {
        target: usize,
        #[generator(bolero::generator::gen_with::<String>().len(0..110usize))]
        content: String,
    },
    Delete {
        target: usize,
    },
    /// Moves the clock forward by that many milliseconds
    Tick(u16),
}

/// Maps `fuzz_id` to an index in `..end`, or `None` if the range is empty
fn resize_int(fuzz_id: usize, RangeTo { end }: RangeTo<usize>) -> Option<usize> {
    if end == 0 {
        return None;
    }
    let bucket_size = cmp::max(1, usize::MAX / end); // in case we rounded to 0
    let id = fuzz_id / bucket_size;
    Some(cmp::min(id, end - 1)) // in case id was actually over end - 1 due to rounding
}

fn compare<T>(name: &str, store_res: Result<T, Error>, mock_res: Result<T, Error>)
where
    T: std::fmt::Debug + PartialEq,
{
    assert_eq!(
        store_res, mock_res,
        "store and mock did not return the same result for {name}"
    );
}

fn node_summary(n: CommentNode) -> (CommentId, String, Time) {
    (n.id, n.content, n.created_at)
}

fn comment_summary(c: Comment) -> (CommentId, String, Time) {
    (c.id, c.content, c.created_at)
}

struct ComparativeFuzzer {
    store: CommentTreeStore,
    mock: MockStore,
    now: Time,

    /// Every id ever handed out, deleted ones included
    known: Vec<CommentId>,
}

impl ComparativeFuzzer {
    fn new(id_scheme: IdScheme) -> ComparativeFuzzer {
        ComparativeFuzzer {
            store: CommentTreeStore::with_config(Config { id_scheme }),
            mock: MockStore::new(),
            now: Utc::now(),
            known: Vec::new(),
        }
    }

    /// Picks a known id, or one that was never handed out
    fn pick(&self, fuzz_id: usize) -> CommentId {
        match resize_int(fuzz_id, ..self.known.len() + 1) {
            Some(i) if i < self.known.len() => self.known[i],
            _ => CommentId(u64::MAX),
        }
    }

    fn execute_fuzz_op(&mut self, op: FuzzOp) {
        let generation = self.store.generation();
        let mutated = match op {
            FuzzOp::Post { content } => {
                let store_res = self.store.add_root_comment_at(&content, self.now);
                let id = store_res.as_ref().map(|n| n.id).unwrap_or(CommentId(0));
                let mock_res = self.mock.add_root_comment(id, &content, self.now);
                if let Ok(n) = &store_res {
                    assert!(self.known.last() < Some(&n.id), "ids must increase");
                    self.known.push(n.id);
                }
                let mutated = store_res.is_ok();
                compare(
                    "Post",
                    store_res.map(node_summary),
                    mock_res.map(comment_summary),
                );
                mutated
            }
            FuzzOp::Reply { parent, content } => {
                let parent = self.pick(parent);
                let store_res = self.store.add_reply_at(&parent, &content, self.now);
                let id = store_res.as_ref().map(|n| n.id).unwrap_or(CommentId(0));
                let mock_res = self.mock.add_reply(id, &parent, &content, self.now);
                if let Ok(n) = &store_res {
                    assert_eq!(n.parent, Some(parent));
                    self.known.push(n.id);
                }
                let mutated = store_res.is_ok();
                compare(
                    "Reply",
                    store_res.map(node_summary),
                    mock_res.map(comment_summary),
                );
                mutated
            }
            FuzzOp::Edit { target, content } => {
                let target = self.pick(target);
                let store_res = self.store.edit_content(&target, &content);
                let mutated = store_res.is_ok();
                compare("Edit", store_res, self.mock.edit_content(&target, &content));
                mutated
            }
            FuzzOp::Delete { target } => {
                let target = self.pick(target);
                let descendants = self.store.forest().subtree_ids(&target).unwrap_or_default();
                let store_res = self.store.delete_node(&target);
                for d in descendants {
                    assert!(!self.store.contains(&d), "{d} survived deletion of {target}");
                }
                let mutated = store_res.is_ok();
                compare("Delete", store_res, self.mock.delete_node(&target));
                mutated
            }
            FuzzOp::Tick(ms) => {
                self.now = self.now + Duration::milliseconds(i64::from(ms));
                false
            }
        };
        if !mutated {
            assert_eq!(
                self.store.generation(),
                generation,
                "failed operations must not touch the forest"
            );
        }
        self.check_consistency();
    }

    fn check_consistency(&self) {
        let list = self.store.list_ordered();
        assert_eq!(list, self.mock.list_ordered());
        let mut seen = HashSet::new();
        for c in &list {
            c.walk(0, &mut |depth, c| {
                assert!(seen.insert(c.id), "duplicate id {}", c.id);
                assert_eq!(self.store.forest().depth(&c.id), Ok(depth));
                assert!(
                    c.replies.windows(2).all(|w| w[0].id > w[1].id),
                    "replies of {} are not newest first",
                    c.id
                );
            });
        }
        assert!(list.windows(2).all(|w| w[0].id > w[1].id));
        assert_eq!(seen.len(), self.store.len());
        assert_eq!(self.store.len(), self.mock.len());
    }
}

#[test]
fn compare_with_mock() {
    bolero::check!()
        .with_generator(bolero::generator::gen_with::<Vec<FuzzOp>>().len(1..100usize))
        .cloned()
        .for_each(|ops: Vec<FuzzOp>| {
            let mut fuzzer = ComparativeFuzzer::new(IdScheme::Sequential);
            for op in ops {
                fuzzer.execute_fuzz_op(op);
            }
        })
}

#[test]
fn compare_with_mock_clock_ids() {
    bolero::check!()
        .with_generator(bolero::generator::gen_with::<Vec<FuzzOp>>().len(1..100usize))
        .cloned()
        .for_each(|ops: Vec<FuzzOp>| {
            let mut fuzzer = ComparativeFuzzer::new(IdScheme::Clock);
            for op in ops {
                fuzzer.execute_fuzz_op(op);
            }
        })
}

#[test]
fn fuzz_root_content_validation() {
    bolero::check!()
        .with_generator(bolero::generator::gen_with::<String>().len(0..130usize))
        .for_each(|content: &String| {
            let mut store = CommentTreeStore::new();
            let valid = (1..=100).contains(&content.chars().count());
            match store.add_root_comment(content) {
                Ok(n) => {
                    assert!(valid, "accepted {content:?}");
                    assert_eq!(&n.content, content);
                    assert_eq!(store.list_ordered().len(), 1);
                }
                Err(e) => {
                    assert!(!valid, "rejected {content:?}");
                    assert!(e.is_validation());
                    assert!(store.is_empty());
                }
            }
        })
}

#[test]
fn fuzz_widget_delete_prunes_state() {
    bolero::check!()
        .with_type::<(u8, Vec<usize>)>()
        .cloned()
        .for_each(|(num_replies, toggles): (u8, Vec<usize>)| {
            let mut w = CommentWidget::with_config(Config {
                id_scheme: IdScheme::Sequential,
            });
            let root = w.post("root").expect("posting root");
            let mut ids = vec![root.id];
            for i in 0..num_replies {
                let parent = ids[resize_int(i as usize * 7919, ..ids.len()).unwrap_or(0)];
                w.toggle_reply(&parent).expect("opening reply box");
                w.set_reply_draft(&parent, "reply").expect("typing reply");
                ids.push(w.submit_reply(&parent).expect("submitting reply").id);
            }
            for t in toggles {
                let target = ids[resize_int(t, ..ids.len()).unwrap_or(0)];
                w.toggle_reply(&target).expect("toggling reply box");
                w.begin_edit(&target).expect("beginning edit");
            }
            w.delete(&root.id).expect("deleting root");
            for id in ids {
                assert!(w.state(&id).is_none(), "state of {id} survived");
            }
            assert!(w.store().is_empty());
        })
}
