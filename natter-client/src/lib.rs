mod comment;
pub use comment::CommentNode;

mod forest;
pub use forest::Forest;

mod fuzz;

mod ids;
pub use ids::{IdAllocator, IdScheme};

mod store;
pub use store::{CommentTreeStore, Config};

mod widget;
pub use widget::{CommentWidget, NodeState};

pub mod api {
    pub use natter_api::*;
}
