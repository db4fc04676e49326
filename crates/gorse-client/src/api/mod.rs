//! Endpoint definitions, with the async and blocking methods for each.

mod feedback;
mod items;
mod recommend;
mod users;

pub use feedback::{DeleteFeedback, InsertFeedbacks, ListFeedbacks};
pub use items::{DeleteItem, GetItem, GetItems, InsertItem, InsertItems, UpdateItem};
pub use recommend::{GetNeighbors, GetRecommend, NeighborKind, SessionRecommend};
pub use users::{DeleteUser, GetUser, GetUsers, InsertUser, InsertUsers, UpdateUser};
