mod crud;
mod feed;

pub use crud::CrudStore;
pub use feed::{FeedStats, FeedStore};
