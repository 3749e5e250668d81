//! In-memory feed engine for an anonymous story board.
//!
//! [`FeedStore`] owns users, topics and replies; [`view`] turns its topics
//! into the sorted feed; [`validation`] is the input policy front-ends apply
//! before calling the store.

pub mod config;
pub mod datatypes;
pub mod error;
pub mod identity;
pub mod sample;
pub mod stores;
pub mod util;
pub mod validation;
pub mod view;

pub use config::BoardConfig;
pub use datatypes::{Mood, Reply, Tally, Topic, User};
pub use error::{BoardError, ValidationError};
pub use stores::{FeedStats, FeedStore};
pub use util::Handle;

/// A feed store shared between threads.
pub type SharedFeed = Handle<FeedStore>;
