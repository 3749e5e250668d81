use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::datatypes::{Mood, Reply, ReplyId, Tally, Topic, TopicId, User, UserId};
use crate::identity::IdentityGenerator;
use crate::stores::CrudStore;
use crate::view::{build_feed_view, FeedEntry};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FeedStats {
    pub topic_count: usize,
    pub user_count: usize,
    /// Likes, replies and reposts summed over all topics. Follows are not counted.
    pub total_interactions: u64,
}

/// Owner of every user, topic and reply in a session, and the only place
/// they are mutated.
///
/// Mutating operations lazily create the session's current user first, so
/// an interaction always has an author. Operations that name a missing id
/// are silent misses: they return `None` (or create an orphan reply) and do
/// not fail. Text is trimmed but never length-checked here; see
/// [`crate::validation`] for the caller-side policy.
pub struct FeedStore {
    users: CrudStore<User>,
    topics: CrudStore<Topic>,
    replies: CrudStore<Reply>,
    current_user: Option<UserId>,
    identity: IdentityGenerator,
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedStore {
    pub fn new() -> Self {
        Self::with_identity(IdentityGenerator::new())
    }

    pub fn with_identity(identity: IdentityGenerator) -> Self {
        Self {
            users: CrudStore::default(),
            topics: CrudStore::default(),
            replies: CrudStore::default(),
            current_user: None,
            identity,
        }
    }

    // ---- Users ----

    /// Creates a new anonymous user and makes it the current user.
    pub fn create_user(&mut self) -> User {
        let now = Utc::now();
        let identity = &mut self.identity;
        let user = self.users.create(|id| identity.new_user(id, now)).clone();

        self.current_user = Some(user.id);
        info!(user_id = user.id, username = %user.username, "created anonymous user");
        user
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.and_then(|id| self.users.get(id))
    }

    pub fn ensure_current_user(&mut self) -> User {
        match self.current_user() {
            Some(user) => user.clone(),
            None => self.create_user(),
        }
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.get(id)
    }

    // ---- Topics ----

    pub fn create_topic(&mut self, title: &str, content: &str) -> Topic {
        self.create_topic_with_mood(title, content, Mood::default())
    }

    pub fn create_topic_with_mood(&mut self, title: &str, content: &str, mood: Mood) -> Topic {
        let author = self.ensure_current_user();
        let now = Utc::now();

        let topic = self
            .topics
            .create(|id| Topic {
                id,
                title: title.trim().to_owned(),
                content: content.trim().to_owned(),
                author_id: author.id,
                author_username: author.username,
                created_at: now,
                likes: Tally::default(),
                replies: 0,
                reposts: Tally::default(),
                followers: Tally::default(),
                mood,
            })
            .clone();

        debug!(topic_id = topic.id, author_id = topic.author_id, %mood, "created topic");
        topic
    }

    pub fn topic(&self, id: TopicId) -> Option<&Topic> {
        self.topics.get(id)
    }

    /// Topics in insertion order, most recent first.
    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter().rev()
    }

    /// Returns the new liked state, or `None` if the topic does not exist.
    pub fn toggle_like(&mut self, topic_id: TopicId) -> Option<bool> {
        self.toggle_topic_tally(topic_id, "like", |topic| &mut topic.likes)
    }

    pub fn toggle_follow(&mut self, topic_id: TopicId) -> Option<bool> {
        self.toggle_topic_tally(topic_id, "follow", |topic| &mut topic.followers)
    }

    pub fn toggle_repost(&mut self, topic_id: TopicId) -> Option<bool> {
        self.toggle_topic_tally(topic_id, "repost", |topic| &mut topic.reposts)
    }

    fn toggle_topic_tally(
        &mut self,
        topic_id: TopicId,
        action: &'static str,
        tally: impl FnOnce(&mut Topic) -> &mut Tally,
    ) -> Option<bool> {
        let user = self.ensure_current_user();

        let Some(topic) = self.topics.get_mut(topic_id) else {
            debug!(topic_id, action, "toggle on missing topic ignored");
            return None;
        };

        let tally = tally(topic);
        let state = tally.toggle(user.id);
        debug!(topic_id, user_id = user.id, action, state, count = tally.count(), "toggled");
        Some(state)
    }

    // ---- Replies ----

    /// Appends a reply and bumps the topic's reply counter. A reply to a
    /// missing topic is still stored, as an orphan, and no counter moves.
    pub fn create_reply(&mut self, topic_id: TopicId, content: &str) -> Reply {
        let author = self.ensure_current_user();
        let now = Utc::now();

        let reply = self
            .replies
            .create(|id| Reply {
                id,
                topic_id,
                content: content.trim().to_owned(),
                author_id: author.id,
                author_username: author.username,
                created_at: now,
                likes: Tally::default(),
            })
            .clone();

        match self.topics.get_mut(topic_id) {
            Some(topic) => topic.replies += 1,
            None => debug!(reply_id = reply.id, topic_id, "stored orphan reply"),
        }

        debug!(reply_id = reply.id, topic_id, author_id = reply.author_id, "created reply");
        reply
    }

    pub fn toggle_reply_like(&mut self, reply_id: ReplyId) -> Option<bool> {
        let user = self.ensure_current_user();

        let Some(reply) = self.replies.get_mut(reply_id) else {
            debug!(reply_id, "like on missing reply ignored");
            return None;
        };

        let state = reply.likes.toggle(user.id);
        debug!(reply_id, user_id = user.id, state, "toggled reply like");
        Some(state)
    }

    pub fn reply(&self, id: ReplyId) -> Option<&Reply> {
        self.replies.get(id)
    }

    /// Replies to one topic, oldest first.
    pub fn replies_for(&self, topic_id: TopicId) -> impl Iterator<Item = &Reply> {
        self.replies.iter().filter(move |reply| reply.topic_id == topic_id)
    }

    // ---- Views ----

    pub fn list_topics_sorted(&self) -> Vec<&Topic> {
        build_feed_view(self.topics())
    }

    /// The sorted feed with the current user's interaction flags.
    pub fn feed_entries(&self) -> Vec<FeedEntry<'_>> {
        let viewer = self.current_user;
        self.list_topics_sorted()
            .into_iter()
            .map(|topic| FeedEntry::new(topic, viewer))
            .collect()
    }

    pub fn stats(&self) -> FeedStats {
        FeedStats {
            topic_count: self.topics.len(),
            user_count: self.users.len(),
            total_interactions: self
                .topics
                .iter()
                .map(|topic| topic.likes.count() + topic.replies + topic.reposts.count())
                .sum(),
        }
    }

    // ---- Seeding ----

    /// Inserts a pre-built user under its own id. Returns `false` if the id is taken.
    pub fn seed_user(&mut self, user: User) -> bool {
        self.users.insert_with_id(user.id, user)
    }

    /// Inserts a pre-built topic under its own id. Returns `false` if the id is taken.
    pub fn seed_topic(&mut self, topic: Topic) -> bool {
        self.topics.insert_with_id(topic.id, topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FeedStore {
        FeedStore::with_identity(IdentityGenerator::seeded(3))
    }

    #[test]
    fn created_user_becomes_current() {
        let mut store = store();
        assert!(store.current_user().is_none());

        let first = store.create_user();
        assert_eq!(store.current_user().map(|u| u.id), Some(first.id));

        let second = store.create_user();
        assert_eq!(second.id, first.id + 1);
        assert_eq!(store.current_user().map(|u| u.id), Some(second.id));
        assert_eq!(store.stats().user_count, 2);

        // Lazy creation only happens when nobody is acting yet.
        assert_eq!(store.ensure_current_user().id, second.id);
        assert_eq!(store.stats().user_count, 2);
    }

    #[test]
    fn a_new_user_toggles_independently() {
        let mut store = store();
        let topic = store.create_topic("Rent", "Up again");
        assert_eq!(store.toggle_repost(topic.id), Some(true));

        let second = store.create_user();
        assert_eq!(store.toggle_repost(topic.id), Some(true));

        let reposts = &store.topic(topic.id).unwrap().reposts;
        assert_eq!(reposts.count(), 2);
        assert!(reposts.contains(topic.author_id));
        assert!(reposts.contains(second.id));
    }

    #[test]
    fn create_topic_snapshots_author_and_trims() {
        let mut store = store();
        let topic = store.create_topic("  Title  ", "\tBody\n");
        let author = store.current_user().cloned().unwrap();

        assert_eq!(topic.title, "Title");
        assert_eq!(topic.content, "Body");
        assert_eq!(topic.author_id, author.id);
        assert_eq!(topic.author_username, author.username);
        assert_eq!(topic.mood, Mood::Frustrated);
        assert_eq!(topic.engagement(), 0);
    }

    #[test]
    fn core_accepts_over_length_text() {
        let mut store = store();
        let title = "t".repeat(500);
        let topic = store.create_topic(&title, "");
        assert_eq!(topic.title.len(), 500);
        assert_eq!(topic.content, "");
    }

    #[test]
    fn topics_are_newest_first() {
        let mut store = store();
        let a = store.create_topic("a", "a");
        let b = store.create_topic("b", "b");
        let ids: Vec<_> = store.topics().map(|t| t.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn toggles_are_independent() {
        let mut store = store();
        let topic = store.create_topic("t", "c");

        assert_eq!(store.toggle_like(topic.id), Some(true));
        assert_eq!(store.toggle_follow(topic.id), Some(true));
        assert_eq!(store.toggle_repost(topic.id), Some(true));
        assert_eq!(store.toggle_follow(topic.id), Some(false));

        let topic = store.topic(topic.id).unwrap();
        assert_eq!(topic.likes.count(), 1);
        assert_eq!(topic.followers.count(), 0);
        assert_eq!(topic.reposts.count(), 1);
    }

    #[test]
    fn toggle_on_missing_topic_is_a_silent_miss() {
        let mut store = store();
        assert_eq!(store.toggle_like(99), None);
        assert_eq!(store.toggle_repost(99), None);
        // The interaction still established an identity.
        assert!(store.current_user().is_some());
    }

    #[test]
    fn reply_bumps_topic_counter() {
        let mut store = store();
        let topic = store.create_topic("t", "c");
        let reply = store.create_reply(topic.id, "  hi ");

        assert_eq!(reply.content, "hi");
        assert_eq!(store.topic(topic.id).unwrap().replies, 1);
        assert_eq!(store.replies_for(topic.id).count(), 1);
    }

    #[test]
    fn reply_likes_toggle() {
        let mut store = store();
        let topic = store.create_topic("t", "c");
        let reply = store.create_reply(topic.id, "hi");

        assert_eq!(store.toggle_reply_like(reply.id), Some(true));
        assert_eq!(store.reply(reply.id).unwrap().likes.count(), 1);
        assert_eq!(store.toggle_reply_like(reply.id), Some(false));
        assert_eq!(store.toggle_reply_like(42), None);
        // Reply likes never reach topic stats.
        assert_eq!(store.stats().total_interactions, 1);
    }

    #[test]
    fn ensure_current_user_after_seeding_picks_a_fresh_user() {
        let mut store = store();
        crate::sample::seed_sample_data(&mut store);
        assert!(store.current_user().is_none());

        let user = store.ensure_current_user();
        assert_eq!(user.id, 4);
        assert_eq!(store.current_user().map(|u| u.id), Some(4));
    }
}
