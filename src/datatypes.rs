use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

use crate::error::ValidationError;

pub type UserId = u64;
pub type TopicId = u64;
pub type ReplyId = u64;
pub type Username = String;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Frustrated,
    Melancholy,
    Anxious,
    Angry,
    Sad,
    Hopeful,
    Excited,
    Curious,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Frustrated,
        Mood::Melancholy,
        Mood::Anxious,
        Mood::Angry,
        Mood::Sad,
        Mood::Hopeful,
        Mood::Excited,
        Mood::Curious,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Frustrated => "frustrated",
            Mood::Melancholy => "melancholy",
            Mood::Anxious => "anxious",
            Mood::Angry => "angry",
            Mood::Sad => "sad",
            Mood::Hopeful => "hopeful",
            Mood::Excited => "excited",
            Mood::Curious => "curious",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == wanted)
            .ok_or_else(|| ValidationError::UnknownMood(s.trim().to_owned()))
    }
}

/// A counter paired with the set of users who produced it.
///
/// The count only moves through [`Tally::toggle`], so `count() == seeded + by.len()`
/// always holds. `seeded` is the historical part carried by sample data and is
/// zero for anything created at runtime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    seeded: u64,
    by: BTreeSet<UserId>,
}

impl Tally {
    pub fn seeded(count: u64) -> Self {
        Self { seeded: count, by: BTreeSet::new() }
    }

    pub fn count(&self) -> u64 {
        self.seeded + self.by.len() as u64
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.by.contains(&user)
    }

    pub fn users(&self) -> impl Iterator<Item = UserId> + '_ {
        self.by.iter().copied()
    }

    /// Flips `user`'s membership and returns the new state.
    pub fn toggle(&mut self, user: UserId) -> bool {
        if self.by.remove(&user) {
            false
        } else {
            self.by.insert(user);
            true
        }
    }
}

// Serialized as the visible count plus the members, the split from seed
// data is an internal detail.
impl Serialize for Tally {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Tally", 2)?;
        state.serialize_field("count", &self.count())?;
        state.serialize_field("by", &self.by)?;
        state.end()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    pub mood: Mood,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    /// Author's username at the time of posting.
    pub author_username: Username,
    pub created_at: DateTime<Utc>,
    pub likes: Tally,
    pub replies: u64,
    pub reposts: Tally,
    pub followers: Tally,
    pub mood: Mood,
}

impl Topic {
    pub fn engagement(&self) -> u64 {
        self.likes.count() + self.replies + self.reposts.count() + self.followers.count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub id: ReplyId,
    /// May reference a topic that does not exist.
    pub topic_id: TopicId,
    pub content: String,
    pub author_id: UserId,
    pub author_username: Username,
    pub created_at: DateTime<Utc>,
    pub likes: Tally,
}

impl Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{} (#{}, {})", self.username, self.id, self.mood)
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "#{} {} [{}]", self.id, self.title, self.mood)?;
        writeln!(f, "\tby @{} at {}", self.author_username, self.created_at.format("%Y.%m.%d %H:%M:%S"))?;
        writeln!(f, "\t{}", self.content)?;
        write!(
            f,
            "\t♥ {}  ↻ {}  ✉ {}  ★ {}",
            self.likes.count(),
            self.reposts.count(),
            self.replies,
            self.followers.count()
        )
    }
}

impl Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] @{} |> {} (♥ {})",
            self.created_at.format("%Y.%m.%d %H:%M:%S"),
            self.author_username,
            self.content,
            self.likes.count()
        )
    }
}
