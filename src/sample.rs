//! Seed content a fresh board starts with.

use chrono::{DateTime, TimeZone, Utc};
use tracing::info;

use crate::datatypes::{Mood, Tally, Topic, User};
use crate::stores::FeedStore;

struct SampleTopic {
    id: u64,
    title: &'static str,
    content: &'static str,
    author: &'static str,
    created_at: (u32, u32),
    likes: u64,
    replies: u64,
    reposts: u64,
    followers: u64,
    mood: Mood,
}

const SAMPLE_TOPICS: [SampleTopic; 3] = [
    SampleTopic {
        id: 1,
        title: "Work Burnout is Consuming Me",
        content: "I'm drowning in endless meetings, impossible deadlines, and a boss who thinks 'work-life balance' is a myth. Every morning I wake up with dread, knowing I have to pretend everything is fine while I'm slowly falling apart inside. The worst part? Everyone around me seems to have it figured out, and I'm just trying to survive each day without having a complete breakdown.",
        author: "Guest_Exhausted_Phoenix_1847",
        created_at: (10, 30),
        likes: 89,
        replies: 34,
        reposts: 12,
        followers: 28,
        mood: Mood::Frustrated,
    },
    SampleTopic {
        id: 2,
        title: "Social Media Makes Me Feel Invisible",
        content: "I post something I'm genuinely proud of and get 3 likes. Meanwhile, someone posts a blurry selfie and gets hundreds of hearts. I know it shouldn't matter, but it does. It makes me question my worth, my creativity, my entire existence. When did validation become so tied to algorithms and double-taps?",
        author: "Guest_Melancholy_Raven_9472",
        created_at: (8, 45),
        likes: 156,
        replies: 67,
        reposts: 23,
        followers: 45,
        mood: Mood::Melancholy,
    },
    SampleTopic {
        id: 3,
        title: "Imposter Syndrome is My Shadow",
        content: "Got promoted last month and everyone's congratulating me, but I feel like I'm about to be exposed as a fraud. Every meeting feels like a test I'm failing. I Google basic concepts I should know by heart. I'm terrified someone will ask me a question that reveals I have no idea what I'm doing. How do people seem so confident when I'm constantly questioning everything?",
        author: "Guest_Anxious_Wolf_3291",
        created_at: (7, 15),
        likes: 203,
        replies: 89,
        reposts: 34,
        followers: 67,
        mood: Mood::Anxious,
    },
];

fn sample_timestamp((hour, minute): (u32, u32)) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

/// Loads the sample topics, one author per topic using the topic's id.
///
/// Their counts are historical: nobody in this session liked them, so the
/// member sets start empty. Returns how many topics were inserted; ids that
/// are already taken are skipped.
pub fn seed_sample_data(store: &mut FeedStore) -> usize {
    let mut inserted = 0;

    for sample in &SAMPLE_TOPICS {
        let created_at = sample_timestamp(sample.created_at);

        store.seed_user(User {
            id: sample.id,
            username: sample.author.to_owned(),
            is_anonymous: true,
            created_at,
            mood: sample.mood,
        });

        let topic = Topic {
            id: sample.id,
            title: sample.title.to_owned(),
            content: sample.content.to_owned(),
            author_id: sample.id,
            author_username: sample.author.to_owned(),
            created_at,
            likes: Tally::seeded(sample.likes),
            replies: sample.replies,
            reposts: Tally::seeded(sample.reposts),
            followers: Tally::seeded(sample.followers),
            mood: sample.mood,
        };
        if store.seed_topic(topic) {
            inserted += 1;
        }
    }

    info!(inserted, "seeded sample topics");
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityGenerator;

    #[test]
    fn seeding_moves_id_counters_past_samples() {
        let mut store = FeedStore::with_identity(IdentityGenerator::seeded(0));
        assert_eq!(seed_sample_data(&mut store), 3);

        let topic = store.create_topic("new", "post");
        assert_eq!(topic.id, 4);
        assert_eq!(topic.author_id, 4);
        assert_eq!(store.stats().user_count, 4);
    }

    #[test]
    fn seeding_twice_is_harmless() {
        let mut store = FeedStore::with_identity(IdentityGenerator::seeded(0));
        seed_sample_data(&mut store);
        assert_eq!(seed_sample_data(&mut store), 0);
        assert_eq!(store.stats().topic_count, 3);
    }

    #[test]
    fn samples_rank_by_engagement() {
        let mut store = FeedStore::with_identity(IdentityGenerator::seeded(0));
        seed_sample_data(&mut store);

        let ids: Vec<_> = store.list_topics_sorted().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(store.stats().total_interactions, 89 + 34 + 12 + 156 + 67 + 23 + 203 + 89 + 34);
    }

    #[test]
    fn liking_a_sample_adds_to_its_history() {
        let mut store = FeedStore::with_identity(IdentityGenerator::seeded(0));
        seed_sample_data(&mut store);

        assert_eq!(store.toggle_like(1), Some(true));
        assert_eq!(store.topic(1).unwrap().likes.count(), 90);
        assert_eq!(store.toggle_like(1), Some(false));
        assert_eq!(store.topic(1).unwrap().likes.count(), 89);
    }
}
