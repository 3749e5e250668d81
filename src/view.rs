//! Sorted, render-ready projections of the feed.
//!
//! Ordering is by engagement, except that topics whose engagement differs by
//! less than [`RECENCY_BAND`] are ordered newest first. That comparator is
//! not transitive (50 ~ 55 ~ 62 but 50 < 62 by engagement), so it is never
//! handed to `slice::sort_by`, which may panic on a comparator that is not a
//! total order. Instead the topics are put in a fixed recency order and then
//! merged pairwise with a stable merge sort. Same input, same output.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::datatypes::{Tally, Topic, UserId};

/// Engagement difference below which recency decides.
pub const RECENCY_BAND: u64 = 10;

/// Pairwise feed comparator. `Less` means `a` is shown before `b`.
pub fn feed_order(a: &Topic, b: &Topic) -> Ordering {
    let (engagement_a, engagement_b) = (a.engagement(), b.engagement());

    if engagement_a.abs_diff(engagement_b) < RECENCY_BAND {
        b.created_at.cmp(&a.created_at)
    } else {
        engagement_b.cmp(&engagement_a)
    }
}

/// Orders topics for display. Does not touch the topics and depends only on
/// their contents, not on the order they are passed in.
pub fn build_feed_view<'a>(topics: impl IntoIterator<Item = &'a Topic>) -> Vec<&'a Topic> {
    let mut by_recency: Vec<&Topic> = topics.into_iter().collect();
    by_recency.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    merge_sort(&by_recency)
}

fn merge_sort<'a>(topics: &[&'a Topic]) -> Vec<&'a Topic> {
    if topics.len() <= 1 {
        return topics.to_vec();
    }

    let (left, right) = topics.split_at(topics.len() / 2);
    let (left, right) = (merge_sort(left), merge_sort(right));

    let mut merged = Vec::with_capacity(topics.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        // Ties keep the left element first.
        if feed_order(left[i], right[j]) == Ordering::Greater {
            merged.push(right[j]);
            j += 1;
        } else {
            merged.push(left[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    merged
}

/// One row of the rendered feed, from one viewer's point of view.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct FeedEntry<'a> {
    pub topic: &'a Topic,
    pub engagement: u64,
    pub liked: bool,
    pub following: bool,
    pub reposted: bool,
}

impl<'a> FeedEntry<'a> {
    /// Flags are all false when there is no viewer.
    pub fn new(topic: &'a Topic, viewer: Option<UserId>) -> Self {
        let member = |tally: &Tally| viewer.is_some_and(|user| tally.contains(user));
        Self {
            topic,
            engagement: topic.engagement(),
            liked: member(&topic.likes),
            following: member(&topic.followers),
            reposted: member(&topic.reposts),
        }
    }
}

/// Coarse relative age: `Just now`, `5m ago`, `3h ago`, `2d ago`, `6w ago`.
pub fn format_time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds();

    match seconds {
        s if s < 60 => "Just now".to_owned(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 604_800 => format!("{}d ago", s / 86_400),
        s => format!("{}w ago", s / 604_800),
    }
}
