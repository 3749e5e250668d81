//! Pseudonymous identities.
//!
//! Usernames look like `Guest_Swift_Falcon_4821`. Nothing checks them for
//! uniqueness; two users may end up with the same name.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::datatypes::{Mood, User, UserId};

pub const USERNAME_PREFIX: &str = "Guest";

pub const ADJECTIVES: [&str; 40] = [
    "Brave", "Clever", "Creative", "Curious", "Daring", "Dynamic", "Fierce", "Free",
    "Gentle", "Bold", "Honest", "Kind", "Lucky", "Mighty", "Noble", "Quick",
    "Sharp", "Smart", "Swift", "Wise", "Witty", "Zen", "Epic", "Wild",
    "Calm", "Cool", "Fresh", "Happy", "Hungry", "Tall", "Young", "Zesty",
    "Silent", "Golden", "Silver", "Crystal", "Mystic", "Cosmic", "Stellar", "Luna",
];

pub const NOUNS: [&str; 40] = [
    "Phoenix", "Dragon", "Tiger", "Eagle", "Wolf", "Bear", "Lion", "Fox",
    "Hawk", "Shark", "Whale", "Raven", "Falcon", "Panther", "Leopard", "Cheetah",
    "Dolphin", "Orca", "Stallion", "Mustang", "Thunder", "Lightning", "Storm", "Blaze",
    "River", "Mountain", "Ocean", "Star", "Comet", "Galaxy", "Nebula", "Cosmos",
    "Nova", "Meteor", "Aurora", "Eclipse", "Prism", "Vertex", "Cipher", "Vortex",
];

pub const SUFFIX_RANGE: std::ops::RangeInclusive<u16> = 1000..=9999;

pub struct IdentityGenerator {
    rng: StdRng,
}

impl Default for IdentityGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityGenerator {
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    /// Reproducible generator, used by tests and `--seed`.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn generate_username(&mut self) -> String {
        let adjective = ADJECTIVES[self.rng.random_range(0..ADJECTIVES.len())];
        let noun = NOUNS[self.rng.random_range(0..NOUNS.len())];
        let number = self.rng.random_range(SUFFIX_RANGE);
        format!("{USERNAME_PREFIX}_{adjective}_{noun}_{number}")
    }

    /// Builds the record for a fresh anonymous user. Id allocation and
    /// insertion are the store's job.
    pub fn new_user(&mut self, id: UserId, now: DateTime<Utc>) -> User {
        User {
            id,
            username: self.generate_username(),
            is_anonymous: true,
            created_at: now,
            mood: Mood::Curious,
        }
    }
}

/// Splits a generated username into its adjective, noun and number, or
/// `None` if it does not follow the `Guest_<Adjective>_<Noun>_<NNNN>` shape.
pub fn parse_username(username: &str) -> Option<(&str, &str, u16)> {
    let mut parts = username.split('_');
    if parts.next()? != USERNAME_PREFIX {
        return None;
    }
    let adjective = parts.next()?;
    let noun = parts.next()?;
    let digits = parts.next()?;
    if parts.next().is_some() || digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number = digits.parse().ok()?;

    let known = ADJECTIVES.contains(&adjective) && NOUNS.contains(&noun) && SUFFIX_RANGE.contains(&number);
    known.then_some((adjective, noun, number))
}
