use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::identity::IdentityGenerator;
use crate::sample::seed_sample_data;
use crate::stores::FeedStore;
use crate::validation::Limits;

/// Board settings, read from an optional TOML file. Every field has a default.
///
/// ```toml
/// seed_sample_data = false
/// identity_seed = 42
/// topic_delay_ms = 0
///
/// [limits]
/// max_title = 120
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub limits: Limits,
    pub seed_sample_data: bool,
    pub identity_seed: Option<u64>,
    /// Simulated posting delay before a topic is handed to the store.
    pub topic_delay_ms: u64,
    pub reply_delay_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            seed_sample_data: true,
            identity_seed: None,
            topic_delay_ms: 800,
            reply_delay_ms: 600,
        }
    }
}

impl BoardConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "loading board configuration");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn topic_delay(&self) -> Duration {
        Duration::from_millis(self.topic_delay_ms)
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// A store set up the way this configuration asks.
    pub fn build_store(&self) -> FeedStore {
        let identity = match self.identity_seed {
            Some(seed) => IdentityGenerator::seeded(seed),
            None => IdentityGenerator::new(),
        };

        let mut store = FeedStore::with_identity(identity);
        if self.seed_sample_data {
            seed_sample_data(&mut store);
        }
        store
    }
}
