use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::Notify;
use tracing::{debug, info};

use frustro::view::{format_time_ago, FeedEntry};
use frustro::{BoardConfig, BoardError, SharedFeed, Topic};

use crate::cli::read_line;
use crate::commands::{self, Command, HELP};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal stand-in for the board's UI: validates input, waits out the
/// posting delay, calls the store and re-renders.
pub struct Controller {
    feed: SharedFeed,
    config: BoardConfig,
}

impl Controller {
    pub fn new(config: BoardConfig) -> Self {
        let feed = SharedFeed::from(config.build_store());
        Self { feed, config }
    }

    pub async fn run(&self, interrupt: Arc<Notify>, out: &mut impl Write) -> Result<(), BoardError> {
        let mut reader = BufReader::new(tokio::io::stdin());
        self.run_with(&mut reader, interrupt, out).await
    }

    pub async fn run_with(
        &self,
        reader: &mut (impl AsyncBufRead + Unpin),
        interrupt: Arc<Notify>,
        out: &mut impl Write,
    ) -> Result<(), BoardError> {
        let mut buf = String::new();
        let me = self.feed.write(|store| store.ensure_current_user());
        writeln!(out, "🎭 You are now @{}", me.username)?;
        self.render_feed(out)?;

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let line = tokio::select! {
                _ = interrupt.notified() => {
                    info!("interrupted, stopping");
                    break;
                }
                line = read_line(reader, &mut buf) => line?,
            };

            let Some(line) = line else {
                debug!("end of input");
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match commands::parse(&line) {
                Err(err) => writeln!(out, "⚠️ {err}")?,
                Ok(command) => {
                    if self.execute(command, out).await? == Flow::Quit {
                        break;
                    }
                }
            }
        }

        writeln!(out)?;
        Ok(())
    }

    pub async fn execute(&self, command: Command, out: &mut impl Write) -> Result<Flow, BoardError> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(out, "{HELP}")?,

            Command::Post { title, content, mood } => {
                let draft = match self.config.limits.validate_topic(&title, &content, mood.as_deref()) {
                    Ok(draft) => draft,
                    Err(err) => {
                        writeln!(out, "⚠️ {err}")?;
                        return Ok(Flow::Continue);
                    }
                };

                // The lock is not held while "posting", other calls go through.
                tokio::time::sleep(self.config.topic_delay()).await;
                let topic = self
                    .feed
                    .write(|store| store.create_topic_with_mood(&draft.title, &draft.content, draft.mood));

                writeln!(out, "✨ Shared as #{} by @{}", topic.id, topic.author_username)?;
                self.render_feed(out)?;
            }

            Command::Reply { topic_id, content } => {
                let content = match self.config.limits.validate_reply(&content) {
                    Ok(content) => content,
                    Err(err) => {
                        writeln!(out, "⚠️ {err}")?;
                        return Ok(Flow::Continue);
                    }
                };

                tokio::time::sleep(self.config.reply_delay()).await;
                let reply = self.feed.write(|store| store.create_reply(topic_id, &content));
                writeln!(out, "💬 Reply #{} posted", reply.id)?;
                self.render_feed(out)?;
            }

            Command::Like(id) => {
                let state = self.feed.write(|store| store.toggle_like(id));
                self.report_toggle(out, id, state, "❤️ Liked!", "💔 Like removed")?;
            }
            Command::Follow(id) => {
                let state = self.feed.write(|store| store.toggle_follow(id));
                self.report_toggle(out, id, state, "🔔 Following topic!", "👋 Unfollowed topic")?;
            }
            Command::Repost(id) => {
                let state = self.feed.write(|store| store.toggle_repost(id));
                self.report_toggle(out, id, state, "🔄 Reposted!", "🔄 Repost removed")?;
            }
            Command::LikeReply(id) => match self.feed.write(|store| store.toggle_reply_like(id)) {
                Some(true) => writeln!(out, "❤️ Liked reply #{id}")?,
                Some(false) => writeln!(out, "💔 Like removed from reply #{id}")?,
                None => writeln!(out, "No reply #{id}")?,
            },

            Command::Feed => self.render_feed(out)?,
            Command::Thread(id) => self.render_thread(out, id)?,
            Command::Stats => self.render_stats(out)?,

            Command::WhoAmI => match self.feed.read(|store| store.current_user().cloned()) {
                Some(user) => writeln!(out, "🎭 You are {user}")?,
                None => writeln!(out, "🎭 No identity yet, it is created on your first interaction")?,
            },

            Command::Dump => {
                let store = self.feed.get();
                serde_json::to_writer_pretty(&mut *out, &store.feed_entries())?;
                writeln!(out)?;
            }
        }

        Ok(Flow::Continue)
    }

    fn report_toggle(
        &self,
        out: &mut impl Write,
        id: u64,
        state: Option<bool>,
        on: &str,
        off: &str,
    ) -> Result<(), BoardError> {
        match state {
            Some(true) => writeln!(out, "{on}")?,
            Some(false) => writeln!(out, "{off}")?,
            None => {
                writeln!(out, "No topic #{id}")?;
                return Ok(());
            }
        }
        self.render_feed(out)
    }

    fn render_feed(&self, out: &mut impl Write) -> Result<(), BoardError> {
        let store = self.feed.get();
        let entries = store.feed_entries();
        let now = Utc::now();

        if entries.is_empty() {
            writeln!(out, "✨ No stories yet. Be the first to share your authentic experience.")?;
            return Ok(());
        }

        for entry in entries {
            write_entry(out, &entry, now)?;
        }
        drop(store);

        self.render_stats(out)
    }

    fn render_thread(&self, out: &mut impl Write, id: u64) -> Result<(), BoardError> {
        let store = self.feed.get();
        let Some(topic) = store.topic(id) else {
            writeln!(out, "No topic #{id}")?;
            return Ok(());
        };

        writeln!(out, "{topic}")?;
        for reply in store.replies_for(id) {
            writeln!(out, "  #{} {reply}", reply.id)?;
        }
        Ok(())
    }

    fn render_stats(&self, out: &mut impl Write) -> Result<(), BoardError> {
        let stats = self.feed.read(|store| store.stats());
        writeln!(
            out,
            "📊 {} stories · {} people · {} interactions",
            stats.topic_count, stats.user_count, stats.total_interactions
        )?;
        Ok(())
    }
}

fn write_entry(out: &mut impl Write, entry: &FeedEntry<'_>, now: chrono::DateTime<Utc>) -> std::io::Result<()> {
    let Topic { id, title, author_username, created_at, mood, .. } = entry.topic;
    let topic = entry.topic;

    writeln!(out, "#{id} {title} [{mood}] · @{author_username} · {}", format_time_ago(*created_at, now))?;
    writeln!(
        out,
        "   {} {}  {} {}  ✉ {}  {} {}  (engagement {})",
        if entry.liked { "♥" } else { "♡" },
        topic.likes.count(),
        if entry.reposted { "↻" } else { "⟳" },
        topic.reposts.count(),
        topic.replies,
        if entry.following { "★" } else { "☆" },
        topic.followers.count(),
        entry.engagement,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> BoardConfig {
        BoardConfig {
            seed_sample_data: false,
            identity_seed: Some(11),
            topic_delay_ms: 0,
            reply_delay_ms: 0,
            ..Default::default()
        }
    }

    async fn run_script(controller: &Controller, script: &str) -> String {
        let mut reader = BufReader::new(script.as_bytes());
        let mut out = Vec::new();
        controller
            .run_with(&mut reader, Arc::new(Notify::new()), &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn post_like_and_reply() {
        let controller = Controller::new(quiet_config());
        let output = run_script(&controller, "/post Rough week | Nothing works\n/like 1\n/reply 1 same here\n/stats\n").await;

        assert!(output.contains("✨ Shared as #1"));
        assert!(output.contains("❤️ Liked!"));
        assert!(output.contains("💬 Reply #1 posted"));
        assert!(output.contains("📊 1 stories · 1 people · 2 interactions"));
    }

    #[tokio::test]
    async fn rejected_input_never_reaches_the_store() {
        let controller = Controller::new(quiet_config());
        let long_title = "x".repeat(201);
        let script = format!("/post {long_title} | body\n/reply 1   \n/post a |   \n");
        let output = run_script(&controller, &script).await;

        assert!(output.contains("title is 201 characters long, the limit is 200"));
        assert!(output.contains("reply cannot be empty"));
        assert!(output.contains("content cannot be empty"));
        let stats = controller.feed.read(|store| store.stats());
        assert_eq!((stats.topic_count, stats.total_interactions), (0, 0));
        assert!(controller.feed.read(|store| store.reply(1).is_none()));
    }

    #[tokio::test]
    async fn identity_is_announced_before_the_first_prompt() {
        let controller = Controller::new(quiet_config());
        let output = run_script(&controller, "/whoami\n").await;

        let user = controller.feed.read(|store| store.current_user().cloned()).unwrap();
        assert_eq!(user.id, 1);
        let greeting = format!("🎭 You are now @{}", user.username);
        assert!(output.starts_with(&greeting));
        assert!(output.contains(&format!("🎭 You are {user}")));
        assert!(!output.contains("No identity yet"));
        assert_eq!(controller.feed.read(|store| store.stats().user_count), 1);
    }

    #[tokio::test]
    async fn missing_topics_are_reported_not_fatal() {
        let controller = Controller::new(quiet_config());
        let output = run_script(&controller, "/like 9\n/thread 9\n/dance\n/q\n/like 1\n").await;

        assert!(output.contains("No topic #9"));
        assert!(output.contains("unknown command `/dance`"));
        // Nothing after /q runs.
        assert_eq!(output.matches("No topic").count(), 2);
    }

    #[tokio::test]
    async fn dump_is_json() {
        let controller = Controller::new(BoardConfig { seed_sample_data: true, ..quiet_config() });
        let mut out = Vec::new();
        controller.execute(Command::Dump, &mut out).await.unwrap();

        let entries: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let entries = entries.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["topic"]["id"], 3);
        assert_eq!(entries[0]["engagement"], 393);
        assert_eq!(entries[0]["liked"], false);
    }

    #[tokio::test]
    async fn interrupt_stops_the_loop() {
        let controller = Controller::new(quiet_config());
        let interrupt = Arc::new(Notify::new());
        interrupt.notify_one();

        // A reader that never yields a line.
        let (_writer, reader) = tokio::io::duplex(64);
        let mut reader = BufReader::new(reader);
        let mut out = Vec::new();
        controller.run_with(&mut reader, interrupt, &mut out).await.unwrap();
    }
}
