use thiserror::Error;

use frustro::datatypes::{Mood, ReplyId, TopicId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Post { title: String, content: String, mood: Option<String> },
    Reply { topic_id: TopicId, content: String },
    Like(TopicId),
    Follow(TopicId),
    Repost(TopicId),
    LikeReply(ReplyId),
    Feed,
    Thread(TopicId),
    Stats,
    WhoAmI,
    Dump,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command `{0}`, try /help")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("`{0}` is not an id")]
    BadId(String),
}

pub const HELP: &str = "\
/post <title> | <content> [| <mood>]   share a story
/reply <topic> <content>               reply to a topic
/like <topic>, /follow <topic>, /repost <topic>
/likereply <reply>                     like a reply
/feed                                  show the feed
/thread <topic>                        show a topic and its replies
/stats, /whoami, /dump, /help, /q";

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match name {
        "/q" | "/quit" | "/stop" => Ok(Command::Quit),
        "/help" => Ok(Command::Help),
        "/feed" => Ok(Command::Feed),
        "/stats" => Ok(Command::Stats),
        "/whoami" => Ok(Command::WhoAmI),
        "/dump" => Ok(Command::Dump),
        "/like" => Ok(Command::Like(parse_id(rest, "/like <topic>")?)),
        "/follow" => Ok(Command::Follow(parse_id(rest, "/follow <topic>")?)),
        "/repost" => Ok(Command::Repost(parse_id(rest, "/repost <topic>")?)),
        "/likereply" => Ok(Command::LikeReply(parse_id(rest, "/likereply <reply>")?)),
        "/thread" => Ok(Command::Thread(parse_id(rest, "/thread <topic>")?)),
        "/reply" => {
            const USAGE: &str = "/reply <topic> <content>";
            let (id, content) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Ok(Command::Reply {
                topic_id: parse_id(id, USAGE)?,
                content: content.to_owned(),
            })
        }
        "/post" => {
            let Some((title, body)) = rest.split_once('|') else {
                return Err(CommandError::Usage("/post <title> | <content> [| <mood>]"));
            };
            // A trailing segment is a mood only if it names one, so content may contain `|`.
            let (content, mood) = match body.rsplit_once('|') {
                Some((content, mood)) if mood.trim().parse::<Mood>().is_ok() => (content, Some(mood.trim())),
                _ => (body, None),
            };
            Ok(Command::Post {
                title: title.trim().to_owned(),
                content: content.trim().to_owned(),
                mood: mood.map(str::to_owned),
            })
        }
        other => Err(CommandError::Unknown(other.to_owned())),
    }
}

fn parse_id(text: &str, usage: &'static str) -> Result<u64, CommandError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    text.trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::BadId(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_post_with_and_without_mood() {
        assert_eq!(
            parse("/post Bad day | Everything broke"),
            Ok(Command::Post { title: "Bad day".into(), content: "Everything broke".into(), mood: None })
        );
        assert_eq!(
            parse("/post A | B | hopeful"),
            Ok(Command::Post { title: "A".into(), content: "B".into(), mood: Some("hopeful".into()) })
        );
        assert_eq!(parse("/post only a title"), Err(CommandError::Usage("/post <title> | <content> [| <mood>]")));
    }

    #[test]
    fn post_content_may_contain_pipes() {
        assert_eq!(
            parse("/post Logs | grep error | wc -l"),
            Ok(Command::Post { title: "Logs".into(), content: "grep error | wc -l".into(), mood: None })
        );
        assert_eq!(
            parse("/post Logs | a | b | Sad"),
            Ok(Command::Post { title: "Logs".into(), content: "a | b".into(), mood: Some("Sad".into()) })
        );
    }

    #[test]
    fn parses_ids() {
        assert_eq!(parse("/like 3"), Ok(Command::Like(3)));
        assert_eq!(parse("/repost #12"), Ok(Command::Repost(12)));
        assert_eq!(parse("/follow x"), Err(CommandError::BadId("x".into())));
        assert_eq!(parse("/thread"), Err(CommandError::Usage("/thread <topic>")));
        assert_eq!(parse("/likereply r2"), Err(CommandError::BadId("r2".into())));
        assert_eq!(CommandError::BadId("r2".into()).to_string(), "`r2` is not an id");
    }

    #[test]
    fn reply_keeps_inner_spacing() {
        assert_eq!(
            parse("/reply 2 hang  in there"),
            Ok(Command::Reply { topic_id: 2, content: "hang  in there".into() })
        );
        // Empty content is left for the validation layer to reject.
        assert_eq!(parse("/reply 2"), Ok(Command::Reply { topic_id: 2, content: String::new() }));
    }

    #[test]
    fn unknown_commands() {
        assert_eq!(parse("/dance"), Err(CommandError::Unknown("/dance".into())));
        assert_eq!(parse("/q"), Ok(Command::Quit));
    }
}
