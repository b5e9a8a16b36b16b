use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a message came from: a chat plus a forum thread inside it.
/// `thread_id` is 0 for messages posted outside any thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelIdentity {
    pub chat_id: i64,
    pub thread_id: i64,
}

impl ChannelIdentity {
    pub fn new(chat_id: i64, thread_id: Option<i64>) -> Self {
        Self {
            chat_id,
            thread_id: thread_id.unwrap_or(0),
        }
    }
}

impl fmt::Display for ChannelIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.thread_id)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ChannelParseError {
    #[error("empty channel entry")]
    Empty,

    #[error("invalid chat id '{0}'")]
    ChatId(String),

    #[error("invalid thread id '{0}'")]
    ThreadId(String),
}

/// Parses `<chat_id>:<thread_id>` or a bare `<chat_id>` (thread 0).
impl FromStr for ChannelIdentity {
    type Err = ChannelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ChannelParseError::Empty);
        }

        let (chat, thread) = match s.split_once(':') {
            Some((chat, thread)) => (chat.trim(), Some(thread.trim())),
            None => (s, None),
        };

        let chat_id = chat
            .parse::<i64>()
            .map_err(|_| ChannelParseError::ChatId(chat.to_string()))?;
        let thread_id = thread
            .map(|t| {
                t.parse::<i64>()
                    .map_err(|_| ChannelParseError::ThreadId(t.to_string()))
            })
            .transpose()?;

        Ok(ChannelIdentity::new(chat_id, thread_id))
    }
}

/// Chats and threads the bot answers in. Loaded once at startup, never mutated.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    channels: HashSet<ChannelIdentity>,
}

/// Production contexts the dispatch bot serves.
pub const DEFAULT_ALLOWED_CONTEXTS: &str =
    "-1002079167705:7340,-1002387655137:9,-1002423500927:4,-1002178818697:4";

impl AllowList {
    pub fn is_allowed(&self, channel: &ChannelIdentity) -> bool {
        self.channels.contains(channel)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl FromIterator<ChannelIdentity> for AllowList {
    fn from_iter<I: IntoIterator<Item = ChannelIdentity>>(iter: I) -> Self {
        Self {
            channels: iter.into_iter().collect(),
        }
    }
}

/// Comma-separated list of channel entries. Blank entries are skipped.
impl FromStr for AllowList {
    type Err = ChannelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(str::parse::<ChannelIdentity>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_and_thread() {
        let channel: ChannelIdentity = "-1002387655137:9".parse().unwrap();
        assert_eq!(channel.chat_id, -1002387655137);
        assert_eq!(channel.thread_id, 9);
    }

    #[test]
    fn test_parse_bare_chat_defaults_thread_to_zero() {
        let channel: ChannelIdentity = " -42 ".parse().unwrap();
        assert_eq!(channel, ChannelIdentity::new(-42, None));
        assert_eq!(channel.thread_id, 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            "abc:1".parse::<ChannelIdentity>(),
            Err(ChannelParseError::ChatId("abc".to_string()))
        );
        assert_eq!(
            "-1:x".parse::<ChannelIdentity>(),
            Err(ChannelParseError::ThreadId("x".to_string()))
        );
        assert_eq!("".parse::<ChannelIdentity>(), Err(ChannelParseError::Empty));
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        let channel = ChannelIdentity::new(-1002178818697, Some(4));
        assert_eq!(channel.to_string(), "-1002178818697:4");
    }

    #[test]
    fn test_default_allow_list_has_four_contexts() {
        let list: AllowList = DEFAULT_ALLOWED_CONTEXTS.parse().unwrap();
        assert_eq!(list.len(), 4);
        assert!(list.is_allowed(&ChannelIdentity::new(-1002079167705, Some(7340))));
        assert!(list.is_allowed(&ChannelIdentity::new(-1002423500927, Some(4))));
    }

    #[test]
    fn test_allow_list_matches_chat_and_thread_together() {
        let list: AllowList = "-100:9".parse().unwrap();
        assert!(!list.is_allowed(&ChannelIdentity::new(-100, None)));
        assert!(!list.is_allowed(&ChannelIdentity::new(-100, Some(10))));
        assert!(!list.is_allowed(&ChannelIdentity::new(-101, Some(9))));
    }

    #[test]
    fn test_allow_list_skips_blank_entries() {
        let list: AllowList = "-1:2, ,-3".parse().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.is_allowed(&ChannelIdentity::new(-3, Some(0))));
    }

    #[test]
    fn test_empty_allow_list_allows_nothing() {
        let list: AllowList = "".parse().unwrap();
        assert!(list.is_empty());
        assert!(!list.is_allowed(&ChannelIdentity::new(1, None)));
    }
}
