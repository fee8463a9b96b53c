//! Relay state: correlating admin replies with the user they answer.
//!
//! Exactly one [`RelayStrategy`] is active per store. The strategies are
//! alternatives, never fallbacks for one another:
//! - `ReplyToMessage`: the admin replies (Telegram "reply") to a forwarded
//!   message; the forwarded message id maps to the user.
//! - `LastSender`: the reply goes to whoever wrote to the bot most recently.
//! - `ExplicitId`: nothing is stored; the admin writes `reply:<user_id>:<text>`.

use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{
    domain::{ChatId, MessageId},
    errors::Error,
    messaging::types::TextMessage,
};

pub const EXPLICIT_REPLY_PREFIX: &str = "reply";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RelayStrategy {
    #[default]
    ReplyToMessage,
    LastSender,
    ExplicitId,
}

impl RelayStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            RelayStrategy::ReplyToMessage => "reply_to_message",
            RelayStrategy::LastSender => "last_sender",
            RelayStrategy::ExplicitId => "explicit_id",
        }
    }
}

impl fmt::Display for RelayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelayStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "reply_to_message" | "reply" => Ok(RelayStrategy::ReplyToMessage),
            "last_sender" | "last" => Ok(RelayStrategy::LastSender),
            "explicit_id" | "explicit" => Ok(RelayStrategy::ExplicitId),
            other => Err(Error::Config(format!(
                "unknown RELAY_STRATEGY {other:?} (expected reply_to_message, last_sender or explicit_id)"
            ))),
        }
    }
}

/// Why an admin message could not be routed to a user.
///
/// The `Display` text is shown to the admin as-is.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("❌ Unable to find the original user. Please ensure the message was forwarded correctly.")]
    LookupMiss,

    #[error("❌ To reply to a user, reply to their forwarded message directly.")]
    NotAReply,

    #[error("❌ No user has messaged the bot yet.")]
    NoRecentSender,

    #[error("❌ Invalid format. Use: reply:<user_id>:<message>")]
    Format,
}

/// Origin of a forwarded message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayRecord {
    pub user_chat: ChatId,
    pub username: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl RelayRecord {
    pub fn new(user_chat: ChatId, username: Option<String>) -> Self {
        Self {
            user_chat,
            username,
            recorded_at: Utc::now(),
        }
    }
}

/// Where an admin reply should be delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayTarget {
    pub chat_id: ChatId,
    pub text: String,
    /// Sender name and forward time; unknown for `ExplicitId`.
    pub username: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl RelayTarget {
    fn from_record(record: &RelayRecord, text: &str) -> Self {
        Self {
            chat_id: record.user_chat,
            text: text.to_string(),
            username: record.username.clone(),
            recorded_at: Some(record.recorded_at),
        }
    }
}

#[derive(Default)]
struct RelayState {
    by_forward: HashMap<MessageId, RelayRecord>,
    last_sender: Option<RelayRecord>,
}

/// Process-wide relay mapping. Entries live for the process lifetime.
pub struct RelayStore {
    strategy: RelayStrategy,
    state: Mutex<RelayState>,
}

impl RelayStore {
    pub fn new(strategy: RelayStrategy) -> Self {
        Self {
            strategy,
            state: Mutex::new(RelayState::default()),
        }
    }

    pub fn strategy(&self) -> RelayStrategy {
        self.strategy
    }

    /// Remember that `forwarded` (a message in the admin chat) came from `record`.
    pub async fn record(&self, forwarded: MessageId, record: RelayRecord) {
        match self.strategy {
            RelayStrategy::ReplyToMessage => {
                self.state.lock().await.by_forward.insert(forwarded, record);
            }
            RelayStrategy::LastSender => {
                self.state.lock().await.last_sender = Some(record);
            }
            RelayStrategy::ExplicitId => {}
        }
    }

    /// Resolve an admin message to its destination user and reply text.
    pub async fn resolve(&self, admin_msg: &TextMessage) -> Result<RelayTarget, RelayError> {
        match self.strategy {
            RelayStrategy::ReplyToMessage => {
                let replied_to = admin_msg.reply_to.ok_or(RelayError::NotAReply)?;
                let state = self.state.lock().await;
                let record = state
                    .by_forward
                    .get(&replied_to)
                    .ok_or(RelayError::LookupMiss)?;
                Ok(RelayTarget::from_record(record, &admin_msg.text))
            }
            RelayStrategy::LastSender => {
                let state = self.state.lock().await;
                let record = state
                    .last_sender
                    .as_ref()
                    .ok_or(RelayError::NoRecentSender)?;
                Ok(RelayTarget::from_record(record, &admin_msg.text))
            }
            RelayStrategy::ExplicitId => {
                let (chat_id, text) = parse_explicit_reply(&admin_msg.text)?;
                Ok(RelayTarget {
                    chat_id,
                    text,
                    username: None,
                    recorded_at: None,
                })
            }
        }
    }

    pub async fn len(&self) -> usize {
        let state = self.state.lock().await;
        state.by_forward.len() + usize::from(state.last_sender.is_some())
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Parse `reply:<user_id>:<message>`. The message may itself contain `:`.
pub fn parse_explicit_reply(text: &str) -> Result<(ChatId, String), RelayError> {
    let parts: Vec<&str> = text.splitn(3, ':').collect();
    let [prefix, id, message] = parts.as_slice() else {
        return Err(RelayError::Format);
    };
    if prefix.trim() != EXPLICIT_REPLY_PREFIX {
        return Err(RelayError::Format);
    }
    let id = id.trim().parse::<i64>().map_err(|_| RelayError::Format)?;
    if message.trim().is_empty() {
        return Err(RelayError::Format);
    }
    Ok((ChatId(id), message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_text(text: &str, reply_to: Option<i32>) -> TextMessage {
        TextMessage {
            chat_id: ChatId(1),
            username: Some("admin".to_string()),
            reply_to: reply_to.map(MessageId),
            text: text.to_string(),
        }
    }

    #[test]
    fn strategy_names() {
        assert_eq!(
            "reply_to_message".parse::<RelayStrategy>().unwrap(),
            RelayStrategy::ReplyToMessage
        );
        assert_eq!(
            "Last-Sender".parse::<RelayStrategy>().unwrap(),
            RelayStrategy::LastSender
        );
        assert_eq!(
            " explicit_id ".parse::<RelayStrategy>().unwrap(),
            RelayStrategy::ExplicitId
        );
        assert!("broadcast".parse::<RelayStrategy>().is_err());
        assert_eq!(RelayStrategy::LastSender.to_string(), "last_sender");
    }

    #[test]
    fn explicit_reply_parsing() {
        assert_eq!(
            parse_explicit_reply("reply:12345:Hello there"),
            Ok((ChatId(12345), "Hello there".to_string()))
        );
        assert_eq!(
            parse_explicit_reply("reply:12345:see you at 10:30"),
            Ok((ChatId(12345), "see you at 10:30".to_string()))
        );
        assert_eq!(
            parse_explicit_reply("reply:-100200:negative ids are chats"),
            Ok((ChatId(-100200), "negative ids are chats".to_string()))
        );
        assert_eq!(parse_explicit_reply("reply:abc:Hi"), Err(RelayError::Format));
        assert_eq!(parse_explicit_reply("reply:12345"), Err(RelayError::Format));
        assert_eq!(parse_explicit_reply("reply:12345:  "), Err(RelayError::Format));
        assert_eq!(parse_explicit_reply("answer:12345:Hi"), Err(RelayError::Format));
        assert_eq!(parse_explicit_reply("just chatting"), Err(RelayError::Format));
    }

    #[tokio::test]
    async fn reply_to_message_resolves_by_forwarded_id() {
        let store = RelayStore::new(RelayStrategy::ReplyToMessage);
        let before = Utc::now();
        store
            .record(
                MessageId(77),
                RelayRecord::new(ChatId(12345), Some("bob".to_string())),
            )
            .await;

        let target = store.resolve(&admin_text("Thanks!", Some(77))).await.unwrap();
        assert_eq!(target.chat_id, ChatId(12345));
        assert_eq!(target.text, "Thanks!");
        assert_eq!(target.username.as_deref(), Some("bob"));
        assert!(target.recorded_at.is_some_and(|at| at >= before));

        assert_eq!(
            store.resolve(&admin_text("Thanks!", Some(78))).await,
            Err(RelayError::LookupMiss)
        );
        assert_eq!(
            store.resolve(&admin_text("Thanks!", None)).await,
            Err(RelayError::NotAReply)
        );
    }

    #[tokio::test]
    async fn last_sender_overwrites() {
        let store = RelayStore::new(RelayStrategy::LastSender);
        assert_eq!(
            store.resolve(&admin_text("hi", None)).await,
            Err(RelayError::NoRecentSender)
        );

        store.record(MessageId(1), RelayRecord::new(ChatId(10), None)).await;
        store.record(MessageId(2), RelayRecord::new(ChatId(20), None)).await;

        let target = store.resolve(&admin_text("hi", Some(1))).await.unwrap();
        assert_eq!(target.chat_id, ChatId(20));
        assert_eq!(target.username, None);
        assert!(target.recorded_at.is_some());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn explicit_id_stores_nothing() {
        let store = RelayStore::new(RelayStrategy::ExplicitId);
        store.record(MessageId(1), RelayRecord::new(ChatId(10), None)).await;
        assert!(store.is_empty().await);

        let target = store
            .resolve(&admin_text("reply:10:Hello", None))
            .await
            .unwrap();
        assert_eq!(
            target,
            RelayTarget {
                chat_id: ChatId(10),
                text: "Hello".to_string(),
                username: None,
                recorded_at: None,
            }
        );
        assert_eq!(
            store.resolve(&admin_text("Hello", Some(1))).await,
            Err(RelayError::Format)
        );
    }
}
