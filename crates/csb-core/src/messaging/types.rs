use crate::domain::{ChatId, MessageId, MessageRef};

/// Inbound update model, independent of the Telegram SDK types.
///
/// Commands arrive as `Text`; the desk decides whether `/...` is a command,
/// since in the admin chat it may be a reply meant for a user.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Text(TextMessage),
    Callback(CallbackQuery),
}

#[derive(Clone, Debug)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub username: Option<String>,
    /// Id of the message this one replies to (same chat), if any.
    pub reply_to: Option<MessageId>,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct CallbackQuery {
    pub chat_id: ChatId,
    pub callback_id: String,
    pub data: String,
    pub message: Option<MessageRef>,
}

/// Inline keyboard, one button per row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub buttons: Vec<InlineButton>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub target: ButtonTarget,
}

/// What pressing a button does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ButtonTarget {
    /// Deliver an opaque payload back to the bot.
    Callback(String),
    /// Open an external link in the client.
    Url(String),
}

impl InlineKeyboard {
    pub fn new(buttons: Vec<InlineButton>) -> Self {
        Self { buttons }
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }
}

impl InlineButton {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Callback(data.into()),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: ButtonTarget::Url(url.into()),
        }
    }
}

/// Limits of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    /// Longest HTML text a single message may carry, in bytes.
    pub max_message_len: usize,
}
