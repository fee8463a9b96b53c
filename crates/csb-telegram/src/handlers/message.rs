use teloxide::types::Message;

use csb_core::{
    domain::{ChatId, MessageId},
    messaging::types::{IncomingUpdate, TextMessage},
};

/// Text messages (commands included) become text updates; everything else is dropped.
pub(super) fn to_update(msg: &Message) -> Option<IncomingUpdate> {
    let text = msg.text()?;

    let username = msg
        .chat
        .username()
        .or_else(|| msg.from().and_then(|u| u.username.as_deref()))
        .map(str::to_string);

    Some(IncomingUpdate::Text(TextMessage {
        chat_id: ChatId(msg.chat.id.0),
        username,
        reply_to: msg.reply_to_message().map(|r| MessageId(r.id.0)),
        text: text.to_string(),
    }))
}
