use teloxide::types::CallbackQuery;

use csb_core::{
    domain::{ChatId, MessageId, MessageRef},
    messaging::types::{CallbackQuery as CoreCallback, IncomingUpdate},
};

pub(super) fn to_update(q: &CallbackQuery) -> Option<IncomingUpdate> {
    let data = q.data.clone()?;

    // Private chat id equals the user id when the keyboard message is gone.
    let chat_id = q
        .message
        .as_ref()
        .map(|m| ChatId(m.chat.id.0))
        .unwrap_or(ChatId(q.from.id.0 as i64));
    let message = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    });

    Some(IncomingUpdate::Callback(CoreCallback {
        chat_id,
        callback_id: q.id.clone(),
        data,
        message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(json: serde_json::Value) -> CallbackQuery {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn callback_with_message_targets_it() {
        let q = query(serde_json::json!({
            "id": "cb-1",
            "from": { "id": 42, "is_bot": false, "first_name": "Alice", "username": "alice" },
            "chat_instance": "ci",
            "data": "view_services",
            "message": {
                "message_id": 7,
                "date": 1_700_000_000,
                "chat": { "id": 42, "type": "private", "first_name": "Alice" },
                "text": "menu"
            }
        }));

        let Some(IncomingUpdate::Callback(cb)) = to_update(&q) else {
            panic!("expected callback update");
        };
        assert_eq!(cb.callback_id, "cb-1");
        assert_eq!(cb.data, "view_services");
        assert_eq!(cb.chat_id, ChatId(42));
        assert_eq!(
            cb.message,
            Some(MessageRef {
                chat_id: ChatId(42),
                message_id: MessageId(7),
            })
        );
    }

    #[test]
    fn callback_without_data_is_dropped() {
        let q = query(serde_json::json!({
            "id": "cb-2",
            "from": { "id": 42, "is_bot": false, "first_name": "Alice" },
            "chat_instance": "ci",
            "game_short_name": "g"
        }));
        assert!(to_update(&q).is_none());
    }
}
