//! The support desk: routes every inbound update to its outbound messages.

use chrono::Utc;

use crate::{
    actions::{parse_command, CallbackAction},
    catalog::Catalog,
    config::Config,
    domain::{ChatId, MessageRef},
    formatting::{escape_html, render_markup, split_escaped},
    messaging::{
        port::MessagingPort,
        types::{CallbackQuery, IncomingUpdate, TextMessage},
    },
    relay::{RelayRecord, RelayStore, RelayStrategy},
    screens::{self, Screen},
    Result,
};

pub const FORWARD_ACK: &str = "✅ Your message has been sent to the admin. Please wait for a reply.";
pub const REPLY_ACK: &str = "✅ Reply sent to the user.";
/// Header above relayed admin replies when the admin answers by Telegram reply.
pub const REPLY_HEADER: &str = "📩 *Reply from Admin:*";

pub struct SupportDesk {
    admin_chat: ChatId,
    catalog: Catalog,
    relay: RelayStore,
}

impl SupportDesk {
    pub fn new(admin_chat: ChatId, catalog: Catalog, relay: RelayStore) -> Self {
        Self {
            admin_chat,
            catalog,
            relay,
        }
    }

    pub fn from_config(cfg: &Config, catalog: Catalog) -> Self {
        Self::new(
            cfg.admin_chat_id,
            catalog,
            RelayStore::new(cfg.relay_strategy),
        )
    }

    pub fn admin_chat(&self) -> ChatId {
        self.admin_chat
    }

    pub fn relay(&self) -> &RelayStore {
        &self.relay
    }

    /// Handle one update. Delivery failures from the messenger propagate.
    pub async fn handle(&self, update: IncomingUpdate, messenger: &dyn MessagingPort) -> Result<()> {
        match update {
            IncomingUpdate::Callback(q) => self.handle_callback(q, messenger).await,
            IncomingUpdate::Text(msg) => self.handle_text(msg, messenger).await,
        }
    }

    async fn handle_text(&self, msg: TextMessage, messenger: &dyn MessagingPort) -> Result<()> {
        let from_admin = msg.chat_id == self.admin_chat;
        match parse_command(&msg.text) {
            Some((name, _)) if name == "start" => {
                tracing::info!(chat_id = msg.chat_id.0, "start menu requested");
                present(messenger, msg.chat_id, None, screens::start_menu(&self.catalog)).await
            }
            // In the admin chat anything else, slash or not, may be a reply.
            _ if from_admin => self.handle_admin_text(msg, messenger).await,
            Some((name, _)) => {
                tracing::debug!(chat_id = msg.chat_id.0, command = %name, "ignoring unknown command");
                Ok(())
            }
            None => self.forward_to_admin(msg, messenger).await,
        }
    }

    async fn handle_callback(&self, q: CallbackQuery, messenger: &dyn MessagingPort) -> Result<()> {
        messenger.answer_callback_query(&q.callback_id, None).await?;

        let action = CallbackAction::parse(&q.data);
        let (screen, edit_in_place) = match &action {
            CallbackAction::ViewServices => (screens::services_menu(&self.catalog), true),
            CallbackAction::ShowService(kind) => {
                (screens::service_detail(&self.catalog, *kind), true)
            }
            CallbackAction::ChatAdmin => (screens::chat_admin_prompt(&self.catalog), false),
            CallbackAction::BackToMenu => (screens::start_menu(&self.catalog), true),
            CallbackAction::Unrecognized(raw) => {
                tracing::debug!(chat_id = q.chat_id.0, data = %raw, "unrecognized callback payload");
                (screens::invalid_selection(), true)
            }
        };

        let target = if edit_in_place { q.message } else { None };
        present(messenger, q.chat_id, target, screen).await
    }

    async fn forward_to_admin(&self, msg: TextMessage, messenger: &dyn MessagingPort) -> Result<()> {
        let header = render_markup(&forward_header(msg.username.as_deref(), msg.chat_id));
        let parts = send_split(messenger, self.admin_chat, Some(&header), &msg.text).await?;

        // Every part maps back to the sender, so a reply to any of them works.
        for part in &parts {
            self.relay
                .record(
                    part.message_id,
                    RelayRecord::new(msg.chat_id, msg.username.clone()),
                )
                .await;
        }
        tracing::info!(
            user_chat = msg.chat_id.0,
            forwarded_id = parts.first().map(|p| p.message_id.0),
            parts = parts.len(),
            strategy = %self.relay.strategy(),
            "forwarded user message to admin"
        );

        messenger.send_html(msg.chat_id, &escape_html(FORWARD_ACK)).await?;
        Ok(())
    }

    async fn handle_admin_text(&self, msg: TextMessage, messenger: &dyn MessagingPort) -> Result<()> {
        match self.relay.resolve(&msg).await {
            Ok(target) => {
                let header = (self.relay.strategy() == RelayStrategy::ReplyToMessage)
                    .then(|| render_markup(REPLY_HEADER));
                let parts =
                    send_split(messenger, target.chat_id, header.as_deref(), &target.text).await?;
                tracing::info!(
                    user_chat = target.chat_id.0,
                    username = target.username.as_deref().unwrap_or("-"),
                    waited_secs = ?target.recorded_at.map(|at| (Utc::now() - at).num_seconds()),
                    parts = parts.len(),
                    "relayed admin reply"
                );
                messenger
                    .send_html(self.admin_chat, &escape_html(REPLY_ACK))
                    .await?;
            }
            Err(e) => {
                tracing::info!(reason = ?e, "admin message not relayed");
                messenger
                    .send_html(self.admin_chat, &escape_html(&e.to_string()))
                    .await?;
            }
        }
        Ok(())
    }
}

/// Header placed above a forwarded user message (bot markup).
pub fn forward_header(username: Option<&str>, user_chat: ChatId) -> String {
    let name = match username {
        Some(u) if !u.trim().is_empty() => format!("@{u}"),
        _ => "Anonymous".to_string(),
    };
    format!("📩 *Message from {name} (ID: {user_chat}):*")
}

/// Send user-supplied `text` as one or more messages within the messenger's
/// length limit. `header` (already HTML) goes above the first part only.
async fn send_split(
    messenger: &dyn MessagingPort,
    chat_id: ChatId,
    header: Option<&str>,
    text: &str,
) -> Result<Vec<MessageRef>> {
    let limit = messenger.capabilities().max_message_len;
    let prefix = header.map(|h| format!("{h}\n\n")).unwrap_or_default();
    let pieces = split_escaped(text, limit.saturating_sub(prefix.len()));

    let mut sent = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.iter().enumerate() {
        let html = if i == 0 {
            format!("{prefix}{piece}")
        } else {
            piece.clone()
        };
        sent.push(messenger.send_html(chat_id, &html).await?);
    }
    Ok(sent)
}

async fn present(
    messenger: &dyn MessagingPort,
    chat_id: ChatId,
    edit: Option<MessageRef>,
    screen: Screen,
) -> Result<()> {
    match (edit, screen.keyboard.is_empty()) {
        (Some(msg), true) => messenger.edit_html(msg, &screen.html).await,
        (Some(msg), false) => {
            messenger
                .edit_inline_keyboard(msg, &screen.html, screen.keyboard)
                .await
        }
        (None, true) => messenger.send_html(chat_id, &screen.html).await.map(|_| ()),
        (None, false) => messenger
            .send_inline_keyboard(chat_id, &screen.html, screen.keyboard)
            .await
            .map(|_| ()),
    }
}
