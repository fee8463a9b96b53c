//! Telegram update handlers.
//!
//! Each handler converts the teloxide update into the core
//! [`IncomingUpdate`] model and hands it to the support desk. Delivery
//! failures are logged and swallowed so one bad chat never stops polling.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use csb_core::messaging::types::IncomingUpdate;

use crate::router::AppState;

mod callback;
mod message;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(update) = callback::to_update(&q) else {
        tracing::debug!(callback_id = %q.id, "callback without data, ignoring");
        return Ok(());
    };
    dispatch(&state, update).await;
    Ok(())
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(update) = message::to_update(&msg) else {
        tracing::debug!(chat_id = msg.chat.id.0, "non-text message, ignoring");
        return Ok(());
    };
    dispatch(&state, update).await;
    Ok(())
}

async fn dispatch(state: &AppState, update: IncomingUpdate) {
    if let Err(e) = state.desk.handle(update, state.messenger.as_ref()).await {
        tracing::warn!("failed to handle update: {e}");
    }
}
