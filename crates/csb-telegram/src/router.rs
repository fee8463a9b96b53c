use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use csb_core::messaging::throttled::{ThrottleConfig, ThrottledMessenger};
use csb_core::{
    config::Config, desk::SupportDesk, formatting::render_markup, messaging::port::MessagingPort,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub desk: Arc<SupportDesk>,
    pub messenger: Arc<dyn MessagingPort>,
}

/// Long-poll Telegram until Ctrl-C, feeding every update to the desk.
pub async fn run_polling(cfg: Arc<Config>, desk: Arc<SupportDesk>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!(username = %me.username(), "support bot started"),
        Err(e) => tracing::warn!("get_me failed: {e}"),
    }
    tracing::info!(
        admin_chat = cfg.admin_chat_id.0,
        strategy = %cfg.relay_strategy,
        "relaying user messages"
    );

    // Throttle outbound calls; the adapter still retries a single 429 RetryAfter.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig::from(cfg.as_ref()),
    ));

    // Best-effort startup notice to the admin chat.
    {
        let messenger = messenger.clone();
        let admin = cfg.admin_chat_id;
        let notice = startup_notice(&cfg);
        tokio::spawn(async move {
            if let Err(e) = messenger.send_html(admin, &notice).await {
                tracing::warn!("startup notification failed: {e}");
            }
        });
    }

    let state = Arc::new(AppState {
        cfg,
        desk,
        messenger,
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("polling stopped");
    Ok(())
}

fn startup_notice(cfg: &Config) -> String {
    let how_to_reply = match cfg.relay_strategy {
        csb_core::relay::RelayStrategy::ReplyToMessage => {
            "Reply to a forwarded message to answer its sender."
        }
        csb_core::relay::RelayStrategy::LastSender => {
            "Any message here goes to the most recent sender."
        }
        csb_core::relay::RelayStrategy::ExplicitId => "Answer with reply:<user_id>:<message>.",
    };
    render_markup(&format!("✅ *Support bot started*\n\n{how_to_reply}"))
}
