//! Callback button payloads, parsed once at the boundary.

use crate::catalog::ServiceKind;

pub const VIEW_SERVICES: &str = "view_services";
pub const CHAT_ADMIN: &str = "chat_admin";
pub const BACK_TO_MENU: &str = "back_to_menu";

/// Every button the bot renders maps to one of these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    ViewServices,
    ShowService(ServiceKind),
    ChatAdmin,
    BackToMenu,
    /// Payload we never issued (stale keyboard, forged callback).
    Unrecognized(String),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Self {
        match data {
            VIEW_SERVICES => Self::ViewServices,
            CHAT_ADMIN => Self::ChatAdmin,
            BACK_TO_MENU => Self::BackToMenu,
            other => match ServiceKind::from_callback_id(other) {
                Some(kind) => Self::ShowService(kind),
                None => Self::Unrecognized(other.to_string()),
            },
        }
    }

    /// The payload carried by the button for this action.
    pub fn callback_data(&self) -> &str {
        match self {
            Self::ViewServices => VIEW_SERVICES,
            Self::ShowService(kind) => kind.callback_id(),
            Self::ChatAdmin => CHAT_ADMIN,
            Self::BackToMenu => BACK_TO_MENU,
            Self::Unrecognized(raw) => raw,
        }
    }
}

/// Parse a bot command (`/cmd@botname args`) into lowercase name and args.
pub fn parse_command(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }
    let mut parts = text.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    if cmd.is_empty() {
        return None;
    }
    Some((cmd, rest))
}
