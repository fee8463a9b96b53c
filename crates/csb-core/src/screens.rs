//! Rendered menu screens (HTML text + keyboard).

use crate::{
    actions::CallbackAction,
    catalog::{Catalog, ServiceKind},
    formatting::render_markup,
    messaging::types::{InlineButton, InlineKeyboard},
};

pub const INVALID_SELECTION: &str = "Invalid selection";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    pub html: String,
    pub keyboard: InlineKeyboard,
}

impl Screen {
    fn new(markup: &str, buttons: Vec<InlineButton>) -> Self {
        Self {
            html: render_markup(markup),
            keyboard: InlineKeyboard::new(buttons),
        }
    }
}

fn action_button(label: &str, action: CallbackAction) -> InlineButton {
    InlineButton::callback(label, action.callback_data())
}

/// Welcome text with the link buttons, "Services" and "Chat Admin".
pub fn start_menu(catalog: &Catalog) -> Screen {
    let mut buttons: Vec<InlineButton> = catalog
        .links
        .iter()
        .map(|l| InlineButton::url(&l.label, &l.url))
        .collect();
    buttons.push(action_button(
        &catalog.services_button,
        CallbackAction::ViewServices,
    ));
    buttons.push(action_button(
        &catalog.chat_admin_button,
        CallbackAction::ChatAdmin,
    ));
    Screen::new(&catalog.welcome, buttons)
}

pub fn services_menu(catalog: &Catalog) -> Screen {
    let mut buttons: Vec<InlineButton> = ServiceKind::ALL
        .into_iter()
        .map(|kind| action_button(&catalog.service(kind).label, CallbackAction::ShowService(kind)))
        .collect();
    buttons.push(action_button(&catalog.back_button, CallbackAction::BackToMenu));
    Screen::new(&catalog.services_intro, buttons)
}

pub fn service_detail(catalog: &Catalog, kind: ServiceKind) -> Screen {
    Screen::new(
        &catalog.service(kind).blurb,
        vec![action_button(
            &catalog.chat_admin_button,
            CallbackAction::ChatAdmin,
        )],
    )
}

pub fn chat_admin_prompt(catalog: &Catalog) -> Screen {
    Screen::new(&catalog.chat_admin_prompt, Vec::new())
}

pub fn invalid_selection() -> Screen {
    Screen::new(INVALID_SELECTION, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::types::ButtonTarget;

    fn callback_payloads(screen: &Screen) -> Vec<&str> {
        screen
            .keyboard
            .buttons
            .iter()
            .filter_map(|b| match &b.target {
                ButtonTarget::Callback(data) => Some(data.as_str()),
                ButtonTarget::Url(_) => None,
            })
            .collect()
    }

    #[test]
    fn start_menu_has_two_links_then_services_and_admin() {
        let screen = start_menu(&Catalog::default());
        assert_eq!(screen.keyboard.buttons.len(), 4);
        assert_eq!(
            screen.keyboard.buttons[0].target,
            ButtonTarget::Url("https://t.me/codesaif_group".to_string())
        );
        assert_eq!(
            screen.keyboard.buttons[1].target,
            ButtonTarget::Url("https://store.codesaif.in".to_string())
        );
        assert_eq!(callback_payloads(&screen), vec!["view_services", "chat_admin"]);
        assert!(screen
            .html
            .starts_with("🤖 <b>Welcome to Codesaif Customer Support Bot!</b>"));
    }

    #[test]
    fn services_menu_lists_three_services_and_back() {
        let screen = services_menu(&Catalog::default());
        assert_eq!(
            callback_payloads(&screen),
            vec!["service_web", "service_bot", "service_custom", "back_to_menu"]
        );
    }

    #[test]
    fn service_detail_offers_chat_admin() {
        let catalog = Catalog::default();
        for kind in ServiceKind::ALL {
            let screen = service_detail(&catalog, kind);
            assert_eq!(screen.html, render_markup(&catalog.service(kind).blurb));
            assert_eq!(callback_payloads(&screen), vec!["chat_admin"]);
        }
    }

    #[test]
    fn invalid_selection_is_literal() {
        let screen = invalid_selection();
        assert_eq!(screen.html, "Invalid selection");
        assert!(screen.keyboard.is_empty());
    }
}
