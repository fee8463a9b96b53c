//! Menu content: welcome text, link buttons and the service blurbs.
//!
//! The built-in content can be replaced (fully or per field) by a JSON file.
//! Which services exist is fixed by [`ServiceKind`]; only their text is data.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::Result;

/// The three offered services.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Web,
    Bot,
    Custom,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 3] = [ServiceKind::Web, ServiceKind::Bot, ServiceKind::Custom];

    /// Callback payload of the button that opens this service.
    pub fn callback_id(self) -> &'static str {
        match self {
            ServiceKind::Web => "service_web",
            ServiceKind::Bot => "service_bot",
            ServiceKind::Custom => "service_custom",
        }
    }

    pub fn from_callback_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.callback_id() == id)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ServiceOption {
    pub label: String,
    pub blurb: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceSet {
    pub web: ServiceOption,
    pub bot: ServiceOption,
    pub custom: ServiceOption,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Catalog {
    pub welcome: String,
    pub links: Vec<LinkButton>,
    pub services_button: String,
    pub chat_admin_button: String,
    pub back_button: String,
    pub services_intro: String,
    pub chat_admin_prompt: String,
    pub services: ServiceSet,
}

impl Catalog {
    /// Built-in content, or the JSON file at `path` layered over it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(path = %path.display(), "loaded menu catalog");
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn service(&self, kind: ServiceKind) -> &ServiceOption {
        match kind {
            ServiceKind::Web => &self.services.web,
            ServiceKind::Bot => &self.services.bot,
            ServiceKind::Custom => &self.services.custom,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            welcome: "🤖 *Welcome to Codesaif Customer Support Bot!*\n\n\
                      How can we assist you today? Choose an option below:"
                .to_string(),
            links: vec![
                LinkButton {
                    label: "👥 Join My Telegram Channel".to_string(),
                    url: "https://t.me/codesaif_group".to_string(),
                },
                LinkButton {
                    label: "🛍️ Our Cheap Products".to_string(),
                    url: "https://store.codesaif.in".to_string(),
                },
            ],
            services_button: "💼 Services".to_string(),
            chat_admin_button: "📩 Chat Admin".to_string(),
            back_button: "⬅️ Back".to_string(),
            services_intro: "💼 *Our Services*\n\nPick a service to learn more:".to_string(),
            chat_admin_prompt: "📩 *Chat Admin*\n\n\
                                Send your message directly here. We'll get back to you shortly!"
                .to_string(),
            services: ServiceSet::default(),
        }
    }
}

impl Default for ServiceSet {
    fn default() -> Self {
        Self {
            web: ServiceOption {
                label: "🌐 Website Development".to_string(),
                blurb: "🌐 *Website Development*\n\n\
                        Landing pages, stores and dashboards built to order, \
                        responsive and hosted for you."
                    .to_string(),
            },
            bot: ServiceOption {
                label: "🤖 Telegram Bot Development".to_string(),
                blurb: "🤖 *Telegram Bot Development*\n\n\
                        Support desks, shop bots and automations for your \
                        channel or group."
                    .to_string(),
            },
            custom: ServiceOption {
                label: "🛠️ Custom Projects".to_string(),
                blurb: "🛠️ *Custom Projects*\n\n\
                        Scripts, integrations and anything else you need. \
                        Tell us what you have in mind."
                    .to_string(),
            },
        }
    }
}
