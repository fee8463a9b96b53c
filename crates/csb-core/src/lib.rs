//! Core domain + application logic for the customer support relay bot.
//!
//! This crate is framework-agnostic. Telegram and the liveness HTTP server
//! live in adapter crates; outbound messaging goes through the
//! [`messaging::port::MessagingPort`] trait.

pub mod actions;
pub mod catalog;
pub mod config;
pub mod desk;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod relay;
pub mod screens;

pub use errors::{Error, Result};
