//! Telegram module - notification delivery through the Bot API

pub mod messages;
pub mod notifier;

pub use notifier::TelegramNotifier;
