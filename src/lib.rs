//! PositionNotifier Library
//!
//! Watches the open positions of a Capital.com account and reports
//! opened/closed deals to a Telegram chat.

pub mod capital;
pub mod common;
pub mod config;
pub mod monitor;
pub mod telegram;

// Re-export commonly used types
pub use capital::{CapitalClient, CapitalRestClient};
pub use common::clock::{RecordingSleeper, TokioSleeper};
pub use common::errors::{ClientError, MonitorError, Result};
pub use common::traits::{Notifier, PositionSource, SessionProvider, Sleeper};
pub use common::types::{Direction, Position, PositionDetail, PositionSnapshot, Session};
pub use config::types::AppConfig;
pub use monitor::{CycleReport, MonitorSettings, PositionMonitor, Transition};
pub use telegram::TelegramNotifier;
