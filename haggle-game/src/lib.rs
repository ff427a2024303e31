//! Haggle Game Engine
//!
//! Platform-agnostic core logic for the Haggle trading simulation: a player
//! buys and sells a handful of goods whose prices re-roll every day, grows
//! their carrying capacity, and ends the session with a cash score.
//! This crate has no UI or network dependencies.

pub mod config;
pub mod constants;
pub mod day;
pub mod pricing;
pub mod score;
pub mod session;
pub mod state;
pub mod trade;
pub mod upgrade;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig, PriceBand, TradeRules, parse_item_names};
pub use day::DayOutcome;
pub use pricing::{roll_price, reroll_prices};
pub use score::{
    ScoreEntry, display_slice, merge_into_leaderboard, merge_scores, rank_of, rank_scores,
};
pub use session::TradingSession;
pub use state::{GamePhase, GameState, Item, Items, Purchase};
pub use trade::{Sale, TradeError};
pub use upgrade::Upgrade;
