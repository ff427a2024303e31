//! Centralized balance and tuning constants for Haggle game logic.
//!
//! These values seed [`crate::GameConfig::classic`] and
//! [`crate::GameConfig::lean`]. Sessions read the numbers from their
//! [`crate::TradeRules`], never from here directly.

// Economy ------------------------------------------------------------------
pub const CLASSIC_INITIAL_CASH: i64 = 500;
pub const LEAN_INITIAL_CASH: i64 = 200;
pub const INITIAL_CAPACITY: u32 = 10;
pub const MAX_DAYS: u32 = 30;

// Upgrades -----------------------------------------------------------------
pub const INITIAL_UPGRADE_COST: i64 = 100;
pub const UPGRADE_MULTIPLIER: u32 = 2;
pub const MAX_UPGRADES: u32 = 20;
pub const CLASSIC_UPGRADE_INCREMENT: u32 = 10;
pub const LEAN_UPGRADE_INCREMENT: u32 = 5;

// Market -------------------------------------------------------------------
pub const PRICE_MIN: u32 = 50;
pub const PRICE_MAX: u32 = 500;
pub const MAX_ITEMS: usize = 5;
pub const DEFAULT_ITEM_NAMES: [&str; MAX_ITEMS] =
    ["Item A", "Item B", "Item C", "Item D", "Item E"];

// Leaderboard --------------------------------------------------------------
pub const LEADERBOARD_LIMIT: usize = 20;
pub const LEADERBOARD_DISPLAY_LIMIT: usize = 10;

// Environment keys ---------------------------------------------------------
pub const ITEM_NAMES_ENV_VAR: &str = "HAGGLE_ITEM_NAMES";
