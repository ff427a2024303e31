//! Haggle Leaderboard
//!
//! A shared, externally hosted top-scores list. The whole list lives in a
//! single remote JSON document that is read in full and overwritten in full.

pub mod client;
pub mod error;
pub mod jsonbin;
pub mod memory;
pub mod store;

pub use client::Leaderboard;
pub use error::LeaderboardError;
pub use jsonbin::{JsonBinConfig, JsonBinStore};
pub use memory::MemoryStore;
pub use store::ScoreStore;
