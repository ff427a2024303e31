use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::config::{ConfigError, GameConfig, TradeRules};
use crate::constants::MAX_ITEMS;
use crate::pricing::roll_price;

/// Inline storage for the market; sessions never carry more than five goods.
pub type Items = SmallVec<[Item; MAX_ITEMS]>;

/// A tradeable good and the player's holding of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// 1-based position in the configured catalog, stable for the session.
    pub id: u32,
    pub name: String,
    /// Today's unit price.
    pub price: u32,
    /// Units currently owned.
    pub quantity: u32,
}

/// The most recent successful buy, kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub item_id: u32,
    pub name: String,
    pub unit_price: u32,
    pub quantity: u32,
}

impl Purchase {
    #[must_use]
    pub fn total(&self) -> i64 {
        i64::from(self.unit_price) * i64::from(self.quantity)
    }
}

impl fmt::Display for Purchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} for {} units",
            self.name, self.unit_price, self.quantity
        )
    }
}

/// Lifecycle of a session. The only transition is `Active` -> `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Active,
    GameOver,
}

impl GamePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::GameOver => "game_over",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete mutable state of one playthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub cash: i64,
    pub day: u32,
    pub capacity: u32,
    pub items: Items,
    pub upgrade_count: u32,
    pub upgrade_cost: i64,
    pub game_over: bool,
    #[serde(default)]
    pub last_purchase: Option<Purchase>,
    pub rules: TradeRules,
}

impl GameState {
    /// Start a session on day 1 with freshly rolled prices.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config, rng))
    }

    pub(crate) fn from_valid(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let rules = config.rules;
        let items = config
            .item_names
            .iter()
            .take(MAX_ITEMS)
            .zip(1u32..)
            .map(|(name, id)| Item {
                id,
                name: name.clone(),
                price: roll_price(rng, rules.prices),
                quantity: 0,
            })
            .collect();
        Self {
            cash: rules.initial_cash,
            day: 1,
            capacity: rules.initial_capacity,
            items,
            upgrade_count: 0,
            upgrade_cost: rules.initial_upgrade_cost,
            game_over: false,
            last_purchase: None,
            rules,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        if self.game_over {
            GamePhase::GameOver
        } else {
            GamePhase::Active
        }
    }

    #[must_use]
    pub fn item(&self, item_id: u32) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub(crate) fn item_mut(&mut self, item_id: u32) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    /// Total units held across every item.
    #[must_use]
    pub fn units_held(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn free_capacity(&self) -> u64 {
        u64::from(self.capacity).saturating_sub(self.units_held())
    }

    /// Value of current holdings at today's prices.
    #[must_use]
    pub fn holdings_value(&self) -> i64 {
        self.items
            .iter()
            .map(|item| i64::from(item.price) * i64::from(item.quantity))
            .sum()
    }

    #[must_use]
    pub fn net_worth(&self) -> i64 {
        self.cash + self.holdings_value()
    }

    #[must_use]
    pub const fn days_remaining(&self) -> u32 {
        self.rules.max_days.saturating_sub(self.day)
    }

    /// The leaderboard score: final cash, available once the session ends.
    /// Unsold stock does not count.
    #[must_use]
    pub const fn final_score(&self) -> Option<i64> {
        if self.game_over {
            Some(self.cash)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PriceBand;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn fresh(config: &GameConfig) -> GameState {
        GameState::new(config, &mut ChaCha20Rng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn inverted_price_band_is_refused() {
        let mut config = GameConfig::classic();
        config.rules.prices = PriceBand { min: 400, max: 100 };
        assert_eq!(
            GameState::new(&config, &mut ChaCha20Rng::seed_from_u64(7)),
            Err(ConfigError::PriceBand { min: 400, max: 100 })
        );
    }

    #[test]
    fn new_state_uses_configured_rules() {
        let state = fresh(&GameConfig::lean());
        assert_eq!(state.cash, 200);
        assert_eq!(state.day, 1);
        assert_eq!(state.capacity, 10);
        assert_eq!(state.upgrade_count, 0);
        assert_eq!(state.upgrade_cost, 100);
        assert_eq!(state.phase(), GamePhase::Active);
        assert!(state.last_purchase.is_none());
        assert_eq!(state.final_score(), None);
    }

    #[test]
    fn items_follow_catalog_order_with_stable_ids() {
        let config = GameConfig::classic().with_item_names_csv("Tea,Salt,Silk");
        let state = fresh(&config);
        let names: Vec<&str> = state.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Tea", "Salt", "Silk"]);
        let ids: Vec<u32> = state.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(state.items.iter().all(|i| i.quantity == 0));
        assert!(state.items.iter().all(|i| (50..=500).contains(&i.price)));
        assert!(!state.items.spilled());
    }

    #[test]
    fn holdings_and_capacity_queries() {
        let mut state = fresh(&GameConfig::classic());
        state.items[0].price = 100;
        state.items[0].quantity = 3;
        state.items[1].price = 60;
        state.items[1].quantity = 2;
        assert_eq!(state.units_held(), 5);
        assert_eq!(state.free_capacity(), 5);
        assert_eq!(state.holdings_value(), 420);
        assert_eq!(state.net_worth(), 920);
        assert_eq!(state.days_remaining(), 29);
    }

    #[test]
    fn purchase_display_reads_naturally() {
        let purchase = Purchase {
            item_id: 2,
            name: "Spice".to_string(),
            unit_price: 75,
            quantity: 10,
        };
        assert_eq!(purchase.to_string(), "Spice at 75 for 10 units");
        assert_eq!(purchase.total(), 750);
    }
}
