//! Buying and selling at today's prices.
//!
//! Every transition is guarded by a `check_*` function that the matching
//! `can_*` predicate also calls, so a predicate answers `true` exactly when
//! the transition would succeed against the same state. A rejected
//! transition leaves the state untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::{GameState, Purchase};

/// Why a buy, sell, or upgrade was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum TradeError {
    #[error("the game is over")]
    GameOver,
    #[error("amount must be greater than zero")]
    ZeroAmount,
    #[error("no item with id {item_id}")]
    UnknownItem { item_id: u32 },
    #[error("costs {needed} but only {available} cash on hand")]
    InsufficientCash { needed: i64, available: i64 },
    #[error("needs {needed} free slots but only {free} available")]
    CapacityExceeded { needed: u64, free: u64 },
    #[error("holding {held} units, cannot sell {requested}")]
    InsufficientStock { held: u32, requested: u32 },
    #[error("maximum number of upgrades ({max}) reached")]
    UpgradeCapReached { max: u32 },
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub item_id: u32,
    pub unit_price: u32,
    pub quantity: u32,
}

impl Sale {
    #[must_use]
    pub fn revenue(&self) -> i64 {
        i64::from(self.unit_price) * i64::from(self.quantity)
    }
}

impl GameState {
    /// Validate a purchase and return its total cost.
    ///
    /// # Errors
    ///
    /// Returns the first failed precondition.
    pub fn check_buy(&self, item_id: u32, amount: u32) -> Result<i64, TradeError> {
        self.ensure_active()?;
        if amount == 0 {
            return Err(TradeError::ZeroAmount);
        }
        let item = self
            .item(item_id)
            .ok_or(TradeError::UnknownItem { item_id })?;
        let cost = i64::from(item.price) * i64::from(amount);
        if cost > self.cash {
            return Err(TradeError::InsufficientCash {
                needed: cost,
                available: self.cash,
            });
        }
        let free = self.free_capacity();
        if u64::from(amount) > free {
            return Err(TradeError::CapacityExceeded {
                needed: u64::from(amount),
                free,
            });
        }
        Ok(cost)
    }

    /// Validate a sale and return its revenue.
    ///
    /// # Errors
    ///
    /// Returns the first failed precondition.
    pub fn check_sell(&self, item_id: u32, amount: u32) -> Result<i64, TradeError> {
        self.ensure_active()?;
        if amount == 0 {
            return Err(TradeError::ZeroAmount);
        }
        let item = self
            .item(item_id)
            .ok_or(TradeError::UnknownItem { item_id })?;
        if item.quantity < amount {
            return Err(TradeError::InsufficientStock {
                held: item.quantity,
                requested: amount,
            });
        }
        Ok(i64::from(item.price) * i64::from(amount))
    }

    #[must_use]
    pub fn can_buy(&self, item_id: u32, amount: u32) -> bool {
        self.check_buy(item_id, amount).is_ok()
    }

    #[must_use]
    pub fn can_sell(&self, item_id: u32, amount: u32) -> bool {
        self.check_sell(item_id, amount).is_ok()
    }

    /// Buy `amount` units of an item at today's price.
    ///
    /// # Errors
    ///
    /// Returns the reason the purchase was refused; the state is unchanged.
    pub fn buy(&mut self, item_id: u32, amount: u32) -> Result<Purchase, TradeError> {
        let cost = self.check_buy(item_id, amount).inspect_err(|err| {
            log::trace!("buy of {amount} x item {item_id} rejected: {err}");
        })?;
        let item = self
            .item_mut(item_id)
            .ok_or(TradeError::UnknownItem { item_id })?;
        item.quantity += amount;
        let purchase = Purchase {
            item_id,
            name: item.name.clone(),
            unit_price: item.price,
            quantity: amount,
        };
        self.cash -= cost;
        log::debug!(
            "day {}: bought {purchase} (cash now {})",
            self.day,
            self.cash
        );
        self.last_purchase = Some(purchase.clone());
        Ok(purchase)
    }

    /// Sell `amount` units of an item at today's price.
    ///
    /// # Errors
    ///
    /// Returns the reason the sale was refused; the state is unchanged.
    pub fn sell(&mut self, item_id: u32, amount: u32) -> Result<Sale, TradeError> {
        let revenue = self.check_sell(item_id, amount).inspect_err(|err| {
            log::trace!("sale of {amount} x item {item_id} rejected: {err}");
        })?;
        let item = self
            .item_mut(item_id)
            .ok_or(TradeError::UnknownItem { item_id })?;
        item.quantity -= amount;
        let sale = Sale {
            item_id,
            unit_price: item.price,
            quantity: amount,
        };
        self.cash += revenue;
        log::debug!(
            "day {}: sold {amount} x item {item_id} for {revenue} (cash now {})",
            self.day,
            self.cash
        );
        Ok(sale)
    }

    pub(crate) const fn ensure_active(&self) -> Result<(), TradeError> {
        if self.game_over {
            Err(TradeError::GameOver)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn priced(prices: &[u32]) -> GameState {
        let mut state = GameState::new(
            &GameConfig::classic(),
            &mut ChaCha20Rng::seed_from_u64(3),
        )
        .unwrap();
        for (item, price) in state.items.iter_mut().zip(prices) {
            item.price = *price;
        }
        state
    }

    #[test]
    fn buy_debits_cash_and_records_purchase() {
        let mut state = priced(&[100, 200]);
        let purchase = state.buy(1, 3).unwrap();
        assert_eq!(state.cash, 200);
        assert_eq!(state.items[0].quantity, 3);
        assert_eq!(purchase.total(), 300);
        assert_eq!(state.last_purchase.as_ref(), Some(&purchase));
    }

    #[test]
    fn buy_rejects_unaffordable_orders() {
        let mut state = priced(&[100]);
        let before = state.clone();
        assert_eq!(
            state.buy(1, 6),
            Err(TradeError::InsufficientCash {
                needed: 600,
                available: 500
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn buy_rejects_orders_over_capacity() {
        let mut state = priced(&[50, 10]);
        state.buy(1, 8).unwrap();
        let before = state.clone();
        assert_eq!(
            state.buy(2, 3),
            Err(TradeError::CapacityExceeded { needed: 3, free: 2 })
        );
        assert_eq!(state, before);
        assert!(state.can_buy(2, 2));
    }

    #[test]
    fn exact_cash_and_exact_capacity_are_allowed() {
        let mut state = priced(&[50]);
        assert!(state.can_buy(1, 10));
        state.buy(1, 10).unwrap();
        assert_eq!(state.cash, 0);
        assert_eq!(state.free_capacity(), 0);
    }

    #[test]
    fn zero_and_unknown_are_rejected() {
        let state = priced(&[50]);
        assert_eq!(state.check_buy(1, 0), Err(TradeError::ZeroAmount));
        assert_eq!(state.check_sell(1, 0), Err(TradeError::ZeroAmount));
        assert_eq!(
            state.check_buy(9, 1),
            Err(TradeError::UnknownItem { item_id: 9 })
        );
        assert_eq!(
            state.check_sell(9, 1),
            Err(TradeError::UnknownItem { item_id: 9 })
        );
    }

    #[test]
    fn sell_credits_cash_at_todays_price() {
        let mut state = priced(&[100]);
        state.buy(1, 4).unwrap();
        state.items[0].price = 300;
        let sale = state.sell(1, 3).unwrap();
        assert_eq!(sale.revenue(), 900);
        assert_eq!(state.cash, 100 + 900);
        assert_eq!(state.items[0].quantity, 1);
    }

    #[test]
    fn sell_rejects_more_than_held() {
        let mut state = priced(&[100]);
        state.buy(1, 2).unwrap();
        let before = state.clone();
        assert_eq!(
            state.sell(1, 10),
            Err(TradeError::InsufficientStock {
                held: 2,
                requested: 10
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn sell_does_not_touch_last_purchase() {
        let mut state = priced(&[100]);
        let purchase = state.buy(1, 2).unwrap();
        state.sell(1, 1).unwrap();
        assert_eq!(state.last_purchase, Some(purchase));
    }

    #[test]
    fn everything_is_rejected_after_game_over() {
        let mut state = priced(&[100]);
        state.buy(1, 1).unwrap();
        state.game_over = true;
        let before = state.clone();
        assert_eq!(state.buy(1, 1), Err(TradeError::GameOver));
        assert_eq!(state.sell(1, 1), Err(TradeError::GameOver));
        assert!(!state.can_buy(1, 1));
        assert!(!state.can_sell(1, 1));
        assert_eq!(state, before);
    }

    #[test]
    fn errors_serialize_with_reason_tag() {
        let json = serde_json::to_value(TradeError::UpgradeCapReached { max: 20 }).unwrap();
        assert_eq!(json["reason"], "upgrade_cap_reached");
        assert_eq!(json["max"], 20);
    }
}
