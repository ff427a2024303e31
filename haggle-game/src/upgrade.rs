//! Backpack capacity upgrades with escalating cost.
use serde::{Deserialize, Serialize};

use crate::state::GameState;
use crate::trade::TradeError;

/// Result of a purchased upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    pub cost_paid: i64,
    pub new_capacity: u32,
    pub upgrade_count: u32,
    pub next_cost: i64,
}

impl GameState {
    /// Validate an upgrade and return its cost.
    ///
    /// # Errors
    ///
    /// `UpgradeCapReached` once the cap is hit, otherwise the first failed
    /// precondition.
    pub fn check_upgrade(&self) -> Result<i64, TradeError> {
        self.ensure_active()?;
        if self.upgrade_count >= self.rules.max_upgrades {
            return Err(TradeError::UpgradeCapReached {
                max: self.rules.max_upgrades,
            });
        }
        if self.cash < self.upgrade_cost {
            return Err(TradeError::InsufficientCash {
                needed: self.upgrade_cost,
                available: self.cash,
            });
        }
        Ok(self.upgrade_cost)
    }

    #[must_use]
    pub fn can_upgrade(&self) -> bool {
        self.check_upgrade().is_ok()
    }

    /// Upgrades still purchasable this session, ignoring cash.
    #[must_use]
    pub const fn upgrades_remaining(&self) -> u32 {
        self.rules.max_upgrades.saturating_sub(self.upgrade_count)
    }

    /// Buy one capacity upgrade.
    ///
    /// # Errors
    ///
    /// Returns the reason the upgrade was refused; the state is unchanged.
    pub fn upgrade_capacity(&mut self) -> Result<Upgrade, TradeError> {
        let cost = self.check_upgrade().inspect_err(|err| {
            log::trace!("upgrade rejected: {err}");
        })?;
        self.cash -= cost;
        self.capacity = self.capacity.saturating_add(self.rules.upgrade_increment);
        self.upgrade_count += 1;
        self.upgrade_cost = cost.saturating_mul(i64::from(self.rules.upgrade_multiplier));
        log::debug!(
            "day {}: upgrade {} bought for {cost}, capacity {}",
            self.day,
            self.upgrade_count,
            self.capacity
        );
        Ok(Upgrade {
            cost_paid: cost,
            new_capacity: self.capacity,
            upgrade_count: self.upgrade_count,
            next_cost: self.upgrade_cost,
        })
    }
}
