//! Session configuration: numeric trade rules plus the item catalog.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CLASSIC_INITIAL_CASH, CLASSIC_UPGRADE_INCREMENT, DEFAULT_ITEM_NAMES, INITIAL_CAPACITY,
    INITIAL_UPGRADE_COST, ITEM_NAMES_ENV_VAR, LEAN_INITIAL_CASH, LEAN_UPGRADE_INCREMENT,
    MAX_DAYS, MAX_ITEMS, MAX_UPGRADES, PRICE_MAX, PRICE_MIN, UPGRADE_MULTIPLIER,
};

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("price band invalid (min {min} > max {max})")]
    PriceBand { min: u32, max: u32 },
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: i64,
        value: i64,
    },
    #[error("at least one item name is required")]
    NoItems,
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Inclusive range every daily price is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: u32,
    pub max: u32,
}

impl PriceBand {
    #[must_use]
    pub const fn contains(self, price: u32) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceBand {
    fn default() -> Self {
        Self {
            min: PRICE_MIN,
            max: PRICE_MAX,
        }
    }
}

/// Numeric rules a session is played under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRules {
    #[serde(default = "TradeRules::default_initial_cash")]
    pub initial_cash: i64,
    #[serde(default = "TradeRules::default_initial_capacity")]
    pub initial_capacity: u32,
    #[serde(default = "TradeRules::default_upgrade_increment")]
    pub upgrade_increment: u32,
    #[serde(default = "TradeRules::default_max_upgrades")]
    pub max_upgrades: u32,
    #[serde(default = "TradeRules::default_initial_upgrade_cost")]
    pub initial_upgrade_cost: i64,
    #[serde(default = "TradeRules::default_upgrade_multiplier")]
    pub upgrade_multiplier: u32,
    #[serde(default = "TradeRules::default_max_days")]
    pub max_days: u32,
    #[serde(default)]
    pub prices: PriceBand,
}

impl TradeRules {
    const fn default_initial_cash() -> i64 {
        CLASSIC_INITIAL_CASH
    }

    const fn default_initial_capacity() -> u32 {
        INITIAL_CAPACITY
    }

    const fn default_upgrade_increment() -> u32 {
        CLASSIC_UPGRADE_INCREMENT
    }

    const fn default_max_upgrades() -> u32 {
        MAX_UPGRADES
    }

    const fn default_initial_upgrade_cost() -> i64 {
        INITIAL_UPGRADE_COST
    }

    const fn default_upgrade_multiplier() -> u32 {
        UPGRADE_MULTIPLIER
    }

    const fn default_max_days() -> u32 {
        MAX_DAYS
    }

    /// Check the rules can produce a playable session.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prices.min > self.prices.max {
            return Err(ConfigError::PriceBand {
                min: self.prices.min,
                max: self.prices.max,
            });
        }
        let checks: [(&'static str, i64, i64); 5] = [
            ("initial_cash", 0, self.initial_cash),
            ("initial_capacity", 1, i64::from(self.initial_capacity)),
            ("initial_upgrade_cost", 1, self.initial_upgrade_cost),
            ("upgrade_multiplier", 1, i64::from(self.upgrade_multiplier)),
            ("max_days", 1, i64::from(self.max_days)),
        ];
        for (field, min, value) in checks {
            if value < min {
                return Err(ConfigError::MinViolation { field, min, value });
            }
        }
        Ok(())
    }
}

impl Default for TradeRules {
    fn default() -> Self {
        Self {
            initial_cash: Self::default_initial_cash(),
            initial_capacity: Self::default_initial_capacity(),
            upgrade_increment: Self::default_upgrade_increment(),
            max_upgrades: Self::default_max_upgrades(),
            initial_upgrade_cost: Self::default_initial_upgrade_cost(),
            upgrade_multiplier: Self::default_upgrade_multiplier(),
            max_days: Self::default_max_days(),
            prices: PriceBand::default(),
        }
    }
}

/// Complete configuration for a trading session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub rules: TradeRules,
    #[serde(default = "default_item_names")]
    pub item_names: Vec<String>,
}

fn default_item_names() -> Vec<String> {
    DEFAULT_ITEM_NAMES.iter().map(ToString::to_string).collect()
}

impl GameConfig {
    /// Standard variant: 500 starting cash, upgrades add 10 slots.
    #[must_use]
    pub fn classic() -> Self {
        Self::default()
    }

    /// Tighter variant: 200 starting cash, upgrades add 5 slots.
    #[must_use]
    pub fn lean() -> Self {
        Self {
            rules: TradeRules {
                initial_cash: LEAN_INITIAL_CASH,
                upgrade_increment: LEAN_UPGRADE_INCREMENT,
                ..TradeRules::default()
            },
            item_names: default_item_names(),
        }
    }

    /// Parse a JSON config. Missing fields fall back to the classic values.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.item_names = normalize_item_names(config.item_names);
        config.validate()?;
        Ok(config)
    }

    /// Replace the catalog with a comma-separated list of names.
    /// Blank input keeps the current names.
    #[must_use]
    pub fn with_item_names_csv(mut self, csv: &str) -> Self {
        let parsed = parse_item_names(csv);
        if !parsed.is_empty() {
            self.item_names = parsed;
        }
        self
    }

    /// Apply `HAGGLE_ITEM_NAMES` from the process environment when set.
    #[must_use]
    pub fn with_env_item_names(self) -> Self {
        match std::env::var(ITEM_NAMES_ENV_VAR) {
            Ok(csv) => self.with_item_names_csv(&csv),
            Err(_) => self,
        }
    }

    /// Validate the rules and the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()?;
        if self.item_names.is_empty() {
            return Err(ConfigError::NoItems);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rules: TradeRules::default(),
            item_names: default_item_names(),
        }
    }
}

/// Split a comma-separated name list, trimming whitespace, dropping blanks,
/// and keeping at most five names. Extra names are ignored.
#[must_use]
pub fn parse_item_names(csv: &str) -> Vec<String> {
    normalize_item_names(csv.split(',').map(str::to_string).collect())
}

fn normalize_item_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .take(MAX_ITEMS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_differ_only_in_cash_and_increment() {
        let classic = GameConfig::classic();
        let lean = GameConfig::lean();
        assert_eq!(classic.rules.initial_cash, 500);
        assert_eq!(classic.rules.upgrade_increment, 10);
        assert_eq!(lean.rules.initial_cash, 200);
        assert_eq!(lean.rules.upgrade_increment, 5);
        assert_eq!(
            TradeRules {
                initial_cash: classic.rules.initial_cash,
                upgrade_increment: classic.rules.upgrade_increment,
                ..lean.rules
            },
            classic.rules
        );
    }

    #[test]
    fn item_names_are_trimmed_and_capped() {
        let names = parse_item_names(" Silk , Spice,,Tea, Salt ,Gold,Ivory ");
        assert_eq!(names, vec!["Silk", "Spice", "Tea", "Salt", "Gold"]);
    }

    #[test]
    fn env_item_names_reach_the_config() {
        // SAFETY: nothing else in this test binary touches this variable.
        unsafe { std::env::set_var(ITEM_NAMES_ENV_VAR, " Silk , Spice,,Salt ") };
        let config = GameConfig::lean().with_env_item_names();
        unsafe { std::env::remove_var(ITEM_NAMES_ENV_VAR) };

        assert_eq!(config.item_names, vec!["Silk", "Spice", "Salt"]);
        assert_eq!(config.rules.initial_cash, 200);
        assert_eq!(
            GameConfig::classic().with_env_item_names().item_names,
            default_item_names()
        );
    }

    #[test]
    fn blank_csv_keeps_defaults() {
        let config = GameConfig::classic().with_item_names_csv(" , ");
        assert_eq!(config.item_names.len(), 5);
        assert_eq!(config.item_names[0], "Item A");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            GameConfig::from_json(r#"{"rules":{"initial_cash":50},"item_names":["Tea"]}"#)
                .unwrap();
        assert_eq!(config.rules.initial_cash, 50);
        assert_eq!(config.rules.max_days, 30);
        assert_eq!(config.rules.prices, PriceBand { min: 50, max: 500 });
        assert_eq!(config.item_names, vec!["Tea"]);
    }

    #[test]
    fn validation_rejects_broken_rules() {
        let err = GameConfig::from_json(r#"{"rules":{"prices":{"min":600,"max":500}}}"#)
            .unwrap_err();
        assert_eq!(err, ConfigError::PriceBand { min: 600, max: 500 });

        let err = GameConfig::from_json(r#"{"rules":{"max_days":0}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MinViolation {
                field: "max_days",
                ..
            }
        ));

        let err = GameConfig::from_json(r#"{"item_names":[" "]}"#).unwrap_err();
        assert_eq!(err, ConfigError::NoItems);

        assert!(matches!(
            GameConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
