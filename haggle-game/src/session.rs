use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::config::{ConfigError, GameConfig};
use crate::day::DayOutcome;
use crate::state::{GamePhase, GameState, Purchase};
use crate::trade::{Sale, TradeError};
use crate::upgrade::Upgrade;

/// High-level session wrapper binding a seeded price generator to a mutable
/// game state. The same seed and the same actions replay the same game.
#[derive(Debug, Clone)]
pub struct TradingSession {
    config: GameConfig,
    seed: u64,
    rng: ChaCha20Rng,
    state: GameState,
}

impl TradingSession {
    /// Start a session on day 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let state = GameState::new(&config, &mut rng)?;
        log::debug!(
            "session started: seed {seed}, {} items, {} days",
            state.items.len(),
            state.rules.max_days
        );
        Ok(Self {
            config,
            seed,
            rng,
            state,
        })
    }

    /// Throw the current game away and start a new one on a fresh seed.
    pub fn restart(&mut self) {
        self.reseed(rand::random());
    }

    /// Start over on `seed`. Passing the current seed replays the same market.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = ChaCha20Rng::seed_from_u64(seed);
        self.state = GameState::from_valid(&self.config, &mut self.rng);
        log::debug!("session restarted on seed {seed}");
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    #[must_use]
    pub fn can_buy(&self, item_id: u32, amount: u32) -> bool {
        self.state.can_buy(item_id, amount)
    }

    #[must_use]
    pub fn can_sell(&self, item_id: u32, amount: u32) -> bool {
        self.state.can_sell(item_id, amount)
    }

    #[must_use]
    pub fn can_upgrade(&self) -> bool {
        self.state.can_upgrade()
    }

    /// # Errors
    ///
    /// See [`GameState::buy`].
    pub fn buy(&mut self, item_id: u32, amount: u32) -> Result<Purchase, TradeError> {
        self.state.buy(item_id, amount)
    }

    /// # Errors
    ///
    /// See [`GameState::sell`].
    pub fn sell(&mut self, item_id: u32, amount: u32) -> Result<Sale, TradeError> {
        self.state.sell(item_id, amount)
    }

    /// # Errors
    ///
    /// See [`GameState::upgrade_capacity`].
    pub fn upgrade_capacity(&mut self) -> Result<Upgrade, TradeError> {
        self.state.upgrade_capacity()
    }

    pub fn advance_day(&mut self) -> DayOutcome {
        self.state.advance_day(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_replays_same_prices() {
        let mut a = TradingSession::new(GameConfig::classic(), 0xC0FFEE).unwrap();
        let mut b = TradingSession::new(GameConfig::classic(), 0xC0FFEE).unwrap();
        for _ in 0..10 {
            assert_eq!(a.state(), b.state());
            a.advance_day();
            b.advance_day();
        }
    }

    #[test]
    fn reseed_with_same_seed_returns_to_initial_state() {
        let mut session = TradingSession::new(GameConfig::lean(), 17).unwrap();
        let initial = session.state().clone();
        session.upgrade_capacity().unwrap();
        session.advance_day();
        assert_ne!(session.state(), &initial);
        session.reseed(17);
        assert_eq!(session.state(), &initial);
    }

    #[test]
    fn restart_starts_a_fresh_market() {
        let mut session = TradingSession::new(GameConfig::lean(), 123).unwrap();
        let opening = session.state().items.clone();
        let mut fresh_markets = 0;
        for _ in 0..20 {
            session.upgrade_capacity().unwrap();
            session.advance_day();
            session.restart();
            let state = session.state();
            assert_eq!(state.day, 1);
            assert_eq!(state.cash, 200);
            assert_eq!(state.upgrade_count, 0);
            assert!(!state.game_over);
            assert!(state.items.iter().all(|item| item.quantity == 0));
            if state.items != opening {
                fresh_markets += 1;
            }
        }
        assert!(fresh_markets >= 19, "only {fresh_markets}/20 restarts rolled new prices");
    }

    #[test]
    fn reseed_changes_the_market() {
        let mut session = TradingSession::new(GameConfig::classic(), 1).unwrap();
        let first = session.state().clone();
        session.reseed(2);
        assert_eq!(session.seed(), 2);
        assert_ne!(session.state().items, first.items);
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut config = GameConfig::classic();
        config.item_names.clear();
        assert_eq!(
            TradingSession::new(config, 1).unwrap_err(),
            ConfigError::NoItems
        );
    }
}
