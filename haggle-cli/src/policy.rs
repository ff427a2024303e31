use std::fmt;

use clap::ValueEnum;
use haggle_game::{GamePhase, GameState, TradingSession};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use crate::commands::{Applied, Command, apply};

const BARGAIN_BUY_AT: u32 = 150;
const BARGAIN_SELL_AT: u32 = 350;

/// Policy interface for automated play strategies.
pub trait TraderPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Actions to take today, before the day is ended.
    fn plan_day(&mut self, state: &GameState) -> Vec<Command>;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameplayStrategy {
    /// Never trade; the score is the starting cash.
    Hold,
    /// Buy cheap, sell dear, dump everything on the last day.
    Bargain,
    /// Bargain hunting plus capacity upgrades when they are cheap relative to cash.
    Upgrader,
    /// Seeded random actions, including ones that will be refused.
    Random,
}

impl GameplayStrategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameplayStrategy::Hold => "Hold",
            GameplayStrategy::Bargain => "Bargain",
            GameplayStrategy::Upgrader => "Upgrader",
            GameplayStrategy::Random => "Random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn TraderPolicy + Send> {
        match self {
            GameplayStrategy::Hold => Box::new(HoldPolicy),
            GameplayStrategy::Bargain => Box::new(BargainPolicy { upgrades: false }),
            GameplayStrategy::Upgrader => Box::new(BargainPolicy { upgrades: true }),
            GameplayStrategy::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct HoldPolicy;

impl TraderPolicy for HoldPolicy {
    fn name(&self) -> &'static str {
        "hold"
    }

    fn plan_day(&mut self, _state: &GameState) -> Vec<Command> {
        Vec::new()
    }
}

struct BargainPolicy {
    upgrades: bool,
}

impl TraderPolicy for BargainPolicy {
    fn name(&self) -> &'static str {
        if self.upgrades { "upgrader" } else { "bargain" }
    }

    fn plan_day(&mut self, state: &GameState) -> Vec<Command> {
        let last_day = state.days_remaining() == 0;
        let mut plan: Vec<Command> = state
            .items
            .iter()
            .filter(|item| item.quantity > 0 && (last_day || item.price >= BARGAIN_SELL_AT))
            .map(|item| Command::Sell {
                item_id: item.id,
                amount: item.quantity,
            })
            .collect();
        if last_day {
            return plan;
        }

        // Work on a copy so the plan only contains actions that will succeed.
        let mut preview = state.clone();
        for command in &plan {
            if let Command::Sell { item_id, amount } = *command {
                let _ = preview.sell(item_id, amount);
            }
        }
        if self.upgrades
            && preview.upgrade_cost.saturating_mul(4) <= preview.cash
            && preview.upgrade_capacity().is_ok()
        {
            plan.push(Command::Upgrade);
        }
        let cheapest = preview
            .items
            .iter()
            .filter(|item| item.price <= BARGAIN_BUY_AT)
            .min_by_key(|item| item.price)
            .map(|item| (item.id, item.price));
        if let Some((item_id, price)) = cheapest {
            let affordable = preview.cash / i64::from(price.max(1));
            let free = i64::try_from(preview.free_capacity()).unwrap_or(i64::MAX);
            let amount = u32::try_from(affordable.min(free)).unwrap_or(0);
            if amount > 0 && preview.can_buy(item_id, amount) {
                plan.push(Command::Buy { item_id, amount });
            }
        }
        plan
    }
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed ^ 0x7261_6E64),
        }
    }
}

impl TraderPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn plan_day(&mut self, state: &GameState) -> Vec<Command> {
        let item_count = u32::try_from(state.items.len()).unwrap_or(0);
        let actions = self.rng.gen_range(0..4);
        (0..actions)
            .map(|_| {
                let item_id = self.rng.gen_range(1..=item_count.max(1));
                let amount = if self.rng.gen_bool(0.5) { 1 } else { 10 };
                match self.rng.gen_range(0..5) {
                    0 | 1 => Command::Buy { item_id, amount },
                    2 | 3 => Command::Sell { item_id, amount },
                    _ => Command::Upgrade,
                }
            })
            .collect()
    }
}

/// Counters collected while a policy plays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoplayStats {
    pub buys: u32,
    pub sells: u32,
    pub upgrades: u32,
    pub rejected: u32,
    pub days: u32,
}

/// Play a session to the end with `policy`.
pub fn autoplay(session: &mut TradingSession, policy: &mut dyn TraderPolicy) -> AutoplayStats {
    let mut stats = AutoplayStats::default();
    while session.phase() == GamePhase::Active {
        for command in policy.plan_day(session.state()) {
            match apply(session, command) {
                Some(Applied::Done(message)) => {
                    log::debug!("[{}] day {}: {message}", policy.name(), session.state().day);
                    match command {
                        Command::Buy { .. } => stats.buys += 1,
                        Command::Sell { .. } => stats.sells += 1,
                        Command::Upgrade => stats.upgrades += 1,
                        _ => {}
                    }
                }
                Some(Applied::Rejected(err)) => {
                    log::trace!("[{}] {command:?} refused: {err}", policy.name());
                    stats.rejected += 1;
                }
                Some(Applied::Day(_)) | None => {}
            }
        }
        if !session.advance_day().is_game_over() {
            stats.days += 1;
        }
    }
    stats
}
