//! Day progression and the end of the session.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pricing::reroll_prices;
use crate::state::GameState;

/// What happened when the player ended the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum DayOutcome {
    /// A new day began with fresh prices.
    Advanced { day: u32 },
    /// The final day has passed; the state is frozen.
    GameOver { final_cash: i64 },
}

impl DayOutcome {
    #[must_use]
    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::GameOver { .. })
    }
}

impl GameState {
    /// End the current day. On the last day this flips the session into
    /// its terminal phase instead of moving the calendar.
    pub fn advance_day(&mut self, rng: &mut impl Rng) -> DayOutcome {
        if self.game_over {
            return DayOutcome::GameOver {
                final_cash: self.cash,
            };
        }
        if self.day >= self.rules.max_days {
            self.game_over = true;
            log::debug!("day {}: session over with {} cash", self.day, self.cash);
            return DayOutcome::GameOver {
                final_cash: self.cash,
            };
        }
        self.day += 1;
        let band = self.rules.prices;
        reroll_prices(self.items.iter_mut(), rng, band);
        log::debug!("day {} begins", self.day);
        DayOutcome::Advanced { day: self.day }
    }
}
