//! Daily market price rolls.

use rand::Rng;

use crate::config::PriceBand;
use crate::state::Item;

/// Draw one price uniformly from the inclusive band.
#[must_use]
pub fn roll_price(rng: &mut impl Rng, band: PriceBand) -> u32 {
    rng.gen_range(band.min..=band.max)
}

/// Re-roll every item's price independently.
pub fn reroll_prices<'a>(
    items: impl IntoIterator<Item = &'a mut Item>,
    rng: &mut impl Rng,
    band: PriceBand,
) {
    for item in items {
        item.price = roll_price(rng, band);
    }
}
