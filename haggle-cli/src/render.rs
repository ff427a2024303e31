use colored::Colorize;
use haggle_game::{GameState, ScoreEntry, display_slice};
use std::io::{self, Write};

const QUICK_AMOUNTS: [u32; 2] = [1, 10];

pub fn announce_banner() {
    println!("{}", "💰 Haggle".bright_cyan().bold());
    println!("{}", "=========".cyan());
}

fn mark(allowed: bool) -> colored::ColoredString {
    if allowed { "✓".green() } else { "·".dimmed() }
}

/// Day, cash, backpack, market, and the upgrade offer.
pub fn write_status(out: &mut impl Write, state: &GameState) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{} {}/{}   {} {}   {} {}/{}",
        "Day".bold(),
        state.day,
        state.rules.max_days,
        "Cash".bold(),
        state.cash.to_string().green(),
        "Backpack".bold(),
        state.units_held(),
        state.capacity
    )?;
    writeln!(
        out,
        "{:>3}  {:<16} {:>6} {:>6}   buy 1/10   sell 1/10",
        "#", "Item", "Price", "Held"
    )?;
    for item in &state.items {
        let buys: Vec<String> = QUICK_AMOUNTS
            .iter()
            .map(|&amount| mark(state.can_buy(item.id, amount)).to_string())
            .collect();
        let sells: Vec<String> = QUICK_AMOUNTS
            .iter()
            .map(|&amount| mark(state.can_sell(item.id, amount)).to_string())
            .collect();
        writeln!(
            out,
            "{:>3}  {:<16} {:>6} {:>6}   {:^8}   {:^9}",
            item.id,
            item.name,
            item.price,
            item.quantity,
            buys.join(" "),
            sells.join(" ")
        )?;
    }
    write_upgrade_offer(out, state)?;
    if let Some(purchase) = &state.last_purchase {
        writeln!(out, "Last purchase: {purchase}")?;
    }
    Ok(())
}

fn write_upgrade_offer(out: &mut impl Write, state: &GameState) -> io::Result<()> {
    if state.upgrades_remaining() == 0 {
        return writeln!(out, "Upgrade: {}", "backpack fully upgraded".dimmed());
    }
    let line = format!(
        "Upgrade: +{} slots for {} ({} left)",
        state.rules.upgrade_increment,
        state.upgrade_cost,
        state.upgrades_remaining()
    );
    if state.can_upgrade() {
        writeln!(out, "{}", line.yellow())
    } else {
        writeln!(out, "{}", line.dimmed())
    }
}

pub fn write_game_over(out: &mut impl Write, state: &GameState) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "🏁 Game over".bright_yellow().bold())?;
    writeln!(out, "Final cash: {}", state.cash.to_string().green().bold())?;
    if state.units_held() > 0 {
        writeln!(
            out,
            "{}",
            format!("{} unsold units do not count.", state.units_held()).dimmed()
        )?;
    }
    Ok(())
}

/// Top ten rows, marking the player's own row when given.
pub fn write_leaderboard(
    out: &mut impl Write,
    entries: &[ScoreEntry],
    rank: Option<usize>,
) -> io::Result<()> {
    writeln!(out, "{}", "🏆 High Scores".bright_cyan().bold())?;
    let shown = display_slice(entries);
    if shown.is_empty() {
        return writeln!(out, "{}", "No scores yet.".dimmed());
    }
    for (position, entry) in (1..).zip(shown) {
        let row = format!("{position:>3}. {:<20} {:>8}", entry.name, entry.score);
        if rank == Some(position) {
            writeln!(out, "{}", row.green().bold())?;
        } else {
            writeln!(out, "{row}")?;
        }
    }
    Ok(())
}
