use anyhow::{Context, Result, bail};
use haggle_game::{DayOutcome, TradeError, TradingSession};

/// A single player action typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Buy { item_id: u32, amount: u32 },
    Sell { item_id: u32, amount: u32 },
    Upgrade,
    NextDay,
    Status,
    Scores,
    Restart,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  buy <item> [amount]   buy units at today's price (alias: b)
  sell <item> [amount]  sell units at today's price (alias: s)
  upgrade               buy more backpack slots (alias: u)
  next                  end the day (alias: n)
  status                show cash, day, and market
  scores                show the leaderboard
  restart               play again with fresh prices, once the game is over
  help                  show this list
  quit                  leave without finishing";

/// Parse one prompt line. Amounts default to 1.
pub fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        bail!("type a command, or `help`");
    };
    let command = match verb.to_ascii_lowercase().as_str() {
        "buy" | "b" => {
            let (item_id, amount) = parse_trade_args(&mut words)?;
            Command::Buy { item_id, amount }
        }
        "sell" | "s" => {
            let (item_id, amount) = parse_trade_args(&mut words)?;
            Command::Sell { item_id, amount }
        }
        "upgrade" | "u" => Command::Upgrade,
        "next" | "n" | "day" => Command::NextDay,
        "status" | "st" => Command::Status,
        "scores" | "leaderboard" => Command::Scores,
        "restart" | "again" | "r" => Command::Restart,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("unknown command `{other}`"),
    };
    if let Some(extra) = words.next() {
        bail!("unexpected argument `{extra}`");
    }
    Ok(command)
}

fn parse_trade_args<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<(u32, u32)> {
    let item = words.next().context("which item? e.g. `buy 2 10`")?;
    let item_id = item
        .parse::<u32>()
        .with_context(|| format!("`{item}` is not an item number"))?;
    let amount = match words.next() {
        Some(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("`{raw}` is not an amount"))?,
        None => 1,
    };
    Ok((item_id, amount))
}

/// What a game command did, for the host to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Done(String),
    Rejected(TradeError),
    Day(DayOutcome),
}

/// Run a game-changing command against the session. Host-only commands
/// (status, scores, restart, help, quit) return `None`.
pub fn apply(session: &mut TradingSession, command: Command) -> Option<Applied> {
    let applied = match command {
        Command::Buy { item_id, amount } => match session.buy(item_id, amount) {
            Ok(purchase) => Applied::Done(format!(
                "Bought {purchase}, paid {}",
                purchase.total()
            )),
            Err(err) => Applied::Rejected(err),
        },
        Command::Sell { item_id, amount } => match session.sell(item_id, amount) {
            Ok(sale) => Applied::Done(format!(
                "Sold {} units of item {} for {}",
                sale.quantity,
                sale.item_id,
                sale.revenue()
            )),
            Err(err) => Applied::Rejected(err),
        },
        Command::Upgrade => match session.upgrade_capacity() {
            Ok(upgrade) => Applied::Done(format!(
                "Backpack now holds {} units; next upgrade costs {}",
                upgrade.new_capacity, upgrade.next_cost
            )),
            Err(err) => Applied::Rejected(err),
        },
        Command::NextDay => Applied::Day(session.advance_day()),
        Command::Status
        | Command::Scores
        | Command::Restart
        | Command::Help
        | Command::Quit => return None,
    };
    Some(applied)
}
