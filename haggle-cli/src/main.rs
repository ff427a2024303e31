mod commands;
mod policy;
mod render;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use haggle_game::{DayOutcome, GameConfig, GameState, ScoreEntry, TradingSession, rank_of};
use haggle_leaderboard::{JsonBinConfig, JsonBinStore, Leaderboard, MemoryStore, ScoreStore};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use commands::{Applied, Command, HELP, apply, parse_command};
use policy::{GameplayStrategy, autoplay};
use report::{ReportFormat, ReportSink, RunReport, write_report};

type Board = Leaderboard<Box<dyn ScoreStore>>;

/// Where a finished game landed on the board.
#[derive(Debug, Default)]
struct Standing {
    player: Option<String>,
    entries: Vec<ScoreEntry>,
    rank: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// 500 starting cash, upgrades add 10 slots
    Classic,
    /// 200 starting cash, upgrades add 5 slots
    Lean,
}

impl Variant {
    fn config(self) -> GameConfig {
        match self {
            Self::Classic => GameConfig::classic(),
            Self::Lean => GameConfig::lean(),
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Lean => "lean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LeaderboardBackend {
    /// Do not record or show scores
    Off,
    /// Keep scores for this process only
    Memory,
    /// Shared JSONBin document (HAGGLE_JSONBIN_KEY / HAGGLE_JSONBIN_BIN)
    Jsonbin,
}

#[derive(Debug, Parser)]
#[command(name = "haggle", version)]
#[command(about = "Buy low, sell high: a 30-day trading game for the terminal")]
struct Args {
    /// Rule set to play
    #[arg(long, value_enum, default_value_t = Variant::Classic)]
    variant: Variant,

    /// JSON game configuration; replaces the variant's rules
    #[arg(long)]
    config: Option<PathBuf>,

    /// Item names (comma-separated, up to five); overrides HAGGLE_ITEM_NAMES
    #[arg(long)]
    items: Option<String>,

    /// Price seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Let a built-in strategy play instead of reading commands
    #[arg(long, value_enum)]
    autoplay: Option<GameplayStrategy>,

    /// Name to record on the leaderboard
    #[arg(long)]
    name: Option<String>,

    /// Where scores are kept
    #[arg(long, value_enum, default_value_t = LeaderboardBackend::Memory)]
    leaderboard: LeaderboardBackend,

    /// Print the leaderboard and exit
    #[arg(long)]
    list_scores: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    let board = open_leaderboard(args.leaderboard)?;

    if args.list_scores {
        return list_scores(&args, board.as_ref()).await;
    }

    let config = build_config(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut session =
        TradingSession::new(config, seed).context("invalid game configuration")?;
    log::info!("starting {} session with seed {seed}", variant_label(&args));

    let (stats, standing) = match args.autoplay {
        Some(strategy) => {
            let mut policy = strategy.create_policy(seed);
            let stats = autoplay(&mut session, policy.as_mut());
            let score = session.state().final_score().unwrap_or(session.state().cash);
            let standing = record_standing(board.as_ref(), args.name.as_deref(), score).await;
            (Some(stats), Some(standing))
        }
        None => {
            render::announce_banner();
            println!("Seed {seed}. Type `help` for commands.");
            let stdin = io::stdin();
            let standing = play_interactive(
                &mut session,
                board.as_ref(),
                args.name.as_deref(),
                &mut stdin.lock(),
            )
            .await?;
            (None, standing)
        }
    };

    let mut report = RunReport::from_state(session.seed(), variant_label(&args), session.state());
    report.strategy = args.autoplay;
    report.stats = stats;
    if let Some(standing) = standing {
        report.player = standing.player;
        report.leaderboard = standing.entries;
        report.rank = standing.rank;
    }

    let mut sink = ReportSink::open(args.output.as_deref())?;
    write_report(&mut sink, args.report, &report)?;
    sink.finish()
}

fn variant_label(args: &Args) -> &'static str {
    if args.config.is_some() {
        "custom"
    } else {
        args.variant.label()
    }
}

/// Variant (or config file), then `HAGGLE_ITEM_NAMES`, then `--items`.
fn build_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            GameConfig::from_json(&raw)
                .with_context(|| format!("invalid game configuration in {}", path.display()))?
        }
        None => args.variant.config(),
    };
    config = config.with_env_item_names();
    if let Some(items) = &args.items {
        config = config.with_item_names_csv(items);
    }
    config.validate().context("invalid game configuration")?;
    Ok(config)
}

fn open_leaderboard(backend: LeaderboardBackend) -> Result<Option<Board>> {
    let store: Box<dyn ScoreStore> = match backend {
        LeaderboardBackend::Off => return Ok(None),
        LeaderboardBackend::Memory => Box::new(MemoryStore::new()),
        LeaderboardBackend::Jsonbin => {
            let config = JsonBinConfig::from_env().context("jsonbin leaderboard not configured")?;
            Box::new(JsonBinStore::new(config).context("failed to build jsonbin client")?)
        }
    };
    Ok(Some(Leaderboard::new(store)))
}

async fn list_scores(args: &Args, board: Option<&Board>) -> Result<()> {
    let entries = match board {
        Some(board) => board.fetch_top().await,
        None => Vec::new(),
    };
    let mut sink = ReportSink::open(args.output.as_deref())?;
    match args.report {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut sink, &entries)?;
            writeln!(sink)?;
        }
        ReportFormat::Console => render::write_leaderboard(&mut sink, &entries, None)?,
    }
    sink.finish()
}

/// Submit when a usable name is present; otherwise just read the board.
async fn record_score(board: Option<&Board>, name: Option<&str>, score: i64) -> Vec<ScoreEntry> {
    let Some(board) = board else {
        return Vec::new();
    };
    match name.filter(|name| !name.trim().is_empty()) {
        Some(name) => board.submit_score(name, score).await,
        None => {
            log::warn!("no player name given; score {score} not submitted");
            board.fetch_top().await
        }
    }
}

async fn record_standing(board: Option<&Board>, name: Option<&str>, score: i64) -> Standing {
    let player = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    let entries = record_score(board, player.as_deref(), score).await;
    let rank = player
        .as_deref()
        .and_then(|name| rank_of(&entries, name, score));
    Standing {
        player,
        entries,
        rank,
    }
}

/// The memory store dies with the process, so say so before asking.
fn name_prompt(store: &str) -> &'static str {
    if store == "memory" {
        "Name for this session's scoreboard (not saved after exit, blank to skip): "
    } else {
        "Name for the leaderboard (blank to skip): "
    }
}

fn prompt_name(input: &mut impl BufRead, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let name = line.trim();
    Ok((!name.is_empty()).then(|| name.to_string()))
}

/// Game over: show the result, record it, and offer another round.
async fn settle_game(
    out: &mut impl Write,
    state: &GameState,
    board: Option<&Board>,
    name: Option<&str>,
    input: &mut impl BufRead,
) -> Result<Standing> {
    render::write_game_over(out, state)?;
    let Some(board) = board else {
        writeln!(out, "Type `restart` to play again or `quit` to leave.")?;
        return Ok(Standing::default());
    };
    let name = match name {
        Some(name) => Some(name.to_string()),
        None => prompt_name(input, name_prompt(board.store().name()))?,
    };
    let score = state.final_score().unwrap_or(state.cash);
    let standing = record_standing(Some(board), name.as_deref(), score).await;
    render::write_leaderboard(out, &standing.entries, standing.rank)?;
    writeln!(out, "Type `restart` to play again or `quit` to leave.")?;
    Ok(standing)
}

/// Read commands until the player quits or input runs out. Returns the
/// standing of the last game if the session ended on a finished game.
async fn play_interactive(
    session: &mut TradingSession,
    board: Option<&Board>,
    name: Option<&str>,
    input: &mut impl BufRead,
) -> Result<Option<Standing>> {
    let mut stdout = io::stdout();
    render::write_status(&mut stdout, session.state())?;
    let mut standing = None;
    let mut line = String::new();
    loop {
        print!("{} ", ">".bright_cyan());
        stdout.flush()?;
        line.clear();
        if input.read_line(&mut line).context("failed to read command")? == 0 {
            println!();
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err.to_string().red());
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => println!("{HELP}"),
            Command::Status => render::write_status(&mut stdout, session.state())?,
            Command::Scores => {
                let entries = match board {
                    Some(board) => board.fetch_top().await,
                    None => Vec::new(),
                };
                render::write_leaderboard(&mut stdout, &entries, None)?;
            }
            Command::Restart if !session.state().game_over => {
                println!("{}", "Finish this game first, or `quit`.".yellow());
            }
            Command::Restart => {
                session.restart();
                standing = None;
                println!("New game on seed {}.", session.seed());
                render::write_status(&mut stdout, session.state())?;
            }
            _ => {
                let applied = apply(session, command);
                let just_ended = standing.is_none()
                    && matches!(applied, Some(Applied::Day(DayOutcome::GameOver { .. })));
                report_applied(&mut stdout, session.state(), applied)?;
                if just_ended {
                    standing =
                        Some(settle_game(&mut stdout, session.state(), board, name, input).await?);
                }
            }
        }
    }
    Ok(standing)
}

fn report_applied(out: &mut impl Write, state: &GameState, applied: Option<Applied>) -> Result<()> {
    match applied {
        Some(Applied::Done(message)) => writeln!(out, "{}", message.green())?,
        Some(Applied::Rejected(err)) => writeln!(out, "{}", err.to_string().red())?,
        Some(Applied::Day(outcome)) if !outcome.is_game_over() => render::write_status(out, state)?,
        Some(Applied::Day(_)) | None => {}
    }
    Ok(())
}
