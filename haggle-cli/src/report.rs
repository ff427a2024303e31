use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use haggle_game::{GameState, ScoreEntry};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write, stdout};
use std::path::{Path, PathBuf};

use crate::policy::{AutoplayStats, GameplayStrategy};
use crate::render::write_leaderboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary
    Console,
    /// Machine-readable JSON
    Json,
}

/// Summary of one finished (or abandoned) run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub variant: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<GameplayStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
    pub completed: bool,
    pub day: u32,
    pub cash: i64,
    pub final_score: Option<i64>,
    pub capacity: u32,
    pub upgrade_count: u32,
    pub units_unsold: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<AutoplayStats>,
    pub leaderboard: Vec<ScoreEntry>,
    pub rank: Option<usize>,
}

impl RunReport {
    #[must_use]
    pub fn from_state(seed: u64, variant: &str, state: &GameState) -> Self {
        Self {
            seed,
            variant: variant.to_string(),
            strategy: None,
            player: None,
            completed: state.game_over,
            day: state.day,
            cash: state.cash,
            final_score: state.final_score(),
            capacity: state.capacity,
            upgrade_count: state.upgrade_count,
            units_unsold: state.units_held(),
            stats: None,
            leaderboard: Vec::new(),
            rank: None,
        }
    }
}

pub fn write_report(out: &mut impl Write, format: ReportFormat, report: &RunReport) -> Result<()> {
    match format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        ReportFormat::Console => write_console_report(out, report)?,
    }
    Ok(())
}

fn write_console_report(out: &mut impl Write, report: &RunReport) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Run Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============".cyan())?;
    writeln!(out, "Seed: {}", report.seed)?;
    writeln!(out, "Variant: {}", report.variant)?;
    if let Some(strategy) = report.strategy {
        writeln!(out, "Strategy: {strategy}")?;
    }
    if let Some(player) = &report.player {
        writeln!(out, "Player: {player}")?;
    }
    match report.final_score {
        Some(score) => writeln!(out, "Final score: {}", score.to_string().green().bold())?,
        None => writeln!(
            out,
            "{}",
            format!("Left on day {} with {} cash", report.day, report.cash).yellow()
        )?,
    }
    writeln!(
        out,
        "Backpack: {} slots after {} upgrades",
        report.capacity, report.upgrade_count
    )?;
    if let Some(stats) = &report.stats {
        writeln!(
            out,
            "Actions: {} buys, {} sells, {} upgrades, {} refused",
            stats.buys, stats.sells, stats.upgrades, stats.rejected
        )?;
    }
    if let Some(rank) = report.rank {
        writeln!(out, "Leaderboard rank: #{rank}")?;
    }
    if !report.leaderboard.is_empty() {
        writeln!(out)?;
        write_leaderboard(out, &report.leaderboard, report.rank)?;
    }
    Ok(())
}

/// Where a report goes: stdout, or the file named by `--output`.
pub enum ReportSink {
    Stdout(BufWriter<Stdout>),
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
}

impl ReportSink {
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(BufWriter::new(stdout())));
        };
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Self::File {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    fn inner(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(writer) => writer,
            Self::File { writer, .. } => writer,
        }
    }

    /// Flush everything buffered; a failed file write names the file.
    pub fn finish(mut self) -> Result<()> {
        match &mut self {
            Self::Stdout(writer) => writer.flush().context("failed to flush stdout"),
            Self::File { path, writer } => writer
                .flush()
                .with_context(|| format!("failed to write {}", path.display())),
        }
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner().flush()
    }
}
