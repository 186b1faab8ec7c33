//! Batch runner: reads a scenario stream, simulates each pursuit, and prints
//! one destroyed-cell count per scenario in input order.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use serde::Serialize;

use rampage_core::{Coord, EngineState, RampageEngine, Scenario};

#[derive(Debug, Parser)]
#[command(name = "rampage", version, about)]
struct Cli {
    /// Scenario stream to read; stdin when omitted.
    input: Option<PathBuf>,

    /// Emit a JSON report instead of one count per line.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity,
}

#[derive(Debug, Serialize)]
struct ScenarioReport {
    scenario: usize,
    destroyed: u32,
    outcome: &'static str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            run_batch(BufReader::new(file), &mut out, cli.json)
        }
        None => run_batch(io::stdin().lock(), &mut out, cli.json),
    }
}

fn run_batch(mut input: impl BufRead, out: &mut impl Write, json: bool) -> Result<()> {
    let count: usize = next_line(&mut input)?
        .trim()
        .parse()
        .context("reading scenario count")?;

    let mut reports = Vec::with_capacity(count);
    for scenario in 0..count {
        let header = next_line(&mut input)?;
        let mut dims = header.split_whitespace();
        let width: Coord = dims
            .next()
            .with_context(|| format!("scenario {scenario}: missing width"))?
            .parse()
            .with_context(|| format!("scenario {scenario}: reading width"))?;
        let height: Coord = dims
            .next()
            .with_context(|| format!("scenario {scenario}: missing height"))?
            .parse()
            .with_context(|| format!("scenario {scenario}: reading height"))?;

        let rows: Vec<String> = (0..height)
            .map(|_| next_line(&mut input))
            .collect::<Result<_>>()?;
        let decoded = Scenario::decode(width, height, rows.iter().map(|row| row.trim_end()))
            .with_context(|| format!("decoding scenario {scenario}"))?;

        let mut engine = RampageEngine::new(decoded);
        let destroyed = engine.run();
        log::info!(
            "scenario {scenario}: {} after {} turns, {destroyed} destroyed",
            outcome_name(engine.state()),
            engine.turn()
        );

        if json {
            reports.push(ScenarioReport {
                scenario,
                destroyed,
                outcome: outcome_name(engine.state()),
            });
        } else {
            writeln!(out, "{destroyed}")?;
        }
    }

    if json {
        serde_json::to_writer_pretty(&mut *out, &reports)?;
        writeln!(out)?;
    }
    Ok(())
}

fn next_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    ensure!(input.read_line(&mut line)? > 0, "unexpected end of input");
    Ok(line)
}

fn outcome_name(state: EngineState) -> &'static str {
    match state {
        EngineState::Running => "running",
        EngineState::Intercepted => "intercepted",
        EngineState::Exhausted => "exhausted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn batch(input: &str, json: bool) -> Result<String> {
        let mut out = Vec::new();
        run_batch(Cursor::new(input), &mut out, json)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn batch_prints_one_count_per_scenario() {
        let input = "2\n3 3\nMR.\nRGR\n.R.\n2 2\nG.\n..\n";

        assert_eq!(batch(input, false).unwrap(), "1\n0\n");
    }

    #[test]
    fn json_report_carries_outcomes() {
        let input = "1\n2 2\nG.\n..\n";

        let report = batch(input, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(parsed[0]["destroyed"], 0);
        assert_eq!(parsed[0]["outcome"], "exhausted");
    }

    #[test]
    fn truncated_input_is_an_error() {
        assert!(batch("1\n3 3\nMR.\n", false).is_err());
    }

    #[test]
    fn malformed_grid_is_an_error() {
        assert!(batch("1\n2 1\nG?\n", false).is_err());
    }
}
