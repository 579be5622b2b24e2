#![warn(rust_2018_idioms)]

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};

use mahjong_rules::app::{CalculatorApp, EngineApp, Verify};
use mahjong_rules::model::Rule;
use mahjong_rules::util::logger;

#[derive(Parser, Debug)]
#[command(name = "mahjong-rules", about = "Riichi mahjong rule engine")]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Table rule as a JSON file. Missing fields use the defaults.
    #[arg(long)]
    rule: Option<PathBuf>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run games between bots.
    Engine {
        /// Random seed (0: current unix time).
        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Number of games (0: a single game with event output).
        #[arg(short, long, default_value_t = 0)]
        games: u32,

        /// Worker threads for multiple games.
        #[arg(short, long, default_value_t = 8)]
        threads: u32,

        /// Suppress event output.
        #[arg(short, long)]
        quiet: bool,

        /// Write the events of a single game to a JSON file.
        #[arg(short, long)]
        write: Option<String>,

        /// Actors in seat order, e.g. `Greedy` `RandomDiscard(7)`.
        #[arg(default_values = ["Nop", "Nop", "Nop", "Nop"])]
        actors: Vec<String>,
    },
    /// Evaluate a winning hand expression.
    Calc {
        /// Hand expression such as `m123p45s456777z33p3+/ES,z1/立直/40,1,1300`.
        expression: Option<String>,

        /// Read expressions from a file, one per line.
        #[arg(short, long, conflicts_with = "expression")]
        file: Option<PathBuf>,

        /// Print debug info.
        #[arg(short, long)]
        detail: bool,
    },
}

fn load_rule(path: Option<&PathBuf>) -> anyhow::Result<Rule> {
    match path {
        Some(p) => {
            let s = std::fs::read_to_string(p)
                .with_context(|| format!("cannot read {}", p.display()))?;
            Rule::from_json(&s).with_context(|| format!("invalid rule file {}", p.display()))
        }
        None => Ok(Rule::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = logger::parse_level(&cli.log_level)
        .ok_or_else(|| anyhow!("unknown log level: {}", cli.log_level))?;
    logger::init(level)?;
    let rule = load_rule(cli.rule.as_ref())?;

    match cli.mode {
        Mode::Engine {
            seed,
            games,
            threads,
            quiet,
            write,
            actors,
        } => {
            let app = EngineApp {
                seed,
                rule,
                n_game: games,
                n_thread: threads,
                quiet,
                write,
                names: actors,
            };
            app.run()
        }
        Mode::Calc {
            expression,
            file,
            detail,
        } => {
            let app = CalculatorApp::new(rule, detail);
            match (expression, file) {
                (Some(exp), None) => {
                    if app.run_expression(&exp)? == Verify::Error {
                        bail!("score verification failed");
                    }
                }
                (None, Some(path)) => {
                    let n_error = app.run_file(&path.to_string_lossy())?;
                    if n_error != 0 {
                        bail!("{} expressions failed", n_error);
                    }
                }
                _ => bail!("either an expression or --file is required"),
            }
            Ok(())
        }
    }
}
