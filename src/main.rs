use std::time::Instant;

use anyhow::{bail, ensure, Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use sliding_tile_solver::solve::{Outcome, SearchConfig, Strategy};
use sliding_tile_solver::{Puzzle, SideBySide};

const REFERENCE_PUZZLE: &str = "
1 2 3
4 0 5
6 7 8

1 2 3
4 5 6
7 8 0
";

const USAGE: &str = "Usage: sliding-tile-solver [PUZZLE_FILE] [--strategy bfs|astar|both] [--max-expansions N]";

struct Args {
    path: Option<String>,
    strategies: Vec<Strategy>,
    config: SearchConfig,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut path = None;
        let mut strategies = Strategy::ALL.to_vec();
        let mut config = SearchConfig::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-s" | "--strategy" => {
                    let value = args.next().context("Missing value of --strategy")?;
                    strategies = match value.as_str() {
                        "both" => Strategy::ALL.to_vec(),
                        s => vec![s.parse()?],
                    };
                }
                "--max-expansions" => {
                    let value = args.next().context("Missing value of --max-expansions")?;
                    let max = value
                        .parse()
                        .with_context(|| format!("Invalid expansion budget: {value:?}"))?;
                    config.max_expansions = Some(max);
                }
                "-h" | "--help" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                _ if arg.starts_with('-') => bail!("Unknown option {arg:?}\n{USAGE}"),
                _ => {
                    ensure!(path.is_none(), "Multiple puzzle files given\n{USAGE}");
                    path = Some(arg);
                }
            }
        }
        Ok(Self {
            path,
            strategies,
            config,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse(std::env::args().skip(1))?;
    let puzzle = match &args.path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {path}"))?
            .parse::<Puzzle>()
            .context("Failed to parse the puzzle")?,
        None => REFERENCE_PUZZLE.parse::<Puzzle>()?,
    };
    println!("{puzzle}");

    let spinner = ProgressStyle::with_template("{spinner} {prefix}: {pos} expansions [{elapsed}]")?;
    for strategy in args.strategies {
        println!("{}", style(format!("=== {strategy} ===")).bold());

        let pb = ProgressBar::new_spinner()
            .with_style(spinner.clone())
            .with_prefix(strategy.to_string());
        let inst = Instant::now();
        let outcome = strategy.run(&puzzle, &args.config, || pb.inc(1));
        pb.finish_and_clear();

        let stats = outcome.stats();
        info!(
            "{strategy}: {} expanded, {} visited in {:?}",
            stats.expanded,
            stats.visited,
            inst.elapsed(),
        );

        match outcome {
            Outcome::Solved(solution) => {
                println!(
                    "Solution found in {} moves!",
                    style(solution.depth).green().bold()
                );
                let moves = solution
                    .moves
                    .iter()
                    .map(|dir| dir.to_string())
                    .collect::<Vec<_>>();
                if !moves.is_empty() {
                    println!("{}", moves.join(", "));
                }
                print!("{}", SideBySide(&solution.states));
            }
            Outcome::NoSolution(_) => println!("{}", style("No solution found!").red()),
            Outcome::Interrupted(stats) => println!(
                "{}",
                style(format!("Gave up after {} expansions", stats.expanded)).yellow()
            ),
        }
        println!();
    }

    Ok(())
}
