mod store;

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use puzzle_engines::{Direction, MergeGame, ScoreStore, SlideGame, Status};
use store::SqliteScoreStore;

#[derive(Debug, Parser)]
#[command(author, version, about = "Terminal front-end for the merge and sliding grid puzzles")]
struct Cli {
    /// RNG seed for deterministic deals and spawns
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// SQLite score database
    #[arg(long, value_name = "FILE", default_value = "scores.db")]
    db: PathBuf,

    /// Print the final summary as JSON instead of plain text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play 2048: moves l, r, u, d read one per line from stdin
    Merge {
        /// Scripted move sequence, e.g. "llurd"; plays until exhausted
        #[arg(long, value_name = "MOVES")]
        script: Option<String>,
    },
    /// Play the sliding puzzle: tile labels read one per line from stdin
    Slide {
        /// Board dimension (3 to 5)
        #[arg(long, default_value_t = 4)]
        dim: usize,

        /// Scripted tile labels, e.g. "5 6 2 14"
        #[arg(long, value_name = "TILES")]
        script: Option<String>,
    },
    /// Show recorded results for a game id (merge4, slide3, slide4, slide5)
    Best { game_id: String },
}

/// Final per-game report, printable as text or JSON.
#[derive(Debug, Serialize)]
struct Summary {
    game_id: String,
    completed: bool,
    score: u64,
    moves: u64,
    best: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut store = SqliteScoreStore::open(&cli.db)
        .with_context(|| format!("opening score database {}", cli.db.display()))?;

    let summary = match cli.command {
        Command::Merge { script } => play_merge(&mut rng, &mut store, script)?,
        Command::Slide { dim, script } => play_slide(&mut rng, &mut store, dim, script)?,
        Command::Best { game_id } => {
            report_best(&store, &game_id)?;
            return Ok(());
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if summary.completed {
        println!(
            "{}: final score {} in {} moves (best so far: {})",
            summary.game_id,
            summary.score,
            summary.moves,
            summary.best.map_or_else(|| "-".into(), |b| b.to_string())
        );
    } else {
        println!(
            "{}: input ended mid-game at score {} after {} moves (not recorded)",
            summary.game_id, summary.score, summary.moves
        );
    }
    Ok(())
}

fn play_merge(
    rng: &mut StdRng,
    store: &mut SqliteScoreStore,
    script: Option<String>,
) -> Result<Summary> {
    let game_id = "merge4".to_string();
    // build the line tables up front so the first move doesn't pay for it
    puzzle_engines::merge::init();
    let mut game = MergeGame::new(rng);
    println!("{}", game.board());

    for token in input_tokens(script) {
        let token = token?;
        let direction = match token.as_str() {
            "l" => Direction::Left,
            "r" => Direction::Right,
            "u" => Direction::Up,
            "d" => Direction::Down,
            "q" => break,
            other => {
                info!("ignoring input {other:?} (expected l/r/u/d/q)");
                continue;
            }
        };
        let out = game.step(direction, rng);
        if out.changed {
            debug!("{direction:?}: +{}", out.score_delta);
            println!("{}", game.board());
        } else {
            info!("{direction:?} does not move anything");
        }
        if game.status() == Status::Terminal {
            break;
        }
    }

    let completed = game.status() == Status::Terminal;
    if completed {
        info!("game over, recording score {}", game.score());
        store.record_result(&game_id, game.score())?;
    }
    Ok(Summary {
        best: store.best_score(&game_id)?,
        completed,
        score: game.score(),
        moves: game.moves(),
        game_id,
    })
}

fn play_slide(
    rng: &mut StdRng,
    store: &mut SqliteScoreStore,
    dim: usize,
    script: Option<String>,
) -> Result<Summary> {
    let game_id = format!("slide{dim}");
    let mut game = SlideGame::new(dim, rng)?;
    println!("{}", game.puzzle());

    for token in input_tokens(script) {
        let token = token?;
        if token == "q" {
            break;
        }
        let label: u8 = match token.parse() {
            Ok(n) => n,
            Err(_) => {
                info!("ignoring input {token:?} (expected a tile label or q)");
                continue;
            }
        };
        match game.step(label) {
            Ok(true) => println!("{}", game.puzzle()),
            Ok(false) => info!("tile {label} is not next to the empty slot"),
            Err(e) => info!("{e}"),
        }
        if game.status() == Status::Terminal {
            break;
        }
    }

    let completed = game.status() == Status::Terminal;
    if completed {
        info!("solved in {} moves", game.moves());
        store.record_result(&game_id, game.moves())?;
    }
    Ok(Summary {
        best: store.fewest(&game_id)?,
        completed,
        score: game.moves(),
        moves: game.moves(),
        game_id,
    })
}

fn report_best(store: &SqliteScoreStore, game_id: &str) -> Result<()> {
    let played = store.games_played(game_id)?;
    if played == 0 {
        bail!("no recorded results for {game_id}");
    }
    if game_id.starts_with("slide") {
        let fewest = store.fewest(game_id)?;
        println!(
            "{game_id}: {played} game(s), fewest moves {}",
            fewest.map_or_else(|| "-".into(), |b| b.to_string())
        );
    } else {
        let best = store.best_score(game_id)?;
        println!(
            "{game_id}: {played} game(s), best score {}",
            best.map_or_else(|| "-".into(), |b| b.to_string())
        );
    }
    Ok(())
}

/// Whitespace-separated tokens from the script when given, otherwise from
/// stdin until EOF. Lowercased so `L` and `l` both work.
fn input_tokens(script: Option<String>) -> Box<dyn Iterator<Item = Result<String>>> {
    match script {
        Some(s) => Box::new(
            s.split_whitespace()
                .flat_map(|tok| {
                    // a merge script like "llurd" is also accepted as one run
                    if tok.chars().all(|c| "lrudq".contains(c.to_ascii_lowercase())) {
                        tok.chars().map(|c| c.to_string()).collect::<Vec<_>>()
                    } else {
                        vec![tok.to_string()]
                    }
                })
                .map(|t| Ok(t.to_ascii_lowercase()))
                .collect::<Vec<_>>()
                .into_iter(),
        ),
        None => Box::new(io::stdin().lock().lines().flat_map(|line| match line {
            Ok(line) => line
                .split_whitespace()
                .map(|t| Ok(t.to_ascii_lowercase()))
                .collect::<Vec<_>>(),
            Err(e) => vec![Err(anyhow::Error::from(e))],
        })),
    }
}
