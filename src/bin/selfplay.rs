use std::path::PathBuf;

use chess_rules::board::Glyphs;
use chess_rules::config::MatchConfig;
use chess_rules::game::Game;
use chess_rules::piece::Color;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Play random games through the rules engine.
#[derive(Parser)]
#[command(name = "selfplay", version, about)]
struct Cli {
    /// YAML match config (also read from CHESS_CONFIG).
    #[arg(long, env = "CHESS_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long)]
    games: Option<u32>,
    #[arg(long)]
    max_plies: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    /// Print the final position with Unicode figurines.
    #[arg(long)]
    figurines: bool,
    /// Print each finished game as JSON.
    #[arg(long)]
    json: bool,
}

fn play_game(cfg: &MatchConfig, rng: &mut StdRng) -> (Game, u32) {
    let mut game = Game::new(cfg.white.as_str(), cfg.black.as_str());
    let mut plies = 0;
    while game.winner().is_none() && plies < cfg.max_plies {
        let intents = game.available_intents();
        let Some(&intent) = intents.choose(rng) else {
            warn!("{} has nothing to play", game.turn());
            break;
        };
        match game.play(intent) {
            Ok(_) => plies += 1,
            Err(e) => {
                warn!("engine refused {intent:?}: {e}");
                break;
            }
        }
    }
    (game, plies)
}

fn main() {
    let env = Env::default().filter_or("CHESS_LOG", "info");
    env_logger::Builder::from_env(env).init();

    let cli = Cli::parse();
    let mut cfg = match MatchConfig::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    if let Some(games) = cli.games {
        cfg.games = games;
    }
    if let Some(max_plies) = cli.max_plies {
        cfg.max_plies = max_plies;
    }
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }

    let seed = cfg.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("seed {seed}, {} games, {} plies max", cfg.games, cfg.max_plies);
    let mut rng = StdRng::seed_from_u64(seed);

    let (mut white_wins, mut black_wins, mut unfinished) = (0u32, 0u32, 0u32);
    for n in 1..=cfg.games {
        let (game, plies) = play_game(&cfg, &mut rng);
        match game.winner() {
            Some(winner) => {
                info!("game {n}: checkmate after {plies} plies, {} ({winner}) wins", game.player(winner).name);
                match winner {
                    Color::White => white_wins += 1,
                    Color::Black => black_wins += 1,
                }
            }
            None => {
                info!("game {n}: no result after {plies} plies");
                unfinished += 1;
            }
        }

        if cli.json {
            match game.snapshot_json() {
                Ok(json) => println!("{json}"),
                Err(e) => warn!("cannot serialize game {n}: {e}"),
            }
        } else {
            let glyphs = if cli.figurines { Glyphs::Figurine } else { Glyphs::Ascii };
            println!("{}", game.board.render_board(glyphs));
        }
    }

    println!("White {white_wins}, Black {black_wins}, unfinished {unfinished}");
}
