use std::io::{self, BufRead, Write};

use battleship::{
    fleet_from_types, init_logging, render, FleetSpec, GameConfig, GameEvent, GameManager,
    GameState, Player, Strategy, CLASSIC_FLEET,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Let two automated players fight it out and print a JSON summary.
    Sim {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value = "hunt", help = "Strategy of player 1 (random, hunt, tracking)")]
        p1: String,
        #[arg(long, default_value = "random", help = "Strategy of player 2 (random, hunt, tracking)")]
        p2: String,
        #[arg(long, default_value_t = 1)]
        games: u64,
    },
    /// Play against an automated opponent at the terminal.
    Play {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value = "hunt")]
        strategy: String,
        #[arg(long, default_value = "Player")]
        name: String,
        #[arg(long, help = "Let the computer fire first")]
        computer_first: bool,
    },
}

fn classic_fleets() -> anyhow::Result<[Option<FleetSpec>; 2]> {
    Ok([
        Some(FleetSpec::random(fleet_from_types(&CLASSIC_FLEET)?)),
        Some(FleetSpec::random(fleet_from_types(&CLASSIC_FLEET)?)),
    ])
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sim {
            seed,
            p1,
            p2,
            games,
        } => {
            let (s1, s2): (Strategy, Strategy) = (p1.parse()?, p2.parse()?);
            for game in 0..games {
                let config = match seed {
                    Some(s) => GameConfig::with_seed(s.wrapping_add(game)),
                    None => GameConfig::default(),
                };
                let players = [
                    Player::automated("player1", s1)?,
                    Player::automated("player2", s2)?,
                ];
                let mut manager = GameManager::with_config(players, config);
                manager.start_game(0, classic_fleets()?)?;
                let summary = manager.summary();
                println!("{}", serde_json::to_string(&summary)?);
            }
        }
        Commands::Play {
            seed,
            strategy,
            name,
            computer_first,
        } => {
            let strategy: Strategy = strategy.parse()?;
            let config = seed.map(GameConfig::with_seed).unwrap_or_default();
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let players = [
                Player::human(name)?,
                Player::automated("Computer", strategy)?,
            ];
            let mut manager = GameManager::with_config(players, config);
            manager.events().subscribe(|event| match event {
                GameEvent::AttackResolved {
                    attacker,
                    coord,
                    outcome,
                    ..
                } => {
                    let who = if *attacker == 0 { "You" } else { "Computer" };
                    println!("{} fired at {} -> {:?}", who, coord, outcome);
                }
                GameEvent::GameOver { winner } => println!("\n*** {} wins! ***", winner),
                _ => {}
            });
            manager.start_game(usize::from(computer_first), classic_fleets()?)?;
            run_terminal(&mut manager)?;
        }
    }
    Ok(())
}

fn run_terminal(manager: &mut GameManager) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while manager.state() == GameState::InProgress {
        let me = &manager.players()[0];
        println!("\nOpponent board:");
        print!("{}", render::render_log(me.history()));
        println!("\nYour board:");
        print!("{}", render::render_board(me.board(), true));
        print!("Enter target (e.g. B7): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line?;
        let Some(coord) = render::parse_coord(&line) else {
            println!("Invalid coordinate");
            continue;
        };
        if let Err(err) = manager.play_turn(coord.row, coord.col) {
            println!("Error: {}", err);
        }
    }
    let me = &manager.players()[0];
    println!("\nFinal board:");
    print!("{}", render::render_board(me.board(), true));
    Ok(())
}
