#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use broadside::{
    cli::{opponent_failure, parse_input, print_session, Input, HELP},
    init_logging, Command, GameEvent, GameSession, OpponentClock, OPPONENT_DELAY_MAX_MS,
    OPPONENT_DELAY_MIN_MS,
};
#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use log::{debug, warn};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use std::io::Write;
#[cfg(feature = "std")]
use tokio::io::{AsyncBufReadExt, BufReader};
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Sink the computer's fleet before it sinks yours", long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, default_value_t = OPPONENT_DELAY_MIN_MS, help = "Shortest opponent thinking pause")]
    min_delay_ms: u64,
    #[arg(long, default_value_t = OPPONENT_DELAY_MAX_MS, help = "Longest opponent thinking pause")]
    max_delay_ms: u64,
    #[arg(long, help = "Place your fleet at random and start the battle right away")]
    auto_place: bool,
}

#[cfg(feature = "std")]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut rng = if let Some(s) = cli.seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
        SmallRng::seed_from_u64(s)
    } else {
        let mut seed_rng = rand::rng();
        SmallRng::from_rng(&mut seed_rng)
    };
    let mut clock = OpponentClock::new(
        Duration::from_millis(cli.min_delay_ms),
        Duration::from_millis(cli.max_delay_ms),
    );
    let mut session = GameSession::new();

    println!("{}\n", HELP);
    if cli.auto_place {
        for cmd in [Command::RandomizePlacement, Command::StartBattle] {
            let events = session.submit(cmd, &mut rng)?;
            report(&events, &mut clock, &mut rng);
        }
    }
    print_session(&session);
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(Input::Help) => println!("{}", HELP),
                    Ok(Input::Board) => print_session(&session),
                    Ok(Input::Command(cmd)) => match session.submit(cmd, &mut rng) {
                        Ok(events) => {
                            report(&events, &mut clock, &mut rng);
                            print_session(&session);
                        }
                        Err(e) => println!("{}", e),
                    },
                    Err(msg) => println!("{}", msg),
                }
                prompt()?;
            }
            ticket = clock.wait() => {
                match session.opponent_move(ticket, &mut rng) {
                    Ok(events) => {
                        println!();
                        report(&events, &mut clock, &mut rng);
                        print_session(&session);
                    }
                    Err(e) => match opponent_failure(&e) {
                        Some(msg) => {
                            warn!("opponent move {:?} failed: {:?}", ticket, e);
                            println!("{}", msg);
                        }
                        None => debug!("dropped stale opponent move {:?}", ticket),
                    },
                }
                prompt()?;
            }
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
fn report(events: &[GameEvent], clock: &mut OpponentClock, rng: &mut SmallRng) {
    for event in events {
        println!("{}", event);
        match event {
            GameEvent::OpponentTurn(ticket) => {
                let delay = clock.schedule(*ticket, rng);
                debug!("opponent thinking for {:?}", delay);
            }
            GameEvent::GameReset | GameEvent::GameOver { .. } => {
                if let Some(ticket) = clock.cancel() {
                    debug!("cancelled opponent move {:?}", ticket);
                }
            }
            _ => {}
        }
    }
}

#[cfg(feature = "std")]
fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}
