//! AI-vs-AI self-play driver.
//!
//! Runs a batch of games between two built-in opponents on a simulated
//! clock and prints the score line and win rates.
//!
//! ```text
//! RUST_LOG=fanorona_telo=debug fanorona-selfplay --games 20 --player-two random
//! ```

use clap::{Parser, ValueEnum};
use tracing::{info, instrument, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fanorona_telo::{
    GameSettings, HeuristicConfig, ManualClock, OpponentKind, Player, PlayerId, Session,
    SessionError, SessionEvent,
};

/// Opponent playing a seat.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    Heuristic,
    Random,
}

impl From<Kind> for OpponentKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Heuristic => OpponentKind::Heuristic,
            Kind::Random => OpponentKind::Random,
        }
    }
}

/// Fanorona-telo self-play.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value_t = 10)]
    games: u32,

    /// Session seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Opponent for the first seat
    #[arg(long, value_enum, default_value_t = Kind::Heuristic)]
    player_one: Kind,

    /// Opponent for the second seat
    #[arg(long, value_enum, default_value_t = Kind::Heuristic)]
    player_two: Kind,

    /// Actions after which a game is abandoned as unfinished
    #[arg(long, default_value_t = 200)]
    max_turns: u32,
}

fn main() -> Result<(), SessionError> {
    initialize_tracing();
    let args = Args::parse();

    let clock = ManualClock::new(0);
    let settings = GameSettings::default().with_seed(args.seed);

    let mut players = Player::defaults();
    for (id, kind) in [(PlayerId::One, args.player_one), (PlayerId::Two, args.player_two)] {
        players[id].is_ai = true;
        players[id].name = format!("{} ({})", players[id].name, OpponentKind::from(kind));
    }

    let mut session = Session::new(settings, clock.clone())
        .with_opponent(OpponentKind::Heuristic, HeuristicConfig::default().with_seed(args.seed))
        .with_seat_opponent(PlayerId::One, args.player_one.into())
        .with_seat_opponent(PlayerId::Two, args.player_two.into())
        .with_players(players);

    let mut unfinished = 0;
    for game in 0..args.games {
        if game > 0 {
            session.new_game();
        }
        if !play_one(&mut session, &clock, args.max_turns)? {
            unfinished += 1;
        }
    }

    for id in PlayerId::ALL {
        let player = session.player(id);
        println!(
            "{}: {} wins ({}%)",
            player.name,
            player.score,
            session.history().win_rate(&player.name)
        );
    }
    println!("unfinished: {unfinished}");

    Ok(())
}

/// Drive one game to completion. Returns `false` if it hit the action cap.
#[instrument(skip(session, clock))]
fn play_one(
    session: &mut Session<ManualClock>,
    clock: &ManualClock,
    max_turns: u32,
) -> Result<bool, SessionError> {
    let mut actions = 0;
    while !session.state().is_over() {
        if actions >= max_turns {
            warn!(actions, "action cap reached, abandoning game");
            return Ok(false);
        }
        let Some(due_at) = session.ai_due_at() else {
            warn!("no AI action scheduled");
            return Ok(false);
        };
        clock.set(due_at);
        actions += 1;
        if let Some(SessionEvent::AiStalled { player, rejection }) = session.tick()? {
            warn!(%player, ?rejection, "AI stalled");
        }
    }

    let state = session.state();
    info!(
        winner = ?state.winner,
        reason = ?state.end_reason,
        turns = state.turns_played(),
        "game finished"
    );
    Ok(true)
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,fanorona_telo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
