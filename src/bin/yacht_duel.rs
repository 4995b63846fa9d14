//! Demo driver: autopilot games on the in-process relay.
//!
//! `single` plays a heuristic "human" against the built-in AI; `duel` pairs
//! two autopilot clients through a `Lobby` and checks that their views of
//! the game agree at the end.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use yacht_duel::{
    ChannelRelay, GameConfig, GameController, HeuristicPolicy, Lobby, Notice, PeerId, Renderer,
    Seat, WireFormat,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Autopilot against the AI.
    Single,
    /// Two autopilot clients over the relay.
    Duel,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Autopilot Yacht games")]
struct Args {
    #[arg(short, long, value_enum, default_value = "single")]
    mode: Mode,

    /// Dice seed; random when omitted.
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON config file; flags override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip every delay.
    #[arg(long)]
    instant: bool,

    /// Use the binary wire format.
    #[arg(long)]
    binary: bool,

    /// Stop a duel after this many rounds without a result.
    #[arg(long, default_value = "64")]
    max_rounds: u32,
}

/// Logs what a real display would draw.
struct TraceRenderer {
    label: &'static str,
}

impl Renderer for TraceRenderer {
    fn init_display(&mut self, width: u32, height: u32) {
        debug!(client = self.label, width, height, "display ready");
    }

    fn set_dice_values(&mut self, values: [u8; 5]) {
        debug!(client = self.label, ?values, "dice");
    }

    fn set_kept_mask(&mut self, mask: [bool; 5]) {
        debug!(client = self.label, ?mask, "kept");
    }

    fn notify(&mut self, notice: &Notice) {
        match notice {
            Notice::PeerLost => warn!(client = self.label, "opponent left"),
            Notice::GameOver(outcome) => info!(
                client = self.label,
                me = outcome.totals[Seat::Me],
                opponent = outcome.totals[Seat::Opponent],
                winner = ?outcome.winner,
                "game over"
            ),
        }
    }
}

fn load_config(args: &Args) -> Result<GameConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if args.instant {
        config = config
            .with_ai_step_delay(Duration::ZERO)
            .with_yacht_celebration_delay(Duration::ZERO);
    }
    if args.binary {
        config = config.with_wire_format(WireFormat::Binary);
    }
    config.validate()?;
    Ok(config)
}

/// Fire every pending timer, sleeping through the delays.
async fn settle<D: Renderer>(game: &mut GameController<D>) {
    while let Some(deadline) = game.next_deadline() {
        let wait = deadline.saturating_sub(game.now());
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        game.advance_to(deadline);
    }
}

async fn single(config: GameConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut game = GameController::single_player(config, TraceRenderer { label: "me" })?;
    while !game.is_game_over() {
        game.autoplay_turn(&HeuristicPolicy);
        settle(&mut game).await;
    }
    Ok(())
}

async fn duel(config: GameConfig, max_rounds: u32) -> Result<(), Box<dyn std::error::Error>> {
    let mut lobby = Lobby::new();
    let mut alice = ChannelRelay::new(PeerId::new("alice"));
    let mut bob = ChannelRelay::new(PeerId::new("bob"));
    info!(status = ?lobby.find_match(&mut alice), "alice joined");
    info!(status = ?lobby.find_match(&mut bob), "bob joined");

    // Distinct dice streams per client.
    let bob_config = match config.seed {
        Some(seed) => config.clone().with_seed(seed.wrapping_add(1)),
        None => config.clone(),
    };
    let mut a = GameController::multiplayer(config, alice, TraceRenderer { label: "alice" })?;
    let mut b = GameController::multiplayer(bob_config, bob, TraceRenderer { label: "bob" })?;

    for round in 1..=max_rounds {
        if a.is_game_over() && b.is_game_over() {
            break;
        }
        for game in [&mut a, &mut b] {
            game.process();
            game.autoplay_turn(&HeuristicPolicy);
            settle(game).await;
        }
        debug!(round, "round done");
    }
    a.process();

    if !(a.is_game_over() && b.is_game_over()) {
        return Err(format!("no result after {max_rounds} rounds").into());
    }
    let agree = a.session().scorecard(Seat::Me) == b.session().scorecard(Seat::Opponent)
        && a.session().scorecard(Seat::Opponent) == b.session().scorecard(Seat::Me);
    if agree {
        info!("both clients agree on the final scorecards");
    } else {
        warn!(
            desyncs_a = a.desync_count(),
            desyncs_b = b.desync_count(),
            "clients disagree on the final scorecards"
        );
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config(&args)?;
    info!(mode = ?args.mode, seed = ?config.seed, "starting");
    match args.mode {
        Mode::Single => single(config).await,
        Mode::Duel => duel(config, args.max_rounds).await,
    }
}
